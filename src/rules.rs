use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::geometry::{Geometry, MAX_MOVES_PER_TURN};
use crate::pieces::{ByColor, PieceKind, PlayerColor};

/// Ways a game can end. Evaluated in configuration order, first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WinCondition {
    /// Opponent's king is attacked and every square it could step to is too.
    Checkmate,
    /// Opponent has no king left.
    KingCaptured,
    /// A piece of the mover stands on a square carrying the opponent's flag.
    FlagCaptured,
    /// Mover's king occupies the mover's goal square.
    KingArrived,
    /// Opponent has no pawns left.
    AllPawnsCaptured,
    /// Mover's last move promoted a piece.
    PawnPromoted,
    /// Mover has `length` pieces on one unbroken diagonal of some dimension pair.
    DiagonalRow { length: usize },
    /// Opponent has no pieces left.
    EverythingCaptured,
}

impl WinCondition {
    /// Conditions satisfied by the mover's own position rather than the opponent's.
    pub fn judges_mover(self) -> bool {
        matches!(
            self,
            WinCondition::KingArrived
                | WinCondition::FlagCaptured
                | WinCondition::PawnPromoted
                | WinCondition::DiagonalRow { .. }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PromotionRule {
    Disabled,
    /// Arrival on the far edge of every relevant forward dimension.
    #[default]
    LastRank,
    /// A piece promotes once it has advanced this many steps.
    AfterSteps(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GravityDirection {
    Positive,
    Negative,
}

impl GravityDirection {
    #[inline]
    pub fn sign(self) -> i32 {
        match self {
            GravityDirection::Positive => 1,
            GravityDirection::Negative => -1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gravity {
    pub dimension: usize,
    pub direction: GravityDirection,
}

/// Whether selected moves are checked for leaving the mover's king attacked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LegalityMode {
    #[default]
    PseudoLegal,
    ForbidSelfCheck,
}

/// Variant parameters, fixed for the lifetime of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfiguration {
    /// Extent of every dimension. Dimension 0 varies fastest in the square index.
    pub shape: Vec<usize>,
    /// Dimensions pawns advance along and promotion ranks are measured on.
    pub forward_dimensions: Vec<bool>,
    pub wrapping: Vec<bool>,
    pub win_conditions: Vec<WinCondition>,
    pub castling_allowed: bool,
    pub moves_per_turn: ByColor<usize>,
    pub same_piece_can_move_twice: bool,
    pub king_invincible: bool,
    pub king_allowed_to_capture: bool,
    pub goal_squares: ByColor<Option<usize>>,
    pub promotion: PromotionRule,
    /// Non-pawn kinds that promote under the promotion rule.
    pub promotable_kinds: Vec<PieceKind>,
    pub gravity: Option<Gravity>,
    /// Non-king pieces may also jump to any empty square.
    pub move_anywhere_unoccupied: bool,
    pub legality: LegalityMode,
}

impl Default for RuleConfiguration {
    /// Standard chess on an 8x8 board.
    fn default() -> Self {
        RuleConfiguration {
            shape: vec![8, 8],
            forward_dimensions: vec![false, true],
            wrapping: vec![false, false],
            win_conditions: vec![WinCondition::Checkmate],
            castling_allowed: true,
            moves_per_turn: ByColor::splat(1),
            same_piece_can_move_twice: false,
            king_invincible: false,
            king_allowed_to_capture: true,
            goal_squares: ByColor::splat(None),
            promotion: PromotionRule::LastRank,
            promotable_kinds: Vec::new(),
            gravity: None,
            move_anywhere_unoccupied: false,
            legality: LegalityMode::PseudoLegal,
        }
    }
}

impl RuleConfiguration {
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn for_variant(variant: Variant) -> ConfigResult<Self> {
        variant.rules()
    }

    #[inline]
    pub fn dimensions(&self) -> usize {
        self.shape.len()
    }

    pub fn moves_per_turn_for(&self, color: PlayerColor) -> usize {
        self.moves_per_turn.get(color).copied().unwrap_or(0)
    }

    pub fn goal_square_for(&self, color: PlayerColor) -> Option<usize> {
        self.goal_squares.get(color).copied().flatten()
    }

    pub fn can_promote(&self, kind: PieceKind) -> bool {
        kind == PieceKind::Pawn || self.promotable_kinds.contains(&kind)
    }

    /// Checks every parameter and builds the board geometry.
    pub fn validate(&self) -> ConfigResult<Geometry> {
        let geometry = Geometry::new(&self.shape, &self.forward_dimensions, &self.wrapping)?;

        for color in PlayerColor::PLAYABLE {
            let count = self.moves_per_turn_for(color);
            if !(1..=MAX_MOVES_PER_TURN).contains(&count) {
                return Err(ConfigError::MovesPerTurnOutOfRange { color, count });
            }
            if let Some(square) = self.goal_square_for(color) {
                if square >= geometry.len() {
                    return Err(ConfigError::GoalSquareOutOfRange {
                        color,
                        square,
                        len: geometry.len(),
                    });
                }
            }
        }

        for condition in &self.win_conditions {
            match *condition {
                WinCondition::KingArrived => {
                    for color in PlayerColor::PLAYABLE {
                        if self.goal_square_for(color).is_none() {
                            return Err(ConfigError::MissingGoalSquare(color));
                        }
                    }
                }
                WinCondition::DiagonalRow { length } if length < 2 => {
                    return Err(ConfigError::DiagonalRowTooShort(length));
                }
                _ => {}
            }
        }

        if self.promotion == PromotionRule::AfterSteps(0) {
            return Err(ConfigError::ZeroPromotionSteps);
        }

        if let Some(gravity) = self.gravity {
            if gravity.dimension >= geometry.dimensions() {
                return Err(ConfigError::GravityDimensionOutOfRange {
                    dimension: gravity.dimension,
                    dimensions: geometry.dimensions(),
                });
            }
        }

        Ok(geometry)
    }

    // ===== Builder helpers used by the presets =====

    fn with_shape(mut self, shape: &[usize], forward: &[bool]) -> Self {
        self.shape = shape.to_vec();
        self.forward_dimensions = forward.to_vec();
        self.wrapping = vec![false; shape.len()];
        self
    }

    fn with_moves_per_turn(mut self, count: usize) -> Self {
        self.moves_per_turn = ByColor::splat(count);
        self
    }

    fn with_win_condition(mut self, condition: WinCondition) -> Self {
        self.win_conditions = vec![condition];
        self
    }

    fn with_gravity(mut self, dimension: usize, direction: GravityDirection) -> Self {
        self.gravity = Some(Gravity { dimension, direction });
        self
    }
}

/// Preset variants. Some are listed but rejected by [`Variant::rules`]
/// because the engine does not implement their special rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    Standard,
    CaptureTheFlag,
    LongRange,
    KingMarch,
    Standard10x10,
    Standard24x24,
    StandardDiamond,
    Sparse,
    Swap2,
    TwoMoves,
    TenMoves,
    TwoPlusOneMove,
    RandomStartingPosition,
    RandomSymmetricalStartingPosition,
    MorePawns,
    Gravity,
    MorePawnsGravity,
    NoRetreatingMoves,
    StartAsOpponent,
    AnythingCanPromote,
    MoveToAnySquare,
    ControlOpponentsKing,
    ThreeD5x5x5,
    ThreeD8x8x8,
    FourD3x3x3x3V1,
    FourD3x3x3x3V2,
    FourD3x3x3x3V3,
    FourD3x3x3x3V4,
    FourD4x4x4x4V1,
    FourD4x4x4x4V2,
    FourD8x8x8x8V1,
    FourD8x8x8x8V2,
    FiveD3x3x3x3x3,
    SixD2x2x2x2x2x2,
    SixD3x3x3x3x3x3,
    Wrapping10x10,
    Wrapping12x12,
    Wrapping8x14,
    ThreeDSphere,
    FourDSphere,
    HollowCube,
    Donut,
    Simultaneous,
    TowerDefense,
    Monster,
    CaptureAllPawns,
    ConnectSixDiagonally,
    RankSevenAndEight,
    KnightKing,
    PawnPromotion,
    PiecesTwoLives,
}

impl Variant {
    /// Parses a kebab-case name such as `"king-march"` or `"wrapping10x10"`.
    pub fn from_name(name: &str) -> ConfigResult<Variant> {
        serde_json::from_value(serde_json::Value::String(name.to_owned()))
            .map_err(|_| ConfigError::UnknownVariant(name.to_owned()))
    }

    /// Moves counted as already made in White's first turn.
    pub fn opening_moves_made(self) -> usize {
        match self {
            Variant::LongRange | Variant::TwoMoves => 1,
            Variant::TenMoves => 5,
            _ => 0,
        }
    }

    pub fn rules(self) -> ConfigResult<RuleConfiguration> {
        use GravityDirection::Positive;
        const F: bool = false;
        const T: bool = true;

        let standard = RuleConfiguration::default();
        let rules = match self {
            Variant::Standard | Variant::MorePawns | Variant::RankSevenAndEight => standard,
            Variant::CaptureTheFlag => standard.with_win_condition(WinCondition::FlagCaptured),
            Variant::CaptureAllPawns => standard.with_win_condition(WinCondition::AllPawnsCaptured),
            Variant::PawnPromotion => standard.with_win_condition(WinCondition::PawnPromoted),
            Variant::ConnectSixDiagonally => {
                standard.with_win_condition(WinCondition::DiagonalRow { length: 6 })
            }
            Variant::AnythingCanPromote => RuleConfiguration {
                promotable_kinds: vec![PieceKind::Rook, PieceKind::Knight, PieceKind::Bishop],
                ..standard
            },
            Variant::LongRange => RuleConfiguration {
                same_piece_can_move_twice: true,
                ..standard.with_shape(&[8, 12], &[F, T]).with_moves_per_turn(2)
            },
            Variant::TwoMoves => standard
                .with_moves_per_turn(2)
                .with_win_condition(WinCondition::KingCaptured),
            Variant::TenMoves => standard
                .with_moves_per_turn(10)
                .with_win_condition(WinCondition::KingCaptured),
            Variant::Standard10x10 => standard.with_shape(&[10, 10], &[F, T]),
            Variant::Standard24x24 => standard.with_shape(&[24, 24], &[F, T]),
            Variant::Sparse => standard.with_shape(&[17, 12], &[F, T]),
            Variant::KingMarch => RuleConfiguration {
                king_invincible: true,
                king_allowed_to_capture: false,
                goal_squares: ByColor::new(Some(60), Some(4)),
                ..standard.with_win_condition(WinCondition::KingArrived)
            },
            Variant::Gravity | Variant::MorePawnsGravity => standard.with_gravity(0, Positive),
            Variant::MoveToAnySquare => RuleConfiguration {
                move_anywhere_unoccupied: true,
                ..standard
            },
            Variant::ThreeD5x5x5 => standard.with_shape(&[5, 5, 5], &[F, T, F]),
            Variant::FourD3x3x3x3V1
            | Variant::FourD3x3x3x3V2
            | Variant::FourD3x3x3x3V3
            | Variant::FourD3x3x3x3V4 => standard.with_shape(&[3; 4], &[F, T, F, T]),
            Variant::FourD4x4x4x4V1 | Variant::FourD4x4x4x4V2 => {
                standard.with_shape(&[4; 4], &[F, T, F, T])
            }
            Variant::FourD8x8x8x8V2 => standard.with_shape(&[8; 4], &[F, T, F, T]),
            Variant::SixD2x2x2x2x2x2 => standard.with_shape(&[2; 6], &[F, T, F, T, F, T]),
            Variant::SixD3x3x3x3x3x3 => standard.with_shape(&[3; 6], &[F, T, F, T, F, T]),
            Variant::Wrapping10x10 => RuleConfiguration {
                wrapping: vec![T, T],
                ..standard.with_shape(&[10, 10], &[F, T])
            },
            Variant::Wrapping12x12 => RuleConfiguration {
                wrapping: vec![T, T],
                ..standard.with_shape(&[12, 12], &[F, T])
            },
            Variant::Wrapping8x14 => RuleConfiguration {
                wrapping: vec![F, T],
                promotion: PromotionRule::AfterSteps(7),
                ..standard.with_shape(&[8, 14], &[F, T])
            },
            unsupported => {
                return Err(ConfigError::UnsupportedVariant(format!("{unsupported:?}")));
            }
        };
        Ok(rules)
    }
}

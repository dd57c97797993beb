use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerColor {
    White,
    Black,
    Neutral,
}

impl PlayerColor {
    /// The two colours that take turns. Neutral pieces never move on their own.
    pub const PLAYABLE: [PlayerColor; 2] = [PlayerColor::White, PlayerColor::Black];

    #[inline]
    pub fn opponent(self) -> PlayerColor {
        match self {
            PlayerColor::White => PlayerColor::Black,
            PlayerColor::Black => PlayerColor::White,
            PlayerColor::Neutral => PlayerColor::Neutral,
        }
    }

    /// Playable colours other than `self`.
    pub fn opponents(self) -> impl Iterator<Item = PlayerColor> {
        Self::PLAYABLE.into_iter().filter(move |c| *c != self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    Rook,
    Knight,
    Bishop,
    King,
    Queen,
}

/// Advance direction of a pawn.
///
/// `Forward`/`Backward` advance along the forward dimensions of the board,
/// `LateralPositive`/`LateralNegative` along the lateral ones. The sign is
/// mirrored for black pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Facing {
    #[default]
    Forward,
    Backward,
    LateralPositive,
    LateralNegative,
}

impl Facing {
    /// True when this facing advances along the forward class of dimensions.
    #[inline]
    pub fn advances_along_forward(self) -> bool {
        matches!(self, Facing::Forward | Facing::Backward)
    }

    #[inline]
    pub fn sign(self) -> i32 {
        match self {
            Facing::Forward | Facing::LateralPositive => 1,
            Facing::Backward | Facing::LateralNegative => -1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: PlayerColor,
    #[serde(default)]
    pub facing: Facing,
    #[serde(default)]
    pub has_moved: bool,
    /// Signed distance travelled along the piece's promotion axes.
    #[serde(default)]
    pub advanced: i32,
}

impl Piece {
    pub fn new(kind: PieceKind, color: PlayerColor) -> Self {
        Piece {
            kind,
            color,
            facing: Facing::Forward,
            has_moved: false,
            advanced: 0,
        }
    }

    pub fn with_facing(mut self, facing: Facing) -> Self {
        self.facing = facing;
        self
    }

    #[inline]
    pub fn is_enemy_of(&self, color: PlayerColor) -> bool {
        self.color != color
    }

    /// Dimensions along which this piece is measured for promotion: the
    /// pawn's advance class, or the forward dimensions for any other kind.
    #[inline]
    pub fn promotion_axis(&self, dimension_is_forward: bool) -> bool {
        if self.kind == PieceKind::Pawn {
            self.facing.advances_along_forward() == dimension_is_forward
        } else {
            dimension_is_forward
        }
    }

    /// Direction of "ahead" for this piece along its promotion axes.
    #[inline]
    pub fn ahead_sign(&self) -> i32 {
        let sign = if self.kind == PieceKind::Pawn {
            self.facing.sign()
        } else {
            1
        };
        if self.color == PlayerColor::Black { -sign } else { sign }
    }

    /// Pawn step along a dimension, or `None` when the dimension is not in
    /// the pawn's advance class.
    #[inline]
    pub fn pawn_step(&self, dimension_is_forward: bool) -> Option<i32> {
        if self.facing.advances_along_forward() != dimension_is_forward {
            return None;
        }
        Some(self.ahead_sign())
    }
}

/// A value per playable colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ByColor<T> {
    pub white: T,
    pub black: T,
}

impl<T> ByColor<T> {
    pub fn new(white: T, black: T) -> Self {
        ByColor { white, black }
    }

    pub fn get(&self, color: PlayerColor) -> Option<&T> {
        match color {
            PlayerColor::White => Some(&self.white),
            PlayerColor::Black => Some(&self.black),
            PlayerColor::Neutral => None,
        }
    }

    pub fn get_mut(&mut self, color: PlayerColor) -> Option<&mut T> {
        match color {
            PlayerColor::White => Some(&mut self.white),
            PlayerColor::Black => Some(&mut self.black),
            PlayerColor::Neutral => None,
        }
    }
}

impl<T: Clone> ByColor<T> {
    pub fn splat(value: T) -> Self {
        ByColor {
            white: value.clone(),
            black: value,
        }
    }
}

use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::attacks::is_square_attacked;
use crate::board::Board;
use crate::error::{ConfigError, ConfigResult, MoveError, MoveResult};
use crate::geometry::Geometry;
use crate::gravity::relax;
use crate::moves::{EnPassantTarget, Move, MoveContext, PieceMoves, get_moves};
use crate::outcome::{GameOutcome, evaluate_outcome};
use crate::pieces::{ByColor, Piece, PieceKind, PlayerColor};
use crate::rules::{LegalityMode, PromotionRule, RuleConfiguration};

// ===== Turn history =====

/// Moves of each colour's current or most recent turn, one slot per move
/// the colour may make. Slots are overwritten turn after turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnHistory {
    slots: ByColor<Vec<Option<Move>>>,
}

impl TurnHistory {
    pub fn new(rules: &RuleConfiguration) -> Self {
        TurnHistory {
            slots: ByColor::new(
                vec![None; rules.moves_per_turn.white],
                vec![None; rules.moves_per_turn.black],
            ),
        }
    }

    fn record(&mut self, color: PlayerColor, slot: usize, mv: Move) {
        if let Some(entry) = self.slots.get_mut(color).and_then(|s| s.get_mut(slot)) {
            *entry = Some(mv);
        }
    }

    /// Points recorded destinations at `to` after a piece fell from `from`.
    fn follow(&mut self, from: usize, to: usize) {
        for slots in [&mut self.slots.white, &mut self.slots.black] {
            for mv in slots.iter_mut().flatten() {
                if mv.destination == from {
                    mv.destination = to;
                }
            }
        }
    }

    /// Every recorded move of `color`.
    pub fn moves_of(&self, color: PlayerColor) -> impl Iterator<Item = &Move> {
        self.slots
            .get(color)
            .into_iter()
            .flat_map(|s| s.iter().flatten())
    }

    /// The first `made` moves of `color`, i.e. the ones from the turn in progress.
    pub fn current_turn(&self, color: PlayerColor, made: usize) -> impl Iterator<Item = &Move> {
        self.slots
            .get(color)
            .into_iter()
            .flat_map(move |s| s.iter().take(made).flatten())
    }
}

// ===== Legality filters =====

/// Extra check on a candidate that already passed turn and candidate rules.
pub trait LegalityFilter {
    fn allows(&self, game: &GameState, mv: &Move) -> bool;
}

/// Accepts every candidate.
pub struct PseudoLegal;

/// Rejects moves after which the mover's king is attacked.
pub struct ForbidSelfCheck;

impl LegalityFilter for PseudoLegal {
    fn allows(&self, _game: &GameState, _mv: &Move) -> bool {
        true
    }
}

impl LegalityFilter for ForbidSelfCheck {
    fn allows(&self, game: &GameState, mv: &Move) -> bool {
        let Some(color) = game.board.get_piece(mv.origin).map(|p| p.color) else {
            return true;
        };
        let mut trial = game.clone();
        if trial.apply(mv, None).is_none() {
            return true;
        }
        match trial.board.find_king(color) {
            Some(king) => !is_square_attacked(&trial.board, &trial.geometry, king, color),
            None => true,
        }
    }
}

impl LegalityMode {
    pub fn filter(self) -> &'static dyn LegalityFilter {
        match self {
            LegalityMode::PseudoLegal => &PseudoLegal,
            LegalityMode::ForbidSelfCheck => &ForbidSelfCheck,
        }
    }
}

// ===== Game state =====

#[derive(Debug, Clone)]
pub struct GameState {
    pub board: Board,
    rules: RuleConfiguration,
    geometry: Geometry,
    pub turn: PlayerColor,
    pub moves_made_this_turn: usize,
    history: TurnHistory,
    last_mover: Option<PlayerColor>,
    last_move_promoted: bool,
    outcome: Option<GameOutcome>,
}

impl GameState {
    /// Starts a game with White to move. Fails if the rules are invalid or
    /// the board does not match their shape.
    pub fn new(rules: RuleConfiguration, board: Board) -> ConfigResult<Self> {
        let geometry = rules.validate()?;
        if board.len() != geometry.len() {
            return Err(ConfigError::BoardSizeMismatch {
                expected: geometry.len(),
                found: board.len(),
            });
        }
        Ok(GameState {
            board,
            history: TurnHistory::new(&rules),
            rules,
            geometry,
            turn: PlayerColor::White,
            moves_made_this_turn: 0,
            last_mover: None,
            last_move_promoted: false,
            outcome: None,
        })
    }

    /// Counts `made` moves of White's first turn as already played.
    pub fn with_moves_made(mut self, made: usize) -> ConfigResult<Self> {
        let quota = self.rules.moves_per_turn_for(self.turn);
        if made >= quota {
            return Err(ConfigError::OpeningMovesExceedQuota { made, quota });
        }
        self.moves_made_this_turn = made;
        Ok(self)
    }

    pub fn rules(&self) -> &RuleConfiguration {
        &self.rules
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn history(&self) -> &TurnHistory {
        &self.history
    }

    pub fn last_mover(&self) -> Option<PlayerColor> {
        self.last_mover
    }

    pub fn last_move_promoted(&self) -> bool {
        self.last_move_promoted
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    /// Pawns of `color`'s opponents that may be captured en passant.
    pub fn en_passant_targets(&self, color: PlayerColor) -> SmallVec<[EnPassantTarget; 4]> {
        color
            .opponents()
            .flat_map(|opponent| {
                self.history.moves_of(opponent).filter_map(move |m| {
                    m.pawn_double_step_through.map(|through| EnPassantTarget {
                        color: opponent,
                        through,
                        pawn_square: m.destination,
                    })
                })
            })
            .collect()
    }

    /// Candidate moves of the piece on `square` plus its diagonal threat squares.
    pub fn get_moves(&self, square: usize) -> PieceMoves {
        let Some(color) = self.board.get_piece(square).map(|p| p.color) else {
            return PieceMoves::default();
        };
        let targets = self.en_passant_targets(color);
        let ctx = MoveContext::new(&self.board, &self.rules, &self.geometry).with_en_passant(&targets);
        get_moves(&ctx, square)
    }

    /// [`GameState::get_moves`] with the configured legality filter applied.
    pub fn get_legal_moves(&self, square: usize) -> PieceMoves {
        let mut moves = self.get_moves(square);
        let filter = self.rules.legality.filter();
        moves.moves.retain(|m| filter.allows(self, m));
        moves
    }

    /// Checks a player's selection against turn order, the per-turn rules and
    /// the candidates generated for `origin`.
    pub fn validate_selected_move(&self, origin: usize, destination: usize, candidates: &PieceMoves) -> MoveResult<Move> {
        let result = self.check_selection(origin, destination, candidates);
        if let Err(reason) = &result {
            debug!(origin, destination, %reason, "move rejected");
        }
        result
    }

    fn check_selection(&self, origin: usize, destination: usize, candidates: &PieceMoves) -> MoveResult<Move> {
        if self.outcome.is_some() {
            return Err(MoveError::GameOver);
        }
        if origin >= self.board.len() {
            return Err(MoveError::OutOfRange(origin));
        }
        if !self.board.is_on_board(destination) {
            return Err(MoveError::OutOfRange(destination));
        }
        let piece = self.board.get_piece(origin).ok_or(MoveError::NoPiece(origin))?;
        if piece.color != self.turn {
            return Err(MoveError::NotYourTurn {
                square: origin,
                owner: piece.color,
                turn: self.turn,
            });
        }

        if !self.rules.same_piece_can_move_twice && self.rules.moves_per_turn_for(piece.color) > 1 {
            let already_moved = self
                .history
                .current_turn(piece.color, self.moves_made_this_turn)
                .any(|m| m.destination == origin);
            if already_moved {
                return Err(MoveError::PieceAlreadyMoved(origin));
            }
        }

        let mv = *candidates
            .moves
            .iter()
            .find(|m| m.origin == origin && m.destination == destination)
            .ok_or(MoveError::NotACandidate { origin, destination })?;

        if !self.rules.legality.filter().allows(self, &mv) {
            return Err(MoveError::LeavesKingAttacked { origin, destination });
        }
        Ok(mv)
    }

    /// Signed distance a move covers along the piece's promotion axes,
    /// counted positive towards the piece's far side.
    fn advance_delta(&self, piece: &Piece, origin: usize, destination: usize) -> i32 {
        let from = self.geometry.index_to_coord(origin);
        let to = self.geometry.index_to_coord(destination);
        let mut delta = 0;
        for dim in 0..self.geometry.dimensions() {
            if !piece.promotion_axis(self.geometry.is_forward(dim)) {
                continue;
            }
            let extent = self.geometry.extent(dim);
            let mut diff = to[dim] - from[dim];
            if self.geometry.wraps(dim) {
                // Shortest way round.
                if diff > extent / 2 {
                    diff -= extent;
                } else if diff < -(extent / 2) {
                    diff += extent;
                }
            }
            delta += diff;
        }
        delta * piece.ahead_sign()
    }

    /// Whether moving the piece on `origin` to `destination` promotes it.
    pub fn evaluate_promotion(&self, origin: usize, destination: usize) -> bool {
        let Some(piece) = self.board.get_piece(origin) else {
            return false;
        };
        if !self.rules.can_promote(piece.kind) || destination >= self.geometry.len() {
            return false;
        }

        match self.rules.promotion {
            PromotionRule::Disabled => false,
            PromotionRule::LastRank => {
                let coord = self.geometry.index_to_coord(destination);
                let far_positive = piece.ahead_sign() > 0;
                let mut relevant = false;
                for dim in 0..self.geometry.dimensions() {
                    if !piece.promotion_axis(self.geometry.is_forward(dim)) {
                        continue;
                    }
                    relevant = true;
                    let far = if far_positive { self.geometry.extent(dim) - 1 } else { 0 };
                    if coord[dim] != far {
                        return false;
                    }
                }
                relevant
            }
            PromotionRule::AfterSteps(steps) => {
                piece.advanced + self.advance_delta(piece, origin, destination) >= steps as i32
            }
        }
    }

    /// Moves the piece and applies every side effect. Returns the square the
    /// moved piece ended on, or `None` if there was no piece on the origin.
    fn apply(&mut self, mv: &Move, promotion: Option<PieceKind>) -> Option<usize> {
        let mut piece = *self.board.get_piece(mv.origin)?;
        let en_passant = self.en_passant_targets(piece.color);

        piece.advanced += self.advance_delta(&piece, mv.origin, mv.destination);
        piece.has_moved = true;
        self.board.remove_piece(mv.origin);
        self.board.set_piece(mv.destination, piece);
        let mut landed = mv.destination;
        self.settle(&mut landed);

        let mut side_effect = false;
        if piece.kind == PieceKind::Pawn && mv.is_en_passant_capture {
            let mut captured = false;
            for target in en_passant.iter().filter(|t| t.through == mv.destination) {
                let is_pawn = self
                    .board
                    .get_piece(target.pawn_square)
                    .is_some_and(|p| p.kind == PieceKind::Pawn && p.color == target.color);
                if is_pawn {
                    self.board.remove_piece(target.pawn_square);
                    captured = true;
                }
            }
            if !captured {
                warn!(destination = mv.destination, "en passant capture found no pawn to remove");
            }
            side_effect = captured;
        }

        if piece.kind == PieceKind::King {
            if let Some(castling) = mv.castling {
                if let Some(mut rook) = self.board.remove_piece(castling.from) {
                    rook.has_moved = true;
                    self.board.set_piece(castling.to, rook);
                    side_effect = true;
                }
            }
        }

        if side_effect {
            self.settle(&mut landed);
        }

        self.last_move_promoted = false;
        if let Some(kind) = promotion {
            if let Some(moved) = self.board.get_piece_mut(landed) {
                moved.kind = kind;
                self.last_move_promoted = true;
            }
        }

        Some(landed)
    }

    /// Runs gravity, following the piece on `tracked` and the pieces in
    /// the turn history if they fall.
    fn settle(&mut self, tracked: &mut usize) {
        let Some(gravity) = self.rules.gravity else {
            return;
        };
        for (from, to) in relax(&mut self.board, &self.geometry, gravity) {
            if from == *tracked {
                *tracked = to;
            }
            self.history.follow(from, to);
        }
    }

    /// Commits a validated move. `promotion` replaces the moved piece's kind;
    /// callers decide it with [`GameState::evaluate_promotion`].
    pub fn make_move(&mut self, mv: &Move, promotion: Option<PieceKind>) -> MoveResult<()> {
        if !self.board.is_on_board(mv.destination) {
            return Err(MoveError::OutOfRange(mv.destination));
        }
        let mover = self.turn;
        let landed = self.apply(mv, promotion).ok_or(MoveError::NoPiece(mv.origin))?;

        // History tracks where the piece came to rest.
        let recorded = Move {
            destination: landed,
            ..*mv
        };
        self.history.record(mover, self.moves_made_this_turn, recorded);
        self.last_mover = Some(mover);
        self.moves_made_this_turn += 1;
        if self.moves_made_this_turn >= self.rules.moves_per_turn_for(mover) {
            self.turn = mover.opponent();
            self.moves_made_this_turn = 0;
        }

        debug!(
            origin = mv.origin,
            destination = mv.destination,
            landed,
            en_passant = mv.is_en_passant_capture,
            castling = mv.castling.is_some(),
            promotion = ?promotion,
            turn = ?self.turn,
            "move made"
        );
        Ok(())
    }

    /// Checks the configured win conditions after a move. True when the
    /// game is over; the side that just moved has won.
    pub fn evaluate_win_conditions(&mut self) -> bool {
        if self.outcome.is_none() {
            self.outcome = evaluate_outcome(self);
        }
        self.outcome.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{Gravity, GravityDirection, Variant};
    use crate::setup::standard_board;

    fn standard() -> GameState {
        GameState::new(RuleConfiguration::default(), standard_board()).unwrap()
    }

    fn play(game: &mut GameState, origin: usize, destination: usize) {
        let candidates = game.get_moves(origin);
        let mv = game.validate_selected_move(origin, destination, &candidates).unwrap();
        let promotion = game.evaluate_promotion(origin, destination).then_some(PieceKind::Queen);
        game.make_move(&mv, promotion).unwrap();
    }

    #[test]
    fn turn_passes_after_quota() {
        let mut game = standard();
        play(&mut game, 12, 28);
        assert_eq!(game.turn, PlayerColor::Black);
        assert_eq!(game.moves_made_this_turn, 0);
        assert_eq!(game.last_mover(), Some(PlayerColor::White));
    }

    #[test]
    fn wrong_color_and_empty_square_rejected() {
        let game = standard();
        let candidates = game.get_moves(52);
        assert_eq!(
            game.validate_selected_move(52, 44, &candidates),
            Err(MoveError::NotYourTurn {
                square: 52,
                owner: PlayerColor::Black,
                turn: PlayerColor::White
            })
        );
        assert_eq!(
            game.validate_selected_move(30, 38, &PieceMoves::default()),
            Err(MoveError::NoPiece(30))
        );
        assert_eq!(
            game.validate_selected_move(99, 38, &PieceMoves::default()),
            Err(MoveError::OutOfRange(99))
        );
        let candidates = game.get_moves(12);
        assert_eq!(
            game.validate_selected_move(12, 36, &candidates),
            Err(MoveError::NotACandidate { origin: 12, destination: 36 })
        );
    }

    #[test]
    fn same_piece_cannot_move_twice() {
        let rules = RuleConfiguration::for_variant(Variant::TwoMoves).unwrap();
        let mut game = GameState::new(rules, standard_board()).unwrap();
        play(&mut game, 12, 20);
        assert_eq!(game.turn, PlayerColor::White);
        let candidates = game.get_moves(20);
        assert_eq!(
            game.validate_selected_move(20, 28, &candidates),
            Err(MoveError::PieceAlreadyMoved(20))
        );
        play(&mut game, 11, 19);
        assert_eq!(game.turn, PlayerColor::Black);
    }

    #[test]
    fn opening_handicap_is_bounded_by_quota() {
        let rules = RuleConfiguration::for_variant(Variant::TenMoves).unwrap();
        let game = GameState::new(rules, standard_board()).unwrap();
        let game = game.with_moves_made(Variant::TenMoves.opening_moves_made()).unwrap();
        assert_eq!(game.moves_made_this_turn, 5);
        assert!(matches!(
            standard().with_moves_made(1),
            Err(ConfigError::OpeningMovesExceedQuota { made: 1, quota: 1 })
        ));
    }

    #[test]
    fn board_size_must_match_shape() {
        assert!(matches!(
            GameState::new(RuleConfiguration::default(), Board::new(63)),
            Err(ConfigError::BoardSizeMismatch { expected: 64, found: 63 })
        ));
    }

    #[test]
    fn last_rank_promotion() {
        let mut board = Board::new(64);
        let mut pawn = Piece::new(PieceKind::Pawn, PlayerColor::White);
        pawn.has_moved = true;
        board.set_piece(52, pawn);
        board.set_piece(11, Piece::new(PieceKind::Pawn, PlayerColor::Black));
        board.set_piece(13, Piece::new(PieceKind::Rook, PlayerColor::White));
        let game = GameState::new(RuleConfiguration::default(), board).unwrap();
        assert!(game.evaluate_promotion(52, 60));
        assert!(!game.evaluate_promotion(52, 44));
        assert!(game.evaluate_promotion(11, 3));
        assert!(!game.evaluate_promotion(13, 61));
    }

    #[test]
    fn anything_can_promote_measures_forward_dimensions() {
        let rules = RuleConfiguration::for_variant(Variant::AnythingCanPromote).unwrap();
        let mut board = Board::new(64);
        board.set_piece(13, Piece::new(PieceKind::Rook, PlayerColor::White));
        board.set_piece(50, Piece::new(PieceKind::Knight, PlayerColor::Black));
        board.set_piece(20, Piece::new(PieceKind::Queen, PlayerColor::White));
        let game = GameState::new(rules, board).unwrap();
        assert!(game.evaluate_promotion(13, 61));
        assert!(game.evaluate_promotion(50, 1));
        assert!(!game.evaluate_promotion(20, 60));
    }

    #[test]
    fn promotion_after_steps_counts_wrapping_advances() {
        let rules = RuleConfiguration::for_variant(Variant::Wrapping8x14).unwrap();
        let mut board = Board::new(8 * 14);
        board.set_piece(8 * 12, Piece::new(PieceKind::Pawn, PlayerColor::White));
        board.set_piece(8 * 13 + 7, Piece::new(PieceKind::King, PlayerColor::Black));
        let mut game = GameState::new(rules, board).unwrap();

        // Double step from rank 12 wraps to rank 0.
        play(&mut game, 96, 0);
        assert_eq!(game.board.get_piece(0).unwrap().advanced, 2);
        play(&mut game, 111, 103);

        let mut square = 0;
        for _ in 0..4 {
            play(&mut game, square, square + 8);
            square += 8;
            let king = game.board.find_king(PlayerColor::Black).unwrap();
            let next = if king == 103 { 111 } else { 103 };
            play(&mut game, king, next);
        }
        assert_eq!(game.board.get_piece(square).unwrap().advanced, 6);
        assert!(game.evaluate_promotion(square, square + 8));
        assert!(!game.evaluate_promotion(square, square + 1));
    }

    #[test]
    fn promotion_changes_kind_and_is_remembered() {
        let mut board = Board::new(64);
        let mut pawn = Piece::new(PieceKind::Pawn, PlayerColor::White);
        pawn.has_moved = true;
        board.set_piece(48, pawn);
        let mut game = GameState::new(RuleConfiguration::default(), board).unwrap();
        play(&mut game, 48, 56);
        assert_eq!(game.board.get_piece(56).unwrap().kind, PieceKind::Queen);
        assert!(game.last_move_promoted());
    }

    #[test]
    fn castling_moves_the_rook() {
        let mut board = Board::new(64);
        board.set_piece(4, Piece::new(PieceKind::King, PlayerColor::White));
        board.set_piece(7, Piece::new(PieceKind::Rook, PlayerColor::White));
        board.set_piece(60, Piece::new(PieceKind::King, PlayerColor::Black));
        let mut game = GameState::new(RuleConfiguration::default(), board).unwrap();
        play(&mut game, 4, 6);
        assert_eq!(game.board.get_piece(6).unwrap().kind, PieceKind::King);
        let rook = game.board.get_piece(5).unwrap();
        assert_eq!(rook.kind, PieceKind::Rook);
        assert!(rook.has_moved);
        assert!(game.board.get_piece(7).is_none());
    }

    #[test]
    fn gravity_follows_the_moved_piece() {
        let rules = RuleConfiguration::for_variant(Variant::Gravity).unwrap();
        let mut board = Board::new(64);
        board.set_piece(7, Piece::new(PieceKind::King, PlayerColor::White));
        board.set_piece(63, Piece::new(PieceKind::King, PlayerColor::Black));
        board.set_piece(31, Piece::new(PieceKind::Rook, PlayerColor::White));
        let mut game = GameState::new(rules, board).unwrap();
        play(&mut game, 31, 26);
        assert!(game.board.get_piece(26).is_none());
        assert_eq!(game.board.get_piece(31).unwrap().kind, PieceKind::Rook);
        assert!(game.board.get_piece(31).unwrap().has_moved);
    }

    #[test]
    fn destination_off_the_board_is_refused() {
        let mut game = standard();
        let candidates = game.get_moves(12);
        assert_eq!(
            game.validate_selected_move(12, 64, &candidates),
            Err(MoveError::OutOfRange(64))
        );
        assert_eq!(
            game.make_move(&Move::new(12, 64), None),
            Err(MoveError::OutOfRange(64))
        );
        assert_eq!(game.board.get_piece(12).unwrap().kind, PieceKind::Pawn);
        assert_eq!(game.turn, PlayerColor::White);

        game.board.set_hole(40);
        assert_eq!(
            game.make_move(&Move::new(12, 40), None),
            Err(MoveError::OutOfRange(40))
        );
        assert_eq!(game.board.pieces().count(), 32);
    }

    #[test]
    fn history_records_where_a_falling_piece_rests() {
        let rules = RuleConfiguration {
            gravity: Some(Gravity {
                dimension: 0,
                direction: GravityDirection::Positive,
            }),
            moves_per_turn: ByColor::splat(2),
            ..RuleConfiguration::default()
        };
        let mut board = Board::new(64);
        board.set_piece(7, Piece::new(PieceKind::King, PlayerColor::White));
        board.set_piece(63, Piece::new(PieceKind::King, PlayerColor::Black));
        board.set_piece(24, Piece::new(PieceKind::Rook, PlayerColor::White));
        let mut game = GameState::new(rules, board).unwrap();

        play(&mut game, 24, 26);
        assert_eq!(game.board.get_piece(31).unwrap().kind, PieceKind::Rook);
        let recorded: Vec<_> = game.history().moves_of(PlayerColor::White).map(|m| m.destination).collect();
        assert_eq!(recorded, vec![31]);

        let candidates = game.get_moves(31);
        assert_eq!(
            game.validate_selected_move(31, 39, &candidates),
            Err(MoveError::PieceAlreadyMoved(31))
        );
    }

    #[test]
    fn self_check_filter_rejects_pinned_piece() {
        let rules = RuleConfiguration {
            legality: LegalityMode::ForbidSelfCheck,
            ..RuleConfiguration::default()
        };
        let mut board = Board::new(64);
        board.set_piece(4, Piece::new(PieceKind::King, PlayerColor::White));
        board.set_piece(12, Piece::new(PieceKind::Rook, PlayerColor::White));
        board.set_piece(60, Piece::new(PieceKind::Rook, PlayerColor::Black));
        board.set_piece(63, Piece::new(PieceKind::King, PlayerColor::Black));
        let game = GameState::new(rules, board).unwrap();

        let candidates = game.get_moves(12);
        assert_eq!(
            game.validate_selected_move(12, 13, &candidates),
            Err(MoveError::LeavesKingAttacked { origin: 12, destination: 13 })
        );
        assert!(game.validate_selected_move(12, 20, &candidates).is_ok());
        assert!(game.get_legal_moves(12).find(13).is_none());
        assert!(game.get_legal_moves(12).find(60).is_some());
    }
}

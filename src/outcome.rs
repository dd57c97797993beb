use serde::{Deserialize, Serialize};
use tracing::info;

use crate::attacks::is_square_attacked;
use crate::board::Board;
use crate::game::GameState;
use crate::geometry::Geometry;
use crate::moves::{MoveContext, PieceMoves};
use crate::pieces::{PieceKind, PlayerColor};
use crate::rules::{RuleConfiguration, WinCondition};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    pub winner: PlayerColor,
    pub condition: WinCondition,
}

/// First configured win condition satisfied after the last move, if any.
/// The side that just moved is the winner.
pub fn evaluate_outcome(game: &GameState) -> Option<GameOutcome> {
    let mover = game.last_mover()?;
    let board = &game.board;
    let rules = game.rules();
    let geometry = game.geometry();

    let condition = rules.win_conditions.iter().copied().find(|condition| {
        let judged = if condition.judges_mover() { mover } else { mover.opponent() };
        match *condition {
            WinCondition::Checkmate => is_checkmated(board, rules, geometry, judged),
            WinCondition::KingCaptured => board.find_king(judged).is_none(),
            WinCondition::KingArrived => rules
                .goal_square_for(judged)
                .and_then(|goal| board.get_piece(goal))
                .is_some_and(|p| p.kind == PieceKind::King && p.color == judged),
            WinCondition::FlagCaptured => board.pieces_of(judged).any(|(index, _)| {
                board
                    .square(index)
                    .is_some_and(|s| s.has_flag_of(judged.opponent()))
            }),
            WinCondition::AllPawnsCaptured => board.count(judged, PieceKind::Pawn) == 0,
            WinCondition::PawnPromoted => game.last_move_promoted(),
            WinCondition::DiagonalRow { length } => has_diagonal_row(board, geometry, judged, length),
            WinCondition::EverythingCaptured => board.pieces_of(judged).next().is_none(),
        }
    })?;

    info!(winner = ?mover, ?condition, "game over");
    Some(GameOutcome {
        winner: mover,
        condition,
    })
}

/// King attacked and every square it could step to attacked as well.
///
/// Interposing or capturing the attacker is not considered, and the king is
/// left on its square while its destinations are checked. A side with no
/// king counts as mated.
pub fn is_checkmated(board: &Board, rules: &RuleConfiguration, geometry: &Geometry, color: PlayerColor) -> bool {
    let Some(king_square) = board.find_king(color) else {
        return true;
    };
    if !is_square_attacked(board, geometry, king_square, color) {
        return false;
    }

    let Some(king) = board.get_piece(king_square) else {
        return true;
    };
    let ctx = MoveContext::new(board, rules, geometry).without_castling();
    let mut escapes = PieceMoves::default();
    PieceKind::King.generator().generate(&ctx, king_square, king, &mut escapes);

    escapes
        .destinations()
        .all(|square| is_square_attacked(board, geometry, square, color))
}

/// `length` pieces of `color` in an unbroken line along a diagonal of some
/// dimension pair.
fn has_diagonal_row(board: &Board, geometry: &Geometry, color: PlayerColor, length: usize) -> bool {
    let own = |index: usize| board.get_piece(index).is_some_and(|p| p.color == color);

    for (start, _) in board.pieces_of(color) {
        for (a, b) in geometry.dimension_pairs() {
            for sb in [1, -1] {
                let steps = [(a, 1), (b, sb)];
                let mut coord = geometry.index_to_coord(start);
                let mut run = 1;
                while run < length && geometry.step_many(&mut coord, &steps) {
                    let index = geometry.coord_to_index(&coord);
                    if index == start || !own(index) {
                        break;
                    }
                    run += 1;
                }
                if run >= length {
                    return true;
                }
            }
        }
    }
    false
}

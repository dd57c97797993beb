use crate::board::Board;
use crate::geometry::Geometry;
use crate::moves::pawn_capture_squares;
use crate::pieces::{PieceKind, PlayerColor};

const SIGNS: [i32; 2] = [1, -1];

/// True if any piece not belonging to `defender` threatens `square`.
///
/// Looks outward from the target: along every diagonal of every dimension
/// pair, along every axis, and at every knight leap. A ray stops at the
/// first piece, at a hole, at the edge, or when it wraps back to the start.
pub fn is_square_attacked(board: &Board, geometry: &Geometry, square: usize, defender: PlayerColor) -> bool {
    let start = geometry.index_to_coord(square);

    // 1. Diagonals: bishops and queens at range, kings and pawns adjacent
    for (a, b) in geometry.dimension_pairs() {
        for sa in SIGNS {
            for sb in SIGNS {
                let steps = [(a, sa), (b, sb)];
                let mut coord = start.clone();
                let mut distance = 0;
                while geometry.step_many(&mut coord, &steps) {
                    distance += 1;
                    let index = geometry.coord_to_index(&coord);
                    if index == square || !board.is_on_board(index) {
                        break;
                    }
                    let Some(piece) = board.get_piece(index) else {
                        continue;
                    };
                    if piece.color != defender {
                        let hit = match piece.kind {
                            PieceKind::Bishop | PieceKind::Queen => true,
                            PieceKind::King => distance == 1,
                            PieceKind::Pawn => {
                                distance == 1 && pawn_capture_squares(geometry, index, piece).contains(&square)
                            }
                            _ => false,
                        };
                        if hit {
                            return true;
                        }
                    }
                    break;
                }
            }
        }
    }

    // 2. Axes: rooks and queens at range, kings adjacent
    for dim in 0..geometry.dimensions() {
        for sign in SIGNS {
            let mut coord = start.clone();
            let mut distance = 0;
            while geometry.step(&mut coord, dim, sign) {
                distance += 1;
                let index = geometry.coord_to_index(&coord);
                if index == square || !board.is_on_board(index) {
                    break;
                }
                let Some(piece) = board.get_piece(index) else {
                    continue;
                };
                if piece.color != defender {
                    let hit = match piece.kind {
                        PieceKind::Rook | PieceKind::Queen => true,
                        PieceKind::King => distance == 1,
                        _ => false,
                    };
                    if hit {
                        return true;
                    }
                }
                break;
            }
        }
    }

    // 3. Knight leaps
    for (a, b) in geometry.ordered_dimension_pairs() {
        for sa in SIGNS {
            for sb in SIGNS {
                let Some(index) = geometry.offset(square, &[(a, 2 * sa), (b, sb)]) else {
                    continue;
                };
                if !board.is_on_board(index) {
                    continue;
                }
                if board
                    .get_piece(index)
                    .is_some_and(|p| p.kind == PieceKind::Knight && p.color != defender)
                {
                    return true;
                }
            }
        }
    }

    false
}

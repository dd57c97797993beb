use smallvec::SmallVec;

use crate::board::Board;
use crate::geometry::Geometry;
use crate::rules::Gravity;

/// Pieces that fell, as `(from, to)` pairs.
pub type Relocations = SmallVec<[(usize, usize); 8]>;

/// Lets every piece fall along the gravity axis until it rests on another
/// piece, a hole, or the edge of the board.
///
/// Each lane (all coordinates fixed except the gravity dimension) is
/// compacted independently, starting from the edge pieces fall towards.
pub fn relax(board: &mut Board, geometry: &Geometry, gravity: Gravity) -> Relocations {
    let dim = gravity.dimension;
    let extent = geometry.extent(dim);
    let toward = gravity.direction.sign();
    let edge = if toward > 0 { extent - 1 } else { 0 };

    let mut relocations = Relocations::new();
    for lane_start in 0..geometry.len() {
        let mut coord = geometry.index_to_coord(lane_start);
        if coord[dim] != edge {
            continue;
        }

        // Next free resting place, walking away from the edge.
        let mut floor = None;
        for position in (0..extent).map(|k| edge - toward * k) {
            coord[dim] = position;
            let index = geometry.coord_to_index(&coord);
            if !board.is_on_board(index) {
                floor = None;
                continue;
            }
            match board.get_piece(index) {
                None => {
                    floor.get_or_insert(index);
                }
                Some(_) => {
                    if let Some(target) = floor {
                        if let Some(piece) = board.remove_piece(index) {
                            board.set_piece(target, piece);
                            relocations.push((index, target));
                        }
                        // The square just above the landing spot is free next.
                        let mut above = geometry.index_to_coord(target);
                        above[dim] -= toward;
                        floor = Some(geometry.coord_to_index(&above));
                    }
                }
            }
        }
    }
    relocations
}

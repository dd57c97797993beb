use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::trace;

use crate::attacks::is_square_attacked;
use crate::board::Board;
use crate::geometry::{Coordinate, Geometry};
use crate::pieces::{Piece, PieceKind, PlayerColor};
use crate::rules::RuleConfiguration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CastlingRook {
    pub from: usize,
    pub to: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub origin: usize,
    pub destination: usize,
    /// Square a pawn skipped over with a double step.
    pub pawn_double_step_through: Option<usize>,
    pub is_en_passant_capture: bool,
    pub castling: Option<CastlingRook>,
}

impl Move {
    pub fn new(origin: usize, destination: usize) -> Self {
        Move {
            origin,
            destination,
            pawn_double_step_through: None,
            is_en_passant_capture: false,
            castling: None,
        }
    }
}

pub type MoveList = SmallVec<[Move; 16]>;

/// Candidates for one piece plus the diagonal squares a pawn threatens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PieceMoves {
    pub moves: MoveList,
    pub threatened: SmallVec<[usize; 8]>,
}

impl PieceMoves {
    pub fn find(&self, destination: usize) -> Option<&Move> {
        self.moves.iter().find(|m| m.destination == destination)
    }

    pub fn destinations(&self) -> impl Iterator<Item = usize> + '_ {
        self.moves.iter().map(|m| m.destination)
    }
}

/// A pawn that just double-stepped and may be taken en passant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnPassantTarget {
    pub color: PlayerColor,
    pub through: usize,
    pub pawn_square: usize,
}

/// Read-only view of everything move generation depends on.
#[derive(Clone, Copy)]
pub struct MoveContext<'a> {
    pub board: &'a Board,
    pub rules: &'a RuleConfiguration,
    pub geometry: &'a Geometry,
    pub en_passant: &'a [EnPassantTarget],
    pub include_castling: bool,
}

impl<'a> MoveContext<'a> {
    pub fn new(board: &'a Board, rules: &'a RuleConfiguration, geometry: &'a Geometry) -> Self {
        MoveContext {
            board,
            rules,
            geometry,
            en_passant: &[],
            include_castling: rules.castling_allowed,
        }
    }

    pub fn with_en_passant(mut self, targets: &'a [EnPassantTarget]) -> Self {
        self.en_passant = targets;
        self
    }

    pub fn without_castling(mut self) -> Self {
        self.include_castling = false;
        self
    }

    /// Pushes a move to `destination` if it is on the board, not the origin,
    /// and either empty or held by a piece of another colour. Returns true
    /// when the square was empty, so a ray may continue.
    fn try_land(&self, origin: usize, destination: usize, color: PlayerColor, out: &mut PieceMoves) -> bool {
        if destination == origin || !self.board.is_on_board(destination) {
            return false;
        }
        match self.board.get_piece(destination) {
            None => {
                out.moves.push(Move::new(origin, destination));
                true
            }
            Some(target) => {
                if target.is_enemy_of(color) {
                    out.moves.push(Move::new(origin, destination));
                }
                false
            }
        }
    }

    fn slide(&self, origin: usize, color: PlayerColor, steps: &[(usize, i32)], out: &mut PieceMoves) {
        let mut coord = self.geometry.index_to_coord(origin);
        while self.geometry.step_many(&mut coord, steps) {
            let index = self.geometry.coord_to_index(&coord);
            if !self.try_land(origin, index, color, out) {
                break;
            }
        }
    }

    fn leap(&self, origin: usize, color: PlayerColor, steps: &[(usize, i32)], out: &mut PieceMoves) {
        if let Some(index) = self.geometry.offset(origin, steps) {
            self.try_land(origin, index, color, out);
        }
    }
}

// ===== Per-kind generators =====

pub trait MoveGenerator {
    fn generate(&self, ctx: &MoveContext<'_>, origin: usize, piece: &Piece, out: &mut PieceMoves);
}

pub struct PawnMoves;
pub struct RookMoves;
pub struct KnightMoves;
pub struct BishopMoves;
pub struct KingMoves;
pub struct QueenMoves;

impl PieceKind {
    pub fn generator(self) -> &'static dyn MoveGenerator {
        match self {
            PieceKind::Pawn => &PawnMoves,
            PieceKind::Rook => &RookMoves,
            PieceKind::Knight => &KnightMoves,
            PieceKind::Bishop => &BishopMoves,
            PieceKind::King => &KingMoves,
            PieceKind::Queen => &QueenMoves,
        }
    }
}

const SIGNS: [i32; 2] = [1, -1];

impl MoveGenerator for RookMoves {
    fn generate(&self, ctx: &MoveContext<'_>, origin: usize, piece: &Piece, out: &mut PieceMoves) {
        for dim in 0..ctx.geometry.dimensions() {
            for sign in SIGNS {
                ctx.slide(origin, piece.color, &[(dim, sign)], out);
            }
        }
    }
}

impl MoveGenerator for BishopMoves {
    fn generate(&self, ctx: &MoveContext<'_>, origin: usize, piece: &Piece, out: &mut PieceMoves) {
        for (a, b) in ctx.geometry.dimension_pairs() {
            for sa in SIGNS {
                for sb in SIGNS {
                    ctx.slide(origin, piece.color, &[(a, sa), (b, sb)], out);
                }
            }
        }
    }
}

impl MoveGenerator for QueenMoves {
    fn generate(&self, ctx: &MoveContext<'_>, origin: usize, piece: &Piece, out: &mut PieceMoves) {
        RookMoves.generate(ctx, origin, piece, out);
        BishopMoves.generate(ctx, origin, piece, out);
    }
}

impl MoveGenerator for KnightMoves {
    fn generate(&self, ctx: &MoveContext<'_>, origin: usize, piece: &Piece, out: &mut PieceMoves) {
        for (a, b) in ctx.geometry.ordered_dimension_pairs() {
            for sa in SIGNS {
                for sb in SIGNS {
                    ctx.leap(origin, piece.color, &[(a, 2 * sa), (b, sb)], out);
                }
            }
        }
    }
}

/// Single-step king offsets. On 2-D boards these are all eight neighbours,
/// on other boards only axis steps.
pub fn king_steps(geometry: &Geometry) -> SmallVec<[SmallVec<[(usize, i32); 2]>; 32]> {
    let mut steps = SmallVec::new();
    let dimensions = geometry.dimensions();
    for dim in 0..dimensions {
        for sign in SIGNS {
            steps.push(smallvec::smallvec![(dim, sign)]);
        }
    }
    if dimensions == 2 {
        for sa in SIGNS {
            for sb in SIGNS {
                steps.push(smallvec::smallvec![(0, sa), (1, sb)]);
            }
        }
    }
    steps
}

impl MoveGenerator for KingMoves {
    fn generate(&self, ctx: &MoveContext<'_>, origin: usize, piece: &Piece, out: &mut PieceMoves) {
        for steps in king_steps(ctx.geometry) {
            let Some(index) = ctx.geometry.offset(origin, &steps) else {
                continue;
            };
            if index == origin || !ctx.board.is_on_board(index) {
                continue;
            }
            match ctx.board.get_piece(index) {
                None => out.moves.push(Move::new(origin, index)),
                Some(target) if target.is_enemy_of(piece.color) && ctx.rules.king_allowed_to_capture => {
                    out.moves.push(Move::new(origin, index))
                }
                Some(_) => {}
            }
        }

        if ctx.include_castling && !piece.has_moved {
            generate_castling_moves(ctx, origin, piece, out);
        }
    }
}

/// Squares reached by one pawn step, one per dimension of the pawn's advance class.
fn pawn_advances(geometry: &Geometry, origin: usize, piece: &Piece) -> SmallVec<[(usize, i32, Coordinate); 4]> {
    let start = geometry.index_to_coord(origin);
    let mut advances = SmallVec::new();
    for dim in 0..geometry.dimensions() {
        let Some(delta) = piece.pawn_step(geometry.is_forward(dim)) else {
            continue;
        };
        let mut coord = start.clone();
        if geometry.step(&mut coord, dim, delta) {
            advances.push((dim, delta, coord));
        }
    }
    advances
}

/// Diagonal capture squares: one advance step plus one step either way in
/// every dimension of the other class.
fn pawn_diagonals(geometry: &Geometry, piece: &Piece, advanced: &Coordinate, out: &mut SmallVec<[usize; 8]>) {
    for dim in 0..geometry.dimensions() {
        if piece.pawn_step(geometry.is_forward(dim)).is_some() {
            continue;
        }
        for sign in SIGNS {
            let mut coord = advanced.clone();
            if geometry.step(&mut coord, dim, sign) {
                out.push(geometry.coord_to_index(&coord));
            }
        }
    }
}

/// Every square a pawn on `origin` could capture on, occupied or not.
pub fn pawn_capture_squares(geometry: &Geometry, origin: usize, piece: &Piece) -> SmallVec<[usize; 8]> {
    let mut squares = SmallVec::new();
    for (_, _, coord) in pawn_advances(geometry, origin, piece) {
        pawn_diagonals(geometry, piece, &coord, &mut squares);
    }
    squares
}

impl MoveGenerator for PawnMoves {
    fn generate(&self, ctx: &MoveContext<'_>, origin: usize, piece: &Piece, out: &mut PieceMoves) {
        let geometry = ctx.geometry;
        let board = ctx.board;

        for (dim, delta, coord) in pawn_advances(geometry, origin, piece) {
            let one_step = geometry.coord_to_index(&coord);
            if one_step != origin && board.is_empty_square(one_step) {
                out.moves.push(Move::new(origin, one_step));

                if !piece.has_moved {
                    let mut two = coord.clone();
                    if geometry.step(&mut two, dim, delta) {
                        let two_step = geometry.coord_to_index(&two);
                        if two_step != origin && board.is_empty_square(two_step) {
                            out.moves.push(Move {
                                pawn_double_step_through: Some(one_step),
                                ..Move::new(origin, two_step)
                            });
                        }
                    }
                }
            }

            let mut diagonals = SmallVec::<[usize; 8]>::new();
            pawn_diagonals(geometry, piece, &coord, &mut diagonals);
            for target in diagonals {
                if !board.is_on_board(target) {
                    continue;
                }
                out.threatened.push(target);

                if board.get_piece(target).is_some_and(|p| p.is_enemy_of(piece.color)) {
                    out.moves.push(Move::new(origin, target));
                }

                let en_passant = ctx.en_passant.iter().any(|ep| {
                    ep.color != piece.color
                        && ep.through == target
                        && board
                            .get_piece(ep.pawn_square)
                            .is_some_and(|p| p.kind == PieceKind::Pawn && p.color == ep.color)
                });
                if en_passant {
                    out.moves.push(Move {
                        is_en_passant_capture: true,
                        ..Move::new(origin, target)
                    });
                }
            }
        }
    }
}

// ===== Castling =====

/// Castling with any unmoved rook of the same colour at least three squares
/// away along an axis, with only empty squares between.
///
/// The `distance - 3` surplus squares are shared between the edge gap, the
/// gap between king and rook after castling, and the squares the king does
/// not reach.
fn generate_castling_moves(ctx: &MoveContext<'_>, origin: usize, king: &Piece, out: &mut PieceMoves) {
    let geometry = ctx.geometry;
    let board = ctx.board;

    if is_square_attacked(board, geometry, origin, king.color) {
        return;
    }

    for dim in 0..geometry.dimensions() {
        for sign in SIGNS {
            let mut coord = geometry.index_to_coord(origin);
            let mut passed: SmallVec<[usize; 16]> = SmallVec::new();

            while geometry.step(&mut coord, dim, sign) {
                let index = geometry.coord_to_index(&coord);
                if index == origin || !board.is_on_board(index) {
                    break;
                }
                let Some(piece) = board.get_piece(index) else {
                    passed.push(index);
                    continue;
                };

                let distance = passed.len() + 1;
                if piece.kind == PieceKind::Rook
                    && piece.color == king.color
                    && !piece.has_moved
                    && distance >= 3
                {
                    let extra = distance - 3;
                    let gap_edge = (extra + 2) / 3;
                    let gap_king_rook = (extra - gap_edge + 1) / 2;
                    let gap_remainder = extra - gap_edge - gap_king_rook;
                    let rook_to = passed[gap_king_rook];
                    let king_slot = gap_king_rook + gap_remainder + 1;
                    let king_to = passed[king_slot];

                    let crossed_safe = passed[..=king_slot]
                        .iter()
                        .all(|&sq| !is_square_attacked(board, geometry, sq, king.color));
                    if crossed_safe {
                        out.moves.push(Move {
                            castling: Some(CastlingRook { from: index, to: rook_to }),
                            ..Move::new(origin, king_to)
                        });
                    }
                }
                break;
            }
        }
    }
}

// ===== Entry point =====

/// Candidate moves for the piece on `origin`, without self-check filtering.
pub fn get_moves(ctx: &MoveContext<'_>, origin: usize) -> PieceMoves {
    let mut out = PieceMoves::default();
    let Some(piece) = ctx.board.get_piece(origin) else {
        return out;
    };

    piece.kind.generator().generate(ctx, origin, piece, &mut out);

    if ctx.rules.move_anywhere_unoccupied && piece.kind != PieceKind::King {
        for index in 0..ctx.board.len() {
            if index != origin && ctx.board.is_empty_square(index) {
                out.moves.push(Move::new(origin, index));
            }
        }
    }

    if ctx.rules.king_invincible {
        out.moves.retain(|m| {
            ctx.board
                .get_piece(m.destination)
                .is_none_or(|p| p.kind != PieceKind::King)
        });
    }

    // Earlier candidates carry the side effects, so they win.
    let mut seen = FxHashSet::default();
    out.moves.retain(|m| seen.insert(m.destination));
    let mut seen = FxHashSet::default();
    out.threatened.retain(|sq| seen.insert(*sq));

    trace!(origin, kind = ?piece.kind, candidates = out.moves.len(), "generated moves");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::Facing;

    fn empty_game(rules: RuleConfiguration) -> (Board, RuleConfiguration, Geometry) {
        let geometry = rules.validate().unwrap();
        (Board::new(geometry.len()), rules, geometry)
    }

    fn destinations(moves: &PieceMoves) -> Vec<usize> {
        let mut d: Vec<_> = moves.destinations().collect();
        d.sort_unstable();
        d
    }

    #[test]
    fn rook_on_empty_board() {
        let (mut board, rules, geometry) = empty_game(RuleConfiguration::default());
        board.set_piece(8, Piece::new(PieceKind::Rook, PlayerColor::White));
        let moves = get_moves(&MoveContext::new(&board, &rules, &geometry), 8);
        assert_eq!(
            destinations(&moves),
            vec![0, 9, 10, 11, 12, 13, 14, 15, 16, 24, 32, 40, 48, 56]
        );
        assert!(moves.threatened.is_empty());
    }

    #[test]
    fn rook_ray_stops_at_blockers() {
        let (mut board, rules, geometry) = empty_game(RuleConfiguration::default());
        board.set_piece(8, Piece::new(PieceKind::Rook, PlayerColor::White));
        board.set_piece(32, Piece::new(PieceKind::Knight, PlayerColor::Black));
        board.set_piece(11, Piece::new(PieceKind::Knight, PlayerColor::White));
        let moves = get_moves(&MoveContext::new(&board, &rules, &geometry), 8);
        assert_eq!(destinations(&moves), vec![0, 9, 10, 16, 24, 32]);
    }

    #[test]
    fn holes_block_rays() {
        let (mut board, rules, geometry) = empty_game(RuleConfiguration::default());
        board.set_piece(0, Piece::new(PieceKind::Bishop, PlayerColor::White));
        board.set_hole(27);
        let moves = get_moves(&MoveContext::new(&board, &rules, &geometry), 0);
        assert_eq!(destinations(&moves), vec![9, 18]);
    }

    #[test]
    fn knight_in_corner() {
        let (mut board, rules, geometry) = empty_game(RuleConfiguration::default());
        board.set_piece(0, Piece::new(PieceKind::Knight, PlayerColor::Black));
        let moves = get_moves(&MoveContext::new(&board, &rules, &geometry), 0);
        assert_eq!(destinations(&moves), vec![10, 17]);
    }

    #[test]
    fn knight_in_three_dimensions() {
        let rules = RuleConfiguration::for_variant(crate::rules::Variant::ThreeD5x5x5).unwrap();
        let (mut board, rules, geometry) = empty_game(rules);
        let center = 2 + 2 * 5 + 2 * 25;
        board.set_piece(center, Piece::new(PieceKind::Knight, PlayerColor::White));
        let moves = get_moves(&MoveContext::new(&board, &rules, &geometry), center);
        assert_eq!(moves.moves.len(), 24);
    }

    #[test]
    fn pawn_first_move_and_threats() {
        let (mut board, rules, geometry) = empty_game(RuleConfiguration::default());
        board.set_piece(9, Piece::new(PieceKind::Pawn, PlayerColor::White));
        let moves = get_moves(&MoveContext::new(&board, &rules, &geometry), 9);
        assert_eq!(destinations(&moves), vec![17, 25]);
        assert_eq!(moves.find(25).unwrap().pawn_double_step_through, Some(17));
        let mut threatened = moves.threatened.to_vec();
        threatened.sort_unstable();
        assert_eq!(threatened, vec![16, 18]);
    }

    #[test]
    fn moved_pawn_steps_once_and_captures() {
        let (mut board, rules, geometry) = empty_game(RuleConfiguration::default());
        let mut pawn = Piece::new(PieceKind::Pawn, PlayerColor::Black);
        pawn.has_moved = true;
        board.set_piece(52, pawn);
        board.set_piece(43, Piece::new(PieceKind::Queen, PlayerColor::White));
        board.set_piece(45, Piece::new(PieceKind::Queen, PlayerColor::Black));
        let moves = get_moves(&MoveContext::new(&board, &rules, &geometry), 52);
        assert_eq!(destinations(&moves), vec![43, 44]);
    }

    #[test]
    fn lateral_pawn_advances_sideways() {
        let (mut board, rules, geometry) = empty_game(RuleConfiguration::default());
        let pawn = Piece::new(PieceKind::Pawn, PlayerColor::White).with_facing(Facing::LateralPositive);
        board.set_piece(24, pawn);
        let moves = get_moves(&MoveContext::new(&board, &rules, &geometry), 24);
        assert_eq!(destinations(&moves), vec![25, 26]);
        let mut threatened = moves.threatened.to_vec();
        threatened.sort_unstable();
        assert_eq!(threatened, vec![17, 33]);
    }

    #[test]
    fn en_passant_candidate_requires_the_pawn() {
        let (mut board, rules, geometry) = empty_game(RuleConfiguration::default());
        let mut white = Piece::new(PieceKind::Pawn, PlayerColor::White);
        white.has_moved = true;
        board.set_piece(36, white);
        board.set_piece(35, Piece::new(PieceKind::Pawn, PlayerColor::Black));
        let targets = [EnPassantTarget {
            color: PlayerColor::Black,
            through: 43,
            pawn_square: 35,
        }];
        let ctx = MoveContext::new(&board, &rules, &geometry).with_en_passant(&targets);
        let moves = get_moves(&ctx, 36);
        assert!(moves.find(43).unwrap().is_en_passant_capture);

        board.remove_piece(35);
        let ctx = MoveContext::new(&board, &rules, &geometry).with_en_passant(&targets);
        assert!(get_moves(&ctx, 36).find(43).is_none());
    }

    #[test]
    fn king_wraps_around() {
        let rules = RuleConfiguration::for_variant(crate::rules::Variant::Wrapping10x10).unwrap();
        let (mut board, rules, geometry) = empty_game(rules);
        board.set_piece(0, Piece::new(PieceKind::King, PlayerColor::White));
        let moves = get_moves(&MoveContext::new(&board, &rules, &geometry).without_castling(), 0);
        assert_eq!(destinations(&moves), vec![1, 9, 10, 11, 19, 90, 91, 99]);
    }

    #[test]
    fn wrapping_rook_stops_before_origin() {
        let rules = RuleConfiguration::for_variant(crate::rules::Variant::Wrapping10x10).unwrap();
        let (mut board, rules, geometry) = empty_game(rules);
        board.set_piece(5, Piece::new(PieceKind::Rook, PlayerColor::White));
        let moves = get_moves(&MoveContext::new(&board, &rules, &geometry), 5);
        assert_eq!(moves.moves.len(), 18);
        assert!(moves.find(5).is_none());
    }

    #[test]
    fn king_in_three_dimensions_moves_along_axes() {
        let rules = RuleConfiguration::for_variant(crate::rules::Variant::ThreeD5x5x5).unwrap();
        let (mut board, rules, geometry) = empty_game(rules);
        let center = 2 + 2 * 5 + 2 * 25;
        board.set_piece(center, Piece::new(PieceKind::King, PlayerColor::White));
        let moves = get_moves(&MoveContext::new(&board, &rules, &geometry), center);
        assert_eq!(moves.moves.len(), 6);
    }

    #[test]
    fn king_capture_can_be_disabled() {
        let rules = RuleConfiguration {
            king_allowed_to_capture: false,
            ..RuleConfiguration::default()
        };
        let (mut board, rules, geometry) = empty_game(rules);
        board.set_piece(0, Piece::new(PieceKind::King, PlayerColor::White));
        board.set_piece(1, Piece::new(PieceKind::Pawn, PlayerColor::Black));
        let moves = get_moves(&MoveContext::new(&board, &rules, &geometry).without_castling(), 0);
        assert_eq!(destinations(&moves), vec![8, 9]);
    }

    #[test]
    fn standard_castling_both_sides() {
        let (mut board, rules, geometry) = empty_game(RuleConfiguration::default());
        board.set_piece(4, Piece::new(PieceKind::King, PlayerColor::White));
        board.set_piece(0, Piece::new(PieceKind::Rook, PlayerColor::White));
        board.set_piece(7, Piece::new(PieceKind::Rook, PlayerColor::White));
        let moves = get_moves(&MoveContext::new(&board, &rules, &geometry), 4);
        assert_eq!(
            moves.find(6).unwrap().castling,
            Some(CastlingRook { from: 7, to: 5 })
        );
        assert_eq!(
            moves.find(2).unwrap().castling,
            Some(CastlingRook { from: 0, to: 3 })
        );
    }

    #[test]
    fn castling_spreads_gaps_on_wide_boards() {
        let rules = RuleConfiguration::for_variant(crate::rules::Variant::Standard24x24).unwrap();
        let (mut board, rules, geometry) = empty_game(rules);
        board.set_piece(12, Piece::new(PieceKind::King, PlayerColor::White));
        board.set_piece(23, Piece::new(PieceKind::Rook, PlayerColor::White));
        let moves = get_moves(&MoveContext::new(&board, &rules, &geometry), 12);
        // Distance 11 leaves 8 spare squares: 3 skipped before the rook's
        // landing square, 2 between rook and king, 3 left at the edge.
        let castle = moves.moves.iter().find(|m| m.castling.is_some()).unwrap();
        assert_eq!(castle.castling, Some(CastlingRook { from: 23, to: 16 }));
        assert_eq!(castle.destination, 19);
    }

    #[test]
    fn castling_refused_through_attacked_square() {
        let (mut board, rules, geometry) = empty_game(RuleConfiguration::default());
        board.set_piece(4, Piece::new(PieceKind::King, PlayerColor::White));
        board.set_piece(7, Piece::new(PieceKind::Rook, PlayerColor::White));
        board.set_piece(61, Piece::new(PieceKind::Rook, PlayerColor::Black));
        let moves = get_moves(&MoveContext::new(&board, &rules, &geometry), 4);
        assert!(moves.moves.iter().all(|m| m.castling.is_none()));
    }

    #[test]
    fn move_anywhere_adds_empty_squares_except_for_kings() {
        let rules = RuleConfiguration {
            move_anywhere_unoccupied: true,
            ..RuleConfiguration::default()
        };
        let (mut board, rules, geometry) = empty_game(rules);
        board.set_piece(0, Piece::new(PieceKind::Knight, PlayerColor::White));
        board.set_piece(63, Piece::new(PieceKind::King, PlayerColor::White));
        board.set_piece(62, Piece::new(PieceKind::Rook, PlayerColor::Black));
        let ctx = MoveContext::new(&board, &rules, &geometry);
        assert_eq!(get_moves(&ctx, 0).moves.len(), 61);
        assert_eq!(get_moves(&ctx, 63).moves.len(), 3);
    }

    #[test]
    fn invincible_king_is_never_a_destination() {
        let rules = RuleConfiguration {
            king_invincible: true,
            ..RuleConfiguration::default()
        };
        let (mut board, rules, geometry) = empty_game(rules);
        board.set_piece(0, Piece::new(PieceKind::Rook, PlayerColor::White));
        board.set_piece(3, Piece::new(PieceKind::King, PlayerColor::Black));
        let moves = get_moves(&MoveContext::new(&board, &rules, &geometry), 0);
        assert_eq!(destinations(&moves), vec![1, 2, 8, 16, 24, 32, 40, 48, 56]);
    }
}

use crate::board::Board;
use crate::error::{ConfigError, ConfigResult};
use crate::game::GameState;
use crate::pieces::{Piece, PieceKind, PlayerColor};
use crate::rules::{RuleConfiguration, Variant};

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// The usual 8x8 starting position. Square `x + 8 * y`, White on ranks 0 and 1.
pub fn standard_board() -> Board {
    let mut board = Board::new(64);

    // White Pieces
    for (x, kind) in BACK_RANK.into_iter().enumerate() {
        board.set_piece(x, Piece::new(kind, PlayerColor::White));
        board.set_piece(8 + x, Piece::new(PieceKind::Pawn, PlayerColor::White));
    }

    // Black Pieces
    for (x, kind) in BACK_RANK.into_iter().enumerate() {
        board.set_piece(56 + x, Piece::new(kind, PlayerColor::Black));
        board.set_piece(48 + x, Piece::new(PieceKind::Pawn, PlayerColor::Black));
    }

    board
}

/// A preset played from the standard starting position. Presets with their
/// own starting layout have to be built from a board supplied by the caller.
pub fn standard_game(variant: Variant) -> ConfigResult<GameState> {
    let mut board = standard_board();
    match variant {
        Variant::Standard
        | Variant::TwoMoves
        | Variant::TenMoves
        | Variant::KingMarch
        | Variant::Gravity
        | Variant::MoveToAnySquare
        | Variant::AnythingCanPromote
        | Variant::CaptureAllPawns
        | Variant::PawnPromotion
        | Variant::ConnectSixDiagonally => {}
        Variant::CaptureTheFlag => {
            // Flags start under the kings.
            board.set_flag(4, PlayerColor::White);
            board.set_flag(60, PlayerColor::Black);
        }
        other => {
            return Err(ConfigError::UnsupportedVariant(format!(
                "{other:?} from the standard starting position"
            )));
        }
    }

    let rules = RuleConfiguration::for_variant(variant)?;
    GameState::new(rules, board)?.with_moves_made(variant.opening_moves_made())
}

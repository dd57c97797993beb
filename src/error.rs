use thiserror::Error;

use crate::geometry::{MAX_DIMENSIONS, MAX_MOVES_PER_TURN, MAX_SIDE_LENGTH, MAX_TOTAL_SQUARES};
use crate::pieces::PlayerColor;

/// Setup failures. A game never starts with an invalid configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("board must have at least one dimension")]
    NoDimensions,

    #[error("board has {count} dimensions, at most {max} are supported", max = MAX_DIMENSIONS)]
    TooManyDimensions { count: usize },

    #[error("dimension {dimension} has extent {extent}, expected 1..={max}", max = MAX_SIDE_LENGTH)]
    ExtentOutOfRange { dimension: usize, extent: usize },

    #[error("board has {total} squares, at most {max} are supported", max = MAX_TOTAL_SQUARES)]
    TooManySquares { total: usize },

    #[error("{name} has {found} entries but the board has {expected} dimensions")]
    FlagLengthMismatch {
        name: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("{color:?} may make {count} moves per turn, expected 1..={max}", max = MAX_MOVES_PER_TURN)]
    MovesPerTurnOutOfRange { color: PlayerColor, count: usize },

    #[error("{made} moves already made in the opening turn, but the quota is {quota}")]
    OpeningMovesExceedQuota { made: usize, quota: usize },

    #[error("goal square {square} for {color:?} is outside a board of {len} squares")]
    GoalSquareOutOfRange {
        color: PlayerColor,
        square: usize,
        len: usize,
    },

    #[error("king-arrival win condition needs a goal square for {0:?}")]
    MissingGoalSquare(PlayerColor),

    #[error("gravity acts along dimension {dimension}, but the board has {dimensions}")]
    GravityDimensionOutOfRange { dimension: usize, dimensions: usize },

    #[error("diagonal-row win condition needs a length of at least 2, got {0}")]
    DiagonalRowTooShort(usize),

    #[error("promotion after a step count of zero")]
    ZeroPromotionSteps,

    #[error("board has {found} squares, rules describe {expected}")]
    BoardSizeMismatch { expected: usize, found: usize },

    #[error("variant {0} is not supported by this engine")]
    UnsupportedVariant(String),

    #[error("unknown variant name: {0}")]
    UnknownVariant(String),

    #[error("invalid rule configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reasons a selected move is refused. State is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("square {0} is not on the board")]
    OutOfRange(usize),

    #[error("no piece on square {0}")]
    NoPiece(usize),

    #[error("piece on square {square} belongs to {owner:?}, but it is {turn:?}'s turn")]
    NotYourTurn {
        square: usize,
        owner: PlayerColor,
        turn: PlayerColor,
    },

    #[error("piece on square {0} already moved this turn")]
    PieceAlreadyMoved(usize),

    #[error("{destination} is not a candidate destination from {origin}")]
    NotACandidate { origin: usize, destination: usize },

    #[error("move from {origin} to {destination} leaves the king attacked")]
    LeavesKingAttacked { origin: usize, destination: usize },

    #[error("the game is already over")]
    GameOver,
}

pub type ConfigResult<T> = Result<T, ConfigError>;
pub type MoveResult<T> = Result<T, MoveError>;

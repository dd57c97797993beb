//! Rules engine for chess variants on boards of any number of dimensions.
//!
//! Squares are addressed by a single mixed-radix index where dimension 0
//! varies fastest. A [`GameState`] owns the board and the
//! [`RuleConfiguration`]; callers ask it for candidate moves, validate a
//! selection, commit it and then check the win conditions.

pub mod attacks;
pub mod board;
pub mod error;
pub mod game;
pub mod geometry;
pub mod gravity;
pub mod moves;
pub mod outcome;
pub mod pieces;
pub mod rules;
pub mod setup;

pub use board::{Board, Square};
pub use error::{ConfigError, MoveError};
pub use game::{GameState, LegalityFilter, TurnHistory};
pub use geometry::{Coordinate, Geometry};
pub use moves::{CastlingRook, Move, PieceMoves};
pub use outcome::GameOutcome;
pub use pieces::{ByColor, Facing, Piece, PieceKind, PlayerColor};
pub use rules::{Gravity, GravityDirection, LegalityMode, PromotionRule, RuleConfiguration, Variant, WinCondition};

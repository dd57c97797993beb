use serde::{Deserialize, Serialize};

use crate::pieces::{Piece, PieceKind, PlayerColor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Square {
    /// False for holes in non-rectangular boards.
    pub part_of_board: bool,
    pub piece: Option<Piece>,
    #[serde(default)]
    pub white_flag: bool,
    #[serde(default)]
    pub black_flag: bool,
}

impl Square {
    pub const EMPTY: Square = Square {
        part_of_board: true,
        piece: None,
        white_flag: false,
        black_flag: false,
    };

    pub const HOLE: Square = Square {
        part_of_board: false,
        piece: None,
        white_flag: false,
        black_flag: false,
    };

    pub fn has_flag_of(&self, color: PlayerColor) -> bool {
        match color {
            PlayerColor::White => self.white_flag,
            PlayerColor::Black => self.black_flag,
            PlayerColor::Neutral => false,
        }
    }
}

impl Default for Square {
    fn default() -> Self {
        Square::EMPTY
    }
}

/// Flat sequence of squares addressed by mixed-radix index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    squares: Vec<Square>,
}

impl Board {
    /// An empty board with every square playable.
    pub fn new(len: usize) -> Self {
        Board {
            squares: vec![Square::EMPTY; len],
        }
    }

    pub fn from_squares(squares: Vec<Square>) -> Self {
        Board { squares }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.squares.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.squares.is_empty()
    }

    #[inline]
    pub fn square(&self, index: usize) -> Option<&Square> {
        self.squares.get(index)
    }

    #[inline]
    pub fn square_mut(&mut self, index: usize) -> Option<&mut Square> {
        self.squares.get_mut(index)
    }

    #[inline]
    pub fn is_on_board(&self, index: usize) -> bool {
        self.squares.get(index).is_some_and(|s| s.part_of_board)
    }

    /// On the board and unoccupied.
    #[inline]
    pub fn is_empty_square(&self, index: usize) -> bool {
        self.squares
            .get(index)
            .is_some_and(|s| s.part_of_board && s.piece.is_none())
    }

    #[inline]
    pub fn get_piece(&self, index: usize) -> Option<&Piece> {
        self.squares.get(index).and_then(|s| s.piece.as_ref())
    }

    #[inline]
    pub fn get_piece_mut(&mut self, index: usize) -> Option<&mut Piece> {
        self.squares.get_mut(index).and_then(|s| s.piece.as_mut())
    }

    /// Places `piece` on `index`, returning whatever stood there.
    pub fn set_piece(&mut self, index: usize, piece: Piece) -> Option<Piece> {
        self.squares.get_mut(index).and_then(|s| s.piece.replace(piece))
    }

    pub fn remove_piece(&mut self, index: usize) -> Option<Piece> {
        self.squares.get_mut(index).and_then(|s| s.piece.take())
    }

    /// Turns `index` into a hole, dropping any piece on it.
    pub fn set_hole(&mut self, index: usize) {
        if let Some(square) = self.squares.get_mut(index) {
            *square = Square::HOLE;
        }
    }

    pub fn set_flag(&mut self, index: usize, color: PlayerColor) {
        if let Some(square) = self.squares.get_mut(index) {
            match color {
                PlayerColor::White => square.white_flag = true,
                PlayerColor::Black => square.black_flag = true,
                PlayerColor::Neutral => {}
            }
        }
    }

    /// Occupied squares with their pieces, in index order.
    pub fn pieces(&self) -> impl Iterator<Item = (usize, &Piece)> {
        self.squares
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.piece.as_ref().map(|p| (i, p)))
    }

    pub fn pieces_of(&self, color: PlayerColor) -> impl Iterator<Item = (usize, &Piece)> {
        self.pieces().filter(move |(_, p)| p.color == color)
    }

    pub fn find_king(&self, color: PlayerColor) -> Option<usize> {
        self.pieces_of(color)
            .find(|(_, p)| p.kind == PieceKind::King)
            .map(|(i, _)| i)
    }

    pub fn count(&self, color: PlayerColor, kind: PieceKind) -> usize {
        self.pieces_of(color).filter(|(_, p)| p.kind == kind).count()
    }
}

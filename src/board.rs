// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::convert::TryFrom;
use std::fmt::{self, Display, Write};

use crate::types::TableIndex;
use crate::types::{Color, PieceKind, Square, FILES, RANKS};

/// Stable identity of a piece for the lifetime of a game. Identities are
/// handed out in setup order and never reused.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PieceId(pub u8);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Piece {
    pub id: PieceId,
    pub kind: PieceKind,
    pub color: Color,
    pub moved: bool,
}

impl Piece {
    pub fn new(id: PieceId, kind: PieceKind, color: Color) -> Piece {
        Piece {
            id,
            kind,
            color,
            moved: false,
        }
    }

    /// Key of the image asset the UI shows for this piece, e.g. `qdt60` for a
    /// black queen.
    pub fn image_key(&self) -> String {
        let shade = match self.color {
            Color::White => 'l',
            Color::Black => 'd',
        };
        format!("{}{}t60", self.kind, shade)
    }

    /// FEN letter: uppercase for White, lowercase for Black.
    pub fn letter(&self) -> char {
        match self.color {
            Color::White => self.kind.san_letter(),
            Color::Black => self.kind.san_letter().to_ascii_lowercase(),
        }
    }
}

impl Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_char(self.letter())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Shade {
    Light,
    Dark,
}

impl Shade {
    /// a1 is dark, and shades alternate along both rows and columns.
    pub fn of(square: Square) -> Shade {
        if (square.row() + square.col()) % 2 == 0 {
            Shade::Dark
        } else {
            Shade::Light
        }
    }
}

/// The 8x8 grid. The board is the only record of where a piece stands; pieces
/// do not remember their own square.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    cells: [Option<Piece>; 64],
    next_id: u8,
}

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

impl Board {
    pub fn empty() -> Board {
        Board {
            cells: [None; 64],
            next_id: 0,
        }
    }

    /// The standard starting arrangement.
    pub fn initial() -> Board {
        let mut board = Board::empty();
        for &color in &[Color::White, Color::Black] {
            let back = color.back_row();
            let pawns = if color == Color::White { 1 } else { 6 };
            for col in 0..8 {
                let back_sq = Square::from_coords(back, col).unwrap();
                let pawn_sq = Square::from_coords(pawns, col).unwrap();
                board
                    .spawn(back_sq, BACK_RANK[col as usize], color)
                    .expect("initial setup placed two pieces on one square");
                board
                    .spawn(pawn_sq, PieceKind::Pawn, color)
                    .expect("initial setup placed two pieces on one square");
            }
        }

        board
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.cells[square.as_index()]
    }

    pub fn piece_at_mut(&mut self, square: Square) -> Option<&mut Piece> {
        self.cells[square.as_index()].as_mut()
    }

    pub fn is_occupied(&self, square: Square) -> bool {
        self.cells[square.as_index()].is_some()
    }

    /// Creates a new piece on an empty square, giving it a fresh identity.
    pub fn spawn(
        &mut self,
        square: Square,
        kind: PieceKind,
        color: Color,
    ) -> Result<PieceId, BoardError> {
        let id = PieceId(self.next_id);
        self.add_piece(square, Piece::new(id, kind, color))?;
        self.next_id += 1;
        Ok(id)
    }

    pub fn add_piece(&mut self, square: Square, piece: Piece) -> Result<(), BoardError> {
        let cell = &mut self.cells[square.as_index()];
        if cell.is_some() {
            return Err(BoardError::Occupied);
        }

        *cell = Some(piece);
        Ok(())
    }

    pub fn remove_piece(&mut self, square: Square) -> Option<Piece> {
        self.cells[square.as_index()].take()
    }

    /// Moves the piece on `from` to `to`, returning whatever stood on `to`.
    /// The moved piece's moved-flag is set.
    pub fn relocate(&mut self, from: Square, to: Square) -> Option<Piece> {
        let mut piece = self
            .remove_piece(from)
            .expect("relocate: no piece at source square");
        piece.moved = true;
        let captured = self.remove_piece(to);
        self.cells[to.as_index()] = Some(piece);
        captured
    }

    /// Every occupied square with its piece, a1 first.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(idx, cell)| cell.map(|piece| (Square::from_index(idx), piece)))
    }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces().filter(move |(_, piece)| piece.color == color)
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces_of(color)
            .find(|(_, piece)| piece.kind == PieceKind::King)
            .map(|(sq, _)| sq)
    }

    /// Parses the piece-placement field of a FEN string. Every piece is
    /// created unmoved; callers adjust moved-flags from the other fields.
    pub fn from_fen_placement(placement: &str) -> Result<Board, PlacementError> {
        let mut board = Board::empty();
        let rows: Vec<&str> = placement.split('/').collect();
        if rows.len() != 8 {
            return Err(PlacementError::WrongRowCount);
        }

        for (rank_idx, row) in rows.iter().enumerate() {
            let rank = RANKS[7 - rank_idx];
            let mut file = 0usize;
            for c in row.chars() {
                if let Some(skip) = c.to_digit(10) {
                    if skip < 1 || skip > 8 {
                        return Err(PlacementError::InvalidDigit);
                    }
                    file += skip as usize;
                } else {
                    let kind = PieceKind::try_from(c).map_err(|_| PlacementError::UnknownPiece)?;
                    let color = if c.is_ascii_uppercase() {
                        Color::White
                    } else {
                        Color::Black
                    };
                    if file > 7 {
                        return Err(PlacementError::FileDoesNotSumToEight);
                    }
                    let square = Square::of(rank, FILES[file]);
                    board
                        .spawn(square, kind, color)
                        .map_err(|_| PlacementError::FileDoesNotSumToEight)?;
                    file += 1;
                }

                if file > 8 {
                    return Err(PlacementError::FileDoesNotSumToEight);
                }
            }

            if file != 8 {
                return Err(PlacementError::FileDoesNotSumToEight);
            }
        }

        Ok(board)
    }

    pub fn fen_placement(&self) -> String {
        let mut buf = String::new();
        for &rank in RANKS.iter().rev() {
            let mut empty_squares = 0;
            for &file in &FILES {
                if let Some(piece) = self.piece_at(Square::of(rank, file)) {
                    if empty_squares != 0 {
                        buf.push_str(&empty_squares.to_string());
                    }
                    buf.push(piece.letter());
                    empty_squares = 0;
                } else {
                    empty_squares += 1;
                }
            }

            if empty_squares != 0 {
                buf.push_str(&empty_squares.to_string());
            }

            if rank != RANKS[0] {
                buf.push('/');
            }
        }

        buf
    }
}

/// Rejected board edits.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BoardError {
    /// The target square already holds a piece.
    Occupied,
    /// Promotion was requested for a square that does not hold a pawn.
    NotAPawn,
    /// A pawn may not become a pawn or a king.
    NotPromotable,
}

impl Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BoardError::Occupied => write!(f, "square is occupied"),
            BoardError::NotAPawn => write!(f, "square does not hold a pawn"),
            BoardError::NotPromotable => write!(f, "pawns promote to knight, bishop, rook or queen"),
        }
    }
}

impl std::error::Error for BoardError {}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlacementError {
    WrongRowCount,
    InvalidDigit,
    FileDoesNotSumToEight,
    UnknownPiece,
}

impl Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for &rank in RANKS.iter().rev() {
            for &file in &FILES {
                if let Some(piece) = self.piece_at(Square::of(rank, file)) {
                    write!(f, " {} ", piece)?;
                } else {
                    write!(f, " . ")?;
                }
            }

            writeln!(f, "| {}", rank)?;
        }

        for _ in &FILES {
            write!(f, "---")?;
        }

        writeln!(f)?;
        for &file in &FILES {
            write!(f, " {} ", file)?;
        }

        writeln!(f)
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::initial()
    }
}

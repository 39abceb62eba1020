// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use num_traits::{FromPrimitive, ToPrimitive};
use std::convert::TryFrom;
use std::fmt::{self, Display, Write};

// TableIndex is a trait for all types that can serve as an index into a table.
// Squares, colors and piece kinds all index the board and the capability
// tables, so anything implementing To and FromPrimitive gets it for free.
pub trait TableIndex {
    fn as_index(self) -> usize;
    fn from_index(idx: usize) -> Self;
}

impl<T> TableIndex for T
where
    T: FromPrimitive + ToPrimitive,
{
    fn as_index(self) -> usize {
        self.to_u32().unwrap() as usize
    }

    fn from_index(idx: usize) -> T {
        <T as FromPrimitive>::from_u64(idx as u64).unwrap()
    }
}

/// A square on the board. Squares are numbered `row * 8 + col`, where row 0 is
/// White's back rank and column 0 is the a-file.
#[rustfmt::skip]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, FromPrimitive, ToPrimitive)]
pub enum Square {
    A1, B1, C1, D1, E1, F1, G1, H1,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A8, B8, C8, D8, E8, F8, G8, H8,
}

impl Square {
    pub fn of(rank: Rank, file: File) -> Square {
        let rank = rank.to_u32().unwrap();
        let file = file.to_u32().unwrap();
        FromPrimitive::from_u32(rank * 8 + file).unwrap()
    }

    /// Returns the square at the given row and column, or `None` if the
    /// coordinates fall outside of the board.
    pub fn from_coords(row: i32, col: i32) -> Option<Square> {
        if row < 0 || row > 7 || col < 0 || col > 7 {
            return None;
        }

        FromPrimitive::from_i32(row * 8 + col)
    }

    pub fn rank(self) -> Rank {
        FromPrimitive::from_u32(self.to_u32().unwrap() >> 3).unwrap()
    }

    pub fn file(self) -> File {
        FromPrimitive::from_u32(self.to_u32().unwrap() & 7).unwrap()
    }

    pub fn row(self) -> i32 {
        self.to_i32().unwrap() >> 3
    }

    pub fn col(self) -> i32 {
        self.to_i32().unwrap() & 7
    }

    /// Iterates every square, a1 first and h8 last.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..64).map(Square::from_index)
    }
}

impl Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

impl TryFrom<&str> for Square {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let mut chars = value.chars();
        let file = chars.next().ok_or(())?;
        let rank = chars.next().ok_or(())?;
        if chars.next().is_some() {
            return Err(());
        }

        Ok(Square::of(Rank::try_from(rank)?, File::try_from(file)?))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum Rank {
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
}

impl Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let digit = std::char::from_digit(self.to_u32().unwrap() + 1, 10).unwrap();
        f.write_char(digit)
    }
}

impl TryFrom<char> for Rank {
    type Error = ();

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            '1'..='8' => Ok(Rank::from_index(value as usize - '1' as usize)),
            _ => Err(()),
        }
    }
}

pub static RANKS: [Rank; 8] = [
    Rank::One,
    Rank::Two,
    Rank::Three,
    Rank::Four,
    Rank::Five,
    Rank::Six,
    Rank::Seven,
    Rank::Eight,
];

#[derive(Copy, Clone, Debug, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum File {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
}

impl Display for File {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let letter = (b'a' + self.to_u8().unwrap()) as char;
        f.write_char(letter)
    }
}

impl TryFrom<char> for File {
    type Error = ();

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            'a'..='h' => Ok(File::from_index(value as usize - 'a' as usize)),
            _ => Err(()),
        }
    }
}

pub static FILES: [File; 8] = [
    File::A,
    File::B,
    File::C,
    File::D,
    File::E,
    File::F,
    File::G,
    File::H,
];

#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive, Serialize, Deserialize,
)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn toggle(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// The row of this color's back rank.
    pub fn back_row(self) -> i32 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    /// The row a pawn of this color promotes on.
    pub fn promotion_row(self) -> i32 {
        self.toggle().back_row()
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let chr = match self {
            Color::White => 'w',
            Color::Black => 'b',
        };
        f.write_char(chr)
    }
}

pub static COLORS: [Color; 2] = [Color::White, Color::Black];

#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive, Serialize, Deserialize,
)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Queens, rooks and pawns are always enough material to deliver mate.
    pub fn is_sufficient_material(self) -> bool {
        match self {
            PieceKind::Queen | PieceKind::Rook | PieceKind::Pawn => true,
            _ => false,
        }
    }

    /// The uppercase letter used for this kind in algebraic notation.
    pub fn san_letter(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }
}

impl Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_char(self.san_letter().to_ascii_lowercase())
    }
}

impl TryFrom<char> for PieceKind {
    type Error = ();

    fn try_from(value: char) -> Result<Self, Self::Error> {
        let res = match value.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return Err(()),
        };
        Ok(res)
    }
}

pub static PIECE_KINDS: [PieceKind; 6] = [
    PieceKind::Pawn,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Rook,
    PieceKind::Queen,
    PieceKind::King,
];

// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::convert::TryFrom;
use std::fmt::{self, Write};

use crate::attacks::{self, SquareVec};
use crate::board::{Board, BoardError, Piece, PlacementError};
use crate::legality;
use crate::special::{self, Castle, CastleRights, CastleSide};
use crate::types::{Color, File, PieceKind, Rank, Square, COLORS};

/// Possible errors that can arise when parsing a FEN string into a `Position`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FenParseError {
    UnexpectedChar(char),
    UnexpectedEnd,
    WrongRowCount,
    InvalidDigit,
    FileDoesNotSumToEight,
    UnknownPiece,
    MissingKing(Color),
    InvalidSideToMove,
    InvalidCastle,
    InvalidEnPassant,
    EmptyHalfmove,
    InvalidHalfmove,
    EmptyFullmove,
    InvalidFullmove,
}

impl From<PlacementError> for FenParseError {
    fn from(err: PlacementError) -> FenParseError {
        match err {
            PlacementError::WrongRowCount => FenParseError::WrongRowCount,
            PlacementError::InvalidDigit => FenParseError::InvalidDigit,
            PlacementError::FileDoesNotSumToEight => FenParseError::FileDoesNotSumToEight,
            PlacementError::UnknownPiece => FenParseError::UnknownPiece,
        }
    }
}

impl fmt::Display for FenParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FenParseError::UnexpectedChar(c) => write!(f, "unexpected character '{}'", c),
            FenParseError::UnexpectedEnd => write!(f, "unexpected end of input"),
            FenParseError::WrongRowCount => write!(f, "placement does not have eight rows"),
            FenParseError::InvalidDigit => write!(f, "invalid digit in placement"),
            FenParseError::FileDoesNotSumToEight => write!(f, "row does not sum to eight files"),
            FenParseError::UnknownPiece => write!(f, "unknown piece letter"),
            FenParseError::MissingKing(color) => write!(f, "no king for side '{}'", color),
            FenParseError::InvalidSideToMove => write!(f, "invalid side to move"),
            FenParseError::InvalidCastle => write!(f, "invalid castling field"),
            FenParseError::InvalidEnPassant => write!(f, "invalid en passant square"),
            FenParseError::EmptyHalfmove => write!(f, "missing halfmove clock"),
            FenParseError::InvalidHalfmove => write!(f, "invalid halfmove clock"),
            FenParseError::EmptyFullmove => write!(f, "missing fullmove number"),
            FenParseError::InvalidFullmove => write!(f, "invalid fullmove number"),
        }
    }
}

impl std::error::Error for FenParseError {}

/// Everything a single application of `apply_move` did to the board, so that
/// callers can write notation and keep the repetition and fifty-move books.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AppliedMove {
    pub from: Square,
    pub to: Square,
    /// The mover, as it was before moving.
    pub piece: Piece,
    pub captured: Option<Piece>,
    pub castle: Option<Castle>,
    /// Square of the pawn removed by an en passant capture.
    pub en_passant: Option<Square>,
    /// The pawn reached its last rank and is waiting to be promoted.
    pub promotion_due: bool,
}

impl AppliedMove {
    pub fn is_pawn_move(&self) -> bool {
        self.piece.kind == PieceKind::Pawn
    }

    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    /// Moves after which no earlier position can ever recur.
    pub fn is_irreversible(&self) -> bool {
        self.is_pawn_move() || self.is_capture() || self.castle.is_some()
    }
}

/// The board plus the state that is not visible on it: whose turn it is, the
/// en passant target and the move counters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    board: Board,
    side_to_move: Color,
    en_passant_square: Option<Square>,
    halfmove_clock: u32,
    fullmove_clock: u32,
}

//
// Board state getters
//

impl Position {
    pub fn new() -> Position {
        Position {
            board: Board::empty(),
            side_to_move: Color::White,
            en_passant_square: None,
            halfmove_clock: 0,
            fullmove_clock: 1,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn en_passant_square(&self) -> Option<Square> {
        self.en_passant_square
    }

    /// Plies since the last pawn move or capture.
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn fullmove_clock(&self) -> u32 {
        self.fullmove_clock
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.board.piece_at(square)
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.board.king_square(color)
    }

    /// Squares of every enemy piece attacking the king of `color`.
    pub fn king_attackers(&self, color: Color) -> SquareVec {
        match self.king_square(color) {
            Some(king) => attacks::attackers_of(&self.board, king, color),
            None => SquareVec::new(),
        }
    }

    pub fn is_check(&self, color: Color) -> bool {
        !self.king_attackers(color).is_empty()
    }

    /// Castles that are not yet forfeited by a king or rook move.
    pub fn castle_rights(&self) -> CastleRights {
        special::castle_rights(&self.board)
    }
}

//
// Legal moves
//

impl Position {
    /// Legal destinations of the piece on `from`, whichever side it belongs
    /// to. En passant is only offered to the side to move.
    pub fn legal_moves(&self, from: Square) -> SquareVec {
        legality::legal_destinations(self, from)
    }

    /// Every legal (from, to) pair for the side to move. Promotions appear
    /// once; the promotion kind is chosen separately.
    pub fn all_legal_moves(&self) -> Vec<(Square, Square)> {
        let mut moves = Vec::new();
        for (from, _) in self.board.pieces_of(self.side_to_move) {
            for to in self.legal_moves(from) {
                moves.push((from, to));
            }
        }

        moves
    }

    pub fn legal_move_count(&self) -> usize {
        self.board
            .pieces_of(self.side_to_move)
            .map(|(from, _)| self.legal_moves(from).len())
            .sum()
    }

    pub fn has_legal_move(&self) -> bool {
        self.board
            .pieces_of(self.side_to_move)
            .any(|(from, _)| !self.legal_moves(from).is_empty())
    }

    /// Whether moving the piece on `from` to `to` would require a promotion.
    pub fn is_promotion(&self, from: Square, to: Square) -> bool {
        match self.board.piece_at(from) {
            Some(piece) => special::is_promotion(piece, to),
            None => false,
        }
    }
}

//
// Move application
//

impl Position {
    /// Moves the piece on `from` to `to` with all side effects: captures,
    /// the rook half of a castle, the en passant victim, the en passant
    /// target and the halfmove clock. Does not pass the turn, since a
    /// promotion may still be outstanding; callers follow up with `end_turn`.
    ///
    /// The move must be legal; this does not check.
    pub fn apply_move(&mut self, from: Square, to: Square) -> AppliedMove {
        let piece = self
            .board
            .piece_at(from)
            .expect("apply_move called on an empty square");

        let castle = if piece.kind == PieceKind::King {
            special::castle_for_move(&self.board, from, to)
        } else {
            None
        };

        let en_passant = match self.en_passant_square.take() {
            Some(target) if target == to && piece.kind == PieceKind::Pawn => {
                special::en_passant_victim(&self.board, from, to)
            }
            _ => None,
        };

        let mut captured = self.board.relocate(from, to);
        if let Some(victim) = en_passant {
            captured = self.board.remove_piece(victim);
        }

        if let Some(castle) = castle {
            self.board.relocate(castle.rook_from, castle.rook_to);
        }

        self.en_passant_square = special::en_passant_target(piece, from, to);
        if piece.kind == PieceKind::Pawn || captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }

        AppliedMove {
            from,
            to,
            piece,
            captured,
            castle,
            en_passant,
            promotion_due: special::is_promotion(piece, to),
        }
    }

    /// Turns the pawn on `square` into `kind`. Fails if there is no pawn
    /// there or `kind` is not a promotion kind.
    pub fn promote(&mut self, square: Square, kind: PieceKind) -> Result<(), BoardError> {
        if !special::is_promotion_kind(kind) {
            return Err(BoardError::NotPromotable);
        }

        match self.board.piece_at_mut(square) {
            Some(piece) if piece.kind == PieceKind::Pawn => {
                piece.kind = kind;
                Ok(())
            }
            _ => Err(BoardError::NotAPawn),
        }
    }

    /// Passes the turn to the other side.
    pub fn end_turn(&mut self) {
        if self.side_to_move == Color::Black {
            self.fullmove_clock += 1;
        }

        self.side_to_move = self.side_to_move.toggle();
    }

    /// A string identifying this position for repetition purposes: every
    /// square's occupant, the castles playable right now, the en passant
    /// target and the side to move.
    pub fn repetition_key(&self) -> String {
        let mut key = String::with_capacity(140);
        for square in Square::all() {
            match self.board.piece_at(square) {
                Some(piece) => {
                    key.push_str(&piece.color.to_string());
                    key.push(piece.kind.san_letter());
                }
                None => key.push('.'),
            }
        }

        key.push('|');
        let available = special::castle_availability(&self.board);
        write_castles(&mut key, available);
        key.push('|');
        match self.en_passant_square {
            Some(sq) => write!(&mut key, "{}", sq).expect("writing to a String cannot fail"),
            None => key.push('-'),
        }

        key.push('|');
        key.push_str(&self.side_to_move.to_string());
        key
    }
}

fn write_castles(buf: &mut String, rights: CastleRights) {
    if rights.is_empty() {
        buf.push('-');
        return;
    }

    for &color in COLORS.iter() {
        for &(side, letter) in &[(CastleSide::Short, 'K'), (CastleSide::Long, 'Q')] {
            if rights.contains(CastleRights::of(color, side)) {
                match color {
                    Color::White => buf.push(letter),
                    Color::Black => buf.push(letter.to_ascii_lowercase()),
                }
            }
        }
    }
}

//
// FEN parsing and generation.
//
// Pieces carry a moved flag rather than the position carrying castling
// rights, so FEN import derives moved flags from the castling field and from
// where the pawns stand, and FEN export derives the castling field from the
// moved flags.
//

impl Position {
    pub fn from_start_position() -> Position {
        Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
            .expect("start position FEN is well-formed")
    }

    /// Constructs a new position from a FEN representation of a board position.
    pub fn from_fen<S: AsRef<str>>(fen: S) -> Result<Position, FenParseError> {
        use std::iter::Peekable;
        use std::str::Chars;

        type Stream<'a> = Peekable<Chars<'a>>;

        fn eat<'a>(iter: &mut Stream<'a>, expected: char) -> Result<(), FenParseError> {
            match iter.next() {
                Some(c) if c == expected => Ok(()),
                Some(c) => Err(FenParseError::UnexpectedChar(c)),
                None => Err(FenParseError::UnexpectedEnd),
            }
        }

        fn advance<'a>(iter: &mut Stream<'a>) -> Result<(), FenParseError> {
            let _ = iter.next();
            Ok(())
        }

        fn peek<'a>(iter: &mut Stream<'a>) -> Result<char, FenParseError> {
            if let Some(c) = iter.peek() {
                Ok(*c)
            } else {
                Err(FenParseError::UnexpectedEnd)
            }
        }

        fn eat_placement<'a>(iter: &mut Stream<'a>) -> Result<Board, FenParseError> {
            let mut buf = String::new();
            loop {
                let c = peek(iter)?;
                if c == ' ' {
                    break;
                }

                buf.push(c);
                advance(iter)?;
            }

            Ok(Board::from_fen_placement(&buf)?)
        }

        fn eat_side_to_move<'a>(iter: &mut Stream<'a>) -> Result<Color, FenParseError> {
            let side = match peek(iter)? {
                'w' => Color::White,
                'b' => Color::Black,
                _ => return Err(FenParseError::InvalidSideToMove),
            };

            advance(iter)?;
            Ok(side)
        }

        fn eat_castle_status<'a>(iter: &mut Stream<'a>) -> Result<CastleRights, FenParseError> {
            if peek(iter)? == '-' {
                advance(iter)?;
                return Ok(CastleRights::NONE);
            }

            let mut status = CastleRights::NONE;
            for _ in 0..4 {
                match peek(iter)? {
                    'K' => status |= CastleRights::WHITE_SHORT,
                    'k' => status |= CastleRights::BLACK_SHORT,
                    'Q' => status |= CastleRights::WHITE_LONG,
                    'q' => status |= CastleRights::BLACK_LONG,
                    ' ' => break,
                    _ => return Err(FenParseError::InvalidCastle),
                }

                advance(iter)?;
            }

            Ok(status)
        }

        fn eat_en_passant<'a>(iter: &mut Stream<'a>) -> Result<Option<Square>, FenParseError> {
            let c = peek(iter)?;
            if c == '-' {
                advance(iter)?;
                return Ok(None);
            }

            if let Ok(file) = File::try_from(c) {
                advance(iter)?;
                let rank_c = peek(iter)?;
                if let Ok(rank) = Rank::try_from(rank_c) {
                    advance(iter)?;
                    Ok(Some(Square::of(rank, file)))
                } else {
                    Err(FenParseError::InvalidEnPassant)
                }
            } else {
                Err(FenParseError::InvalidEnPassant)
            }
        }

        fn eat_halfmove<'a>(iter: &mut Stream<'a>) -> Result<u32, FenParseError> {
            let mut buf = String::new();
            loop {
                let c = peek(iter)?;
                if !c.is_digit(10) {
                    break;
                }

                buf.push(c);
                advance(iter)?;
            }

            if buf.is_empty() {
                return Err(FenParseError::EmptyHalfmove);
            }

            buf.parse::<u32>()
                .map_err(|_| FenParseError::InvalidHalfmove)
        }

        fn eat_fullmove<'a>(iter: &mut Stream<'a>) -> Result<u32, FenParseError> {
            let mut buf = String::new();
            for ch in iter {
                if !ch.is_digit(10) {
                    if buf.is_empty() {
                        return Err(FenParseError::EmptyFullmove);
                    }

                    break;
                }

                buf.push(ch);
            }

            if buf.is_empty() {
                return Err(FenParseError::EmptyFullmove);
            }

            buf.parse::<u32>()
                .map_err(|_| FenParseError::InvalidFullmove)
        }

        let mut pos = Position::new();
        let iter = &mut fen.as_ref().chars().peekable();
        pos.board = eat_placement(iter)?;
        eat(iter, ' ')?;
        pos.side_to_move = eat_side_to_move(iter)?;
        eat(iter, ' ')?;
        let castles = eat_castle_status(iter)?;
        eat(iter, ' ')?;
        pos.en_passant_square = eat_en_passant(iter)?;
        eat(iter, ' ')?;
        pos.halfmove_clock = eat_halfmove(iter)?;
        eat(iter, ' ')?;
        pos.fullmove_clock = eat_fullmove(iter)?;
        pos.settle_moved_flags(castles);
        Ok(pos)
    }

    /// Like `from_fen`, but also requires exactly one king per side, which
    /// every position reachable in play has.
    pub fn from_fen_with_kings<S: AsRef<str>>(fen: S) -> Result<Position, FenParseError> {
        let pos = Position::from_fen(fen)?;
        for &color in COLORS.iter() {
            let kings = pos
                .board
                .pieces_of(color)
                .filter(|(_, piece)| piece.kind == PieceKind::King)
                .count();
            if kings != 1 {
                return Err(FenParseError::MissingKing(color));
            }
        }

        Ok(pos)
    }

    /// Pawns off their starting row have moved. Kings and rooks are unmoved
    /// only where the castling field says a castle is still available.
    fn settle_moved_flags(&mut self, castles: CastleRights) {
        let unmoved_rook = |color: Color, side: CastleSide| -> Option<Square> {
            if !castles.contains(CastleRights::of(color, side)) {
                return None;
            }

            let file = match side {
                CastleSide::Short => File::H,
                CastleSide::Long => File::A,
            };
            Square::from_coords(color.back_row(), file as i32)
        };

        let rooks: Vec<Square> = COLORS
            .iter()
            .flat_map(|&color| {
                vec![
                    unmoved_rook(color, CastleSide::Short),
                    unmoved_rook(color, CastleSide::Long),
                ]
            })
            .flatten()
            .collect();

        for square in Square::all() {
            let piece = match self.board.piece_at_mut(square) {
                Some(piece) => piece,
                None => continue,
            };

            piece.moved = match piece.kind {
                PieceKind::Pawn => {
                    let start_row = match piece.color {
                        Color::White => 1,
                        Color::Black => 6,
                    };
                    square.row() != start_row
                }
                PieceKind::King => {
                    let rights = match piece.color {
                        Color::White => CastleRights::WHITE,
                        Color::Black => CastleRights::BLACK,
                    };
                    let home = Square::from_coords(piece.color.back_row(), File::E as i32);
                    !(castles.intersects(rights) && home == Some(square))
                }
                PieceKind::Rook => !rooks.contains(&square),
                _ => false,
            };
        }
    }

    pub fn as_fen(&self) -> String {
        let mut buf = self.board.fen_placement();
        buf.push(' ');
        buf.push_str(&self.side_to_move.to_string());
        buf.push(' ');
        write_castles(&mut buf, self.castle_rights());
        buf.push(' ');
        if let Some(ep_square) = self.en_passant_square() {
            write!(&mut buf, "{}", ep_square).expect("writing to a String cannot fail");
        } else {
            buf.push('-');
        }
        buf.push(' ');
        write!(
            &mut buf,
            "{} {}",
            self.halfmove_clock(),
            self.fullmove_clock()
        )
        .expect("writing to a String cannot fail");
        buf
    }
}

//
// Trait implementations
//

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.board)
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::from_start_position()
    }
}

#[cfg(test)]
mod tests {
    use crate::position::Position;
    use crate::types::{Color, PieceKind, Square};

    #[test]
    fn check_smoke() {
        let pos = Position::from_fen("8/8/8/8/8/8/1k6/K7 w - - 0 1").unwrap();
        assert!(pos.is_check(Color::White));
        assert!(pos.is_check(Color::Black));
    }

    #[test]
    fn start_position_has_twenty_moves() {
        let pos = Position::from_start_position();
        assert_eq!(20, pos.legal_move_count());
        assert_eq!(20, pos.all_legal_moves().len());
        assert!(!pos.is_check(Color::White));
    }

    mod fen {
        use crate::position::{FenParseError, Position};
        use crate::special::CastleRights;
        use crate::types::{Color, PieceKind, Square};

        #[test]
        fn fen_smoke() {
            let pos = Position::from_fen("8/8/8/8/8/8/8/8 w - - 0 0").unwrap();

            // white's turn to move.
            assert_eq!(Color::White, pos.side_to_move());

            // no castling.
            assert_eq!(CastleRights::NONE, pos.castle_rights());

            // no en passant.
            assert!(pos.en_passant_square().is_none());

            // both clocks are zero.
            assert_eq!(0, pos.halfmove_clock());
            assert_eq!(0, pos.fullmove_clock());
        }

        #[test]
        fn starting_position() {
            let pos = Position::from_start_position();
            let check_square = |square: Square, kind: PieceKind, color: Color| {
                let piece = pos.piece_at(square).unwrap();
                assert_eq!(kind, piece.kind);
                assert_eq!(color, piece.color);
                assert!(!piece.moved);
            };

            check_square(Square::A1, PieceKind::Rook, Color::White);
            check_square(Square::B1, PieceKind::Knight, Color::White);
            check_square(Square::C1, PieceKind::Bishop, Color::White);
            check_square(Square::D1, PieceKind::Queen, Color::White);
            check_square(Square::E1, PieceKind::King, Color::White);
            check_square(Square::H2, PieceKind::Pawn, Color::White);
            check_square(Square::A7, PieceKind::Pawn, Color::Black);
            check_square(Square::D8, PieceKind::Queen, Color::Black);
            check_square(Square::E8, PieceKind::King, Color::Black);
            check_square(Square::H8, PieceKind::Rook, Color::Black);

            for sq in Square::all().filter(|sq| sq.row() >= 2 && sq.row() <= 5) {
                assert!(pos.piece_at(sq).is_none());
            }

            assert_eq!(CastleRights::all(), pos.castle_rights());
        }

        #[test]
        fn castle_field_sets_moved_flags() {
            let pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w Kq - 0 1").unwrap();
            assert!(!pos.piece_at(Square::E1).unwrap().moved);
            assert!(!pos.piece_at(Square::H1).unwrap().moved);
            assert!(pos.piece_at(Square::A1).unwrap().moved);
            assert!(!pos.piece_at(Square::E8).unwrap().moved);
            assert!(!pos.piece_at(Square::A8).unwrap().moved);
            assert!(pos.piece_at(Square::H8).unwrap().moved);
            assert_eq!(
                CastleRights::WHITE_SHORT | CastleRights::BLACK_LONG,
                pos.castle_rights()
            );
        }

        #[test]
        fn advanced_pawns_have_moved() {
            let pos = Position::from_fen("4k3/8/3p4/8/4P3/8/P7/4K3 w - - 0 1").unwrap();
            assert!(!pos.piece_at(Square::A2).unwrap().moved);
            assert!(pos.piece_at(Square::E4).unwrap().moved);
            assert!(pos.piece_at(Square::D6).unwrap().moved);
        }

        #[test]
        fn round_trip() {
            for fen in &[
                "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
                "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
                "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
                "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 3",
            ] {
                assert_eq!(*fen, Position::from_fen(fen).unwrap().as_fen());
            }
        }

        #[test]
        fn empty() {
            let err = Position::from_fen("").unwrap_err();
            assert_eq!(FenParseError::UnexpectedEnd, err);
        }

        #[test]
        fn unknown_piece() {
            let err = Position::from_fen("z7/8/8/8/8/8/8/8 w - - 0 0").unwrap_err();
            assert_eq!(FenParseError::UnknownPiece, err);
        }

        #[test]
        fn invalid_digit() {
            let err = Position::from_fen("9/8/8/8/8/8/8/8 w - - 0 0").unwrap_err();
            assert_eq!(FenParseError::InvalidDigit, err);
        }

        #[test]
        fn not_sum_to_8() {
            let err = Position::from_fen("pppp5/8/8/8/8/8/8/8 w - - 0 0").unwrap_err();
            assert_eq!(FenParseError::FileDoesNotSumToEight, err);
        }

        #[test]
        fn wrong_row_count() {
            let err = Position::from_fen("8/8/8/8/8/8/8 w - - 0 0").unwrap_err();
            assert_eq!(FenParseError::WrongRowCount, err);
        }

        #[test]
        fn bad_side_to_move() {
            let err = Position::from_fen("8/8/8/8/8/8/8/8 c - - 0 0").unwrap_err();
            assert_eq!(FenParseError::InvalidSideToMove, err);
        }

        #[test]
        fn bad_castle_status() {
            let err = Position::from_fen("8/8/8/8/8/8/8/8 w a - 0 0").unwrap_err();
            assert_eq!(FenParseError::InvalidCastle, err);
        }

        #[test]
        fn bad_en_passant() {
            let err = Position::from_fen("8/8/8/8/8/8/8/8 w - 88 0 0").unwrap_err();
            assert_eq!(FenParseError::InvalidEnPassant, err);
        }

        #[test]
        fn empty_halfmove() {
            let err = Position::from_fen("8/8/8/8/8/8/8/8 w - - q 0").unwrap_err();
            assert_eq!(FenParseError::EmptyHalfmove, err);
        }

        #[test]
        fn empty_fullmove() {
            let err = Position::from_fen("8/8/8/8/8/8/8/8 w - - 0 q").unwrap_err();
            assert_eq!(FenParseError::EmptyFullmove, err);
        }

        #[test]
        fn fullmove_early_end() {
            let err = Position::from_fen("8/8/8/8/8/8/8/8 w - - 0").unwrap_err();
            assert_eq!(FenParseError::UnexpectedEnd, err);
        }

        #[test]
        fn missing_king() {
            let err = Position::from_fen_with_kings("8/8/8/8/8/8/8/4K3 w - - 0 1").unwrap_err();
            assert_eq!(FenParseError::MissingKing(Color::Black), err);
            assert!(Position::from_fen_with_kings("4k3/8/8/8/8/8/8/4K3 w - - 0 1").is_ok());
        }
    }

    mod apply {
        use crate::board::BoardError;
        use crate::position::Position;
        use crate::special::CastleSide;
        use crate::types::{Color, PieceKind, Square};

        #[test]
        fn quiet_move() {
            let mut pos = Position::from_start_position();
            let applied = pos.apply_move(Square::G1, Square::F3);
            assert!(!applied.is_irreversible());
            assert!(pos.piece_at(Square::G1).is_none());
            assert!(pos.piece_at(Square::F3).unwrap().moved);
            assert_eq!(1, pos.halfmove_clock());

            // apply_move leaves the turn alone.
            assert_eq!(Color::White, pos.side_to_move());
            pos.end_turn();
            assert_eq!(Color::Black, pos.side_to_move());
            assert_eq!(1, pos.fullmove_clock());
            pos.apply_move(Square::G8, Square::F6);
            pos.end_turn();
            assert_eq!(2, pos.fullmove_clock());
        }

        #[test]
        fn double_push_sets_target() {
            let mut pos = Position::from_start_position();
            let applied = pos.apply_move(Square::E2, Square::E4);
            assert!(applied.is_pawn_move());
            assert_eq!(Some(Square::E3), pos.en_passant_square());
            assert_eq!(0, pos.halfmove_clock());
            pos.end_turn();
            pos.apply_move(Square::G8, Square::F6);
            assert_eq!(None, pos.en_passant_square());
        }

        #[test]
        fn capture() {
            let mut pos = Position::from_fen("4k3/8/8/3p4/4N3/8/8/4K3 w - - 7 1").unwrap();
            let applied = pos.apply_move(Square::E4, Square::D6);
            assert!(applied.captured.is_none());
            assert_eq!(8, pos.halfmove_clock());

            let mut pos = Position::from_fen("4k3/8/8/3p4/8/4N3/8/4K3 w - - 7 1").unwrap();
            let applied = pos.apply_move(Square::E3, Square::D5);
            assert_eq!(PieceKind::Pawn, applied.captured.unwrap().kind);
            assert_eq!(0, pos.halfmove_clock());
        }

        #[test]
        fn en_passant() {
            let mut pos = Position::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
            let applied = pos.apply_move(Square::E5, Square::D6);
            assert_eq!(Some(Square::D5), applied.en_passant);
            assert_eq!(PieceKind::Pawn, applied.captured.unwrap().kind);
            assert!(pos.piece_at(Square::D5).is_none());
            assert_eq!(Color::White, pos.piece_at(Square::D6).unwrap().color);
        }

        #[test]
        fn castle_moves_the_rook() {
            let mut pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
            let applied = pos.apply_move(Square::E1, Square::G1);
            assert_eq!(CastleSide::Short, applied.castle.unwrap().side);
            assert!(applied.is_irreversible());
            assert_eq!(PieceKind::King, pos.piece_at(Square::G1).unwrap().kind);
            let rook = pos.piece_at(Square::F1).unwrap();
            assert_eq!(PieceKind::Rook, rook.kind);
            assert!(rook.moved);
            assert!(pos.piece_at(Square::H1).is_none());

            pos.end_turn();
            let applied = pos.apply_move(Square::E8, Square::C8);
            assert_eq!(CastleSide::Long, applied.castle.unwrap().side);
            assert_eq!(PieceKind::Rook, pos.piece_at(Square::D8).unwrap().kind);
            assert!(pos.piece_at(Square::A8).is_none());
        }

        #[test]
        fn promotion() {
            let mut pos = Position::from_fen("8/4P3/8/8/8/8/k7/4K3 w - - 0 1").unwrap();
            let applied = pos.apply_move(Square::E7, Square::E8);
            assert!(applied.promotion_due);
            assert_eq!(
                Err(BoardError::NotPromotable),
                pos.promote(Square::E8, PieceKind::King)
            );
            assert_eq!(
                Err(BoardError::NotPromotable),
                pos.promote(Square::E8, PieceKind::Pawn)
            );
            assert_eq!(
                Err(BoardError::NotAPawn),
                pos.promote(Square::E1, PieceKind::Queen)
            );
            assert!(pos.promote(Square::E8, PieceKind::Knight).is_ok());
            assert_eq!(PieceKind::Knight, pos.piece_at(Square::E8).unwrap().kind);
        }
    }

    mod repetition {
        use crate::position::Position;
        use crate::types::Square;

        #[test]
        fn key_includes_side_to_move() {
            let white = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
            let black = Position::from_fen("4k3/8/8/8/8/8/8/4K3 b - - 0 1").unwrap();
            assert_ne!(white.repetition_key(), black.repetition_key());
        }

        #[test]
        fn knight_tour_returns_to_same_key() {
            let mut pos = Position::from_start_position();
            let start = pos.repetition_key();
            for &(from, to) in &[
                (Square::G1, Square::F3),
                (Square::G8, Square::F6),
                (Square::F3, Square::G1),
                (Square::F6, Square::G8),
            ] {
                pos.apply_move(from, to);
                pos.end_turn();
            }

            assert_eq!(start, pos.repetition_key());
        }

        #[test]
        fn castle_markers_follow_availability() {
            let open = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
            let none = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w - - 0 1").unwrap();
            assert_ne!(open.repetition_key(), none.repetition_key());
            assert!(open.repetition_key().contains("|KQkq|"));
        }
    }

    #[test]
    fn promotion_detection() {
        let pos = Position::from_fen("8/4P3/8/8/8/8/k7/4K3 w - - 0 1").unwrap();
        assert!(pos.is_promotion(Square::E7, Square::E8));
        assert!(!pos.is_promotion(Square::E1, Square::E2));
        assert_eq!(PieceKind::Pawn, pos.piece_at(Square::E7).unwrap().kind);
    }
}

// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Move notation. Algebraic notation is written for the move history and read
//! back when importing movetext; coordinate notation (`e2e4`, `e7e8q`) is what
//! the command-line driver accepts.
use std::convert::TryFrom;
use std::fmt::Write;

use regex::Regex;

use crate::position::Position;
use crate::special::{self, CastleSide, PROMOTION_KINDS};
use crate::types::{PieceKind, Square};

lazy_static! {
    static ref COORDINATE_MOVE: Regex =
        Regex::new(r"^([a-h][1-8])([a-h][1-8])([nbrqNBRQ])?$").expect("valid regex");
}

/// Algebraic notation for moving the piece on `from` to `to`, without the
/// promotion or check suffixes. Must be called before the move is applied.
pub fn describe_move(pos: &Position, from: Square, to: Square) -> String {
    let board = pos.board();
    let piece = match board.piece_at(from) {
        Some(piece) => piece,
        None => return String::new(),
    };

    if piece.kind == PieceKind::King {
        if let Some(castle) = special::castle_for_move(board, from, to) {
            return match castle.side {
                CastleSide::Short => "O-O".to_owned(),
                CastleSide::Long => "O-O-O".to_owned(),
            };
        }
    }

    let is_capture = board.is_occupied(to)
        || (piece.kind == PieceKind::Pawn
            && pos.en_passant_square() == Some(to)
            && special::en_passant_victim(board, from, to).is_some());

    let mut buf = String::new();
    if piece.kind == PieceKind::Pawn {
        if is_capture {
            write!(&mut buf, "{}x", from.file()).expect("writing to a String cannot fail");
        }
    } else {
        buf.push(piece.kind.san_letter());
        buf.push_str(&disambiguation(pos, from, to));
        if is_capture {
            buf.push('x');
        }
    }

    write!(&mut buf, "{}", to).expect("writing to a String cannot fail");
    buf
}

/// When another piece of the same kind and color could also reach `to`, the
/// file of `from` if that tells them apart, else the rank, else both.
fn disambiguation(pos: &Position, from: Square, to: Square) -> String {
    let board = pos.board();
    let piece = match board.piece_at(from) {
        Some(piece) => piece,
        None => return String::new(),
    };

    let rivals: Vec<Square> = board
        .pieces_of(piece.color)
        .filter(|&(sq, other)| sq != from && other.kind == piece.kind)
        .filter(|&(sq, _)| pos.legal_moves(sq).contains(&to))
        .map(|(sq, _)| sq)
        .collect();

    if rivals.is_empty() {
        return String::new();
    }

    let shares_file = rivals.iter().any(|sq| sq.file() == from.file());
    let shares_rank = rivals.iter().any(|sq| sq.rank() == from.rank());
    if !shares_file {
        from.file().to_string()
    } else if !shares_rank {
        from.rank().to_string()
    } else {
        from.to_string()
    }
}

/// The suffix marking a promotion, e.g. `=Q`.
pub fn promotion_suffix(kind: PieceKind) -> String {
    format!("={}", kind.san_letter())
}

/// Parses a coordinate move such as `g1f3` or `e7e8q`.
pub fn parse_coordinate_move(text: &str) -> Option<(Square, Square, Option<PieceKind>)> {
    let caps = COORDINATE_MOVE.captures(text.trim())?;
    let from = Square::try_from(caps.get(1)?.as_str()).ok()?;
    let to = Square::try_from(caps.get(2)?.as_str()).ok()?;
    let promotion = match caps.get(3) {
        Some(m) => {
            let c = m.as_str().chars().next()?;
            Some(PieceKind::try_from(c).ok()?)
        }
        None => None,
    };

    Some((from, to, promotion))
}

/// Strips annotation and check marks and normalizes zeros in castles, so
/// that `0-0+`, `O-O` and `O-O!?` compare equal.
fn normalize_san(san: &str) -> String {
    let trimmed = san.trim_end_matches(|c| c == '+' || c == '#' || c == '!' || c == '?');
    trimmed.replace('0', "O").replace('=', "")
}

/// Finds the legal move for the side to move that `san` describes. The
/// promotion kind is returned for pawn moves to the last rank.
pub fn find_san_move(pos: &Position, san: &str) -> Option<(Square, Square, Option<PieceKind>)> {
    let wanted = normalize_san(san);
    for (from, to) in pos.all_legal_moves() {
        let base = describe_move(pos, from, to);
        if pos.is_promotion(from, to) {
            for &kind in PROMOTION_KINDS.iter() {
                let candidate = format!("{}{}", base, kind.san_letter());
                if candidate == wanted {
                    return Some((from, to, Some(kind)));
                }
            }
        } else if normalize_san(&base) == wanted {
            return Some((from, to, None));
        }
    }

    None
}

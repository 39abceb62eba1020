// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Filters pseudo-legal destinations down to legal ones.
//!
//! Non-king pieces are filtered structurally: a double check leaves them no
//! moves, a single check restricts them to the checking line, and a pin
//! restricts them to the pin line. King moves and en passant captures are
//! instead tried on a scratch board, since both change which rays reach the
//! king in ways the structural tests do not see.
use crate::attacks::{self, SquareVec};
use crate::board::{Board, Piece};
use crate::direction::{self, relation};
use crate::movement;
use crate::position::Position;
use crate::special;
use crate::types::{Color, PieceKind, Square};

/// Legal destinations of the piece on `from`, including castles and en
/// passant captures.
pub fn legal_destinations(pos: &Position, from: Square) -> SquareVec {
    let board = pos.board();
    let piece = match board.piece_at(from) {
        Some(piece) => piece,
        None => return SquareVec::new(),
    };

    if piece.kind == PieceKind::King {
        return king_destinations(board, from, piece);
    }

    let en_passant = en_passant_capture(pos, from, piece);
    let mut dests = attacks::pseudo_destinations(board, from);
    if let Some((target, _)) = en_passant {
        dests.push(target);
    }

    // Hand-built positions may lack a king, in which case there is nothing to
    // protect.
    let king = match board.king_square(piece.color) {
        Some(king) => king,
        None => return dests,
    };

    let checkers = attacks::attackers_of(board, king, piece.color);
    if checkers.len() >= 2 {
        return SquareVec::new();
    }

    if let Some(&checker) = checkers.first() {
        let block = check_line(king, checker);
        dests.retain(|sq| {
            block.contains(sq)
                || en_passant.map_or(false, |(target, victim)| *sq == target && victim == checker)
        });
    }

    if let Some(pin) = pin_line(board, from, king, piece.color) {
        dests.retain(|sq| pin.contains(sq));
    }

    if let Some((target, victim)) = en_passant {
        if dests.contains(&target) && !en_passant_is_safe(board, from, target, victim, king) {
            dests.retain(|sq| *sq != target);
        }
    }

    dests
}

/// Squares a non-king piece may move to in order to answer a check from
/// `checker`: anywhere on the line between them, or the checker itself.
fn check_line(king: Square, checker: Square) -> Vec<Square> {
    match relation(king, checker) {
        Some(_) => direction::line(king, checker),
        None => vec![checker],
    }
}

/// If the piece on `from` is pinned to its king, the squares it may still
/// move to: the line from the king through the pinning piece.
pub fn pin_line(board: &Board, from: Square, king: Square, color: Color) -> Option<Vec<Square>> {
    let toward_king = relation(from, king)?;
    if attacks::ray_destination(board, from, toward_king, 7)? != king {
        return None;
    }

    let beyond = attacks::ray_destination(board, from, toward_king.opposite(), 7)?;
    let pinner = board.piece_at(beyond)?;
    if pinner.color == color {
        return None;
    }

    let cap = movement::attack_capability(pinner.kind, pinner.color);
    if !cap.is_sliding() || !cap.includes(toward_king) {
        return None;
    }

    Some(direction::line(king, beyond))
}

fn king_destinations(board: &Board, from: Square, king: Piece) -> SquareVec {
    let mut dests = attacks::pseudo_destinations(board, from);
    dests.retain(|to| {
        let mut scratch = board.clone();
        scratch.relocate(from, *to);
        !attacks::is_attacked(&scratch, *to, king.color)
    });

    for castle in special::castle_options(board, from) {
        dests.push(castle.king_to);
    }

    dests
}

/// The en passant capture available to the piece on `from`, as the target
/// square and the square of the pawn it removes.
fn en_passant_capture(pos: &Position, from: Square, piece: Piece) -> Option<(Square, Square)> {
    if piece.kind != PieceKind::Pawn || piece.color != pos.side_to_move() {
        return None;
    }

    let target = pos.en_passant_square()?;
    let victim = special::en_passant_victim(pos.board(), from, target)?;
    Some((target, victim))
}

fn en_passant_is_safe(
    board: &Board,
    from: Square,
    target: Square,
    victim: Square,
    king: Square,
) -> bool {
    let mut scratch = board.clone();
    let pawn = match scratch.relocate(from, target) {
        None => scratch.piece_at(target),
        Some(_) => return false,
    };

    scratch.remove_piece(victim);
    match pawn {
        Some(pawn) => !attacks::is_attacked(&scratch, king, pawn.color),
        None => false,
    }
}

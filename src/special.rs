// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use arrayvec::ArrayVec;

use crate::attacks::{self, ray_destination};
use crate::board::{Board, Piece};
use crate::direction::{self, Direction};
use crate::movement;
use crate::types::{Color, PieceKind, Square};

bitflags! {
    /// Castles that are currently playable, as opposed to merely not yet
    /// forfeited. Used as markers in the repetition key.
    pub struct CastleRights: u8 {
        const NONE = 0;
        const WHITE_SHORT = 0b0000_0001;
        const WHITE_LONG = 0b0000_0010;
        const WHITE = Self::WHITE_SHORT.bits | Self::WHITE_LONG.bits;
        const BLACK_SHORT = 0b0000_0100;
        const BLACK_LONG = 0b0000_1000;
        const BLACK = Self::BLACK_SHORT.bits | Self::BLACK_LONG.bits;
    }
}

impl CastleRights {
    pub fn of(color: Color, side: CastleSide) -> CastleRights {
        match (color, side) {
            (Color::White, CastleSide::Short) => CastleRights::WHITE_SHORT,
            (Color::White, CastleSide::Long) => CastleRights::WHITE_LONG,
            (Color::Black, CastleSide::Short) => CastleRights::BLACK_SHORT,
            (Color::Black, CastleSide::Long) => CastleRights::BLACK_LONG,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CastleSide {
    Short,
    Long,
}

pub static CASTLE_SIDES: [CastleSide; 2] = [CastleSide::Short, CastleSide::Long];

/// A fully validated castle: where the king and rook start and land.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Castle {
    pub side: CastleSide,
    pub king_from: Square,
    pub king_to: Square,
    pub rook_from: Square,
    pub rook_to: Square,
}

/// The direction the king travels to castle on `side`. The short side is the
/// one with less room between the king and the edge of the board.
fn castle_direction(king: Square, side: CastleSide) -> Direction {
    let east_room = 7 - king.col();
    let west_room = king.col();
    let short = if east_room <= west_room {
        Direction::East
    } else {
        Direction::West
    };

    match side {
        CastleSide::Short => short,
        CastleSide::Long => short.opposite(),
    }
}

/// Looks for the rook a king on `king_sq` would castle with on `side`: the
/// first piece along the back rank in that direction, which must be an unmoved
/// rook of the king's color.
fn castle_rook(board: &Board, king_sq: Square, king: Piece, side: CastleSide) -> Option<Square> {
    let dir = castle_direction(king_sq, side);
    let rook_sq = ray_destination(board, king_sq, dir, 7)?;
    match board.piece_at(rook_sq) {
        Some(rook) if rook.kind == PieceKind::Rook && rook.color == king.color && !rook.moved => {
            Some(rook_sq)
        }
        _ => None,
    }
}

/// Checks whether the king standing on `king_sq` may castle on `side` right
/// now. Both pieces must be unmoved, nothing may stand between them, and the
/// king may not start on, cross, or land on an attacked square.
pub fn check_castle(board: &Board, king_sq: Square, side: CastleSide) -> Option<Castle> {
    let king = board.piece_at(king_sq)?;
    if king.kind != PieceKind::King || king.moved {
        return None;
    }

    let rook_from = castle_rook(board, king_sq, king, side)?;
    if direction::distance(king_sq, rook_from) < 3 {
        return None;
    }

    let dir = castle_direction(king_sq, side);
    let rook_to = direction::apply(king_sq, dir, 1)?;
    let king_to = direction::apply(king_sq, dir, 2)?;
    for &sq in &[king_sq, rook_to, king_to] {
        if attacks::is_attacked(board, sq, king.color) {
            return None;
        }
    }

    Some(Castle {
        side,
        king_from: king_sq,
        king_to,
        rook_from,
        rook_to,
    })
}

/// All castles playable by the king on `king_sq`.
pub fn castle_options(board: &Board, king_sq: Square) -> ArrayVec<Castle, 2> {
    CASTLE_SIDES
        .iter()
        .filter_map(|&side| check_castle(board, king_sq, side))
        .collect()
}

/// Recognizes a king move from `from` to `to` as a castle.
pub fn castle_for_move(board: &Board, from: Square, to: Square) -> Option<Castle> {
    castle_options(board, from)
        .into_iter()
        .find(|castle| castle.king_to == to)
}

/// Castling availability for both sides, found by probing `check_castle` on
/// every square that holds a king.
pub fn castle_availability(board: &Board) -> CastleRights {
    let mut rights = CastleRights::NONE;
    for (sq, piece) in board.pieces() {
        if piece.kind != PieceKind::King {
            continue;
        }

        for castle in castle_options(board, sq) {
            rights |= CastleRights::of(piece.color, castle.side);
        }
    }

    rights
}

/// Castles not yet forfeited: the king and the relevant rook are both unmoved,
/// regardless of what stands between them or what is attacked.
pub fn castle_rights(board: &Board) -> CastleRights {
    let mut rights = CastleRights::NONE;
    for (king_sq, king) in board.pieces() {
        if king.kind != PieceKind::King || king.moved {
            continue;
        }

        for &side in CASTLE_SIDES.iter() {
            let dir = castle_direction(king_sq, side);
            let has_rook = (1..8)
                .filter_map(|step| direction::apply(king_sq, dir, step))
                .filter_map(|sq| board.piece_at(sq))
                .any(|p| p.kind == PieceKind::Rook && p.color == king.color && !p.moved);
            if has_rook {
                rights |= CastleRights::of(king.color, side);
            }
        }
    }

    rights
}

/// If the pawn on `from` may capture en passant onto `target`, returns the
/// square of the pawn that would be removed.
pub fn en_passant_victim(board: &Board, from: Square, target: Square) -> Option<Square> {
    let pawn = board.piece_at(from)?;
    if pawn.kind != PieceKind::Pawn || board.is_occupied(target) {
        return None;
    }

    let on_diagonal = movement::pawn_capture(pawn.color)
        .iter()
        .any(|&dir| direction::apply(from, dir, 1) == Some(target));
    if !on_diagonal {
        return None;
    }

    let victim = Square::from_coords(from.row(), target.col())?;
    match board.piece_at(victim) {
        Some(p) if p.kind == PieceKind::Pawn && p.color != pawn.color => Some(victim),
        _ => None,
    }
}

/// The square a double-stepping pawn leaves behind it, which becomes the en
/// passant target.
pub fn en_passant_target(pawn: Piece, from: Square, to: Square) -> Option<Square> {
    if pawn.kind != PieceKind::Pawn || (to.row() - from.row()).abs() != 2 {
        return None;
    }

    direction::apply(from, movement::forward(pawn.color), 1)
}

/// Whether `piece` arriving on `to` must promote.
pub fn is_promotion(piece: Piece, to: Square) -> bool {
    piece.kind == PieceKind::Pawn && to.row() == piece.color.promotion_row()
}

/// Kinds a pawn may become.
pub fn is_promotion_kind(kind: PieceKind) -> bool {
    match kind {
        PieceKind::Knight | PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => true,
        PieceKind::Pawn | PieceKind::King => false,
    }
}

pub static PROMOTION_KINDS: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];

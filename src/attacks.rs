// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use arrayvec::ArrayVec;

use crate::board::Board;
use crate::direction::{self, Direction};
use crate::movement::{self, Capability, Movement, Reach};
use crate::types::{Color, PieceKind, Square, PIECE_KINDS};

/// Destinations of a single piece. A queen in the middle of an empty board
/// reaches 27 squares, which is the most any piece can.
pub type SquareVec = ArrayVec<Square, 32>;

/// Walks from `from` in `dir` for at most `limit` steps and returns the first
/// occupied square, or the last square on the board if nothing was hit.
/// Returns `None` if the very first step leaves the board.
pub fn ray_destination(board: &Board, from: Square, dir: Direction, limit: i32) -> Option<Square> {
    let mut last = None;
    for step in 1..=limit {
        let sq = match direction::apply(from, dir, step) {
            Some(sq) => sq,
            None => break,
        };

        last = Some(sq);
        if board.is_occupied(sq) {
            break;
        }
    }

    last
}

/// Whether a probe (as opposed to a real move) is resolving the destination.
/// Probes may land on kings; moves may not.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Purpose {
    Move,
    Probe,
}

/// Applies capture rules to the end of a ray or leap. Rays that end on a
/// square the mover may not enter back off by one square, since everything
/// before the blocker is still reachable; leaps simply fail.
pub fn resolve_destination(
    board: &Board,
    origin: Square,
    candidate: Square,
    dir: Option<Direction>,
    mover: Color,
    reach: Reach,
    purpose: Purpose,
) -> Option<Square> {
    let back_off = || {
        let dir = dir?;
        let prev = direction::apply(candidate, dir.opposite(), 1)?;
        if prev == origin {
            None
        } else {
            Some(prev)
        }
    };

    match board.piece_at(candidate) {
        None if reach == Reach::AttackOnly => None,
        None => Some(candidate),
        Some(_) if reach == Reach::PushOnly => back_off(),
        Some(piece) if piece.color == mover => back_off(),
        Some(piece) if piece.kind == PieceKind::King && purpose == Purpose::Move => back_off(),
        Some(_) => Some(candidate),
    }
}

/// Every square a capability reaches from `from`, for a piece of color
/// `mover`. Ray-based movement contributes the whole path up to the resolved
/// end of each ray.
pub fn capability_destinations(
    board: &Board,
    from: Square,
    mover: Color,
    cap: &Capability,
    purpose: Purpose,
    out: &mut SquareVec,
) {
    let walk_rays = |dirs: &[Direction], limit: i32, out: &mut SquareVec| {
        for &dir in dirs {
            let candidate = match ray_destination(board, from, dir, limit) {
                Some(sq) => sq,
                None => continue,
            };

            let end =
                match resolve_destination(board, from, candidate, Some(dir), mover, cap.reach, purpose) {
                    Some(sq) => sq,
                    None => continue,
                };

            out.extend(direction::line(from, end));
        }
    };

    match cap.movement {
        Movement::Sliding(dirs) => walk_rays(dirs, 7, out),
        Movement::Stepped { directions, steps } => walk_rays(directions, steps, out),
        Movement::Leaping(paths) => {
            for path in paths {
                let candidate = match direction::follow(from, path) {
                    Some(sq) => sq,
                    None => continue,
                };

                if let Some(sq) =
                    resolve_destination(board, from, candidate, None, mover, cap.reach, purpose)
                {
                    out.push(sq);
                }
            }
        }
    }
}

/// Pseudo-legal destinations of the piece standing on `from`: every square
/// its capabilities reach, ignoring check, pins, castling and en passant.
pub fn pseudo_destinations(board: &Board, from: Square) -> SquareVec {
    let mut out = SquareVec::new();
    let piece = match board.piece_at(from) {
        Some(piece) => piece,
        None => return out,
    };

    for cap in movement::capabilities(piece.kind, piece.color, piece.moved).iter() {
        capability_destinations(board, from, piece.color, cap, Purpose::Move, &mut out);
    }

    out
}

/// Returns the squares of every piece that attacks `square`, from the point of
/// view of `defender`.
///
/// Rather than generating every enemy move, this stands a piece of each kind
/// of the defender's color on `square` and probes outward with that kind's
/// attack pattern. A probe that ends on an enemy of the same kind means that
/// enemy attacks the square, because every attack pattern is symmetric once
/// the pawn direction is flipped (which the defender's color does).
pub fn attackers_of(board: &Board, square: Square, defender: Color) -> SquareVec {
    let mut attackers = SquareVec::new();
    for &kind in PIECE_KINDS.iter() {
        let cap = movement::attack_capability(kind, defender);
        let probe = Capability {
            movement: cap.movement,
            reach: Reach::AttackOnly,
        };

        let mut ends = SquareVec::new();
        capability_destinations(board, square, defender, &probe, Purpose::Probe, &mut ends);
        for sq in ends {
            match board.piece_at(sq) {
                Some(piece) if piece.kind == kind && piece.color != defender => {
                    trace!("{} attacks {} ({:?})", sq, square, kind);
                    attackers.push(sq);
                }
                _ => {}
            }
        }
    }

    attackers
}

pub fn is_attacked(board: &Board, square: Square, defender: Color) -> bool {
    !attackers_of(board, square, defender).is_empty()
}

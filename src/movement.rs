// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The movement capability table. Every piece kind is described by a small
//! closed set of descriptors rather than per-kind code, so that move
//! generation and attack probing share one implementation.
use arrayvec::ArrayVec;

use crate::direction::{Direction, LeapPath, DIAGONALS, DIRECTIONS, LEAP_PATHS, ORTHOGONALS};
use crate::types::{Color, PieceKind};

/// How a piece travels along its directions.
#[derive(Copy, Clone, Debug)]
pub enum Movement {
    /// Travels along each direction until blocked or off the board.
    Sliding(&'static [Direction]),
    /// Travels along each direction for at most `steps` squares.
    Stepped {
        directions: &'static [Direction],
        steps: i32,
    },
    /// Jumps along each path, ignoring whatever stands in between.
    Leaping(&'static [LeapPath]),
}

/// What a destination square must contain for a move to land there.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Reach {
    /// Empty, or occupied by an enemy.
    Any,
    /// Occupied by an enemy. Pawn captures.
    AttackOnly,
    /// Empty. Pawn pushes.
    PushOnly,
}

#[derive(Copy, Clone, Debug)]
pub struct Capability {
    pub movement: Movement,
    pub reach: Reach,
}

impl Capability {
    /// Whether this capability travels along `dir` at all. Leaps never do;
    /// they are not ray-based.
    pub fn includes(&self, dir: Direction) -> bool {
        match self.movement {
            Movement::Sliding(dirs) => dirs.contains(&dir),
            Movement::Stepped { directions, .. } => directions.contains(&dir),
            Movement::Leaping(_) => false,
        }
    }

    pub fn is_sliding(&self) -> bool {
        match self.movement {
            Movement::Sliding(_) => true,
            _ => false,
        }
    }
}

pub type Capabilities = ArrayVec<Capability, 2>;

static WHITE_PAWN_PUSH: [Direction; 1] = [Direction::North];
static BLACK_PAWN_PUSH: [Direction; 1] = [Direction::South];
static WHITE_PAWN_CAPTURE: [Direction; 2] = [Direction::NorthWest, Direction::NorthEast];
static BLACK_PAWN_CAPTURE: [Direction; 2] = [Direction::SouthWest, Direction::SouthEast];

fn pawn_push(color: Color) -> &'static [Direction] {
    match color {
        Color::White => &WHITE_PAWN_PUSH,
        Color::Black => &BLACK_PAWN_PUSH,
    }
}

/// The two diagonals a pawn of this color captures along.
pub fn pawn_capture(color: Color) -> &'static [Direction] {
    match color {
        Color::White => &WHITE_PAWN_CAPTURE,
        Color::Black => &BLACK_PAWN_CAPTURE,
    }
}

/// The forward direction for a pawn of this color.
pub fn forward(color: Color) -> Direction {
    pawn_push(color)[0]
}

/// The full set of capabilities a piece uses to move. Pawns get two: a
/// push-only forward step (two squares if the pawn has never moved) and an
/// attack-only diagonal step.
pub fn capabilities(kind: PieceKind, color: Color, moved: bool) -> Capabilities {
    let mut caps = Capabilities::new();
    match kind {
        PieceKind::Pawn => {
            caps.push(Capability {
                movement: Movement::Stepped {
                    directions: pawn_push(color),
                    steps: if moved { 1 } else { 2 },
                },
                reach: Reach::PushOnly,
            });
            caps.push(attack_capability(kind, color));
        }
        _ => caps.push(attack_capability(kind, color)),
    }

    caps
}

/// The capability a piece uses to attack a square. For every piece but the
/// pawn this is the same as how it moves.
pub fn attack_capability(kind: PieceKind, color: Color) -> Capability {
    let (movement, reach) = match kind {
        PieceKind::Pawn => (
            Movement::Stepped {
                directions: pawn_capture(color),
                steps: 1,
            },
            Reach::AttackOnly,
        ),
        PieceKind::Knight => (Movement::Leaping(&LEAP_PATHS[..]), Reach::Any),
        PieceKind::Bishop => (Movement::Sliding(&DIAGONALS), Reach::Any),
        PieceKind::Rook => (Movement::Sliding(&ORTHOGONALS), Reach::Any),
        PieceKind::Queen => (Movement::Sliding(&DIRECTIONS), Reach::Any),
        PieceKind::King => (
            Movement::Stepped {
                directions: &DIRECTIONS,
                steps: 1,
            },
            Reach::Any,
        ),
    };

    Capability { movement, reach }
}

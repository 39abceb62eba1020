// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Compass directions and the coordinate arithmetic built on them. Every
//! movement rule in the engine is expressed as walks along these directions,
//! including the knight, whose jump is a fixed three-step path.
use crate::types::Square;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

pub static DIRECTIONS: [Direction; 8] = [
    Direction::North,
    Direction::NorthEast,
    Direction::East,
    Direction::SouthEast,
    Direction::South,
    Direction::SouthWest,
    Direction::West,
    Direction::NorthWest,
];

pub static ORTHOGONALS: [Direction; 4] = [
    Direction::North,
    Direction::East,
    Direction::South,
    Direction::West,
];

pub static DIAGONALS: [Direction; 4] = [
    Direction::NorthEast,
    Direction::SouthEast,
    Direction::SouthWest,
    Direction::NorthWest,
];

/// A knight's jump: two steps one way, then one step perpendicular.
pub type LeapPath = [Direction; 3];

lazy_static! {
    pub static ref LEAP_PATHS: Vec<LeapPath> = {
        let mut paths = Vec::with_capacity(8);
        for &dir in ORTHOGONALS.iter() {
            for &side in dir.perpendiculars().iter() {
                paths.push([dir, dir, side]);
            }
        }
        paths
    };
}

impl Direction {
    /// The (row, col) delta of a single step. North moves toward Black's back
    /// rank.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (1, 0),
            Direction::NorthEast => (1, 1),
            Direction::East => (0, 1),
            Direction::SouthEast => (-1, 1),
            Direction::South => (-1, 0),
            Direction::SouthWest => (-1, -1),
            Direction::West => (0, -1),
            Direction::NorthWest => (1, -1),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::NorthEast => Direction::SouthWest,
            Direction::East => Direction::West,
            Direction::SouthEast => Direction::NorthWest,
            Direction::South => Direction::North,
            Direction::SouthWest => Direction::NorthEast,
            Direction::West => Direction::East,
            Direction::NorthWest => Direction::SouthEast,
        }
    }

    pub fn is_diagonal(self) -> bool {
        let (row, col) = self.delta();
        row != 0 && col != 0
    }

    /// The two directions at right angles to this one. Only meaningful for
    /// orthogonal directions; diagonals return their diagonal neighbours.
    pub fn perpendiculars(self) -> [Direction; 2] {
        match self {
            Direction::North | Direction::South => [Direction::East, Direction::West],
            Direction::East | Direction::West => [Direction::North, Direction::South],
            Direction::NorthEast | Direction::SouthWest => {
                [Direction::NorthWest, Direction::SouthEast]
            }
            Direction::NorthWest | Direction::SouthEast => {
                [Direction::NorthEast, Direction::SouthWest]
            }
        }
    }
}

/// Moves `steps` squares from `square` in `dir`. Returns `None` if the result
/// is off the board.
pub fn apply(square: Square, dir: Direction, steps: i32) -> Option<Square> {
    let (drow, dcol) = dir.delta();
    Square::from_coords(square.row() + drow * steps, square.col() + dcol * steps)
}

/// Returns the direction that leads from `from` to `to`, if the two squares
/// share a row, a column or a diagonal.
pub fn relation(from: Square, to: Square) -> Option<Direction> {
    let drow = to.row() - from.row();
    let dcol = to.col() - from.col();
    if drow == 0 && dcol == 0 {
        return None;
    }

    if drow != 0 && dcol != 0 && drow.abs() != dcol.abs() {
        return None;
    }

    let dir = match (drow.signum(), dcol.signum()) {
        (1, 0) => Direction::North,
        (1, 1) => Direction::NorthEast,
        (0, 1) => Direction::East,
        (-1, 1) => Direction::SouthEast,
        (-1, 0) => Direction::South,
        (-1, -1) => Direction::SouthWest,
        (0, -1) => Direction::West,
        (1, -1) => Direction::NorthWest,
        _ => unreachable!(),
    };

    Some(dir)
}

/// Number of steps between two squares related by `relation`. Zero if they
/// are not co-linear.
pub fn distance(from: Square, to: Square) -> i32 {
    if relation(from, to).is_none() {
        return 0;
    }

    (to.row() - from.row())
        .abs()
        .max((to.col() - from.col()).abs())
}

/// Follows a leap path from `square`. Every intermediate step must stay on the
/// board.
pub fn follow(square: Square, path: &LeapPath) -> Option<Square> {
    path.iter()
        .try_fold(square, |current, &dir| apply(current, dir, 1))
}

/// All squares strictly after `from` up to and including `to`, walking in the
/// direction that relates them. Empty when the squares are not co-linear.
pub fn line(from: Square, to: Square) -> Vec<Square> {
    let dir = match relation(from, to) {
        Some(dir) => dir,
        None => return vec![],
    };

    (1..=distance(from, to))
        .filter_map(|step| apply(from, dir, step))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Square;

    #[test]
    fn apply_in_bounds() {
        assert_eq!(Some(Square::E4), apply(Square::E2, Direction::North, 2));
        assert_eq!(Some(Square::C3), apply(Square::E1, Direction::NorthWest, 2));
    }

    #[test]
    fn apply_out_of_bounds() {
        assert_eq!(None, apply(Square::H4, Direction::East, 1));
        assert_eq!(None, apply(Square::A1, Direction::SouthWest, 1));
        assert_eq!(None, apply(Square::E7, Direction::North, 2));
    }

    #[test]
    fn relation_straight_and_diagonal() {
        assert_eq!(Some(Direction::North), relation(Square::E1, Square::E8));
        assert_eq!(Some(Direction::West), relation(Square::H3, Square::B3));
        assert_eq!(Some(Direction::SouthEast), relation(Square::A8, Square::H1));
        assert_eq!(Some(Direction::NorthWest), relation(Square::F2, Square::D4));
    }

    #[test]
    fn relation_none() {
        assert_eq!(None, relation(Square::E4, Square::E4));
        assert_eq!(None, relation(Square::G1, Square::F3));
        assert_eq!(None, relation(Square::A1, Square::B3));
    }

    #[test]
    fn opposite_is_involution() {
        for &dir in DIRECTIONS.iter() {
            assert_eq!(dir, dir.opposite().opposite());
            assert_ne!(dir, dir.opposite());
        }
    }

    #[test]
    fn leap_paths_are_knight_jumps() {
        let mut targets: Vec<_> = LEAP_PATHS
            .iter()
            .filter_map(|path| follow(Square::D4, path))
            .collect();
        targets.sort();
        let mut expected = vec![
            Square::C2,
            Square::E2,
            Square::B3,
            Square::F3,
            Square::B5,
            Square::F5,
            Square::C6,
            Square::E6,
        ];
        expected.sort();
        assert_eq!(expected, targets);
    }

    #[test]
    fn leap_from_corner() {
        let targets: Vec<_> = LEAP_PATHS
            .iter()
            .filter_map(|path| follow(Square::A1, path))
            .collect();
        assert_eq!(2, targets.len());
        assert!(targets.contains(&Square::B3));
        assert!(targets.contains(&Square::C2));
    }

    #[test]
    fn line_between() {
        assert_eq!(
            vec![Square::E2, Square::E3, Square::E4],
            line(Square::E1, Square::E4)
        );
        assert_eq!(vec![Square::B2], line(Square::A1, Square::B2));
        assert!(line(Square::A1, Square::B3).is_empty());
    }
}

// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use rayon::prelude::*;

use crate::position::Position;
use crate::special::PROMOTION_KINDS;
use crate::types::Square;

/// Counts the leaves of the legal move tree of depth `depth`. A pawn move to
/// the last rank counts once per promotion kind.
pub fn perft(pos: &Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    pos.all_legal_moves()
        .par_iter()
        .map(|&(from, to)| perft_move(pos, from, to, depth - 1))
        .sum()
}

/// Leaves below a single move, which branches once per promotion kind when
/// it lands a pawn on the last rank.
fn perft_move(pos: &Position, from: Square, to: Square, depth: u32) -> u64 {
    let mut new_pos = pos.clone();
    let applied = new_pos.apply_move(from, to);
    if !applied.promotion_due {
        new_pos.end_turn();
        return perft(&new_pos, depth);
    }

    PROMOTION_KINDS
        .iter()
        .map(|&kind| {
            let mut promoted = new_pos.clone();
            promoted
                .promote(to, kind)
                .expect("promotion square does not hold a pawn");
            promoted.end_turn();
            perft(&promoted, depth)
        })
        .sum()
}

/// Leaf counts below each legal move of the root, for tracking down which
/// branch of a perft disagrees with a reference count.
pub fn divide(pos: &Position, depth: u32) -> Vec<(String, u64)> {
    if depth == 0 {
        return vec![];
    }

    let mut results: Vec<(String, u64)> = pos
        .all_legal_moves()
        .par_iter()
        .map(|&(from, to)| {
            let count = perft_move(pos, from, to, depth - 1);
            (format!("{}{}", from, to), count)
        })
        .collect();

    results.sort();
    results
}

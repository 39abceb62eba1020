// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

/// A countdown of whole seconds. The clock does not read the time itself;
/// whoever drives the game calls `tick` with elapsed seconds, and only a
/// running clock counts down.
///
/// A clock created with zero seconds is untimed and never expires.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Clock {
    limit: u32,
    remaining: u32,
    running: bool,
}

impl Clock {
    pub fn new(seconds: u32) -> Clock {
        Clock {
            limit: seconds,
            remaining: seconds,
            running: false,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_timed(&self) -> bool {
        self.limit > 0
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Counts down by `seconds` if running. Saturates at zero.
    pub fn tick(&mut self, seconds: u32) {
        if self.running && self.is_timed() {
            self.remaining = self.remaining.saturating_sub(seconds);
        }
    }

    pub fn expired(&self) -> bool {
        self.is_timed() && self.remaining == 0
    }
}

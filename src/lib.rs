// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A chess rules engine: legal moves, check and pin detection, the special
//! moves, and a game state machine that knows every way a game can end.

#[macro_use]
extern crate num_derive;
#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate pest_derive;

pub mod attacks;
pub mod board;
mod clock;
mod config;
pub mod direction;
mod game;
pub mod import;
pub mod legality;
pub mod movement;
pub mod notation;
mod perft;
mod position;
pub mod record;
pub mod special;
mod types;

pub use board::{Board, BoardError, Piece, PieceId, Shade};
pub use clock::Clock;
pub use config::{ConfigError, GameConfig};
pub use game::{DrawKind, Game, PlayState, Player, WinKind};
pub use perft::{divide, perft};
pub use position::{AppliedMove, FenParseError, Position};
pub use types::TableIndex;
pub use types::{Color, File, PieceKind, Rank, Square, COLORS};

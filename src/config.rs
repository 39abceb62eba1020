// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Tunable rules of a game. Every field has a default, so a JSON file only
/// needs to name what it changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seconds on each player's clock. Zero disables the clocks.
    pub clock_seconds: u32,
    /// Plies without a pawn move or capture before the game is drawn.
    pub fifty_move_plies: u32,
    /// Occurrences of one position before the game is drawn.
    pub repetition_count: usize,
}

impl Default for GameConfig {
    fn default() -> GameConfig {
        GameConfig {
            clock_seconds: 120,
            fifty_move_plies: 50,
            repetition_count: 3,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "failed to read config: {}", err),
            ConfigError::Json(err) => write!(f, "invalid config: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> ConfigError {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> ConfigError {
        ConfigError::Json(err)
    }
}

impl GameConfig {
    pub fn from_reader<R: Read>(reader: R) -> Result<GameConfig, ConfigError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<GameConfig, ConfigError> {
        let file = File::open(path)?;
        GameConfig::from_reader(file)
    }
}

// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Import of minimal movetext: optional `[Tag "value"]` pairs followed by
//! numbered algebraic moves and an optional result.
use std::fmt;

use pest::Parser;

use crate::game::{Game, PlayState};
use crate::notation;

#[derive(Parser)]
#[grammar = "movetext.pest"]
struct MovetextParser;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImportError {
    /// The text does not match the movetext grammar.
    Syntax(String),
    /// The move at the given ply (counting from one) is not legal there.
    IllegalMove { ply: usize, san: String },
    /// The game ended before all moves were played.
    GameOver { ply: usize, state: PlayState },
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ImportError::Syntax(msg) => write!(f, "syntax error: {}", msg),
            ImportError::IllegalMove { ply, san } => {
                write!(f, "illegal move '{}' at ply {}", san, ply)
            }
            ImportError::GameOver { ply, state } => {
                write!(f, "game already over ({}) at ply {}", state, ply)
            }
        }
    }
}

impl std::error::Error for ImportError {}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Movetext {
    pub tags: Vec<(String, String)>,
    pub moves: Vec<String>,
    pub result: Option<String>,
}

impl Movetext {
    pub fn parse(text: &str) -> Result<Movetext, ImportError> {
        let mut pairs = MovetextParser::parse(Rule::movetext, text)
            .map_err(|err| ImportError::Syntax(err.to_string()))?;

        let mut movetext = Movetext::default();
        let root = match pairs.next() {
            Some(root) => root,
            None => return Ok(movetext),
        };

        for pair in root.into_inner() {
            match pair.as_rule() {
                Rule::tag_pair => {
                    let mut inner = pair.into_inner();
                    let name = inner.next().map(|p| p.as_str().to_owned());
                    let value = inner.next().map(|p| {
                        let quoted = p.as_str();
                        quoted[1..quoted.len() - 1].to_owned()
                    });
                    if let (Some(name), Some(value)) = (name, value) {
                        movetext.tags.push((name, value));
                    }
                }
                Rule::san => movetext.moves.push(pair.as_str().to_owned()),
                Rule::result => movetext.result = Some(pair.as_str().to_owned()),
                _ => {}
            }
        }

        Ok(movetext)
    }

    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(tag, _)| tag == name)
            .map(|(_, value)| value.as_str())
    }

    /// Plays every move on `game`, starting it if it is paused. `on_ply` sees
    /// the game after each completed ply.
    pub fn play<F>(&self, game: &mut Game, mut on_ply: F) -> Result<(), ImportError>
    where
        F: FnMut(&Game),
    {
        game.start();
        for (idx, san) in self.moves.iter().enumerate() {
            let ply = idx + 1;
            if game.state().is_over() {
                return Err(ImportError::GameOver {
                    ply,
                    state: game.state(),
                });
            }

            let (from, to, promotion) = notation::find_san_move(game.position(), san)
                .ok_or_else(|| ImportError::IllegalMove {
                    ply,
                    san: san.clone(),
                })?;

            game.move_piece(from, to);
            if let Some(kind) = promotion {
                game.promote(kind);
            }

            debug!("imported ply {}: {}", ply, san);
            on_ply(game);
        }

        Ok(())
    }
}

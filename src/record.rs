// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::io::Write;
use std::sync::Mutex;

use csv::Writer;

use crate::game::Game;
use crate::types::Color;

/// One row per completed ply.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub ply: usize,
    pub color: Color,
    pub notation: String,
    pub fen: String,
    pub state: String,
    pub white_clock: u32,
    pub black_clock: u32,
}

impl Record {
    /// Describes the most recent ply of `game`. `None` before the first ply.
    pub fn from_game(game: &Game) -> Option<Record> {
        let notation = game.history().last()?.clone();
        Some(Record {
            ply: game.history().len(),
            color: game.turn().toggle(),
            notation,
            fen: game.position().as_fen(),
            state: game.state().to_string(),
            white_clock: game.player(Color::White).clock().remaining(),
            black_clock: game.player(Color::Black).clock().remaining(),
        })
    }
}

pub trait GameRecorder {
    fn record(&self, game: &Game) -> Result<(), csv::Error>;
}

pub struct NullRecorder;
impl GameRecorder for NullRecorder {
    fn record(&self, _game: &Game) -> Result<(), csv::Error> {
        Ok(())
    }
}

pub struct CsvRecorder<W: Write> {
    writer: Mutex<Writer<W>>,
}

impl<W: Write> CsvRecorder<W> {
    pub fn new(writer: W) -> CsvRecorder<W> {
        CsvRecorder {
            writer: Mutex::new(Writer::from_writer(writer)),
        }
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(self) -> Option<W> {
        let writer = self.writer.into_inner().ok()?;
        writer.into_inner().ok()
    }
}

impl<W: Write> GameRecorder for CsvRecorder<W> {
    fn record(&self, game: &Game) -> Result<(), csv::Error> {
        let rec = match Record::from_game(game) {
            Some(rec) => rec,
            None => return Ok(()),
        };

        let mut writer = self.writer.lock().expect("recorder lock poisoned");
        writer.serialize(&rec)?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Square;

    #[test]
    fn nothing_recorded_before_first_ply() {
        let game = Game::default();
        assert!(Record::from_game(&game).is_none());

        let recorder = CsvRecorder::new(vec![]);
        recorder.record(&game).unwrap();
        assert!(recorder.into_inner().unwrap().is_empty());
    }

    #[test]
    fn records_each_ply() {
        let mut game = Game::default();
        game.start();
        let recorder = CsvRecorder::new(vec![]);
        game.move_piece(Square::E2, Square::E4);
        recorder.record(&game).unwrap();
        game.move_piece(Square::E7, Square::E5);
        recorder.record(&game).unwrap();

        let bytes = recorder.into_inner().unwrap();
        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let records: Vec<Record> = reader.deserialize().map(|r| r.unwrap()).collect();
        assert_eq!(2, records.len());
        assert_eq!(1, records[0].ply);
        assert_eq!(Color::White, records[0].color);
        assert_eq!("e4", records[0].notation);
        assert_eq!(Color::Black, records[1].color);
        assert_eq!("e5", records[1].notation);
        assert_eq!("running", records[1].state);
        assert_eq!(
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2",
            records[1].fen
        );
    }

    #[test]
    fn null_recorder_accepts_anything() {
        let game = Game::default();
        NullRecorder.record(&game).unwrap();
    }
}

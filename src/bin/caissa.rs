// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#[macro_use]
extern crate clap;

use std::fs::{self, File};
use std::io::{self, BufRead, Write};
use std::process;
use std::time::Instant;

use caissa::import::Movetext;
use caissa::notation;
use caissa::record::{CsvRecorder, GameRecorder, NullRecorder};
use caissa::special::PROMOTION_KINDS;
use caissa::{divide, perft, Game, GameConfig, PieceKind, PlayState, Position};
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

fn main() {
    env_logger::init();
    let matches = App::new(crate_name!())
        .version(crate_version!())
        .author(crate_authors!())
        .about(crate_description!())
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("config")
                .help("JSON file with clock and draw settings")
                .value_name("FILE")
                .short("-c")
                .long("--config")
                .takes_value(true)
                .global(true),
        )
        .subcommand(
            SubCommand::with_name("perft")
                .about("PERFT analysis of board positions")
                .arg(
                    Arg::with_name("FEN")
                        .help("FEN string for a board position")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::with_name("depth")
                        .help("Depth of move tree to search")
                        .value_name("DEPTH")
                        .short("-d")
                        .long("--depth")
                        .takes_value(true)
                        .default_value("3"),
                )
                .arg(
                    Arg::with_name("divide")
                        .help("Print the count below each root move")
                        .long("--divide"),
                ),
        )
        .subcommand(
            SubCommand::with_name("play")
                .about("Play a game with coordinate moves read from stdin")
                .arg(
                    Arg::with_name("fen")
                        .help("Start from this position instead of the standard one")
                        .value_name("FEN")
                        .long("--fen")
                        .takes_value(true),
                ),
        )
        .subcommand(
            SubCommand::with_name("replay")
                .about("Replay a movetext file and report how the game ended")
                .arg(
                    Arg::with_name("FILE")
                        .help("Movetext file to replay")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::with_name("csv")
                        .help("Write a record of every ply to this CSV file")
                        .value_name("CSV")
                        .long("--csv")
                        .takes_value(true),
                ),
        )
        .subcommand(
            SubCommand::with_name("selfplay")
                .about("Play random legal moves until the game ends")
                .arg(
                    Arg::with_name("seed")
                        .help("Seed for the move picker")
                        .value_name("SEED")
                        .long("--seed")
                        .takes_value(true)
                        .default_value("0"),
                )
                .arg(
                    Arg::with_name("max-plies")
                        .help("Stop after this many plies")
                        .value_name("PLIES")
                        .long("--max-plies")
                        .takes_value(true)
                        .default_value("1000"),
                )
                .arg(
                    Arg::with_name("csv")
                        .help("Write a record of every ply to this CSV file")
                        .value_name("CSV")
                        .long("--csv")
                        .takes_value(true),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        ("perft", Some(matches)) => run_perft(matches),
        ("play", Some(matches)) => run_play(matches),
        ("replay", Some(matches)) => run_replay(matches),
        ("selfplay", Some(matches)) => run_selfplay(matches),
        _ => unreachable!(),
    }
}

fn load_config(matches: &ArgMatches) -> GameConfig {
    match matches.value_of("config") {
        Some(path) => match GameConfig::from_path(path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("{}", err);
                process::exit(1);
            }
        },
        None => GameConfig::default(),
    }
}

fn recorder_for(matches: &ArgMatches) -> Box<dyn GameRecorder> {
    match matches.value_of("csv") {
        Some(path) => match File::create(path) {
            Ok(file) => Box::new(CsvRecorder::new(file)),
            Err(err) => {
                eprintln!("failed to create {}: {}", path, err);
                process::exit(1);
            }
        },
        None => Box::new(NullRecorder),
    }
}

fn record(recorder: &dyn GameRecorder, game: &Game) {
    if let Err(err) = recorder.record(game) {
        eprintln!("failed to write record: {}", err);
        process::exit(1);
    }
}

fn run_perft(matches: &ArgMatches) -> ! {
    let fen = matches.value_of("FEN").unwrap();
    let depth = value_t_or_exit!(matches, "depth", u32);
    let pos = match Position::from_fen(fen) {
        Ok(pos) => pos,
        Err(err) => {
            println!("invalid fen: {}", err);
            process::exit(1);
        }
    };

    println!("fen:   {}", fen);
    println!("depth: {}", depth);
    println!();
    println!("{}", pos);
    println!();
    if matches.is_present("divide") {
        for (mov, count) in divide(&pos, depth) {
            println!("{}: {}", mov, count);
        }

        process::exit(0);
    }

    for i in 1..depth + 1 {
        let start = Instant::now();
        let results = perft(&pos, i);
        let duration = start.elapsed();
        println!("perft({}) = {} ({} ms)", i, results, duration.as_millis());
    }

    process::exit(0);
}

fn run_play(matches: &ArgMatches) -> ! {
    let config = load_config(matches);
    let mut game = match matches.value_of("fen") {
        Some(fen) => match Game::from_fen(fen, config) {
            Ok(game) => game,
            Err(err) => {
                println!("invalid fen: {}", err);
                process::exit(1);
            }
        },
        None => Game::new(config),
    };

    game.start();
    println!("{}", game.board());
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(_) => break,
        };

        let mut words = line.split_whitespace();
        match (words.next(), words.next()) {
            (None, _) => continue,
            (Some("quit"), _) => break,
            (Some("start"), _) => game.start(),
            (Some("pause"), _) => game.pause(),
            (Some("draw"), _) => game.offer_draw(),
            (Some("accept"), _) => game.answer_draw_offer(true),
            (Some("decline"), _) => game.answer_draw_offer(false),
            (Some("resign"), _) => game.resign(),
            (Some("tick"), Some(secs)) => match secs.parse::<u32>() {
                Ok(secs) => game.tick(secs),
                Err(_) => println!("bad tick: {}", secs),
            },
            (Some("history"), _) => println!("{}", game.history().join(" ")),
            (Some("fen"), _) => println!("{}", game.position().as_fen()),
            (Some(text), _) => match notation::parse_coordinate_move(text) {
                Some((from, to, promotion)) => {
                    game.move_piece(from, to);
                    if let Some(kind) = promotion {
                        game.promote(kind);
                    }
                    println!("{}", game.board());
                }
                None => println!("unrecognized command: {}", text),
            },
        }

        println!("{} to move, {}", game.turn(), game.state());
        io::stdout().flush().ok();
        if game.state().is_over() {
            break;
        }
    }

    println!("{}", game.history().join(" "));
    process::exit(0);
}

fn run_replay(matches: &ArgMatches) -> ! {
    let config = load_config(matches);
    let path = matches.value_of("FILE").unwrap();
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            println!("failed to read {}: {}", path, err);
            process::exit(1);
        }
    };

    let movetext = match Movetext::parse(&text) {
        Ok(movetext) => movetext,
        Err(err) => {
            println!("{}", err);
            process::exit(1);
        }
    };

    let recorder = recorder_for(matches);
    let mut game = Game::new(config);
    let outcome = movetext.play(&mut game, |game| record(&*recorder, game));
    println!("{}", game.board());
    println!("{}", game.history().join(" "));
    println!("state: {}", game.state());
    if let Some(result) = &movetext.result {
        println!("recorded result: {}", result);
    }

    match outcome {
        Ok(()) => process::exit(0),
        Err(err) => {
            println!("{}", err);
            process::exit(1);
        }
    }
}

fn run_selfplay(matches: &ArgMatches) -> ! {
    let config = load_config(matches);
    let seed = value_t_or_exit!(matches, "seed", u64);
    let max_plies = value_t_or_exit!(matches, "max-plies", usize);
    let recorder = recorder_for(matches);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut game = Game::new(config);
    game.start();
    while !game.state().is_over() && game.history().len() < max_plies {
        let moves = game.position().all_legal_moves();
        let &(from, to) = match moves.choose(&mut rng) {
            Some(mov) => mov,
            None => break,
        };

        game.move_piece(from, to);
        if game.state() == PlayState::PromotionPending {
            let kind = PROMOTION_KINDS.choose(&mut rng).copied().unwrap_or(PieceKind::Queen);
            game.promote(kind);
        }

        record(&*recorder, &game);
    }

    println!("{}", game.board());
    println!("{}", game.history().join(" "));
    println!("state: {} after {} plies", game.state(), game.history().len());
    process::exit(0);
}

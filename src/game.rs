// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The game state machine. A `Game` owns the position, both players and the
//! play state, and every request a driver can make goes through it. Requests
//! that are not valid in the current state are ignored.
use std::fmt;

use hashbrown::HashMap;

use crate::attacks::SquareVec;
use crate::board::Board;
use crate::clock::Clock;
use crate::config::GameConfig;
use crate::notation;
use crate::position::{AppliedMove, FenParseError, Position};
use crate::special;
use crate::types::TableIndex;
use crate::types::{Color, PieceKind, Square, COLORS};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DrawKind {
    Stalemate,
    Agreement,
    Repetition,
    FiftyMove,
    InsufficientMaterial,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WinKind {
    Checkmate,
    Resignation,
    ClockExpiry,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayState {
    Paused,
    Running,
    /// The given side has offered a draw and is waiting for an answer.
    DrawOffer(Color),
    /// A pawn reached its last rank and the mover must pick its new kind.
    PromotionPending,
    Draw(DrawKind),
    Winner(WinKind, Color),
}

impl PlayState {
    /// Draws and wins end the game for good.
    pub fn is_over(self) -> bool {
        match self {
            PlayState::Draw(_) | PlayState::Winner(_, _) => true,
            _ => false,
        }
    }
}

impl fmt::Display for PlayState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PlayState::Paused => write!(f, "paused"),
            PlayState::Running => write!(f, "running"),
            PlayState::DrawOffer(color) => write!(f, "draw offered by {:?}", color),
            PlayState::PromotionPending => write!(f, "promotion pending"),
            PlayState::Draw(kind) => write!(f, "draw ({:?})", kind),
            PlayState::Winner(kind, color) => write!(f, "{:?} wins ({:?})", color, kind),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Player {
    color: Color,
    king_square: Square,
    attackers: SquareVec,
    clock: Clock,
}

impl Player {
    fn new(color: Color, king_square: Square, clock_seconds: u32) -> Player {
        Player {
            color,
            king_square,
            attackers: SquareVec::new(),
            clock: Clock::new(clock_seconds),
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn king_square(&self) -> Square {
        self.king_square
    }

    /// Squares of the enemy pieces currently attacking this player's king.
    pub fn attackers(&self) -> &[Square] {
        &self.attackers
    }

    pub fn in_check(&self) -> bool {
        !self.attackers.is_empty()
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }
}

/// A move waiting on a promotion choice, along with the notation written for
/// it before it was applied.
#[derive(Clone, Debug)]
struct PendingPromotion {
    square: Square,
    notation: String,
    applied: AppliedMove,
}

#[derive(Clone, Debug)]
pub struct Game {
    position: Position,
    players: [Player; 2],
    state: PlayState,
    pending: Option<PendingPromotion>,
    history: Vec<String>,
    repetition_keys: Vec<String>,
    config: GameConfig,
}

impl Game {
    /// A paused game from the standard starting position.
    pub fn new(config: GameConfig) -> Game {
        Game::from_position(Position::from_start_position(), config)
    }

    /// A paused game from an arbitrary position. Both sides need a king. A
    /// position that is already decided yields a finished game.
    pub fn from_fen<S: AsRef<str>>(fen: S, config: GameConfig) -> Result<Game, FenParseError> {
        let position = Position::from_fen_with_kings(fen)?;
        Ok(Game::from_position(position, config))
    }

    fn from_position(position: Position, config: GameConfig) -> Game {
        let player = |color: Color| {
            let king = position
                .king_square(color)
                .expect("game position has no king");
            Player::new(color, king, config.clock_seconds)
        };

        let mut game = Game {
            players: [player(Color::White), player(Color::Black)],
            repetition_keys: vec![position.repetition_key()],
            position,
            state: PlayState::Paused,
            pending: None,
            history: vec![],
            config,
        };

        game.refresh_players();
        let replies = game.position.legal_move_count();
        if let Some(state) = game.termination(replies) {
            game.finish(state);
        }

        game
    }
}

//
// Observation
//

impl Game {
    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn board(&self) -> &Board {
        self.position.board()
    }

    pub fn turn(&self) -> Color {
        self.position.side_to_move()
    }

    pub fn state(&self) -> PlayState {
        self.state
    }

    pub fn player(&self, color: Color) -> &Player {
        &self.players[color.as_index()]
    }

    /// Notation of every completed ply, in order.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Keys of the positions since the last irreversible move, including the
    /// current one.
    pub fn repetition_keys(&self) -> &[String] {
        &self.repetition_keys
    }

    pub fn pending_promotion(&self) -> Option<Square> {
        self.pending.as_ref().map(|pending| pending.square)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Legal destinations for the piece on `square`. Empty unless the game is
    /// running and the piece belongs to the side to move.
    pub fn select_piece(&self, square: Square) -> Vec<Square> {
        if self.state != PlayState::Running {
            return vec![];
        }

        match self.position.piece_at(square) {
            Some(piece) if piece.color == self.turn() => self.position.legal_moves(square).to_vec(),
            _ => vec![],
        }
    }

    /// `select_piece` by (row, col), for drivers that work in grid
    /// coordinates. Off-board coordinates select nothing.
    pub fn select_piece_at(&self, row: i32, col: i32) -> Vec<Square> {
        match Square::from_coords(row, col) {
            Some(square) => self.select_piece(square),
            None => vec![],
        }
    }
}

//
// Requests
//

impl Game {
    pub fn start(&mut self) {
        if self.state != PlayState::Paused {
            return;
        }

        let turn = self.turn();
        self.players[turn.as_index()].clock.start();
        self.set_state(PlayState::Running);
    }

    pub fn pause(&mut self) {
        if self.state != PlayState::Running {
            return;
        }

        self.stop_clocks();
        self.set_state(PlayState::Paused);
    }

    /// Moves the piece on `from` to `to` if that is legal. A move onto the
    /// last rank leaves the game waiting for `promote`.
    pub fn move_piece(&mut self, from: Square, to: Square) {
        if !self.select_piece(from).contains(&to) {
            debug!("rejected move {}{} in state {}", from, to, self.state);
            return;
        }

        let notation = notation::describe_move(&self.position, from, to);
        let applied = self.position.apply_move(from, to);
        debug!("applied {} ({}{})", notation, from, to);
        if applied.promotion_due {
            self.pending = Some(PendingPromotion {
                square: to,
                notation,
                applied,
            });
            self.set_state(PlayState::PromotionPending);
            return;
        }

        self.finish_ply(notation, applied);
    }

    /// `move_piece` by (row, col) pairs.
    pub fn move_at(&mut self, from: (i32, i32), to: (i32, i32)) {
        let from = Square::from_coords(from.0, from.1);
        let to = Square::from_coords(to.0, to.1);
        if let (Some(from), Some(to)) = (from, to) {
            self.move_piece(from, to);
        }
    }

    /// Completes a pending promotion. Pawns and kings are refused.
    pub fn promote(&mut self, kind: PieceKind) {
        if self.state != PlayState::PromotionPending || !special::is_promotion_kind(kind) {
            return;
        }

        let pending = match self.pending.take() {
            Some(pending) => pending,
            None => return,
        };

        self.position
            .promote(pending.square, kind)
            .expect("pending promotion square does not hold a pawn");
        self.set_state(PlayState::Running);
        let notation = pending.notation + &notation::promotion_suffix(kind);
        self.finish_ply(notation, pending.applied);
    }

    pub fn offer_draw(&mut self) {
        if self.state != PlayState::Running {
            return;
        }

        let turn = self.turn();
        self.set_state(PlayState::DrawOffer(turn));
    }

    pub fn answer_draw_offer(&mut self, accept: bool) {
        match self.state {
            PlayState::DrawOffer(_) if accept => self.finish(PlayState::Draw(DrawKind::Agreement)),
            PlayState::DrawOffer(_) => self.set_state(PlayState::Running),
            _ => {}
        }
    }

    /// The side to move resigns.
    pub fn resign(&mut self) {
        if self.state != PlayState::Running {
            return;
        }

        let winner = self.turn().toggle();
        self.finish(PlayState::Winner(WinKind::Resignation, winner));
    }

    /// Counts the running clock down by `seconds`. A clock that runs out ends
    /// the game in favor of the other side.
    pub fn tick(&mut self, seconds: u32) {
        if self.state.is_over() {
            return;
        }

        for player in self.players.iter_mut() {
            player.clock.tick(seconds);
        }

        if let Some(state) = self.clock_expiry() {
            self.finish(state);
        }
    }
}

//
// Ply completion and termination
//

impl Game {
    fn finish_ply(&mut self, mut notation: String, applied: AppliedMove) {
        let mover = self.turn();
        self.position.end_turn();
        self.players[mover.as_index()].clock.stop();
        self.players[mover.toggle().as_index()].clock.start();
        self.refresh_players();

        let replies = self.position.legal_move_count();
        let defender = self.player(mover.toggle());
        if defender.in_check() {
            notation.push(if replies == 0 { '#' } else { '+' });
        }

        self.history.push(notation);
        let key = self.position.repetition_key();
        if applied.is_irreversible() {
            self.repetition_keys.clear();
        }
        self.repetition_keys.push(key);

        if let Some(state) = self.termination(replies) {
            self.finish(state);
        }
    }

    fn refresh_players(&mut self) {
        for &color in COLORS.iter() {
            let king = self
                .position
                .king_square(color)
                .expect("king missing from the board");
            let attackers = self.position.king_attackers(color);
            let player = &mut self.players[color.as_index()];
            player.king_square = king;
            player.attackers = attackers;
        }
    }

    /// Checks every way the game can end after a ply, in priority order.
    fn termination(&self, replies: usize) -> Option<PlayState> {
        let turn = self.turn();
        if replies == 0 {
            return Some(if self.player(turn).in_check() {
                PlayState::Winner(WinKind::Checkmate, turn.toggle())
            } else {
                PlayState::Draw(DrawKind::Stalemate)
            });
        }

        if self.position.halfmove_clock() >= self.config.fifty_move_plies {
            return Some(PlayState::Draw(DrawKind::FiftyMove));
        }

        if self.is_insufficient_material() {
            return Some(PlayState::Draw(DrawKind::InsufficientMaterial));
        }

        if self.is_repetition() {
            return Some(PlayState::Draw(DrawKind::Repetition));
        }

        self.clock_expiry()
    }

    /// At most three pieces on the board and none of them a queen, rook or
    /// pawn, which leaves at best a lone minor piece.
    fn is_insufficient_material(&self) -> bool {
        let board = self.board();
        board.pieces().count() <= 3
            && !board
                .pieces()
                .any(|(_, piece)| piece.kind.is_sufficient_material())
    }

    fn is_repetition(&self) -> bool {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for key in &self.repetition_keys {
            let count = counts.entry(key.as_str()).or_insert(0);
            *count += 1;
            if *count >= self.config.repetition_count {
                return true;
            }
        }

        false
    }

    fn clock_expiry(&self) -> Option<PlayState> {
        COLORS
            .iter()
            .find(|&&color| self.player(color).clock.expired())
            .map(|&color| PlayState::Winner(WinKind::ClockExpiry, color.toggle()))
    }

    fn set_state(&mut self, state: PlayState) {
        info!("{} -> {}", self.state, state);
        self.state = state;
    }

    fn finish(&mut self, state: PlayState) {
        self.stop_clocks();
        self.set_state(state);
    }

    fn stop_clocks(&mut self) {
        for player in self.players.iter_mut() {
            player.clock.stop();
        }
    }
}

impl Default for Game {
    fn default() -> Game {
        Game::new(GameConfig::default())
    }
}

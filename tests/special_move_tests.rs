// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use caissa::{Color, Game, GameConfig, PieceKind, PlayState, Square};

fn running(fen: &str) -> Game {
    let mut game = Game::from_fen(fen, GameConfig::default()).unwrap();
    game.start();
    game
}

fn play(game: &mut Game, moves: &[(Square, Square)]) {
    for &(from, to) in moves {
        game.move_piece(from, to);
    }
}

fn sorted(mut squares: Vec<Square>) -> Vec<Square> {
    squares.sort_by_key(|sq| (sq.row(), sq.col()));
    squares
}

mod castling {
    use super::*;

    const CORNERS: &str = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1";

    #[test]
    fn both_sides_offered() {
        let game = running(CORNERS);
        let dests = game.select_piece(Square::E1);
        assert!(dests.contains(&Square::G1));
        assert!(dests.contains(&Square::C1));
    }

    #[test]
    fn short_and_long_execute() {
        let mut game = running(CORNERS);
        play(
            &mut game,
            &[(Square::E1, Square::G1), (Square::E8, Square::C8)],
        );

        assert_eq!(vec!["O-O", "O-O-O"], game.history());
        let board = game.board();
        assert_eq!(PieceKind::Rook, board.piece_at(Square::F1).unwrap().kind);
        assert_eq!(PieceKind::King, board.piece_at(Square::G1).unwrap().kind);
        assert!(board.piece_at(Square::H1).is_none());
        assert_eq!(PieceKind::Rook, board.piece_at(Square::D8).unwrap().kind);
        assert_eq!(PieceKind::King, board.piece_at(Square::C8).unwrap().kind);
        assert!(board.piece_at(Square::A8).is_none());
        assert_eq!(Square::G1, game.player(Color::White).king_square());
        assert_eq!(Square::C8, game.player(Color::Black).king_square());
    }

    #[test]
    fn rook_that_moved_and_returned_cannot_castle() {
        let mut game = running(CORNERS);
        play(
            &mut game,
            &[
                (Square::H1, Square::H2),
                (Square::A8, Square::B8),
                (Square::H2, Square::H1),
                (Square::B8, Square::A8),
            ],
        );

        assert_eq!(4, game.history().len());
        let dests = game.select_piece(Square::E1);
        assert!(!dests.contains(&Square::G1));
        assert!(dests.contains(&Square::C1));
        assert_eq!("r3k2r/8/8/8/8/8/8/R3K2R w Qk - 4 3", game.position().as_fen());
    }

    #[test]
    fn king_that_moved_and_returned_cannot_castle() {
        let mut game = running(CORNERS);
        play(
            &mut game,
            &[
                (Square::E1, Square::D1),
                (Square::E8, Square::D8),
                (Square::D1, Square::E1),
                (Square::D8, Square::E8),
            ],
        );

        let dests = game.select_piece(Square::E1);
        assert!(!dests.contains(&Square::G1));
        assert!(!dests.contains(&Square::C1));
    }

    #[test]
    fn not_out_of_check() {
        let game = running("4r2k/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        let dests = game.select_piece(Square::E1);
        assert!(!dests.contains(&Square::G1));
        assert!(!dests.contains(&Square::C1));
    }

    #[test]
    fn not_through_an_attacked_square() {
        let game = running("5r1k/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        let dests = game.select_piece(Square::E1);
        assert!(!dests.contains(&Square::G1));
        assert!(dests.contains(&Square::C1));
    }

    #[test]
    fn not_through_a_piece() {
        let game = running("7k/8/8/8/8/8/8/RN2K2R w KQ - 0 1");
        let dests = game.select_piece(Square::E1);
        assert!(dests.contains(&Square::G1));
        assert!(!dests.contains(&Square::C1));
    }
}

mod en_passant {
    use super::*;

    #[test]
    fn capture_on_the_next_ply() {
        let mut game = Game::default();
        game.start();
        play(
            &mut game,
            &[
                (Square::E2, Square::E4),
                (Square::A7, Square::A6),
                (Square::E4, Square::E5),
                (Square::D7, Square::D5),
            ],
        );

        assert!(game.select_piece(Square::E5).contains(&Square::D6));
        play(&mut game, &[(Square::E5, Square::D6)]);
        assert_eq!("exd6", game.history()[4]);
        assert!(game.board().piece_at(Square::D5).is_none());
        assert_eq!(PieceKind::Pawn, game.board().piece_at(Square::D6).unwrap().kind);
        assert_eq!(0, game.position().halfmove_clock());
    }

    #[test]
    fn expires_after_one_ply() {
        let mut game = Game::default();
        game.start();
        play(
            &mut game,
            &[
                (Square::E2, Square::E4),
                (Square::A7, Square::A6),
                (Square::E4, Square::E5),
                (Square::D7, Square::D5),
                (Square::H2, Square::H3),
                (Square::A6, Square::A5),
            ],
        );

        assert_eq!(6, game.history().len());
        assert!(!game.select_piece(Square::E5).contains(&Square::D6));
    }
}

mod promotion {
    use super::*;

    #[test]
    fn waits_for_a_piece() {
        let mut game = running("8/P6k/7p/8/8/8/8/K7 w - - 0 1");
        play(&mut game, &[(Square::A7, Square::A8)]);
        assert_eq!(PlayState::PromotionPending, game.state());
        assert_eq!(Some(Square::A8), game.pending_promotion());
        assert!(game.history().is_empty());
        assert_eq!(Color::White, game.turn());

        // nothing else can be selected while the promotion is pending.
        assert!(game.select_piece(Square::A1).is_empty());

        game.promote(PieceKind::King);
        assert_eq!(PlayState::PromotionPending, game.state());
        game.promote(PieceKind::Pawn);
        assert_eq!(PlayState::PromotionPending, game.state());

        game.promote(PieceKind::Knight);
        assert_eq!(PlayState::Running, game.state());
        assert_eq!(vec!["a8=N"], game.history());
        assert_eq!(Color::Black, game.turn());
        assert_eq!(
            PieceKind::Knight,
            game.board().piece_at(Square::A8).unwrap().kind
        );
    }

    #[test]
    fn minor_promotion_can_leave_insufficient_material() {
        let mut game = running("8/P6k/8/8/8/8/8/K7 w - - 0 1");
        play(&mut game, &[(Square::A7, Square::A8)]);
        game.promote(PieceKind::Knight);
        assert_eq!(vec!["a8=N"], game.history());
        assert_eq!(
            PlayState::Draw(caissa::DrawKind::InsufficientMaterial),
            game.state()
        );
    }

    #[test]
    fn capture_with_check() {
        let mut game = running("1r5k/P7/8/8/8/8/8/K7 w - - 0 1");
        play(&mut game, &[(Square::A7, Square::B8)]);
        game.promote(PieceKind::Queen);
        assert_eq!(vec!["axb8=Q+"], game.history());
        assert!(game.player(Color::Black).in_check());
        assert_eq!(PlayState::Running, game.state());
    }
}

mod check {
    use super::*;

    #[test]
    fn double_check_leaves_only_king_moves() {
        let game = running("4r2k/8/8/8/8/3n4/8/R2QK3 w - - 0 1");
        assert_eq!(2, game.player(Color::White).attackers().len());
        assert!(game.select_piece(Square::D1).is_empty());
        assert!(game.select_piece(Square::A1).is_empty());
        assert_eq!(
            vec![Square::F1, Square::D2],
            sorted(game.select_piece(Square::E1))
        );
    }

    #[test]
    fn single_check_allows_capture_and_block() {
        let game = running("4r2k/8/8/8/8/8/8/R2QK3 w - - 0 1");
        let queen = game.select_piece(Square::D1);
        assert_eq!(vec![Square::E2], queen);
        let rook = game.select_piece(Square::A1);
        assert!(rook.is_empty());
    }

    #[test]
    fn pinned_bishop_is_frozen() {
        let game = running("4r2k/8/8/8/8/8/4B3/4K3 w - - 0 1");
        assert!(game.select_piece(Square::E2).is_empty());
    }

    #[test]
    fn pinned_rook_slides_along_the_pin() {
        let game = running("4r2k/8/8/8/8/8/4R3/4K3 w - - 0 1");
        assert_eq!(
            vec![
                Square::E3,
                Square::E4,
                Square::E5,
                Square::E6,
                Square::E7,
                Square::E8
            ],
            sorted(game.select_piece(Square::E2))
        );
    }

    #[test]
    fn opponent_pieces_are_not_selectable() {
        let game = Game::default();
        assert!(game.select_piece(Square::E2).is_empty());

        let mut game = game;
        game.start();
        assert!(game.select_piece(Square::E7).is_empty());
        assert_eq!(2, game.select_piece(Square::E2).len());
        assert_eq!(2, game.select_piece_at(1, 4).len());
        assert!(game.select_piece_at(8, 4).is_empty());
    }
}

//! Property tests over generated command sequences.
//!
//! Invariants covered:
//! - A rejected horizontal move or rotation leaves board and piece unchanged.
//! - The composited board always has `width * height` cells.
//! - Score only grows, in steps of 100 per cleared line.
//! - Once the game is over, no command changes the state.

use blockfall_engine::{Game, PieceSeed};
use proptest::prelude::*;

#[derive(Debug, Clone, Copy)]
enum Command {
    Left,
    Right,
    Down,
    Rotate,
    HardDrop,
}

fn command() -> impl Strategy<Value = Command> {
    prop_oneof![
        Just(Command::Left),
        Just(Command::Right),
        Just(Command::Down),
        Just(Command::Rotate),
        Just(Command::HardDrop),
    ]
}

proptest! {
    #[test]
    fn rejected_commands_do_not_mutate(
        seed in any::<u128>(),
        width in 4usize..16,
        height in 4usize..24,
        commands in prop::collection::vec(command(), 1..200),
    ) {
        let mut game = Game::with_seed(width, height, PieceSeed::from_u128(seed)).unwrap();
        game.new_game();

        for command in commands {
            let board_before = game.board();
            let piece_before = game.current_piece().cloned();
            let score_before = game.score();
            let was_over = game.is_game_over();

            let accepted = match command {
                Command::Left => game.move_left(),
                Command::Right => game.move_right(),
                Command::Rotate => game.rotate(),
                Command::Down => game.move_down(),
                Command::HardDrop => {
                    game.hard_drop();
                    !was_over
                }
            };

            prop_assert_eq!(game.board().len(), width * height);
            prop_assert!(game.score() >= score_before);
            prop_assert_eq!((game.score() - score_before) % 100, 0);

            let horizontal_or_rotate =
                matches!(command, Command::Left | Command::Right | Command::Rotate);
            if (horizontal_or_rotate && !accepted) || was_over {
                prop_assert_eq!(&game.board(), &board_before);
                prop_assert_eq!(&game.current_piece().cloned(), &piece_before);
                prop_assert_eq!(game.score(), score_before);
            }
            if was_over {
                prop_assert!(game.is_game_over());
                prop_assert!(!accepted || matches!(command, Command::HardDrop));
            }
        }
    }
}

use std::path::PathBuf;

use blockfall_engine::{Game, PieceSeed};
use rand::{Rng, SeedableRng as _};
use rand_pcg::Pcg32;

use crate::{
    command::BoardArg,
    schema::{SimulatedGame, SimulationReport},
    util,
};

use super::script::GameCommand;

/// Commands after which a piece that has not locked yet is hard-dropped.
const MAX_COMMANDS_PER_PIECE: usize = 64;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    #[clap(flatten)]
    board: BoardArg,
    /// Hex seed deriving the per-game seeds (random if omitted)
    #[clap(long)]
    seed: Option<PieceSeed>,
    /// Number of games to play
    #[clap(long, default_value_t = 10)]
    games: usize,
    /// Stop a game after this many locked pieces
    #[clap(long, default_value_t = 1000)]
    max_pieces: usize,
    /// Output file path (stdout if omitted)
    #[clap(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        board: BoardArg { width, height },
        seed,
        games,
        max_pieces,
        output,
    } = arg;

    let seed = seed.unwrap_or_else(|| rand::rng().random());
    let (mut seed_rng, mut policy_rng) = split_generators(seed);

    eprintln!("Simulating {games} game(s) on a {width}x{height} board...");

    let mut results = Vec::with_capacity(*games);
    for i in 0..*games {
        let game_seed: PieceSeed = seed_rng.random();
        let result = play_random_game(*width, *height, game_seed, *max_pieces, &mut policy_rng)?;
        eprintln!(
            "Game #{i}: {:?} after {} piece(s), score {}",
            result.state,
            result.stats.completed_pieces(),
            result.stats.score(),
        );
        results.push(result);
    }

    print_summary(&results);

    let report = SimulationReport {
        recorded_at: chrono::Utc::now(),
        width: *width,
        height: *height,
        seed,
        max_pieces: *max_pieces,
        games: results,
    };
    util::save_json(&report, output.as_deref())?;

    Ok(())
}

/// Returns the generator of per-game seeds and an independent one for the
/// move policy, both derived from `seed`.
fn split_generators(seed: PieceSeed) -> (Pcg32, Pcg32) {
    let mut seed_rng = Pcg32::from_seed(seed.to_bytes());
    let policy_rng = Pcg32::from_rng(&mut seed_rng);
    (seed_rng, policy_rng)
}

fn play_random_game<R>(
    width: usize,
    height: usize,
    seed: PieceSeed,
    max_pieces: usize,
    policy_rng: &mut R,
) -> anyhow::Result<SimulatedGame>
where
    R: Rng,
{
    let mut game = Game::with_seed(width, height, seed)?;
    game.new_game();

    let mut commands = 0;
    let mut commands_this_piece = 0;
    while !game.is_game_over() && game.stats().completed_pieces() < max_pieces {
        let locked_before = game.stats().completed_pieces();
        if commands_this_piece >= MAX_COMMANDS_PER_PIECE {
            game.hard_drop();
        } else {
            let command = GameCommand::ALL[policy_rng.random_range(0..GameCommand::ALL.len())];
            command.apply(&mut game).ok();
        }
        commands += 1;
        commands_this_piece += 1;
        if game.stats().completed_pieces() != locked_before {
            commands_this_piece = 0;
        }
    }

    Ok(SimulatedGame {
        seed,
        state: game.session_state(),
        stats: game.stats().clone(),
        commands,
        final_board: game.snapshot(),
    })
}

#[expect(clippy::cast_precision_loss)]
fn print_summary(results: &[SimulatedGame]) {
    if results.is_empty() {
        return;
    }
    let total_score: usize = results.iter().map(|r| r.stats.score()).sum();
    let best_score = results.iter().map(|r| r.stats.score()).max().unwrap_or(0);
    let game_overs = results.iter().filter(|r| r.state.is_game_over()).count();

    eprintln!();
    eprintln!(
        "Mean score {:.1}, best score {best_score}, {game_overs}/{} game(s) over",
        total_score as f64 / results.len() as f64,
        results.len(),
    );
    eprintln!("Line clears per lock:");
    let mut counter = [0; 5];
    for result in results {
        for (total, count) in counter.iter_mut().zip(result.stats.line_cleared_counter()) {
            *total += *count;
        }
    }
    util::print_histogram(
        counter
            .iter()
            .enumerate()
            .map(|(lines, count)| (format!("{lines} line(s)"), *count)),
    );
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;

    use super::*;

    #[test]
    fn test_random_game_stops_at_game_over_or_piece_limit() {
        let mut policy_rng = Pcg32::from_seed([7; 16]);
        for seed in 0..10 {
            let result =
                play_random_game(6, 8, PieceSeed::from_u128(seed), 30, &mut policy_rng).unwrap();
            assert!(result.state.is_game_over() || result.stats.completed_pieces() == 30);
            assert!(result.stats.completed_pieces() <= 30);
            assert_eq!(result.final_board.cells().len(), 6 * 8);
        }
    }

    #[test]
    fn test_policy_stream_differs_from_seed_stream() {
        let (mut seed_rng, mut policy_rng) = split_generators(PieceSeed::from_u128(0x2a));
        let seeds: Vec<u32> = (0..8).map(|_| seed_rng.random()).collect();
        let policy: Vec<u32> = (0..8).map(|_| policy_rng.random()).collect();
        assert_ne!(seeds, policy);

        let (mut again, _) = split_generators(PieceSeed::from_u128(0x2a));
        let replayed: Vec<u32> = (0..8).map(|_| again.random()).collect();
        assert_eq!(seeds, replayed);
    }

    #[test]
    fn test_random_game_is_deterministic() {
        let seed = PieceSeed::from_u128(99);
        let a = play_random_game(10, 20, seed, 100, &mut Pcg32::from_seed([1; 16])).unwrap();
        let b = play_random_game(10, 20, seed, 100, &mut Pcg32::from_seed([1; 16])).unwrap();
        assert_eq!(a.stats, b.stats);
        assert_eq!(a.final_board, b.final_board);
        assert_eq!(a.commands, b.commands);
    }
}

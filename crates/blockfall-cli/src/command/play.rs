use std::path::PathBuf;

use blockfall_engine::PieceSeed;
use rand::Rng as _;

use crate::{
    command::BoardArg,
    schema::{PieceOrder, PlayRecord},
    util,
};

use super::script;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    #[clap(flatten)]
    board: BoardArg,
    /// Hex seed for the piece generator (random if omitted)
    #[clap(long)]
    seed: Option<PieceSeed>,
    /// Fixed piece order instead of random pieces, e.g. `IOTSZJL`
    #[clap(long, conflicts_with = "seed")]
    pieces: Option<String>,
    /// Print the game as a JSON record instead of text
    #[clap(long)]
    json: bool,
    /// Save the JSON record to a file
    #[clap(long)]
    save: Option<PathBuf>,
    /// Commands: `<` left, `>` right, `v` down, `^` rotate, `#` hard drop
    commands: String,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        board: BoardArg { width, height },
        seed,
        pieces,
        json,
        save,
        commands,
    } = arg;

    let order = match (pieces, seed) {
        (Some(letters), _) => PieceOrder::Fixed(letters.clone()),
        (None, Some(seed)) => PieceOrder::Seeded(*seed),
        (None, None) => PieceOrder::Seeded(rand::rng().random()),
    };
    let parsed = script::parse_commands(commands)?;
    let outcome = script::run_script(*width, *height, &order, &parsed)?;

    let record = PlayRecord {
        recorded_at: chrono::Utc::now(),
        width: *width,
        height: *height,
        pieces: order,
        commands: commands.clone(),
        state: outcome.state,
        stats: outcome.stats,
        current_piece: outcome.current_piece,
        board: outcome.board,
    };

    if let Some(path) = save {
        util::save_json(&record, Some(path.as_path()))?;
    }

    if *json {
        util::save_json(&record, None)?;
    } else {
        println!("{}", record.board);
        println!();
        println!("state:  {:?}", record.state);
        println!("score:  {}", record.stats.score());
        println!("lines:  {}", record.stats.total_cleared_lines());
        println!("pieces: {}", record.stats.completed_pieces());
    }
    Ok(())
}

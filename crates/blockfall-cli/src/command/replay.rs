use std::path::PathBuf;

use anyhow::ensure;

use crate::{schema::PlayRecord, util};

use super::script::{self, ScriptOutcome};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ReplayArg {
    /// Path to a play record saved with `play --save`
    record_path: PathBuf,
}

pub(crate) fn run(arg: &ReplayArg) -> anyhow::Result<()> {
    let ReplayArg { record_path } = arg;

    let record: PlayRecord = util::load_json("play record", record_path)?;
    eprintln!(
        "Replaying {} command(s) recorded at {}",
        record.commands.chars().filter(|c| !c.is_whitespace()).count(),
        record.recorded_at
    );

    let outcome = replay_record(&record)?;

    println!("{}", outcome.board);
    eprintln!("Replay matches the record (score {})", outcome.stats.score());
    Ok(())
}

/// Re-runs the recorded commands and fails unless the game ends exactly as
/// recorded.
fn replay_record(record: &PlayRecord) -> anyhow::Result<ScriptOutcome> {
    let commands = script::parse_commands(&record.commands)?;
    let outcome = script::run_script(record.width, record.height, &record.pieces, &commands)?;

    ensure!(
        outcome.board == record.board,
        "replayed board differs from the record:\n{}\n\nrecorded:\n{}",
        outcome.board,
        record.board
    );
    ensure!(
        outcome.stats == record.stats,
        "replayed stats differ from the record: {:?} != {:?}",
        outcome.stats,
        record.stats
    );
    ensure!(
        outcome.state == record.state && outcome.current_piece == record.current_piece,
        "replayed session ended in {:?} with {:?}, recorded {:?} with {:?}",
        outcome.state,
        outcome.current_piece,
        record.state,
        record.current_piece
    );
    Ok(outcome)
}

use clap::{Parser, Subcommand};

use self::{play::PlayArg, replay::ReplayArg, simulate::SimulateArg};

mod play;
mod replay;
mod script;
mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play a scripted game and print the final board
    Play(#[clap(flatten)] PlayArg),
    /// Re-run a saved play record and check it ends the same way
    Replay(#[clap(flatten)] ReplayArg),
    /// Play many games with a random policy and report statistics
    Simulate(#[clap(flatten)] SimulateArg),
}

/// Board dimensions shared by all modes.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct BoardArg {
    /// Board width in cells
    #[clap(long, default_value_t = 10)]
    width: usize,
    /// Board height in cells
    #[clap(long, default_value_t = 20)]
    height: usize,
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::Replay(arg) => replay::run(&arg)?,
        Mode::Simulate(arg) => simulate::run(&arg)?,
    }
    Ok(())
}

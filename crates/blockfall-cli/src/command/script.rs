use anyhow::{Context as _, bail};
use blockfall_engine::{
    Board, DropOutcome, Game, GameStats, MoveError, Piece, PieceKind, PieceSequence,
    PieceSource, SessionState,
};

use crate::schema::PieceOrder;

/// One step of a command script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GameCommand {
    Left,
    Right,
    Down,
    Rotate,
    HardDrop,
}

impl GameCommand {
    pub(crate) const ALL: [GameCommand; 5] = [
        GameCommand::Left,
        GameCommand::Right,
        GameCommand::Down,
        GameCommand::Rotate,
        GameCommand::HardDrop,
    ];

    const fn from_char(c: char) -> Option<Self> {
        match c {
            '<' => Some(GameCommand::Left),
            '>' => Some(GameCommand::Right),
            'v' => Some(GameCommand::Down),
            '^' => Some(GameCommand::Rotate),
            '#' => Some(GameCommand::HardDrop),
            _ => None,
        }
    }

    pub(crate) const fn as_char(self) -> char {
        match self {
            GameCommand::Left => '<',
            GameCommand::Right => '>',
            GameCommand::Down => 'v',
            GameCommand::Rotate => '^',
            GameCommand::HardDrop => '#',
        }
    }

    /// Applies the command, returning the number of lines it cleared.
    pub(crate) fn apply<R>(self, game: &mut Game<R>) -> Result<usize, MoveError>
    where
        R: PieceSource,
    {
        match self {
            GameCommand::Left => game.try_move_left().map(|()| 0),
            GameCommand::Right => game.try_move_right().map(|()| 0),
            GameCommand::Rotate => game.try_rotate().map(|()| 0),
            GameCommand::Down => game.try_move_down().map(|outcome| match outcome {
                DropOutcome::Fell => 0,
                DropOutcome::Locked { cleared_lines } => cleared_lines,
            }),
            GameCommand::HardDrop => game.try_hard_drop(),
        }
    }
}

/// Parses a command script. Whitespace is ignored.
pub(crate) fn parse_commands(script: &str) -> anyhow::Result<Vec<GameCommand>> {
    script
        .chars()
        .enumerate()
        .filter(|(_, c)| !c.is_whitespace())
        .map(|(i, c)| {
            GameCommand::from_char(c).with_context(|| {
                format!("unknown command {c:?} at position {i} (expected one of < > v ^ #)")
            })
        })
        .collect()
}

/// Parses a fixed piece order such as `"IOTSZJL"`.
pub(crate) fn parse_piece_sequence(letters: &str) -> anyhow::Result<PieceSequence> {
    let kinds = letters
        .chars()
        .map(|c| {
            PieceKind::from_char(c.to_ascii_uppercase())
                .with_context(|| format!("unknown piece kind {c:?}"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    match PieceSequence::new(kinds) {
        Some(sequence) => Ok(sequence),
        None => bail!("piece order must not be empty"),
    }
}

/// Final state of a scripted game.
#[derive(Debug, Clone)]
pub(crate) struct ScriptOutcome {
    pub(crate) state: SessionState,
    pub(crate) stats: GameStats,
    pub(crate) current_piece: Option<Piece>,
    pub(crate) board: Board,
}

/// Starts a new game and runs `commands` until they are exhausted or the
/// game is over.
pub(crate) fn run_script(
    width: usize,
    height: usize,
    order: &PieceOrder,
    commands: &[GameCommand],
) -> anyhow::Result<ScriptOutcome> {
    match order {
        PieceOrder::Seeded(seed) => Ok(run_on(Game::with_seed(width, height, *seed)?, commands)),
        PieceOrder::Fixed(letters) => {
            let source = parse_piece_sequence(letters)?;
            Ok(run_on(Game::with_source(width, height, source)?, commands))
        }
    }
}

fn run_on<R>(mut game: Game<R>, commands: &[GameCommand]) -> ScriptOutcome
where
    R: PieceSource,
{
    game.new_game();
    for (i, command) in commands.iter().enumerate() {
        if game.is_game_over() {
            eprintln!("Game over after {i} command(s); ignoring the rest");
            break;
        }
        match command.apply(&mut game) {
            Ok(0) => {}
            Ok(cleared_lines) => eprintln!("command #{i} cleared {cleared_lines} line(s)"),
            Err(err) => eprintln!("command #{i} {:?} rejected: {err}", command.as_char()),
        }
    }
    ScriptOutcome {
        state: game.session_state(),
        stats: game.stats().clone(),
        current_piece: game.current_piece().cloned(),
        board: game.snapshot(),
    }
}

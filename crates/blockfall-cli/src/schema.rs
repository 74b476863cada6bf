use blockfall_engine::{Board, GameStats, Piece, PieceSeed, SessionState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where the pieces of a game came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PieceOrder {
    /// PCG32 seeded with the given seed
    Seeded(PieceSeed),
    /// Fixed cycle of piece letters, e.g. `"IOT"`
    Fixed(String),
}

/// A scripted game: enough to replay it and the state it ended in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayRecord {
    /// Timestamp when the record was created (ISO 8601 format)
    pub recorded_at: DateTime<Utc>,
    pub width: usize,
    pub height: usize,
    pub pieces: PieceOrder,
    /// Command string as given on the command line
    pub commands: String,
    pub state: SessionState,
    pub stats: GameStats,
    /// Falling piece at the end of the script
    pub current_piece: Option<Piece>,
    /// Locked cells with the falling piece drawn on top
    pub board: Board,
}

/// Outcome of one game played by the random policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatedGame {
    pub seed: PieceSeed,
    pub state: SessionState,
    pub stats: GameStats,
    /// Number of commands issued, including rejected ones
    pub commands: usize,
    pub final_board: Board,
}

/// Result of the `simulate` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    pub recorded_at: DateTime<Utc>,
    pub width: usize,
    pub height: usize,
    /// Seed of the generator that derives per-game seeds
    pub seed: PieceSeed,
    pub max_pieces: usize,
    pub games: Vec<SimulatedGame>,
}

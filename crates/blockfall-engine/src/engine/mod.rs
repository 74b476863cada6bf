//! Game engine logic and state management.
//!
//! This module drives the core data structures through a game session:
//!
//! - [`Game`] - Board, falling piece, statistics, and the command API
//! - [`GameStats`] - Score, lines cleared, pieces locked
//! - [`PieceSource`] - Injectable randomness for piece selection
//! - [`PieceSeed`] - Seed for deterministic piece generation
//! - [`PieceSequence`] - Fixed, cycling piece order
//!
//! # Game Flow
//!
//! 1. Create a [`Game`] with board dimensions and a piece source
//! 2. Call [`Game::new_game`] to spawn the first piece
//! 3. Move, rotate, or drop the falling piece; a gravity tick is
//!    [`Game::move_down`]
//! 4. A piece that cannot fall further locks, full lines clear, and the next
//!    piece spawns
//! 5. Repeat until a spawn collides (game over)

pub use self::{game::*, game_stats::*, piece_source::*};

mod game;
mod game_stats;
mod piece_source;

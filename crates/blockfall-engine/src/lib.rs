//! Headless game-logic core for a falling-block puzzle game.
//!
//! The crate is split the same way the game is reasoned about:
//!
//! - [`core`] holds the data model: [`Cell`], [`Board`], [`Piece`]
//! - [`engine`] drives a session: [`Game`], [`GameStats`], piece sources
//!
//! Nothing here renders, sleeps, or reads input. A presenter polls
//! [`Game::board`] once per frame and forwards discrete commands.
//!
//! # Example
//!
//! ```
//! use blockfall_engine::{Game, PieceSeed};
//!
//! let mut game = Game::with_seed(10, 20, PieceSeed::from_u128(42))?;
//! game.new_game();
//!
//! game.move_left();
//! game.rotate();
//! game.hard_drop();
//!
//! assert_eq!(game.board().len(), 10 * 20);
//! assert!(!game.is_game_over());
//! # Ok::<(), blockfall_engine::InvalidDimensionsError>(())
//! ```

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Board dimensions outside `1..=Board::MAX_SIDE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid board dimensions {width}x{height}")]
pub struct InvalidDimensionsError {
    pub width: usize,
    pub height: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("piece colliding when moving falling piece")]
pub struct PieceCollisionError;

/// Reason a movement command had no effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum MoveError {
    #[display("{_0}")]
    Collision(PieceCollisionError),
    #[display("no game in progress (state: {_0:?})")]
    NotPlaying(#[error(not(source))] SessionState),
}

impl From<PieceCollisionError> for MoveError {
    fn from(err: PieceCollisionError) -> Self {
        MoveError::Collision(err)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseBoardError {
    #[display("board has no rows")]
    NoRows,
    #[display("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[display("invalid cell {found:?} at row {row}, column {col}")]
    InvalidCell { row: usize, col: usize, found: char },
    #[display("{_0}")]
    Dimensions(InvalidDimensionsError),
}

impl From<InvalidDimensionsError> for ParseBoardError {
    fn from(err: InvalidDimensionsError) -> Self {
        ParseBoardError::Dimensions(err)
    }
}

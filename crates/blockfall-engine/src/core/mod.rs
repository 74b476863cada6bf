//! Data model shared by the engine: cells, the board grid, and pieces.

pub use self::{board::*, cell::*, piece::*};

pub(crate) mod board;
pub(crate) mod cell;
pub(crate) mod piece;

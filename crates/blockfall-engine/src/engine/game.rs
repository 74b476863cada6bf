use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::{
    InvalidDimensionsError, MoveError, PieceCollisionError,
    core::{board::Board, cell::Cell, piece::Piece},
};

use super::{
    game_stats::GameStats,
    piece_source::{PieceSeed, PieceSource},
};

/// Lifecycle of a [`Game`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant)]
pub enum SessionState {
    /// Constructed, `new_game` not called yet. No piece is active.
    Idle,
    Playing,
    /// The last spawn collided. Terminal until the next `new_game`.
    GameOver,
}

/// Result of a successful down step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum DropOutcome {
    /// The piece moved one row down.
    Fell,
    /// The piece could not move, was locked into the board, and the next
    /// piece was spawned.
    Locked { cleared_lines: usize },
}

/// A game session: board, falling piece, statistics, and piece source.
///
/// Every command comes in two flavours. The plain ones (`move_left`,
/// `rotate`, ...) return `bool` and treat a rejected move as an ordinary
/// outcome; the `try_*` ones report why a command had no effect.
///
/// Commands only act while the session is [`SessionState::Playing`]. Before
/// [`Game::new_game`] and after game over they return `false` (or
/// [`MoveError::NotPlaying`]) and leave the state untouched.
///
/// # Example
///
/// ```
/// use blockfall_engine::{DropOutcome, Game, PieceKind, PieceSequence};
///
/// let source = PieceSequence::new([PieceKind::O]).unwrap();
/// let mut game = Game::with_source(4, 4, source)?;
/// game.new_game();
///
/// assert!(game.move_down());
/// assert!(game.move_down());
/// assert_eq!(game.try_move_down(), Ok(DropOutcome::Locked { cleared_lines: 0 }));
/// assert_eq!(game.stats().completed_pieces(), 1);
/// # Ok::<(), blockfall_engine::InvalidDimensionsError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Game<R = Pcg32> {
    board: Board,
    falling_piece: Option<Piece>,
    stats: GameStats,
    state: SessionState,
    source: R,
}

impl Game<Pcg32> {
    /// Creates a game whose pieces come from a randomly seeded generator.
    pub fn new(width: usize, height: usize) -> Result<Self, InvalidDimensionsError> {
        Self::with_seed(width, height, rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed for a reproducible
    /// piece sequence.
    pub fn with_seed(
        width: usize,
        height: usize,
        seed: PieceSeed,
    ) -> Result<Self, InvalidDimensionsError> {
        Self::with_source(width, height, Pcg32::from_seed(seed.to_bytes()))
    }
}

impl<R> Game<R>
where
    R: PieceSource,
{
    /// Creates an idle game drawing pieces from `source`.
    pub fn with_source(
        width: usize,
        height: usize,
        source: R,
    ) -> Result<Self, InvalidDimensionsError> {
        Ok(Self {
            board: Board::new(width, height)?,
            falling_piece: None,
            stats: GameStats::new(),
            state: SessionState::Idle,
            source,
        })
    }

    /// Starts a new game: empties the board, resets statistics, and spawns
    /// the first piece.
    ///
    /// On a board too small for the spawned piece the game is over
    /// immediately.
    pub fn new_game(&mut self) {
        self.board.clear();
        self.stats = GameStats::new();
        self.state = SessionState::Playing;
        self.spawn_piece();
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.board.width()
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.board.height()
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.stats.score()
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    #[must_use]
    pub fn session_state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    /// Returns the board of locked cells, without the falling piece.
    #[must_use]
    pub fn locked_board(&self) -> &Board {
        &self.board
    }

    /// Returns the falling piece, or `None` before the first `new_game`.
    ///
    /// After game over this is the piece whose spawn collided.
    #[must_use]
    pub fn current_piece(&self) -> Option<&Piece> {
        self.falling_piece.as_ref()
    }

    /// Returns the locked board with the falling piece drawn on top.
    ///
    /// Piece cells outside the board are skipped. Computed on every call.
    #[must_use]
    pub fn snapshot(&self) -> Board {
        let mut board = self.board.clone();
        if let Some(piece) = &self.falling_piece {
            board.fill_piece(piece);
        }
        board
    }

    /// Returns [`Self::snapshot`] as `width * height` cells in row-major
    /// order.
    #[must_use]
    pub fn board(&self) -> Vec<Cell> {
        self.snapshot().cells().to_vec()
    }

    pub fn move_left(&mut self) -> bool {
        self.try_move_left().is_ok()
    }

    pub fn move_right(&mut self) -> bool {
        self.try_move_right().is_ok()
    }

    /// Moves the piece one row down, or locks it if it cannot move.
    ///
    /// Returns `true` if the piece fell, `false` if it settled (a new piece
    /// is now active) or no game is in progress.
    pub fn move_down(&mut self) -> bool {
        matches!(self.try_move_down(), Ok(DropOutcome::Fell))
    }

    pub fn rotate(&mut self) -> bool {
        self.try_rotate().is_ok()
    }

    /// Drops the piece to its lowest legal position and locks it.
    pub fn hard_drop(&mut self) {
        self.try_hard_drop().ok();
    }

    pub fn try_move_left(&mut self) -> Result<(), MoveError> {
        let piece = self.playing_piece()?.left();
        self.set_falling_piece(piece)?;
        Ok(())
    }

    pub fn try_move_right(&mut self) -> Result<(), MoveError> {
        let piece = self.playing_piece()?.right();
        self.set_falling_piece(piece)?;
        Ok(())
    }

    /// Rotates the piece 90° clockwise in place. No wall kicks are tried.
    pub fn try_rotate(&mut self) -> Result<(), MoveError> {
        let piece = self.playing_piece()?.rotated_right();
        self.set_falling_piece(piece)?;
        Ok(())
    }

    pub fn try_move_down(&mut self) -> Result<DropOutcome, MoveError> {
        let piece = self.playing_piece()?.down();
        if self.set_falling_piece(piece).is_ok() {
            return Ok(DropOutcome::Fell);
        }
        let cleared_lines = self.complete_piece_drop();
        Ok(DropOutcome::Locked { cleared_lines })
    }

    /// Drops and locks the piece, returning the number of lines cleared.
    pub fn try_hard_drop(&mut self) -> Result<usize, MoveError> {
        loop {
            if let DropOutcome::Locked { cleared_lines } = self.try_move_down()? {
                return Ok(cleared_lines);
            }
        }
    }

    fn playing_piece(&self) -> Result<&Piece, MoveError> {
        match (&self.falling_piece, self.state) {
            (Some(piece), SessionState::Playing) => Ok(piece),
            (_, state) => Err(MoveError::NotPlaying(state)),
        }
    }

    fn set_falling_piece(&mut self, piece: Piece) -> Result<(), PieceCollisionError> {
        if self.board.is_colliding(&piece) {
            return Err(PieceCollisionError);
        }
        self.falling_piece = Some(piece);
        Ok(())
    }

    fn complete_piece_drop(&mut self) -> usize {
        if let Some(piece) = self.falling_piece.take() {
            self.board.fill_piece(&piece);
        }
        let cleared_lines = self.board.clear_lines();
        self.stats.complete_piece_drop(cleared_lines);
        self.spawn_piece();
        cleared_lines
    }

    fn spawn_piece(&mut self) {
        let piece = Piece::spawn(self.source.next_kind(), self.board.width());
        if self.board.is_colliding(&piece) {
            self.state = SessionState::GameOver;
        }
        self.falling_piece = Some(piece);
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{InvalidDimensionsError, ParseBoardError};

use super::{cell::Cell, piece::Piece};

/// Fixed-size grid of locked cells.
///
/// Cells are stored flat in row-major order (`index = row * width + col`),
/// row 0 at the top. Dimensions never change after construction.
///
/// The board answers placement questions for a [`Piece`] whose origin may lie
/// outside it: cells above the top edge (negative rows) are allowed while a
/// piece falls in, but columns are always bounded.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Board, Cell};
///
/// let board = Board::from_ascii(
///     "
///     ....
///     IIII
///     ",
/// )?;
/// assert_eq!((board.width(), board.height()), (4, 2));
/// assert_eq!(board.get(0, 1), Some(Cell::I));
/// # Ok::<(), blockfall_engine::ParseBoardError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Largest accepted width or height.
    pub const MAX_SIDE: usize = 1024;

    /// Creates an all-empty board.
    pub fn new(width: usize, height: usize) -> Result<Self, InvalidDimensionsError> {
        let valid = 1..=Self::MAX_SIDE;
        if !valid.contains(&width) || !valid.contains(&height) {
            return Err(InvalidDimensionsError { width, height });
        }
        Ok(Self {
            width,
            height,
            cells: vec![Cell::Empty; width * height],
        })
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns all cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Returns an iterator over the rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks_exact(self.width)
    }

    /// Returns the cell at column `x`, row `y`, or `None` outside the board.
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Option<Cell> {
        (x < self.width && y < self.height).then(|| self.cells[y * self.width + x])
    }

    /// Resets every cell to [`Cell::Empty`].
    pub fn clear(&mut self) {
        self.cells.fill(Cell::Empty);
    }

    fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        let x = usize::try_from(x).ok().filter(|&x| x < self.width)?;
        let y = usize::try_from(y).ok().filter(|&y| y < self.height)?;
        Some(y * self.width + x)
    }

    /// Checks whether `piece` overlaps a wall, the floor, or a locked cell.
    ///
    /// A filled piece cell collides when its column is outside
    /// `0..width`, its row is `>= height`, or it lands on a non-empty cell.
    /// Rows above the top edge are exempt from the occupancy check.
    #[must_use]
    pub fn is_colliding(&self, piece: &Piece) -> bool {
        piece.occupied_positions().any(|(x, y, _)| {
            let Ok(col) = usize::try_from(x) else {
                return true;
            };
            if col >= self.width {
                return true;
            }
            let Ok(row) = usize::try_from(y) else {
                return false;
            };
            row >= self.height || self.cells[row * self.width + col].is_filled()
        })
    }

    /// Writes the piece's filled cells into the board.
    ///
    /// Cells that fall outside the board (above the top edge in particular)
    /// are dropped. Used both to lock a piece and to composite the falling
    /// piece onto a snapshot.
    pub fn fill_piece(&mut self, piece: &Piece) {
        for (x, y, cell) in piece.occupied_positions() {
            if let Some(index) = self.index_of(x, y) {
                self.cells[index] = cell;
            }
        }
    }

    fn is_row_filled(&self, y: usize) -> bool {
        self.cells[y * self.width..][..self.width]
            .iter()
            .all(|cell| cell.is_filled())
    }

    /// Clears filled lines and returns the number of lines cleared.
    ///
    /// Rows above each cleared line shift down, and fresh empty rows appear
    /// at the top.
    pub fn clear_lines(&mut self) -> usize {
        let width = self.width;
        let mut count = 0;
        for y in (0..self.height).rev() {
            if self.is_row_filled(y) {
                count += 1;
                continue;
            }
            if count > 0 {
                let src = y * width;
                self.cells.copy_within(src..src + width, src + count * width);
            }
        }
        self.cells[..count * width].fill(Cell::Empty);
        count
    }

    /// Parses a board from one text line per row, using [`Cell::as_char`]
    /// letters. Blank lines and surrounding whitespace are ignored.
    pub fn from_ascii(art: &str) -> Result<Self, ParseBoardError> {
        let lines: Vec<&str> = art
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        Self::from_rows(&lines)
    }

    fn from_rows<S>(rows: &[S]) -> Result<Self, ParseBoardError>
    where
        S: AsRef<str>,
    {
        let width = rows
            .first()
            .map(|row| row.as_ref().chars().count())
            .ok_or(ParseBoardError::NoRows)?;
        let mut board = Self::new(width, rows.len())?;
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let found = row.chars().count();
            if found != width {
                return Err(ParseBoardError::RaggedRow {
                    row: y,
                    expected: width,
                    found,
                });
            }
            for (x, c) in row.chars().enumerate() {
                let cell = Cell::from_char(c).ok_or(ParseBoardError::InvalidCell {
                    row: y,
                    col: x,
                    found: c,
                })?;
                board.cells[y * width + x] = cell;
            }
        }
        Ok(board)
    }

    fn row_strings(&self) -> Vec<String> {
        self.rows()
            .map(|row| row.iter().map(|cell| cell.as_char()).collect())
            .collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.rows().enumerate() {
            if y > 0 {
                writeln!(f)?;
            }
            for cell in row {
                write!(f, "{cell}")?;
            }
        }
        Ok(())
    }
}

impl Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Format: ["....", "IIII", ...] (one string per row, top to bottom)
        self.row_strings().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let rows = Vec::<String>::deserialize(deserializer)?;
        Self::from_rows(&rows).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PieceKind;

    fn board(art: &str) -> Board {
        Board::from_ascii(art).unwrap()
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new(10, 20).unwrap();
        assert_eq!(board.cells().len(), 200);
        assert!(board.cells().iter().all(|cell| cell.is_empty()));
        assert_eq!(board.rows().count(), 20);
    }

    #[test]
    fn test_invalid_dimensions() {
        assert_eq!(
            Board::new(0, 20),
            Err(InvalidDimensionsError {
                width: 0,
                height: 20
            })
        );
        assert!(Board::new(10, 0).is_err());
        assert!(Board::new(Board::MAX_SIDE + 1, 4).is_err());
        assert!(Board::new(1, 1).is_ok());
    }

    #[test]
    fn test_get() {
        let board = board(
            "
            ....
            ....
            ...Z
            ",
        );
        assert_eq!(board.get(3, 2), Some(Cell::Z));
        assert_eq!(board.cells()[11], Cell::Z);
        assert_eq!(board.get(4, 2), None);
        assert_eq!(board.get(0, 3), None);
    }

    #[test]
    fn test_collision_with_walls_and_floor() {
        let board = Board::new(4, 4).unwrap();
        assert!(!board.is_colliding(&Piece::new(PieceKind::I, 0, 0)));
        assert!(board.is_colliding(&Piece::new(PieceKind::I, -1, 0)));
        assert!(board.is_colliding(&Piece::new(PieceKind::I, 1, 0)));
        assert!(!board.is_colliding(&Piece::new(PieceKind::O, 2, 2)));
        assert!(board.is_colliding(&Piece::new(PieceKind::O, 2, 3)));
    }

    #[test]
    fn test_rows_above_top_only_checked_horizontally() {
        let board = board(
            "
            IIII
            ....
            ",
        );
        // The T's top row sits at y = -1 and its stem at y = 0 on a filled cell.
        assert!(board.is_colliding(&Piece::new(PieceKind::T, 0, -1)));
        // Entirely above the board: no occupancy check, but still bounded in x.
        assert!(!board.is_colliding(&Piece::new(PieceKind::O, 0, -2)));
        assert!(board.is_colliding(&Piece::new(PieceKind::O, 3, -2)));
    }

    #[test]
    fn test_collision_with_locked_cells() {
        let board = board(
            "
            ....
            ....
            .J..
            ",
        );
        assert!(board.is_colliding(&Piece::new(PieceKind::O, 0, 1)));
        assert!(!board.is_colliding(&Piece::new(PieceKind::O, 2, 1)));
    }

    #[test]
    fn test_fill_piece_drops_cells_above_top() {
        let mut board = Board::new(4, 2).unwrap();
        board.fill_piece(&Piece::new(PieceKind::J, 0, -1));
        assert_eq!(board.to_string(), "JJJ.\n....");
    }

    #[test]
    fn test_clear_lines_single_line() {
        let mut board = board(
            "
            ....
            .T..
            SSSS
            ",
        );
        assert_eq!(board.clear_lines(), 1);
        assert_eq!(board.to_string(), "....\n....\n.T..");
    }

    #[test]
    fn test_clear_lines_non_adjacent() {
        let mut board = board(
            "
            O...
            IIII
            .ZZ.
            LLLL
            ",
        );
        assert_eq!(board.clear_lines(), 2);
        assert_eq!(board.to_string(), "....\n....\nO...\n.ZZ.");
    }

    #[test]
    fn test_clear_lines_all_filled() {
        let mut board = board(
            "
            IIII
            JJJJ
            ",
        );
        assert_eq!(board.clear_lines(), 2);
        assert!(board.cells().iter().all(|cell| cell.is_empty()));
    }

    #[test]
    fn test_clear_lines_with_partial_lines() {
        let mut board = board(
            "
            III.
            .JJJ
            ",
        );
        let before = board.clone();
        assert_eq!(board.clear_lines(), 0);
        assert_eq!(board, before);
    }

    #[test]
    fn test_from_ascii_errors() {
        assert_eq!(Board::from_ascii("  \n "), Err(ParseBoardError::NoRows));
        assert_eq!(
            Board::from_ascii("....\n..."),
            Err(ParseBoardError::RaggedRow {
                row: 1,
                expected: 4,
                found: 3
            })
        );
        assert_eq!(
            Board::from_ascii("..#."),
            Err(ParseBoardError::InvalidCell {
                row: 0,
                col: 2,
                found: '#'
            })
        );
    }

    #[test]
    fn test_board_serialization() {
        let board = board(
            "
            ..O.
            IIII
            ",
        );
        let serialized = serde_json::to_string(&board).unwrap();
        assert_eq!(serialized, r#"["..O.","IIII"]"#);

        let deserialized: Board = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, board);
        assert!(serde_json::from_str::<Board>(r#"["..","..."]"#).is_err());
    }
}

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use super::cell::{Cell, PieceKind};

/// Largest side of a shape matrix.
const MAX_SHAPE_SIDE: usize = 4;

/// Shape matrix of a piece, at most 4×4, stored row-major.
///
/// A shape is never mutated in place: [`PieceShape::rotated_right`] builds a
/// new matrix, which also swaps `rows` and `cols` (an I-piece goes from 1×4
/// to 4×1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceShape {
    rows: usize,
    cols: usize,
    cells: ArrayVec<Cell, { MAX_SHAPE_SIDE * MAX_SHAPE_SIDE }>,
}

impl PieceShape {
    fn from_rows(rows: &[&[Cell]]) -> Self {
        let cols = rows.first().map_or(0, |row| row.len());
        debug_assert!(rows.len() <= MAX_SHAPE_SIDE && cols <= MAX_SHAPE_SIDE);
        debug_assert!(rows.iter().all(|row| row.len() == cols));
        let cells = rows.iter().flat_map(|row| row.iter().copied()).collect();
        Self {
            rows: rows.len(),
            cols,
            cells,
        }
    }

    /// Returns the spawn orientation of `kind`.
    #[must_use]
    pub fn template(kind: PieceKind) -> Self {
        Self::from_rows(SHAPE_TEMPLATES[kind as usize])
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the cell at (`row`, `col`), or `None` outside the matrix.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        if row < self.rows && col < self.cols {
            Some(self.cells[row * self.cols + col])
        } else {
            None
        }
    }

    /// Returns the shape rotated 90° clockwise.
    ///
    /// `new[i][j] = old[rows - 1 - j][i]`, producing a `cols × rows` matrix.
    #[must_use]
    pub fn rotated_right(&self) -> Self {
        let rows = self.cols;
        let cols = self.rows;
        let mut cells = ArrayVec::new();
        for i in 0..rows {
            for j in 0..cols {
                cells.push(self.cells[(self.rows - 1 - j) * self.cols + i]);
            }
        }
        Self { rows, cols, cells }
    }

    /// Returns an iterator of `(dx, dy, cell)` for every filled cell.
    pub fn filled_cells(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_filled())
            .map(|(i, &cell)| (i % self.cols, i / self.cols, cell))
    }
}

const SHAPE_TEMPLATES: [&[&[Cell]]; PieceKind::LEN] = {
    use Cell::{Empty as E, I, J, L, O, S, T, Z};
    [
        // I-piece
        &[&[I, I, I, I]],
        // O-piece
        &[&[O, O], &[O, O]],
        // T-piece
        &[&[T, T, T], &[E, T, E]],
        // S-piece
        &[&[E, S, S], &[S, S, E]],
        // Z-piece
        &[&[Z, Z, E], &[E, Z, Z]],
        // J-piece
        &[&[J, E, E], &[J, J, J]],
        // L-piece
        &[&[E, E, L], &[L, L, L]],
    ]
};

/// A falling piece: a kind, its current shape matrix, and the board
/// coordinates of the matrix's top-left cell.
///
/// The origin may be negative or past the board edges; whether a placement
/// is legal is decided by [`Board::is_colliding`](super::Board::is_colliding),
/// never by clamping. Pieces are values: movement and rotation return new
/// `Piece` instances.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Piece, PieceKind};
///
/// let piece = Piece::spawn(PieceKind::I, 10);
/// assert_eq!((piece.x(), piece.y()), (3, 0));
///
/// let rotated = piece.rotated_right();
/// assert_eq!((rotated.shape().rows(), rotated.shape().cols()), (4, 1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    kind: PieceKind,
    rotation: PieceRotation,
    shape: PieceShape,
    x: i32,
    y: i32,
}

impl Piece {
    /// Creates a piece of `kind` in spawn orientation at the given origin.
    #[must_use]
    pub fn new(kind: PieceKind, x: i32, y: i32) -> Self {
        Self {
            kind,
            rotation: PieceRotation::default(),
            shape: PieceShape::template(kind),
            x,
            y,
        }
    }

    /// Creates a piece at the spawn position of a board `board_width` wide.
    ///
    /// The piece sits on row 0, horizontally centered with floor division
    /// (left-biased on odd remainders, negative if the board is narrower
    /// than the shape).
    #[must_use]
    pub fn spawn(kind: PieceKind, board_width: usize) -> Self {
        let cols = PieceShape::template(kind).cols();
        let x = (to_coord(board_width) - to_coord(cols)).div_euclid(2);
        Self::new(kind, x, 0)
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn rotation(&self) -> PieceRotation {
        self.rotation
    }

    #[must_use]
    pub fn shape(&self) -> &PieceShape {
        &self.shape
    }

    #[must_use]
    pub fn x(&self) -> i32 {
        self.x
    }

    #[must_use]
    pub fn y(&self) -> i32 {
        self.y
    }

    /// Returns the absolute board coordinates `(x, y, cell)` of every filled
    /// cell of the piece.
    pub fn occupied_positions(&self) -> impl Iterator<Item = (i32, i32, Cell)> + '_ {
        self.shape
            .filled_cells()
            .map(move |(dx, dy, cell)| (self.x + to_coord(dx), self.y + to_coord(dy), cell))
    }

    #[must_use]
    pub fn left(&self) -> Self {
        self.shifted(-1, 0)
    }

    #[must_use]
    pub fn right(&self) -> Self {
        self.shifted(1, 0)
    }

    #[must_use]
    pub fn down(&self) -> Self {
        self.shifted(0, 1)
    }

    #[must_use]
    pub fn rotated_right(&self) -> Self {
        Self {
            kind: self.kind,
            rotation: self.rotation.rotated_right(),
            shape: self.shape.rotated_right(),
            x: self.x,
            y: self.y,
        }
    }

    fn shifted(&self, dx: i32, dy: i32) -> Self {
        Self {
            kind: self.kind,
            rotation: self.rotation,
            shape: self.shape.clone(),
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Converts a board or shape extent to a signed coordinate.
///
/// Extents are bounded by [`Board::MAX_SIDE`](super::Board::MAX_SIDE), so the
/// conversion never saturates in practice.
pub(crate) fn to_coord(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

impl Serialize for Piece {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Format: "kind#rotation@x,y" (e.g., "T#1@4,-1")
        let s = format!(
            "{}#{}@{},{}",
            self.kind.as_char(),
            self.rotation.quarter_turns(),
            self.x,
            self.y
        );
        serializer.serialize_str(&s)
    }
}

impl<'de> Deserialize<'de> for Piece {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error as _;

        let s = String::deserialize(deserializer)?;
        let invalid = || D::Error::custom(format!("expected 'kind#rotation@x,y', got '{s}'"));

        let (kind_str, rest) = s.split_once('#').ok_or_else(invalid)?;
        let (rotation_str, position_str) = rest.split_once('@').ok_or_else(invalid)?;
        let (x_str, y_str) = position_str.split_once(',').ok_or_else(invalid)?;

        let mut kind_chars = kind_str.chars();
        let kind = match (kind_chars.next(), kind_chars.next()) {
            (Some(c), None) => PieceKind::from_char(c)
                .ok_or_else(|| D::Error::custom(format!("invalid piece kind: {c}")))?,
            _ => {
                return Err(D::Error::custom(format!(
                    "piece kind must be single character, got '{kind_str}'"
                )));
            }
        };
        let rotation = rotation_str.parse::<u8>().map_err(|e| {
            D::Error::custom(format!("invalid rotation: {rotation_str} ({e})"))
        })?;
        if rotation > 3 {
            return Err(D::Error::custom(format!(
                "rotation must be 0-3, got {rotation}"
            )));
        }
        let x = x_str
            .parse::<i32>()
            .map_err(|e| D::Error::custom(format!("invalid x position: {x_str} ({e})")))?;
        let y = y_str
            .parse::<i32>()
            .map_err(|e| D::Error::custom(format!("invalid y position: {y_str} ({e})")))?;

        let mut piece = Piece::new(kind, x, y);
        for _ in 0..rotation {
            piece = piece.rotated_right();
        }
        Ok(piece)
    }
}

/// Number of clockwise quarter turns applied since spawn, modulo 4.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PieceRotation(u8);

impl PieceRotation {
    #[must_use]
    pub fn rotated_right(self) -> Self {
        PieceRotation((self.0 + 1) % 4)
    }

    #[must_use]
    pub fn quarter_turns(self) -> u8 {
        self.0
    }
}

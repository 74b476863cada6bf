use std::fmt;

use serde::{Deserialize, Serialize};

/// A single cell of the board or of a piece shape.
///
/// Seven variants name the tetromino that left the block there; [`Cell::Empty`]
/// marks the absence of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Cell {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
    #[default]
    Empty,
}

impl Cell {
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }

    #[must_use]
    pub const fn is_filled(self) -> bool {
        !self.is_empty()
    }

    /// Returns the single character representation of this cell.
    ///
    /// Empty cells are written as `.`.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::Cell;
    ///
    /// assert_eq!(Cell::T.as_char(), 'T');
    /// assert_eq!(Cell::Empty.as_char(), '.');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Cell::I => 'I',
            Cell::O => 'O',
            Cell::T => 'T',
            Cell::S => 'S',
            Cell::Z => 'Z',
            Cell::J => 'J',
            Cell::L => 'L',
            Cell::Empty => '.',
        }
    }

    /// Parses a cell from its single character representation.
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(Cell::I),
            'O' => Some(Cell::O),
            'T' => Some(Cell::T),
            'S' => Some(Cell::S),
            'Z' => Some(Cell::Z),
            'J' => Some(Cell::J),
            'L' => Some(Cell::L),
            '.' => Some(Cell::Empty),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl Serialize for Cell {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_char(self.as_char())
    }
}

impl<'de> Deserialize<'de> for Cell {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let c = char::deserialize(deserializer)?;
        Cell::from_char(c).ok_or_else(|| serde::de::Error::custom(format!("invalid cell: {c}")))
    }
}

impl From<PieceKind> for Cell {
    fn from(kind: PieceKind) -> Self {
        match kind {
            PieceKind::I => Cell::I,
            PieceKind::O => Cell::O,
            PieceKind::T => Cell::T,
            PieceKind::S => Cell::S,
            PieceKind::Z => Cell::Z,
            PieceKind::J => Cell::J,
            PieceKind::L => Cell::L,
        }
    }
}

/// Enum representing the type of piece.
///
/// The discriminants follow the catalog order used when a piece source picks
/// an index in `0..PieceKind::LEN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// T-piece.
    T = 2,
    /// S-piece.
    S = 3,
    /// Z-piece.
    Z = 4,
    /// J-piece.
    J = 5,
    /// L-piece.
    L = 6,
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    pub const ALL: [PieceKind; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::T => 'T',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
        }
    }

    /// Parses a piece kind from a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('S'), Some(PieceKind::S));
    /// assert_eq!(PieceKind::from_char('.'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'O' => Some(PieceKind::O),
            'T' => Some(PieceKind::T),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_char_conversion() {
        let cells = [
            Cell::I,
            Cell::O,
            Cell::T,
            Cell::S,
            Cell::Z,
            Cell::J,
            Cell::L,
            Cell::Empty,
        ];
        for cell in cells {
            assert_eq!(Cell::from_char(cell.as_char()), Some(cell));
        }
        assert_eq!(Cell::from_char('X'), None);
        assert_eq!(Cell::from_char('#'), None);
    }

    #[test]
    fn test_default_cell_is_empty() {
        assert!(Cell::default().is_empty());
        assert!(Cell::Z.is_filled());
    }

    #[test]
    fn test_piece_kind_index_matches_catalog_order() {
        for (index, kind) in PieceKind::ALL.iter().enumerate() {
            assert_eq!(*kind as usize, index);
        }
    }

    #[test]
    fn test_piece_kind_to_cell_keeps_letter() {
        for kind in PieceKind::ALL {
            assert_eq!(Cell::from(kind).as_char(), kind.as_char());
        }
    }

    #[test]
    fn test_cell_serialization() {
        assert_eq!(serde_json::to_string(&Cell::J).unwrap(), "\"J\"");
        assert_eq!(serde_json::to_string(&Cell::Empty).unwrap(), "\".\"");
        assert_eq!(serde_json::from_str::<Cell>("\"L\"").unwrap(), Cell::L);
        assert!(serde_json::from_str::<Cell>("\"x\"").is_err());
    }
}

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::CellId;

/// Candy variants that can occupy a cell. Two candies match when they are the same variant.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Candy {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Orange,
}

impl Candy {
    pub const ALL: [Candy; 6] = [
        Self::Red,
        Self::Blue,
        Self::Green,
        Self::Yellow,
        Self::Purple,
        Self::Orange,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Variant at `index` in [`Candy::ALL`], wrapping around.
    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::COUNT]
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn symbol(self) -> char {
        match self {
            Self::Red => 'R',
            Self::Blue => 'B',
            Self::Green => 'G',
            Self::Yellow => 'Y',
            Self::Purple => 'P',
            Self::Orange => 'O',
        }
    }
}

bitflags! {
    /// Role a cell plays in the step it was captured in.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct CellMarks: u8 {
        const MATCHED = 1 << 0;
        const FALLING = 1 << 1;
        const SPAWNED = 1 << 2;
    }
}

impl Default for CellMarks {
    fn default() -> Self {
        Self::empty()
    }
}

/// Content of a single board position.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Candy {
        candy: Candy,
        id: CellId,
        marks: CellMarks,
    },
}

impl Cell {
    pub const fn new(candy: Candy, id: CellId) -> Self {
        Self::Candy {
            candy,
            id,
            marks: CellMarks::empty(),
        }
    }

    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }

    pub const fn candy(self) -> Option<Candy> {
        match self {
            Self::Empty => None,
            Self::Candy { candy, .. } => Some(candy),
        }
    }

    pub const fn id(self) -> Option<CellId> {
        match self {
            Self::Empty => None,
            Self::Candy { id, .. } => Some(id),
        }
    }

    pub const fn marks(self) -> CellMarks {
        match self {
            Self::Empty => CellMarks::empty(),
            Self::Candy { marks, .. } => marks,
        }
    }

    /// Whether this cell and `other` hold the same candy variant. Empty cells never match.
    pub fn matches(self, other: Self) -> bool {
        match (self.candy(), other.candy()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    pub fn with_marks(self, marks: CellMarks) -> Self {
        match self {
            Self::Empty => Self::Empty,
            Self::Candy { candy, id, .. } => Self::Candy { candy, id, marks },
        }
    }

    pub fn symbol(self) -> char {
        self.candy().map_or('.', Candy::symbol)
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::Empty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_never_matches() {
        let red = Cell::new(Candy::Red, 0);
        assert!(!Cell::Empty.matches(Cell::Empty));
        assert!(!red.matches(Cell::Empty));
        assert!(red.matches(Cell::new(Candy::Red, 7)));
        assert!(!red.matches(Cell::new(Candy::Blue, 1)));
    }

    #[test]
    fn marks_are_dropped_for_empty_cells() {
        assert_eq!(Cell::Empty.with_marks(CellMarks::MATCHED), Cell::Empty);
        let cell = Cell::new(Candy::Green, 3).with_marks(CellMarks::FALLING);
        assert_eq!(cell.marks(), CellMarks::FALLING);
        assert_eq!(cell.id(), Some(3));
    }

    #[test]
    fn index_round_trips_through_all() {
        for candy in Candy::ALL {
            assert_eq!(Candy::from_index(candy.index()), candy);
        }
        assert_eq!(Candy::from_index(Candy::COUNT), Candy::Red);
    }
}

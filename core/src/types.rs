use serde::{Deserialize, Serialize};

/// Single coordinate axis used for board size and positions.
pub type Coord = u8;

/// Count type used for cell totals.
pub type CellCount = u16;

/// Two-dimensional coordinates `(row, col)`, row 0 is the top of the board.
pub type Coord2 = (Coord, Coord);

/// Identity handed out to every candy when it is created.
pub type CellId = u32;

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Direction of a straight run on the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// Coordinates of the `offset`-th cell along `line` on this axis.
    ///
    /// For [`Axis::Horizontal`] `line` is a row and `offset` a column, for
    /// [`Axis::Vertical`] it is the other way around.
    pub const fn coords(self, line: Coord, offset: Coord) -> Coord2 {
        match self {
            Self::Horizontal => (line, offset),
            Self::Vertical => (offset, line),
        }
    }
}

/// Iterates every coordinate of a `size`×`size` board in row-major order.
pub fn iter_coords(size: Coord) -> impl Iterator<Item = Coord2> {
    (0..size).flat_map(move |row| (0..size).map(move |col| (row, col)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn axis_coords_swap_line_and_offset() {
        assert_eq!(Axis::Horizontal.coords(2, 5), (2, 5));
        assert_eq!(Axis::Vertical.coords(2, 5), (5, 2));
    }

    #[test]
    fn iter_coords_is_row_major() {
        let coords: Vec<_> = iter_coords(2).collect();
        assert_eq!(coords, [(0, 0), (0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn mult_saturates() {
        assert_eq!(mult(8, 8), 64);
        assert_eq!(mult(Coord::MAX, Coord::MAX), 65025);
    }
}

use alloc::vec::Vec;
use core::fmt;
use core::ops::{Index, IndexMut};

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Largest supported board edge.
pub const MAX_SIZE: Coord = Coord::MAX;

/// Square grid of cells. Row 0 is the top, gravity pulls towards the last row.
///
/// Every position always holds exactly one [`Cell`]; holes are [`Cell::Empty`]. The phase helpers
/// (`with_*`) never touch `self` and return a new board, which is what keeps captured steps
/// independent of each other.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBoard")]
pub struct Board {
    cells: Array2<Cell>,
    next_id: CellId,
}

/// Deserialized form of [`Board`] before [`Board::validate`] has run.
#[derive(Deserialize)]
struct RawBoard {
    cells: Array2<Cell>,
    next_id: CellId,
}

impl TryFrom<RawBoard> for Board {
    type Error = CascadeError;

    fn try_from(raw: RawBoard) -> Result<Self> {
        let board = Self {
            cells: raw.cells,
            next_id: raw.next_id,
        };
        board.validate()?;
        Ok(board)
    }
}

impl Board {
    /// Board of `size`×`size` empty cells.
    pub fn new(size: Coord) -> Result<Self> {
        Self::from_fn(size, |_| None)
    }

    /// Board whose cells are produced by `f` in row-major order. Candies get strictly increasing
    /// identities in the same order.
    pub fn from_fn(size: Coord, mut f: impl FnMut(Coord2) -> Option<Candy>) -> Result<Self> {
        if size == 0 {
            return Err(CascadeError::InvalidSize {
                size: 0,
                max: MAX_SIZE,
            });
        }

        let mut board = Self {
            cells: Array2::default((size, size).to_nd_index()),
            next_id: 0,
        };
        for coords in iter_coords(size) {
            if let Some(candy) = f(coords) {
                let cell = board.spawn(candy);
                board[coords] = cell;
            }
        }
        Ok(board)
    }

    /// Board built from a square slice of rows.
    pub fn from_candies<R: AsRef<[Candy]>>(rows: &[R]) -> Result<Self> {
        let len = rows.len();
        let size = Coord::try_from(len)
            .ok()
            .filter(|&size| size > 0)
            .ok_or(CascadeError::InvalidSize {
                size: len,
                max: MAX_SIZE,
            })?;

        if rows.iter().any(|row| row.as_ref().len() != len) {
            return Err(CascadeError::InvalidBoardShape);
        }

        Self::from_fn(size, |(row, col)| {
            Some(rows[usize::from(row)].as_ref()[usize::from(col)])
        })
    }

    /// Checks a board that did not come from one of the constructors. Deserialization runs this
    /// too, so a decoded board is always square and can refill itself at least once without
    /// reusing an identity.
    pub fn validate(&self) -> Result<()> {
        let (rows, cols) = self.cells.dim();
        if rows != cols {
            return Err(CascadeError::InvalidBoardShape);
        }
        if rows == 0 || rows > usize::from(MAX_SIZE) {
            return Err(CascadeError::InvalidSize {
                size: rows,
                max: MAX_SIZE,
            });
        }

        let reused = self
            .iter()
            .filter_map(|(_, cell)| cell.id())
            .any(|id| id >= self.next_id);
        let headroom = CellId::MAX - self.next_id;
        if reused || headroom < CellId::from(self.total_cells()) {
            return Err(CascadeError::InvalidNextId {
                next_id: self.next_id,
            });
        }
        Ok(())
    }

    pub fn size(&self) -> Coord {
        self.cells
            .nrows()
            .try_into()
            .expect("board size should have been validated")
    }

    pub fn total_cells(&self) -> CellCount {
        mult(self.size(), self.size())
    }

    /// Identity the next spawned candy will receive.
    pub fn next_id(&self) -> CellId {
        self.next_id
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size && coords.1 < size {
            Ok(coords)
        } else {
            Err(CascadeError::InvalidCoords)
        }
    }

    pub fn cell_at(&self, coords: Coord2) -> Cell {
        self[coords]
    }

    pub fn candy_at(&self, coords: Coord2) -> Option<Candy> {
        self[coords].candy()
    }

    /// Puts `candy` at `coords`. An existing candy keeps its identity, an empty cell gets a fresh
    /// one.
    pub fn set_candy(&mut self, coords: Coord2, candy: Candy) {
        let cell = match self[coords] {
            Cell::Empty => self.spawn(candy),
            Cell::Candy { id, marks, .. } => Cell::Candy { candy, id, marks },
        };
        self[coords] = cell;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Coord2, Cell)> + '_ {
        iter_coords(self.size()).map(|coords| (coords, self[coords]))
    }

    pub fn empty_count(&self) -> CellCount {
        self.cells
            .iter()
            .filter(|cell| cell.is_empty())
            .count()
            .try_into()
            .unwrap_or(CellCount::MAX)
    }

    /// Non-empty candies of `col`, top to bottom.
    pub fn column_candies(&self, col: Coord) -> Vec<Candy> {
        (0..self.size())
            .filter_map(|row| self.candy_at((row, col)))
            .collect()
    }

    pub fn with_marks_cleared(&self) -> Self {
        let mut board = self.clone();
        board
            .cells
            .map_inplace(|cell| *cell = cell.with_marks(CellMarks::empty()));
        board
    }

    /// Copy with every cell of `groups` marked [`CellMarks::MATCHED`].
    pub fn with_matches_marked(&self, groups: &[MatchGroup]) -> Self {
        let mut board = self.with_marks_cleared();
        for &coords in groups.iter().flat_map(MatchGroup::cells) {
            board[coords] = board[coords].with_marks(CellMarks::MATCHED);
        }
        board
    }

    /// Copy with every cell of `groups` emptied. Cells shared by two groups are removed once.
    pub fn with_matches_removed(&self, groups: &[MatchGroup]) -> Self {
        let mut board = self.with_marks_cleared();
        for &coords in groups.iter().flat_map(MatchGroup::cells) {
            board[coords] = Cell::Empty;
        }
        board
    }

    /// Copy where every column is compacted towards the bottom.
    ///
    /// Candies keep their relative order within the column; the ones that changed row are marked
    /// [`CellMarks::FALLING`]. Vacated cells at the top become empty.
    pub fn with_gravity(&self) -> Self {
        let size = self.size();
        let mut board = self.with_marks_cleared();

        for col in 0..size {
            let mut target = size;
            for row in (0..size).rev() {
                let cell = board[(row, col)];
                if cell.is_empty() {
                    continue;
                }
                target -= 1;
                if target != row {
                    board[(target, col)] = cell.with_marks(CellMarks::FALLING);
                    board[(row, col)] = Cell::Empty;
                }
            }
        }
        board
    }

    /// Copy where every empty cell receives a candy from `source` and a fresh identity, marked
    /// [`CellMarks::SPAWNED`]. Cells are filled column by column, top to bottom.
    pub fn with_refill<S: CandySource + ?Sized>(&self, source: &mut S) -> Self {
        let size = self.size();
        let mut board = self.with_marks_cleared();

        for col in 0..size {
            for row in 0..size {
                if board[(row, col)].is_empty() {
                    let cell = board.spawn(source.next_candy());
                    board[(row, col)] = cell.with_marks(CellMarks::SPAWNED);
                }
            }
        }
        board
    }

    fn spawn(&mut self, candy: Candy) -> Cell {
        let cell = Cell::new(candy, self.next_id);
        self.next_id = self
            .next_id
            .checked_add(1)
            .expect("cell identities should not run out");
        cell
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

impl IndexMut<Coord2> for Board {
    fn index_mut(&mut self, coords: Coord2) -> &mut Self::Output {
        &mut self.cells[coords.to_nd_index()]
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, line) in self.cells.rows().into_iter().enumerate() {
            if row > 0 {
                writeln!(f)?;
            }
            for (col, cell) in line.iter().enumerate() {
                if col > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{}", cell.symbol())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;
    use Candy::*;

    fn board(rows: &[&[Candy]]) -> Board {
        Board::from_candies(rows).unwrap()
    }

    #[test]
    fn from_fn_assigns_increasing_ids_row_major() {
        let board = Board::from_fn(3, |(row, col)| Some(Candy::from_index((row + col).into())))
            .unwrap();

        let ids: Vec<_> = board.iter().filter_map(|(_, cell)| cell.id()).collect();
        assert_eq!(ids, (0..9).collect::<Vec<CellId>>());
        assert_eq!(board.next_id(), 9);
    }

    #[test]
    fn from_candies_rejects_ragged_rows() {
        let rows: &[&[Candy]] = &[&[Red, Blue], &[Green]];
        assert_eq!(
            Board::from_candies(rows),
            Err(CascadeError::InvalidBoardShape)
        );

        let rows: &[&[Candy]] = &[];
        assert!(matches!(
            Board::from_candies(rows),
            Err(CascadeError::InvalidSize { size: 0, .. })
        ));
    }

    #[test]
    fn validate_coords_rejects_out_of_range() {
        let board = Board::new(4).unwrap();
        assert_eq!(board.validate_coords((3, 3)), Ok((3, 3)));
        assert_eq!(board.validate_coords((4, 0)), Err(CascadeError::InvalidCoords));
    }

    #[test]
    #[should_panic]
    fn indexing_out_of_range_panics() {
        let board = Board::new(4).unwrap();
        let _ = board[(0, 4)];
    }

    #[test]
    fn set_candy_keeps_identity() {
        let mut board = board(&[&[Red, Blue], &[Green, Yellow]]);
        board.set_candy((0, 1), Orange);
        assert_eq!(board.cell_at((0, 1)), Cell::new(Orange, 1));

        let mut empty = Board::new(2).unwrap();
        empty.set_candy((1, 1), Purple);
        assert_eq!(empty.cell_at((1, 1)), Cell::new(Purple, 0));
    }

    #[test]
    fn gravity_compacts_columns_in_order() {
        let start = board(&[&[Red, Blue, Green], &[Yellow, Blue, Green], &[Purple, Red, Orange]]);
        let removed = start.with_matches_removed(&[MatchGroup::new(
            Axis::Horizontal,
            Purple,
            vec![(2, 0)],
        )
        .unwrap()]);

        let fallen = removed.with_gravity();

        assert_eq!(fallen.cell_at((0, 0)), Cell::Empty);
        assert_eq!(fallen.candy_at((1, 0)), Some(Red));
        assert_eq!(fallen.candy_at((2, 0)), Some(Yellow));
        assert!(fallen.cell_at((2, 0)).marks().contains(CellMarks::FALLING));
        assert_eq!(fallen.cell_at((2, 1)).marks(), CellMarks::empty());
        assert_eq!(fallen.column_candies(0), [Red, Yellow]);
    }

    #[test]
    fn refill_spawns_fresh_ids_column_major() {
        let mut source = ScriptedSource::new(vec![Orange, Purple]).unwrap();
        let start = board(&[&[Red, Blue], &[Green, Yellow]]);
        let groups = [MatchGroup::new(Axis::Horizontal, Red, vec![(0, 0), (0, 1)]).unwrap()];
        let removed = start.with_matches_removed(&groups);

        let filled = removed.with_refill(&mut source);

        assert_eq!(filled.cell_at((0, 0)).id(), Some(4));
        assert_eq!(filled.cell_at((0, 1)).id(), Some(5));
        assert_eq!(filled.candy_at((0, 0)), Some(Orange));
        assert_eq!(filled.candy_at((0, 1)), Some(Purple));
        assert!(filled.cell_at((0, 1)).marks().contains(CellMarks::SPAWNED));
        assert_eq!(filled.empty_count(), 0);
    }

    #[test]
    #[should_panic(expected = "cell identities should not run out")]
    fn refill_past_the_last_identity_panics() {
        let board = Board {
            cells: Array2::default((1, 1)),
            next_id: CellId::MAX,
        };
        let mut source = ScriptedSource::new(vec![Red]).unwrap();
        let _ = board.with_refill(&mut source);
    }

    #[test]
    fn validate_rejects_reused_or_exhausted_ids() {
        let mut start = board(&[&[Red, Blue], &[Green, Yellow]]);
        assert_eq!(start.validate(), Ok(()));

        start.next_id = 3;
        assert_eq!(
            start.validate(),
            Err(CascadeError::InvalidNextId { next_id: 3 })
        );

        let empty = Board {
            cells: Array2::default((2, 2)),
            next_id: CellId::MAX - 2,
        };
        assert_eq!(
            empty.validate(),
            Err(CascadeError::InvalidNextId {
                next_id: CellId::MAX - 2
            })
        );
    }

    #[test]
    fn display_renders_rows() {
        let mut board = board(&[&[Red, Blue], &[Green, Yellow]]);
        board[(1, 0)] = Cell::Empty;
        assert_eq!(board.to_string(), "R B\n. Y");
    }
}

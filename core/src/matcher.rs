use alloc::vec::Vec;

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Shortest run that counts as a match.
pub const MIN_RUN: Coord = 3;

/// A straight run of at least [`MIN_RUN`] cells holding the same candy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchGroup {
    axis: Axis,
    candy: Candy,
    cells: SmallVec<[Coord2; 8]>,
}

impl MatchGroup {
    /// Returns `None` when `cells` is empty.
    pub fn new(axis: Axis, candy: Candy, cells: impl IntoIterator<Item = Coord2>) -> Option<Self> {
        let cells: SmallVec<_> = cells.into_iter().collect();
        if cells.is_empty() {
            None
        } else {
            Some(Self { axis, candy, cells })
        }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn candy(&self) -> Candy {
        self.candy
    }

    pub fn cells(&self) -> &[Coord2] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        self.cells.contains(&coords)
    }
}

/// Finds every run of [`MIN_RUN`] or more identical candies.
///
/// Rows are scanned first (top to bottom, left to right), then columns (left to right, top to
/// bottom), and groups come back in that order. Each run is extended to its full length.
///
/// Overlapping runs, as in L, T or cross shapes, follow one rule: a run whose cells were all
/// claimed by earlier groups is dropped; otherwise the whole run is reported and its cells become
/// claimed. A cell at the corner of an L can therefore show up in two groups, while a run that adds
/// nothing new never does.
pub fn find_matches(board: &Board) -> Vec<MatchGroup> {
    let size = board.size();
    let mut claimed: Array2<bool> = Array2::default((size, size).to_nd_index());
    let mut groups = Vec::new();

    for axis in [Axis::Horizontal, Axis::Vertical] {
        for line in 0..size {
            scan_line(board, axis, line, &mut claimed, &mut groups);
        }
    }

    groups
}

pub fn has_matches(board: &Board) -> bool {
    !find_matches(board).is_empty()
}

/// Number of distinct cells covered by `groups`.
pub fn matched_cell_count(groups: &[MatchGroup]) -> CellCount {
    let mut cells: Vec<Coord2> = groups.iter().flat_map(MatchGroup::cells).copied().collect();
    cells.sort_unstable();
    cells.dedup();
    cells.len().try_into().unwrap_or(CellCount::MAX)
}

fn scan_line(
    board: &Board,
    axis: Axis,
    line: Coord,
    claimed: &mut Array2<bool>,
    groups: &mut Vec<MatchGroup>,
) {
    let size = board.size();
    let at = |offset: Coord| board[axis.coords(line, offset)];

    let mut start = 0;
    while start < size {
        let first = at(start);
        let mut end = start + 1;
        while end < size && first.matches(at(end)) {
            end += 1;
        }

        if end - start >= MIN_RUN
            && let Some(candy) = first.candy()
        {
            let run = (start..end).map(|offset| axis.coords(line, offset));
            if run.clone().any(|coords| !claimed[coords.to_nd_index()]) {
                for coords in run.clone() {
                    claimed[coords.to_nd_index()] = true;
                }
                groups.extend(MatchGroup::new(axis, candy, run));
            }
        }

        start = end;
    }
}

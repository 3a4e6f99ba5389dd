use super::*;

/// Draws rejected for one cell before the generator stops asking the source.
pub const MAX_REDRAWS: u32 = 64;

/// Generation strategy that fills the board in row-major order and redraws any candy that would
/// complete a run of three with the two cells to its left or the two cells above it. The result
/// never contains a match.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct StableBoardGenerator;

impl StableBoardGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl BoardGenerator for StableBoardGenerator {
    fn generate<S: CandySource + ?Sized>(&self, size: Coord, source: &mut S) -> Result<Board> {
        let mut board = Board::new(size)?;

        for coords in iter_coords(size) {
            let candy = pick_safe_candy(&board, coords, source);
            board.set_candy(coords, candy);
        }

        debug_assert!(!has_matches(&board));
        Ok(board)
    }
}

/// Whether placing `candy` at `coords` would complete a run of three with the already placed
/// cells to the left or above.
fn completes_run(board: &Board, (row, col): Coord2, candy: Candy) -> bool {
    let same = |coords: Coord2| board.candy_at(coords) == Some(candy);
    (col >= 2 && same((row, col - 1)) && same((row, col - 2)))
        || (row >= 2 && same((row - 1, col)) && same((row - 2, col)))
}

fn pick_safe_candy<S: CandySource + ?Sized>(board: &Board, coords: Coord2, source: &mut S) -> Candy {
    for attempt in 0..MAX_REDRAWS {
        let candy = source.next_candy();
        if !completes_run(board, coords, candy) {
            return candy;
        }
        log::trace!("{:?} at {:?} would complete a run, redraw {}", candy, coords, attempt + 1);
    }

    // at most two candies are ruled out per cell, so one of the six is always free
    let candy = Candy::ALL
        .into_iter()
        .find(|&candy| !completes_run(board, coords, candy))
        .unwrap_or(Candy::Red);
    log::warn!(
        "Source kept producing matching candies at {:?}, falling back to {:?}",
        coords,
        candy
    );
    candy
}

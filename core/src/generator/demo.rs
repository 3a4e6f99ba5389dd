use super::*;

/// Cells overwritten on top of a stable board so that resolving it starts with matches right away
/// and keeps cascading once gravity kicks in.
pub const CHAIN_DEMO_LAYOUT: [(Coord2, Candy); 9] = [
    ((3, 3), Candy::Red),
    ((4, 3), Candy::Red),
    ((5, 3), Candy::Red),
    ((2, 3), Candy::Blue),
    ((1, 3), Candy::Blue),
    ((0, 3), Candy::Blue),
    ((6, 2), Candy::Green),
    ((6, 3), Candy::Green),
    ((6, 4), Candy::Green),
];

/// Smallest board the demo layout fits on.
pub const CHAIN_DEMO_MIN_SIZE: Coord = 7;

/// Stable board with [`CHAIN_DEMO_LAYOUT`] stamped on top, used to showcase chain reactions.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ChainDemoGenerator;

impl ChainDemoGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl BoardGenerator for ChainDemoGenerator {
    fn generate<S: CandySource + ?Sized>(&self, size: Coord, source: &mut S) -> Result<Board> {
        if size < CHAIN_DEMO_MIN_SIZE {
            return Err(CascadeError::BoardTooSmall {
                size,
                min: CHAIN_DEMO_MIN_SIZE,
            });
        }

        let mut board = StableBoardGenerator.generate(size, source)?;
        for (coords, candy) in CHAIN_DEMO_LAYOUT {
            board.set_candy(coords, candy);
        }
        Ok(board)
    }
}

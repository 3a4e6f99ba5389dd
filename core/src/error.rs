use thiserror::Error;

use crate::{CellId, Coord};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum CascadeError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Board rows do not form a square grid")]
    InvalidBoardShape,
    #[error("Board size must be between 1 and {max}, got {size}")]
    InvalidSize { size: usize, max: Coord },
    #[error("Next cell identity {next_id} is already taken or leaves no room to refill")]
    InvalidNextId { next_id: CellId },
    #[error("Candy script must not be empty")]
    EmptyScript,
    #[error("Board of size {size} is too small, at least {min} is required")]
    BoardTooSmall { size: Coord, min: Coord },
}

pub type Result<T> = core::result::Result<T, CascadeError>;

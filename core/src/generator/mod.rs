use crate::*;
pub use demo::*;
pub use source::*;
pub use stable::*;

mod demo;
mod source;
mod stable;

pub trait BoardGenerator {
    fn generate<S: CandySource + ?Sized>(&self, size: Coord, source: &mut S) -> Result<Board>;
}

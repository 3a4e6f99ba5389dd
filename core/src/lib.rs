#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use board::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use matcher::*;
pub use score::*;
pub use tile::*;
pub use types::*;

mod board;
mod engine;
mod error;
mod generator;
mod matcher;
mod score;
mod tile;
mod types;

pub const DEFAULT_SIZE: Coord = 8;

pub const DEFAULT_MAX_CHAINS: u32 = 64;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CascadeConfig {
    pub size: Coord,
    /// Chains to run before a resolution gives up and reports itself as truncated.
    pub max_chains: u32,
}

impl CascadeConfig {
    pub const fn new_unchecked(size: Coord, max_chains: u32) -> Self {
        Self { size, max_chains }
    }

    pub fn new(size: Coord, max_chains: u32) -> Self {
        let size = size.clamp(1, MAX_SIZE);
        let max_chains = max_chains.max(1);
        Self::new_unchecked(size, max_chains)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size, self.size)
    }
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self::new_unchecked(DEFAULT_SIZE, DEFAULT_MAX_CHAINS)
    }
}

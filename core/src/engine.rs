use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Initial,
    Matched,
    Removed,
    Falling,
    Filled,
    Complete,
}

impl Phase {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::Matched => "matched",
            Self::Removed => "removed",
            Self::Falling => "falling",
            Self::Filled => "filled",
            Self::Complete => "complete",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of the board after one phase of the resolution.
///
/// Each step owns its board, so later phases can never change what an earlier step shows.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Step {
    board: Board,
    groups: Vec<MatchGroup>,
    phase: Phase,
    description: String,
    chain: u32,
}

impl Step {
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Groups being cleared, only populated for [`Phase::Matched`].
    pub fn groups(&self) -> &[MatchGroup] {
        &self.groups
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Chain the step belongs to; for [`Phase::Complete`] this is the total chain count.
    pub fn chain(&self) -> u32 {
        self.chain
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    steps: Vec<Step>,
    chains: u32,
    truncated: bool,
}

impl Resolution {
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn into_steps(self) -> Vec<Step> {
        self.steps
    }

    pub fn chains(&self) -> u32 {
        self.chains
    }

    /// Whether the chain limit stopped the resolution before the board settled. A truncated
    /// resolution ends with a [`Phase::Filled`] step instead of [`Phase::Complete`].
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn final_board(&self) -> &Board {
        current(&self.steps)
    }

    /// Distinct candies cleared over all chains.
    pub fn cleared_candies(&self) -> u32 {
        self.matched_steps()
            .map(|step| u32::from(matched_cell_count(step.groups())))
            .sum()
    }

    pub(crate) fn matched_steps(&self) -> impl Iterator<Item = &Step> {
        self.steps
            .iter()
            .filter(|step| step.phase == Phase::Matched)
    }
}

/// Resolves `board` until no match is left, recording every phase.
///
/// The input board is left untouched. New candies come from `source`. Once `config.max_chains`
/// chains have run and the board still holds matches, the resolution stops early and is flagged
/// as truncated.
pub fn resolve<S: CandySource + ?Sized>(
    board: &Board,
    config: &CascadeConfig,
    source: &mut S,
) -> Resolution {
    let mut resolver = Resolver {
        max_chains: config.max_chains,
        source,
        stage: Stage::Start(board.clone()),
        steps: Vec::new(),
        chain: 0,
        truncated: false,
    };
    while resolver.advance() {}

    Resolution {
        steps: resolver.steps,
        chains: resolver.chain,
        truncated: resolver.truncated,
    }
}

enum Stage {
    Start(Board),
    Detect,
    Mark(Vec<MatchGroup>),
    Remove(Vec<MatchGroup>),
    Fall,
    Fill,
    Finished,
}

struct Resolver<'a, S: ?Sized> {
    max_chains: u32,
    source: &'a mut S,
    stage: Stage,
    steps: Vec<Step>,
    chain: u32,
    truncated: bool,
}

impl<S: CandySource + ?Sized> Resolver<'_, S> {
    /// Runs one transition, returns `false` once finished.
    fn advance(&mut self) -> bool {
        let next = match core::mem::replace(&mut self.stage, Stage::Finished) {
            Stage::Start(board) => {
                self.emit(
                    Phase::Initial,
                    board.with_marks_cleared(),
                    Vec::new(),
                    "Initial board: looking for three or more matching candies in a line".into(),
                );
                Stage::Detect
            }
            Stage::Detect => self.detect(),
            Stage::Mark(groups) => {
                let board = current(&self.steps).with_matches_marked(&groups);
                let cells = matched_cell_count(&groups);
                log::debug!(
                    "chain {}: {} groups, {} candies",
                    self.chain,
                    groups.len(),
                    cells
                );
                let description = format!(
                    "Chain {}: found {} {} ({} candies)",
                    self.chain,
                    groups.len(),
                    plural(groups.len(), "match", "matches"),
                    cells
                );
                self.emit(Phase::Matched, board, groups.clone(), description);
                Stage::Remove(groups)
            }
            Stage::Remove(groups) => {
                let board = current(&self.steps).with_matches_removed(&groups);
                let description = format!(
                    "Removed the matched candies, leaving {} empty cells",
                    board.empty_count()
                );
                self.emit(Phase::Removed, board, Vec::new(), description);
                Stage::Fall
            }
            Stage::Fall => {
                let board = current(&self.steps).with_gravity();
                let moved = board
                    .iter()
                    .filter(|(_, cell)| cell.marks().contains(CellMarks::FALLING))
                    .count();
                let description = format!(
                    "Gravity applied: {} {} fell into the gaps",
                    moved,
                    plural(moved, "candy", "candies")
                );
                self.emit(Phase::Falling, board, Vec::new(), description);
                Stage::Fill
            }
            Stage::Fill => {
                let before = current(&self.steps);
                let spawned = before.empty_count();
                let board = before.with_refill(&mut *self.source);
                let description = format!(
                    "Spawned {} new {} from the top",
                    spawned,
                    plural(spawned.into(), "candy", "candies")
                );
                self.emit(Phase::Filled, board, Vec::new(), description);
                Stage::Detect
            }
            Stage::Finished => Stage::Finished,
        };
        self.stage = next;
        !matches!(self.stage, Stage::Finished)
    }

    fn detect(&mut self) -> Stage {
        let groups = find_matches(current(&self.steps));
        if groups.is_empty() {
            let board = current(&self.steps).with_marks_cleared();
            let description = format!(
                "Complete! {} {} in total",
                self.chain,
                plural(self.chain as usize, "chain", "chains")
            );
            self.emit(Phase::Complete, board, Vec::new(), description);
            return Stage::Finished;
        }

        if self.chain >= self.max_chains {
            log::warn!(
                "Stopping after {} chains with {} groups still on the board",
                self.chain,
                groups.len()
            );
            self.truncated = true;
            return Stage::Finished;
        }

        self.chain += 1;
        Stage::Mark(groups)
    }

    fn emit(&mut self, phase: Phase, board: Board, groups: Vec<MatchGroup>, description: String) {
        log::trace!("step {}: {} (chain {})", self.steps.len(), phase, self.chain);
        self.steps.push(Step {
            board,
            groups,
            phase,
            description,
            chain: self.chain,
        });
    }
}

fn current(steps: &[Step]) -> &Board {
    &steps.last().expect("initial step is emitted first").board
}

fn plural(count: usize, one: &'static str, many: &'static str) -> &'static str {
    if count == 1 { one } else { many }
}

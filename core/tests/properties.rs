use std::collections::HashSet;

use cascade_core::{
    Axis, Board, BoardGenerator, Candy, CascadeConfig, ChainDemoGenerator, MIN_RUN, Phase,
    RngSource, StableBoardGenerator, find_matches, resolve,
};
use proptest::prelude::*;

fn arb_board() -> impl Strategy<Value = Board> {
    (1u8..=10).prop_flat_map(|size| {
        let cells = usize::from(size) * usize::from(size);
        proptest::collection::vec(proptest::option::of(0..Candy::COUNT), cells).prop_map(
            move |cells| {
                Board::from_fn(size, |(row, col)| {
                    cells[usize::from(row) * usize::from(size) + usize::from(col)]
                        .map(Candy::from_index)
                })
                .unwrap()
            },
        )
    })
}

fn assert_unique_ids(board: &Board) {
    let mut seen = HashSet::new();
    for (coords, cell) in board.iter() {
        if let Some(id) = cell.id() {
            assert!(seen.insert(id), "duplicate id {id} at {coords:?}");
        }
    }
}

proptest! {
    #[test]
    fn generated_boards_never_start_with_matches(seed in any::<u64>(), size in 1u8..=16) {
        let mut source = RngSource::seeded(seed);
        let board = StableBoardGenerator.generate(size, &mut source).unwrap();

        prop_assert!(find_matches(&board).is_empty());
        prop_assert_eq!(board.empty_count(), 0);
    }

    #[test]
    fn gravity_keeps_every_column_in_order(board in arb_board()) {
        let fallen = board.with_gravity();

        for col in 0..board.size() {
            // same candies, same relative order
            prop_assert_eq!(fallen.column_candies(col), board.column_candies(col));

            let ids = |board: &Board| -> Vec<_> {
                (0..board.size()).filter_map(|row| board.cell_at((row, col)).id()).collect()
            };
            prop_assert_eq!(ids(&fallen), ids(&board));

            // no hole below a candy
            let first_candy = (0..fallen.size())
                .find(|&row| !fallen.cell_at((row, col)).is_empty())
                .unwrap_or(fallen.size());
            for row in first_candy..fallen.size() {
                prop_assert!(!fallen.cell_at((row, col)).is_empty());
            }
        }
    }

    #[test]
    fn detected_groups_are_straight_runs(board in arb_board()) {
        for group in find_matches(&board) {
            prop_assert!(group.len() >= usize::from(MIN_RUN));
            for &coords in group.cells() {
                prop_assert_eq!(board.candy_at(coords), Some(group.candy()));
            }
            let lines: HashSet<_> = group
                .cells()
                .iter()
                .map(|&(row, col)| match group.axis() {
                    Axis::Horizontal => row,
                    Axis::Vertical => col,
                })
                .collect();
            prop_assert_eq!(lines.len(), 1);
        }
    }

    #[test]
    fn resolution_settles_and_follows_the_phase_cycle(
        seed in any::<u64>(),
        size in 7u8..=10,
        demo in any::<bool>()
    ) {
        let mut source = RngSource::seeded(seed);
        let board = if demo {
            ChainDemoGenerator.generate(size, &mut source).unwrap()
        } else {
            StableBoardGenerator.generate(size, &mut source).unwrap()
        };

        let resolution = resolve(&board, &CascadeConfig::default(), &mut source);
        prop_assume!(!resolution.is_truncated());

        let steps = resolution.steps();
        prop_assert_eq!(steps[0].phase(), Phase::Initial);
        prop_assert_eq!(steps[0].board(), &board);

        let last = steps.last().unwrap();
        prop_assert_eq!(last.phase(), Phase::Complete);
        prop_assert_eq!(last.chain(), resolution.chains());
        prop_assert!(find_matches(last.board()).is_empty());

        let cycle = [Phase::Matched, Phase::Removed, Phase::Falling, Phase::Filled];
        let middle = &steps[1..steps.len() - 1];
        prop_assert_eq!(middle.len(), cycle.len() * resolution.chains() as usize);
        for (index, step) in middle.iter().enumerate() {
            prop_assert_eq!(step.phase(), cycle[index % cycle.len()]);
            prop_assert_eq!(step.chain() as usize, index / cycle.len() + 1);
        }

        for step in steps {
            assert_unique_ids(step.board());
        }
    }

    #[test]
    fn gravity_phase_only_reorders(seed in any::<u64>()) {
        let mut source = RngSource::seeded(seed);
        let board = ChainDemoGenerator.generate(8, &mut source).unwrap();
        let resolution = resolve(&board, &CascadeConfig::default(), &mut source);

        for pair in resolution.steps().windows(2) {
            let [removed, falling] = pair else { unreachable!() };
            if falling.phase() != Phase::Falling {
                continue;
            }
            prop_assert_eq!(removed.phase(), Phase::Removed);
            for col in 0..8 {
                prop_assert_eq!(
                    falling.board().column_candies(col),
                    removed.board().column_candies(col)
                );
            }
        }
    }
}

//! Tests for green observation accumulation

extern crate std;

use crate::raster::accumulate::Accumulator;
use crate::raster::mask::GreenMask;
use crate::raster::tests::test_utils::mask_with_green;

const EDGE: u32 = 4;

fn sample_masks() -> Vec<GreenMask> {
    vec![
        mask_with_green(EDGE, EDGE, &[(0, 0), (1, 1)]),
        mask_with_green(EDGE, EDGE, &[(0, 0), (2, 2)]),
        mask_with_green(EDGE, EDGE, &[(0, 0), (1, 1), (3, 3)]),
    ]
}

fn accumulate_in_order(masks: &[GreenMask], order: &[usize]) -> Accumulator {
    let mut accumulator = Accumulator::new();
    for &index in order {
        accumulator.accumulate(&masks[index]).unwrap();
    }
    accumulator
}

#[test]
fn test_first_mask_initializes_counts() {
    let mut accumulator = Accumulator::new();
    std::assert!(accumulator.counts().is_none());
    std::assert_eq!(accumulator.accepted_count(), 0);

    accumulator
        .accumulate(&mask_with_green(EDGE, EDGE, &[(1, 2)]))
        .unwrap();

    let grid = accumulator.counts().unwrap();
    std::assert_eq!(grid.width(), EDGE);
    std::assert_eq!(grid.height(), EDGE);
    std::assert_eq!(grid.count_at(1, 2), 1);
    std::assert_eq!(grid.count_at(2, 1), 0);
    std::assert_eq!(accumulator.accepted_count(), 1);
}

#[test]
fn test_counts_add_elementwise() {
    let masks = sample_masks();
    let accumulator = accumulate_in_order(&masks, &[0, 1, 2]);

    let grid = accumulator.counts().unwrap();
    std::assert_eq!(grid.count_at(0, 0), 3);
    std::assert_eq!(grid.count_at(1, 1), 2);
    std::assert_eq!(grid.count_at(2, 2), 1);
    std::assert_eq!(grid.count_at(3, 3), 1);
    std::assert_eq!(grid.count_at(0, 3), 0);
    std::assert_eq!(accumulator.accepted_count(), 3);
}

#[test]
fn test_every_count_is_bounded_by_the_tile_count() {
    let masks = sample_masks();
    let accumulator = accumulate_in_order(&masks, &[0, 1, 2]);
    let grid = accumulator.counts().unwrap();

    for y in 0..EDGE {
        for x in 0..EDGE {
            std::assert!(grid.count_at(x, y) <= accumulator.accepted_count());
        }
    }
}

#[test]
fn test_accumulation_is_order_independent() {
    let masks = sample_masks();
    let reference = accumulate_in_order(&masks, &[0, 1, 2]);

    for order in [[0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]] {
        let permuted = accumulate_in_order(&masks, &order);
        std::assert_eq!(permuted.accepted_count(), reference.accepted_count());

        let reference_grid = reference.counts().unwrap();
        let permuted_grid = permuted.counts().unwrap();
        for y in 0..EDGE {
            for x in 0..EDGE {
                std::assert_eq!(
                    permuted_grid.count_at(x, y),
                    reference_grid.count_at(x, y)
                );
            }
        }
    }
}

#[test]
fn test_partial_accumulators_merge_into_the_sequential_result() {
    let masks = sample_masks();
    let sequential = accumulate_in_order(&masks, &[0, 1, 2]);

    let mut left = accumulate_in_order(&masks, &[0]);
    let right = accumulate_in_order(&masks, &[1, 2]);
    left.merge(right).unwrap();

    std::assert_eq!(left.accepted_count(), sequential.accepted_count());
    let sequential_grid = sequential.counts().unwrap();
    let merged_grid = left.counts().unwrap();
    for y in 0..EDGE {
        for x in 0..EDGE {
            std::assert_eq!(merged_grid.count_at(x, y), sequential_grid.count_at(x, y));
        }
    }
}

#[test]
fn test_merging_an_empty_accumulator_changes_nothing() {
    let masks = sample_masks();
    let mut accumulator = accumulate_in_order(&masks, &[0, 1]);
    accumulator.merge(Accumulator::new()).unwrap();

    std::assert_eq!(accumulator.accepted_count(), 2);
    std::assert_eq!(accumulator.counts().unwrap().count_at(0, 0), 2);

    let mut empty = Accumulator::new();
    empty.merge(accumulate_in_order(&masks, &[0])).unwrap();
    std::assert_eq!(empty.accepted_count(), 1);
    std::assert_eq!(empty.counts().unwrap().count_at(0, 0), 1);
}

#[test]
fn test_divergent_dimensions_are_fatal() {
    let mut accumulator = Accumulator::new();
    accumulator
        .accumulate(&mask_with_green(EDGE, EDGE, &[(0, 0)]))
        .unwrap();

    // Same height, different width: the gate upstream never checks width,
    // so this is caught here instead of being silently misaligned
    let narrow = mask_with_green(EDGE - 1, EDGE, &[(0, 0)]);
    std::assert!(accumulator.accumulate(&narrow).is_err());

    // The failed fold must not count as accepted
    std::assert_eq!(accumulator.accepted_count(), 1);
}

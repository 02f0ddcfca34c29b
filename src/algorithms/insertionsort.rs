//! Shift based insertion sort

use super::{Complexity, ComplexityProfile};
use crate::instrument::{Observer, Step, Tracked};

/// The insertion [`super::Sort`]
///
/// Larger predecessors are shifted right one overwrite at a time, then the key is placed with a
/// final overwrite, so each outer iteration ends with exactly one placement.
pub struct InsertionSort;

impl super::Sort for InsertionSort {
    const IS_STABLE: bool = true;
    const COMPLEXITY: ComplexityProfile = ComplexityProfile::new(
        Complexity::Linear,
        Complexity::Quadratic,
        Complexity::Quadratic,
    );

    fn sort<O: Observer + ?Sized>(values: &mut Tracked<'_, O>) -> Step {
        if values.len() < 2 {
            return Ok(());
        }

        insertion_sort_with_partition(values, 1)
    }
}

/// Sort values using insertion sort, assuming that `values[0..partition_point]` is already in
/// order
fn insertion_sort_with_partition<O: Observer + ?Sized>(
    values: &mut Tracked<'_, O>,
    partition_point: usize,
) -> Step {
    assert!(
        (0..values.len()).contains(&partition_point),
        "Partition point needs to be in bounds"
    );

    for i in partition_point..values.len() {
        let key = values.get(i);
        let mut hole = i;

        // Only strictly greater elements move, which keeps the sort stable
        while hole > 0 && values.compare_key(hole - 1, key, hole)?.is_gt() {
            let shifted = values.get(hole - 1);
            values.overwrite(hole, shifted)?;
            hole -= 1;
        }

        values.overwrite(hole, key)?;
    }

    Ok(())
}

//! Quicksort with a Lomuto partition

use super::{Complexity, ComplexityProfile};
use crate::instrument::{Observer, Step, Tracked};

/// The quicksort [`super::Sort`], always pivoting on the last element of the range
pub struct QuickSort;

impl super::Sort for QuickSort {
    const IS_STABLE: bool = false;
    const COMPLEXITY: ComplexityProfile = ComplexityProfile::new(
        Complexity::Linearithmic,
        Complexity::Linearithmic,
        Complexity::Quadratic,
    );

    fn sort<O: Observer + ?Sized>(values: &mut Tracked<'_, O>) -> Step {
        if values.len() < 2 {
            return Ok(());
        }

        let high = values.len() - 1;
        quicksort(values, 0, high)
    }
}

/// Quicksort the inclusive range `low..=high`
fn quicksort<O: Observer + ?Sized>(values: &mut Tracked<'_, O>, low: usize, high: usize) -> Step {
    if low < high {
        let pivot = partition(values, low, high)?;

        // Recurse into both partitions, the pivot is in its final place
        if pivot > low {
            quicksort(values, low, pivot - 1)?;
        }
        quicksort(values, pivot + 1, high)?;
    }

    Ok(())
}

/// Partition `low..=high` around `values[high]`, returning the final pivot index
fn partition<O: Observer + ?Sized>(
    values: &mut Tracked<'_, O>,
    low: usize,
    high: usize,
) -> Step<usize> {
    // Everything left of `store` is smaller than the pivot
    let mut store = low;
    for j in low..high {
        if values.compare(j, high)?.is_lt() {
            values.swap(store, j)?;
            store += 1;
        }
    }

    // Swap the pivot into place
    values.swap(store, high)?;

    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        instrument::EventKind,
        test::{DEFAULT_RUNS, DEFAULT_TEST_SIZE},
    };

    #[test]
    fn trivial() {
        crate::test::test_trivial::<QuickSort>();
    }

    #[test]
    fn random() {
        crate::test::test_random_sorted::<DEFAULT_RUNS, DEFAULT_TEST_SIZE, QuickSort>();
    }

    #[test]
    fn counters_match_events() {
        crate::test::test_counters_match_events::<QuickSort>();
    }

    #[test]
    fn cancelled() {
        crate::test::test_cancelled_midway::<QuickSort>();
    }

    #[test]
    fn first_partition_pivots_on_last_element() {
        let mut values = vec![5, 3, 8, 1];
        let (_, recorder) = crate::test::record::<QuickSort>(&mut values);

        assert_eq!(values, vec![1, 3, 5, 8]);

        let first = &recorder.steps[0];
        assert_eq!(first.kind, EventKind::Compare(0, 3));
        assert_eq!(first.values[3], 1);
        // Nothing is smaller than 1, so the pivot moves straight to the front
        assert_eq!(
            recorder.kinds()[..4],
            [
                EventKind::Compare(0, 3),
                EventKind::Compare(1, 3),
                EventKind::Compare(2, 3),
                EventKind::Swap(0, 3),
            ]
        );
        assert_eq!(recorder.steps[3].values, vec![1, 3, 8, 5]);
    }

    #[test]
    fn sorted_input_is_quadratic() {
        let n = 32usize;
        let mut values: Vec<i64> = (0..n as i64).collect();
        let (counters, _) = crate::test::record::<QuickSort>(&mut values);

        assert_eq!(counters.comparisons, (n * (n - 1) / 2) as u64);
    }
}

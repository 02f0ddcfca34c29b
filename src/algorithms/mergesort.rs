//! The top down mergesort implementation

use super::{Complexity, ComplexityProfile};
use crate::instrument::{Observer, Step, Tracked};

/// The Top-Down Mergesort [`super::Sort`]
///
/// Merged runs are collected in an auxiliary buffer and then copied back, one overwrite per
/// element written into the array.
pub struct MergeSort;

impl super::Sort for MergeSort {
    const IS_STABLE: bool = true;
    const COMPLEXITY: ComplexityProfile = ComplexityProfile::new(
        Complexity::Linearithmic,
        Complexity::Linearithmic,
        Complexity::Linearithmic,
    );

    fn sort<O: Observer + ?Sized>(values: &mut Tracked<'_, O>) -> Step {
        if values.len() < 2 {
            return Ok(());
        }

        // Conservatively initiate a buffer big enough to merge the complete array
        let mut buffer = Vec::with_capacity(values.len());

        // Delegate to helper function
        let high = values.len() - 1;
        top_down_mergesort(values, 0, high, &mut buffer)
    }
}

/// Sort the inclusive range `low..=high`
fn top_down_mergesort<O: Observer + ?Sized>(
    values: &mut Tracked<'_, O>,
    low: usize,
    high: usize,
    buffer: &mut Vec<i64>,
) -> Step {
    if low < high {
        let middle = low + (high - low) / 2;

        top_down_mergesort(values, low, middle, buffer)?;
        top_down_mergesort(values, middle + 1, high, buffer)?;
        merge(values, low, middle, high, buffer)?;
    }

    Ok(())
}

/// Merge the sorted runs `low..=middle` and `middle + 1..=high`
fn merge<O: Observer + ?Sized>(
    values: &mut Tracked<'_, O>,
    low: usize,
    middle: usize,
    high: usize,
    buffer: &mut Vec<i64>,
) -> Step {
    buffer.clear();

    let mut left = low;
    let mut right = middle + 1;
    while left <= middle && right <= high {
        // The left head wins ties
        if values.compare(left, right)?.is_le() {
            buffer.push(values.get(left));
            left += 1;
        } else {
            buffer.push(values.get(right));
            right += 1;
        }
    }

    // At most one of the runs has elements left
    buffer.extend_from_slice(&values.as_slice()[left..=middle]);
    buffer.extend_from_slice(&values.as_slice()[right..=high]);

    for (offset, &value) in buffer.iter().enumerate() {
        values.overwrite(low + offset, value)?;
    }

    Ok(())
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
        crate::test::test_trivial::<MergeSort>();
    }

    #[test]
    fn random() {
        crate::test::test_random_sorted::<DEFAULT_RUNS, DEFAULT_TEST_SIZE, MergeSort>();
    }

    #[test]
    fn counters_match_events() {
        crate::test::test_counters_match_events::<MergeSort>();
    }

    #[test]
    fn cancelled() {
        crate::test::test_cancelled_midway::<MergeSort>();
    }

    #[test]
    fn splits_at_lower_midpoint() {
        let mut values = vec![2, 1, 3];
        let (counters, recorder) = crate::test::record::<MergeSort>(&mut values);

        assert_eq!(values, vec![1, 2, 3]);
        assert_eq!(counters.swaps, 0);
        // [2, 1] is merged first, then with [3]
        assert_eq!(
            recorder.kinds(),
            vec![
                EventKind::Compare(0, 1),
                EventKind::Overwrite(0),
                EventKind::Overwrite(1),
                EventKind::Compare(0, 2),
                EventKind::Compare(1, 2),
                EventKind::Overwrite(0),
                EventKind::Overwrite(1),
                EventKind::Overwrite(2),
            ]
        );
    }

    #[test]
    fn every_level_copies_back_all_elements() {
        let mut values: Vec<i64> = (0..16).rev().collect();
        let (counters, _) = crate::test::record::<MergeSort>(&mut values);

        // Four levels of merging over sixteen elements
        assert_eq!(counters.overwrites, 4 * 16);
        assert!(values.is_sorted());
    }
}

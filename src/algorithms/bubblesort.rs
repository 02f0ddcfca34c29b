//! Bubble sort

use super::{Complexity, ComplexityProfile};
use crate::instrument::{Observer, Step, Tracked};

/// The bubble [`super::Sort`]
///
/// Stops after the first pass without any swap, so already sorted input takes a single pass.
pub struct BubbleSort;

impl super::Sort for BubbleSort {
    const IS_STABLE: bool = true;
    const COMPLEXITY: ComplexityProfile = ComplexityProfile::new(
        Complexity::Linear,
        Complexity::Quadratic,
        Complexity::Quadratic,
    );

    fn sort<O: Observer + ?Sized>(values: &mut Tracked<'_, O>) -> Step {
        let len = values.len();

        for pass in 0..len.saturating_sub(1) {
            let mut swapped = false;

            // The last `pass` elements are already in place
            for j in 0..len - pass - 1 {
                if values.compare(j, j + 1)?.is_gt() {
                    values.swap(j, j + 1)?;
                    swapped = true;
                }
            }

            if !swapped {
                break;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{DEFAULT_RUNS, DEFAULT_TEST_SIZE};

    #[test]
    fn trivial() {
        crate::test::test_trivial::<BubbleSort>();
    }

    #[test]
    fn random() {
        crate::test::test_random_sorted::<DEFAULT_RUNS, DEFAULT_TEST_SIZE, BubbleSort>();
    }

    #[test]
    fn counters_match_events() {
        crate::test::test_counters_match_events::<BubbleSort>();
    }

    #[test]
    fn cancelled() {
        crate::test::test_cancelled_midway::<BubbleSort>();
    }

    #[test]
    fn descending_compares_every_pair() {
        for n in [2usize, 5, 17, 64] {
            let mut values: Vec<i64> = (0..n as i64).rev().collect();
            let (counters, _) = crate::test::record::<BubbleSort>(&mut values);

            let pairs = (n * (n - 1) / 2) as u64;
            assert_eq!(counters.comparisons, pairs);
            assert_eq!(counters.swaps, pairs);
            assert!(values.is_sorted());
        }
    }

    #[test]
    fn sorted_input_takes_one_pass() {
        let mut values: Vec<i64> = (0..10).collect();
        let (counters, _) = crate::test::record::<BubbleSort>(&mut values);

        assert_eq!(counters.comparisons, 9);
        assert_eq!(counters.swaps, 0);
    }
}

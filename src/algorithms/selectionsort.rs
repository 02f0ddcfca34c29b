//! Selection sort

use super::{Complexity, ComplexityProfile};
use crate::instrument::{Observer, Step, Tracked};

/// The selection [`super::Sort`]
///
/// Every outer iteration ends with exactly one swap, even when the minimum already sits at its
/// position and the swap exchanges an element with itself.
pub struct SelectionSort;

impl super::Sort for SelectionSort {
    const IS_STABLE: bool = false;
    const COMPLEXITY: ComplexityProfile = ComplexityProfile::new(
        Complexity::Quadratic,
        Complexity::Quadratic,
        Complexity::Quadratic,
    );

    fn sort<O: Observer + ?Sized>(values: &mut Tracked<'_, O>) -> Step {
        let len = values.len();

        for i in 0..len.saturating_sub(1) {
            let mut minimum = i;
            for j in i + 1..len {
                if values.compare(j, minimum)?.is_lt() {
                    minimum = j;
                }
            }

            values.swap(i, minimum)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::seq::SliceRandom as _;

    use super::*;
    use crate::{
        instrument::EventKind,
        test::{DEFAULT_RUNS, DEFAULT_TEST_SIZE},
    };

    #[test]
    fn trivial() {
        crate::test::test_trivial::<SelectionSort>();
    }

    #[test]
    fn random() {
        crate::test::test_random_sorted::<DEFAULT_RUNS, DEFAULT_TEST_SIZE, SelectionSort>();
    }

    #[test]
    fn counters_match_events() {
        crate::test::test_counters_match_events::<SelectionSort>();
    }

    #[test]
    fn cancelled() {
        crate::test::test_cancelled_midway::<SelectionSort>();
    }

    #[test]
    fn fixed_swap_and_comparison_counts() {
        let mut rng = crate::test::test_rng();

        for n in [2usize, 3, 10, 41] {
            let mut values: Vec<i64> = (0..n as i64).collect();
            values.shuffle(&mut rng);
            let (counters, _) = crate::test::record::<SelectionSort>(&mut values);

            assert_eq!(counters.swaps, n as u64 - 1);
            assert_eq!(counters.comparisons, (n * (n - 1) / 2) as u64);
        }
    }

    #[test]
    fn sorted_input_still_swaps_with_itself() {
        let mut values = vec![1, 2, 3, 4];
        let (counters, recorder) = crate::test::record::<SelectionSort>(&mut values);

        assert_eq!(counters.swaps, 3);
        assert_eq!(
            recorder.count(|kind| matches!(kind, EventKind::Swap(first, second) if first == second)),
            3
        );
    }
}

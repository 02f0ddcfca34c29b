//! The instrumented sorting algorithms

use crate::instrument::{Counters, Observer, Step, Tracked, Unobserved};

pub mod bubblesort;
pub mod heapsort;
pub mod insertionsort;
pub mod mergesort;
pub mod quicksort;
pub mod selectionsort;

/// A sorting algorithm working on [`Tracked`] values
pub trait Sort {
    /// Whether the sort is stable
    const IS_STABLE: bool;
    /// The asymptotic number of steps of the sort
    const COMPLEXITY: ComplexityProfile;

    /// Sort `values` ascending, every comparison and movement going through the instrumentation
    fn sort<O: Observer + ?Sized>(values: &mut Tracked<'_, O>) -> Step;
}

/// An asymptotic complexity class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Complexity {
    Linear,
    Linearithmic,
    Quadratic,
}

impl std::fmt::Display for Complexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Complexity::Linear => "O(n)",
            Complexity::Linearithmic => "O(n log n)",
            Complexity::Quadratic => "O(n²)",
        })
    }
}

/// Best, average and worst case complexity of an algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComplexityProfile {
    pub best: Complexity,
    pub average: Complexity,
    pub worst: Complexity,
}

impl ComplexityProfile {
    pub const fn new(best: Complexity, average: Complexity, worst: Complexity) -> Self {
        Self {
            best,
            average,
            worst,
        }
    }
}

impl std::fmt::Display for ComplexityProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Best: {} | Avg: {} | Worst: {}",
            self.best, self.average, self.worst
        )
    }
}

/// The different sorting algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Algorithm {
    /// Bubble sort
    Bubble,
    /// Selection sort
    Selection,
    /// Insertion sort
    Insertion,
    /// Top down merge sort
    Merge,
    /// Quicksort with last element pivot
    Quick,
    /// Heapsort
    Heap,
}

impl Algorithm {
    /// Every available algorithm
    pub const ALL: [Algorithm; 6] = [
        Algorithm::Bubble,
        Algorithm::Selection,
        Algorithm::Insertion,
        Algorithm::Merge,
        Algorithm::Quick,
        Algorithm::Heap,
    ];

    /// The lowercase name, as accepted by [`std::str::FromStr`]
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Bubble => "bubble",
            Algorithm::Selection => "selection",
            Algorithm::Insertion => "insertion",
            Algorithm::Merge => "merge",
            Algorithm::Quick => "quick",
            Algorithm::Heap => "heap",
        }
    }

    /// Sort `values` with this algorithm
    pub fn sort<O: Observer + ?Sized>(self, values: &mut Tracked<'_, O>) -> Step {
        match self {
            Algorithm::Bubble => bubblesort::BubbleSort::sort(values),
            Algorithm::Selection => selectionsort::SelectionSort::sort(values),
            Algorithm::Insertion => insertionsort::InsertionSort::sort(values),
            Algorithm::Merge => mergesort::MergeSort::sort(values),
            Algorithm::Quick => quicksort::QuickSort::sort(values),
            Algorithm::Heap => heapsort::HeapSort::sort(values),
        }
    }

    /// Return whether the sort is stable
    pub fn is_stable(self) -> bool {
        match self {
            Algorithm::Bubble => bubblesort::BubbleSort::IS_STABLE,
            Algorithm::Selection => selectionsort::SelectionSort::IS_STABLE,
            Algorithm::Insertion => insertionsort::InsertionSort::IS_STABLE,
            Algorithm::Merge => mergesort::MergeSort::IS_STABLE,
            Algorithm::Quick => quicksort::QuickSort::IS_STABLE,
            Algorithm::Heap => heapsort::HeapSort::IS_STABLE,
        }
    }

    /// The fixed complexity metadata of the sort
    pub fn complexity(self) -> ComplexityProfile {
        match self {
            Algorithm::Bubble => bubblesort::BubbleSort::COMPLEXITY,
            Algorithm::Selection => selectionsort::SelectionSort::COMPLEXITY,
            Algorithm::Insertion => insertionsort::InsertionSort::COMPLEXITY,
            Algorithm::Merge => mergesort::MergeSort::COMPLEXITY,
            Algorithm::Quick => quicksort::QuickSort::COMPLEXITY,
            Algorithm::Heap => heapsort::HeapSort::COMPLEXITY,
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Algorithm {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|algorithm| algorithm.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| crate::Error::InvalidInput(format!("unknown algorithm `{s}`")))
    }
}

/// Sort `values` without pacing or observers, returning the final counters
pub fn run_headless(algorithm: Algorithm, values: &mut [i64]) -> Counters {
    let mut counters = Counters::default();
    // Unobserved runs cannot be cancelled
    let _ = algorithm.sort(&mut Tracked::new(values, &mut counters, &mut Unobserved));

    counters
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn names_round_trip() {
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.name().parse::<Algorithm>().ok(), Some(algorithm));
        }
        assert_eq!("Quick".parse::<Algorithm>().ok(), Some(Algorithm::Quick));
        assert!(matches!(
            "bogo".parse::<Algorithm>(),
            Err(crate::Error::InvalidInput(_))
        ));
    }

    #[test]
    fn profile_display() {
        assert_eq!(
            Algorithm::Bubble.complexity().to_string(),
            "Best: O(n) | Avg: O(n²) | Worst: O(n²)"
        );
        assert_eq!(
            Algorithm::Quick.complexity().to_string(),
            "Best: O(n log n) | Avg: O(n log n) | Worst: O(n²)"
        );
    }

    #[test]
    fn stability() {
        let stable: Vec<_> = Algorithm::ALL
            .into_iter()
            .filter(|algorithm| algorithm.is_stable())
            .collect();
        assert_eq!(
            stable,
            vec![Algorithm::Bubble, Algorithm::Insertion, Algorithm::Merge]
        );
    }

    #[test]
    fn headless_counts_match_instrumented_run() {
        let original = vec![9, -4, 7, 7, 0, 3, -12, 5];
        for algorithm in Algorithm::ALL {
            let mut headless = original.clone();
            let counters = run_headless(algorithm, &mut headless);

            let mut recorded = original.clone();
            let mut recorded_counters = Counters::default();
            let mut recorder = crate::test::Recorder::default();
            algorithm
                .sort(&mut Tracked::new(
                    &mut recorded,
                    &mut recorded_counters,
                    &mut recorder,
                ))
                .unwrap();

            assert_eq!(headless, recorded);
            assert_eq!(counters, recorded_counters, "{algorithm} counters differ");
        }
    }

    proptest! {
        #[test]
        fn every_algorithm_sorts_any_sequence(values in proptest::collection::vec(any::<i64>(), 0..48)) {
            let mut expected = values.clone();
            expected.sort_unstable();

            for algorithm in Algorithm::ALL {
                let mut sorted = values.clone();
                run_headless(algorithm, &mut sorted);
                prop_assert_eq!(&sorted, &expected, "{} failed", algorithm);
            }
        }

        #[test]
        fn every_algorithm_sorts_duplicates(values in proptest::collection::vec(-3i64..3, 0..48)) {
            let mut expected = values.clone();
            expected.sort_unstable();

            for algorithm in Algorithm::ALL {
                let mut sorted = values.clone();
                run_headless(algorithm, &mut sorted);
                prop_assert_eq!(&sorted, &expected, "{} failed", algorithm);
            }
        }
    }
}

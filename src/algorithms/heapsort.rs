//! Heapsort on an implicit max-heap

use super::{Complexity, ComplexityProfile};
use crate::instrument::{Observer, Step, Tracked};

/// The heapsort [`super::Sort`]
pub struct HeapSort;

impl super::Sort for HeapSort {
    const IS_STABLE: bool = false;
    const COMPLEXITY: ComplexityProfile = ComplexityProfile::new(
        Complexity::Linearithmic,
        Complexity::Linearithmic,
        Complexity::Linearithmic,
    );

    fn sort<O: Observer + ?Sized>(values: &mut Tracked<'_, O>) -> Step {
        let len = values.len();
        if len < 2 {
            return Ok(());
        }

        // Build the heap bottom up, leaves are trivially heaps
        for root in (0..len / 2).rev() {
            sift_down(values, root, len)?;
        }

        // Move the maximum behind the heap and restore the heap property
        for end in (1..len).rev() {
            values.swap(0, end)?;
            sift_down(values, 0, end)?;
        }

        Ok(())
    }
}

/// Sift `values[root]` down into the heap `values[..end]`
fn sift_down<O: Observer + ?Sized>(
    values: &mut Tracked<'_, O>,
    mut root: usize,
    end: usize,
) -> Step {
    loop {
        let left = 2 * root + 1;
        if left >= end {
            return Ok(());
        }

        let mut largest = root;
        if values.compare(left, largest)?.is_gt() {
            largest = left;
        }
        let right = left + 1;
        if right < end && values.compare(right, largest)?.is_gt() {
            largest = right;
        }

        if largest == root {
            return Ok(());
        }

        values.swap(root, largest)?;
        root = largest;
    }
}

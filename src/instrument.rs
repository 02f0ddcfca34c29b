//! Instrumented access to the array being sorted
//!
//! Algorithms never touch the values directly, they go through [`Tracked`], which counts every
//! comparison and movement and hands a description of the step to an [`Observer`].

use std::{cmp::Ordering, sync::Arc};

use crate::engine::RunStatus;

/// Tally of the steps performed during the current run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Counters {
    /// Element to element ordering checks
    pub comparisons: u64,
    /// Exchanges of two elements
    pub swaps: u64,
    /// Single element writes, e.g. insertion shifts or merge copy-backs
    pub overwrites: u64,
}

/// What happened in a single step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// The elements at both indices were compared
    Compare(usize, usize),
    /// The elements at both indices were exchanged
    Swap(usize, usize),
    /// A value was written to the index
    Overwrite(usize),
    /// Both indices were exchanged as part of a shuffle
    ShuffleStep(usize, usize),
    /// The run ended with the given status
    RunComplete(RunStatus),
}

impl EventKind {
    /// The indices touched by this step, if any
    pub fn indices(&self) -> (Option<usize>, Option<usize>) {
        match *self {
            EventKind::Compare(first, second)
            | EventKind::Swap(first, second)
            | EventKind::ShuffleStep(first, second) => (Some(first), Some(second)),
            EventKind::Overwrite(index) => (Some(index), None),
            EventKind::RunComplete(_) => (None, None),
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventKind::Compare(first, second) => write!(f, "compare {first} {second}"),
            EventKind::Swap(first, second) => write!(f, "swap {first} {second}"),
            EventKind::Overwrite(index) => write!(f, "overwrite {index}"),
            EventKind::ShuffleStep(first, second) => write!(f, "shuffle-step {first} {second}"),
            EventKind::RunComplete(status) => write!(f, "run-complete ({status})"),
        }
    }
}

/// An immutable record of one instrumented step
///
/// Carries its own copy of the values, so a consumer can render it at any later point without
/// ever looking at the array the worker is mutating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationEvent {
    /// The run this event belongs to
    pub run: u64,
    /// Position of this event within its run, starting at zero
    pub step: u64,
    /// The kind of step
    pub kind: EventKind,
    /// The counters right after the step
    pub counters: Counters,
    /// The values right after the step
    pub values: Arc<[i64]>,
}

/// Signals that the current run was cancelled, unwinds the algorithm through `?`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

/// The result of one instrumented step
pub type Step<T = ()> = Result<T, Cancelled>;

/// Receives every instrumented step of a run
pub trait Observer {
    /// Called before a step is performed, returning `Err` prevents the step
    fn checkpoint(&mut self) -> Step {
        Ok(())
    }

    /// Called after a step was performed with the resulting values and counters
    fn observe(&mut self, kind: EventKind, values: &[i64], counters: Counters) -> Step;
}

/// An [`Observer`] ignoring every step, used for headless runs
#[derive(Debug, Default, Clone, Copy)]
pub struct Unobserved;

impl Observer for Unobserved {
    fn observe(&mut self, _kind: EventKind, _values: &[i64], _counters: Counters) -> Step {
        Ok(())
    }
}

/// The instrumented view of the values handed to the sorting algorithms
pub struct Tracked<'a, O: Observer + ?Sized> {
    values: &'a mut [i64],
    counters: &'a mut Counters,
    observer: &'a mut O,
}

impl<'a, O: Observer + ?Sized> Tracked<'a, O> {
    pub fn new(values: &'a mut [i64], counters: &'a mut Counters, observer: &'a mut O) -> Self {
        Self {
            values,
            counters,
            observer,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Read the value at `index`, reads are not instrumented
    pub fn get(&self, index: usize) -> i64 {
        self.values[index]
    }

    /// Read only access to all values
    pub fn as_slice(&self) -> &[i64] {
        self.values
    }

    /// Compare the values at `first` and `second`
    pub fn compare(&mut self, first: usize, second: usize) -> Step<Ordering> {
        self.observer.checkpoint()?;
        let ordering = self.values[first].cmp(&self.values[second]);
        self.counters.comparisons += 1;
        self.emit(EventKind::Compare(first, second))?;

        Ok(ordering)
    }

    /// Compare the value at `index` to a `key` held outside the array, `slot` being the index the
    /// key conceptually occupies
    pub fn compare_key(&mut self, index: usize, key: i64, slot: usize) -> Step<Ordering> {
        self.observer.checkpoint()?;
        let ordering = self.values[index].cmp(&key);
        self.counters.comparisons += 1;
        self.emit(EventKind::Compare(index, slot))?;

        Ok(ordering)
    }

    /// Exchange the values at `first` and `second`, swapping an index with itself counts too
    pub fn swap(&mut self, first: usize, second: usize) -> Step {
        self.observer.checkpoint()?;
        self.values.swap(first, second);
        self.counters.swaps += 1;
        self.emit(EventKind::Swap(first, second))
    }

    /// Write `value` to `index`
    pub fn overwrite(&mut self, index: usize, value: i64) -> Step {
        self.observer.checkpoint()?;
        self.values[index] = value;
        self.counters.overwrites += 1;
        self.emit(EventKind::Overwrite(index))
    }

    /// Exchange the values at `first` and `second` as part of a shuffle, counted as a swap
    pub fn shuffle_swap(&mut self, first: usize, second: usize) -> Step {
        self.observer.checkpoint()?;
        self.values.swap(first, second);
        self.counters.swaps += 1;
        self.emit(EventKind::ShuffleStep(first, second))
    }

    fn emit(&mut self, kind: EventKind) -> Step {
        self.observer.observe(kind, self.values, *self.counters)
    }
}

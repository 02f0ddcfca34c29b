//! Step by step execution of classic comparison sorts for animation
//!
//! A [`SortEngine`] runs one [`Algorithm`] at a time on a worker thread. Every comparison, swap
//! and overwrite is counted and published as an immutable [`MutationEvent`], followed by a pause
//! whose length is controlled at runtime through the [`PacingController`].

pub mod algorithms;
pub mod data;
pub mod engine;
mod error;
pub mod instrument;
pub mod lifecycle;
pub mod pacing;


pub use algorithms::{Algorithm, ComplexityProfile};
pub use engine::{RunHandle, RunStatus, Snapshot, SortEngine, Subscription};
pub use error::{Error, Result};
pub use instrument::{Counters, EventKind, MutationEvent};
pub use pacing::PacingController;

//! Step pacing and cooperative cancellation

use std::{
    sync::{
        Arc, Condvar, Mutex, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

/// The delay used when nothing else was configured
pub const DEFAULT_DELAY: Duration = Duration::from_millis(50);

/// Shared, runtime adjustable delay per emitted step
///
/// Clones share the same delay, so a front end can keep a handle and change the speed of a run
/// that is already in flight.
#[derive(Debug, Clone)]
pub struct PacingController {
    delay_nanos: Arc<AtomicU64>,
}

impl PacingController {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay_nanos: Arc::new(AtomicU64::new(saturating_nanos(delay))),
        }
    }

    /// Set the delay waited after every step, takes effect on the next step
    pub fn set_speed(&self, delay: Duration) {
        self.delay_nanos
            .store(saturating_nanos(delay), Ordering::Relaxed);
    }

    /// The delay to wait right now
    pub fn current_delay(&self) -> Duration {
        Duration::from_nanos(self.delay_nanos.load(Ordering::Relaxed))
    }

    /// Map a speed in `0..=100` to a delay, as the classic slider did: `100 - speed` milliseconds
    pub fn delay_for_speed(speed: u8) -> Duration {
        Duration::from_millis(100 - u64::from(speed.min(100)))
    }
}

impl Default for PacingController {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY)
    }
}

fn saturating_nanos(delay: Duration) -> u64 {
    u64::try_from(delay.as_nanos()).unwrap_or(u64::MAX)
}

/// A cancellation request a worker can wait on
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl CancelToken {
    /// Request cancellation, waking a pausing worker immediately
    pub fn cancel(&self) {
        let (cancelled, wakeup) = &*self.inner;
        *cancelled.lock().unwrap_or_else(PoisonError::into_inner) = true;
        wakeup.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        *self.inner.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Wait for `delay` or until cancelled, returns whether cancellation was requested
    pub fn pause(&self, delay: Duration) -> bool {
        let (cancelled, wakeup) = &*self.inner;
        let guard = cancelled.lock().unwrap_or_else(PoisonError::into_inner);
        if delay.is_zero() || *guard {
            return *guard;
        }

        let (guard, _) = wakeup
            .wait_timeout_while(guard, delay, |cancelled| !*cancelled)
            .unwrap_or_else(PoisonError::into_inner);
        *guard
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;

    #[test]
    fn speed_changes_are_shared() {
        let pacing = PacingController::default();
        let handle = pacing.clone();
        assert_eq!(pacing.current_delay(), DEFAULT_DELAY);

        handle.set_speed(Duration::from_millis(3));
        assert_eq!(pacing.current_delay(), Duration::from_millis(3));

        handle.set_speed(Duration::ZERO);
        assert_eq!(pacing.current_delay(), Duration::ZERO);
    }

    #[test]
    fn slider_mapping() {
        assert_eq!(
            PacingController::delay_for_speed(0),
            Duration::from_millis(100)
        );
        assert_eq!(
            PacingController::delay_for_speed(50),
            Duration::from_millis(50)
        );
        assert_eq!(PacingController::delay_for_speed(100), Duration::ZERO);
        assert_eq!(PacingController::delay_for_speed(200), Duration::ZERO);
    }

    #[test]
    fn huge_delays_saturate() {
        let pacing = PacingController::new(Duration::MAX);
        assert_eq!(pacing.current_delay(), Duration::from_nanos(u64::MAX));
    }

    #[test]
    fn pause_without_cancel_waits() {
        let token = CancelToken::default();
        let start = Instant::now();

        assert!(!token.pause(Duration::from_millis(20)));
        assert!(start.elapsed() >= Duration::from_millis(20));
        assert!(!token.pause(Duration::ZERO));
    }

    #[test]
    fn cancel_wakes_a_pause() {
        let token = CancelToken::default();
        let waiter = token.clone();
        let start = Instant::now();

        let thread = std::thread::spawn(move || waiter.pause(Duration::from_secs(30)));
        std::thread::sleep(Duration::from_millis(10));
        token.cancel();

        assert!(thread.join().unwrap());
        assert!(start.elapsed() < Duration::from_secs(30));
        assert!(token.is_cancelled());
        assert!(token.pause(Duration::from_secs(30)));
    }
}

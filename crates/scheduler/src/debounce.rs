//! Cancellable debounce timer
//!
//! A [`Debouncer`] holds at most one pending call. Scheduling a new call
//! cancels the previous one, so a burst of triggers collapses into a single
//! call that fires `delay` after the last trigger. Superseded payloads are
//! dropped, never queued.
//!
//! Time comes from [`tokio::time::Instant`], so paused-clock tests drive the
//! timer deterministically.

use log::trace;
use std::time::Duration;
use tokio::time::{sleep_until, Instant};

/// Identifies one scheduled call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug)]
struct PendingCall<T> {
    handle: TimerHandle,
    deadline: Instant,
    payload: T,
}

/// Single-slot timer that keeps only the latest scheduled payload.
///
/// # Example
///
/// ```
/// use pagemark_scheduler::Debouncer;
/// use std::time::Duration;
/// use tokio::time::Instant;
///
/// let mut debouncer = Debouncer::new(Duration::from_millis(150));
/// debouncer.schedule("first");
/// debouncer.schedule("second");
///
/// let later = Instant::now() + Duration::from_millis(150);
/// assert_eq!(debouncer.take_expired(later), Some("second"));
/// assert!(!debouncer.is_pending());
/// ```
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    next_id: u64,
    pending: Option<PendingCall<T>>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self { delay, next_id: 0, pending: None }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `payload` after the configured delay.
    pub fn schedule(&mut self, payload: T) -> TimerHandle {
        self.schedule_after(self.delay, payload)
    }

    /// Schedule `payload` after `delay`, cancelling any pending call.
    pub fn schedule_after(&mut self, delay: Duration, payload: T) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);

        if let Some(previous) = self.pending.take() {
            trace!("debounce: {:?} superseded by {:?}", previous.handle, handle);
        }

        self.pending = Some(PendingCall { handle, deadline: Instant::now() + delay, payload });
        handle
    }

    /// Cancel the call identified by `handle`.
    ///
    /// Returns `false` if that call already fired or was superseded.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        match &self.pending {
            Some(pending) if pending.handle == handle => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    /// Cancel whatever is pending and hand back its payload.
    pub fn cancel_pending(&mut self) -> Option<T> {
        self.pending.take().map(|pending| pending.payload)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.deadline)
    }

    /// Take the pending payload if its deadline is at or before `now`.
    pub fn take_expired(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some(pending) if pending.deadline <= now => self.cancel_pending(),
            _ => None,
        }
    }

    /// Wait for the pending call to fire and return its payload.
    ///
    /// Never resolves while nothing is pending. Dropping the future (for
    /// example when another `select!` branch wins) leaves the call pending.
    pub async fn expired(&mut self) -> T {
        loop {
            let Some(deadline) = self.deadline() else {
                return std::future::pending().await;
            };

            sleep_until(deadline).await;

            if let Some(payload) = self.take_expired(Instant::now()) {
                return payload;
            }
        }
    }
}

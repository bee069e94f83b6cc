//! Pagemark Scheduler Library
//!
//! Timing primitives for the viewer event loop. Scroll events are coalesced
//! through a [`Debouncer`] so that one settled scroll position triggers at
//! most one page load/unload pass.
//!
//! # Example
//!
//! ```no_run
//! use pagemark_scheduler::Debouncer;
//! use std::time::Duration;
//!
//! # async fn run() {
//! let mut scroll_settled = Debouncer::new(Duration::from_millis(150));
//!
//! // Every scroll event reschedules; only the last one survives.
//! scroll_settled.schedule(1200.0_f32);
//! scroll_settled.schedule(1250.0_f32);
//!
//! let settled_offset = scroll_settled.expired().await;
//! assert_eq!(settled_offset, 1250.0);
//! # }
//! ```

mod debounce;

pub use debounce::{Debouncer, TimerHandle};

//! Viewport-aware priority scheduling for ordered block lists.
//!
//! A [`VisibilityScheduler`] watches a scroll container through a host
//! provided [`IntersectionHost`] and keeps the set of blocks currently on
//! screen. Combined with the selection from a [`ContentStore`], it tags every
//! block of a list with a [`Priority`]: blocks that are visible or selected
//! render immediately, everything else may be deferred to a background channel.
//!
//! # Snapshots
//!
//! The visible set is never mutated in place. Each observation batch builds a
//! new [`VisibilitySet`] and publishes it with a single atomic swap, so a
//! reader holding a snapshot sees the set as it was before or after a batch,
//! never halfway through.
//!
//! # Degraded mode
//!
//! Hosts without an intersection API put the scheduler in
//! [`SchedulerPhase::Unsupported`], where nothing is ever deferred.

mod observer;
mod schedule;
mod scheduler;
mod set;
mod store;

pub use observer::{
	ContainerRef, DEFAULT_THRESHOLD, IntersectionHost, IntersectionObserver, ObservationEntry,
	ObserverOptions,
};
pub use schedule::{Priority, Schedule, ScheduledItem};
pub use scheduler::{SchedulerPhase, ThresholdError, VisibilityScheduler};
pub use set::VisibilitySet;
pub use store::{ContentStore, MemoryStore};

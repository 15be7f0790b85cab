use std::collections::HashSet;
use std::sync::Arc;

use arc_swap::ArcSwap;
use folio_primitives::ItemId;
use indexmap::IndexMap;
use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, trace};

use crate::schedule::{Priority, Schedule};
use crate::set::{BatchStats, VisibilitySet};
use crate::store::ContentStore;
use crate::{ContainerRef, DEFAULT_THRESHOLD, IntersectionHost, IntersectionObserver, ObservationEntry, ObserverOptions};

/// Lifecycle phase of a [`VisibilityScheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchedulerPhase {
	/// No container attached yet. Nothing is deferred.
	Uninitialized,
	/// An observer is attached and batches update the visible set.
	Observing,
	/// The host has no intersection API. Nothing is ever deferred.
	Unsupported,
	/// The owning list was torn down and the observer detached.
	Disposed,
}

/// Error returned for an intersection threshold outside `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("intersection threshold {0} is outside [0, 1]")]
pub struct ThresholdError(pub f32);

enum Phase {
	Uninitialized,
	Observing {
		container: ContainerRef,
		observer: Box<dyn IntersectionObserver>,
	},
	Unsupported {
		container: ContainerRef,
	},
	Disposed,
}

impl Phase {
	const fn kind(&self) -> SchedulerPhase {
		match self {
			Self::Uninitialized => SchedulerPhase::Uninitialized,
			Self::Observing { .. } => SchedulerPhase::Observing,
			Self::Unsupported { .. } => SchedulerPhase::Unsupported,
			Self::Disposed => SchedulerPhase::Disposed,
		}
	}
}

struct Lifecycle {
	phase: Phase,
	/// Items the list asked to observe, replayed onto a late-attached observer.
	registered: HashSet<ItemId>,
}

/// Tracks on-screen items of one block list and derives update priorities.
///
/// # Invariants
///
/// - A selected item is never deferred.
/// - Outside [`SchedulerPhase::Observing`] no item is deferred.
/// - The visible set is replaced per batch, never edited in place.
pub struct VisibilityScheduler {
	threshold: f32,
	lifecycle: Mutex<Lifecycle>,
	visible: ArcSwap<VisibilitySet>,
}

impl Default for VisibilityScheduler {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Debug for VisibilityScheduler {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("VisibilityScheduler")
			.field("threshold", &self.threshold)
			.field("phase", &self.phase())
			.field("visible", &self.visible.load().len())
			.finish()
	}
}

impl VisibilityScheduler {
	/// Creates a scheduler with the default 10% threshold.
	pub fn new() -> Self {
		Self::build(DEFAULT_THRESHOLD)
	}

	/// Creates a scheduler with a custom intersection threshold.
	pub fn with_threshold(threshold: f32) -> Result<Self, ThresholdError> {
		if !(0.0..=1.0).contains(&threshold) {
			return Err(ThresholdError(threshold));
		}
		Ok(Self::build(threshold))
	}

	fn build(threshold: f32) -> Self {
		Self {
			threshold,
			lifecycle: Mutex::new(Lifecycle {
				phase: Phase::Uninitialized,
				registered: HashSet::new(),
			}),
			visible: ArcSwap::from_pointee(VisibilitySet::new()),
		}
	}

	pub fn threshold(&self) -> f32 {
		self.threshold
	}

	pub fn phase(&self) -> SchedulerPhase {
		self.lifecycle.lock().phase.kind()
	}

	/// Returns the container the scheduler is attached to, if any.
	pub fn container(&self) -> Option<ContainerRef> {
		match &self.lifecycle.lock().phase {
			Phase::Observing { container, .. } | Phase::Unsupported { container } => Some(container.clone()),
			Phase::Uninitialized | Phase::Disposed => None,
		}
	}

	/// Attaches to the scroll container once it becomes available.
	///
	/// Only honored from [`SchedulerPhase::Uninitialized`]. Items registered
	/// before attachment are handed to the new observer.
	pub fn attach(&self, container: ContainerRef, host: &dyn IntersectionHost) -> SchedulerPhase {
		let mut lifecycle = self.lifecycle.lock();
		if !matches!(lifecycle.phase, Phase::Uninitialized) {
			debug!(phase = ?lifecycle.phase.kind(), container = %container, "visibility.attach.ignored");
			return lifecycle.phase.kind();
		}

		let options = ObserverOptions {
			root: container.clone(),
			threshold: self.threshold,
		};
		lifecycle.phase = match host.create_observer(options) {
			Some(mut observer) => {
				for item in &lifecycle.registered {
					observer.observe(item);
				}
				debug!(container = %container, replayed = lifecycle.registered.len(), "visibility.observing");
				Phase::Observing { container, observer }
			}
			None => {
				debug!(container = %container, "visibility.unsupported");
				Phase::Unsupported { container }
			}
		};
		lifecycle.phase.kind()
	}

	/// Registers a rendered item with the observer.
	pub fn observe_item(&self, item: &ItemId) {
		let mut lifecycle = self.lifecycle.lock();
		if matches!(lifecycle.phase, Phase::Disposed) {
			return;
		}
		if !lifecycle.registered.insert(item.clone()) {
			return;
		}
		if let Phase::Observing { observer, .. } = &mut lifecycle.phase {
			observer.observe(item);
		}
	}

	/// Unregisters an item that is no longer rendered.
	///
	/// The item also leaves the visible set so a later remount starts deferred
	/// until the host reports it again. Membership still follows the latest
	/// callback: a batch delivered after this call that reports the item as
	/// intersecting adds it back.
	pub fn unobserve_item(&self, item: &ItemId) {
		let mut lifecycle = self.lifecycle.lock();
		if !lifecycle.registered.remove(item.as_str()) {
			return;
		}
		if let Phase::Observing { observer, .. } = &mut lifecycle.phase {
			observer.unobserve(item);
			if self.visible.load().contains(item.as_str()) {
				self.visible.rcu(|current| current.with_batch(&[ObservationEntry::leaving(item.clone())]).0);
			}
		}
	}

	/// Applies one observation batch delivered by the host.
	///
	/// The whole batch is published in a single swap. Batches arriving outside
	/// [`SchedulerPhase::Observing`] are dropped.
	pub fn apply_batch(&self, entries: &[ObservationEntry]) {
		let lifecycle = self.lifecycle.lock();
		if !matches!(lifecycle.phase, Phase::Observing { .. }) {
			trace!(phase = ?lifecycle.phase.kind(), entries = entries.len(), "visibility.batch.dropped");
			return;
		}

		let mut stats = BatchStats::default();
		self.visible.rcu(|current| {
			let (next, batch_stats) = current.with_batch(entries);
			stats = batch_stats;
			next
		});
		if stats.skipped > 0 {
			trace!(skipped = stats.skipped, "visibility.batch.anonymous_entries");
		}
		trace!(entered = stats.entered, left = stats.left, "visibility.batch.applied");
	}

	/// Returns the current visible set snapshot.
	pub fn visible(&self) -> Arc<VisibilitySet> {
		self.visible.load_full()
	}

	/// Returns the deferred flag for one item under `selection`.
	pub fn is_deferred(&self, item: &str, selection: &HashSet<ItemId>) -> bool {
		if self.phase() != SchedulerPhase::Observing {
			return false;
		}
		derive_deferred(&self.visible.load(), selection, item)
	}

	/// Returns the priority for one item under `selection`.
	pub fn priority(&self, item: &str, selection: &HashSet<ItemId>) -> Priority {
		Priority::from_deferred(self.is_deferred(item, selection))
	}

	/// Builds the schedule for the children of `root`.
	///
	/// Order and selection are read from `store` once, and one visible-set
	/// snapshot is used for every item, so the result is internally consistent.
	pub fn schedule(&self, store: &dyn ContentStore, root: Option<&ItemId>) -> Schedule {
		let order = store.ordered_items(root);
		let observing = self.phase() == SchedulerPhase::Observing;
		let selection = store.selected_items();
		let visible = self.visible.load();

		let mut entries = IndexMap::with_capacity(order.len());
		for item in order {
			let deferred = observing && derive_deferred(&visible, &selection, item.as_str());
			if entries.contains_key(&item) {
				debug!(item = %item, "visibility.schedule.duplicate_item");
				continue;
			}
			entries.insert(item, Priority::from_deferred(deferred));
		}
		Schedule::from_entries(entries)
	}

	/// Detaches the observer and stops tracking. Idempotent.
	pub fn dispose(&self) {
		let mut lifecycle = self.lifecycle.lock();
		let previous = std::mem::replace(&mut lifecycle.phase, Phase::Disposed);
		if let Phase::Observing { mut observer, container } = previous {
			observer.disconnect();
			debug!(container = %container, "visibility.disposed");
		}
		lifecycle.registered.clear();
		self.visible.store(Arc::new(VisibilitySet::new()));
	}
}

impl Drop for VisibilityScheduler {
	fn drop(&mut self) {
		self.dispose();
	}
}

fn derive_deferred(visible: &VisibilitySet, selection: &HashSet<ItemId>, item: &str) -> bool {
	!visible.contains(item) && !selection.contains(item)
}

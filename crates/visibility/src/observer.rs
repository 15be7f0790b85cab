use std::fmt;

use folio_primitives::ItemId;

/// Fraction of an item's bounding box that must be inside the container for
/// the item to count as visible.
pub const DEFAULT_THRESHOLD: f32 = 0.1;

/// Opaque reference to the scroll container an observer is rooted at.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerRef(String);

impl ContainerRef {
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for ContainerRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Options handed to the host when the observer is created.
#[derive(Debug, Clone, PartialEq)]
pub struct ObserverOptions {
	/// Scroll container the intersection is computed against.
	pub root: ContainerRef,
	/// Visible fraction at which an item starts intersecting.
	pub threshold: f32,
}

/// One record of an observation batch delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservationEntry {
	/// Block the entry reports on. `None` when the observed element carried no
	/// block identifier; such entries are skipped.
	pub item: Option<ItemId>,
	/// Whether the item currently crosses the threshold.
	pub is_intersecting: bool,
}

impl ObservationEntry {
	/// Entry for an item entering the viewport.
	pub fn entering(item: impl Into<ItemId>) -> Self {
		Self {
			item: Some(item.into()),
			is_intersecting: true,
		}
	}

	/// Entry for an item leaving the viewport.
	pub fn leaving(item: impl Into<ItemId>) -> Self {
		Self {
			item: Some(item.into()),
			is_intersecting: false,
		}
	}

	/// Entry whose target had no identifier.
	pub fn anonymous(is_intersecting: bool) -> Self {
		Self {
			item: None,
			is_intersecting,
		}
	}
}

/// Host capability that creates intersection observers.
pub trait IntersectionHost {
	/// Creates an observer rooted at `options.root`.
	///
	/// Returns `None` when the host has no intersection API.
	fn create_observer(&self, options: ObserverOptions) -> Option<Box<dyn IntersectionObserver>>;
}

/// Live observer registration owned by the scheduler.
///
/// The host delivers batches by calling
/// [`VisibilityScheduler::apply_batch`](crate::VisibilityScheduler::apply_batch).
pub trait IntersectionObserver: Send {
	/// Starts reporting on `item`.
	fn observe(&mut self, item: &ItemId);
	/// Stops reporting on `item`.
	fn unobserve(&mut self, item: &ItemId);
	/// Detaches from the container. Called exactly once, on dispose.
	fn disconnect(&mut self);
}

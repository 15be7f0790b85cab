use std::collections::HashSet;

use folio_primitives::ItemId;

use crate::ObservationEntry;

/// Immutable set of items currently intersecting the viewport.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilitySet {
	items: HashSet<ItemId>,
}

/// Counters for one applied batch, used for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct BatchStats {
	pub(crate) entered: usize,
	pub(crate) left: usize,
	pub(crate) skipped: usize,
}

impl VisibilitySet {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn contains(&self, item: &str) -> bool {
		self.items.contains(item)
	}

	pub fn len(&self) -> usize {
		self.items.len()
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &ItemId> {
		self.items.iter()
	}

	/// Returns a copy of this set with `entries` applied in order.
	///
	/// Later entries for the same item win. Entries without an item are
	/// counted as skipped and otherwise ignored.
	pub(crate) fn with_batch(&self, entries: &[ObservationEntry]) -> (Self, BatchStats) {
		let mut next = self.clone();
		let mut stats = BatchStats::default();
		for entry in entries {
			let Some(item) = &entry.item else {
				stats.skipped += 1;
				continue;
			};
			if entry.is_intersecting {
				next.items.insert(item.clone());
				stats.entered += 1;
			} else {
				next.items.remove(item.as_str());
				stats.left += 1;
			}
		}
		(next, stats)
	}
}

impl FromIterator<ItemId> for VisibilitySet {
	fn from_iter<T: IntoIterator<Item = ItemId>>(iter: T) -> Self {
		Self {
			items: iter.into_iter().collect(),
		}
	}
}

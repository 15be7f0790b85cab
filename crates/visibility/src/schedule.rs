use folio_primitives::ItemId;
use folio_worker::TaskClass;
use indexmap::IndexMap;

/// Update priority of one scheduled item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Priority {
	/// Render in the current synchronous pass.
	Immediate,
	/// Updates may be postponed to a background channel.
	Deferred,
}

impl Priority {
	pub(crate) const fn from_deferred(deferred: bool) -> Self {
		if deferred { Self::Deferred } else { Self::Immediate }
	}

	pub const fn is_deferred(self) -> bool {
		matches!(self, Self::Deferred)
	}

	/// Worker class a render host should use for this item's updates.
	pub const fn task_class(self) -> TaskClass {
		match self {
			Self::Immediate => TaskClass::Interactive,
			Self::Deferred => TaskClass::Background,
		}
	}
}

/// Borrowed view of one scheduled item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledItem<'a> {
	pub id: &'a ItemId,
	/// Position in render order. Computed eagerly so deferred items still
	/// know their place when their own update is postponed.
	pub index: usize,
	pub priority: Priority,
}

impl ScheduledItem<'_> {
	pub const fn deferred(&self) -> bool {
		self.priority.is_deferred()
	}
}

/// Ordered list of items with their priorities.
///
/// Iteration order is always the content store's order. Priority affects when
/// an item is updated, never where it is displayed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
	entries: IndexMap<ItemId, Priority>,
}

impl Schedule {
	pub(crate) fn from_entries(entries: IndexMap<ItemId, Priority>) -> Self {
		Self { entries }
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns true when the list has no items and a host should show the
	/// list placeholder instead.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn priority(&self, id: &str) -> Option<Priority> {
		self.entries.get(id).copied()
	}

	/// Returns the deferred flag for `id`; unknown items are not deferred.
	pub fn is_deferred(&self, id: &str) -> bool {
		self.priority(id).is_some_and(Priority::is_deferred)
	}

	pub fn index_of(&self, id: &str) -> Option<usize> {
		self.entries.get_index_of(id)
	}

	pub fn iter(&self) -> impl Iterator<Item = ScheduledItem<'_>> {
		self.entries.iter().enumerate().map(|(index, (id, priority))| ScheduledItem {
			id,
			index,
			priority: *priority,
		})
	}

	/// Ids in render order.
	pub fn ids(&self) -> impl Iterator<Item = &ItemId> {
		self.entries.keys()
	}

	pub fn deferred_count(&self) -> usize {
		self.entries.values().filter(|p| p.is_deferred()).count()
	}
}

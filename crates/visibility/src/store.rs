use std::collections::{HashMap, HashSet};

use folio_primitives::ItemId;

/// Read-only view of the content store the scheduler consults on every pass.
pub trait ContentStore {
	/// Children of `root` in render order; `None` is the top-level list.
	fn ordered_items(&self, root: Option<&ItemId>) -> Vec<ItemId>;

	/// Items currently selected by the user.
	fn selected_items(&self) -> HashSet<ItemId>;
}

/// In-memory [`ContentStore`] keyed by parent item.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
	children: HashMap<Option<ItemId>, Vec<ItemId>>,
	selected: HashSet<ItemId>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Replaces the children of `root`.
	pub fn set_children<I>(&mut self, root: Option<ItemId>, items: I)
	where
		I: IntoIterator,
		I::Item: Into<ItemId>,
	{
		self.children.insert(root, items.into_iter().map(Into::into).collect());
	}

	/// Inserts `item` under `root` at `index`, clamped to the list length.
	pub fn insert(&mut self, root: Option<ItemId>, index: usize, item: impl Into<ItemId>) {
		let list = self.children.entry(root).or_default();
		let index = index.min(list.len());
		list.insert(index, item.into());
	}

	/// Removes `item` from whichever list holds it, and from the selection.
	pub fn remove(&mut self, item: &str) -> bool {
		self.selected.remove(item);
		let mut removed = false;
		for list in self.children.values_mut() {
			let before = list.len();
			list.retain(|id| id.as_str() != item);
			removed |= list.len() != before;
		}
		removed
	}

	/// Replaces the selection.
	pub fn select<I>(&mut self, items: I)
	where
		I: IntoIterator,
		I::Item: Into<ItemId>,
	{
		self.selected = items.into_iter().map(Into::into).collect();
	}

	pub fn clear_selection(&mut self) {
		self.selected.clear();
	}
}

impl ContentStore for MemoryStore {
	fn ordered_items(&self, root: Option<&ItemId>) -> Vec<ItemId> {
		self.children.get(&root.cloned()).cloned().unwrap_or_default()
	}

	fn selected_items(&self) -> HashSet<ItemId> {
		self.selected.clone()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn ids(items: &[ItemId]) -> Vec<&str> {
		items.iter().map(ItemId::as_str).collect()
	}

	#[test]
	fn test_nested_lists_are_independent() {
		let mut store = MemoryStore::new();
		store.set_children(None, ["a", "b"]);
		store.set_children(Some("b".into()), ["b1", "b2"]);

		assert_eq!(ids(&store.ordered_items(None)), ["a", "b"]);
		assert_eq!(ids(&store.ordered_items(Some(&"b".into()))), ["b1", "b2"]);
		assert!(store.ordered_items(Some(&"a".into())).is_empty());
	}

	#[test]
	fn test_insert_and_remove() {
		let mut store = MemoryStore::new();
		store.set_children(None, ["a", "c"]);
		store.insert(None, 1, "b");
		store.insert(None, 99, "d");
		store.select(["c"]);
		assert_eq!(ids(&store.ordered_items(None)), ["a", "b", "c", "d"]);

		assert!(store.remove("c"));
		assert!(!store.remove("c"));
		assert_eq!(ids(&store.ordered_items(None)), ["a", "b", "d"]);
		assert!(store.selected_items().is_empty());
	}
}

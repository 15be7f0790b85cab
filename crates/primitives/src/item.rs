use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Opaque identifier of one content block.
///
/// Cloning is a reference-count bump, so ids can be copied freely into
/// visibility snapshots and schedules.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(Arc<str>);

impl ItemId {
	/// Creates an id from any string-like value.
	pub fn new(id: impl Into<Arc<str>>) -> Self {
		Self(id.into())
	}

	/// Returns the id as a string slice.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for ItemId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for ItemId {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}

impl From<String> for ItemId {
	fn from(value: String) -> Self {
		Self::new(value)
	}
}

impl Borrow<str> for ItemId {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl AsRef<str> for ItemId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

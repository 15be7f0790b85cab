use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio_util::sync::CancellationToken;

/// Identity of one issued request within a [`TokenCell`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FetchToken(u64);

impl FetchToken {
	/// Returns the issuance sequence number (first issued token is 1).
	pub const fn generation(self) -> u64 {
		self.0
	}
}

/// Monotonic clock holding the most recently issued [`FetchToken`].
///
/// Issuing replaces the current token unconditionally, so any result tagged
/// with an older token is stale from that moment on.
#[derive(Debug, Default, Clone)]
pub struct TokenCell {
	current: Arc<AtomicU64>,
}

impl TokenCell {
	pub fn new() -> Self {
		Self::default()
	}

	/// Issues a new token and makes it current.
	pub fn issue(&self) -> FetchToken {
		FetchToken(self.current.fetch_add(1, Ordering::AcqRel).wrapping_add(1))
	}

	/// Returns the current token, or `None` before the first issuance.
	pub fn current(&self) -> Option<FetchToken> {
		match self.current.load(Ordering::Acquire) {
			0 => None,
			n => Some(FetchToken(n)),
		}
	}

	/// Returns true when `token` has not been superseded.
	pub fn is_current(&self, token: FetchToken) -> bool {
		self.current.load(Ordering::Acquire) == token.0
	}
}

/// Teardown marker checked before every state transition of its owner.
///
/// Cloned handles share one flag; disposing any of them disposes all.
#[derive(Debug, Default, Clone)]
pub struct DisposeFlag {
	cancel: CancellationToken,
}

impl DisposeFlag {
	pub fn new() -> Self {
		Self::default()
	}

	/// Marks the owner as disposed. Idempotent.
	pub fn dispose(&self) {
		self.cancel.cancel();
	}

	pub fn is_disposed(&self) -> bool {
		self.cancel.is_cancelled()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_issue_supersedes_previous() {
		let cell = TokenCell::new();
		assert_eq!(cell.current(), None);

		let a = cell.issue();
		assert!(cell.is_current(a));

		let b = cell.issue();
		assert!(!cell.is_current(a));
		assert!(cell.is_current(b));
		assert!(b > a);
		assert_eq!(cell.current(), Some(b));
	}

	#[test]
	fn test_clones_share_the_clock() {
		let cell = TokenCell::new();
		let other = cell.clone();
		let a = cell.issue();
		let b = other.issue();
		assert!(!cell.is_current(a));
		assert!(cell.is_current(b));
	}

	#[test]
	fn test_dispose_flag_is_shared_and_idempotent() {
		let flag = DisposeFlag::new();
		let observer = flag.clone();
		assert!(!observer.is_disposed());

		flag.dispose();
		flag.dispose();
		assert!(observer.is_disposed());
		assert!(!DisposeFlag::new().is_disposed());
	}
}

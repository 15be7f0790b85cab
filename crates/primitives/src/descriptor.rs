use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Attribute mapping sent alongside a render request.
pub type Attributes = serde_json::Map<String, serde_json::Value>;

/// Names the content type the server renders, such as `core/archives`.
///
/// The name is copied into the request path verbatim, so it is restricted to
/// ASCII alphanumerics and `-`, `_`, `.`, with `/` separating non-empty
/// segments. `.` and `..` segments are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentDescriptor(String);

/// Error returned for descriptor names that cannot form a path segment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
	#[error("content descriptor is empty")]
	Empty,
	#[error("content descriptor {name:?} contains invalid character {found:?}")]
	InvalidChar { name: String, found: char },
	#[error("content descriptor {name:?} has an empty or relative path segment")]
	InvalidSegment { name: String },
}

impl ContentDescriptor {
	/// Validates and wraps a descriptor name.
	pub fn new(name: impl Into<String>) -> Result<Self, DescriptorError> {
		let name = name.into();
		if name.is_empty() {
			return Err(DescriptorError::Empty);
		}
		if let Some(found) = name.chars().find(|&c| !is_path_char(c)) {
			return Err(DescriptorError::InvalidChar { name, found });
		}
		if name.split('/').any(|segment| matches!(segment, "" | "." | "..")) {
			return Err(DescriptorError::InvalidSegment { name });
		}
		Ok(Self(name))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

const fn is_path_char(c: char) -> bool {
	c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/')
}

impl fmt::Display for ContentDescriptor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl FromStr for ContentDescriptor {
	type Err = DescriptorError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

impl TryFrom<String> for ContentDescriptor {
	type Error = DescriptorError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}

impl From<ContentDescriptor> for String {
	fn from(value: ContentDescriptor) -> Self {
		value.0
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn test_accepts_namespaced_names() {
		let desc = ContentDescriptor::new("core/archives").unwrap();
		assert_eq!(desc.as_str(), "core/archives");
	}

	#[test]
	fn test_rejects_unsafe_names() {
		assert_eq!(ContentDescriptor::new(""), Err(DescriptorError::Empty));
		assert_eq!(
			ContentDescriptor::new("core/a b"),
			Err(DescriptorError::InvalidChar {
				name: "core/a b".into(),
				found: ' ',
			})
		);
		assert!(ContentDescriptor::new("core/x?y").is_err());
	}

	#[test]
	fn test_rejects_reserved_and_encoded_characters() {
		for name in ["core/a%2Fb", "core/a;b", "core/a+b", "core/caf\u{e9}"] {
			assert!(
				matches!(ContentDescriptor::new(name), Err(DescriptorError::InvalidChar { .. })),
				"{name} should be rejected"
			);
		}
		assert_eq!(
			ContentDescriptor::new("core/a%b"),
			Err(DescriptorError::InvalidChar {
				name: "core/a%b".into(),
				found: '%',
			})
		);
	}

	#[test]
	fn test_rejects_empty_and_relative_segments() {
		for name in ["/core/archives", "core/", "core//archives", "core/../admin", "./core"] {
			assert_eq!(
				ContentDescriptor::new(name),
				Err(DescriptorError::InvalidSegment { name: name.into() })
			);
		}
		assert!(ContentDescriptor::new("my-plugin/block_v2.1").is_ok());
	}

	#[test]
	fn test_deserialize_validates() {
		assert!(serde_json::from_str::<ContentDescriptor>("\"core/latest-posts\"").is_ok());
		assert!(serde_json::from_str::<ContentDescriptor>("\"\"").is_err());
	}
}

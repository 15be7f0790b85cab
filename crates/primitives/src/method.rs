use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Request method used for a render call.
///
/// `Get` encodes attributes into the query string. `Post` moves them into the
/// request body, which lifts the URL length limit for large attribute sets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
	#[default]
	Get,
	Post,
}

impl HttpMethod {
	/// Returns the canonical method name.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Get => "GET",
			Self::Post => "POST",
		}
	}

	/// Returns true when attributes travel in the request body.
	pub const fn carries_body(self) -> bool {
		matches!(self, Self::Post)
	}
}

impl fmt::Display for HttpMethod {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Error returned when a method name is neither GET nor POST.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported render method: {0} (expected GET or POST)")]
pub struct ParseMethodError(pub String);

impl FromStr for HttpMethod {
	type Err = ParseMethodError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		if s.eq_ignore_ascii_case("get") {
			Ok(Self::Get)
		} else if s.eq_ignore_ascii_case("post") {
			Ok(Self::Post)
		} else {
			Err(ParseMethodError(s.to_string()))
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_is_case_insensitive() {
		assert_eq!("post".parse::<HttpMethod>(), Ok(HttpMethod::Post));
		assert_eq!("GET".parse::<HttpMethod>(), Ok(HttpMethod::Get));
		assert_eq!("put".parse::<HttpMethod>(), Err(ParseMethodError("put".into())));
	}

	#[test]
	fn test_serde_uses_upper_case() {
		assert_eq!(serde_json::to_string(&HttpMethod::Post).unwrap(), "\"POST\"");
		let method: HttpMethod = serde_json::from_str("\"GET\"").unwrap();
		assert_eq!(method, HttpMethod::Get);
	}
}

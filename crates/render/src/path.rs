use std::collections::BTreeMap;

use folio_primitives::{Attributes, ContentDescriptor};
use url::form_urlencoded;

/// Default path prefix of the render endpoint.
pub const DEFAULT_PATH_PREFIX: &str = "/render";

/// Default value of the `context` query argument.
pub const DEFAULT_CONTEXT: &str = "edit";

/// Shape of render endpoint paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathOptions {
	pub prefix: String,
	pub context: String,
}

impl Default for PathOptions {
	fn default() -> Self {
		Self {
			prefix: DEFAULT_PATH_PREFIX.to_string(),
			context: DEFAULT_CONTEXT.to_string(),
		}
	}
}

/// Builds the render path for `target`.
///
/// Produces `{prefix}/{target}?context={context}` followed by
/// `attributes=<urlencoded json>` when attributes are given, then the extra
/// query arguments. An extra argument named `context` or `attributes`
/// replaces the built-in one in place.
pub fn renderer_path(
	target: &ContentDescriptor,
	attributes: Option<&Attributes>,
	query_args: &BTreeMap<String, String>,
	options: &PathOptions,
) -> String {
	let mut pairs: Vec<(String, String)> = vec![("context".to_string(), options.context.clone())];
	if let Some(attributes) = attributes {
		let json = serde_json::Value::Object(attributes.clone()).to_string();
		pairs.push(("attributes".to_string(), json));
	}
	for (key, value) in query_args {
		match pairs.iter_mut().find(|(existing, _)| existing == key) {
			Some(slot) => slot.1 = value.clone(),
			None => pairs.push((key.clone(), value.clone())),
		}
	}

	let query = form_urlencoded::Serializer::new(String::new())
		.extend_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
		.finish();
	format!("{}/{}?{}", options.prefix.trim_end_matches('/'), target, query)
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use serde_json::json;

	use super::*;

	fn target() -> ContentDescriptor {
		ContentDescriptor::new("core/archives").unwrap()
	}

	fn attrs(value: serde_json::Value) -> Attributes {
		match value {
			serde_json::Value::Object(map) => map,
			other => panic!("expected object, got {other}"),
		}
	}

	#[test]
	fn test_path_without_attributes() {
		let path = renderer_path(&target(), None, &BTreeMap::new(), &PathOptions::default());
		assert_eq!(path, "/render/core/archives?context=edit");
	}

	#[test]
	fn test_path_encodes_attributes_as_json() {
		let attributes = attrs(json!({ "showPostCounts": true, "title": "a&b" }));
		let path = renderer_path(&target(), Some(&attributes), &BTreeMap::new(), &PathOptions::default());
		assert_eq!(
			path,
			"/render/core/archives?context=edit&attributes=%7B%22showPostCounts%22%3Atrue%2C%22title%22%3A%22a%26b%22%7D"
		);

		let query = path.split_once('?').unwrap().1;
		let decoded: BTreeMap<String, String> = form_urlencoded::parse(query.as_bytes()).into_owned().collect();
		let back: serde_json::Value = serde_json::from_str(&decoded["attributes"]).unwrap();
		assert_eq!(back, json!({ "showPostCounts": true, "title": "a&b" }));
	}

	#[test]
	fn test_query_args_append_and_override() {
		let mut args = BTreeMap::new();
		args.insert("context".to_string(), "view".to_string());
		args.insert("post_id".to_string(), "42".to_string());
		let options = PathOptions {
			prefix: "/wp/v2/block-renderer/".to_string(),
			context: DEFAULT_CONTEXT.to_string(),
		};

		let path = renderer_path(&target(), None, &args, &options);
		assert_eq!(path, "/wp/v2/block-renderer/core/archives?context=view&post_id=42");
	}
}

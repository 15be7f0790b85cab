use std::collections::BTreeMap;

use folio_primitives::{Attributes, ContentDescriptor, HttpMethod};

/// Inputs of one server render.
///
/// Two requests are the same input when all fields compare equal, which is
/// what [`FetchCoordinator::sync`](crate::FetchCoordinator::sync) uses to
/// decide whether a re-render is needed.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
	pub target: ContentDescriptor,
	/// `None` omits attributes from the call entirely.
	pub attributes: Option<Attributes>,
	pub method: HttpMethod,
	/// Extra query arguments appended to the path. They override the
	/// built-in `context` and `attributes` arguments on key collision.
	pub query_args: BTreeMap<String, String>,
}

impl RenderRequest {
	/// Creates a GET request without attributes.
	pub fn new(target: ContentDescriptor) -> Self {
		Self {
			target,
			attributes: None,
			method: HttpMethod::Get,
			query_args: BTreeMap::new(),
		}
	}

	pub fn with_attributes(mut self, attributes: Attributes) -> Self {
		self.attributes = Some(attributes);
		self
	}

	pub fn with_method(mut self, method: HttpMethod) -> Self {
		self.method = method;
		self
	}

	pub fn with_query_arg(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.query_args.insert(key.into(), value.into());
		self
	}
}

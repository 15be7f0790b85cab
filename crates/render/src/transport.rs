use std::sync::Arc;

use async_trait::async_trait;
use folio_primitives::HttpMethod;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::path::{PathOptions, renderer_path};
use crate::request::RenderRequest;

/// One network call as handed to a [`RenderTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct FetchCall {
	/// Endpoint path including the query string.
	pub path: String,
	pub method: HttpMethod,
	/// JSON body, present for POST calls only.
	pub body: Option<serde_json::Value>,
}

impl FetchCall {
	/// Builds the call for `request`.
	///
	/// GET calls carry attributes in the query string. POST calls send
	/// `{ "attributes": ... }` as the body and leave them out of the path.
	pub fn for_request(request: &RenderRequest, options: &PathOptions) -> Self {
		let carries_body = request.method.carries_body();
		let url_attributes = if carries_body { None } else { request.attributes.as_ref() };
		let path = renderer_path(&request.target, url_attributes, &request.query_args, options);
		let body = carries_body.then(|| json!({ "attributes": request.attributes }));
		Self {
			path,
			method: request.method,
			body,
		}
	}
}

/// Successful response of the render endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RenderedPayload {
	/// Rendered markup. Missing in the response is the same as empty.
	#[serde(default)]
	pub rendered: String,
}

impl RenderedPayload {
	pub fn new(rendered: impl Into<String>) -> Self {
		Self {
			rendered: rendered.into(),
		}
	}
}

/// Network or HTTP failure of a render call.
///
/// The message is shown to the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
	pub message: String,
}

impl TransportError {
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
		}
	}
}

/// Network primitive used by the coordinator.
#[async_trait]
pub trait RenderTransport: Send + Sync + 'static {
	async fn fetch(&self, call: FetchCall) -> Result<RenderedPayload, TransportError>;
}

#[async_trait]
impl<T> RenderTransport for Arc<T>
where
	T: RenderTransport + ?Sized,
{
	async fn fetch(&self, call: FetchCall) -> Result<RenderedPayload, TransportError> {
		(**self).fetch(call).await
	}
}

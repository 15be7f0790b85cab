use std::time::Duration;

use async_trait::async_trait;
use folio_primitives::HttpMethod;
use reqwest::StatusCode;
use tracing::debug;

use crate::transport::{FetchCall, RenderTransport, RenderedPayload, TransportError};

/// [`RenderTransport`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTransport {
	client: reqwest::Client,
	base_url: String,
}

impl HttpTransport {
	/// Creates a transport rooted at `base_url`, e.g. `https://example.org/wp-json`.
	pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, TransportError> {
		let mut builder = reqwest::Client::builder();
		if let Some(timeout) = timeout {
			builder = builder.timeout(timeout);
		}
		let client = builder
			.build()
			.map_err(|e| TransportError::new(format!("failed to create HTTP client: {e}")))?;
		Ok(Self {
			client,
			base_url: base_url.into().trim_end_matches('/').to_string(),
		})
	}

	fn url(&self, path: &str) -> String {
		format!("{}{}", self.base_url, path)
	}
}

#[async_trait]
impl RenderTransport for HttpTransport {
	async fn fetch(&self, call: FetchCall) -> Result<RenderedPayload, TransportError> {
		let url = self.url(&call.path);
		debug!(method = %call.method, url = %url, "render.http.send");

		let mut request = match call.method {
			HttpMethod::Get => self.client.get(&url),
			HttpMethod::Post => self.client.post(&url),
		};
		if let Some(body) = &call.body {
			request = request.json(body);
		}

		let response = request
			.send()
			.await
			.map_err(|e| TransportError::new(e.to_string()))?;
		let status = response.status();
		if status.is_success() {
			return response
				.json::<RenderedPayload>()
				.await
				.map_err(|e| TransportError::new(format!("invalid render response: {e}")));
		}

		let body = response.text().await.unwrap_or_default();
		Err(TransportError::new(error_message(status, &body)))
	}
}

/// Error message for a non-success response: the JSON `message` field when
/// the body has one, the status line otherwise.
fn error_message(status: StatusCode, body: &str) -> String {
	serde_json::from_str::<serde_json::Value>(body)
		.ok()
		.and_then(|value| value.get("message").and_then(|m| m.as_str()).map(str::to_string))
		.filter(|message| !message.is_empty())
		.unwrap_or_else(|| status.to_string())
}

#[cfg(test)]
mod tests {
	use folio_primitives::{Attributes, ContentDescriptor};
	use pretty_assertions::assert_eq;
	use serde_json::json;
	use tokio::io::{AsyncReadExt, AsyncWriteExt};
	use tokio::net::TcpListener;
	use tokio::sync::oneshot;

	use super::*;
	use crate::{PathOptions, RenderRequest};

	/// Request line, headers, and body received by [`serve_once`].
	#[derive(Debug)]
	struct Received {
		head: String,
		body: String,
	}

	fn content_length(head: &str) -> usize {
		head.lines()
			.filter_map(|line| line.split_once(':'))
			.find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
			.and_then(|(_, value)| value.trim().parse().ok())
			.unwrap_or(0)
	}

	/// Accepts one connection, records the request, and answers with `status`
	/// and a JSON `body`. Returns the base URL to point a transport at.
	async fn serve_once(status: &'static str, body: &'static str) -> (String, oneshot::Receiver<Received>) {
		let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
		let base_url = format!("http://{}", listener.local_addr().unwrap());
		let (tx, rx) = oneshot::channel();

		tokio::spawn(async move {
			let (mut socket, _) = listener.accept().await.unwrap();
			let mut buf = Vec::new();
			let mut chunk = [0u8; 1024];
			let (head, body_start) = loop {
				let n = socket.read(&mut chunk).await.unwrap();
				assert!(n > 0, "connection closed before headers");
				buf.extend_from_slice(&chunk[..n]);
				if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
					break (String::from_utf8_lossy(&buf[..end]).into_owned(), end + 4);
				}
			};
			let length = content_length(&head);
			while buf.len() < body_start + length {
				let n = socket.read(&mut chunk).await.unwrap();
				assert!(n > 0, "connection closed before body");
				buf.extend_from_slice(&chunk[..n]);
			}
			let received = Received {
				head,
				body: String::from_utf8_lossy(&buf[body_start..body_start + length]).into_owned(),
			};

			let response = format!(
				"HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
				body.len()
			);
			socket.write_all(response.as_bytes()).await.unwrap();
			socket.shutdown().await.ok();
			let _ = tx.send(received);
		});
		(base_url, rx)
	}

	fn archives(method: HttpMethod) -> FetchCall {
		let mut attributes = Attributes::new();
		attributes.insert("showPostCounts".into(), json!(true));
		let request = RenderRequest::new(ContentDescriptor::new("core/archives").unwrap())
			.with_attributes(attributes)
			.with_method(method);
		FetchCall::for_request(&request, &PathOptions::default())
	}

	#[tokio::test]
	async fn test_get_sends_attributes_in_query() {
		let (base_url, received) = serve_once("200 OK", r#"{"rendered":"<ul>archives</ul>"}"#).await;
		let transport = HttpTransport::new(base_url, None).unwrap();

		let payload = transport.fetch(archives(HttpMethod::Get)).await.unwrap();
		assert_eq!(payload, RenderedPayload::new("<ul>archives</ul>"));

		let received = received.await.unwrap();
		let request_line = received.head.lines().next().unwrap();
		assert!(
			request_line.starts_with("GET /render/core/archives?context=edit&attributes="),
			"{request_line}"
		);
		assert_eq!(received.body, "");
	}

	#[tokio::test]
	async fn test_post_delivers_attributes_as_body() {
		let (base_url, received) = serve_once("200 OK", "{}").await;
		let transport = HttpTransport::new(base_url, None).unwrap();

		let payload = transport.fetch(archives(HttpMethod::Post)).await.unwrap();
		assert_eq!(payload.rendered, "", "missing rendered field reads as empty");

		let received = received.await.unwrap();
		assert!(received.head.starts_with("POST /render/core/archives?context=edit HTTP/1.1"));
		let body: serde_json::Value = serde_json::from_str(&received.body).unwrap();
		assert_eq!(body, json!({ "attributes": { "showPostCounts": true } }));
	}

	#[tokio::test]
	async fn test_error_status_uses_body_message() {
		let (base_url, _received) =
			serve_once("404 Not Found", r#"{"code":"block_invalid","message":"Invalid block."}"#).await;
		let transport = HttpTransport::new(base_url, None).unwrap();

		let err = transport.fetch(archives(HttpMethod::Get)).await.unwrap_err();
		assert_eq!(err, TransportError::new("Invalid block."));
	}

	#[tokio::test]
	async fn test_error_status_without_message_uses_status_line() {
		let (base_url, _received) = serve_once("500 Internal Server Error", r#"{"code":"oops"}"#).await;
		let transport = HttpTransport::new(base_url, None).unwrap();

		let err = transport.fetch(archives(HttpMethod::Get)).await.unwrap_err();
		assert_eq!(err.message, "500 Internal Server Error");
	}

	#[test]
	fn test_error_message_prefers_body_message() {
		let body = r#"{"code":"block_invalid","message":"Invalid block.","data":{"status":404}}"#;
		assert_eq!(error_message(StatusCode::NOT_FOUND, body), "Invalid block.");
	}

	#[test]
	fn test_error_message_falls_back_to_status() {
		assert_eq!(error_message(StatusCode::BAD_GATEWAY, "<html>oops</html>"), "502 Bad Gateway");
		assert_eq!(error_message(StatusCode::FORBIDDEN, r#"{"message":""}"#), "403 Forbidden");
	}

	#[test]
	fn test_base_url_is_normalized() {
		let transport = HttpTransport::new("https://example.org/wp-json/", None).unwrap();
		assert_eq!(
			transport.url("/render/core/archives?context=edit"),
			"https://example.org/wp-json/render/core/archives?context=edit"
		);
	}
}

use anyhow::{Context, bail};
use folio_config::Config;
use folio_primitives::Attributes;
use folio_render::{FetchCall, FetchCoordinator, HttpTransport, RenderRequest, RenderState};
use tracing::info;

use crate::cli::BlockArgs;

/// Builds the render request for `args`, filling gaps from `config`.
pub fn build_request(args: &BlockArgs, config: &Config) -> RenderRequest {
	let mut request = RenderRequest::new(args.block.clone()).with_method(args.method.unwrap_or(config.render.method));
	request.query_args = config.render.query_args.clone();
	for (key, value) in &args.query {
		request.query_args.insert(key.clone(), value.clone());
	}
	if !args.attrs.is_empty() {
		let mut attributes = Attributes::new();
		for (key, value) in &args.attrs {
			attributes.insert(key.clone(), attribute_value(value));
		}
		request.attributes = Some(attributes);
	}
	request
}

/// Parses `raw` as JSON, keeping it as a plain string when it is not JSON.
fn attribute_value(raw: &str) -> serde_json::Value {
	serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::String(raw.to_string()))
}

/// Prints the call that `render` would issue.
pub fn print_path(args: &BlockArgs, config: &Config) {
	let request = build_request(args, config);
	let call = FetchCall::for_request(&request, &config.render.coordinator_options().path);
	println!("{} {}", call.method, call.path);
	if let Some(body) = call.body {
		println!("{body}");
	}
}

/// Renders one block and prints the display branch.
pub async fn render(args: &BlockArgs, base_url: Option<String>, config: &Config) -> anyhow::Result<()> {
	let base_url = base_url
		.or_else(|| config.render.base_url.clone())
		.context("no server configured: pass --base-url or set render.base_url")?;
	let transport = HttpTransport::new(base_url.as_str(), config.render.timeout())?;
	let coordinator = FetchCoordinator::new(transport, config.render.coordinator_options());

	let mut states = coordinator.subscribe();
	let request = build_request(args, config);
	info!(block = %request.target, method = %request.method, base_url = %base_url, "rendering block");
	coordinator.sync(request);

	let state = states
		.wait_for(RenderState::is_settled)
		.await
		.context("render coordinator stopped before settling")?
		.clone();
	println!("{}", coordinator.display());
	coordinator.dispose();

	if let RenderState::Error(message) = state {
		bail!("render failed: {message}");
	}
	Ok(())
}

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use folio_primitives::{ContentDescriptor, HttpMethod};

#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(about = "Block list scheduling and server render coordination")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Configuration file (defaults to ~/.config/folio/config.toml)
	#[arg(long, short = 'c', global = true, value_name = "PATH")]
	pub config: Option<PathBuf>,

	/// Verbose logging
	#[arg(long, short = 'v', global = true)]
	pub verbose: bool,

	/// Subcommand to execute.
	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// Render a block on the server and print the result
	Render {
		#[command(flatten)]
		block: BlockArgs,

		/// Server base URL (overrides render.base_url)
		#[arg(long, value_name = "URL")]
		base_url: Option<String>,
	},
	/// Print the request path for a block without fetching it
	Path {
		#[command(flatten)]
		block: BlockArgs,
	},
	/// Replay a visibility scenario and print the schedule after each batch
	Schedule {
		/// Scenario file (JSON)
		scenario: PathBuf,
	},
}

/// Block render request arguments shared by `render` and `path`.
#[derive(Args, Debug)]
pub struct BlockArgs {
	/// Block name, e.g. core/archives
	#[arg(long, short = 'b')]
	pub block: ContentDescriptor,

	/// Attribute as KEY=VALUE; VALUE is parsed as JSON when possible
	#[arg(long = "attr", short = 'a', value_name = "KEY=VALUE", value_parser = parse_key_value)]
	pub attrs: Vec<(String, String)>,

	/// Request method (overrides render.method)
	#[arg(long, short = 'm')]
	pub method: Option<HttpMethod>,

	/// Extra query argument as KEY=VALUE
	#[arg(long = "query", short = 'q', value_name = "KEY=VALUE", value_parser = parse_key_value)]
	pub query: Vec<(String, String)>,
}

fn parse_key_value(input: &str) -> Result<(String, String), String> {
	match input.split_once('=') {
		Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
		_ => Err(format!("expected KEY=VALUE, got {input:?}")),
	}
}

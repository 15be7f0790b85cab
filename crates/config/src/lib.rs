//! Configuration for Folio.
//!
//! Configuration is written in TOML. Every section and key is optional;
//! missing values fall back to the defaults shown here:
//!
//! ```toml
//! [scheduler]
//! threshold = 0.1          # visible fraction at which a block counts as on screen
//!
//! [render]
//! debounce_ms = 500        # quiet period before a changed block re-renders
//! path_prefix = "/render"
//! context = "edit"
//! method = "GET"           # or "POST" to send attributes in the body
//! base_url = "https://example.org/wp-json"   # no default
//! timeout_ms = 10000                          # no default
//!
//! [render.query_args]
//! post_id = "42"
//!
//! [log]
//! filter = "info"
//! ```
//!
//! Unknown keys are rejected so typos surface instead of being ignored.
//!
//! # Configuration Files
//!
//! Folio reads `$XDG_CONFIG_HOME/folio/config.toml` (or
//! `~/.config/folio/config.toml`) unless a path is given explicitly.

mod error;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub use error::{ConfigError, Result};
use folio_primitives::HttpMethod;
use folio_render::{CoordinatorOptions, DEFAULT_CONTEXT, DEFAULT_DEBOUNCE, DEFAULT_PATH_PREFIX, PathOptions};
use folio_visibility::DEFAULT_THRESHOLD;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Complete configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	pub scheduler: SchedulerConfig,
	pub render: RenderConfig,
	pub log: LogConfig,
}

/// `[scheduler]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchedulerConfig {
	pub threshold: f32,
}

impl Default for SchedulerConfig {
	fn default() -> Self {
		Self {
			threshold: DEFAULT_THRESHOLD,
		}
	}
}

/// `[render]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
	pub debounce_ms: u64,
	pub path_prefix: String,
	pub context: String,
	pub method: HttpMethod,
	pub base_url: Option<String>,
	pub timeout_ms: Option<u64>,
	pub query_args: BTreeMap<String, String>,
}

impl Default for RenderConfig {
	fn default() -> Self {
		Self {
			debounce_ms: DEFAULT_DEBOUNCE.as_millis() as u64,
			path_prefix: DEFAULT_PATH_PREFIX.to_string(),
			context: DEFAULT_CONTEXT.to_string(),
			method: HttpMethod::Get,
			base_url: None,
			timeout_ms: None,
			query_args: BTreeMap::new(),
		}
	}
}

impl RenderConfig {
	/// Coordinator options described by this section.
	pub fn coordinator_options(&self) -> CoordinatorOptions {
		CoordinatorOptions {
			debounce: Duration::from_millis(self.debounce_ms),
			path: PathOptions {
				prefix: self.path_prefix.clone(),
				context: self.context.clone(),
			},
		}
	}

	pub fn timeout(&self) -> Option<Duration> {
		self.timeout_ms.map(Duration::from_millis)
	}
}

/// `[log]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
	/// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
	pub filter: String,
}

impl Default for LogConfig {
	fn default() -> Self {
		Self {
			filter: "info".to_string(),
		}
	}
}

impl Config {
	/// Parses and validates configuration text.
	pub fn from_toml_str(input: &str) -> Result<Self> {
		let config: Self = toml::from_str(input)?;
		config.validate()?;
		Ok(config)
	}

	/// Loads and validates the file at `path`.
	pub fn load(path: &Path) -> Result<Self> {
		let input = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		let config = Self::from_toml_str(&input)?;
		debug!(path = %path.display(), "config.loaded");
		Ok(config)
	}

	/// Loads `path` when given, else the default location when it exists,
	/// else built-in defaults.
	pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
		if let Some(path) = path {
			return Self::load(path);
		}
		match default_path() {
			Some(path) if path.is_file() => Self::load(&path),
			_ => Ok(Self::default()),
		}
	}

	fn validate(&self) -> Result<()> {
		let threshold = self.scheduler.threshold;
		if !(0.0..=1.0).contains(&threshold) {
			return Err(ConfigError::Invalid {
				key: "scheduler.threshold",
				reason: format!("{threshold} is outside [0, 1]"),
			});
		}
		if !self.render.path_prefix.starts_with('/') {
			return Err(ConfigError::Invalid {
				key: "render.path_prefix",
				reason: format!("{:?} must start with '/'", self.render.path_prefix),
			});
		}
		if self.render.context.is_empty() {
			return Err(ConfigError::Invalid {
				key: "render.context",
				reason: "must not be empty".to_string(),
			});
		}
		if self.render.timeout_ms == Some(0) {
			return Err(ConfigError::Invalid {
				key: "render.timeout_ms",
				reason: "must be greater than zero".to_string(),
			});
		}
		Ok(())
	}
}

/// Default configuration file location.
pub fn default_path() -> Option<PathBuf> {
	dirs::config_dir().map(|dir| dir.join("folio").join("config.toml"))
}

#[cfg(test)]
mod tests;

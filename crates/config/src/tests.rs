use std::io::Write;

use pretty_assertions::assert_eq;

use super::*;

#[test]
fn test_empty_input_yields_defaults() {
	let config = Config::from_toml_str("").unwrap();
	assert_eq!(config, Config::default());
	assert_eq!(config.scheduler.threshold, 0.1);
	assert_eq!(config.render.debounce_ms, 500);
	assert_eq!(config.render.coordinator_options(), CoordinatorOptions::default());
}

#[test]
fn test_full_config() {
	let config = Config::from_toml_str(
		r#"
[scheduler]
threshold = 0.25

[render]
debounce_ms = 250
path_prefix = "/wp/v2/block-renderer"
method = "POST"
base_url = "https://example.org/wp-json"
timeout_ms = 3000

[render.query_args]
post_id = "42"

[log]
filter = "folio_render=debug"
"#,
	)
	.unwrap();

	assert_eq!(config.scheduler.threshold, 0.25);
	assert_eq!(config.render.method, HttpMethod::Post);
	assert_eq!(config.render.base_url.as_deref(), Some("https://example.org/wp-json"));
	assert_eq!(config.render.timeout(), Some(Duration::from_secs(3)));
	assert_eq!(config.render.query_args.get("post_id").map(String::as_str), Some("42"));
	assert_eq!(config.log.filter, "folio_render=debug");

	let options = config.render.coordinator_options();
	assert_eq!(options.debounce, Duration::from_millis(250));
	assert_eq!(options.path.prefix, "/wp/v2/block-renderer");
	assert_eq!(options.path.context, "edit");
}

#[test]
fn test_unknown_key_is_rejected() {
	let err = Config::from_toml_str("[render]\ndebounce = 10\n").unwrap_err();
	assert!(matches!(err, ConfigError::Toml(_)), "{err}");
}

#[test]
fn test_invalid_values_are_rejected() {
	let cases = [
		("[scheduler]\nthreshold = 1.5\n", "scheduler.threshold"),
		("[render]\npath_prefix = \"render\"\n", "render.path_prefix"),
		("[render]\ncontext = \"\"\n", "render.context"),
		("[render]\ntimeout_ms = 0\n", "render.timeout_ms"),
	];
	for (input, expected) in cases {
		match Config::from_toml_str(input) {
			Err(ConfigError::Invalid { key, .. }) => assert_eq!(key, expected),
			other => panic!("expected invalid {expected}, got {other:?}"),
		}
	}
}

#[test]
fn test_bad_method_is_rejected() {
	assert!(Config::from_toml_str("[render]\nmethod = \"PUT\"\n").is_err());
}

#[test]
fn test_load_from_file() {
	let mut file = tempfile::NamedTempFile::new().unwrap();
	writeln!(file, "[render]\ndebounce_ms = 120").unwrap();

	let config = Config::load_or_default(Some(file.path())).unwrap();
	assert_eq!(config.render.debounce_ms, 120);
}

#[test]
fn test_missing_explicit_file_is_an_error() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("absent.toml");
	match Config::load(&path) {
		Err(ConfigError::Io { path: reported, .. }) => assert_eq!(reported, path),
		other => panic!("expected I/O error, got {other:?}"),
	}
}

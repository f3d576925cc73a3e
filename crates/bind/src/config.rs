//! Engine configuration.
//!
//! Precedence, lowest first: built-in defaults, a TOML file, then the
//! `WEFT_SCHEMA_DIR` / `WEFT_DEFAULT_PROVIDER` / `WEFT_DIAGNOSTICS`
//! environment variables.

use std::path::{Path, PathBuf};

use serde::Deserialize;

pub const SCHEMA_DIR_ENV: &str = "WEFT_SCHEMA_DIR";
pub const DEFAULT_PROVIDER_ENV: &str = "WEFT_DEFAULT_PROVIDER";
pub const DIAGNOSTICS_ENV: &str = "WEFT_DIAGNOSTICS";

/// Name of the factory used when a member names no provider.
pub const DEFAULT_PROVIDER: &str = "default";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("failed to read {}: {source}", .path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
	#[error("invalid configuration: {0}")]
	Parse(#[from] toml::de::Error),
}

/// What the default diagnostic sink does with best-effort failures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticsMode {
	/// Emit each diagnostic as a `tracing` warning.
	#[default]
	Log,
	/// Drop them.
	Silent,
}

impl DiagnosticsMode {
	fn parse(value: &str) -> Option<Self> {
		match value.trim().to_ascii_lowercase().as_str() {
			"log" => Some(Self::Log),
			"silent" => Some(Self::Silent),
			_ => None,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct BindingConfig {
	/// Directory holding `<kind>.toml` schema bundles.
	pub schema_dir: Option<PathBuf>,
	pub default_provider: String,
	pub diagnostics: DiagnosticsMode,
}

impl Default for BindingConfig {
	fn default() -> Self {
		Self {
			schema_dir: None,
			default_provider: DEFAULT_PROVIDER.to_string(),
			diagnostics: DiagnosticsMode::default(),
		}
	}
}

impl BindingConfig {
	pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(content)?)
	}

	/// Reads a TOML file, then applies environment overrides.
	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		Ok(Self::from_toml_str(&content)?.with_env())
	}

	/// Defaults with environment overrides.
	pub fn from_env() -> Self {
		Self::default().with_env()
	}

	pub fn with_env(self) -> Self {
		self.with_overrides(|key| std::env::var(key).ok())
	}

	/// Applies overrides from `lookup`, keyed by environment variable name.
	pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
		if let Some(dir) = lookup(SCHEMA_DIR_ENV).filter(|v| !v.is_empty()) {
			self.schema_dir = Some(PathBuf::from(dir));
		}
		if let Some(provider) = lookup(DEFAULT_PROVIDER_ENV).filter(|v| !v.is_empty()) {
			self.default_provider = provider;
		}
		if let Some(raw) = lookup(DIAGNOSTICS_ENV) {
			match DiagnosticsMode::parse(&raw) {
				Some(mode) => self.diagnostics = mode,
				None => tracing::warn!(value = %raw, "ignoring unknown {DIAGNOSTICS_ENV}"),
			}
		}
		self
	}
}

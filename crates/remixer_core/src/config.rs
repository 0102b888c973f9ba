//! Registry configuration.
//!
//! Configuration is written in TOML. Every field is optional:
//!
//! ```toml
//! prune_on_register = true
//! symmetric_checks = false
//! discard_on_teardown = false
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// Behavior knobs for [`KeyedRegistry`](crate::KeyedRegistry).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
	/// Drop orphaned items before every registration.
	pub prune_on_register: bool,
	/// Also check `existing` against `incoming`, not just the reverse.
	pub symmetric_checks: bool,
	/// Discard a host's items when it is torn down instead of leaving them
	/// cleared until the next prune.
	pub discard_on_teardown: bool,
}

impl Default for RegistryConfig {
	fn default() -> Self {
		Self {
			prune_on_register: true,
			symmetric_checks: false,
			discard_on_teardown: false,
		}
	}
}

impl RegistryConfig {
	pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(input)?)
	}

	pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let input = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::from_toml_str(&input)
	}
}

//! Error types for items, the registry, and configuration.

use std::path::PathBuf;

use thiserror::Error;

use crate::item::ItemKind;

/// Why two items sharing a key cannot be treated as the same logical item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
	/// The items are of different concrete kinds.
	Kind { expected: ItemKind, found: ItemKind },
	/// Same kind, but the value types differ.
	ValueType {
		expected: &'static str,
		found: &'static str,
	},
	/// Same kind and value type, but validity constraints differ.
	Constraints(String),
}

impl std::fmt::Display for Mismatch {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Kind { expected, found } => {
				write!(f, "kind mismatch: expected {expected}, found {found}")
			}
			Self::ValueType { expected, found } => {
				write!(f, "value type mismatch: expected {expected}, found {found}")
			}
			Self::Constraints(detail) => write!(f, "constraint mismatch: {detail}"),
		}
	}
}

/// Two items with the same key are not interchangeable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("incompatible remixer items for key {key:?}: {mismatch}")]
pub struct IncompatibleItems {
	pub key: String,
	pub mismatch: Mismatch,
}

impl IncompatibleItems {
	pub fn new(key: impl Into<String>, mismatch: Mismatch) -> Self {
		Self {
			key: key.into(),
			mismatch,
		}
	}
}

/// Errors raised by item construction and queries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemError {
	/// A required live object or value was missing.
	#[error("invalid argument: {0}")]
	InvalidArgument(String),

	#[error(transparent)]
	Incompatible(#[from] IncompatibleItems),
}

/// Registration failures reported by [`KeyedRegistry`](crate::KeyedRegistry).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
	#[error("registration refused: {0}")]
	Incompatible(#[from] IncompatibleItems),

	/// The same live host registered the key twice.
	#[error("duplicate key {key:?} for host {host}")]
	DuplicateKey { key: String, host: String },
}

impl RegistryError {
	/// Returns the key the failed registration was for.
	pub fn key(&self) -> &str {
		match self {
			Self::Incompatible(err) => &err.key,
			Self::DuplicateKey { key, .. } => key,
		}
	}
}

/// Errors that can occur when loading registry configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing TOML syntax or schema.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},
}

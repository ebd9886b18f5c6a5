//! Errors produced by generation and by the bot configuration layer.
//!
//! Generation failures are non-fatal: callers branch on [`GenerateError`]
//! and usually fall back to unconditioned generation.

use std::{fmt, io};

/// Errors produced while synthesizing a sentence.
///
/// # Variants
///
/// - **KeyTooShort**: the supplied key has fewer tokens than the model order.
///   *Recovery*: ask the user for a longer key.
///
/// - **UnknownKey**: the lookup key has no transitions in the selected table.
///   Also returned when the table is empty (nothing to sample from).
///   *Recovery*: fall back to unconditioned generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
	/// The key holds `tokens` tokens but the model needs at least `order`.
	KeyTooShort { key: String, tokens: usize, order: usize },

	/// No transitions recorded for this key.
	UnknownKey(String),
}

impl fmt::Display for GenerateError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			GenerateError::KeyTooShort { key, tokens, order } => {
				write!(f, "key {key:?} has {tokens} token(s), at least {order} required")
			}
			GenerateError::UnknownKey(key) => write!(f, "no transitions recorded for key {key:?}"),
		}
	}
}

impl std::error::Error for GenerateError {}

/// Errors produced while loading or using the bot catalog.
#[derive(Debug)]
pub enum ConfigError {
	/// Catalog file could not be read.
	Io(io::Error),

	/// Catalog file is not valid JSON for a `BotCatalog`.
	Parse(serde_json::Error),

	/// A configuration value is out of range.
	Invalid(String),

	/// Neither the requested bot nor the default bot exists.
	UnknownBot(String),
}

impl fmt::Display for ConfigError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ConfigError::Io(e) => write!(f, "cannot read catalog: {e}"),
			ConfigError::Parse(e) => write!(f, "malformed catalog: {e}"),
			ConfigError::Invalid(msg) => write!(f, "invalid configuration: {msg}"),
			ConfigError::UnknownBot(name) => write!(f, "unknown bot {name:?} and no default bot"),
		}
	}
}

impl std::error::Error for ConfigError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			ConfigError::Io(e) => Some(e),
			ConfigError::Parse(e) => Some(e),
			_ => None,
		}
	}
}

impl From<io::Error> for ConfigError {
	fn from(e: io::Error) -> Self {
		ConfigError::Io(e)
	}
}

impl From<serde_json::Error> for ConfigError {
	fn from(e: serde_json::Error) -> Self {
		ConfigError::Parse(e)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn key_too_short_message_names_order() {
		let e = GenerateError::KeyTooShort { key: "cat".into(), tokens: 1, order: 2 };
		assert_eq!(e.to_string(), "key \"cat\" has 1 token(s), at least 2 required");
	}

	#[test]
	fn config_error_exposes_io_source() {
		let e = ConfigError::from(io::Error::new(io::ErrorKind::NotFound, "gone"));
		assert!(std::error::Error::source(&e).is_some());
		assert!(std::error::Error::source(&ConfigError::Invalid("x".into())).is_none());
	}
}

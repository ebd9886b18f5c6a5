use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Parameters of a sentence model.
///
/// The engine never falls back to hidden values: every `SentenceModel`
/// receives one of these at training time. `Default` provides the values
/// used by the stock catalog.
///
/// # Invariants (checked by `validate`)
/// - `order >= 1`
/// - `max_sentence_length >= 1`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct ModelConfig {
	/// Number of tokens forming a transition key.
	pub order: usize,

	/// Token count ceiling of a generated sentence.
	pub max_sentence_length: usize,

	/// A forward walk ends on a token whose last character is one of these.
	pub stop_symbols: Vec<char>,
}

impl Default for ModelConfig {
	fn default() -> Self {
		Self {
			order: 2,
			max_sentence_length: 20,
			stop_symbols: vec!['.', '"', ';', '!', '?'],
		}
	}
}

impl ModelConfig {
	/// Checks that the values can drive a walk.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.order == 0 {
			return Err(ConfigError::Invalid("order must be >= 1".to_owned()));
		}
		if self.max_sentence_length == 0 {
			return Err(ConfigError::Invalid("max_sentence_length must be >= 1".to_owned()));
		}
		Ok(())
	}

	/// Returns `true` if `c` ends a sentence.
	pub fn is_stop_symbol(&self, c: char) -> bool {
		self.stop_symbols.contains(&c)
	}
}

use std::collections::HashSet;

use log::{debug, trace};

use super::chooser::{Chooser, RngChooser};
use super::tokenizer;
use super::transition_table::TransitionTable;
use crate::config::ModelConfig;
use crate::error::GenerateError;

/// Which transition table a walk follows.
///
/// - `Forward`: reading order, stops on a sentence terminator.
/// - `Backward`: reversed reading order, stops on a capitalized token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
	Forward,
	Backward,
}

/// A trained bidirectional word-level Markov model.
///
/// Trained exactly once at construction and immutable afterwards, so a
/// model can be shared (e.g. behind an `Arc`) by concurrent callers
/// without locking. All randomness comes from the `Chooser` passed to the
/// `*_with` methods; the plain variants use the thread-local generator.
#[derive(Clone, Debug)]
pub struct SentenceModel {
	config: ModelConfig,
	forward: TransitionTable,
	backward: TransitionTable,
}

impl SentenceModel {
	/// Trains a model from raw documents.
	///
	/// See [`tokenizer::train`] for how documents are combined.
	pub fn train<S: AsRef<str>>(documents: &[S], config: ModelConfig) -> Self {
		let (forward, backward) = tokenizer::train(documents, config.order);
		Self { config, forward, backward }
	}

	pub fn config(&self) -> &ModelConfig {
		&self.config
	}

	pub fn forward(&self) -> &TransitionTable {
		&self.forward
	}

	pub fn backward(&self) -> &TransitionTable {
		&self.backward
	}

	fn table(&self, direction: Direction) -> &TransitionTable {
		match direction {
			Direction::Forward => &self.forward,
			Direction::Backward => &self.backward,
		}
	}

	/// Generates a sentence from a random forward key.
	///
	/// # Errors
	/// `GenerateError::UnknownKey` if the model was trained on an empty corpus.
	pub fn generate(&self) -> Result<String, GenerateError> {
		self.generate_with(&mut RngChooser::thread())
	}

	/// Same as [`generate`](Self::generate) with an explicit chooser.
	pub fn generate_with<C: Chooser>(&self, chooser: &mut C) -> Result<String, GenerateError> {
		let key = self
			.forward
			.random_key(chooser)
			.ok_or_else(|| GenerateError::UnknownKey(String::new()))?;
		self.generate_from_key_with(key, Direction::Forward, 0, chooser)
	}

	/// Continues a forward sentence from `key`.
	pub fn generate_from_key(&self, key: &str) -> Result<String, GenerateError> {
		self.generate_from_key_with(key, Direction::Forward, 0, &mut RngChooser::thread())
	}

	/// Random walk over the `direction` table starting at `key`.
	///
	/// `prior_length` is the number of tokens already produced by an earlier
	/// walk this one continues; it counts against `max_sentence_length`.
	///
	/// # Behavior
	/// - Tokens of `key` before the last `order` ones are emitted verbatim.
	/// - The walk ends on a stop-worthy token, or once the sentence reaches
	///   `max_sentence_length` tokens (the first step is always taken).
	/// - When the chain dead-ends with length budget left, the walk restarts
	///   from a random key of the same table.
	///
	/// # Errors
	/// - `KeyTooShort` if `key` has fewer than `order` tokens.
	/// - `UnknownKey` if its last `order` tokens were never seen.
	pub fn generate_from_key_with<C: Chooser>(
		&self,
		key: &str,
		direction: Direction,
		prior_length: usize,
		chooser: &mut C,
	) -> Result<String, GenerateError> {
		self.walk(key, direction, prior_length, chooser)
			.map(|sentence| sentence.join(" "))
	}

	fn walk<C: Chooser>(
		&self,
		key: &str,
		direction: Direction,
		prior_length: usize,
		chooser: &mut C,
	) -> Result<Vec<String>, GenerateError> {
		let order = self.config.order;
		let max_length = self.config.max_sentence_length;
		let table = self.table(direction);

		let key_tokens: Vec<&str> = key.split_whitespace().collect();
		if key_tokens.len() < order {
			return Err(GenerateError::KeyTooShort {
				key: key.to_owned(),
				tokens: key_tokens.len(),
				order,
			});
		}

		let mut current = key_tokens[key_tokens.len() - order..].join(" ");
		if !table.contains_key(&current) {
			return Err(GenerateError::UnknownKey(current));
		}

		// The literal prefix and the active key both open the sentence.
		let mut sentence: Vec<String> = key_tokens.iter().map(|t| (*t).to_owned()).collect();
		let mut length = prior_length + sentence.len();

		loop {
			// A key without transitions reads as an empty value.
			let value = table
				.get(&current)
				.and_then(|values| chooser.choose(values))
				.map_or("", String::as_str);

			if value.is_empty() {
				if length + order >= max_length {
					break;
				}
				let Some(restart) = table.random_key(chooser) else {
					break;
				};
				trace!("Chain ended at {current:?}, restarting from {restart:?}");
				sentence.extend(restart.split_whitespace().map(str::to_owned));
				length += order;
				current = restart.to_owned();
				continue;
			}

			sentence.push(value.to_owned());
			if self.is_stop_worthy(value, direction) {
				break;
			}

			current = sentence[sentence.len() - order..].join(" ");
			length = prior_length + sentence.len();
			if length >= max_length {
				break;
			}
		}

		Ok(sentence)
	}

	/// Forward: last character is a stop symbol. Backward: first character
	/// is uppercase.
	fn is_stop_worthy(&self, value: &str, direction: Direction) -> bool {
		match direction {
			Direction::Forward => value.chars().last().is_some_and(|c| self.config.is_stop_symbol(c)),
			Direction::Backward => value.chars().next().is_some_and(char::is_uppercase),
		}
	}

	/// Builds a reply continuing a user's sentence.
	pub fn respond(&self, seed: &str, stop_words: &HashSet<String>) -> Result<String, GenerateError> {
		self.respond_with(seed, stop_words, &mut RngChooser::thread())
	}

	/// Builds a reply around a random word of `seed`.
	///
	/// # Behavior
	/// - Picks one word of `seed` and every backward key containing it
	///   (substring match). No candidate: plain [`generate`](Self::generate).
	/// - Walks backward from a random candidate to find a sentence start,
	///   then forward from the same key to find its end, and splices both
	///   so the key appears once.
	/// - If the forward table does not know the key, the beginning is
	///   followed by an unconditioned sentence instead.
	///
	/// # Notes
	/// `stop_words` does not filter the picked word; a stop word is only
	/// reported in the debug log.
	pub fn respond_with<C: Chooser>(
		&self,
		seed: &str,
		stop_words: &HashSet<String>,
		chooser: &mut C,
	) -> Result<String, GenerateError> {
		let words: Vec<&str> = seed.split_whitespace().collect();
		let Some(word) = chooser.choose(&words).copied() else {
			return self.generate_with(chooser);
		};
		if stop_words.contains(word) {
			debug!("Seed word {word:?} is a stop word");
		}

		let candidates = self.backward.keys_containing(word);
		let Some(key) = chooser.choose(&candidates).copied() else {
			debug!("No backward key contains {word:?}, generating freely");
			return self.generate_with(chooser);
		};

		let mut sentence = self.walk(key, Direction::Backward, 0, chooser)?;
		sentence.reverse();

		let reversed_key = key.split_whitespace().rev().collect::<Vec<_>>().join(" ");
		match self.walk(&reversed_key, Direction::Forward, 0, chooser) {
			Ok(end) => {
				// `end` opens with the key already closing `sentence`.
				sentence.extend(end.into_iter().skip(self.config.order));
				Ok(sentence.join(" "))
			}
			Err(GenerateError::UnknownKey(_)) => {
				let rest = self.generate_with(chooser)?;
				Ok(format!("{} {}", sentence.join(" "), rest))
			}
			Err(e) => Err(e),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::chooser::ScriptedChooser;

	fn model(documents: &[&str]) -> SentenceModel {
		SentenceModel::train(documents, ModelConfig::default())
	}

	fn model_with_max(documents: &[&str], max_sentence_length: usize) -> SentenceModel {
		let config = ModelConfig { max_sentence_length, ..ModelConfig::default() };
		SentenceModel::train(documents, config)
	}

	fn token_count(s: &str) -> usize {
		s.split_whitespace().count()
	}

	#[test]
	fn short_key_is_rejected_whatever_the_table() {
		for m in [model(&[]), model(&["the cat sat on the mat"])] {
			let err = m.generate_from_key("cat").unwrap_err();
			assert_eq!(err, GenerateError::KeyTooShort { key: "cat".into(), tokens: 1, order: 2 });
			assert!(matches!(m.generate_from_key(""), Err(GenerateError::KeyTooShort { tokens: 0, .. })));
		}
	}

	#[test]
	fn unknown_trailing_window_is_rejected() {
		let m = model(&["the cat sat on the mat"]);
		assert_eq!(m.generate_from_key("the dog"), Err(GenerateError::UnknownKey("the dog".into())));
		assert_eq!(
			m.generate_from_key("the cat sat the dog"),
			Err(GenerateError::UnknownKey("the dog".into()))
		);
	}

	#[test]
	fn the_cat_continues_with_an_observed_word() {
		let m = model(&["the cat sat on the mat the cat ran"]);
		let mut chooser = RngChooser::seeded(3);
		for _ in 0..50 {
			let sentence = m.generate_from_key_with("the cat", Direction::Forward, 0, &mut chooser).unwrap();
			assert!(
				sentence.starts_with("the cat sat") || sentence.starts_with("the cat ran"),
				"{sentence}"
			);
		}
	}

	#[test]
	fn extra_key_tokens_are_a_literal_prefix() {
		let m = model(&["the cat sat on the mat. the cat ran."]);
		let sentence = m
			.generate_from_key_with("I saw the cat", Direction::Forward, 0, &mut ScriptedChooser::new(&[1]))
			.unwrap();
		assert_eq!(sentence, "I saw the cat ran.");
	}

	#[test]
	fn forward_walk_stops_on_terminator() {
		let m = model(&["the cat sat. the dog ran!"]);
		let mut chooser = ScriptedChooser::new(&[]);
		assert_eq!(m.generate_from_key_with("the cat", Direction::Forward, 0, &mut chooser).unwrap(), "the cat sat.");
		assert_eq!(m.generate_from_key_with("sat. the", Direction::Forward, 0, &mut chooser).unwrap(), "sat. the dog ran!");
	}

	#[test]
	fn backward_walk_stops_on_capital() {
		let m = model(&["Once upon a time there was"]);
		let sentence = m
			.generate_from_key_with("was there", Direction::Backward, 0, &mut ScriptedChooser::new(&[]))
			.unwrap();
		assert_eq!(sentence, "was there time a upon Once");
	}

	#[test]
	fn walk_without_terminator_is_capped() {
		let m = model_with_max(&["a b c a b c a b c"], 5);
		let sentence = m
			.generate_from_key_with("a b", Direction::Forward, 0, &mut ScriptedChooser::new(&[]))
			.unwrap();
		assert_eq!(sentence, "a b c a b");
	}

	#[test]
	fn prior_length_counts_against_the_cap() {
		let m = model_with_max(&["a b c a b c a b c"], 5);
		let sentence = m
			.generate_from_key_with("a b", Direction::Forward, 2, &mut ScriptedChooser::new(&[]))
			.unwrap();
		assert_eq!(sentence, "a b c");
	}

	#[test]
	fn dead_end_restarts_until_budget_is_spent() {
		let m = model(&["x y z"]);
		let sentence = m
			.generate_from_key_with("x y", Direction::Forward, 0, &mut ScriptedChooser::new(&[]))
			.unwrap();
		assert_eq!(sentence, ["x y z"; 6].join(" "));
		assert!(token_count(&sentence) <= 20);
	}

	#[test]
	fn generated_sentences_respect_max_length() {
		let m = model_with_max(
			&[
				"the quick brown fox jumps over the lazy dog and the quick cat",
				"sleeps under the brown tree while the lazy fox jumps again",
			],
			12,
		);
		let mut chooser = RngChooser::seeded(11);
		for _ in 0..200 {
			let sentence = m.generate_with(&mut chooser).unwrap();
			assert!(token_count(&sentence) <= 12, "{sentence}");
		}
	}

	#[test]
	fn empty_corpus_cannot_generate() {
		let m = model(&[]);
		assert!(matches!(m.generate(), Err(GenerateError::UnknownKey(_))));
		assert!(matches!(m.respond("hello there", &HashSet::new()), Err(GenerateError::UnknownKey(_))));
	}

	#[test]
	fn respond_stitches_backward_and_forward_walks() {
		let m = model(&["I think Magic is real."]);
		// word "Magic", then backward key "is Magic"
		let mut chooser = ScriptedChooser::new(&[2, 0]);
		let reply = m.respond_with("I love Magic", &HashSet::new(), &mut chooser).unwrap();
		assert_eq!(reply, "I think Magic is real.");
	}

	#[test]
	fn respond_is_case_sensitive() {
		let m = model(&["I think Magic is real."]);
		let seed = "magic";
		let reply = m.respond_with(seed, &HashSet::new(), &mut ScriptedChooser::new(&[])).unwrap();
		let free = m.generate_with(&mut ScriptedChooser::new(&[])).unwrap();
		assert!(m.backward().keys_containing(seed).is_empty());
		assert_eq!(reply, free);
	}

	#[test]
	fn respond_falls_back_when_forward_key_is_unknown() {
		let m = model(&["The end is near."]);
		let reply = m.respond_with("near", &HashSet::new(), &mut ScriptedChooser::new(&[])).unwrap();
		assert_eq!(reply, "The end is near. The end is near.");
	}

	#[test]
	fn stop_words_do_not_change_the_reply() {
		let m = model(&["I think Magic is real."]);
		let stop_words: HashSet<String> = ["Magic".to_owned(), "I".to_owned()].into();
		let plain = m.respond_with("I love Magic", &HashSet::new(), &mut ScriptedChooser::new(&[2, 1])).unwrap();
		let filtered = m.respond_with("I love Magic", &stop_words, &mut ScriptedChooser::new(&[2, 1])).unwrap();
		assert_eq!(plain, filtered);
	}

	#[test]
	fn empty_seed_generates_freely() {
		let m = model(&["The cat sat."]);
		let reply = m.respond_with("   ", &HashSet::new(), &mut ScriptedChooser::new(&[])).unwrap();
		assert_eq!(reply, "The cat sat.");
	}

	#[test]
	fn model_is_shareable() {
		fn assert_send_sync<T: Send + Sync>() {}
		assert_send_sync::<SentenceModel>();
	}
}

use std::collections::HashMap;
use std::sync::Arc;

use super::chooser::Chooser;

/// Transition table of a word-level Markov chain.
///
/// Maps a key (`order` consecutive tokens joined by single spaces) to every
/// token observed right after it. Repeated observations are all kept, so a
/// uniform pick over the list reproduces corpus frequencies.
///
/// ## Responsibilities:
/// - Accumulate transitions by sliding a window over a token stream
/// - Look up the continuations of a key
/// - Sample keys uniformly (for walk starts and restarts)
///
/// ## Invariants
/// - Every key maps to a non-empty list
/// - `keys` lists each key once, in first-seen order, sharing the map's allocation
/// - Value lists keep corpus scan order
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionTable {
	/// Number of tokens per key.
	order: usize,
	/// Example: { "the cat" => ["sat", "ran"] }
	transitions: HashMap<Arc<str>, Vec<String>>,
	keys: Vec<Arc<str>>,
}

impl TransitionTable {
	/// Creates an empty table for keys of `order` tokens.
	pub fn new(order: usize) -> Self {
		Self {
			order,
			transitions: HashMap::new(),
			keys: Vec::new(),
		}
	}

	pub fn order(&self) -> usize {
		self.order
	}

	/// Records every `order`-token window of `tokens` with the token that follows it.
	///
	/// # Notes
	/// - Streams shorter than `order + 1` add nothing.
	/// - The stream is taken as is: callers decide what it spans.
	pub fn add_tokens(&mut self, tokens: &[String]) {
		if tokens.len() <= self.order {
			return;
		}

		for i in 0..tokens.len() - self.order {
			let key = tokens[i..i + self.order].join(" ");
			let next = tokens[i + self.order].clone();

			match self.transitions.get_mut(key.as_str()) {
				Some(values) => values.push(next),
				None => {
					let key: Arc<str> = key.into();
					self.keys.push(Arc::clone(&key));
					self.transitions.insert(key, vec![next]);
				}
			}
		}
	}

	/// Returns the observed continuations of `key`, `None` if it was never seen.
	pub fn get(&self, key: &str) -> Option<&[String]> {
		self.transitions.get(key).map(Vec::as_slice)
	}

	pub fn contains_key(&self, key: &str) -> bool {
		self.transitions.contains_key(key)
	}

	/// All keys, in first-seen order.
	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.keys.iter().map(|key| &**key)
	}

	pub fn len(&self) -> usize {
		self.keys.len()
	}

	pub fn is_empty(&self) -> bool {
		self.keys.is_empty()
	}

	/// Picks a key uniformly. Returns `None` if the table is empty.
	pub fn random_key<C: Chooser>(&self, chooser: &mut C) -> Option<&str> {
		chooser.choose(&self.keys).map(|key| &**key)
	}

	/// Keys containing `fragment` as a substring (case sensitive).
	///
	/// This is plain containment, so `"agi"` matches `"Magic is"`.
	pub fn keys_containing(&self, fragment: &str) -> Vec<&str> {
		self.keys().filter(|key| key.contains(fragment)).collect()
	}
}

use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};

/// Uniform discrete choice over a candidate list.
///
/// Every random decision of a walk goes through this trait so that callers
/// can substitute a seeded or scripted source without touching generation
/// logic.
pub trait Chooser {
	/// Returns an index in `0..len`. Never called with `len == 0`.
	fn choose_index(&mut self, len: usize) -> usize;

	/// Picks one element of `items` uniformly, `None` if it is empty.
	fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
		if items.is_empty() {
			return None;
		}
		items.get(self.choose_index(items.len()))
	}
}

/// `Chooser` backed by any `rand` generator.
#[derive(Debug, Clone)]
pub struct RngChooser<R: Rng> {
	rng: R,
}

impl<R: Rng> RngChooser<R> {
	pub fn new(rng: R) -> Self {
		Self { rng }
	}
}

impl RngChooser<ThreadRng> {
	/// Chooser on the thread-local generator.
	pub fn thread() -> Self {
		Self::new(rand::rng())
	}
}

impl RngChooser<StdRng> {
	/// Reproducible chooser: the same seed replays the same choices.
	pub fn seeded(seed: u64) -> Self {
		Self::new(StdRng::seed_from_u64(seed))
	}
}

impl<R: Rng> Chooser for RngChooser<R> {
	fn choose_index(&mut self, len: usize) -> usize {
		self.rng.random_range(0..len)
	}
}

/// Replays a fixed list of indices, then keeps returning 0.
/// Indices out of range are clamped to the last candidate.
#[cfg(test)]
pub(crate) struct ScriptedChooser {
	script: std::collections::VecDeque<usize>,
}

#[cfg(test)]
impl ScriptedChooser {
	pub(crate) fn new(script: &[usize]) -> Self {
		Self { script: script.iter().copied().collect() }
	}
}

#[cfg(test)]
impl Chooser for ScriptedChooser {
	fn choose_index(&mut self, len: usize) -> usize {
		self.script.pop_front().unwrap_or(0).min(len - 1)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_list_has_no_choice() {
		let mut chooser = RngChooser::seeded(7);
		let items: [u8; 0] = [];
		assert_eq!(chooser.choose(&items), None);
	}

	#[test]
	fn seeded_choosers_agree() {
		let items: Vec<usize> = (0..100).collect();
		let mut a = RngChooser::seeded(42);
		let mut b = RngChooser::seeded(42);
		for _ in 0..20 {
			assert_eq!(a.choose(&items), b.choose(&items));
		}
	}

	#[test]
	fn every_candidate_is_reachable() {
		let items = ["a", "b", "c"];
		let mut chooser = RngChooser::seeded(1);
		let mut seen = [false; 3];
		for _ in 0..200 {
			seen[chooser.choose_index(items.len())] = true;
		}
		assert!(seen.iter().all(|s| *s));
	}
}

use log::debug;

use super::transition_table::TransitionTable;

/// Splits a document on whitespace and newlines, dropping empty tokens.
///
/// Case and punctuation are preserved: both drive the stop heuristics.
pub fn tokenize(document: &str) -> Vec<String> {
	document.split_whitespace().map(str::to_owned).collect()
}

/// Builds the forward and backward transition tables of a corpus.
///
/// Documents are concatenated in list order without any boundary marker,
/// so a key may span the end of one document and the start of the next.
/// The backward table is built from the same stream, reversed.
pub fn train<S: AsRef<str>>(documents: &[S], order: usize) -> (TransitionTable, TransitionTable) {
	let mut words: Vec<String> = Vec::new();
	for document in documents {
		words.extend(tokenize(document.as_ref()));
	}

	let mut forward = TransitionTable::new(order);
	forward.add_tokens(&words);

	words.reverse();
	let mut backward = TransitionTable::new(order);
	backward.add_tokens(&words);

	debug!(
		"Trained on {} documents, {} tokens: {} forward keys, {} backward keys",
		documents.len(),
		words.len(),
		forward.len(),
		backward.len()
	);

	(forward, backward)
}

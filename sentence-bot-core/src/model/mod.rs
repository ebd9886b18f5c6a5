//! Top-level module for the Markov sentence model.
//!
//! This module provides:
//! - Corpus tokenization and training (`tokenizer`)
//! - Word-level transition tables (`TransitionTable`)
//! - The trained bidirectional model and its generators (`SentenceModel`)
//! - The uniform random choice capability used by every walk (`Chooser`)

/// Trained forward/backward model with sentence and response generation.
pub mod sentence_model;

/// Whitespace tokenization and construction of both transition tables.
pub mod tokenizer;

/// Mapping from an `order`-token key to its observed continuations.
pub mod transition_table;

/// Injectable uniform choice (`rand`-backed or seeded).
pub mod chooser;

pub use chooser::{Chooser, RngChooser};
pub use sentence_model::{Direction, SentenceModel};
pub use transition_table::TransitionTable;

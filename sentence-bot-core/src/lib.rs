//! Markov-chain sentence generation library.
//!
//! This crate provides a word-level, bidirectional Markov sentence bot:
//! - Corpus tokenization into forward and backward transition tables
//! - Unconditioned and key-seeded random-walk sentence synthesis
//! - Conversational responses built by stitching a backward and a forward walk
//! - A catalog of named bots and a train-once cache of their models
//!
//! Trained models are immutable and can be shared across threads without locking.

/// Core Markov models and generation logic.
///
/// Exposes the trained `SentenceModel`, its transition tables and the
/// injectable random choice capability.
pub mod model;

/// Typed failures of generation and configuration.
pub mod error;

/// Generation parameters (order, sentence length, stop symbols).
pub mod config;

/// Named bot registry mapping a persona to its corpus files.
pub mod catalog;

/// Train-once cache of models keyed by bot name.
pub mod cache;

/// I/O utilities (corpus loading, stop words, directory listing).
pub mod io;

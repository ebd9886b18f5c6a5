use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

use crate::config::ModelConfig;
use crate::error::ConfigError;
use crate::io::{load_corpus, read_document};
use crate::model::SentenceModel;

/// Registry of named bots.
///
/// Each bot (persona) is a list of corpus file names relative to
/// `texts_dir`. All bots share the same `ModelConfig`.
///
/// Loaded from JSON, every field optional:
/// ```json
/// {
///   "texts_dir": "texts",
///   "default_bot": "Dante",
///   "model": { "order": 2, "max_sentence_length": 20 },
///   "bots": { "Dante": ["divine_comedy.txt"] }
/// }
/// ```
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct BotCatalog {
	/// Directory holding the corpus files.
	pub texts_dir: PathBuf,

	/// Bot used when a requested name is unknown.
	pub default_bot: String,

	pub model: ModelConfig,

	/// Bot name -> corpus file names.
	pub bots: BTreeMap<String, Vec<String>>,
}

fn files(names: &[&str]) -> Vec<String> {
	names.iter().map(|n| (*n).to_owned()).collect()
}

impl Default for BotCatalog {
	fn default() -> Self {
		let bots = BTreeMap::from([
			("HarryPotter".to_owned(), files(&["hp1.txt", "hp2.txt", "hp3.txt", "hp4.txt", "hp5.txt", "hp6.txt", "hp7.txt"])),
			("Tolkien".to_owned(), files(&["silmarillion.txt", "fellowship.txt", "two_towers.txt", "return.txt", "hobbit.txt"])),
			("DanBrown".to_owned(), files(&["deception_point.txt", "digital_fortress.txt", "angels_demons.txt", "davinci_code.txt"])),
			("Dante".to_owned(), files(&["divine_comedy.txt"])),
			("JaneAusten".to_owned(), files(&["pride.txt", "sense.txt", "persuasion.txt", "emma.txt"])),
			("HodgePodge".to_owned(), files(&["pride.txt", "hp7.txt", "divine_comedy.txt", "davinci_code.txt", "fellowship.txt"])),
			("Math".to_owned(), files(&["math_phil.txt", "logic.txt", "algebra.txt", "geometry.txt"])),
		]);

		Self {
			texts_dir: PathBuf::from("texts"),
			default_bot: "Dante".to_owned(),
			model: ModelConfig::default(),
			bots,
		}
	}
}

impl BotCatalog {
	/// Loads and validates a catalog from a JSON file.
	pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
		let catalog: Self = serde_json::from_str(&read_document(path)?)?;
		catalog.validate()?;
		Ok(catalog)
	}

	/// Checks the model parameters.
	pub fn validate(&self) -> Result<(), ConfigError> {
		self.model.validate()
	}

	/// Bot names, sorted.
	pub fn names(&self) -> Vec<String> {
		self.bots.keys().cloned().collect()
	}

	/// Returns the bot actually served for `name` and its corpus files.
	///
	/// Unknown names resolve to `default_bot`; `None` if that one is
	/// missing too.
	pub fn resolve(&self, name: &str) -> Option<(&str, &[String])> {
		self.bots
			.get_key_value(name)
			.or_else(|| self.bots.get_key_value(&self.default_bot))
			.map(|(name, files)| (name.as_str(), files.as_slice()))
	}

	/// Reads the corpus of `name` (or of the default bot) and trains a model.
	///
	/// # Errors
	/// `ConfigError::UnknownBot` if the name cannot be resolved.
	pub fn train(&self, name: &str) -> Result<SentenceModel, ConfigError> {
		let (resolved, files) = self
			.resolve(name)
			.ok_or_else(|| ConfigError::UnknownBot(name.to_owned()))?;
		Ok(self.train_files(resolved, files))
	}

	/// Trains a model on `files` under `texts_dir`; unreadable files are skipped.
	pub(crate) fn train_files(&self, name: &str, files: &[String]) -> SentenceModel {
		info!("Training {name}...");
		let documents = load_corpus(&self.texts_dir, files);
		SentenceModel::train(&documents, self.model.clone())
	}
}

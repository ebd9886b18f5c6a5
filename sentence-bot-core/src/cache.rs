use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use log::debug;

use crate::catalog::BotCatalog;
use crate::error::ConfigError;
use crate::model::SentenceModel;

type Slot = Arc<OnceLock<Arc<SentenceModel>>>;

/// Trained models keyed by bot name.
///
/// Owned by the application layer and shared by reference with request
/// handlers. Each bot is trained at most once, even when several callers
/// ask for it at the same time: the map lock is only held to fetch the
/// bot's slot, and training runs inside that slot's `OnceLock`, so other
/// bots stay available meanwhile.
#[derive(Debug, Default)]
pub struct BotCache {
	slots: Mutex<HashMap<String, Slot>>,
}

impl BotCache {
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the trained model of `name`, training it on first use.
	///
	/// Names resolve through the catalog first, so every alias of the
	/// default bot shares one model.
	///
	/// # Errors
	/// `ConfigError::UnknownBot` if the catalog cannot resolve `name`.
	pub fn get_or_train(&self, name: &str, catalog: &BotCatalog) -> Result<Arc<SentenceModel>, ConfigError> {
		let (resolved, files) = catalog
			.resolve(name)
			.ok_or_else(|| ConfigError::UnknownBot(name.to_owned()))?;

		let slot = self.slot(resolved);
		if let Some(model) = slot.get() {
			debug!("Trained model for {resolved} found");
			return Ok(Arc::clone(model));
		}

		let model = slot.get_or_init(|| Arc::new(catalog.train_files(resolved, files)));
		Ok(Arc::clone(model))
	}

	fn slot(&self, name: &str) -> Slot {
		let mut slots = self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
		Arc::clone(slots.entry(name.to_owned()).or_default())
	}

	/// Names of the bots trained so far, sorted.
	pub fn trained_names(&self) -> Vec<String> {
		let slots = self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
		let mut names: Vec<String> = slots
			.iter()
			.filter(|(_, slot)| slot.get().is_some())
			.map(|(name, _)| name.clone())
			.collect();
		names.sort();
		names
	}

	/// Returns `true` once the model of `name` (a resolved bot name) is ready.
	pub fn is_trained(&self, name: &str) -> bool {
		let slots = self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
		slots.get(name).is_some_and(|slot| slot.get().is_some())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::BTreeMap;
	use std::{fs, thread};
	use tempfile::{TempDir, tempdir};

	/// Two-bot catalog; the returned directory must outlive the catalog.
	fn catalog() -> (TempDir, BotCatalog) {
		let dir = tempdir().unwrap();
		fs::write(dir.path().join("one.txt"), "The first bot speaks.").unwrap();
		fs::write(dir.path().join("two.txt"), "The second bot answers.").unwrap();
		let catalog = BotCatalog {
			texts_dir: dir.path().to_path_buf(),
			default_bot: "One".to_owned(),
			bots: BTreeMap::from([
				("One".to_owned(), vec!["one.txt".to_owned()]),
				("Two".to_owned(), vec!["two.txt".to_owned()]),
			]),
			..BotCatalog::default()
		};
		(dir, catalog)
	}

	#[test]
	fn models_are_trained_once_and_shared() {
		let (_dir, catalog) = catalog();
		let cache = BotCache::new();
		assert!(cache.trained_names().is_empty());

		let first = cache.get_or_train("Two", &catalog).unwrap();
		let second = cache.get_or_train("Two", &catalog).unwrap();
		assert!(Arc::ptr_eq(&first, &second));
		assert_eq!(cache.trained_names(), ["Two"]);
		assert!(cache.is_trained("Two") && !cache.is_trained("One"));
		assert!(!cache.is_trained("Nobody"));
	}

	#[test]
	fn unknown_names_share_the_default_model() {
		let (_dir, catalog) = catalog();
		let cache = BotCache::new();
		let default = cache.get_or_train("One", &catalog).unwrap();
		let alias = cache.get_or_train("Nobody", &catalog).unwrap();
		assert!(Arc::ptr_eq(&default, &alias));
		assert_eq!(cache.trained_names(), ["One"]);
	}

	#[test]
	fn concurrent_first_requests_train_once() {
		let (_dir, catalog) = catalog();
		let cache = BotCache::new();

		let models: Vec<Arc<SentenceModel>> = thread::scope(|scope| {
			let handles: Vec<_> = (0..8)
				.map(|_| scope.spawn(|| cache.get_or_train("One", &catalog).unwrap()))
				.collect();
			handles.into_iter().map(|h| h.join().unwrap()).collect()
		});

		assert!(models.iter().all(|m| Arc::ptr_eq(m, &models[0])));
		assert_eq!(models[0].generate_from_key("first bot").unwrap(), "first bot speaks.");
	}

	#[test]
	fn unresolvable_name_is_an_error() {
		let catalog = BotCatalog { bots: BTreeMap::new(), ..BotCatalog::default() };
		let cache = BotCache::new();
		assert!(matches!(cache.get_or_train("One", &catalog), Err(ConfigError::UnknownBot(_))));
	}
}

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::{fs, io};

use log::{info, warn};

/// Reads a whole text file into memory.
pub fn read_document<P: AsRef<Path>>(filename: P) -> io::Result<String> {
	let mut contents = String::new();
	File::open(filename)?.read_to_string(&mut contents)?;
	Ok(contents)
}

/// Reads the corpus files `file_names` from `dir`, in list order.
///
/// Training is best-effort: a file that cannot be read is logged and
/// skipped. If every file fails the result is empty.
pub fn load_corpus<P: AsRef<Path>>(dir: P, file_names: &[String]) -> Vec<String> {
	let dir = dir.as_ref();
	let mut documents = Vec::with_capacity(file_names.len());

	for name in file_names {
		let path = dir.join(name);
		match read_document(&path) {
			Ok(text) => documents.push(text),
			Err(e) => warn!("Cannot open {}: {e}", path.display()),
		}
	}

	info!("Loaded {}/{} corpus files from {}", documents.len(), file_names.len(), dir.display());
	documents
}

/// Reads a whitespace-separated stop-word list.
pub fn read_stop_words<P: AsRef<Path>>(filename: P) -> io::Result<HashSet<String>> {
	Ok(read_document(filename)?
		.split_whitespace()
		.map(str::to_owned)
		.collect())
}

/// Lists all files with a given extension in a directory.
///
/// Returns sorted file names only (no paths).
pub fn list_files<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<String>> {
	let mut files = Vec::new();

	for entry in fs::read_dir(dir)? {
		let path = entry?.path();

		if path.is_file() && path.extension() == Some(std::ffi::OsStr::new(extension)) {
			if let Some(name) = path.file_name() {
				files.push(name.to_string_lossy().to_string());
			}
		}
	}

	files.sort();
	Ok(files)
}

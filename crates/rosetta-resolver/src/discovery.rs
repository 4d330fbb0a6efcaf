//! Finding catalog files on disk
//!
//! Catalogs are named `<prefix><language>.<ext>`, e.g. `QOwnNotes_ur.ts`,
//! and live in one of a list of directories. Earlier directories take
//! precedence and `.ts` is preferred over `.po` within a directory.

use crate::settings::TranslatorSettings;
use rosetta_catalog::{CatalogFormat, language};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Locates catalog files for language tags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogLocator {
	dirs: Vec<PathBuf>,
	prefix: String,
}

impl CatalogLocator {
	pub fn new<I, P>(dirs: I, prefix: impl Into<String>) -> Self
	where
		I: IntoIterator<Item = P>,
		P: Into<PathBuf>,
	{
		Self {
			dirs: dirs.into_iter().map(Into::into).collect(),
			prefix: prefix.into(),
		}
	}

	pub fn from_settings(settings: &TranslatorSettings) -> Self {
		Self::new(settings.catalog_dirs.iter().cloned(), settings.file_prefix.as_str())
	}

	pub fn dirs(&self) -> &[PathBuf] {
		&self.dirs
	}

	pub fn prefix(&self) -> &str {
		&self.prefix
	}

	/// Every path that would be tried for `language`, in order.
	///
	/// The tag is tried as given, then with `_`/`-` swapped, then as its
	/// bare language subtag.
	///
	/// # Example
	/// ```
	/// use rosetta_resolver::CatalogLocator;
	/// use std::path::PathBuf;
	///
	/// let locator = CatalogLocator::new(["translations"], "QOwnNotes_");
	/// let candidates = locator.candidates("ur_PK");
	///
	/// assert_eq!(candidates[0], PathBuf::from("translations/QOwnNotes_ur_PK.ts"));
	/// assert_eq!(candidates[1], PathBuf::from("translations/QOwnNotes_ur_PK.po"));
	/// assert_eq!(candidates.last().unwrap(), &PathBuf::from("translations/QOwnNotes_ur.po"));
	/// ```
	pub fn candidates(&self, language: &str) -> Vec<PathBuf> {
		let mut candidates = Vec::new();
		for tag in tag_variants(language) {
			for dir in &self.dirs {
				for format in CatalogFormat::ALL {
					candidates.push(dir.join(format!("{}{}.{}", self.prefix, tag, format.extension())));
				}
			}
		}
		candidates
	}

	/// First existing catalog file for `language`
	pub fn find(&self, language: &str) -> Option<PathBuf> {
		self.candidates(language)
			.into_iter()
			.find(|candidate| candidate.is_file())
	}

	/// All catalogs present in the configured directories, by language tag
	pub fn discover(&self) -> BTreeMap<String, PathBuf> {
		let mut found = BTreeMap::new();
		for dir in &self.dirs {
			let mut in_dir = self.scan(dir);
			in_dir.sort_by_key(|(language, format, _)| {
				let rank = CatalogFormat::ALL.iter().position(|f| f == format);
				(language.clone(), rank)
			});
			for (language, _, path) in in_dir {
				found.entry(language).or_insert(path);
			}
		}
		found
	}

	fn scan(&self, dir: &Path) -> Vec<(String, CatalogFormat, PathBuf)> {
		let entries = match std::fs::read_dir(dir) {
			Ok(entries) => entries,
			Err(err) => {
				tracing::debug!("cannot read catalog directory {}: {}", dir.display(), err);
				return Vec::new();
			}
		};

		entries
			.filter_map(Result::ok)
			.map(|entry| entry.path())
			.filter(|path| path.is_file())
			.filter_map(|path| {
				let format = CatalogFormat::from_path(&path)?;
				let stem = path.file_stem()?.to_str()?;
				let language = stem.strip_prefix(self.prefix.as_str())?;
				if !language::is_valid(language) {
					return None;
				}
				Some((language.to_string(), format, path))
			})
			.collect()
	}
}

fn tag_variants(language: &str) -> Vec<String> {
	let tag = language.trim();
	let mut variants: Vec<String> = Vec::with_capacity(4);
	for variant in [
		tag.to_string(),
		tag.replace('-', "_"),
		tag.replace('_', "-"),
		language::primary_language(tag),
	] {
		if !variant.is_empty() && !variants.contains(&variant) {
			variants.push(variant);
		}
	}
	variants
}

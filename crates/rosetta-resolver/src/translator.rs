//! Host-facing translator with a swappable active catalog
//!
//! The active [`CatalogStore`] sits behind an [`ArcSwap`]. Readers take a
//! snapshot without locking; switching language builds a complete store
//! first and then publishes it with one atomic swap, so a lookup sees
//! either the old catalog or the new one, never a mix.

use crate::args::Arg;
use crate::discovery::CatalogLocator;
use crate::error::{LanguageLoadError, LoadFailure};
use crate::resolver::{Message, MessageResolver, Resolved};
use crate::settings::TranslatorSettings;
use arc_swap::ArcSwap;
use rosetta_catalog::{CatalogStore, LoadOptions, PluralRules, language};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Resolves messages against the currently active language.
///
/// Share it with `Arc<Translator>`; every method takes `&self`.
///
/// # Example
/// ```no_run
/// use rosetta_resolver::{Translator, TranslatorSettings};
///
/// let settings = TranslatorSettings::new().with_file_prefix("QOwnNotes_");
/// let translator = Translator::new(settings);
///
/// if let Err(err) = translator.initialize("ur") {
///     eprintln!("{}", err);
/// }
/// let text = translator.translate("MainWindow", "%n lines moved.", "", Some(7), &[]);
/// println!("{} ({})", text, translator.current_language());
/// ```
#[derive(Debug)]
pub struct Translator {
	settings: TranslatorSettings,
	locator: CatalogLocator,
	load_options: LoadOptions,
	active: ArcSwap<CatalogStore>,
}

impl Translator {
	/// Create a translator that passes source strings through until
	/// [`initialize`](Self::initialize) is called
	pub fn new(settings: TranslatorSettings) -> Self {
		let locator = CatalogLocator::from_settings(&settings);
		let load_options = LoadOptions::new().with_duplicate_policy(settings.duplicate_policy);
		let active = ArcSwap::from_pointee(CatalogStore::empty(settings.source_language.as_str()));
		Self {
			settings,
			locator,
			load_options,
			active,
		}
	}

	/// Use a custom plural rule table for catalogs loaded from now on
	pub fn with_plural_rules(mut self, rules: PluralRules) -> Self {
		self.load_options = self.load_options.with_plural_rules(rules);
		self
	}

	pub fn settings(&self) -> &TranslatorSettings {
		&self.settings
	}

	pub fn locator(&self) -> &CatalogLocator {
		&self.locator
	}

	/// Activate `language`.
	///
	/// Requesting the source language installs the passthrough catalog.
	/// When the requested catalog cannot be found or parsed, the configured
	/// fallback languages are tried in order, then the source language; the
	/// language that ends up active is reported in the error.
	pub fn initialize(&self, language: &str) -> Result<(), LanguageLoadError> {
		if language::same_language(language, &self.settings.source_language)
			|| language::same_language(
				&language::primary_language(language),
				&self.settings.source_language,
			) {
			self.reset();
			return Ok(());
		}

		match self.load(language) {
			Ok(store) => {
				self.install(store);
				Ok(())
			}
			Err(cause) => {
				let fallback = self.activate_fallback(language);
				tracing::warn!(
					"cannot load catalog for '{}' ({}), falling back to '{}'",
					language,
					cause,
					fallback
				);
				Err(LanguageLoadError {
					language: language.to_string(),
					fallback,
					cause,
				})
			}
		}
	}

	/// Find and parse the catalog for `language` without activating it
	pub fn load(&self, language: &str) -> Result<CatalogStore, LoadFailure> {
		let path = self
			.locator
			.find(language)
			.ok_or_else(|| LoadFailure::NotFound {
				searched: self.locator.candidates(language),
			})?;
		let options = self.load_options.clone().with_language_hint(language);
		Ok(CatalogStore::load_with(&path, &options)?)
	}

	fn activate_fallback(&self, requested: &str) -> String {
		for candidate in &self.settings.fallback_languages {
			if language::same_language(candidate, requested) {
				continue;
			}
			if language::same_language(candidate, &self.settings.source_language) {
				break;
			}
			match self.load(candidate) {
				Ok(store) => {
					self.install(store);
					return candidate.clone();
				}
				Err(err) => {
					tracing::warn!("fallback language '{}' is unavailable: {}", candidate, err)
				}
			}
		}

		self.reset();
		self.settings.source_language.clone()
	}

	/// Publish a store as the active catalog
	pub fn install(&self, store: CatalogStore) {
		tracing::info!(
			"activated catalog '{}' with {} messages{}",
			store.language_code(),
			store.len(),
			store
				.path()
				.map(|path| format!(" from {}", path.display()))
				.unwrap_or_default()
		);
		self.active.store(Arc::new(store));
	}

	/// Return to source-language passthrough
	pub fn reset(&self) {
		self.install(CatalogStore::empty(self.settings.source_language.as_str()));
	}

	/// The active catalog; unaffected by later language switches
	pub fn snapshot(&self) -> Arc<CatalogStore> {
		self.active.load_full()
	}

	/// Language tag of the active catalog, as declared by its file
	pub fn current_language(&self) -> String {
		self.active.load().language_code().to_string()
	}

	/// Languages with a discoverable catalog, plus the source language
	pub fn available_languages(&self) -> BTreeSet<String> {
		let mut languages: BTreeSet<String> = self.locator.discover().into_keys().collect();
		languages.insert(self.settings.source_language.clone());
		languages
	}

	/// Resolve to the display string; never fails
	pub fn translate(
		&self,
		context: &str,
		source_text: &str,
		comment: &str,
		count: Option<i64>,
		args: &[Arg],
	) -> String {
		let store = self.active.load();
		MessageResolver::new(&store).translate(context, source_text, comment, count, args)
	}

	/// Resolve, reporting which lookup tier was used
	pub fn resolve(&self, message: &Message<'_>) -> Resolved {
		let store = self.active.load();
		MessageResolver::new(&store).resolve(message)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::resolver::Outcome;
	use rstest::rstest;
	use std::fs;
	use tempfile::TempDir;

	const UR_CATALOG: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE TS>
<TS version="2.1" language="ur">
<context>
    <name>MainWindow</name>
    <message>
        <source>Copy</source>
        <translation>کاپی کریں</translation>
    </message>
</context>
</TS>
"#;

	fn translator_with(files: &[(&str, &str)], settings: TranslatorSettings) -> (TempDir, Translator) {
		let dir = TempDir::new().unwrap();
		for (name, content) in files {
			fs::write(dir.path().join(name), content).unwrap();
		}
		let settings = settings.with_catalog_dirs([dir.path()]);
		(dir, Translator::new(settings))
	}

	#[rstest]
	fn test_starts_in_passthrough() {
		let translator = Translator::new(TranslatorSettings::default());

		assert_eq!(translator.current_language(), "en");
		assert_eq!(translator.translate("MainWindow", "Copy", "", None, &[]), "Copy");
	}

	#[rstest]
	fn test_initialize_loads_catalog() {
		// Arrange
		let (_dir, translator) = translator_with(&[("ur.ts", UR_CATALOG)], TranslatorSettings::default());

		// Act
		translator.initialize("ur").unwrap();

		// Assert
		assert_eq!(translator.current_language(), "ur");
		assert_eq!(
			translator.translate("MainWindow", "Copy", "", None, &[]),
			"کاپی کریں"
		);
	}

	#[rstest]
	#[case("en")]
	#[case("en_US")]
	fn test_initialize_source_language_is_passthrough(#[case] language: &str) {
		let (_dir, translator) = translator_with(&[("ur.ts", UR_CATALOG)], TranslatorSettings::default());
		translator.initialize("ur").unwrap();

		translator.initialize(language).unwrap();

		assert_eq!(translator.current_language(), "en");
		assert_eq!(translator.translate("MainWindow", "Copy", "", None, &[]), "Copy");
	}

	#[rstest]
	fn test_missing_language_falls_back_to_source() {
		let (_dir, translator) = translator_with(&[("ur.ts", UR_CATALOG)], TranslatorSettings::default());
		translator.initialize("ur").unwrap();

		let err = translator.initialize("fr").unwrap_err();

		assert_eq!(err.language, "fr");
		assert_eq!(err.fallback, "en");
		assert!(matches!(err.cause, LoadFailure::NotFound { ref searched } if !searched.is_empty()));
		assert_eq!(translator.current_language(), "en");
		let resolved = translator.resolve(&Message::new("MainWindow", "Copy"));
		assert_eq!(resolved.outcome, Outcome::SourceFallback);
	}

	#[rstest]
	fn test_broken_catalog_falls_back_to_configured_language() {
		// Arrange
		let settings = TranslatorSettings::default().with_fallback_languages(["de", "ur"]);
		let (_dir, translator) = translator_with(
			&[("ur.ts", UR_CATALOG), ("fr.ts", "<TS language=\"fr\"><context>")],
			settings,
		);

		// Act
		let err = translator.initialize("fr").unwrap_err();

		// Assert
		assert!(matches!(err.cause, LoadFailure::Parse(_)));
		assert_eq!(err.fallback, "ur");
		assert_eq!(translator.current_language(), "ur");
	}

	#[rstest]
	fn test_available_languages() {
		let (_dir, translator) = translator_with(
			&[("ur.ts", UR_CATALOG), ("de.po", ""), ("notes.txt", "")],
			TranslatorSettings::default(),
		);

		let languages = translator.available_languages();

		assert_eq!(
			languages.into_iter().collect::<Vec<_>>(),
			vec!["de", "en", "ur"]
		);
	}

	#[rstest]
	fn test_snapshot_survives_language_switch() {
		let (_dir, translator) = translator_with(&[("ur.ts", UR_CATALOG)], TranslatorSettings::default());
		translator.initialize("ur").unwrap();
		let snapshot = translator.snapshot();

		translator.reset();

		assert_eq!(snapshot.language_code(), "ur");
		assert_eq!(snapshot.len(), 1);
		assert_eq!(translator.current_language(), "en");
	}
}

//! Immutable, indexed catalog for one language

use crate::document::{CatalogDocument, CatalogStats};
use crate::entry::{CatalogEntry, MessageKey, Status};
use crate::error::{DuplicateKeyError, ParseError, WriteError};
use crate::format::{CatalogFormat, ParseOptions};
use crate::language;
use crate::plural::{PluralRule, PluralRules};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// What to do when two live messages share a key but translate differently
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
	/// Keep the first occurrence and log a warning
	#[default]
	FirstWins,
	/// Reject the catalog with [`ParseError::DuplicateKey`]
	Reject,
}

impl fmt::Display for DuplicatePolicy {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::FirstWins => f.write_str("first-wins"),
			Self::Reject => f.write_str("reject"),
		}
	}
}

/// Returned when parsing an unknown [`DuplicatePolicy`] name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown duplicate policy '{0}', expected 'first-wins' or 'reject'")]
pub struct UnknownPolicyError(pub String);

impl FromStr for DuplicatePolicy {
	type Err = UnknownPolicyError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"first-wins" | "first_wins" | "firstwins" => Ok(Self::FirstWins),
			"reject" => Ok(Self::Reject),
			_ => Err(UnknownPolicyError(s.to_string())),
		}
	}
}

/// Options for building a [`CatalogStore`]
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
	/// Language the caller expects; used when the file does not declare one
	pub language_hint: Option<String>,
	pub duplicate_policy: DuplicatePolicy,
	pub plural_rules: PluralRules,
}

impl LoadOptions {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_language_hint(mut self, language: impl Into<String>) -> Self {
		self.language_hint = Some(language.into());
		self
	}

	pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
		self.duplicate_policy = policy;
		self
	}

	pub fn with_plural_rules(mut self, rules: PluralRules) -> Self {
		self.plural_rules = rules;
		self
	}
}

/// Findings collected while indexing a catalog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
	/// Conflicting duplicates whose later occurrence was ignored
	pub duplicates: Vec<DuplicateKeyError>,
	/// Identical duplicates folded into their first occurrence
	pub merged: usize,
}

/// A parsed catalog with its lookup index.
///
/// A store is complete once constructed: every constructor either returns a
/// fully indexed store or an error, and nothing mutates it afterwards, so a
/// shared reference can be read from any number of threads.
///
/// Obsolete messages stay in the [`document`](Self::document) but are not
/// reachable through [`lookup`](Self::lookup).
///
/// # Example
/// ```
/// use rosetta_catalog::{CatalogDocument, CatalogEntry, CatalogStore, LoadOptions};
///
/// let document = CatalogDocument::new("ur_PK")
///     .with_entry(CatalogEntry::new("MainWindow", "Copy").with_translation("کاپی کریں"))
///     .with_entry(
///         CatalogEntry::new("MainWindow", "Copy")
///             .with_comment("as noun")
///             .with_translation("نقل"),
///     );
///
/// let store = CatalogStore::from_document(document, &LoadOptions::new()).unwrap();
///
/// let noun = store.lookup("MainWindow", "Copy", "as noun").unwrap();
/// assert_eq!(noun.translations[0], "نقل");
/// assert!(store.lookup("MainWindow", "Paste", "").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct CatalogStore {
	document: CatalogDocument,
	/// Key to (context block, message) position in the document
	index: HashMap<MessageKey, (usize, usize)>,
	plural_rule: PluralRule,
	report: LoadReport,
	path: Option<PathBuf>,
}

impl CatalogStore {
	/// Load a catalog file with default options
	pub fn load(path: impl AsRef<Path>) -> Result<Self, ParseError> {
		Self::load_with(path, &LoadOptions::default())
	}

	/// Load a catalog file; the format is chosen from the extension
	pub fn load_with(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Self, ParseError> {
		let path = path.as_ref();
		let format =
			CatalogFormat::from_path(path).ok_or_else(|| ParseError::UnsupportedFormat {
				path: path.to_path_buf(),
			})?;
		let input = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
			path: path.to_path_buf(),
			source,
		})?;

		let mut store = Self::parse(&input, format, options)?;
		store.path = Some(path.to_path_buf());
		tracing::debug!(
			"loaded catalog {} ({} messages indexed)",
			path.display(),
			store.len()
		);
		Ok(store)
	}

	/// Parse catalog text in the given format
	pub fn parse(input: &str, format: CatalogFormat, options: &LoadOptions) -> Result<Self, ParseError> {
		let parse_options = ParseOptions {
			language_hint: options.language_hint.clone(),
		};
		let document = format.codec().parse(input, &parse_options)?;
		Self::from_document(document, options)
	}

	/// Validate and index a document
	pub fn from_document(document: CatalogDocument, options: &LoadOptions) -> Result<Self, ParseError> {
		if !language::is_valid(&document.language) {
			return Err(ParseError::InvalidLanguage(document.language));
		}
		if let Some(hint) = &options.language_hint
			&& !language::same_language(hint, &document.language)
		{
			tracing::warn!(
				"catalog declares language '{}' but '{}' was requested",
				document.language,
				hint
			);
		}

		let plural_rule = options.plural_rules.rule_for(&document.language);
		let mut index = HashMap::new();
		let mut report = LoadReport::default();

		for (block_index, block) in document.contexts.iter().enumerate() {
			for (message_index, entry) in block.messages.iter().enumerate() {
				if entry.status == Status::Obsolete {
					continue;
				}
				check_plural_forms(entry, &document.language, plural_rule)?;

				match index.entry(entry.key()) {
					Entry::Vacant(slot) => {
						slot.insert((block_index, message_index));
					}
					Entry::Occupied(slot) => {
						let (kept_block, kept_message) = *slot.get();
						let kept = &document.contexts[kept_block].messages[kept_message];
						if kept.translations == entry.translations && kept.numerus == entry.numerus {
							tracing::debug!("merged identical duplicate of {}", slot.key());
							report.merged += 1;
							continue;
						}

						let conflict = DuplicateKeyError {
							key: slot.key().clone(),
							kept: kept.translations.clone(),
							ignored: entry.translations.clone(),
						};
						match options.duplicate_policy {
							DuplicatePolicy::Reject => return Err(conflict.into()),
							DuplicatePolicy::FirstWins => {
								tracing::warn!(
									"duplicate message {} with conflicting translations, keeping the first",
									conflict.key
								);
								report.duplicates.push(conflict);
							}
						}
					}
				}
			}
		}

		Ok(Self {
			document,
			index,
			plural_rule,
			report,
			path: None,
		})
	}

	/// A store with no messages; every lookup misses
	pub fn empty(language: impl Into<String>) -> Self {
		let document = CatalogDocument::new(language);
		let plural_rule = PluralRules::standard().rule_for(&document.language);
		Self {
			document,
			index: HashMap::new(),
			plural_rule,
			report: LoadReport::default(),
			path: None,
		}
	}

	/// Find the live message for an exact key; an empty comment means none
	pub fn lookup(&self, context: &str, source_text: &str, comment: &str) -> Option<&CatalogEntry> {
		self.lookup_key(&MessageKey::new(context, source_text, comment))
	}

	pub fn lookup_key(&self, key: &MessageKey) -> Option<&CatalogEntry> {
		let &(block, message) = self.index.get(key)?;
		self.document
			.contexts
			.get(block)
			.and_then(|block| block.messages.get(message))
	}

	/// Target language tag as declared by the catalog
	pub fn language_code(&self) -> &str {
		&self.document.language
	}

	pub fn source_language(&self) -> Option<&str> {
		self.document.source_language.as_deref()
	}

	/// Plural rule of the target language
	pub fn plural_rule(&self) -> PluralRule {
		self.plural_rule
	}

	pub fn document(&self) -> &CatalogDocument {
		&self.document
	}

	pub fn report(&self) -> &LoadReport {
		&self.report
	}

	pub fn stats(&self) -> CatalogStats {
		self.document.stats()
	}

	/// Number of indexed (live, distinct) messages
	pub fn len(&self) -> usize {
		self.index.len()
	}

	pub fn is_empty(&self) -> bool {
		self.index.is_empty()
	}

	/// File the store was loaded from, if any
	pub fn path(&self) -> Option<&Path> {
		self.path.as_deref()
	}

	/// Write the document back, in the format named by the extension
	pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), WriteError> {
		let path = path.as_ref();
		let format =
			CatalogFormat::from_path(path).ok_or_else(|| WriteError::UnsupportedFormat {
				path: path.to_path_buf(),
			})?;
		let output = format.codec().write(&self.document)?;
		std::fs::write(path, output)?;
		Ok(())
	}
}

/// Plural messages must carry one form per plural category of the language.
/// Messages without any form yet are left to fall back to the source text.
fn check_plural_forms(entry: &CatalogEntry, language: &str, rule: PluralRule) -> Result<(), ParseError> {
	if !entry.numerus || entry.translations.is_empty() {
		return Ok(());
	}
	let expected = rule.form_count();
	if entry.translations.len() != expected {
		return Err(ParseError::PluralFormMismatch {
			key: entry.key(),
			language: language.to_string(),
			expected,
			found: entry.translations.len(),
		});
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::{fixture, rstest};

	#[fixture]
	fn document() -> CatalogDocument {
		let mut obsolete = CatalogEntry::new("MainWindow", "Old action").with_translation("پرانا");
		obsolete.status = Status::Obsolete;

		CatalogDocument::new("ur_PK")
			.with_source_language("en")
			.with_entry(CatalogEntry::new("MainWindow", "Copy").with_translation("کاپی کریں"))
			.with_entry(
				CatalogEntry::new("MainWindow", "Copy")
					.with_comment("as noun")
					.with_translation("نقل"),
			)
			.with_entry(
				CatalogEntry::new("MainWindow", "%n lines moved.")
					.with_plural_translations(["نوٹ منتقل ہوگئی", "نوٹیں منتقل ہوگئیں"]),
			)
			.with_entry(obsolete)
	}

	#[rstest]
	fn test_lookup_by_full_key(document: CatalogDocument) {
		// Arrange
		let store = CatalogStore::from_document(document, &LoadOptions::new()).unwrap();

		// Act
		let verb = store.lookup("MainWindow", "Copy", "");
		let noun = store.lookup("MainWindow", "Copy", "as noun");

		// Assert
		assert_eq!(verb.unwrap().translations[0], "کاپی کریں");
		assert_eq!(noun.unwrap().translations[0], "نقل");
		assert_eq!(store.language_code(), "ur_PK");
		assert_eq!(store.source_language(), Some("en"));
		assert_eq!(store.len(), 3);
	}

	#[rstest]
	fn test_obsolete_messages_are_not_indexed(document: CatalogDocument) {
		let store = CatalogStore::from_document(document, &LoadOptions::new()).unwrap();

		assert!(store.lookup("MainWindow", "Old action", "").is_none());
		assert_eq!(store.stats().obsolete, 1);
	}

	#[rstest]
	fn test_lookup_misses_on_other_context(document: CatalogDocument) {
		let store = CatalogStore::from_document(document, &LoadOptions::new()).unwrap();

		assert!(store.lookup("SettingsDialog", "Copy", "").is_none());
		assert!(store.lookup("MainWindow", "Copy", "as verb").is_none());
	}

	#[rstest]
	fn test_plural_form_count_must_match_language(document: CatalogDocument) {
		// Arrange
		let document = document.with_entry(
			CatalogEntry::new("MainWindow", "%n notes").with_plural_translations(["ایک", "دو", "تین"]),
		);

		// Act
		let result = CatalogStore::from_document(document, &LoadOptions::new());

		// Assert
		match result {
			Err(ParseError::PluralFormMismatch {
				expected, found, ..
			}) => {
				assert_eq!(expected, 2);
				assert_eq!(found, 3);
			}
			other => panic!("expected plural mismatch, got {:?}", other),
		}
	}

	#[rstest]
	fn test_plural_count_follows_custom_rule() {
		let document = CatalogDocument::new("ur").with_entry(
			CatalogEntry::new("MainWindow", "%n notes").with_plural_translations(["ایک", "دو", "تین"]),
		);
		let rules = PluralRules::standard().with_rule("ur", PluralRule::custom(3, |n| n.min(2) as usize));
		let options = LoadOptions::new().with_plural_rules(rules);

		let store = CatalogStore::from_document(document, &options).unwrap();

		assert_eq!(store.plural_rule().form_count(), 3);
	}

	#[rstest]
	fn test_identical_duplicates_merge(document: CatalogDocument) {
		let document = document.with_entry(
			CatalogEntry::new("MainWindow", "Copy")
				.with_translation("کاپی کریں")
				.with_location("../src/mainwindow.cpp", "812"),
		);

		let store = CatalogStore::from_document(document, &LoadOptions::new()).unwrap();

		assert_eq!(store.report().merged, 1);
		assert!(store.report().duplicates.is_empty());
	}

	#[rstest]
	fn test_conflicting_duplicate_keeps_first(document: CatalogDocument) {
		let document =
			document.with_entry(CatalogEntry::new("MainWindow", "Copy").with_translation("نقل کریں"));

		let store = CatalogStore::from_document(document, &LoadOptions::new()).unwrap();

		assert_eq!(
			store.lookup("MainWindow", "Copy", "").unwrap().translations[0],
			"کاپی کریں"
		);
		assert_eq!(store.report().duplicates.len(), 1);
		assert_eq!(store.report().duplicates[0].ignored, vec!["نقل کریں".to_string()]);
	}

	#[rstest]
	fn test_conflicting_duplicate_rejected_by_policy(document: CatalogDocument) {
		let document =
			document.with_entry(CatalogEntry::new("MainWindow", "Copy").with_translation("نقل کریں"));
		let options = LoadOptions::new().with_duplicate_policy(DuplicatePolicy::Reject);

		let result = CatalogStore::from_document(document, &options);

		assert!(matches!(result, Err(ParseError::DuplicateKey(_))));
	}

	#[rstest]
	fn test_invalid_language_is_rejected() {
		let result = CatalogStore::from_document(CatalogDocument::new(" "), &LoadOptions::new());

		assert!(matches!(result, Err(ParseError::InvalidLanguage(_))));
	}

	#[rstest]
	fn test_empty_store() {
		let store = CatalogStore::empty("en");

		assert!(store.is_empty());
		assert!(store.lookup("MainWindow", "Copy", "").is_none());
		assert_eq!(store.language_code(), "en");
	}

	#[rstest]
	#[case("first-wins", DuplicatePolicy::FirstWins)]
	#[case("FIRST_WINS", DuplicatePolicy::FirstWins)]
	#[case(" reject ", DuplicatePolicy::Reject)]
	fn test_duplicate_policy_from_str(#[case] input: &str, #[case] expected: DuplicatePolicy) {
		assert_eq!(input.parse::<DuplicatePolicy>(), Ok(expected));
	}

	#[rstest]
	fn test_unknown_duplicate_policy() {
		assert_eq!(
			"last-wins".parse::<DuplicatePolicy>(),
			Err(UnknownPolicyError("last-wins".to_string()))
		);
	}
}

//! Catalog entries and the key they are looked up by

use serde::Serialize;
use std::fmt;

/// Lookup key of a message: context, source text and disambiguating comment.
///
/// The three parts are kept as separate fields, so a source string that
/// happens to contain a separator character can never collide with a
/// different key. An absent comment and an empty comment are the same key.
///
/// # Example
/// ```
/// use rosetta_catalog::MessageKey;
///
/// let noun = MessageKey::new("MainWindow", "Copy", "as noun");
/// let verb = MessageKey::new("MainWindow", "Copy", "");
///
/// assert_ne!(noun, verb);
/// assert_eq!(verb, MessageKey::new("MainWindow", "Copy", ""));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MessageKey {
	context: String,
	source_text: String,
	comment: String,
}

impl MessageKey {
	/// Create a key from its three parts
	pub fn new(
		context: impl Into<String>,
		source_text: impl Into<String>,
		comment: impl Into<String>,
	) -> Self {
		Self {
			context: context.into(),
			source_text: source_text.into(),
			comment: comment.into(),
		}
	}

	/// Context name (dialog, widget or service)
	pub fn context(&self) -> &str {
		&self.context
	}

	/// Source-language text
	pub fn source_text(&self) -> &str {
		&self.source_text
	}

	/// Disambiguating comment, empty when the message has none
	pub fn comment(&self) -> &str {
		&self.comment
	}
}

impl fmt::Display for MessageKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}::{:?}", self.context, self.source_text)?;
		if !self.comment.is_empty() {
			write!(f, " ({:?})", self.comment)?;
		}
		Ok(())
	}
}

/// Translation status of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
	/// Reviewed and complete
	#[default]
	Translated,
	/// Pending review; still served at runtime
	Unfinished,
	/// No longer referenced by the application
	Obsolete,
}

/// Provenance of a message in the application sources.
///
/// Both parts are opaque to the runtime. The line is kept verbatim so that
/// relative forms such as `+3` survive a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
pub struct SourceLocation {
	pub file: Option<String>,
	pub line: Option<String>,
}

impl SourceLocation {
	pub fn new(file: impl Into<String>, line: impl Into<String>) -> Self {
		Self {
			file: Some(file.into()),
			line: Some(line.into()),
		}
	}
}

/// A single message of a catalog.
///
/// Entries are produced by the catalog codecs and are never mutated once a
/// [`CatalogStore`](crate::CatalogStore) has been built from them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CatalogEntry {
	pub context: String,
	pub source_text: String,
	/// Disambiguating comment; part of the lookup key
	pub comment: Option<String>,
	/// Translator-facing hint, unused at runtime
	pub extra_comment: Option<String>,
	pub translator_comment: Option<String>,
	pub old_source: Option<String>,
	pub old_comment: Option<String>,
	/// Explicit message id, when the extraction tooling assigned one
	pub id: Option<String>,
	pub locations: Vec<SourceLocation>,
	/// Whether the message carries plural forms
	pub numerus: bool,
	/// One string for plain messages, one per plural form otherwise
	pub translations: Vec<String>,
	pub status: Status,
}

impl CatalogEntry {
	/// Create an untranslated, non-plural entry
	///
	/// # Example
	/// ```
	/// use rosetta_catalog::{CatalogEntry, Status};
	///
	/// let entry = CatalogEntry::new("AttachmentDialog", "Download error")
	///     .with_translation("ڈاؤن لوڈ میں خرابی");
	///
	/// assert_eq!(entry.status, Status::Translated);
	/// assert_eq!(entry.translations, vec!["ڈاؤن لوڈ میں خرابی".to_string()]);
	/// ```
	pub fn new(context: impl Into<String>, source_text: impl Into<String>) -> Self {
		Self {
			context: context.into(),
			source_text: source_text.into(),
			translations: vec![String::new()],
			status: Status::Unfinished,
			..Default::default()
		}
	}

	pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
		self.comment = Some(comment.into());
		self
	}

	pub fn with_extra_comment(mut self, comment: impl Into<String>) -> Self {
		self.extra_comment = Some(comment.into());
		self
	}

	/// Set a single translation and mark the entry translated
	pub fn with_translation(mut self, translation: impl Into<String>) -> Self {
		self.numerus = false;
		self.translations = vec![translation.into()];
		self.status = Status::Translated;
		self
	}

	/// Set plural forms and mark the entry translated
	pub fn with_plural_translations<I, S>(mut self, forms: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.numerus = true;
		self.translations = forms.into_iter().map(Into::into).collect();
		self.status = Status::Translated;
		self
	}

	pub fn with_status(mut self, status: Status) -> Self {
		self.status = status;
		self
	}

	pub fn with_location(mut self, file: impl Into<String>, line: impl Into<String>) -> Self {
		self.locations.push(SourceLocation::new(file, line));
		self
	}

	/// Lookup key of this entry
	pub fn key(&self) -> MessageKey {
		MessageKey::new(
			self.context.as_str(),
			self.source_text.as_str(),
			self.comment.as_deref().unwrap_or_default(),
		)
	}

	/// Whether every translation string is empty
	pub fn has_empty_translation(&self) -> bool {
		self.translations.iter().all(String::is_empty)
	}
}

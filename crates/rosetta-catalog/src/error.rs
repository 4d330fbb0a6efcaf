//! Errors raised while loading and writing catalogs

use crate::entry::MessageKey;
use std::path::PathBuf;

/// A catalog could not be loaded.
///
/// Any of these rejects the whole file; a partially read catalog is never
/// published.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
	#[error("IO error reading {}: {source}", .path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Malformed markup at byte {position}: {message}")]
	Malformed { position: u64, message: String },

	#[error("Parse error at line {line}: {message}")]
	Syntax { line: usize, message: String },

	#[error("Message in context '{context}' is missing its <{element}>")]
	MissingElement {
		context: String,
		element: &'static str,
	},

	#[error("Catalog does not declare a target language")]
	MissingLanguage,

	#[error("Invalid language tag: {0}")]
	InvalidLanguage(String),

	#[error(
		"Message {key} has {found} plural forms, but language '{language}' uses {expected}"
	)]
	PluralFormMismatch {
		key: MessageKey,
		language: String,
		expected: usize,
		found: usize,
	},

	#[error(transparent)]
	DuplicateKey(#[from] DuplicateKeyError),

	#[error("Unsupported catalog format: {}", .path.display())]
	UnsupportedFormat { path: PathBuf },
}

/// Two live messages share a lookup key but translate differently
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Duplicate message key {key} with conflicting translations")]
pub struct DuplicateKeyError {
	pub key: MessageKey,
	/// Translations of the occurrence that was kept
	pub kept: Vec<String>,
	/// Translations of the occurrence that was dropped
	pub ignored: Vec<String>,
}

/// A catalog could not be serialized
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("Serialized catalog is not valid UTF-8: {0}")]
	Utf8(#[from] std::string::FromUtf8Error),

	#[error("Unsupported catalog format: {}", .path.display())]
	UnsupportedFormat { path: PathBuf },
}

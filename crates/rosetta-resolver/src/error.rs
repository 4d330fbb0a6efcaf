//! Errors raised by the translator and its settings

use rosetta_catalog::ParseError;
use std::path::PathBuf;

/// The requested language could not be activated.
///
/// By the time this is returned the translator has already switched to
/// `fallback` (another configured language, or the source language), so
/// translation keeps working.
#[derive(Debug, thiserror::Error)]
#[error("Failed to load catalog for '{language}', using '{fallback}' instead: {cause}")]
pub struct LanguageLoadError {
	pub language: String,
	/// Language that is active now
	pub fallback: String,
	#[source]
	pub cause: LoadFailure,
}

/// Why a catalog could not be loaded
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum LoadFailure {
	#[error("No catalog file found ({} locations searched)", .searched.len())]
	NotFound { searched: Vec<PathBuf> },

	#[error(transparent)]
	Parse(#[from] ParseError),
}

/// Invalid or unreadable translator settings
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error("IO error reading {}: {source}", .path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("Invalid value for '{key}': {message}")]
	InvalidValue { key: String, message: String },
}

//! Translator settings
//!
//! Settings come from a TOML file and may be overridden by environment
//! variables sharing a prefix:
//!
//! ```toml
//! catalog_dirs = ["translations", "/usr/share/qownnotes/translations"]
//! file_prefix = "QOwnNotes_"
//! source_language = "en"
//! fallback_languages = ["ur"]
//! duplicate_policy = "first-wins"
//! ```

use crate::error::SettingsError;
use rosetta_catalog::{DuplicatePolicy, language};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where catalogs live and how they are loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TranslatorSettings {
	/// Directories searched in order
	pub catalog_dirs: Vec<PathBuf>,
	/// Catalog file name prefix, e.g. `QOwnNotes_`
	pub file_prefix: String,
	/// Language of the built-in source strings
	pub source_language: String,
	/// Tried in order when the requested language cannot be loaded
	pub fallback_languages: Vec<String>,
	pub duplicate_policy: DuplicatePolicy,
}

impl Default for TranslatorSettings {
	fn default() -> Self {
		Self {
			catalog_dirs: vec![PathBuf::from("translations")],
			file_prefix: String::new(),
			source_language: "en".to_string(),
			fallback_languages: Vec::new(),
			duplicate_policy: DuplicatePolicy::FirstWins,
		}
	}
}

impl TranslatorSettings {
	pub fn new() -> Self {
		Self::default()
	}

	/// Parse and validate TOML settings; missing keys keep their defaults
	///
	/// # Example
	/// ```
	/// use rosetta_resolver::TranslatorSettings;
	///
	/// let settings = TranslatorSettings::from_toml_str(r#"
	///     file_prefix = "QOwnNotes_"
	///     fallback_languages = ["ur"]
	/// "#).unwrap();
	///
	/// assert_eq!(settings.file_prefix, "QOwnNotes_");
	/// assert_eq!(settings.source_language, "en");
	/// ```
	pub fn from_toml_str(input: &str) -> Result<Self, SettingsError> {
		let settings: Self = toml::from_str(input)?;
		settings.validate()?;
		Ok(settings)
	}

	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		Self::from_toml_str(&content)
	}

	/// Override values from the process environment.
	///
	/// `<prefix>CATALOG_DIRS` is split like `PATH`; `<prefix>FALLBACK_LANGUAGES`
	/// is comma separated.
	pub fn apply_env(self, prefix: &str) -> Result<Self, SettingsError> {
		let vars = std::env::vars_os()
			.filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)));
		self.apply_env_from(prefix, vars)
	}

	/// Override values from the given variables, as [`apply_env`](Self::apply_env)
	pub fn apply_env_from<I>(mut self, prefix: &str, vars: I) -> Result<Self, SettingsError>
	where
		I: IntoIterator<Item = (String, String)>,
	{
		for (key, value) in vars {
			let Some(name) = key.strip_prefix(prefix) else {
				continue;
			};
			match name.to_ascii_uppercase().as_str() {
				"CATALOG_DIRS" => {
					self.catalog_dirs = std::env::split_paths(&value)
						.filter(|path| !path.as_os_str().is_empty())
						.collect();
				}
				"FILE_PREFIX" => self.file_prefix = value,
				"SOURCE_LANGUAGE" => self.source_language = value.trim().to_string(),
				"FALLBACK_LANGUAGES" => {
					self.fallback_languages = value
						.split(',')
						.map(str::trim)
						.filter(|language| !language.is_empty())
						.map(str::to_string)
						.collect();
				}
				"DUPLICATE_POLICY" => {
					self.duplicate_policy =
						value.parse().map_err(|err: rosetta_catalog::UnknownPolicyError| {
							SettingsError::InvalidValue {
								key: key.clone(),
								message: err.to_string(),
							}
						})?;
				}
				_ => tracing::debug!("ignoring unknown setting {}", key),
			}
		}
		self.validate()?;
		Ok(self)
	}

	pub fn with_catalog_dir(mut self, dir: impl Into<PathBuf>) -> Self {
		self.catalog_dirs.push(dir.into());
		self
	}

	pub fn with_catalog_dirs<I, P>(mut self, dirs: I) -> Self
	where
		I: IntoIterator<Item = P>,
		P: Into<PathBuf>,
	{
		self.catalog_dirs = dirs.into_iter().map(Into::into).collect();
		self
	}

	pub fn with_file_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.file_prefix = prefix.into();
		self
	}

	pub fn with_source_language(mut self, language: impl Into<String>) -> Self {
		self.source_language = language.into();
		self
	}

	pub fn with_fallback_languages<I, S>(mut self, languages: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.fallback_languages = languages.into_iter().map(Into::into).collect();
		self
	}

	pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
		self.duplicate_policy = policy;
		self
	}

	pub fn validate(&self) -> Result<(), SettingsError> {
		if !language::is_valid(&self.source_language) {
			return Err(SettingsError::InvalidValue {
				key: "source_language".to_string(),
				message: format!("'{}' is not a language tag", self.source_language),
			});
		}
		if self.catalog_dirs.is_empty() {
			return Err(SettingsError::InvalidValue {
				key: "catalog_dirs".to_string(),
				message: "at least one directory is required".to_string(),
			});
		}
		if let Some(empty) = self.fallback_languages.iter().find(|tag| !language::is_valid(tag)) {
			return Err(SettingsError::InvalidValue {
				key: "fallback_languages".to_string(),
				message: format!("'{}' is not a language tag", empty),
			});
		}
		Ok(())
	}
}

//! # Rosetta
//!
//! Runtime translation for Qt-style message catalogs.
//!
//! Rosetta loads Qt Linguist (`.ts`) and gettext (`.po`) catalogs into an
//! immutable index and resolves `(context, source, comment, count, args)`
//! requests into display strings, with plural-form selection and `%1`/`%n`
//! placeholder substitution. A missing translation is never an error: the
//! source text is returned instead.
//!
//! ## Feature Flags
//!
//! - `catalog` - Catalog codecs, plural rules and [`CatalogStore`]
//! - `resolver` - [`MessageResolver`] and the host-facing [`Translator`]
//! - `full` (default) - Everything
//!
//! ## Quick Example
//!
//! ```rust,no_run
//! use rosetta::prelude::*;
//!
//! let settings = TranslatorSettings::from_file("rosetta.toml")?.apply_env("ROSETTA_")?;
//! let translator = Translator::new(settings);
//!
//! // Falls back to another language, or to source text, on failure
//! if let Err(err) = translator.initialize("ur") {
//!     eprintln!("{}", err);
//! }
//!
//! let text = translator.translate(
//!     "AttachmentDialog",
//!     "Error while downloading:\n%1",
//!     "",
//!     None,
//!     &[Arg::from("timeout")],
//! );
//! println!("{}", text);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#[cfg(feature = "catalog")]
pub use rosetta_catalog as catalog;
#[cfg(feature = "resolver")]
pub use rosetta_resolver as resolver;

#[cfg(feature = "catalog")]
pub use rosetta_catalog::{
	CatalogDocument, CatalogEntry, CatalogFormat, CatalogStats, CatalogStore, DuplicatePolicy,
	LoadOptions, MessageKey, ParseError, PluralRule, PluralRules, Status, WriteError,
};

#[cfg(feature = "resolver")]
pub use rosetta_resolver::{
	Arg, CatalogLocator, LanguageLoadError, LoadFailure, Message, MessageResolver, NumberFormat,
	Outcome, Resolved, SettingsError, Translator, TranslatorSettings,
};

/// Commonly used types
pub mod prelude {
	#[cfg(feature = "catalog")]
	pub use crate::{CatalogStore, LoadOptions, PluralRules, Status};

	#[cfg(feature = "resolver")]
	pub use crate::{Arg, Message, MessageResolver, Outcome, Translator, TranslatorSettings};
}

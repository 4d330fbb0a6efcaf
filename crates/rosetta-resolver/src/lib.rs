//! # Rosetta Resolver
//!
//! Turns translation requests into display strings.
//!
//! A request names a message by context, source text and an optional
//! disambiguating comment, plus an optional plural count and positional
//! arguments. [`MessageResolver`] looks the message up in a
//! [`CatalogStore`](rosetta_catalog::CatalogStore), falls back to the
//! uncommented message and then to the source text, picks the plural form
//! for the catalog's language and substitutes `%1`/`%n` placeholders.
//!
//! [`Translator`] is the host-facing entry point: it finds catalog files,
//! owns the active language and swaps it atomically on
//! [`initialize`](Translator::initialize).
//!
//! ## Example
//!
//! ```
//! use rosetta_resolver::{Translator, TranslatorSettings};
//!
//! let translator = Translator::new(TranslatorSettings::default());
//!
//! // Without a catalog every message resolves to its source text
//! let text = translator.translate("AttachmentDialog", "Error while downloading:\n%1", "", None, &["timeout".into()]);
//! assert_eq!(text, "Error while downloading:\ntimeout");
//! ```

pub mod args;
pub mod discovery;
pub mod error;
pub mod interpolate;
pub mod numeric;
pub mod resolver;
pub mod settings;
pub mod translator;

pub use args::Arg;
pub use discovery::CatalogLocator;
pub use error::{LanguageLoadError, LoadFailure, SettingsError};
pub use interpolate::interpolate;
pub use numeric::NumberFormat;
pub use resolver::{Message, MessageResolver, Outcome, Resolved};
pub use settings::TranslatorSettings;
pub use translator::Translator;

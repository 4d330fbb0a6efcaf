//! # Rosetta Catalog
//!
//! Translation catalogs for Qt-style message lookup.
//!
//! A catalog maps messages, keyed by context, source text and an optional
//! disambiguating comment, to their translation in one target language.
//! Catalog files are read from Qt Linguist `.ts` XML or gettext `.po`, kept
//! as a lossless [`CatalogDocument`], and indexed into an immutable
//! [`CatalogStore`].
//!
//! ## Features
//!
//! - **TS and PO codecs**: parse and write both formats through [`CatalogCodec`]
//! - **Plural rules**: a per-language table of plural rules ([`PluralRules`])
//! - **Duplicate detection**: conflicting keys are reported, with a
//!   configurable [`DuplicatePolicy`]
//! - **Statistics**: translation coverage via [`CatalogStats`]
//!
//! ## Example
//!
//! ```
//! use rosetta_catalog::{CatalogFormat, CatalogStore, LoadOptions};
//!
//! let input = r#"<?xml version="1.0" encoding="utf-8"?>
//! <!DOCTYPE TS>
//! <TS version="2.1" language="ur_PK">
//! <context>
//!     <name>MainWindow</name>
//!     <message numerus="yes">
//!         <source>%n lines moved.</source>
//!         <translation>
//!             <numerusform>نوٹ منتقل ہوگئی</numerusform>
//!             <numerusform>نوٹیں منتقل ہوگئیں</numerusform>
//!         </translation>
//!     </message>
//! </context>
//! </TS>"#;
//!
//! let store = CatalogStore::parse(input, CatalogFormat::Ts, &LoadOptions::new()).unwrap();
//! let entry = store.lookup("MainWindow", "%n lines moved.", "").unwrap();
//! let form = store.plural_rule().form_index(7);
//!
//! assert_eq!(entry.translations[form], "نوٹیں منتقل ہوگئیں");
//! ```

pub mod document;
pub mod entry;
pub mod error;
pub mod format;
pub mod language;
pub mod plural;
pub mod store;

pub use document::{CatalogDocument, CatalogStats, ContextBlock};
pub use entry::{CatalogEntry, MessageKey, SourceLocation, Status};
pub use error::{DuplicateKeyError, ParseError, WriteError};
pub use format::{CatalogCodec, CatalogFormat, ParseOptions, PoCodec, TsCodec};
pub use plural::{PluralRule, PluralRules};
pub use store::{CatalogStore, DuplicatePolicy, LoadOptions, LoadReport, UnknownPolicyError};

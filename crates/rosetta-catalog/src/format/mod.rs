//! Catalog file formats
//!
//! Two serializations are understood:
//!
//! - [`TsCodec`]: Qt Linguist `.ts` XML, the format catalogs are shipped in
//! - [`PoCodec`]: gettext `.po`, as produced by converting `.ts` files
//!
//! Both read into and write from the same [`CatalogDocument`], so a catalog
//! can be moved between formats.

mod po;
mod ts;

pub use po::PoCodec;
pub use ts::TsCodec;

use crate::document::CatalogDocument;
use crate::error::{ParseError, WriteError};
use std::path::Path;

/// Options that affect how a catalog file is read
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
	/// Target language to assume when the file does not declare one
	pub language_hint: Option<String>,
}

impl ParseOptions {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_language_hint(mut self, language: impl Into<String>) -> Self {
		self.language_hint = Some(language.into());
		self
	}
}

/// Reads and writes one catalog serialization
pub trait CatalogCodec: Send + Sync {
	/// Parse a whole catalog file
	fn parse(&self, input: &str, options: &ParseOptions) -> Result<CatalogDocument, ParseError>;

	/// Serialize a document; parsing the result yields an equal document
	fn write(&self, document: &CatalogDocument) -> Result<String, WriteError>;
}

/// Supported catalog formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogFormat {
	Ts,
	Po,
}

impl CatalogFormat {
	/// Formats in lookup preference order
	pub const ALL: [CatalogFormat; 2] = [CatalogFormat::Ts, CatalogFormat::Po];

	/// Detect the format from a file extension
	///
	/// # Example
	/// ```
	/// use rosetta_catalog::CatalogFormat;
	///
	/// assert_eq!(CatalogFormat::from_path("QOwnNotes_ur.ts"), Some(CatalogFormat::Ts));
	/// assert_eq!(CatalogFormat::from_path("ur.PO"), Some(CatalogFormat::Po));
	/// assert_eq!(CatalogFormat::from_path("ur.qm"), None);
	/// ```
	pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
		let extension = path.as_ref().extension()?.to_str()?;
		Self::ALL
			.into_iter()
			.find(|format| extension.eq_ignore_ascii_case(format.extension()))
	}

	/// File extension without the dot
	pub fn extension(&self) -> &'static str {
		match self {
			Self::Ts => "ts",
			Self::Po => "po",
		}
	}

	/// Codec implementing this format
	pub fn codec(&self) -> &'static dyn CatalogCodec {
		match self {
			Self::Ts => &TsCodec,
			Self::Po => &PoCodec,
		}
	}
}

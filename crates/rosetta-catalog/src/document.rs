//! In-memory form of a catalog file
//!
//! A [`CatalogDocument`] keeps everything a codec reads, in file order,
//! including obsolete messages and translator metadata, so that it can be
//! written back without losing information.

use crate::entry::{CatalogEntry, Status};
use serde::Serialize;

/// A context block and its messages, in file order
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ContextBlock {
	pub name: String,
	pub messages: Vec<CatalogEntry>,
}

impl ContextBlock {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			messages: Vec::new(),
		}
	}
}

/// A complete catalog for one target language
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CatalogDocument {
	/// Format version declared by the file, if any
	pub version: Option<String>,
	/// Target language tag as declared (e.g. `ur_PK`)
	pub language: String,
	pub source_language: Option<String>,
	pub contexts: Vec<ContextBlock>,
}

impl CatalogDocument {
	pub fn new(language: impl Into<String>) -> Self {
		Self {
			language: language.into(),
			..Default::default()
		}
	}

	pub fn with_source_language(mut self, language: impl Into<String>) -> Self {
		self.source_language = Some(language.into());
		self
	}

	/// Append an entry to the last block named after its context, opening a
	/// new block when the previous one belongs to another context.
	pub fn push_entry(&mut self, entry: CatalogEntry) {
		match self.contexts.last_mut() {
			Some(block) if block.name == entry.context => block.messages.push(entry),
			_ => {
				let mut block = ContextBlock::new(entry.context.as_str());
				block.messages.push(entry);
				self.contexts.push(block);
			}
		}
	}

	/// Builder form of [`push_entry`](Self::push_entry)
	pub fn with_entry(mut self, entry: CatalogEntry) -> Self {
		self.push_entry(entry);
		self
	}

	/// All messages in file order
	pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
		self.contexts.iter().flat_map(|block| block.messages.iter())
	}

	/// Count messages by status and kind
	pub fn stats(&self) -> CatalogStats {
		let mut stats = CatalogStats {
			contexts: self.contexts.len(),
			..Default::default()
		};
		for entry in self.entries() {
			stats.messages += 1;
			match entry.status {
				Status::Translated => stats.translated += 1,
				Status::Unfinished => stats.unfinished += 1,
				Status::Obsolete => stats.obsolete += 1,
			}
			if entry.numerus {
				stats.plural += 1;
			}
		}
		stats
	}
}

/// Message counts of a catalog, for tooling output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CatalogStats {
	pub contexts: usize,
	pub messages: usize,
	pub translated: usize,
	pub unfinished: usize,
	pub obsolete: usize,
	pub plural: usize,
}

impl CatalogStats {
	/// Share of live (non-obsolete) messages that are translated, 0.0–100.0
	pub fn completion_percent(&self) -> f32 {
		let live = self.translated + self.unfinished;
		if live == 0 {
			100.0
		} else {
			(self.translated as f32 / live as f32) * 100.0
		}
	}

	/// Render as a JSON object
	pub fn to_json(&self) -> serde_json::Value {
		serde_json::json!({
			"contexts": self.contexts,
			"messages": self.messages,
			"translated": self.translated,
			"unfinished": self.unfinished,
			"obsolete": self.obsolete,
			"plural": self.plural,
			"completion_percent": self.completion_percent(),
		})
	}
}

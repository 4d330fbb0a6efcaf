//! gettext `.po` codec
//!
//! Qt contexts and disambiguating comments share `msgctxt` as
//! `Context|comment`, with `|` and `\\` in the context escaped by a
//! backslash. Obsolete messages are kept behind `#~` markers and
//! `#, fuzzy` stands for an unfinished translation.

use super::{CatalogCodec, ParseOptions};
use crate::document::CatalogDocument;
use crate::entry::{CatalogEntry, SourceLocation, Status};
use crate::error::{ParseError, WriteError};

const CONTEXT_SEPARATOR: char = '|';
const ID_MARKER: &str = "ts-id ";
const VERSION_HEADER: &str = "X-TS-Version";
/// Upper bound on `msgstr[n]`; no language has more than six forms
const MAX_PLURAL_INDEX: usize = 32;

/// Codec for gettext `.po` files
///
/// # Example
/// ```
/// use rosetta_catalog::{CatalogCodec, ParseOptions, PoCodec};
///
/// let input = r#"
/// msgid ""
/// msgstr "Language: ur_PK\n"
///
/// msgctxt "MainWindow|as noun"
/// msgid "Copy"
/// msgstr "نقل"
/// "#;
///
/// let document = PoCodec.parse(input, &ParseOptions::new()).unwrap();
/// let entry = document.entries().next().unwrap();
///
/// assert_eq!(document.language, "ur_PK");
/// assert_eq!(entry.context, "MainWindow");
/// assert_eq!(entry.comment.as_deref(), Some("as noun"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PoCodec;

impl CatalogCodec for PoCodec {
	fn parse(&self, input: &str, options: &ParseOptions) -> Result<CatalogDocument, ParseError> {
		let mut parser = PoParser::default();
		for (index, line) in input.trim_start_matches('\u{feff}').lines().enumerate() {
			parser.feed(index + 1, line)?;
		}
		parser.finish(options)
	}

	fn write(&self, document: &CatalogDocument) -> Result<String, WriteError> {
		let mut out = String::new();
		write_header(&mut out, document);
		for entry in document.entries() {
			out.push('\n');
			write_entry(&mut out, entry);
		}
		Ok(out)
	}
}

/// Field that a bare quoted line continues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
	None,
	Context,
	Id,
	IdPlural,
	Str(usize),
	PreviousContext,
	PreviousId,
}

/// Entry being accumulated, as written in the file
#[derive(Debug, Default)]
struct PoEntry {
	line: usize,
	msgctxt: Option<String>,
	msgid: Option<String>,
	msgid_plural: Option<String>,
	msgstr: Vec<String>,
	previous_msgctxt: Option<String>,
	previous_msgid: Option<String>,
	translator_comment: Option<String>,
	extra_comment: Option<String>,
	id: Option<String>,
	locations: Vec<SourceLocation>,
	fuzzy: bool,
	obsolete: bool,
}

impl PoEntry {
	fn is_header(&self) -> bool {
		self.msgctxt.is_none() && self.msgid.as_deref() == Some("")
	}
}

#[derive(Debug)]
struct PoParser {
	current: PoEntry,
	field: Field,
	header: Option<String>,
	entries: Vec<CatalogEntry>,
}

impl Default for PoParser {
	fn default() -> Self {
		Self {
			current: PoEntry::default(),
			field: Field::None,
			header: None,
			entries: Vec::new(),
		}
	}
}

impl PoParser {
	fn feed(&mut self, line_number: usize, line: &str) -> Result<(), ParseError> {
		let trimmed = line.trim();

		if trimmed.is_empty() {
			return self.flush();
		}

		if let Some(rest) = trimmed.strip_prefix("#~") {
			let rest = rest.trim_start();
			if rest.starts_with('|') {
				// Previous strings of obsolete entries carry no information we keep
				return Ok(());
			}
			self.keyword_line(line_number, rest)?;
			self.current.obsolete = true;
			return Ok(());
		}

		if trimmed.starts_with('#') {
			return self.comment_line(line_number, trimmed);
		}

		self.keyword_line(line_number, trimmed)
	}

	fn comment_line(&mut self, line_number: usize, line: &str) -> Result<(), ParseError> {
		if self.current.msgid.is_some() {
			self.flush()?;
		}
		if self.current.line == 0 {
			self.current.line = line_number;
		}
		self.field = Field::None;

		if let Some(references) = line.strip_prefix("#:") {
			self.current
				.locations
				.extend(references.split_whitespace().map(parse_reference));
		} else if let Some(text) = line.strip_prefix("#.") {
			let text = text.strip_prefix(' ').unwrap_or(text);
			match text.strip_prefix(ID_MARKER) {
				Some(id) => self.current.id = Some(id.trim().to_string()),
				None => append_line(&mut self.current.extra_comment, text),
			}
		} else if let Some(flags) = line.strip_prefix("#,") {
			if flags.split(',').any(|flag| flag.trim() == "fuzzy") {
				self.current.fuzzy = true;
			}
		} else if let Some(previous) = line.strip_prefix("#|") {
			let previous = previous.trim();
			if let Some(value) = quoted_value(previous, "msgctxt") {
				self.current.previous_msgctxt = Some(unescape_string(value));
				self.field = Field::PreviousContext;
			} else if let Some(value) = quoted_value(previous, "msgid") {
				self.current.previous_msgid = Some(unescape_string(value));
				self.field = Field::PreviousId;
			} else if let Some(value) = quoted(previous) {
				self.continue_field(line_number, &unescape_string(value))?;
			} else {
				tracing::debug!("skipping previous-string line {}: {}", line_number, line);
			}
		} else {
			let text = &line[1..];
			if text.is_empty() || text.starts_with(' ') {
				append_line(
					&mut self.current.translator_comment,
					text.strip_prefix(' ').unwrap_or(text),
				);
			} else {
				tracing::debug!("skipping comment line {}: {}", line_number, line);
			}
		}
		Ok(())
	}

	fn keyword_line(&mut self, line_number: usize, line: &str) -> Result<(), ParseError> {
		if let Some(value) = quoted_value(line, "msgctxt") {
			if self.current.msgid.is_some() {
				self.flush()?;
			}
			self.start(line_number);
			self.current.msgctxt = Some(unescape_string(value));
			self.field = Field::Context;
		} else if let Some(value) = quoted_value(line, "msgid_plural") {
			self.require_msgid(line_number, "msgid_plural")?;
			self.current.msgid_plural = Some(unescape_string(value));
			self.field = Field::IdPlural;
		} else if let Some(value) = quoted_value(line, "msgid") {
			if self.current.msgid.is_some() {
				self.flush()?;
			}
			self.start(line_number);
			self.current.msgid = Some(unescape_string(value));
			self.field = Field::Id;
		} else if let Some((index, value)) = parse_indexed_msgstr(line) {
			self.require_msgid(line_number, "msgstr")?;
			if index > MAX_PLURAL_INDEX {
				return Err(syntax(line_number, format!("plural index {} out of range", index)));
			}
			if self.current.msgstr.len() <= index {
				self.current.msgstr.resize(index + 1, String::new());
			}
			self.current.msgstr[index] = unescape_string(value);
			self.field = Field::Str(index);
		} else if let Some(value) = quoted_value(line, "msgstr") {
			self.require_msgid(line_number, "msgstr")?;
			self.current.msgstr = vec![unescape_string(value)];
			self.field = Field::Str(0);
		} else if let Some(value) = quoted(line) {
			self.continue_field(line_number, &unescape_string(value))?;
		} else {
			return Err(syntax(line_number, format!("unexpected line: {}", line)));
		}
		Ok(())
	}

	fn start(&mut self, line_number: usize) {
		if self.current.line == 0 {
			self.current.line = line_number;
		}
	}

	fn require_msgid(&self, line_number: usize, keyword: &str) -> Result<(), ParseError> {
		if self.current.msgid.is_none() {
			return Err(syntax(line_number, format!("{} without msgid", keyword)));
		}
		Ok(())
	}

	fn continue_field(&mut self, line_number: usize, value: &str) -> Result<(), ParseError> {
		let target = match self.field {
			Field::None => None,
			Field::Context => self.current.msgctxt.as_mut(),
			Field::Id => self.current.msgid.as_mut(),
			Field::IdPlural => self.current.msgid_plural.as_mut(),
			Field::Str(index) => self.current.msgstr.get_mut(index),
			Field::PreviousContext => self.current.previous_msgctxt.as_mut(),
			Field::PreviousId => self.current.previous_msgid.as_mut(),
		};
		match target {
			Some(existing) => {
				existing.push_str(value);
				Ok(())
			}
			None => Err(syntax(line_number, "continuation string without a keyword")),
		}
	}

	/// Close the current entry if it has a msgid
	fn flush(&mut self) -> Result<(), ParseError> {
		if self.current.msgid.is_none() {
			return Ok(());
		}
		let entry = std::mem::take(&mut self.current);
		self.field = Field::None;

		if entry.is_header() {
			if self.header.is_some() {
				return Err(syntax(entry.line, "duplicate header entry"));
			}
			self.header = Some(entry.msgstr.into_iter().next().unwrap_or_default());
			return Ok(());
		}

		self.entries.push(into_catalog_entry(entry));
		Ok(())
	}

	fn finish(mut self, options: &ParseOptions) -> Result<CatalogDocument, ParseError> {
		self.flush()?;

		let fields = self.header.as_deref().map(header_fields).unwrap_or_default();
		let field = |name: &str| {
			fields
				.iter()
				.find(|(key, _)| key.eq_ignore_ascii_case(name))
				.map(|(_, value)| value.clone())
				.filter(|value| !value.is_empty())
		};

		let language = field("Language")
			.or_else(|| options.language_hint.clone())
			.ok_or(ParseError::MissingLanguage)?;

		let mut document = CatalogDocument::new(language);
		document.source_language = field("X-Source-Language");
		document.version = field(VERSION_HEADER);
		for entry in self.entries {
			document.push_entry(entry);
		}
		Ok(document)
	}
}

fn into_catalog_entry(entry: PoEntry) -> CatalogEntry {
	let (context, comment) = split_context(entry.msgctxt.as_deref().unwrap_or_default());
	let numerus = entry.msgid_plural.is_some();
	let translations = match (numerus, entry.msgstr.is_empty()) {
		(false, true) => vec![String::new()],
		_ => entry.msgstr,
	};

	let mut catalog_entry = CatalogEntry {
		context,
		source_text: entry.msgid.unwrap_or_default(),
		comment,
		extra_comment: entry.extra_comment,
		translator_comment: entry.translator_comment,
		old_source: entry.previous_msgid,
		old_comment: entry
			.previous_msgctxt
			.as_deref()
			.and_then(|previous| split_context(previous).1),
		id: entry.id,
		locations: entry.locations,
		numerus,
		translations,
		status: Status::Translated,
	};
	catalog_entry.status = if entry.obsolete {
		Status::Obsolete
	} else if entry.fuzzy || catalog_entry.has_empty_translation() {
		Status::Unfinished
	} else {
		Status::Translated
	};
	catalog_entry
}

/// Split `msgctxt` at the first unescaped separator. Inside the context part
/// `\|` and `\\` stand for a literal bar and backslash.
fn split_context(msgctxt: &str) -> (String, Option<String>) {
	let mut context = String::with_capacity(msgctxt.len());
	let mut chars = msgctxt.char_indices();
	while let Some((index, ch)) = chars.next() {
		match ch {
			'\\' => match chars.clone().next() {
				Some((_, next)) if next == CONTEXT_SEPARATOR || next == '\\' => {
					context.push(next);
					chars.next();
				}
				_ => context.push(ch),
			},
			CONTEXT_SEPARATOR => {
				let comment = &msgctxt[index + CONTEXT_SEPARATOR.len_utf8()..];
				return (context, Some(comment.to_string()));
			}
			_ => context.push(ch),
		}
	}
	(context, None)
}

fn join_context(context: &str, comment: Option<&str>) -> String {
	let context = escape_context(context);
	match comment.filter(|comment| !comment.is_empty()) {
		Some(comment) => format!("{}{}{}", context, CONTEXT_SEPARATOR, comment),
		None => context,
	}
}

fn escape_context(context: &str) -> String {
	let mut escaped = String::with_capacity(context.len());
	for ch in context.chars() {
		if ch == '\\' || ch == CONTEXT_SEPARATOR {
			escaped.push('\\');
		}
		escaped.push(ch);
	}
	escaped
}

/// `file:line` reference; a reference without a line keeps only the file
fn parse_reference(reference: &str) -> SourceLocation {
	match reference.rsplit_once(':') {
		Some((file, line)) if !line.is_empty() => SourceLocation {
			file: Some(file.to_string()).filter(|file| !file.is_empty()),
			line: Some(line.to_string()),
		},
		_ => SourceLocation {
			file: Some(reference.to_string()),
			line: None,
		},
	}
}

fn header_fields(header: &str) -> Vec<(String, String)> {
	header
		.lines()
		.filter_map(|line| line.split_once(':'))
		.map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
		.collect()
}

fn append_line(target: &mut Option<String>, text: &str) {
	match target {
		Some(existing) => {
			existing.push('\n');
			existing.push_str(text);
		}
		None => *target = Some(text.to_string()),
	}
}

fn syntax(line: usize, message: impl Into<String>) -> ParseError {
	ParseError::Syntax {
		line,
		message: message.into(),
	}
}

/// Value of `keyword "..."`, without the quotes and still escaped
fn quoted_value<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
	let rest = line.strip_prefix(keyword)?;
	if !rest.starts_with(char::is_whitespace) {
		return None;
	}
	quoted(rest.trim())
}

/// Contents of a `"..."` string whose closing quote is not escaped
fn quoted(text: &str) -> Option<&str> {
	let inner = text.strip_prefix('"')?.strip_suffix('"')?;
	let trailing_backslashes = inner.chars().rev().take_while(|&ch| ch == '\\').count();
	(trailing_backslashes % 2 == 0).then_some(inner)
}

/// Parse indexed msgstr (e.g., `msgstr[0]`, `msgstr[1]`)
fn parse_indexed_msgstr(line: &str) -> Option<(usize, &str)> {
	let rest = line.strip_prefix("msgstr[")?;
	let close_bracket = rest.find(']')?;
	let index: usize = rest[..close_bracket].trim().parse().ok()?;
	let value = quoted(rest[close_bracket + 1..].trim())?;
	Some((index, value))
}

/// Unescape a string (handle \n, \t, \r, \", \\)
fn unescape_string(s: &str) -> String {
	let mut result = String::with_capacity(s.len());
	let mut chars = s.chars();

	while let Some(ch) = chars.next() {
		if ch != '\\' {
			result.push(ch);
			continue;
		}
		match chars.next() {
			Some('n') => result.push('\n'),
			Some('t') => result.push('\t'),
			Some('r') => result.push('\r'),
			Some('"') => result.push('"'),
			Some('\\') => result.push('\\'),
			Some(other) => {
				result.push('\\');
				result.push(other);
			}
			None => result.push('\\'),
		}
	}

	result
}

fn escape_string(s: &str) -> String {
	let mut result = String::with_capacity(s.len());
	for ch in s.chars() {
		match ch {
			'\\' => result.push_str("\\\\"),
			'"' => result.push_str("\\\""),
			'\n' => result.push_str("\\n"),
			'\t' => result.push_str("\\t"),
			'\r' => result.push_str("\\r"),
			_ => result.push(ch),
		}
	}
	result
}

fn write_header(out: &mut String, document: &CatalogDocument) {
	let mut fields = vec![
		("MIME-Version", "1.0"),
		("Content-Type", "text/plain; charset=UTF-8"),
		("Content-Transfer-Encoding", "8bit"),
		("X-Qt-Contexts", "true"),
		("Language", document.language.as_str()),
	];
	if let Some(source_language) = &document.source_language {
		fields.push(("X-Source-Language", source_language.as_str()));
	}
	if let Some(version) = &document.version {
		fields.push((VERSION_HEADER, version.as_str()));
	}

	out.push_str("msgid \"\"\nmsgstr \"\"\n");
	for (key, value) in fields {
		out.push_str(&format!("\"{}\"\n", escape_string(&format!("{}: {}\n", key, value))));
	}
}

fn write_entry(out: &mut String, entry: &CatalogEntry) {
	if let Some(comment) = &entry.translator_comment {
		for line in comment.split('\n') {
			if line.is_empty() {
				out.push_str("#\n");
			} else {
				out.push_str(&format!("# {}\n", line));
			}
		}
	}
	if let Some(comment) = &entry.extra_comment {
		for line in comment.split('\n') {
			out.push_str(&format!("#. {}\n", line));
		}
	}
	if let Some(id) = &entry.id {
		out.push_str(&format!("#. {}{}\n", ID_MARKER, id));
	}
	for location in &entry.locations {
		match (&location.file, &location.line) {
			(Some(file), Some(line)) => out.push_str(&format!("#: {}:{}\n", file, line)),
			(Some(file), None) => out.push_str(&format!("#: {}\n", file)),
			(None, Some(line)) => out.push_str(&format!("#: :{}\n", line)),
			(None, None) => {}
		}
	}
	if entry.status == Status::Unfinished && !entry.has_empty_translation() {
		out.push_str("#, fuzzy\n");
	}

	let obsolete = entry.status == Status::Obsolete;
	if !obsolete {
		if let Some(old_comment) = &entry.old_comment {
			let previous = join_context(&entry.context, Some(old_comment));
			write_field(out, "#| ", "msgctxt", &previous);
		}
		if let Some(old_source) = &entry.old_source {
			write_field(out, "#| ", "msgid", old_source);
		}
	}

	let prefix = if obsolete { "#~ " } else { "" };
	let context = join_context(&entry.context, entry.comment.as_deref());
	write_field(out, prefix, "msgctxt", &context);
	write_field(out, prefix, "msgid", &entry.source_text);
	if entry.numerus {
		write_field(out, prefix, "msgid_plural", &entry.source_text);
		for (index, form) in entry.translations.iter().enumerate() {
			write_field(out, prefix, &format!("msgstr[{}]", index), form);
		}
	} else {
		let translation = entry.translations.first().map(String::as_str).unwrap_or_default();
		write_field(out, prefix, "msgstr", translation);
	}
}

/// Write `keyword "value"`, splitting after embedded newlines the way
/// gettext tools wrap long strings
fn write_field(out: &mut String, prefix: &str, keyword: &str, value: &str) {
	let segments: Vec<&str> = value.split_inclusive('\n').collect();
	if segments.len() <= 1 {
		out.push_str(&format!("{}{} \"{}\"\n", prefix, keyword, escape_string(value)));
		return;
	}
	out.push_str(&format!("{}{} \"\"\n", prefix, keyword));
	for segment in segments {
		out.push_str(&format!("{}\"{}\"\n", prefix, escape_string(segment)));
	}
}

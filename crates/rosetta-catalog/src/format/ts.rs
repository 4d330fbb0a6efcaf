//! Qt Linguist `.ts` codec
//!
//! The reader first builds a small element tree with quick-xml and then maps
//! it onto a [`CatalogDocument`]. Text content is kept exactly as written,
//! whitespace and embedded newlines included.

use super::{CatalogCodec, ParseOptions};
use crate::document::{CatalogDocument, ContextBlock};
use crate::entry::{CatalogEntry, SourceLocation, Status};
use crate::error::{ParseError, WriteError};
use quick_xml::escape::{escape, resolve_predefined_entity, unescape};
use quick_xml::events::{BytesDecl, BytesEnd, BytesRef, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::io::{self, Write};

const DEFAULT_VERSION: &str = "2.1";

/// Codec for Qt Linguist `.ts` files
///
/// # Example
/// ```
/// use rosetta_catalog::{CatalogCodec, ParseOptions, Status, TsCodec};
///
/// let input = r#"<?xml version="1.0" encoding="utf-8"?>
/// <!DOCTYPE TS>
/// <TS version="2.1" language="ur_PK">
/// <context>
///     <name>UpdateDialog</name>
///     <message>
///         <source>&amp;Cancel</source>
///         <translation>&amp;منسوخ کریں</translation>
///     </message>
/// </context>
/// </TS>"#;
///
/// let document = TsCodec.parse(input, &ParseOptions::new()).unwrap();
/// let entry = document.entries().next().unwrap();
///
/// assert_eq!(document.language, "ur_PK");
/// assert_eq!(entry.source_text, "&Cancel");
/// assert_eq!(entry.status, Status::Translated);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TsCodec;

impl CatalogCodec for TsCodec {
	fn parse(&self, input: &str, options: &ParseOptions) -> Result<CatalogDocument, ParseError> {
		let root = read_tree(input.trim_start_matches('\u{feff}'))?;
		document_from_tree(root, options)
	}

	fn write(&self, document: &CatalogDocument) -> Result<String, WriteError> {
		let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);
		write_document(&mut writer, document)?;

		let mut bytes = writer.into_inner();
		bytes.push(b'\n');
		Ok(String::from_utf8(bytes)?)
	}
}

/// Element of the intermediate tree
#[derive(Debug, Default)]
struct Node {
	name: String,
	attributes: Vec<(String, String)>,
	/// Direct text content, concatenated
	text: String,
	children: Vec<Node>,
}

impl Node {
	fn open(start: &BytesStart<'_>, position: u64) -> Result<Self, ParseError> {
		let mut node = Node {
			name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
			..Default::default()
		};

		for attribute in start.attributes() {
			let attribute = attribute
				.map_err(|err| malformed(position, format!("attribute error: {}", err)))?;
			let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
			let raw = String::from_utf8_lossy(&attribute.value);
			let value = unescape(&raw)
				.map_err(|err| malformed(position, format!("attribute '{}': {}", key, err)))?
				.into_owned();
			node.attributes.push((key, value));
		}

		Ok(node)
	}

	fn attribute(&self, name: &str) -> Option<&str> {
		self.attributes
			.iter()
			.find(|(key, _)| key == name)
			.map(|(_, value)| value.as_str())
	}

	fn child(&self, name: &str) -> Option<&Node> {
		self.children.iter().find(|child| child.name == name)
	}
}

fn malformed(position: u64, message: impl Into<String>) -> ParseError {
	ParseError::Malformed {
		position,
		message: message.into(),
	}
}

fn read_tree(input: &str) -> Result<Node, ParseError> {
	let mut reader = Reader::from_str(input);
	let mut open: Vec<Node> = Vec::new();
	let mut root: Option<Node> = None;

	loop {
		let event = reader.read_event().map_err(|err| ParseError::Malformed {
			position: reader.error_position() as u64,
			message: err.to_string(),
		})?;
		let position = reader.buffer_position() as u64;

		match event {
			Event::Start(start) => open.push(Node::open(&start, position)?),
			Event::Empty(start) => {
				let node = Node::open(&start, position)?;
				close(node, &mut open, &mut root, position)?;
			}
			Event::End(_) => {
				let node = open
					.pop()
					.ok_or_else(|| malformed(position, "unexpected closing tag"))?;
				close(node, &mut open, &mut root, position)?;
			}
			Event::Text(text) => {
				let content = text
					.decode()
					.map_err(|err| malformed(position, err.to_string()))?;
				append_text(&mut open, &normalize_line_endings(&content), position)?;
			}
			Event::CData(data) => {
				let content = String::from_utf8_lossy(&data.into_inner()).into_owned();
				append_text(&mut open, &content, position)?;
			}
			Event::GeneralRef(reference) => {
				let content =
					resolve_reference(&reference).map_err(|message| malformed(position, message))?;
				append_text(&mut open, &content, position)?;
			}
			Event::Eof => break,
			// Declaration, doctype, comments and processing instructions
			_ => {}
		}
	}

	if let Some(node) = open.last() {
		return Err(malformed(
			reader.buffer_position() as u64,
			format!("unclosed element <{}>", node.name),
		));
	}
	root.ok_or_else(|| malformed(0, "document has no root element"))
}

fn close(
	node: Node,
	open: &mut [Node],
	root: &mut Option<Node>,
	position: u64,
) -> Result<(), ParseError> {
	if let Some(parent) = open.last_mut() {
		parent.children.push(node);
		return Ok(());
	}
	if root.is_some() {
		return Err(malformed(position, "more than one root element"));
	}
	*root = Some(node);
	Ok(())
}

fn append_text(open: &mut [Node], content: &str, position: u64) -> Result<(), ParseError> {
	match open.last_mut() {
		Some(node) => {
			node.text.push_str(content);
			Ok(())
		}
		None if content.trim().is_empty() => Ok(()),
		None => Err(malformed(position, "text outside the root element")),
	}
}

/// XML end-of-line handling: `\r\n` and lone `\r` become `\n`
fn normalize_line_endings(text: &str) -> String {
	if text.contains('\r') {
		text.replace("\r\n", "\n").replace('\r', "\n")
	} else {
		text.to_string()
	}
}

fn resolve_reference(reference: &BytesRef<'_>) -> Result<String, String> {
	if let Some(ch) = reference.resolve_char_ref().map_err(|err| err.to_string())? {
		return Ok(ch.to_string());
	}
	let name = reference.decode().map_err(|err| err.to_string())?;
	resolve_predefined_entity(&name)
		.map(str::to_string)
		.ok_or_else(|| format!("unknown entity &{};", name))
}

fn document_from_tree(root: Node, options: &ParseOptions) -> Result<CatalogDocument, ParseError> {
	if root.name != "TS" {
		return Err(malformed(
			0,
			format!("expected <TS> root element, found <{}>", root.name),
		));
	}

	let language = root
		.attribute("language")
		.filter(|language| !language.trim().is_empty())
		.map(str::to_string)
		.or_else(|| options.language_hint.clone())
		.ok_or(ParseError::MissingLanguage)?;

	let mut document = CatalogDocument {
		version: root.attribute("version").map(str::to_string),
		language,
		source_language: root.attribute("sourcelanguage").map(str::to_string),
		contexts: Vec::new(),
	};

	for child in &root.children {
		match child.name.as_str() {
			"context" => document.contexts.push(read_context(child)?),
			other => tracing::debug!("skipping <{}> element in catalog root", other),
		}
	}

	Ok(document)
}

fn read_context(node: &Node) -> Result<ContextBlock, ParseError> {
	let name = node
		.child("name")
		.map(|name| name.text.clone())
		.unwrap_or_default();
	let mut block = ContextBlock::new(name);

	for child in &node.children {
		match child.name.as_str() {
			"name" => {}
			"message" => {
				let entry = read_message(&block.name, child)?;
				block.messages.push(entry);
			}
			other => tracing::debug!("skipping <{}> element in context '{}'", other, block.name),
		}
	}

	Ok(block)
}

fn read_message(context: &str, node: &Node) -> Result<CatalogEntry, ParseError> {
	let mut entry = CatalogEntry {
		context: context.to_string(),
		id: node.attribute("id").map(str::to_string),
		numerus: node.attribute("numerus") == Some("yes"),
		..Default::default()
	};
	let mut source = None;
	let mut translation = None;

	for child in &node.children {
		match child.name.as_str() {
			"source" => source = Some(child.text.clone()),
			"oldsource" => entry.old_source = Some(child.text.clone()),
			"comment" => entry.comment = Some(child.text.clone()),
			"oldcomment" => entry.old_comment = Some(child.text.clone()),
			"extracomment" => entry.extra_comment = Some(child.text.clone()),
			"translatorcomment" => entry.translator_comment = Some(child.text.clone()),
			"location" => entry.locations.push(SourceLocation {
				file: child.attribute("filename").map(str::to_string),
				line: child.attribute("line").map(str::to_string),
			}),
			"translation" => translation = Some(child),
			other => tracing::debug!("skipping <{}> element in context '{}'", other, context),
		}
	}

	entry.source_text = source.ok_or_else(|| ParseError::MissingElement {
		context: context.to_string(),
		element: "source",
	})?;

	match translation {
		Some(translation) => {
			entry.translations = if entry.numerus {
				translation
					.children
					.iter()
					.filter(|child| child.name == "numerusform")
					.map(|form| variant_text(context, form))
					.collect()
			} else {
				vec![variant_text(context, translation)]
			};
			entry.status = match translation.attribute("type") {
				Some("unfinished") => Status::Unfinished,
				Some("obsolete") | Some("vanished") => Status::Obsolete,
				_ if entry.has_empty_translation() => Status::Unfinished,
				_ => Status::Translated,
			};
		}
		None => {
			entry.translations = if entry.numerus {
				Vec::new()
			} else {
				vec![String::new()]
			};
			entry.status = Status::Unfinished;
		}
	}

	Ok(entry)
}

/// Text of a translation or numerus form. Length variants keep only the
/// first (longest) variant.
fn variant_text(context: &str, node: &Node) -> String {
	let mut variants = node
		.children
		.iter()
		.filter(|child| child.name == "lengthvariant");
	match variants.next() {
		Some(first) => {
			let skipped = variants.count();
			if skipped > 0 {
				tracing::debug!(
					"keeping the first of {} length variants in context '{}'",
					skipped + 1,
					context
				);
			}
			first.text.clone()
		}
		None => node.text.clone(),
	}
}

fn write_document<W: Write>(writer: &mut Writer<W>, document: &CatalogDocument) -> io::Result<()> {
	writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
	writer.write_event(Event::DocType(BytesText::from_escaped("TS")))?;

	let mut root = BytesStart::new("TS");
	root.push_attribute((
		"version",
		document.version.as_deref().unwrap_or(DEFAULT_VERSION),
	));
	root.push_attribute(("language", document.language.as_str()));
	if let Some(source_language) = &document.source_language {
		root.push_attribute(("sourcelanguage", source_language.as_str()));
	}
	writer.write_event(Event::Start(root))?;

	for block in &document.contexts {
		writer.write_event(Event::Start(BytesStart::new("context")))?;
		write_text_element(writer, BytesStart::new("name"), &block.name)?;
		for entry in &block.messages {
			write_message(writer, entry)?;
		}
		writer.write_event(Event::End(BytesEnd::new("context")))?;
	}

	writer.write_event(Event::End(BytesEnd::new("TS")))
}

fn write_message<W: Write>(writer: &mut Writer<W>, entry: &CatalogEntry) -> io::Result<()> {
	let mut start = BytesStart::new("message");
	if let Some(id) = &entry.id {
		start.push_attribute(("id", id.as_str()));
	}
	if entry.numerus {
		start.push_attribute(("numerus", "yes"));
	}
	writer.write_event(Event::Start(start))?;

	for location in &entry.locations {
		let mut element = BytesStart::new("location");
		if let Some(file) = &location.file {
			element.push_attribute(("filename", file.as_str()));
		}
		if let Some(line) = &location.line {
			element.push_attribute(("line", line.as_str()));
		}
		writer.write_event(Event::Empty(element))?;
	}

	write_text_element(writer, BytesStart::new("source"), &entry.source_text)?;
	let optional = [
		("oldsource", &entry.old_source),
		("comment", &entry.comment),
		("oldcomment", &entry.old_comment),
		("extracomment", &entry.extra_comment),
		("translatorcomment", &entry.translator_comment),
	];
	for (name, value) in optional {
		if let Some(value) = value {
			write_text_element(writer, BytesStart::new(name), value)?;
		}
	}
	write_translation(writer, entry)?;

	writer.write_event(Event::End(BytesEnd::new("message")))
}

fn write_translation<W: Write>(writer: &mut Writer<W>, entry: &CatalogEntry) -> io::Result<()> {
	let mut start = BytesStart::new("translation");
	match entry.status {
		Status::Translated => {}
		Status::Unfinished => start.push_attribute(("type", "unfinished")),
		Status::Obsolete => start.push_attribute(("type", "obsolete")),
	}

	if !entry.numerus {
		let text = entry.translations.first().map(String::as_str).unwrap_or_default();
		return write_text_element(writer, start, text);
	}
	if entry.translations.is_empty() {
		return writer.write_event(Event::Empty(start));
	}

	writer.write_event(Event::Start(start))?;
	for form in &entry.translations {
		write_text_element(writer, BytesStart::new("numerusform"), form)?;
	}
	writer.write_event(Event::End(BytesEnd::new("translation")))
}

/// Empty text is written as `<x/>` so indentation never leaks into content
fn write_text_element<W: Write>(
	writer: &mut Writer<W>,
	start: BytesStart<'_>,
	text: &str,
) -> io::Result<()> {
	if text.is_empty() {
		return writer.write_event(Event::Empty(start));
	}
	let end = start.to_end().into_owned();
	let escaped = escape_text(text);
	writer.write_event(Event::Start(start))?;
	writer.write_event(Event::Text(BytesText::from_escaped(escaped.as_str())))?;
	writer.write_event(Event::End(end))
}

/// Escape markup characters, and write control characters other than
/// `\n` and `\t` as character references (`\r` becomes `&#xd;`) so that
/// end-of-line normalization cannot alter them on the next read
fn escape_text(text: &str) -> String {
	let escaped = escape(text);
	if !escaped.chars().any(|ch| ch.is_control() && ch != '\n' && ch != '\t') {
		return escaped.into_owned();
	}

	let mut result = String::with_capacity(escaped.len() + 8);
	for ch in escaped.chars() {
		if ch.is_control() && ch != '\n' && ch != '\t' {
			result.push_str(&format!("&#x{:x};", u32::from(ch)));
		} else {
			result.push(ch);
		}
	}
	result
}

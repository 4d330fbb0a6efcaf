//! Catalog loading, round trip and format conversion tests

use proptest::prelude::*;
use rosetta_catalog::{
	CatalogCodec, CatalogDocument, CatalogEntry, CatalogStore, ContextBlock, ParseError,
	ParseOptions, SourceLocation, Status, TsCodec, WriteError,
};
use rstest::{fixture, rstest};
use std::path::PathBuf;
use tempfile::TempDir;

fn fixture_path(name: &str) -> PathBuf {
	PathBuf::from(env!("CARGO_MANIFEST_DIR"))
		.join("tests")
		.join("fixtures")
		.join(name)
}

#[fixture]
fn ts_store() -> CatalogStore {
	CatalogStore::load(fixture_path("sample_ur.ts")).unwrap()
}

#[rstest]
fn test_load_ts_fixture(ts_store: CatalogStore) {
	// Act
	let stats = ts_store.stats();

	// Assert
	assert_eq!(ts_store.language_code(), "ur_PK");
	assert_eq!(ts_store.source_language(), Some("en"));
	assert_eq!(stats.contexts, 2);
	assert_eq!(stats.messages, 9);
	assert_eq!(stats.translated, 6);
	assert_eq!(stats.unfinished, 2);
	assert_eq!(stats.obsolete, 1);
	assert_eq!(stats.plural, 1);
	assert_eq!(ts_store.len(), 8);
	assert_eq!(ts_store.path(), Some(fixture_path("sample_ur.ts").as_path()));
}

#[rstest]
fn test_unfinished_identical_translation_is_found(ts_store: CatalogStore) {
	let entry = ts_store.lookup("MainWindow", "QOwnNotes", "").unwrap();

	assert_eq!(entry.status, Status::Unfinished);
	assert_eq!(entry.translations, vec!["QOwnNotes".to_string()]);
}

#[rstest]
fn test_embedded_newline_and_entity_survive_loading(ts_store: CatalogStore) {
	let download = ts_store
		.lookup("AttachmentDialog", "Error while downloading:\n%1", "")
		.unwrap();
	let history = ts_store.lookup("MainWindow", "Note &history", "").unwrap();

	assert_eq!(download.translations[0], "ڈاؤن لوڈ کے دوران خرابی:\n%1");
	assert!(history.has_empty_translation());
}

#[rstest]
fn test_vanished_message_is_not_indexed(ts_store: CatalogStore) {
	assert!(ts_store.lookup("MainWindow", "Show todo list", "").is_none());
}

#[rstest]
fn test_ts_round_trip_through_file(ts_store: CatalogStore) {
	// Arrange
	let dir = TempDir::new().unwrap();
	let path = dir.path().join("QOwnNotes_ur.ts");

	// Act
	ts_store.write_to(&path).unwrap();
	let reloaded = CatalogStore::load(&path).unwrap();

	// Assert
	assert_eq!(reloaded.document(), ts_store.document());
}

#[rstest]
fn test_ts_to_po_conversion_keeps_document(ts_store: CatalogStore) {
	let dir = TempDir::new().unwrap();
	let path = dir.path().join("QOwnNotes_ur.po");

	ts_store.write_to(&path).unwrap();
	let converted = CatalogStore::load(&path).unwrap();

	assert_eq!(converted.document(), ts_store.document());
}

#[rstest]
fn test_po_fixture_matches_ts_fixture(ts_store: CatalogStore) {
	// Arrange
	let po_store = CatalogStore::load(fixture_path("sample_ur.po")).unwrap();
	let keys = [
		("AttachmentDialog", "Error while downloading:\n%1", ""),
		("MainWindow", "%n lines moved.", ""),
		("MainWindow", "Copy", "as noun"),
		("MainWindow", "Copy", ""),
		("MainWindow", "QOwnNotes", ""),
	];

	// Act & Assert
	assert_eq!(po_store.language_code(), ts_store.language_code());
	for (context, source, comment) in keys {
		let from_po = po_store.lookup(context, source, comment).unwrap();
		let from_ts = ts_store.lookup(context, source, comment).unwrap();
		assert_eq!(from_po.translations, from_ts.translations, "{}", source);
		assert_eq!(from_po.status, from_ts.status, "{}", source);
	}
	assert!(po_store.lookup("MainWindow", "Show todo list", "").is_none());
}

#[rstest]
fn test_unsupported_extension() {
	let result = CatalogStore::load("translations/QOwnNotes_ur.qm");

	assert!(matches!(result, Err(ParseError::UnsupportedFormat { .. })));
}

#[rstest]
fn test_missing_file_is_io_error() {
	let dir = TempDir::new().unwrap();

	let result = CatalogStore::load(dir.path().join("missing.ts"));

	assert!(matches!(result, Err(ParseError::Io { .. })));
}

#[rstest]
fn test_write_to_unsupported_extension(ts_store: CatalogStore) {
	let dir = TempDir::new().unwrap();

	let result = ts_store.write_to(dir.path().join("QOwnNotes_ur.json"));

	assert!(matches!(result, Err(WriteError::UnsupportedFormat { .. })));
}

#[rstest]
fn test_stats_as_json(ts_store: CatalogStore) {
	let json = ts_store.stats().to_json();

	assert_eq!(json["messages"], 9);
	assert_eq!(json["obsolete"], 1);
	assert_eq!(json["completion_percent"], 75.0);
}

#[rstest]
fn test_malformed_file_is_rejected() {
	let dir = TempDir::new().unwrap();
	let path = dir.path().join("broken_ur.ts");
	std::fs::write(&path, "<TS language=\"ur\"><context><name>A</context></TS>").unwrap();

	let result = CatalogStore::load(&path);

	assert!(matches!(result, Err(ParseError::Malformed { .. })));
}

fn text() -> impl Strategy<Value = String> {
	"[a-zA-Z0-9 %&<>\"'.:\n\t\rاوںکیل]{0,12}"
}

fn status() -> impl Strategy<Value = Status> {
	prop_oneof![
		Just(Status::Translated),
		Just(Status::Unfinished),
		Just(Status::Obsolete),
	]
}

prop_compose! {
	fn arb_entry()(
		source in text(),
		comment in proptest::option::of(text()),
		extra_comment in proptest::option::of(text()),
		numerus in any::<bool>(),
		forms in proptest::collection::vec(text(), 0..4),
		single in text(),
		status in status(),
		locations in proptest::collection::vec(("[a-z/._]{1,10}", "[+0-9]{1,4}"), 0..3),
	) -> CatalogEntry {
		let mut entry = CatalogEntry::new("", source);
		entry.comment = comment;
		entry.extra_comment = extra_comment;
		entry.numerus = numerus;
		entry.translations = if numerus { forms } else { vec![single] };
		entry.status = status;
		// An empty translation always reads back as unfinished
		if status == Status::Translated && entry.has_empty_translation() {
			entry.status = Status::Unfinished;
		}
		entry.locations = locations
			.into_iter()
			.map(|(file, line)| SourceLocation::new(file, line))
			.collect();
		entry
	}
}

prop_compose! {
	fn arb_block()(name in "[A-Za-z]{0,8}", messages in proptest::collection::vec(arb_entry(), 0..4)) -> ContextBlock {
		let mut block = ContextBlock::new(name.as_str());
		for mut entry in messages {
			entry.context = name.clone();
			block.messages.push(entry);
		}
		block
	}
}

prop_compose! {
	fn arb_document()(
		language in "[a-z]{2}",
		source_language in proptest::option::of("[a-z]{2}"),
		contexts in proptest::collection::vec(arb_block(), 0..4),
	) -> CatalogDocument {
		CatalogDocument {
			version: Some("2.1".to_string()),
			language,
			source_language,
			contexts,
		}
	}
}

proptest! {
	#[test]
	fn prop_ts_write_then_parse_is_lossless(document in arb_document()) {
		let output = TsCodec.write(&document).unwrap();
		let reparsed = TsCodec.parse(&output, &ParseOptions::new()).unwrap();

		prop_assert_eq!(reparsed, document);
	}
}

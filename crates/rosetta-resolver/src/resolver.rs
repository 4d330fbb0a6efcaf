//! Message resolution over one catalog snapshot
//!
//! Lookup order for a request `(context, source, comment)`:
//!
//! 1. the exact key
//! 2. the same context and source with an empty comment, when a comment was given
//! 3. the source text itself
//!
//! The selected string is then interpolated. Resolution never fails.
//!
//! An exact match whose selected form is empty goes straight to the source
//! text; the uncommented message is not consulted in that case.

use crate::args::Arg;
use crate::interpolate::interpolate;
use crate::numeric::NumberFormat;
use rosetta_catalog::{CatalogEntry, CatalogStore};

/// Which lookup tier produced a resolved string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
	/// The exact key was found
	Exact,
	/// Found after dropping the disambiguating comment
	CommentFallback,
	/// No usable translation; the source text was used
	SourceFallback,
}

/// A resolved display string and how it was obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
	pub text: String,
	pub outcome: Outcome,
}

/// A translation request
///
/// # Example
/// ```
/// use rosetta_resolver::Message;
///
/// let message = Message::new("MainWindow", "%n lines moved.").count(3);
/// assert_eq!(message.plural_count(), Some(3));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Message<'a> {
	context: &'a str,
	source_text: &'a str,
	comment: &'a str,
	count: Option<i64>,
	args: Vec<Arg>,
}

impl<'a> Message<'a> {
	pub fn new(context: &'a str, source_text: &'a str) -> Self {
		Self {
			context,
			source_text,
			comment: "",
			count: None,
			args: Vec::new(),
		}
	}

	/// Disambiguating comment
	pub fn comment(mut self, comment: &'a str) -> Self {
		self.comment = comment;
		self
	}

	/// Plural count; selects the form and fills `%n`
	pub fn count(mut self, count: i64) -> Self {
		self.count = Some(count);
		self
	}

	/// Append the next positional argument
	pub fn arg(mut self, arg: impl Into<Arg>) -> Self {
		self.args.push(arg.into());
		self
	}

	pub fn args<I, A>(mut self, args: I) -> Self
	where
		I: IntoIterator<Item = A>,
		A: Into<Arg>,
	{
		self.args.extend(args.into_iter().map(Into::into));
		self
	}

	pub fn context_name(&self) -> &'a str {
		self.context
	}

	pub fn source_text(&self) -> &'a str {
		self.source_text
	}

	pub fn disambiguation(&self) -> &'a str {
		self.comment
	}

	pub fn plural_count(&self) -> Option<i64> {
		self.count
	}

	pub fn arguments(&self) -> &[Arg] {
		&self.args
	}
}

/// Resolves messages against a borrowed [`CatalogStore`].
///
/// The resolver holds no state of its own; the same request against the
/// same store always produces the same string.
///
/// # Example
/// ```
/// use rosetta_catalog::{CatalogDocument, CatalogEntry, CatalogStore, LoadOptions};
/// use rosetta_resolver::{Arg, MessageResolver};
///
/// let document = CatalogDocument::new("ur_PK").with_entry(
///     CatalogEntry::new("AttachmentDialog", "Error while downloading:\n%1")
///         .with_translation("ڈاؤن لوڈ کے دوران خرابی:\n%1"),
/// );
/// let store = CatalogStore::from_document(document, &LoadOptions::new()).unwrap();
/// let resolver = MessageResolver::new(&store);
///
/// let text = resolver.translate(
///     "AttachmentDialog",
///     "Error while downloading:\n%1",
///     "",
///     None,
///     &[Arg::from("timeout")],
/// );
/// assert_eq!(text, "ڈاؤن لوڈ کے دوران خرابی:\ntimeout");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct MessageResolver<'s> {
	store: &'s CatalogStore,
	number_format: NumberFormat,
}

impl<'s> MessageResolver<'s> {
	pub fn new(store: &'s CatalogStore) -> Self {
		Self {
			store,
			number_format: NumberFormat::for_language(store.language_code()),
		}
	}

	/// Override the separators used by `%L` placeholders
	pub fn with_number_format(mut self, number_format: NumberFormat) -> Self {
		self.number_format = number_format;
		self
	}

	pub fn store(&self) -> &'s CatalogStore {
		self.store
	}

	/// Resolve a request, reporting the lookup tier that was used
	pub fn resolve(&self, message: &Message<'_>) -> Resolved {
		self.resolve_parts(
			message.context,
			message.source_text,
			message.comment,
			message.count,
			&message.args,
		)
	}

	/// Resolve to the display string
	pub fn translate(
		&self,
		context: &str,
		source_text: &str,
		comment: &str,
		count: Option<i64>,
		args: &[Arg],
	) -> String {
		self.resolve_parts(context, source_text, comment, count, args)
			.text
	}

	fn resolve_parts(
		&self,
		context: &str,
		source_text: &str,
		comment: &str,
		count: Option<i64>,
		args: &[Arg],
	) -> Resolved {
		let (entry, outcome) = self.find(context, source_text, comment);
		let selected = entry
			.and_then(|entry| self.select_form(entry, count))
			.filter(|text| !text.is_empty());

		let (template, outcome) = match selected {
			Some(text) => (text, outcome),
			None => {
				tracing::trace!(
					"no usable translation for {}::{:?}, using source text",
					context,
					source_text
				);
				(source_text, Outcome::SourceFallback)
			}
		};

		Resolved {
			text: interpolate(template, count, args, &self.number_format),
			outcome,
		}
	}

	fn find(&self, context: &str, source_text: &str, comment: &str) -> (Option<&'s CatalogEntry>, Outcome) {
		if let Some(entry) = self.store.lookup(context, source_text, comment) {
			return (Some(entry), Outcome::Exact);
		}
		if comment.is_empty() {
			return (None, Outcome::SourceFallback);
		}

		match self.store.lookup(context, source_text, "") {
			Some(entry) => {
				tracing::trace!(
					"no translation for {}::{:?} with comment {:?}, using the uncommented message",
					context,
					source_text,
					comment
				);
				(Some(entry), Outcome::CommentFallback)
			}
			None => (None, Outcome::SourceFallback),
		}
	}

	/// Plural messages without a count use the first form
	fn select_form(&self, entry: &'s CatalogEntry, count: Option<i64>) -> Option<&'s str> {
		let index = match (entry.numerus, count) {
			(true, Some(count)) => self.store.plural_rule().form_index(count),
			_ => 0,
		};
		entry.translations.get(index).map(String::as_str)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rosetta_catalog::{CatalogDocument, LoadOptions, PluralRule, PluralRules, Status};
	use rstest::{fixture, rstest};

	#[fixture]
	fn store() -> CatalogStore {
		let document = CatalogDocument::new("ur_PK")
			.with_entry(
				CatalogEntry::new("AttachmentDialog", "Error while downloading:\n%1")
					.with_translation("ڈاؤن لوڈ کے دوران خرابی:\n%1"),
			)
			.with_entry(
				CatalogEntry::new("MainWindow", "%n lines moved.")
					.with_plural_translations(["نوٹ منتقل ہوگئی", "نوٹیں منتقل ہوگئیں"]),
			)
			.with_entry(CatalogEntry::new("MainWindow", "Copy").with_translation("کاپی کریں"))
			.with_entry(
				CatalogEntry::new("MainWindow", "Copy")
					.with_comment("as noun")
					.with_translation("نقل"),
			)
			.with_entry(
				CatalogEntry::new("MainWindow", "QOwnNotes")
					.with_translation("QOwnNotes")
					.with_status(Status::Unfinished),
			)
			.with_entry(CatalogEntry::new("MainWindow", "Note &history"))
			.with_entry(
				CatalogEntry::new("MainWindow", "%n notes")
					.with_plural_translations(["", "نوٹس"]),
			);
		CatalogStore::from_document(document, &LoadOptions::new()).unwrap()
	}

	#[rstest]
	fn test_positional_substitution(store: CatalogStore) {
		// Arrange
		let resolver = MessageResolver::new(&store);
		let message = Message::new("AttachmentDialog", "Error while downloading:\n%1").arg("timeout");

		// Act
		let resolved = resolver.resolve(&message);

		// Assert
		assert_eq!(resolved.text, "ڈاؤن لوڈ کے دوران خرابی:\ntimeout");
		assert_eq!(resolved.outcome, Outcome::Exact);
	}

	#[rstest]
	#[case(1, "نوٹ منتقل ہوگئی")]
	#[case(7, "نوٹیں منتقل ہوگئیں")]
	#[case(0, "نوٹیں منتقل ہوگئیں")]
	#[case(5, "نوٹیں منتقل ہوگئیں")]
	#[case(-1, "نوٹ منتقل ہوگئی")]
	fn test_plural_selection(store: CatalogStore, #[case] count: i64, #[case] expected: &str) {
		let resolver = MessageResolver::new(&store);

		let text = resolver.translate("MainWindow", "%n lines moved.", "", Some(count), &[]);

		assert_eq!(text, expected);
	}

	#[rstest]
	fn test_plural_without_count_uses_first_form(store: CatalogStore) {
		let resolver = MessageResolver::new(&store);

		let text = resolver.translate("MainWindow", "%n lines moved.", "", None, &[]);

		assert_eq!(text, "نوٹ منتقل ہوگئی");
	}

	#[rstest]
	#[case("as noun", "نقل", Outcome::Exact)]
	#[case("", "کاپی کریں", Outcome::Exact)]
	#[case("as verb", "کاپی کریں", Outcome::CommentFallback)]
	fn test_disambiguation(
		store: CatalogStore,
		#[case] comment: &str,
		#[case] expected: &str,
		#[case] outcome: Outcome,
	) {
		let resolver = MessageResolver::new(&store);

		let resolved = resolver.resolve(&Message::new("MainWindow", "Copy").comment(comment));

		assert_eq!(resolved.text, expected);
		assert_eq!(resolved.outcome, outcome);
	}

	#[rstest]
	fn test_unfinished_identical_translation_is_exact(store: CatalogStore) {
		let resolver = MessageResolver::new(&store);

		let resolved = resolver.resolve(&Message::new("MainWindow", "QOwnNotes"));

		assert_eq!(resolved.text, "QOwnNotes");
		assert_eq!(resolved.outcome, Outcome::Exact);
	}

	#[rstest]
	#[case(Message::new("MainWindow", "Paste"), "Paste")]
	#[case(Message::new("MainWindow", "Paste").comment("as noun"), "Paste")]
	#[case(Message::new("MainWindow", "Note &history"), "Note &history")]
	#[case(Message::new("SettingsDialog", "Copy"), "Copy")]
	#[case(Message::new("MainWindow", "%n notes").count(1), "1 notes")]
	#[case(Message::new("MainWindow", "Saved %1").arg(3), "Saved 3")]
	fn test_source_fallback(store: CatalogStore, #[case] message: Message<'static>, #[case] expected: &str) {
		let resolver = MessageResolver::new(&store);

		let resolved = resolver.resolve(&message);

		assert_eq!(resolved.text, expected);
		assert_eq!(resolved.outcome, Outcome::SourceFallback);
	}

	#[rstest]
	fn test_selected_form_used_when_not_empty(store: CatalogStore) {
		let resolver = MessageResolver::new(&store);

		let text = resolver.translate("MainWindow", "%n notes", "", Some(4), &[]);

		assert_eq!(text, "نوٹس");
	}

	#[rstest]
	fn test_empty_exact_match_skips_uncommented_message() {
		// Arrange
		let document = CatalogDocument::new("ur_PK")
			.with_entry(CatalogEntry::new("MainWindow", "Paste").with_translation("چسپاں کریں"))
			.with_entry(CatalogEntry::new("MainWindow", "Paste").with_comment("as noun"));
		let store = CatalogStore::from_document(document, &LoadOptions::new()).unwrap();
		let resolver = MessageResolver::new(&store);

		// Act
		let resolved = resolver.resolve(&Message::new("MainWindow", "Paste").comment("as noun"));

		// Assert
		assert_eq!(resolved.text, "Paste");
		assert_eq!(resolved.outcome, Outcome::SourceFallback);
	}

	#[rstest]
	fn test_count_is_localized_with_target_format() {
		let document = CatalogDocument::new("de").with_entry(
			CatalogEntry::new("MainWindow", "%n notes").with_plural_translations(["%Ln Notiz", "%Ln Notizen"]),
		);
		let store = CatalogStore::from_document(document, &LoadOptions::new()).unwrap();
		let resolver = MessageResolver::new(&store);

		let text = resolver.translate("MainWindow", "%n notes", "", Some(2500), &[]);

		assert_eq!(text, "2.500 Notizen");
	}

	#[rstest]
	fn test_three_form_language() {
		let document = CatalogDocument::new("ru").with_entry(
			CatalogEntry::new("MainWindow", "%n notes").with_plural_translations([
				"%n заметка",
				"%n заметки",
				"%n заметок",
			]),
		);
		let store = CatalogStore::from_document(document, &LoadOptions::new()).unwrap();
		let resolver = MessageResolver::new(&store);

		let forms: Vec<String> = [1, 3, 5, 21, 22, 111]
			.into_iter()
			.map(|n| resolver.translate("MainWindow", "%n notes", "", Some(n), &[]))
			.collect();

		assert_eq!(
			forms,
			vec![
				"1 заметка",
				"3 заметки",
				"5 заметок",
				"21 заметка",
				"22 заметки",
				"111 заметок"
			]
		);
	}

	#[rstest]
	fn test_custom_plural_rule() {
		let document = CatalogDocument::new("ur").with_entry(
			CatalogEntry::new("MainWindow", "%n notes").with_plural_translations(["none", "one", "many"]),
		);
		let rules = PluralRules::standard().with_rule(
			"ur",
			PluralRule::custom(3, |n| match n {
				0 => 0,
				1 => 1,
				_ => 2,
			}),
		);
		let store =
			CatalogStore::from_document(document, &LoadOptions::new().with_plural_rules(rules)).unwrap();
		let resolver = MessageResolver::new(&store);

		assert_eq!(resolver.translate("MainWindow", "%n notes", "", Some(0), &[]), "none");
		assert_eq!(resolver.translate("MainWindow", "%n notes", "", Some(1), &[]), "one");
		assert_eq!(resolver.translate("MainWindow", "%n notes", "", Some(9), &[]), "many");
	}
}

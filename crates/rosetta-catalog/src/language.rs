//! Language tag helpers
//!
//! Catalog files use both POSIX (`ur_PK`) and BCP 47 (`ur-PK`) spellings.
//! Tags are parsed with `unic-langid`; tags it rejects (e.g. `sr@latin`)
//! still yield their leading language subtag.

use unic_langid::LanguageIdentifier;

/// Parse a tag in either spelling
pub fn parse(tag: &str) -> Option<LanguageIdentifier> {
	tag.trim().parse::<LanguageIdentifier>().ok()
}

/// Canonical BCP 47 form of a tag, `None` when it cannot be parsed
///
/// # Example
/// ```
/// use rosetta_catalog::language::canonical;
///
/// assert_eq!(canonical("ur_PK").as_deref(), Some("ur-PK"));
/// assert_eq!(canonical("PT-br").as_deref(), Some("pt-BR"));
/// ```
pub fn canonical(tag: &str) -> Option<String> {
	parse(tag).map(|id| id.to_string())
}

/// Lower-case primary language subtag (`ur_PK` → `ur`)
pub fn primary_language(tag: &str) -> String {
	match parse(tag) {
		Some(id) => id.language.to_string(),
		None => tag
			.split(['-', '_', '@', '.'])
			.next()
			.unwrap_or(tag)
			.trim()
			.to_ascii_lowercase(),
	}
}

/// Whether two tags name the same language and region, ignoring spelling
pub fn same_language(a: &str, b: &str) -> bool {
	match (canonical(a), canonical(b)) {
		(Some(a), Some(b)) => a == b,
		_ => a.trim().eq_ignore_ascii_case(b.trim()),
	}
}

/// Whether a tag is usable as a catalog language
pub fn is_valid(tag: &str) -> bool {
	!tag.trim().is_empty() && !primary_language(tag).is_empty()
}

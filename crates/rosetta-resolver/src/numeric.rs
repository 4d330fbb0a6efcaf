//! Locale-aware number rendering for `%L` placeholders

use rosetta_catalog::language;

/// Digit grouping and decimal separator of a language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberFormat {
	pub group_separator: char,
	pub decimal_separator: char,
}

impl NumberFormat {
	/// `1,234.5`
	pub const ENGLISH: Self = Self {
		group_separator: ',',
		decimal_separator: '.',
	};
	/// `1.234,5`
	pub const GERMAN: Self = Self {
		group_separator: '.',
		decimal_separator: ',',
	};
	/// `1 234,5` with a no-break space
	pub const FRENCH: Self = Self {
		group_separator: '\u{a0}',
		decimal_separator: ',',
	};

	/// Separators used by a language, English-like when unknown
	///
	/// # Example
	/// ```
	/// use rosetta_resolver::NumberFormat;
	///
	/// assert_eq!(NumberFormat::for_language("de_AT"), NumberFormat::GERMAN);
	/// assert_eq!(NumberFormat::for_language("ru"), NumberFormat::FRENCH);
	/// assert_eq!(NumberFormat::for_language("ur_PK"), NumberFormat::ENGLISH);
	/// ```
	pub fn for_language(tag: &str) -> Self {
		match language::primary_language(tag).as_str() {
			"de" | "nl" | "it" | "es" | "pt" | "da" | "id" | "tr" | "el" | "ro" | "sl" | "hr"
			| "sr" | "is" | "ca" => Self::GERMAN,
			"fr" | "ru" | "uk" | "be" | "pl" | "cs" | "sk" | "bg" | "fi" | "sv" | "nb" | "nn"
			| "no" | "hu" | "lt" | "lv" | "et" => Self::FRENCH,
			_ => Self::ENGLISH,
		}
	}

	pub fn format_int(&self, value: i64) -> String {
		let digits = value.unsigned_abs().to_string();
		let grouped = self.group(&digits);
		if value < 0 {
			format!("-{}", grouped)
		} else {
			grouped
		}
	}

	pub fn format_uint(&self, value: u64) -> String {
		self.group(&value.to_string())
	}

	/// Shortest round-tripping representation, with localized separators
	pub fn format_float(&self, value: f64) -> String {
		if !value.is_finite() {
			return value.to_string();
		}
		let rendered = value.abs().to_string();
		let (integer, fraction) = match rendered.split_once('.') {
			Some((integer, fraction)) => (integer, Some(fraction)),
			None => (rendered.as_str(), None),
		};

		let mut result = String::new();
		if value.is_sign_negative() && value != 0.0 {
			result.push('-');
		}
		result.push_str(&self.group(integer));
		if let Some(fraction) = fraction {
			result.push(self.decimal_separator);
			result.push_str(fraction);
		}
		result
	}

	/// Insert the group separator every three digits from the right
	fn group(&self, digits: &str) -> String {
		let mut result = String::with_capacity(digits.len() + digits.len() / 3);
		let len = digits.chars().count();
		for (i, ch) in digits.chars().enumerate() {
			if i > 0 && (len - i) % 3 == 0 {
				result.push(self.group_separator);
			}
			result.push(ch);
		}
		result
	}
}

impl Default for NumberFormat {
	fn default() -> Self {
		Self::ENGLISH
	}
}

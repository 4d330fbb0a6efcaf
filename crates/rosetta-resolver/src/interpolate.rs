//! Placeholder substitution
//!
//! Recognized tokens:
//!
//! - `%1` .. `%99`: positional argument (two digits are read greedily)
//! - `%L1` .. `%L99`: positional argument with localized digit grouping
//! - `%n`, `%Ln`: the plural count
//!
//! Anything else, including tokens without a matching argument, is copied
//! through. Substituted values are never scanned again.

use crate::args::Arg;
use crate::numeric::NumberFormat;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
	Regex::new(r"%(L?)(n|[0-9]{1,2})").expect("Invalid placeholder regex pattern")
});

/// Substitute placeholders in `template`
///
/// # Example
/// ```
/// use rosetta_resolver::{Arg, NumberFormat, interpolate};
///
/// let text = interpolate(
///     "%Ln notes in %1 (%2)",
///     Some(1200),
///     &[Arg::from("Inbox")],
///     &NumberFormat::ENGLISH,
/// );
/// assert_eq!(text, "1,200 notes in Inbox (%2)");
/// ```
pub fn interpolate(
	template: &str,
	count: Option<i64>,
	args: &[Arg],
	format: &NumberFormat,
) -> String {
	if !template.contains('%') {
		return template.to_string();
	}

	PLACEHOLDER
		.replace_all(template, |caps: &Captures<'_>| {
			let localized = (!caps[1].is_empty()).then_some(format);
			let token = &caps[2];

			let value = if token == "n" {
				count.map(|count| Arg::Int(count).render(localized))
			} else {
				token
					.parse::<usize>()
					.ok()
					.and_then(|index| index.checked_sub(1))
					.and_then(|index| args.get(index))
					.map(|arg| arg.render(localized))
			};
			value.unwrap_or_else(|| caps[0].to_string())
		})
		.into_owned()
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn plain(template: &str, count: Option<i64>, args: &[Arg]) -> String {
		interpolate(template, count, args, &NumberFormat::ENGLISH)
	}

	#[rstest]
	fn test_positional_argument_keeps_newline() {
		let text = plain("ڈاؤن لوڈ کے دوران خرابی:\n%1", None, &[Arg::from("timeout")]);

		assert_eq!(text, "ڈاؤن لوڈ کے دوران خرابی:\ntimeout");
	}

	#[rstest]
	#[case("%1 of %2", &["a", "b"], "a of b")]
	#[case("%2 before %1", &["a", "b"], "b before a")]
	#[case("%1 and %3", &["a"], "a and %3")]
	#[case("%0 stays", &["a"], "%0 stays")]
	#[case("100% done", &[], "100% done")]
	#[case("50%% and %", &["a"], "50%% and %")]
	#[case("%1%1", &["x"], "xx")]
	fn test_positional_tokens(#[case] template: &str, #[case] args: &[&str], #[case] expected: &str) {
		let args: Vec<Arg> = args.iter().map(|arg| Arg::from(*arg)).collect();

		assert_eq!(plain(template, None, &args), expected);
	}

	#[rstest]
	fn test_two_digit_tokens_are_greedy() {
		let args: Vec<Arg> = (1..=12).map(|i| Arg::from(format!("a{}", i))).collect();

		assert_eq!(plain("%10 %12 %1", None, &args), "a10 a12 a1");
		assert_eq!(plain("%10", None, &args[..1]), "%10");
	}

	#[rstest]
	#[case(Some(7), "7 lines moved.")]
	#[case(None, "%n lines moved.")]
	#[case(Some(-3), "-3 lines moved.")]
	fn test_count_token(#[case] count: Option<i64>, #[case] expected: &str) {
		assert_eq!(plain("%n lines moved.", count, &[]), expected);
	}

	#[rstest]
	fn test_localized_tokens() {
		let text = interpolate(
			"%Ln Notizen, %L1 Bytes, %1 roh",
			Some(12000),
			&[Arg::from(1048576u64)],
			&NumberFormat::GERMAN,
		);

		assert_eq!(text, "12.000 Notizen, 1.048.576 Bytes, 1048576 roh");
	}

	#[rstest]
	fn test_substituted_values_are_not_rescanned() {
		let text = plain("%1 %2", None, &[Arg::from("%2"), Arg::from("b")]);

		assert_eq!(text, "%2 b");
	}
}

//! Plural form selection
//!
//! Each target language maps a count to the index of one of its plural
//! forms. Rules are looked up in a [`PluralRules`] table by language tag, so
//! supporting a new language never touches the resolver.

use crate::language;
use std::collections::HashMap;
use std::fmt;

/// A pluralization rule: how many forms a language has and which one a
/// given count selects.
#[derive(Clone, Copy)]
pub enum PluralRule {
	/// One form for every count (ja, zh, ko, vi, th, id, ms, tr, fa, ka)
	Single,
	/// 1 is singular, everything else plural (en, de, nl, ur, ...)
	Germanic,
	/// 0 and 1 are singular (fr, pt-BR)
	French,
	/// ru, uk, be, sr, hr, bs: three forms by last digits
	EastSlavic,
	/// pl: three forms, only exactly 1 is singular
	Polish,
	/// cs, sk: 1 / 2–4 / other
	CzechSlovak,
	/// sl: four forms by `n % 100`
	Slovenian,
	/// ar: zero, one, two, few, many, other
	Arabic,
	/// ga: five forms
	Irish,
	/// cy: six forms
	Welsh,
	/// lt: three forms
	Lithuanian,
	/// lv: three forms, zero separate
	Latvian,
	/// ro: three forms
	Romanian,
	/// Host-supplied rule
	Custom {
		forms: usize,
		select: fn(u64) -> usize,
	},
}

impl PluralRule {
	/// Build a host-supplied rule. `forms` is raised to at least one.
	///
	/// # Example
	/// ```
	/// use rosetta_catalog::PluralRule;
	///
	/// // Dual number: 1, 2, other
	/// let rule = PluralRule::custom(3, |n| match n {
	///     1 => 0,
	///     2 => 1,
	///     _ => 2,
	/// });
	///
	/// assert_eq!(rule.form_count(), 3);
	/// assert_eq!(rule.form_index(2), 1);
	/// assert_eq!(rule.form_index(-1), 0);
	/// ```
	pub fn custom(forms: usize, select: fn(u64) -> usize) -> Self {
		Self::Custom {
			forms: forms.max(1),
			select,
		}
	}

	/// Number of plural forms this rule distinguishes
	pub fn form_count(&self) -> usize {
		match self {
			Self::Single => 1,
			Self::Germanic | Self::French => 2,
			Self::EastSlavic
			| Self::Polish
			| Self::CzechSlovak
			| Self::Lithuanian
			| Self::Latvian
			| Self::Romanian => 3,
			Self::Slovenian => 4,
			Self::Irish => 5,
			Self::Arabic | Self::Welsh => 6,
			Self::Custom { forms, .. } => (*forms).max(1),
		}
	}

	/// Index of the form selected by `count`, always `< form_count()`.
	///
	/// Negative counts select on their absolute value.
	pub fn form_index(&self, count: i64) -> usize {
		let index = self.select(count.unsigned_abs());
		index.min(self.form_count() - 1)
	}

	fn select(&self, n: u64) -> usize {
		let n10 = n % 10;
		let n100 = n % 100;

		match self {
			Self::Single => 0,

			Self::Germanic => usize::from(n != 1),

			Self::French => usize::from(n > 1),

			// form 0: n%10==1 && n%100!=11
			// form 1: n%10 in 2..=4 && n%100 not in 10..20
			// form 2: everything else
			Self::EastSlavic => {
				if n10 == 1 && n100 != 11 {
					0
				} else if (2..=4).contains(&n10) && !(10..20).contains(&n100) {
					1
				} else {
					2
				}
			}

			Self::Polish => {
				if n == 1 {
					0
				} else if (2..=4).contains(&n10) && !(10..20).contains(&n100) {
					1
				} else {
					2
				}
			}

			Self::CzechSlovak => {
				if n == 1 {
					0
				} else if (2..=4).contains(&n) {
					1
				} else {
					2
				}
			}

			Self::Slovenian => match n100 {
				1 => 0,
				2 => 1,
				3 | 4 => 2,
				_ => 3,
			},

			// form 5 covers n >= 100 with n%100 < 3
			Self::Arabic => {
				if n == 0 {
					0
				} else if n == 1 {
					1
				} else if n == 2 {
					2
				} else if (3..=10).contains(&n100) {
					3
				} else if n100 >= 11 {
					4
				} else {
					5
				}
			}

			Self::Irish => match n {
				1 => 0,
				2 => 1,
				3..=6 => 2,
				7..=10 => 3,
				_ => 4,
			},

			Self::Welsh => match n {
				0 => 0,
				1 => 1,
				2 => 2,
				3 => 3,
				6 => 4,
				_ => 5,
			},

			Self::Lithuanian => {
				if n10 == 1 && n100 != 11 {
					0
				} else if n10 >= 2 && !(10..20).contains(&n100) {
					1
				} else {
					2
				}
			}

			Self::Latvian => {
				if n10 == 1 && n100 != 11 {
					0
				} else if n != 0 {
					1
				} else {
					2
				}
			}

			Self::Romanian => {
				if n == 1 {
					0
				} else if n == 0 || (1..20).contains(&n100) {
					1
				} else {
					2
				}
			}

			Self::Custom { select, .. } => select(n),
		}
	}

	fn name(&self) -> &'static str {
		match self {
			Self::Single => "Single",
			Self::Germanic => "Germanic",
			Self::French => "French",
			Self::EastSlavic => "EastSlavic",
			Self::Polish => "Polish",
			Self::CzechSlovak => "CzechSlovak",
			Self::Slovenian => "Slovenian",
			Self::Arabic => "Arabic",
			Self::Irish => "Irish",
			Self::Welsh => "Welsh",
			Self::Lithuanian => "Lithuanian",
			Self::Latvian => "Latvian",
			Self::Romanian => "Romanian",
			Self::Custom { .. } => "Custom",
		}
	}
}

impl fmt::Debug for PluralRule {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Custom { forms, .. } => f.debug_struct("Custom").field("forms", forms).finish(),
			other => f.write_str(other.name()),
		}
	}
}

/// Table of plural rules keyed by language tag.
///
/// Full tags (`pt-BR`) take precedence over primary subtags (`pt`); languages
/// absent from the table use the default rule.
///
/// # Example
/// ```
/// use rosetta_catalog::{PluralRule, PluralRules};
///
/// let rules = PluralRules::standard();
///
/// assert_eq!(rules.rule_for("ur_PK").form_count(), 2);
/// assert_eq!(rules.rule_for("ru").form_count(), 3);
/// assert_eq!(rules.rule_for("ar").form_count(), 6);
/// assert_eq!(rules.rule_for("ja").form_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct PluralRules {
	rules: HashMap<String, PluralRule>,
	default: PluralRule,
}

impl Default for PluralRules {
	fn default() -> Self {
		Self::standard()
	}
}

impl PluralRules {
	/// An empty table that answers every language with `default`
	pub fn empty(default: PluralRule) -> Self {
		Self {
			rules: HashMap::new(),
			default,
		}
	}

	/// The built-in table
	pub fn standard() -> Self {
		let mut table = Self::empty(PluralRule::Germanic);

		for tag in ["ja", "zh", "ko", "vi", "th", "id", "ms", "tr", "fa", "ka"] {
			table.insert(tag, PluralRule::Single);
		}
		table.insert("fr", PluralRule::French);
		table.insert("pt-BR", PluralRule::French);
		for tag in ["ru", "uk", "be", "sr", "hr", "bs"] {
			table.insert(tag, PluralRule::EastSlavic);
		}
		table.insert("pl", PluralRule::Polish);
		table.insert("cs", PluralRule::CzechSlovak);
		table.insert("sk", PluralRule::CzechSlovak);
		table.insert("sl", PluralRule::Slovenian);
		table.insert("ar", PluralRule::Arabic);
		table.insert("ga", PluralRule::Irish);
		table.insert("cy", PluralRule::Welsh);
		table.insert("lt", PluralRule::Lithuanian);
		table.insert("lv", PluralRule::Latvian);
		table.insert("ro", PluralRule::Romanian);

		table
	}

	/// Register or replace the rule for a tag
	pub fn insert(&mut self, tag: &str, rule: PluralRule) {
		self.rules.insert(table_key(tag), rule);
	}

	/// Builder form of [`insert`](Self::insert)
	pub fn with_rule(mut self, tag: &str, rule: PluralRule) -> Self {
		self.insert(tag, rule);
		self
	}

	/// Rule for a language tag in either spelling
	pub fn rule_for(&self, tag: &str) -> PluralRule {
		if let Some(rule) = self.rules.get(&table_key(tag)) {
			return *rule;
		}
		self.rules
			.get(&language::primary_language(tag))
			.copied()
			.unwrap_or(self.default)
	}
}

fn table_key(tag: &str) -> String {
	language::canonical(tag).unwrap_or_else(|| tag.trim().to_ascii_lowercase())
}

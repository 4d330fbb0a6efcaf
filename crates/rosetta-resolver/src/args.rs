//! Runtime arguments substituted into `%1`-style placeholders

use crate::numeric::NumberFormat;
use std::fmt;

/// A positional placeholder argument
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
	Text(String),
	Int(i64),
	UInt(u64),
	Float(f64),
}

impl Arg {
	/// Render for a plain (`%1`) or localized (`%L1`) placeholder.
	/// Text renders the same either way.
	pub fn render(&self, localized: Option<&NumberFormat>) -> String {
		match (self, localized) {
			(Arg::Text(text), _) => text.clone(),
			(Arg::Int(value), Some(format)) => format.format_int(*value),
			(Arg::UInt(value), Some(format)) => format.format_uint(*value),
			(Arg::Float(value), Some(format)) => format.format_float(*value),
			(other, None) => other.to_string(),
		}
	}
}

impl fmt::Display for Arg {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Arg::Text(text) => f.write_str(text),
			Arg::Int(value) => write!(f, "{}", value),
			Arg::UInt(value) => write!(f, "{}", value),
			Arg::Float(value) => write!(f, "{}", value),
		}
	}
}

impl From<&str> for Arg {
	fn from(value: &str) -> Self {
		Arg::Text(value.to_string())
	}
}

impl From<String> for Arg {
	fn from(value: String) -> Self {
		Arg::Text(value)
	}
}

impl From<&String> for Arg {
	fn from(value: &String) -> Self {
		Arg::Text(value.clone())
	}
}

macro_rules! impl_from_number {
	($variant:ident($target:ty): $($source:ty),+) => {
		$(
			impl From<$source> for Arg {
				fn from(value: $source) -> Self {
					Arg::$variant(<$target>::from(value))
				}
			}
		)+
	};
}

impl_from_number!(Int(i64): i8, i16, i32, i64);
impl_from_number!(UInt(u64): u8, u16, u32, u64);
impl_from_number!(Float(f64): f32, f64);

impl From<usize> for Arg {
	fn from(value: usize) -> Self {
		Arg::UInt(value as u64)
	}
}

impl From<isize> for Arg {
	fn from(value: isize) -> Self {
		Arg::Int(value as i64)
	}
}

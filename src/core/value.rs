//! Argument values passed to command handlers.
//!
//! Command line tokens are coerced into the narrowest matching type:
//! boolean first, then 32-bit integer, otherwise the raw string.

use std::fmt::{self, Display};

/// A single positional argument value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArgValue {
    /// `true` / `false` (case-insensitive on input).
    Bool(bool),
    /// A signed 32-bit integer.
    Int(i32),
    /// Anything else, kept verbatim.
    Str(String),
}

impl ArgValue {
    /// Coerce a raw token.
    ///
    /// # Examples
    ///
    /// ```
    /// use debug_console::core::ArgValue;
    ///
    /// assert_eq!(ArgValue::coerce("True"), ArgValue::Bool(true));
    /// assert_eq!(ArgValue::coerce("-7"), ArgValue::Int(-7));
    /// assert_eq!(ArgValue::coerce("hello"), ArgValue::Str("hello".into()));
    /// ```
    pub fn coerce(token: &str) -> Self {
        let trimmed = token.trim();

        if trimmed.eq_ignore_ascii_case("true") {
            return ArgValue::Bool(true);
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return ArgValue::Bool(false);
        }
        if let Ok(int) = trimmed.parse::<i32>() {
            return ArgValue::Int(int);
        }

        ArgValue::Str(token.to_string())
    }

    /// The boolean value, if this is a `Bool`.
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ArgValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The integer value, if this is an `Int`.
    #[inline]
    pub fn as_int(&self) -> Option<i32> {
        match self {
            ArgValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// The string value, if this is a `Str`.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Bool(b) => write!(f, "{b}"),
            ArgValue::Int(i) => write!(f, "{i}"),
            ArgValue::Str(s) => f.write_str(s),
        }
    }
}

impl From<bool> for ArgValue {
    fn from(value: bool) -> Self {
        ArgValue::Bool(value)
    }
}

impl From<i32> for ArgValue {
    fn from(value: i32) -> Self {
        ArgValue::Int(value)
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        ArgValue::Str(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        ArgValue::Str(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_bool_before_int() {
        assert_eq!(ArgValue::coerce("true"), ArgValue::Bool(true));
        assert_eq!(ArgValue::coerce("FALSE"), ArgValue::Bool(false));
        // "1" is an integer, not a boolean
        assert_eq!(ArgValue::coerce("1"), ArgValue::Int(1));
    }

    #[test]
    fn test_coerce_int_range() {
        assert_eq!(ArgValue::coerce("42"), ArgValue::Int(42));
        assert_eq!(ArgValue::coerce("+5"), ArgValue::Int(5));
        // Out of i32 range stays a string
        assert_eq!(
            ArgValue::coerce("99999999999"),
            ArgValue::Str("99999999999".into())
        );
    }

    #[test]
    fn test_coerce_string_fallback() {
        assert_eq!(ArgValue::coerce("4.5"), ArgValue::Str("4.5".into()));
        assert_eq!(ArgValue::coerce("yes"), ArgValue::Str("yes".into()));
    }

    #[test]
    fn test_accessors() {
        assert_eq!(ArgValue::Bool(true).as_bool(), Some(true));
        assert_eq!(ArgValue::Int(3).as_bool(), None);
        assert_eq!(ArgValue::Int(3).as_int(), Some(3));
        assert_eq!(ArgValue::from("x").as_str(), Some("x"));
    }

    #[test]
    fn test_display_is_lowercase_for_bools() {
        assert_eq!(ArgValue::Bool(false).to_string(), "false");
        assert_eq!(ArgValue::Int(-2).to_string(), "-2");
    }
}

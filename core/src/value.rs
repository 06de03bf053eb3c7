//! Parameter kinds and the values parameters hold.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Declared kind of a parameter.
///
/// Drives how [`Registry::populate`](crate::Registry::populate) coerces the
/// raw string carried by a token.
///
/// # Examples
///
/// ```
/// use command_signature_core::{ParamType, Value};
///
/// assert_eq!(ParamType::parse("array"), Some(ParamType::Array));
/// assert_eq!(ParamType::parse("object"), None);
/// assert_eq!(Value::Number(3.0).inferred_type(), Some(ParamType::Number));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    /// Flag semantics: bare references set `true`.
    Boolean,
    /// Token value kept verbatim.
    String,
    /// Token value parsed as a float; garbage becomes `NaN`.
    Number,
    /// Token values accumulate into a list.
    Array,
}

impl ParamType {
    /// Parses a type name as written in a signature (`"boolean"`, ...).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "boolean" => Some(Self::Boolean),
            "string" => Some(Self::String),
            "number" => Some(Self::Number),
            "array" => Some(Self::Array),
            _ => None,
        }
    }

    /// Returns the name used in signatures and diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::String => "string",
            Self::Number => "number",
            Self::Array => "array",
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parameter value: a declared default or the result of coercing tokens.
///
/// Serializes untagged, so a value map renders as plain JSON. Non-finite
/// numbers serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
}

impl Value {
    /// Converts a JSON literal into a value.
    ///
    /// Returns the JSON kind name (`"null"` or `"object"`) when the literal
    /// has no [`Value`] counterpart.
    pub fn from_json(json: &serde_json::Value) -> std::result::Result<Self, &'static str> {
        match json {
            serde_json::Value::Bool(b) => Ok(Self::Bool(*b)),
            serde_json::Value::Number(n) => Ok(Self::Number(n.as_f64().unwrap_or(f64::NAN))),
            serde_json::Value::String(s) => Ok(Self::String(s.clone())),
            serde_json::Value::Array(items) => items
                .iter()
                .map(Self::from_json)
                .collect::<std::result::Result<Vec<_>, _>>()
                .map(Self::Array),
            serde_json::Value::Null => Err("null"),
            serde_json::Value::Object(_) => Err("object"),
        }
    }

    /// The parameter type a default of this kind implies.
    pub fn inferred_type(&self) -> Option<ParamType> {
        Some(match self {
            Self::Bool(_) => ParamType::Boolean,
            Self::Number(_) => ParamType::Number,
            Self::String(_) => ParamType::String,
            Self::Array(_) => ParamType::Array,
        })
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) if n.is_nan() => f.write_str("NaN"),
            Self::Number(n) if n.is_infinite() => {
                f.write_str(if *n > 0.0 { "Infinity" } else { "-Infinity" })
            }
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
            Self::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::Array(items.into_iter().map(Into::into).collect())
    }
}

/// Parses a token value the way a loose numeric cast does.
///
/// Surrounding whitespace is ignored, an empty string is `0`, `0x`/`0o`/`0b`
/// prefixes select a radix and `Infinity` is recognised. Anything else that
/// is not a decimal float yields `NaN` rather than an error.
///
/// # Examples
///
/// ```
/// use command_signature_core::parse_number;
///
/// assert_eq!(parse_number("10"), 10.0);
/// assert_eq!(parse_number(" 2.5 "), 2.5);
/// assert_eq!(parse_number(""), 0.0);
/// assert_eq!(parse_number("0x10"), 16.0);
/// assert!(parse_number("ten").is_nan());
/// ```
pub fn parse_number(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = trimmed.strip_prefix(prefix) {
            if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
                return f64::NAN;
            }
            return u128::from_str_radix(digits, radix)
                .map(|n| n as f64)
                .unwrap_or(f64::INFINITY);
        }
    }

    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    let decimal = trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'));
    if !decimal {
        return f64::NAN;
    }
    trimmed.parse().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number_decimal_forms() {
        assert_eq!(parse_number("42"), 42.0);
        assert_eq!(parse_number("-3.5"), -3.5);
        assert_eq!(parse_number("1e3"), 1000.0);
        assert_eq!(parse_number(".5"), 0.5);
        assert_eq!(parse_number("  7\n"), 7.0);
    }

    #[test]
    fn test_parse_number_rejects_words() {
        assert!(parse_number("abc").is_nan());
        assert!(parse_number("inf").is_nan());
        assert!(parse_number("nan").is_nan());
        assert!(parse_number("0x").is_nan());
        assert!(parse_number("0b102").is_nan());
        assert!(parse_number("1-2").is_nan());
    }

    #[test]
    fn test_parse_number_special_forms() {
        assert_eq!(parse_number("0b101"), 5.0);
        assert_eq!(parse_number("0o17"), 15.0);
        assert_eq!(parse_number("Infinity"), f64::INFINITY);
        assert_eq!(parse_number("-Infinity"), f64::NEG_INFINITY);
    }

    #[test]
    fn test_value_display_matches_cli_rendering() {
        assert_eq!(Value::Number(10.0).to_string(), "10");
        assert_eq!(Value::Number(f64::NAN).to_string(), "NaN");
        assert_eq!(Value::from(vec!["a", "b"]).to_string(), "a,b");
        assert_eq!(Value::Bool(false).to_string(), "false");
    }

    #[test]
    fn test_value_from_json_rejects_null_and_objects() {
        assert_eq!(Value::from_json(&serde_json::json!(null)), Err("null"));
        assert_eq!(Value::from_json(&serde_json::json!({"a": 1})), Err("object"));
        assert_eq!(
            Value::from_json(&serde_json::json!(["x", 1])),
            Ok(Value::Array(vec![Value::from("x"), Value::Number(1.0)]))
        );
    }

    #[test]
    fn test_value_serializes_untagged() {
        let json = serde_json::to_value(Value::from(vec!["a"])).unwrap();
        assert_eq!(json, serde_json::json!(["a"]));
        let json = serde_json::to_value(Value::Number(f64::NAN)).unwrap();
        assert_eq!(json, serde_json::Value::Null);
    }
}

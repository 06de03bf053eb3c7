//! Raw command-line token parsing.
//!
//! ```text
//! token      := flagToken | positionalToken
//! flagToken  := ("--" | "-") name ["=" value]
//! positional := value        // name defaults to the token index
//! ```
//!
//! No quoting or escaping is interpreted: values are substrings of the raw
//! token.

/// A token split into the parameter name it addresses and an optional value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub name: String,
    pub value: Option<String>,
}

impl Token {
    /// Parses `raw`, naming positional tokens `positional_name`.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_signature_core::Token;
    ///
    /// let t = Token::parse("--name=foo", "0");
    /// assert_eq!((t.name.as_str(), t.value.as_deref()), ("name", Some("foo")));
    ///
    /// let t = Token::parse("-verbose", "0");
    /// assert_eq!((t.name.as_str(), t.value), ("verbose", None));
    ///
    /// let t = Token::parse("hello", "2");
    /// assert_eq!((t.name.as_str(), t.value.as_deref()), ("2", Some("hello")));
    /// ```
    pub fn parse(raw: &str, positional_name: &str) -> Self {
        let Some(flag) = raw.strip_prefix('-') else {
            return Self {
                name: positional_name.to_string(),
                value: Some(raw.to_string()),
            };
        };

        let flag = flag.strip_prefix('-').unwrap_or(flag);
        match flag.split_once('=') {
            Some((name, value)) => Self {
                name: name.to_string(),
                value: Some(value.to_string()),
            },
            None => Self {
                name: flag.to_string(),
                value: None,
            },
        }
    }

    /// Whether the token was positional or carried `=value`.
    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(raw: &str) -> (String, Option<String>) {
        let token = Token::parse(raw, "7");
        (token.name, token.value)
    }

    #[test]
    fn test_single_and_double_dash_are_equivalent() {
        assert_eq!(parts("-command=b"), ("command".into(), Some("b".into())));
        assert_eq!(parts("--command=b"), ("command".into(), Some("b".into())));
    }

    #[test]
    fn test_splits_on_first_equals_only() {
        assert_eq!(parts("-expr=a=b"), ("expr".into(), Some("a=b".into())));
        assert_eq!(parts("-empty="), ("empty".into(), Some(String::new())));
    }

    #[test]
    fn test_strips_at_most_two_dashes() {
        assert_eq!(parts("---x"), ("-x".into(), None));
        assert_eq!(parts("-"), (String::new(), None));
        assert_eq!(parts("--"), (String::new(), None));
    }

    #[test]
    fn test_positional_keeps_raw_value() {
        assert_eq!(parts("a=b"), ("7".into(), Some("a=b".into())));
        assert_eq!(parts(""), ("7".into(), Some(String::new())));
    }
}

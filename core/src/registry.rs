//! The parameter registry: lookup, population, projection and dispatch.
//!
//! A [`Registry`] owns the flat parameter list produced by
//! [`compile`](crate::compile()). Tokens mutate parameter values in input
//! order; [`Registry::matched`] then picks the first declared parameter that
//! is set and carries a handler, and [`Registry::exec`] invokes it.
//!
//! # Example
//!
//! ```
//! use command_signature_core::{Descriptor, ParamType, Registry, SignatureMap};
//!
//! let signatures = SignatureMap::new()
//!     .with("greet", Descriptor::new()
//!         .with_type(ParamType::Boolean)
//!         .with_handler(|values| {
//!             let name = values.get_str("name").unwrap_or("world");
//!             serde_json::json!(format!("hello {name}"))
//!         }))
//!     .with("name", Descriptor::new().with_type(ParamType::String).with_alias("n"));
//!
//! let mut registry = Registry::compile(&signatures);
//! let result = registry.exec(["-greet", "--name=ferris"]).unwrap();
//! assert_eq!(result, Some(serde_json::json!("hello ferris")));
//! ```

use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{LoadError, Result, SignatureError};
use crate::signature::SignatureMap;
use crate::{Handlers, Param, Token, Values, compile, load_document};

/// Ordered, flattened parameters plus the operations over them.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    params: Vec<Param>,
}

impl Registry {
    /// Wraps an already compiled parameter list.
    pub fn new(params: Vec<Param>) -> Self {
        Self { params }
    }

    /// Compiles `signatures` into a registry with default values applied.
    pub fn compile(signatures: &SignatureMap) -> Self {
        Self::new(compile(signatures))
    }

    /// Reads and compiles a JSON signature document.
    ///
    /// # Errors
    ///
    /// Propagates [`SignatureMap::from_json`] failures; nothing is compiled
    /// if any definition is rejected.
    pub fn from_json(document: &serde_json::Value, handlers: &Handlers) -> Result<Self> {
        let signatures = SignatureMap::from_json(document, handlers)?;
        Ok(Self::compile(&signatures))
    }

    /// Loads a JSON or YAML signature file and compiles it.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] for I/O and parse failures, or a wrapped
    /// [`SignatureError`] for invalid definitions.
    pub fn load(path: impl AsRef<Path>, handlers: &Handlers) -> std::result::Result<Self, LoadError> {
        let document = load_document(path)?;
        Ok(Self::from_json(&document, handlers)?)
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Param> {
        self.params.iter()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Looks up a parameter by name.
    ///
    /// Scans in declaration order and returns the first parameter that
    /// either has exactly this name or whose own alias list contains its own
    /// name. The second condition does not look at `name`; see
    /// [`alias_lookup_hit`].
    ///
    /// # Examples
    ///
    /// ```
    /// use command_signature_core::{Descriptor, Registry, SignatureMap};
    ///
    /// let registry = Registry::compile(&SignatureMap::new()
    ///     .with("remote", Descriptor::new().with_params(
    ///         SignatureMap::new().with("add", Descriptor::new()),
    ///     )));
    ///
    /// assert_eq!(registry.get("remote-add").unwrap().name(), "remote-add");
    /// assert!(registry.get("add").is_none());
    /// ```
    pub fn get(&self, name: &str) -> Option<&Param> {
        self.position(name).map(|index| &self.params[index])
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.params
            .iter()
            .position(|param| param.name() == name || alias_lookup_hit(param, name))
    }

    /// Applies one raw token.
    ///
    /// Positional tokens address the parameter named `positional_name`.
    /// Token values are coerced per the parameter's type; a bare boolean
    /// reference sets `true`. For dashed names, every dash-prefix must then
    /// resolve through [`get`](Self::get).
    ///
    /// # Errors
    ///
    /// - [`SignatureError::UnknownParam`] if the name does not resolve.
    /// - [`SignatureError::EnumViolation`] if an array value is outside its
    ///   `enum`; the previous value is kept.
    /// - [`SignatureError::MissingParent`] naming the first unregistered
    ///   ancestor. The value has already been applied at that point.
    pub fn populate(&mut self, raw: &str, positional_name: &str) -> Result<()> {
        let Token { name, value } = Token::parse(raw, positional_name);
        let index = self
            .position(&name)
            .ok_or_else(|| SignatureError::UnknownParam(raw.to_string()))?;

        let param = &mut self.params[index];
        match value {
            Some(value) => param.assign(&name, value)?,
            None => param.mark_present(),
        }
        debug!(token = raw, param = param.name(), value = ?param.value(), "populated param");

        self.check_ancestors(raw, &name)
    }

    fn check_ancestors(&self, raw: &str, name: &str) -> Result<()> {
        let mut segments: Vec<&str> = name.split('-').collect();
        segments.pop();

        for depth in 1..=segments.len() {
            let parent = segments[..depth].join("-");
            if self.position(&parent).is_none() {
                return Err(SignatureError::MissingParent {
                    token: raw.to_string(),
                    parent,
                });
            }
        }
        Ok(())
    }

    /// Populates every token in order, naming positionals by their index.
    ///
    /// Stops at the first failing token; earlier tokens stay applied.
    pub fn set_all<I, S>(&mut self, tokens: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for (index, token) in tokens.into_iter().enumerate() {
            self.populate(token.as_ref(), &index.to_string())?;
        }
        Ok(())
    }

    /// Projects all parameters into a value map.
    ///
    /// Each parameter's value is written under every alias, then under its
    /// name, in declaration order; later writes win. An unset parameter
    /// clears the keys it would write.
    pub fn to_values(&self) -> Values {
        let mut values = Values::new();
        for param in &self.params {
            for alias in param.aliases() {
                values.set(alias, param.value().cloned());
            }
            values.set(param.name(), param.value().cloned());
        }
        values
    }

    /// Returns the first parameter, in declaration order, that holds a value
    /// and a handler. Boolean parameters set to `false` are skipped.
    pub fn matched(&self) -> Option<&Param> {
        self.params.iter().find(|param| param.is_dispatchable())
    }

    /// Populates `tokens`, then invokes the matched handler with
    /// [`to_values`](Self::to_values).
    ///
    /// Returns `Ok(None)` and logs a warning when no handler matches.
    ///
    /// # Errors
    ///
    /// Any [`populate`](Self::populate) error; the handler is not invoked.
    pub fn exec<I, S>(&mut self, tokens: I) -> Result<Option<serde_json::Value>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.set_all(tokens)?;

        let Some(command) = self.matched() else {
            warn!("command signature not found");
            return Ok(None);
        };
        let Some(handler) = command.handler() else {
            return Ok(None);
        };

        info!(command = command.name(), "dispatching command");
        Ok(Some(handler(&self.to_values())))
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a Param;
    type IntoIter = std::slice::Iter<'a, Param>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.iter()
    }
}

/// Alias half of the [`Registry::get`] lookup.
///
/// A parameter hits when its comma-split alias list contains the
/// parameter's own name. The queried name is deliberately unused: a
/// parameter aliased to itself captures every lookup that reaches it, and
/// plain aliases are only visible through [`Registry::to_values`].
pub fn alias_lookup_hit(param: &Param, _query: &str) -> bool {
    param.aliases().any(|alias| alias == param.name())
}

#[cfg(test)]
mod tests {
    use crate::{Descriptor, ParamType, Value};

    use super::*;

    #[test]
    fn test_populate_named_string() {
        let mut registry = Registry::compile(
            &SignatureMap::new()
                .with("name", Descriptor::new().with_type(ParamType::String).with_default(true))
                .with("age", Descriptor::new().with_type(ParamType::Number)),
        );

        registry.populate("-name=foo", "0").unwrap();
        registry.populate("-age=10", "1").unwrap();

        assert_eq!(registry.get("name").unwrap().value(), Some(&Value::from("foo")));
        assert_eq!(registry.get("age").unwrap().value(), Some(&Value::Number(10.0)));
    }

    #[test]
    fn test_unknown_param_reports_raw_token() {
        let mut registry = Registry::compile(&SignatureMap::new().with("a", true));
        let err = registry.populate("--nope=1", "0").unwrap_err();
        assert_eq!(err, SignatureError::UnknownParam("--nope=1".into()));
        assert_eq!(err.to_string(), "unknown param: --nope=1");
    }

    #[test]
    fn test_missing_parent_after_value_applied() {
        let mut registry = Registry::compile(
            &SignatureMap::new().with("dry-run", Descriptor::new().with_type(ParamType::Boolean)),
        );

        let err = registry.populate("--dry-run", "0").unwrap_err();
        assert_eq!(
            err,
            SignatureError::MissingParent {
                token: "--dry-run".into(),
                parent: "dry".into()
            }
        );
        assert_eq!(err.to_string(), "--dry-run must be used with -dry");
        // No rollback.
        assert_eq!(registry.get("dry-run").unwrap().value(), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_plain_alias_does_not_resolve() {
        let registry =
            Registry::compile(&SignatureMap::new().with("first", Descriptor::new().with_alias("f")));

        assert_eq!(registry.get("first").unwrap().name(), "first");
        assert!(registry.get("f").is_none());
    }

    #[test]
    fn test_self_alias_captures_later_lookups() {
        let registry = Registry::compile(
            &SignatureMap::new()
                .with("first", Descriptor::new())
                .with("looped", Descriptor::new().with_alias("l,looped"))
                .with("last", Descriptor::new()),
        );

        assert_eq!(registry.get("first").unwrap().name(), "first");
        assert_eq!(registry.get("last").unwrap().name(), "looped");
        assert_eq!(registry.get("anything").unwrap().name(), "looped");
    }

    #[test]
    fn test_to_values_primary_name_wins_within_param() {
        let registry = Registry::compile(
            &SignatureMap::new()
                .with("x", Descriptor::new().with_default(5.0).with_alias("a,x")),
        );
        let values = registry.to_values();
        assert_eq!(values.get_f64("a"), Some(5.0));
        assert_eq!(values.get_f64("x"), Some(5.0));
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn test_to_values_unset_later_param_clears_alias_key() {
        let registry = Registry::compile(
            &SignatureMap::new()
                .with("out", Descriptor::new().with_default("a.txt"))
                .with("output", Descriptor::new().with_alias("out")),
        );
        let values = registry.to_values();
        assert!(!values.contains_key("out"));
        assert!(!values.contains_key("output"));
    }

    #[test]
    fn test_exec_propagates_populate_errors() {
        let mut registry = Registry::compile(
            &SignatureMap::new().with(
                "run",
                Descriptor::new()
                    .with_type(ParamType::Boolean)
                    .with_handler(|_| serde_json::json!("ran")),
            ),
        );
        let err = registry.exec(["-run", "-unknown"]).unwrap_err();
        assert_eq!(err, SignatureError::UnknownParam("-unknown".into()));
        assert_eq!(registry.get("run").unwrap().value(), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_iterates_in_declaration_order() {
        let registry = Registry::compile(&SignatureMap::new().with("b", true).with("a", true));
        let names: Vec<&str> = registry.iter().map(Param::name).collect();
        assert_eq!(names, ["b", "a"]);
        assert_eq!((&registry).into_iter().count(), 2);
    }
}

//! Compiled, flattened parameters and their value coercion.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::{Result, SignatureError};
use crate::{Handler, ParamType, Value, parse_number};

/// One recognised parameter.
///
/// A `Param`'s shape is fixed once compiled; only its value changes, and
/// only through [`Registry::populate`](crate::Registry::populate).
#[derive(Clone, Serialize)]
pub struct Param {
    name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    param_type: Option<ParamType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    default: Option<Value>,
    #[serde(rename = "fn", serialize_with = "serialize_handler")]
    handler: Option<Handler>,
    main: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    alias: Option<String>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    allowed: Option<Vec<Value>>,
}

impl Param {
    pub(crate) fn new(
        name: String,
        param_type: Option<ParamType>,
        default: Option<Value>,
        handler: Option<Handler>,
        main: bool,
        alias: Option<String>,
        allowed: Option<Vec<Value>>,
    ) -> Self {
        Self {
            name,
            param_type,
            value: default.clone(),
            default,
            handler,
            main,
            alias,
            allowed,
        }
    }

    /// Fully-qualified, dash-joined name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn param_type(&self) -> Option<ParamType> {
        self.param_type
    }

    /// Current value; `None` until populated unless a default was declared.
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn handler(&self) -> Option<&Handler> {
        self.handler.as_ref()
    }

    pub fn is_main(&self) -> bool {
        self.main
    }

    /// Raw comma-separated alias list.
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Alias names, split on `,` without trimming.
    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.alias
            .as_deref()
            .filter(|alias| !alias.is_empty())
            .into_iter()
            .flat_map(|alias| alias.split(','))
    }

    /// Declared `enum` values.
    pub fn allowed(&self) -> Option<&[Value]> {
        self.allowed.as_deref()
    }

    /// Whether this parameter can be picked by
    /// [`Registry::matched`](crate::Registry::matched): it has a value and a
    /// handler, and is not a boolean switched off.
    pub fn is_dispatchable(&self) -> bool {
        match (&self.value, &self.handler) {
            (Some(Value::Bool(false)), Some(_)) => self.param_type != Some(ParamType::Boolean),
            (Some(_), Some(_)) => true,
            _ => false,
        }
    }

    /// Applies a token value. `name` is the name the token resolved to and
    /// only feeds error messages.
    pub(crate) fn assign(&mut self, name: &str, raw: String) -> Result<()> {
        let value = match self.param_type {
            Some(ParamType::Boolean) => Value::Bool(!raw.is_empty()),
            Some(ParamType::Number) => Value::Number(parse_number(&raw)),
            Some(ParamType::Array) => return self.append(name, raw),
            Some(ParamType::String) | None => Value::String(raw),
        };
        self.value = Some(value);
        Ok(())
    }

    /// Handles a bare reference (`-flag`). Only booleans react to it.
    pub(crate) fn mark_present(&mut self) {
        if self.param_type == Some(ParamType::Boolean) {
            self.value = Some(Value::Bool(true));
        }
    }

    fn append(&mut self, name: &str, raw: String) -> Result<()> {
        let item = Value::String(raw);

        if let Some(allowed) = &self.allowed {
            if !allowed.contains(&item) {
                return Err(SignatureError::EnumViolation {
                    name: name.to_string(),
                    allowed: Value::Array(allowed.clone()).to_string(),
                    value: item.to_string(),
                });
            }
        }

        if let Some(Value::Array(items)) = &mut self.value {
            // Enum-constrained arrays behave like sets.
            if self.allowed.is_none() || !items.contains(&item) {
                items.push(item);
            }
            return Ok(());
        }

        self.value = Some(Value::Array(vec![item]));
        Ok(())
    }
}

impl fmt::Debug for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Param")
            .field("name", &self.name)
            .field("param_type", &self.param_type)
            .field("value", &self.value)
            .field("default", &self.default)
            .field("handler", &self.handler.is_some())
            .field("main", &self.main)
            .field("alias", &self.alias)
            .field("allowed", &self.allowed)
            .finish()
    }
}

fn serialize_handler<S: Serializer>(
    handler: &Option<Handler>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_bool(handler.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(param_type: Option<ParamType>) -> Param {
        Param::new("p".into(), param_type, None, None, false, None, None)
    }

    #[test]
    fn test_boolean_uses_truthiness() {
        let mut p = param(Some(ParamType::Boolean));
        p.assign("p", "false".into()).unwrap();
        assert_eq!(p.value(), Some(&Value::Bool(true)));
        p.assign("p", String::new()).unwrap();
        assert_eq!(p.value(), Some(&Value::Bool(false)));
    }

    #[test]
    fn test_number_never_fails() {
        let mut p = param(Some(ParamType::Number));
        p.assign("p", "ten".into()).unwrap();
        assert!(p.value().and_then(Value::as_f64).unwrap().is_nan());
    }

    #[test]
    fn test_untyped_keeps_string() {
        let mut p = param(None);
        p.assign("p", "42".into()).unwrap();
        assert_eq!(p.value(), Some(&Value::from("42")));
    }

    #[test]
    fn test_array_appends_to_array_default() {
        let mut p = Param::new(
            "p".into(),
            Some(ParamType::Array),
            Some(Value::from(vec!["a"])),
            None,
            false,
            None,
            None,
        );
        p.assign("p", "b".into()).unwrap();
        assert_eq!(p.value(), Some(&Value::from(vec!["a", "b"])));
        assert_eq!(p.default_value(), Some(&Value::from(vec!["a"])));
    }

    #[test]
    fn test_array_replaces_scalar_value() {
        let mut p = Param::new(
            "p".into(),
            Some(ParamType::Array),
            Some(Value::from("x")),
            None,
            false,
            None,
            None,
        );
        p.assign("p", "b".into()).unwrap();
        assert_eq!(p.value(), Some(&Value::from(vec!["b"])));
    }

    #[test]
    fn test_bare_reference_ignored_for_non_boolean() {
        let mut p = param(Some(ParamType::String));
        p.mark_present();
        assert!(p.value().is_none());

        let mut p = param(Some(ParamType::Boolean));
        p.mark_present();
        assert_eq!(p.value(), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_aliases_split_without_trimming() {
        let p = Param::new("x".into(), None, None, None, false, Some("a, b".into()), None);
        let aliases: Vec<&str> = p.aliases().collect();
        assert_eq!(aliases, ["a", " b"]);

        let p = Param::new("x".into(), None, None, None, false, Some(String::new()), None);
        assert_eq!(p.aliases().count(), 0);
    }

    #[test]
    fn test_serializes_handler_as_flag() {
        let p = Param::new(
            "deploy".into(),
            Some(ParamType::String),
            None,
            Some(crate::handler(|_| serde_json::Value::Null)),
            false,
            None,
            None,
        );
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "deploy", "type": "string", "fn": true, "main": false})
        );
    }
}

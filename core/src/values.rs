//! The projected value map handed to handlers.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::Value;

/// Parameter values keyed by primary name and by every alias.
///
/// Produced by [`Registry::to_values`](crate::Registry::to_values). Keys whose
/// parameter is unset are absent.
///
/// # Examples
///
/// ```
/// use command_signature_core::{Descriptor, ParamType, Registry, SignatureMap};
///
/// let signatures = SignatureMap::new()
///     .with("x", Descriptor::new().with_type(ParamType::Number).with_alias("a,b"));
/// let mut registry = Registry::compile(&signatures);
/// registry.populate("-x=5", "0").unwrap();
///
/// let values = registry.to_values();
/// assert_eq!(values.get_f64("x"), Some(5.0));
/// assert_eq!(values.get_f64("a"), Some(5.0));
/// assert_eq!(values.get_f64("b"), Some(5.0));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Values {
    entries: BTreeMap<String, Value>,
}

impl Values {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes `value` under `key`; writing `None` clears the key.
    pub fn set(&mut self, key: impl Into<String>, value: Option<Value>) {
        let key = key.into();
        match value {
            Some(value) => {
                self.entries.insert(key, value);
            }
            None => {
                self.entries.remove(&key);
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_f64)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_array(&self, key: &str) -> Option<&[Value]> {
        self.get(key).and_then(Value::as_array)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Values {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

//! Signature definitions: the declarative input to the compiler.
//!
//! A [`SignatureMap`] maps schema keys to [`SignatureDef`]s. A definition is
//! either a [`Literal`] (a boolean or string default) or a full
//! [`Descriptor`]. Documents read from JSON or YAML are classified once, at
//! this boundary, by [`SignatureMap::from_json`]; everything downstream works
//! on the typed union.

use std::collections::BTreeSet;
use std::fmt;

use crate::error::{Result, SignatureError};
use crate::{Handler, Handlers, ParamType, Value, Values};

/// A literal signature definition, taken as the parameter's default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    Bool(bool),
    String(String),
}

impl Literal {
    pub fn param_type(&self) -> ParamType {
        match self {
            Self::Bool(_) => ParamType::Boolean,
            Self::String(_) => ParamType::String,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Self::Bool(b) => Value::Bool(*b),
            Self::String(s) => Value::String(s.clone()),
        }
    }
}

/// A full parameter descriptor.
///
/// Every field is optional. Build one with [`Descriptor::new`] and the
/// `with_*` methods.
///
/// # Examples
///
/// ```
/// use command_signature_core::{Descriptor, ParamType, SignatureMap};
///
/// let build = Descriptor::new()
///     .main()
///     .with_params(SignatureMap::new().with("release", false))
///     .with_handler(|_| serde_json::json!("built"));
///
/// let mode = Descriptor::new()
///     .with_type(ParamType::Array)
///     .with_enum(["fast", "safe"]);
///
/// assert!(build.is_main());
/// assert_eq!(mode.param_type(), Some(ParamType::Array));
/// ```
#[derive(Clone, Default)]
pub struct Descriptor {
    name: Option<String>,
    default: Option<Value>,
    param_type: Option<ParamType>,
    handler: Option<Handler>,
    main: bool,
    alias: Option<String>,
    params: Option<SignatureMap>,
    allowed: Option<Vec<Value>>,
}

impl Descriptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the schema key as the parameter's own name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the default value. Also sets the type when none is explicit.
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn with_type(mut self, param_type: ParamType) -> Self {
        self.param_type = Some(param_type);
        self
    }

    pub fn with_handler<F>(mut self, f: F) -> Self
    where
        F: Fn(&Values) -> serde_json::Value + Send + Sync + 'static,
    {
        self.handler = Some(crate::handler(f));
        self
    }

    /// Attaches an already shared handler.
    pub fn with_shared_handler(mut self, handler: Handler) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Marks this parameter as an anchor command: its own name is never
    /// prefixed by its parent's.
    pub fn main(mut self) -> Self {
        self.main = true;
        self
    }

    /// Comma-separated alternate names.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_params(mut self, params: SignatureMap) -> Self {
        self.params = Some(params);
        self
    }

    /// Allowed values for an `array` parameter.
    pub fn with_enum<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.allowed = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// The explicit type, or the one inferred from the default.
    pub fn param_type(&self) -> Option<ParamType> {
        self.param_type
            .or_else(|| self.default.as_ref().and_then(Value::inferred_type))
    }

    /// The type as written, ignoring any default.
    pub fn explicit_type(&self) -> Option<ParamType> {
        self.param_type
    }

    pub fn handler(&self) -> Option<&Handler> {
        self.handler.as_ref()
    }

    pub fn is_main(&self) -> bool {
        self.main
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn params(&self) -> Option<&SignatureMap> {
        self.params.as_ref()
    }

    pub fn allowed(&self) -> Option<&[Value]> {
        self.allowed.as_deref()
    }

    fn from_json(
        key: &str,
        object: &serde_json::Map<String, serde_json::Value>,
        handlers: &Handlers,
    ) -> Result<Self> {
        let invalid = |field: &str, expected: &str| SignatureError::InvalidDescriptor {
            key: key.to_string(),
            field: field.to_string(),
            expected: expected.to_string(),
        };

        let mut descriptor = Self::new();

        if let Some(name) = object.get("name") {
            let name = name.as_str().ok_or_else(|| invalid("name", "a string"))?;
            descriptor.name = Some(name.to_string());
        }

        match object.get("default") {
            None | Some(serde_json::Value::Null) => {}
            Some(default) => {
                let value = Value::from_json(default)
                    .map_err(|_| invalid("default", "a boolean, number, string or array"))?;
                descriptor.default = Some(value);
            }
        }

        if let Some(param_type) = object.get("type") {
            let param_type = param_type
                .as_str()
                .and_then(ParamType::parse)
                .ok_or_else(|| invalid("type", "one of boolean, string, number, array"))?;
            descriptor.param_type = Some(param_type);
        }

        if let Some(id) = object.get("fn") {
            let id = id.as_str().ok_or_else(|| invalid("fn", "a handler id string"))?;
            let handler = handlers
                .get(id)
                .ok_or_else(|| SignatureError::UnknownHandler(id.to_string()))?;
            descriptor.handler = Some(handler.clone());
        }

        if let Some(main) = object.get("main") {
            descriptor.main = main.as_bool().ok_or_else(|| invalid("main", "a boolean"))?;
        }

        if let Some(alias) = object.get("alias") {
            let alias = alias.as_str().ok_or_else(|| invalid("alias", "a string"))?;
            descriptor.alias = Some(alias.to_string());
        }

        if let Some(params) = object.get("params") {
            descriptor.params = Some(SignatureMap::from_json(params, handlers)?);
        }

        if let Some(allowed) = object.get("enum") {
            let items = allowed
                .as_array()
                .ok_or_else(|| invalid("enum", "an array"))?;
            let values = items
                .iter()
                .map(Value::from_json)
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|_| invalid("enum", "an array of literal values"))?;
            descriptor.allowed = Some(values);
        }

        Ok(descriptor)
    }
}

impl fmt::Debug for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("name", &self.name)
            .field("default", &self.default)
            .field("param_type", &self.param_type)
            .field("handler", &self.handler.is_some())
            .field("main", &self.main)
            .field("alias", &self.alias)
            .field("params", &self.params)
            .field("allowed", &self.allowed)
            .finish()
    }
}

/// One signature definition.
#[derive(Debug, Clone)]
pub enum SignatureDef {
    Literal(Literal),
    Descriptor(Descriptor),
}

impl SignatureDef {
    /// Classifies a JSON definition.
    ///
    /// # Errors
    ///
    /// [`SignatureError::SignatureType`] for literals other than booleans and
    /// strings; descriptor errors from its fields.
    pub fn from_json(key: &str, json: &serde_json::Value, handlers: &Handlers) -> Result<Self> {
        match json {
            serde_json::Value::Bool(b) => Ok(Self::Literal(Literal::Bool(*b))),
            serde_json::Value::String(s) => Ok(Self::Literal(Literal::String(s.clone()))),
            serde_json::Value::Object(object) => {
                Descriptor::from_json(key, object, handlers).map(Self::Descriptor)
            }
            other => Err(SignatureError::SignatureType(json_kind(other).to_string())),
        }
    }
}

impl From<bool> for SignatureDef {
    fn from(b: bool) -> Self {
        Self::Literal(Literal::Bool(b))
    }
}

impl From<&str> for SignatureDef {
    fn from(s: &str) -> Self {
        Self::Literal(Literal::String(s.to_string()))
    }
}

impl From<String> for SignatureDef {
    fn from(s: String) -> Self {
        Self::Literal(Literal::String(s))
    }
}

impl From<Descriptor> for SignatureDef {
    fn from(descriptor: Descriptor) -> Self {
        Self::Descriptor(descriptor)
    }
}

/// Ordered mapping from schema key to definition.
///
/// Keys keep insertion order, which is the order parameters are compiled and
/// matched in. Numeric keys (`0`, `1`, ...) declare positional parameters.
///
/// # Examples
///
/// ```
/// use command_signature_core::{Descriptor, SignatureMap};
///
/// let signatures = SignatureMap::new()
///     .with("verbose", false)
///     .with(0, Descriptor::new().with_default("input.txt"));
///
/// let keys: Vec<&str> = signatures.keys().collect();
/// assert_eq!(keys, ["verbose", "0"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SignatureMap {
    entries: Vec<(String, SignatureDef)>,
}

impl SignatureMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a definition; a repeated key replaces the earlier definition
    /// in place.
    pub fn insert(&mut self, key: impl ToString, def: impl Into<SignatureDef>) {
        let key = key.to_string();
        let def = def.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = def,
            None => self.entries.push((key, def)),
        }
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, key: impl ToString, def: impl Into<SignatureDef>) -> Self {
        self.insert(key, def);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SignatureDef)> {
        self.entries.iter().map(|(k, d)| (k.as_str(), d))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reads a signature map from a JSON document, resolving `fn` ids through
    /// `handlers`.
    ///
    /// # Errors
    ///
    /// [`SignatureError::SignatureType`] if the document (or a nested
    /// `params`) is not an object, or a literal definition is neither a
    /// boolean nor a string. [`SignatureError::InvalidDescriptor`] and
    /// [`SignatureError::UnknownHandler`] for malformed descriptors.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_signature_core::{Handlers, SignatureError, SignatureMap};
    ///
    /// let ok = serde_json::json!({ "name": "anonymous", "force": false });
    /// assert_eq!(SignatureMap::from_json(&ok, &Handlers::new()).unwrap().len(), 2);
    ///
    /// let bad = serde_json::json!({ "retries": 3 });
    /// assert_eq!(
    ///     SignatureMap::from_json(&bad, &Handlers::new()).unwrap_err(),
    ///     SignatureError::SignatureType("number".into()),
    /// );
    /// ```
    pub fn from_json(json: &serde_json::Value, handlers: &Handlers) -> Result<Self> {
        let object = json
            .as_object()
            .ok_or_else(|| SignatureError::SignatureType(json_kind(json).to_string()))?;

        let mut map = Self::new();
        for (key, definition) in object {
            map.insert(key, SignatureDef::from_json(key, definition, handlers)?);
        }
        Ok(map)
    }
}

/// Collects every handler id referenced by `fn` in a signature document.
///
/// Lets a caller bind handlers before calling [`SignatureMap::from_json`].
///
/// # Examples
///
/// ```
/// use command_signature_core::handler_ids;
///
/// let document = serde_json::json!({
///     "build": { "fn": "build", "params": { "watch": { "fn": "watch" } } },
///     "quiet": true
/// });
/// let ids: Vec<String> = handler_ids(&document).into_iter().collect();
/// assert_eq!(ids, ["build", "watch"]);
/// ```
pub fn handler_ids(json: &serde_json::Value) -> BTreeSet<String> {
    let mut ids = BTreeSet::new();
    collect_handler_ids(json, &mut ids);
    ids
}

fn collect_handler_ids(json: &serde_json::Value, ids: &mut BTreeSet<String>) {
    let Some(object) = json.as_object() else {
        return;
    };
    for definition in object.values() {
        let Some(descriptor) = definition.as_object() else {
            continue;
        };
        if let Some(id) = descriptor.get("fn").and_then(serde_json::Value::as_str) {
            ids.insert(id.to_string());
        }
        if let Some(params) = descriptor.get("params") {
            collect_handler_ids(params, ids);
        }
    }
}

fn json_kind(json: &serde_json::Value) -> &'static str {
    match json {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

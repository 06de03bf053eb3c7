//! Command handlers and the id → handler table used by signature files.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::Values;

/// A command handler.
///
/// Receives the full projected value map and returns an arbitrary JSON
/// result, which [`Registry::exec`](crate::Registry::exec) passes back to the
/// caller.
pub type Handler = Arc<dyn Fn(&Values) -> serde_json::Value + Send + Sync>;

/// Wraps a closure as a [`Handler`].
pub fn handler<F>(f: F) -> Handler
where
    F: Fn(&Values) -> serde_json::Value + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Handler table keyed by the ids that signature files put under `fn`.
///
/// # Examples
///
/// ```
/// use command_signature_core::{Handlers, Registry};
///
/// let handlers = Handlers::new().with("deploy", |values| {
///     serde_json::json!({ "target": values.get_str("deploy") })
/// });
///
/// let document = serde_json::json!({ "deploy": { "type": "string", "fn": "deploy" } });
/// let mut registry = Registry::from_json(&document, &handlers).unwrap();
///
/// let result = registry.exec(["--deploy=prod"]).unwrap();
/// assert_eq!(result, Some(serde_json::json!({ "target": "prod" })));
/// ```
#[derive(Clone, Default)]
pub struct Handlers {
    table: HashMap<String, Handler>,
}

impl Handlers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `f` under `id`, replacing any previous entry.
    pub fn insert<F>(&mut self, id: impl Into<String>, f: F)
    where
        F: Fn(&Values) -> serde_json::Value + Send + Sync + 'static,
    {
        self.table.insert(id.into(), handler(f));
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with<F>(mut self, id: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Values) -> serde_json::Value + Send + Sync + 'static,
    {
        self.insert(id, f);
        self
    }

    pub fn get(&self, id: &str) -> Option<&Handler> {
        self.table.get(id)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl fmt::Debug for Handlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<&str> = self.table.keys().map(String::as_str).collect();
        ids.sort_unstable();
        f.debug_struct("Handlers").field("ids", &ids).finish()
    }
}

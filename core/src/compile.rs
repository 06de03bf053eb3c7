//! Signature compilation.
//!
//! Compilation runs in two passes. [`build_tree`] resolves each definition's
//! local name, type, default and handler into a [`SignatureNode`] tree that
//! mirrors the nesting of the input. [`flatten`] then walks the tree
//! depth-first and emits one [`Param`] per node, applying the path naming
//! rule:
//!
//! - a child is named `<parent>-<name>`;
//! - unless the child is marked `main`, or its schema key is purely numeric
//!   (a positional), or the parent's name is purely numeric.
//!
//! # Examples
//!
//! ```
//! use command_signature_core::{Descriptor, SignatureMap, compile};
//!
//! let signatures = SignatureMap::new().with(
//!     "remote",
//!     Descriptor::new().with_params(
//!         SignatureMap::new().with("add", Descriptor::new().with_params(
//!             SignatureMap::new().with("url", Descriptor::new()),
//!         )),
//!     ),
//! );
//!
//! let names: Vec<String> = compile(&signatures)
//!     .iter()
//!     .map(|p| p.name().to_string())
//!     .collect();
//! assert_eq!(names, ["remote", "remote-add", "remote-add-url"]);
//! ```

use tracing::debug;

use crate::signature::{Descriptor, SignatureDef, SignatureMap};
use crate::{Handler, Param, ParamType, Value};

/// A definition with its local name resolved, still nested.
#[derive(Debug, Clone)]
pub struct SignatureNode {
    /// Key the definition was declared under.
    pub key: String,
    /// Explicit `name`, falling back to the key. Not yet path-qualified.
    pub name: String,
    pub param_type: Option<ParamType>,
    pub default: Option<Value>,
    pub handler: Option<HandlerSlot>,
    pub main: bool,
    pub alias: Option<String>,
    pub allowed: Option<Vec<Value>>,
    pub children: Vec<SignatureNode>,
}

/// Shared handler held by a [`SignatureNode`].
#[derive(Clone)]
pub struct HandlerSlot(pub Handler);

impl std::fmt::Debug for HandlerSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Handler")
    }
}

impl SignatureNode {
    fn from_def(key: &str, def: &SignatureDef) -> Self {
        match def {
            SignatureDef::Literal(literal) => Self {
                key: key.to_string(),
                name: key.to_string(),
                param_type: Some(literal.param_type()),
                default: Some(literal.to_value()),
                handler: None,
                main: false,
                alias: None,
                allowed: None,
                children: Vec::new(),
            },
            SignatureDef::Descriptor(descriptor) => Self::from_descriptor(key, descriptor),
        }
    }

    fn from_descriptor(key: &str, descriptor: &Descriptor) -> Self {
        Self {
            key: key.to_string(),
            name: descriptor.name().unwrap_or(key).to_string(),
            param_type: descriptor.param_type(),
            default: descriptor.default_value().cloned(),
            handler: descriptor.handler().cloned().map(HandlerSlot),
            main: descriptor.is_main(),
            alias: descriptor.alias().map(String::from),
            allowed: descriptor.allowed().map(<[Value]>::to_vec),
            children: descriptor.params().map(build_tree).unwrap_or_default(),
        }
    }

    /// Name this node gets when compiled under a parent named `parent`.
    pub fn qualified_name(&self, parent: Option<&str>) -> String {
        match parent {
            Some(parent) if !self.main && !is_numeric(&self.key) && !is_numeric(parent) => {
                format!("{parent}-{}", self.name)
            }
            _ => self.name.clone(),
        }
    }
}

/// Builds the nested compile tree for a signature map, in key order.
pub fn build_tree(signatures: &SignatureMap) -> Vec<SignatureNode> {
    signatures
        .iter()
        .map(|(key, def)| SignatureNode::from_def(key, def))
        .collect()
}

/// Flattens a compile tree into parameters, depth-first.
pub fn flatten(nodes: &[SignatureNode]) -> Vec<Param> {
    let mut params = Vec::new();
    flatten_into(nodes, None, &mut params);
    params
}

fn flatten_into(nodes: &[SignatureNode], parent: Option<&str>, params: &mut Vec<Param>) {
    for node in nodes {
        let name = node.qualified_name(parent);
        debug!(name = %name, key = %node.key, "compiled param");
        params.push(Param::new(
            name.clone(),
            node.param_type,
            node.default.clone(),
            node.handler.as_ref().map(|slot| slot.0.clone()),
            node.main,
            node.alias.clone(),
            node.allowed.clone(),
        ));
        flatten_into(&node.children, Some(&name), params);
    }
}

/// Compiles a signature map into its flat, ordered parameter list.
pub fn compile(signatures: &SignatureMap) -> Vec<Param> {
    flatten(&build_tree(signatures))
}

/// Returns `true` for non-empty, all-digit names such as `0` or `12`.
pub fn is_numeric(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(params: &[Param]) -> Vec<&str> {
        params.iter().map(Param::name).collect()
    }

    #[test]
    fn test_tree_mirrors_nesting_without_naming() {
        let signatures = SignatureMap::new().with(
            "command",
            Descriptor::new().main().with_params(
                SignatureMap::new()
                    .with("paramA", Descriptor::new().with_params(
                        SignatureMap::new().with("foo", Descriptor::new()),
                    ))
                    .with("paramB", Descriptor::new()),
            ),
        );

        let tree = build_tree(&signatures);
        assert_eq!(tree.len(), 1);
        assert!(tree[0].main);
        assert_eq!(tree[0].children.len(), 2);
        assert_eq!(tree[0].children[0].name, "paramA");
        assert_eq!(tree[0].children[0].children[0].name, "foo");
    }

    #[test]
    fn test_flatten_depth_first_with_path_names() {
        let signatures = SignatureMap::new()
            .with(
                "command",
                Descriptor::new().main().with_params(
                    SignatureMap::new()
                        .with("paramA", Descriptor::new().with_params(
                            SignatureMap::new().with("foo", Descriptor::new()),
                        ))
                        .with("paramB", Descriptor::new()),
                ),
            )
            .with("verbose", false);

        let params = compile(&signatures);
        assert_eq!(
            names(&params),
            [
                "command",
                "command-paramA",
                "command-paramA-foo",
                "command-paramB",
                "verbose"
            ]
        );
    }

    #[test]
    fn test_explicit_name_beats_key() {
        let signatures = SignatureMap::new().with(
            "cmd",
            Descriptor::new()
                .with_name("build")
                .with_params(SignatureMap::new().with("o", Descriptor::new().with_name("out"))),
        );
        assert_eq!(names(&compile(&signatures)), ["build", "build-out"]);
    }

    #[test]
    fn test_main_child_keeps_bare_name() {
        let signatures = SignatureMap::new().with(
            "tool",
            Descriptor::new().with_params(
                SignatureMap::new().with(
                    "serve",
                    Descriptor::new()
                        .main()
                        .with_params(SignatureMap::new().with("port", Descriptor::new())),
                ),
            ),
        );
        assert_eq!(
            names(&compile(&signatures)),
            ["tool", "serve", "serve-port"]
        );
    }

    #[test]
    fn test_positional_names_are_never_prefixed() {
        let signatures = SignatureMap::new().with(
            "copy",
            Descriptor::new().with_params(
                SignatureMap::new().with(
                    0,
                    Descriptor::new()
                        .with_type(ParamType::String)
                        .with_params(SignatureMap::new().with("force", false)),
                ),
            ),
        );
        assert_eq!(names(&compile(&signatures)), ["copy", "0", "force"]);
    }

    #[test]
    fn test_literal_types_follow_default_kind() {
        let params = compile(&SignatureMap::new().with("a", true).with("b", "text"));
        assert_eq!(params[0].param_type(), Some(ParamType::Boolean));
        assert_eq!(params[0].value(), Some(&Value::Bool(true)));
        assert_eq!(params[1].param_type(), Some(ParamType::String));
        assert_eq!(params[1].value(), Some(&Value::from("text")));
    }

    #[test]
    fn test_descriptor_default_infers_type_and_sets_value() {
        let params = compile(
            &SignatureMap::new()
                .with("n", Descriptor::new().with_default(3.0))
                .with("s", Descriptor::new().with_type(ParamType::String).with_default(true))
                .with("e", Descriptor::new()),
        );
        assert_eq!(params[0].param_type(), Some(ParamType::Number));
        assert_eq!(params[0].value(), Some(&Value::Number(3.0)));
        assert_eq!(params[1].param_type(), Some(ParamType::String));
        assert_eq!(params[1].value(), Some(&Value::Bool(true)));
        assert_eq!(params[2].param_type(), None);
        assert!(params[2].value().is_none());
    }

    #[test]
    fn test_is_numeric() {
        assert!(is_numeric("0"));
        assert!(is_numeric("12"));
        assert!(!is_numeric(""));
        assert!(!is_numeric("1a"));
        assert!(!is_numeric("-1"));
    }
}

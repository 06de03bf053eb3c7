//! Signature linting.
//!
//! Compilation accepts any well-typed [`SignatureMap`]. Some maps compile
//! into registries that cannot behave as their author intended; this module
//! reports those without rejecting them.
//!
//! # Examples
//!
//! ```
//! use command_signature_core::*;
//!
//! let good = SignatureMap::new().with("verbose", false);
//! assert!(validate_signatures(&good).is_empty());
//!
//! // `enum` only constrains array parameters
//! let bad = SignatureMap::new().with(
//!     "mode",
//!     Descriptor::new().with_type(ParamType::String).with_enum(["a", "b"]),
//! );
//! assert_eq!(
//!     validate_signatures(&bad),
//!     vec![ValidationError::EnumRequiresArray("mode".into())],
//! );
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::compile::{SignatureNode, build_tree};
use crate::{ParamType, SignatureMap, compile};

/// Structural problems found in a signature map.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A definition resolved to an empty name.
    #[error("signature under key '{0}' has an empty name")]
    EmptyName(String),
    /// `enum` on a parameter that is not `array`-typed is never enforced.
    #[error("enum on non-array param: {0}")]
    EnumRequiresArray(String),
    /// The default's kind disagrees with the explicit `type`.
    #[error("default of {name} is a {found}, but its type is {declared}")]
    DefaultTypeMismatch {
        name: String,
        declared: ParamType,
        found: ParamType,
    },
    /// Two parameters flatten to the same name; the later one is unreachable.
    #[error("duplicate param name: {0}")]
    DuplicateParam(String),
    /// The alias list names the parameter itself, which makes lookups of any
    /// later parameter resolve to this one.
    #[error("param {0} lists itself as an alias")]
    SelfAlias(String),
}

/// Lints a signature map, returning every problem found.
pub fn validate_signatures(signatures: &SignatureMap) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    validate_nodes(&build_tree(signatures), &mut errors);

    let mut seen = HashSet::new();
    for param in compile(signatures) {
        if !seen.insert(param.name().to_string()) {
            errors.push(ValidationError::DuplicateParam(param.name().to_string()));
        }
        if param.aliases().any(|alias| alias == param.name()) {
            errors.push(ValidationError::SelfAlias(param.name().to_string()));
        }
    }

    errors
}

fn validate_nodes(nodes: &[SignatureNode], errors: &mut Vec<ValidationError>) {
    for node in nodes {
        if node.name.is_empty() {
            errors.push(ValidationError::EmptyName(node.key.clone()));
        }

        if node.allowed.is_some() && node.param_type != Some(ParamType::Array) {
            errors.push(ValidationError::EnumRequiresArray(node.name.clone()));
        }

        let found = node.default.as_ref().and_then(|value| value.inferred_type());
        if let (Some(declared), Some(found)) = (node.param_type, found) {
            if declared != found {
                errors.push(ValidationError::DefaultTypeMismatch {
                    name: node.name.clone(),
                    declared,
                    found,
                });
            }
        }

        validate_nodes(&node.children, errors);
    }
}

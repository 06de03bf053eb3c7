//! Declarative command signatures compiled into a flat parameter registry.
//!
//! This crate turns a nested description of the parameters a command accepts
//! into an ordered list of [`Param`]s, parses raw command-line tokens against
//! it, and dispatches to the first fully-satisfied handler:
//!
//! - [`SignatureMap`] / [`SignatureDef`]: the declarative input. Each key
//!   maps to a [`Literal`] default or a [`Descriptor`], possibly nesting
//!   further `params`.
//! - [`compile()`]: flattens a signature map depth-first into [`Param`]s with
//!   dash-joined names (`remote-add-url`).
//! - [`Token`]: splits one raw argument (`-x`, `--x=v`, positional).
//! - [`Registry`]: lookup, population with type coercion, projection to
//!   [`Values`], handler matching and [`exec`](Registry::exec).
//!
//! Signatures can also be loaded from JSON or YAML files
//! ([`Registry::load`]), with `fn` entries resolved through a [`Handlers`]
//! table, and linted with [`validate_signatures`].
//!
//! # Example
//!
//! ```
//! use command_signature_core::*;
//!
//! let signatures = SignatureMap::new().with(
//!     "remote",
//!     Descriptor::new().main().with_params(
//!         SignatureMap::new().with(
//!             "add",
//!             Descriptor::new()
//!                 .with_type(ParamType::String)
//!                 .with_handler(|values| {
//!                     serde_json::json!({ "added": values.get_str("remote-add") })
//!                 }),
//!         ),
//!     ),
//! );
//!
//! let mut registry = Registry::compile(&signatures);
//! let result = registry.exec(["-remote", "--remote-add=origin"]).unwrap();
//! assert_eq!(result, Some(serde_json::json!({ "added": "origin" })));
//! ```

mod compile;
mod error;
mod handler;
mod load;
mod param;
mod registry;
mod signature;
mod token;
mod validate;
mod value;
mod values;

pub use compile::{HandlerSlot, SignatureNode, build_tree, compile, flatten, is_numeric};
pub use error::{LoadError, Result, SignatureError};
pub use handler::{Handler, Handlers, handler};
pub use load::{SignatureFormat, load_document, parse_document};
pub use param::Param;
pub use registry::{Registry, alias_lookup_hit};
pub use signature::{Descriptor, Literal, SignatureDef, SignatureMap, handler_ids};
pub use token::Token;
pub use validate::{ValidationError, validate_signatures};
pub use value::{ParamType, Value, parse_number};
pub use values::Values;

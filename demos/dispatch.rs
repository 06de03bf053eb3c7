//! In-code signature example.
//!
//! Builds a small `git remote`-style signature with the builder API, then
//! dispatches a few token lists against fresh registries.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p command-signature-demos --example dispatch
//! ```

use command_signature_core::{Descriptor, ParamType, Registry, SignatureMap};
use serde_json::json;

fn signatures() -> SignatureMap {
    SignatureMap::new()
        .with(
            "remote",
            Descriptor::new()
                .main()
                .with_type(ParamType::Boolean)
                .with_handler(|values| {
                    json!({
                        "action": "remote",
                        "add": values.get_str("remote-add"),
                        "verbose": values.get_bool("v"),
                    })
                })
                .with_params(
                    SignatureMap::new()
                        .with("add", Descriptor::new().with_type(ParamType::String))
                        .with("verbose", Descriptor::new().with_default(false).with_alias("v")),
                ),
        )
        .with(
            "fetch",
            Descriptor::new()
                .with_type(ParamType::Boolean)
                .with_handler(|values| json!({ "action": "fetch", "depth": values.get_f64("fetch-depth") }))
                .with_params(SignatureMap::new().with("depth", Descriptor::new().with_default(1.0))),
        )
}

fn main() {
    let runs: [&[&str]; 4] = [
        &["-remote", "--remote-add=origin", "-remote-verbose"],
        &["--fetch", "--fetch-depth=5"],
        &["--fetch-depth=5"],
        &["--push"],
    ];

    for tokens in runs {
        let mut registry = Registry::compile(&signatures());
        match registry.exec(tokens) {
            Ok(Some(result)) => println!("{tokens:?} -> {result}"),
            Ok(None) => println!("{tokens:?} -> no command matched"),
            Err(err) => println!("{tokens:?} -> error: {err}"),
        }
    }
}

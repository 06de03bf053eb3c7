//! Signature file example.
//!
//! Writes a YAML signature to a temporary file, loads it with a handler
//! table, prints the flattened params and runs one command.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p command-signature-demos --example signature_file
//! ```

use command_signature_core::{Handlers, Registry};
use serde_json::json;

const SIGNATURE: &str = r#"
deploy:
  type: string
  fn: deploy
  params:
    region:
      type: array
      enum: [eu, us, ap]
    force: false
"0":
  type: string
"#;

fn main() {
    let path = std::env::temp_dir().join("command_signature_example.yaml");
    std::fs::write(&path, SIGNATURE).unwrap();

    let handlers = Handlers::new().with("deploy", |values| {
        json!({
            "environment": values.get_str("deploy"),
            "regions": values.get("deploy-region"),
            "force": values.get_bool("deploy-force"),
            "artifact": values.get_str("0"),
        })
    });

    let mut registry = Registry::load(&path, &handlers).unwrap();

    println!("Compiled {} params:", registry.len());
    for param in &registry {
        println!(
            "  {:<14} {:<8} default={}",
            param.name(),
            param.param_type().map(|t| t.as_str()).unwrap_or("-"),
            param
                .default_value()
                .map(ToString::to_string)
                .unwrap_or_else(|| "-".into()),
        );
    }
    println!();

    let tokens = [
        "build/app.tar.gz",
        "--deploy=staging",
        "--deploy-region=eu",
        "--deploy-region=ap",
        "-deploy-force",
    ];
    match registry.exec(tokens) {
        Ok(Some(result)) => println!("{result:#}"),
        Ok(None) => println!("no command matched"),
        Err(err) => eprintln!("error: {err}"),
    }

    let _ = std::fs::remove_file(&path);
}

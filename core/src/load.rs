//! Signature files on disk.
//!
//! A signature file holds one signature map as JSON or YAML. Both are read
//! into a [`serde_json::Value`] with key order preserved, so the same
//! [`SignatureMap::from_json`](crate::SignatureMap::from_json) path handles
//! either format.
//!
//! # Example YAML
//!
//! ```yaml
//! deploy:
//!   type: string
//!   fn: deploy
//!   params:
//!     region:
//!       type: array
//!       enum: [eu, us]
//! dry: false
//! "0":
//!   type: string
//! ```

use std::io::BufReader;
use std::path::Path;

use crate::error::LoadError;

/// Document format of a signature file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureFormat {
    Json,
    Yaml,
}

impl SignatureFormat {
    /// Picks the format from the file extension (`json`, `yaml`, `yml`).
    ///
    /// # Errors
    ///
    /// [`LoadError::UnsupportedFormat`] for any other extension.
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(LoadError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Reads a signature document from disk.
///
/// # Errors
///
/// Returns [`LoadError::Io`] if the file cannot be opened,
/// [`LoadError::UnsupportedFormat`] for unknown extensions, or a
/// [`LoadError::Json`]/[`LoadError::Yaml`] parse error.
pub fn load_document(path: impl AsRef<Path>) -> Result<serde_json::Value, LoadError> {
    let path = path.as_ref();
    let format = SignatureFormat::from_path(path)?;
    let reader = BufReader::new(std::fs::File::open(path)?);
    let document = match format {
        SignatureFormat::Json => serde_json::from_reader(reader)?,
        SignatureFormat::Yaml => serde_yaml::from_reader(reader)?,
    };
    Ok(document)
}

/// Parses a signature document from text.
///
/// # Examples
///
/// ```
/// use command_signature_core::{SignatureFormat, parse_document};
///
/// let doc = parse_document("verbose: false\nname: anon\n", SignatureFormat::Yaml).unwrap();
/// let keys: Vec<&String> = doc.as_object().unwrap().keys().collect();
/// assert_eq!(keys, ["verbose", "name"]);
/// ```
pub fn parse_document(text: &str, format: SignatureFormat) -> Result<serde_json::Value, LoadError> {
    let document = match format {
        SignatureFormat::Json => serde_json::from_str(text)?,
        SignatureFormat::Yaml => serde_yaml::from_str(text)?,
    };
    Ok(document)
}

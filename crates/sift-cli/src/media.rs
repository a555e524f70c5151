//! File loading for the `index` command
//!
//! Guesses a media type from the file extension and records it as `media` and
//! `format` metadata. Images, audio and video are indexed by metadata only; any
//! other file whose bytes are valid UTF-8 has its body indexed too.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::Context;
use mime_guess::Mime;

/// A file ready to become a document
#[derive(Debug)]
pub struct LoadedFile {
    pub uri: String,
    pub text: String,
    pub metadata: BTreeMap<String, String>,
}

fn is_binary_media(mime: &Mime) -> bool {
    matches!(mime.type_().as_str(), "image" | "audio" | "video")
}

/// `file://` URI of an absolute path
pub fn file_uri(path: &Path) -> String {
    format!("file://{}", path.display())
}

/// Read `path` and work out its metadata. `extra` entries win over inferred ones.
pub fn load_file(path: &Path, extra: &BTreeMap<String, String>) -> anyhow::Result<LoadedFile> {
    let canonical = fs::canonicalize(path)
        .with_context(|| format!("cannot resolve {}", path.display()))?;
    let guess = mime_guess::from_path(&canonical).first();

    let mut metadata = BTreeMap::new();
    if let Some(stem) = canonical.file_stem().and_then(|s| s.to_str()) {
        metadata.insert("title".to_string(), stem.to_string());
    }

    let text = match &guess {
        Some(mime) if is_binary_media(mime) => {
            metadata.insert("media".to_string(), mime.type_().to_string());
            metadata.insert("format".to_string(), mime.subtype().to_string());
            String::new()
        }
        _ => {
            let bytes = fs::read(&canonical)
                .with_context(|| format!("cannot read {}", canonical.display()))?;
            match (String::from_utf8(bytes), &guess) {
                (Ok(text), Some(mime)) => {
                    metadata.insert("media".to_string(), mime.type_().to_string());
                    metadata.insert("format".to_string(), mime.subtype().to_string());
                    text
                }
                (Ok(text), None) => {
                    let format = canonical
                        .extension()
                        .and_then(|e| e.to_str())
                        .unwrap_or("plain");
                    metadata.insert("media".to_string(), "text".to_string());
                    metadata.insert("format".to_string(), format.to_string());
                    text
                }
                (Err(_), _) => {
                    tracing::debug!("{} is not UTF-8, indexing metadata only", canonical.display());
                    let format = guess
                        .as_ref()
                        .map_or_else(|| "octet-stream".to_string(), |m| m.subtype().to_string());
                    metadata.insert("media".to_string(), "application".to_string());
                    metadata.insert("format".to_string(), format);
                    String::new()
                }
            }
        }
    };

    for (key, value) in extra {
        metadata.insert(key.clone(), value.clone());
    }

    Ok(LoadedFile {
        uri: file_uri(&canonical),
        text,
        metadata,
    })
}

/// Parse a `key=value` argument
pub fn parse_key_val(arg: &str) -> Result<(String, String), String> {
    let (key, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{arg}`"))?;
    if key.trim().is_empty() {
        return Err(format!("empty key in `{arg}`"));
    }
    Ok((key.trim().to_string(), value.trim().to_string()))
}

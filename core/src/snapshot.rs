//! Appium Inspector snapshot parsing.
//!
//! The snapshot is an XML tree of UI elements. Only the `name` and `label`
//! attributes matter; tree structure is flattened to one line per element in
//! document order. Parsing never halts the pipeline: a missing file yields
//! an empty description and malformed XML yields an inline diagnostic.

use std::path::Path;

use tracing::warn;

/// Describes the snapshot at `path` as one `name='..' label='..'` line per
/// element that carries either attribute.
///
/// Returns the empty string when `path` is `None` or the file is absent.
pub fn describe_snapshot(path: Option<&Path>) -> String {
    let Some(path) = path else {
        return String::new();
    };
    if !path.is_file() {
        return String::new();
    }

    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            warn!("failed to read snapshot {}: {e}", path.display());
            return format!("Error parsing XML: {e}");
        }
    };

    match roxmltree::Document::parse(&raw) {
        Ok(doc) => describe_document(&doc),
        Err(e) => {
            warn!("malformed snapshot {}: {e}", path.display());
            format!("Error parsing XML: {e}")
        }
    }
}

fn describe_document(doc: &roxmltree::Document<'_>) -> String {
    let lines: Vec<String> = doc
        .descendants()
        .filter(|node| node.is_element())
        .filter(|node| node.has_attribute("name") || node.has_attribute("label"))
        .map(|node| {
            format!(
                "name='{}' label='{}'",
                node.attribute("name").unwrap_or(""),
                node.attribute("label").unwrap_or("")
            )
        })
        .collect();
    lines.join("\n")
}

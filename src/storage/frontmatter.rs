//! YAML frontmatter parsing and rendering
//!
//! Markdown files use YAML frontmatter delimited by `---`:
//!
//! ```markdown
//! ---
//! name: Winter Jacket
//! price: 129.99
//! category: Apparel
//! ---
//!
//! # Winter Jacket
//! ```

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Parse YAML frontmatter from markdown content into `T`, returning the body too
pub fn parse<T: DeserializeOwned>(content: &str) -> Result<(T, String)> {
    let content = content.trim_start();

    let rest = content.strip_prefix("---").ok_or_else(|| Error::YamlParseError {
        message: "missing frontmatter: document must start with ---".into(),
    })?;

    // Find the closing delimiter
    let end_pos = rest.find("\n---").ok_or_else(|| Error::YamlParseError {
        message: "unclosed frontmatter: missing closing ---".into(),
    })?;

    let yaml_content = rest[..end_pos].trim();
    let body_start = end_pos + 4; // Skip past "\n---"
    let body = rest[body_start..].trim_start_matches('\n').to_string();

    let fields = serde_yaml::from_str(yaml_content)?;
    Ok((fields, body))
}

/// Render a value as frontmatter followed by the markdown body
pub fn render<T: Serialize>(fields: &T, body: &str) -> Result<String> {
    let yaml = serde_yaml::to_string(fields).map_err(|e| Error::YamlSerializeError {
        message: e.to_string(),
    })?;
    Ok(format!("---\n{}---\n\n{}", yaml, body))
}

//! Frontmatter extraction from descriptor files

use crate::ManifestError;
use serde_json::Value;

/// Line that opens and closes the structured block
pub const DELIMITER: &str = "---";

/// Return the text between the opening delimiter line and the next
/// delimiter line, or `None` if the pair is absent.
pub fn extract_frontmatter(content: &str) -> Option<&str> {
    let rest = content.strip_prefix(DELIMITER)?;
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))?;

    if rest.starts_with(DELIMITER) {
        return Some("");
    }

    let end = rest.find("\n---")?;
    Some(rest[..end].trim_end_matches('\r'))
}

/// Extract and parse the frontmatter block into a JSON value.
///
/// The result is always a JSON object; anything else is rejected.
pub fn parse_frontmatter(content: &str) -> Result<Value, ManifestError> {
    let block = extract_frontmatter(content).ok_or(ManifestError::MissingFrontmatter)?;
    let value: Value = serde_yaml::from_str(block)?;

    match value {
        Value::Object(_) => Ok(value),
        Value::Null => Err(ManifestError::NotAMapping("an empty block")),
        Value::Array(_) => Err(ManifestError::NotAMapping("a sequence")),
        _ => Err(ManifestError::NotAMapping("a scalar")),
    }
}

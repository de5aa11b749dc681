//! Front matter: the `---` delimited YAML block at the top of a note.

use serde_yaml::Mapping;

use crate::app::infrastructure::error::{AppError, Result};

const DELIMITER: &str = "---";

/// Split a note into its raw YAML block and its body.
///
/// The block must start on the first line and be closed by a line holding
/// only `---` (or `...`). Anything else means the note has no front matter.
pub fn split(text: &str) -> (Option<&str>, &str) {
    let Some(first_line_end) = text.find('\n') else {
        return (None, text);
    };
    if text[..first_line_end].trim_end_matches('\r') != DELIMITER {
        return (None, text);
    }

    let yaml_start = first_line_end + 1;
    let mut line_start = yaml_start;
    while line_start <= text.len() {
        let line_end = text[line_start..]
            .find('\n')
            .map(|i| line_start + i)
            .unwrap_or(text.len());
        let line = text[line_start..line_end].trim_end_matches('\r');
        if line == DELIMITER || line == "..." {
            let body_start = (line_end + 1).min(text.len());
            return (Some(&text[yaml_start..line_start]), &text[body_start..]);
        }
        if line_end == text.len() {
            break;
        }
        line_start = line_end + 1;
    }
    (None, text)
}

/// Parse a note into its front matter mapping and body.
///
/// Notes without a block get an empty mapping. A block that is not a YAML
/// mapping is an error.
pub fn parse(text: &str) -> Result<(Mapping, String)> {
    let (yaml, body) = split(text);
    let mapping = match yaml {
        None => Mapping::new(),
        Some(raw) if raw.trim().is_empty() => Mapping::new(),
        Some(raw) => match serde_yaml::from_str::<serde_yaml::Value>(raw)? {
            serde_yaml::Value::Mapping(mapping) => mapping,
            serde_yaml::Value::Null => Mapping::new(),
            _ => {
                return Err(AppError::FrontMatter(
                    "front matter is not a key/value mapping".to_string(),
                ));
            }
        },
    };
    Ok((mapping, body.to_string()))
}

/// Reassemble a note from its front matter and body.
///
/// An empty mapping drops the block entirely.
pub fn render(front_matter: &Mapping, body: &str) -> Result<String> {
    if front_matter.is_empty() {
        return Ok(body.to_string());
    }
    let yaml = serde_yaml::to_string(front_matter)?;
    let mut out = String::with_capacity(yaml.len() + body.len() + 8);
    out.push_str(DELIMITER);
    out.push('\n');
    out.push_str(&yaml);
    if !yaml.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(DELIMITER);
    out.push('\n');
    out.push_str(body);
    Ok(out)
}

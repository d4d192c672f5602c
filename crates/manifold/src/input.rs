//! Loading structured input documents.

use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::ValueEnum;
use manifold_xml::Node;
use tracing::debug;

/// Supported input document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    Json,
    Toml,
}

impl InputFormat {
    /// Detects the format from the file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(InputFormat::Json),
            "toml" => Some(InputFormat::Toml),
            _ => None,
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputFormat::Json => f.write_str("JSON"),
            InputFormat::Toml => f.write_str("TOML"),
        }
    }
}

/// Parses `content` in the given format.
pub fn parse_document(content: &str, format: InputFormat) -> manifold_xml::Result<Node> {
    match format {
        InputFormat::Json => Node::from_json_str(content),
        InputFormat::Toml => Node::from_toml_str(content),
    }
}

/// Reads and parses the document at `path`.
pub fn load_document(path: &Path, format: Option<InputFormat>) -> Result<Node> {
    let format = match format {
        Some(format) => format,
        None => InputFormat::from_path(path).with_context(|| {
            format!(
                "detect the format of {} (pass --format json or --format toml)",
                path.display()
            )
        })?,
    };

    let content =
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    debug!(path = %path.display(), format = %format, bytes = content.len(), "Loaded input document");

    parse_document(&content, format)
        .with_context(|| format!("parse {} as {}", path.display(), format))
}

/// Returns a copy of the sub-tree at the dotted `path`.
pub fn select(node: &Node, path: &str) -> Result<Node> {
    let mut current = node;
    let mut walked = Vec::new();

    for segment in path.split('.').filter(|s| !s.is_empty()) {
        let Some(next) = current.select(segment) else {
            let parent = if walked.is_empty() {
                "the document root".to_string()
            } else {
                format!("`{}`", walked.join("."))
            };
            bail!("select `{}` (no entry `{}` under {})", path, segment, parent);
        };
        walked.push(segment);
        current = next;
    }

    Ok(current.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(InputFormat::from_path(Path::new("a.json")), Some(InputFormat::Json));
        assert_eq!(InputFormat::from_path(Path::new("a.TOML")), Some(InputFormat::Toml));
        assert_eq!(InputFormat::from_path(Path::new("a.yaml")), None);
        assert_eq!(InputFormat::from_path(Path::new("noext")), None);
    }

    #[test]
    fn test_parse_toml_keeps_table_order() -> Result<()> {
        let node = parse_document("b = 1\na = 2\n[c]\nz = true\n", InputFormat::Toml)?;
        let Node::Mapping(entries) = &node else {
            panic!("expected mapping");
        };
        let keys: Vec<&str> = entries.keys().map(String::as_str).collect();
        assert_eq!(keys, ["b", "a", "c"]);
        Ok(())
    }

    #[test]
    fn test_load_document_detects_format() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("data.json");
        fs::write(&path, r#"{"name": "x"}"#)?;

        let node = load_document(&path, None)?;
        assert_eq!(node.select("name"), Some(&Node::text("x")));
        Ok(())
    }

    #[test]
    fn test_load_document_unknown_extension() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("data.txt");
        fs::write(&path, "{}")?;

        let err = load_document(&path, None).unwrap_err();
        assert!(err.to_string().starts_with("detect the format of"));

        // An explicit format overrides the extension.
        assert!(load_document(&path, Some(InputFormat::Json)).is_ok());
        Ok(())
    }

    #[test]
    fn test_load_document_parse_error_has_context() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("broken.json");
        fs::write(&path, "{not json")?;

        let err = load_document(&path, None).unwrap_err();
        assert_eq!(err.to_string(), format!("parse {} as JSON", path.display()));
        Ok(())
    }

    #[test]
    fn test_select_subtree_and_missing_segment() -> Result<()> {
        let node = parse_document(r#"{"tool": {"installer": {"@id": "1"}}}"#, InputFormat::Json)?;

        let sub = select(&node, "tool.installer")?;
        assert_eq!(sub.select("@id"), Some(&Node::text("1")));

        let err = select(&node, "tool.missing.deep").unwrap_err();
        assert_eq!(
            err.to_string(),
            "select `tool.missing.deep` (no entry `missing` under `tool`)"
        );
        Ok(())
    }
}

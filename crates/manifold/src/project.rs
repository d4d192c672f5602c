//! Project variable lookup.
//!
//! Build scripts keep their settings in a TOML project file (by default
//! `pyproject.toml`). A dotted key selects a value; when the value reached is
//! a table, it holds one entry per platform and the entry for the running
//! platform is returned:
//!
//! ```toml
//! [tool.qt]
//! version = "6.5.2"
//!
//! [tool.qt.install_dir]
//! macos = "/Users/runner/Qt"
//! linux = "/opt/Qt"
//! windows = "C:\\Qt"
//! ```
//!
//! `tool.qt.version` yields `6.5.2` everywhere; `tool.qt.install_dir` yields
//! `/opt/Qt` on Linux.

use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::debug;

/// Platforms with their own entries in platform tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    MacOs,
    Linux,
    Windows,
}

impl Platform {
    /// The platform this binary runs on, if supported.
    pub fn current() -> Option<Self> {
        Self::from_os(std::env::consts::OS)
    }

    /// Maps an OS identifier (`macos`, `darwin`, `linux`, `windows`, `win32`) to a platform.
    pub fn from_os(os: &str) -> Option<Self> {
        if os.starts_with("darwin") || os.starts_with("macos") {
            Some(Platform::MacOs)
        } else if os.starts_with("lin") {
            Some(Platform::Linux)
        } else if os.starts_with("win") {
            Some(Platform::Windows)
        } else {
            None
        }
    }

    /// Key of this platform's entry in a platform table.
    pub fn key(self) -> &'static str {
        match self {
            Platform::MacOs => "macos",
            Platform::Linux => "linux",
            Platform::Windows => "windows",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Reads and parses the project file.
pub fn load_project(path: &Path) -> Result<toml::Table> {
    let content =
        fs::read_to_string(path).with_context(|| format!("read project file {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("parse project file {}", path.display()))
}

/// Follows `key` through `table`, then resolves a platform table if one is reached.
pub fn lookup<'a>(
    table: &'a toml::Table,
    key: &str,
    platform: Option<Platform>,
) -> Result<&'a toml::Value> {
    let mut segments = key.split('.');
    let first = segments.next().unwrap_or_default();
    let mut value = table
        .get(first)
        .with_context(|| format!("find `{}` in project file (no entry `{}`)", key, first))?;

    for segment in segments {
        value = value
            .as_table()
            .and_then(|t| t.get(segment))
            .with_context(|| format!("find `{}` in project file (no entry `{}`)", key, segment))?;
    }

    let toml::Value::Table(platforms) = value else {
        return Ok(value);
    };

    let Some(platform) = platform else {
        bail!(
            "resolve `{}` for platform `{}` (unsupported platform)",
            key,
            std::env::consts::OS
        );
    };
    debug!(key = %key, platform = %platform, "Resolving platform-specific value");
    platforms
        .get(platform.key())
        .with_context(|| format!("find a `{}` entry under `{}`", platform, key))
}

/// Formats a value for printing: strings verbatim, other scalars in TOML
/// spelling, arrays and tables as compact JSON.
pub fn render_value(value: &toml::Value) -> Result<String> {
    Ok(match value {
        toml::Value::String(s) => s.clone(),
        toml::Value::Integer(v) => v.to_string(),
        toml::Value::Float(v) => v.to_string(),
        toml::Value::Boolean(v) => v.to_string(),
        toml::Value::Datetime(v) => v.to_string(),
        toml::Value::Array(_) | toml::Value::Table(_) => {
            serde_json::to_string(value).context("render value as JSON")?
        }
    })
}

//! Command line configuration.
//!
//! Every option can also be supplied through the environment.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `MANIFOLD_LOG_LEVEL` | info | Log level |
//! | `MANIFOLD_ROOT_NAME` | root | Root element name for `xml` |
//! | `MANIFOLD_ITEM_NAME` | - | Item element name for a root sequence |
//! | `MANIFOLD_PROJECT_FILE` | pyproject.toml | Project file read by `var` |

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use manifold_xml::{DEFAULT_ROOT_NAME, XmlOptions};

use crate::input::InputFormat;

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Build helper that renders structured build data as XML manifests.
#[derive(Debug, Clone, Parser)]
#[command(name = "manifold", version)]
#[command(about = "Render build data as XML manifests and resolve project variables")]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace).
    #[arg(long, global = true, env = "MANIFOLD_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Convert a JSON or TOML document into an XML file.
    Xml(XmlArgs),

    /// Print a value from the project file, resolved for the current platform.
    Var(VarArgs),
}

#[derive(Debug, Clone, Args)]
pub struct XmlArgs {
    /// Input document.
    pub input: PathBuf,

    /// Output file, or `-` for stdout.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Name of the outermost element.
    #[arg(long, env = "MANIFOLD_ROOT_NAME", default_value = DEFAULT_ROOT_NAME)]
    pub root_name: String,

    /// Item element name, required when the document root is a sequence.
    #[arg(long, env = "MANIFOLD_ITEM_NAME")]
    pub item_name: Option<String>,

    /// Omit the `<?xml version="1.0" ?>` declaration.
    #[arg(long)]
    pub no_declaration: bool,

    /// Write text and attribute values without escaping.
    #[arg(long)]
    pub raw: bool,

    /// Dotted path of the sub-tree to render (e.g. `tool.installer`).
    #[arg(long)]
    pub select: Option<String>,

    /// Input format; detected from the file extension when omitted.
    #[arg(long, value_enum)]
    pub format: Option<InputFormat>,

    /// Replace the output file if it already exists.
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Clone, Args)]
pub struct VarArgs {
    /// Dotted key to look up (e.g. `tool.qt.version`).
    pub key: String,

    /// Project file to read.
    #[arg(long, env = "MANIFOLD_PROJECT_FILE", default_value = "pyproject.toml")]
    pub config: PathBuf,
}

impl XmlArgs {
    /// Serializer options selected by the flags.
    pub fn xml_options(&self) -> XmlOptions {
        XmlOptions {
            root_name: self.root_name.clone(),
            item_name: self.item_name.clone(),
            emit_declaration: !self.no_declaration,
            escape: !self.raw,
        }
    }

    pub fn writes_to_stdout(&self) -> bool {
        self.output == Path::new("-")
    }
}

impl Cli {
    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            errors.push(format!(
                "Log level must be one of {}, got '{}'",
                LOG_LEVELS.join(", "),
                self.log_level
            ));
        }

        match &self.command {
            Command::Xml(args) => {
                if args.root_name.is_empty() {
                    errors.push("Root name cannot be empty".to_string());
                }
                if args.item_name.as_deref() == Some("") {
                    errors.push("Item name cannot be empty".to_string());
                }
                if args.select.as_deref() == Some("") {
                    errors.push("Select path cannot be empty".to_string());
                }
            }
            Command::Var(args) => {
                if args.key.is_empty() {
                    errors.push("Key cannot be empty".to_string());
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

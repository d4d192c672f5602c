//! # manifold
//!
//! Build-helper commands around [`manifold_xml`]:
//!
//! - `manifold xml` renders a JSON or TOML document as an XML manifest and
//!   writes it to a file, leaving existing files untouched unless forced;
//! - `manifold var` prints a value from the project file, resolved for the
//!   running platform.
//!
//! Every step reports success, a neutral notice, or failure through
//! [`report`]; the binary aborts with a non-zero status on the first failure.

pub mod commands;
pub mod config;
pub mod fs;
pub mod input;
pub mod project;
pub mod report;

pub use commands::run;
pub use config::{Cli, Command, VarArgs, XmlArgs};

/// Initializes logging with the given level.
///
/// `RUST_LOG` takes precedence when set. Logs go to stderr so that command
/// output on stdout stays clean.
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("manifold={},manifold_xml={}", level, level)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

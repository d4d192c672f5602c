//! Subcommand implementations.

use std::io::{self, Write};

use anyhow::{Context, Result};
use manifold_xml::node_to_xml_string;
use tracing::info;

use crate::config::{Cli, Command, VarArgs, XmlArgs};
use crate::fs::{self, WriteOutcome};
use crate::input;
use crate::project::{self, Platform};

/// Runs the selected subcommand.
pub fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Command::Xml(args) => run_xml(args),
        Command::Var(args) => run_var(args),
    }
}

/// Loads the input document and renders it as XML text.
pub fn render_xml(args: &XmlArgs) -> Result<String> {
    let mut node = input::load_document(&args.input, args.format)?;
    if let Some(path) = &args.select {
        node = input::select(&node, path)?;
    }

    let options = args.xml_options();
    info!(
        input = %args.input.display(),
        root = %options.root_name,
        declaration = options.emit_declaration,
        escape = options.escape,
        "Rendering XML manifest"
    );

    node_to_xml_string(&node, &options)
        .with_context(|| format!("render {} as XML", args.input.display()))
}

/// Renders the input and writes it to the output file (or stdout).
pub fn run_xml(args: &XmlArgs) -> Result<()> {
    let xml = render_xml(args)?;

    if args.writes_to_stdout() {
        return write_xml(io::stdout().lock(), &xml).context("write XML to stdout");
    }

    if fs::create_file(&args.output, &xml, args.force)? == WriteOutcome::Skipped {
        info!(output = %args.output.display(), "Output left unchanged (pass --force to replace it)");
    }
    Ok(())
}

/// Writes the document exactly as rendered, with no trailing newline, so
/// stdout and file output carry the same bytes.
pub fn write_xml<W: Write>(mut out: W, xml: &str) -> io::Result<()> {
    out.write_all(xml.as_bytes())?;
    out.flush()
}

/// Resolves the project variable for the running platform.
pub fn resolve_var(args: &VarArgs, platform: Option<Platform>) -> Result<String> {
    let table = project::load_project(&args.config)?;
    let value = project::lookup(&table, &args.key, platform)?;
    project::render_value(value)
}

/// Prints the project variable to stdout.
pub fn run_var(args: &VarArgs) -> Result<()> {
    let value = resolve_var(args, Platform::current())?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", value).context("write value to stdout")?;
    Ok(())
}

//! Manifold build helper.
//!
//! Renders structured build data as XML manifests and resolves project
//! variables.

use clap::Parser;
use manifold::{Cli, init_logging, report};

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    if let Err(errors) = cli.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(2);
    }

    if let Err(error) = manifold::run(&cli) {
        report::failure(&error);
        std::process::exit(1);
    }
}

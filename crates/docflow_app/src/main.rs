//! Command-line front end for the docflow workspace.

mod app;
mod effects;

use clap::Parser;
use docflow_logging::flow_error;

fn main() {
    let cli = app::Cli::parse();
    docflow_logging::initialize(cli.log_destination());

    if let Err(message) = app::run(cli) {
        flow_error!("{}", message);
        eprintln!("error: {message}");
        std::process::exit(1);
    }
}

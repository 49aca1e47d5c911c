//! Cookbook CLI — recipe registry and flattening resolver.

use clap::Parser;
use cookbook::cli::Cli;

fn main() {
    let cli = Cli::parse();
    if let Err(e) = cookbook::logging::init(&cli.logging()) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
    if let Err(e) = cookbook::cli::dispatch(cli.command) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

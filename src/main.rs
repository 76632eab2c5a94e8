//! intentio CLI binary.

use std::io::Write;
use std::process;

use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;

use intentio::cli::args::IntentioArgs;
use intentio::cli::commands::execute_command;

fn main() {
    // Parse command line arguments using clap
    let args = IntentioArgs::parse();

    // Set up logging/verbosity based on args
    let log_level = match args.verbosity() {
        0 => LevelFilter::Error, // Quiet mode
        1 => LevelFilter::Warn,  // Default
        2 => LevelFilter::Info,  // Verbose
        _ => LevelFilter::Debug, // Very verbose (3+)
    };

    Builder::new()
        .filter_level(log_level)
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();

    // Execute the command; input mistakes and operational failures exit
    // with distinct codes, mirroring a 4xx/5xx split.
    if let Err(e) = execute_command(args) {
        eprintln!("Error: {e}");
        process::exit(if e.is_client_error() { 2 } else { 1 });
    }
}

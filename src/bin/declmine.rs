//! declmine CLI - shared declaration subset mining.
//!
//! Reads a JSON mapping of rule selectors to declaration lists on stdin and
//! prints the declaration subsets shared by two or more rules.

use declmine::api::MineConfig;
use declmine::cli::{run, OutputMode};
use std::io::{stdin, stdout, BufReader, BufWriter};

fn main() {
    declmine::trace::init_subscriber();

    let mode = if std::env::args().any(|arg| arg == "--json") {
        OutputMode::Json
    } else {
        OutputMode::Text
    };

    let input = BufReader::new(stdin().lock());
    let output = BufWriter::new(stdout().lock());

    if let Err(e) = run(input, output, mode, &MineConfig::default()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

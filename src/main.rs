//! search-filter CLI entry point
//!
//! Parses arguments and dispatches via `cli::run`. Errors go to stderr with
//! a non-zero exit status.

use search_filter::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

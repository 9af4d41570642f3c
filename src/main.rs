//! mibin CLI entry point
//!
//! Parses arguments and dispatches via `cli::run`, prints any error to
//! stderr and exits non-zero. All other logic lives in the library.

use mibin::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

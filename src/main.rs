//! # shelver CLI
//!
//! Command-line interface for the file librarian.
//!
//! ## Usage
//! ```bash
//! shelver init
//! shelver run --dry-run
//! shelver run --output json
//! ```

mod cli;

use shelver::Result;

fn main() -> Result<()> {
    cli::run()
}

//! CLI command definitions
//!
//! Defines the clap commands for the treeprobe CLI.

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Wait for a test run to report and print its results
    ///
    /// Exits with status 1 if any test failed and 2 if no report arrived
    /// before the idle timeout.
    Observe {
        /// Socket to listen on (default: per-user runtime socket)
        #[arg(long)]
        socket: Option<PathBuf>,

        /// Print raw JSON messages instead of formatted lines
        #[arg(long)]
        json: bool,

        /// Seconds to wait without traffic before giving up
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Show the configuration file location and effective settings
    Config,
}

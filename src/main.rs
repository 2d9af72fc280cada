//! treeprobe - report observer for in-process UI test runs
//!
//! Test runs embedded in an application stream their results over a local
//! socket; this binary listens for them and turns the final report into an
//! exit status for CI.

use clap::Parser;
use commands::Commands;
use treeprobe::{cli, commands, common::logging};

#[derive(Parser)]
#[command(name = "treeprobe", about = "Observer for treeprobe test runs")]
#[command(version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    logging::init_observer();

    let cli = Cli::parse();

    match cli::dispatch(cli.command).await {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

//! CLI command handling
//!
//! Dispatches CLI commands and formats output.

use std::time::Duration;

use colored::Colorize;

use crate::commands::Commands;
use crate::common::{config::Config, paths, Error, Result};
use crate::observer::Observer;
use crate::report::{console, ReportMessage};

/// Exit status when every test passed
pub const EXIT_PASSED: i32 = 0;
/// Exit status when at least one test failed
pub const EXIT_FAILED: i32 = 1;
/// Exit status when no report arrived in time
pub const EXIT_NO_REPORT: i32 = 2;

/// Dispatch a CLI command, returning the process exit status
pub async fn dispatch(command: Commands) -> Result<i32> {
    let config = Config::load()?;

    match command {
        Commands::Observe {
            socket,
            json,
            timeout,
        } => {
            let socket = socket.unwrap_or_else(|| config.report.socket_path());
            let idle_timeout =
                Duration::from_secs(timeout.unwrap_or(config.observer.idle_timeout_secs));

            let observer = Observer::bind(socket, idle_timeout).await?;
            if !json {
                println!(
                    "{} {}",
                    "Waiting for test results on".cyan(),
                    observer.socket().display().to_string().dimmed()
                );
            }

            let outcome = observer
                .wait_for_report(|message| print_message(message, json))
                .await;

            match outcome {
                Ok(report) if report.passed() => Ok(EXIT_PASSED),
                Ok(_) => Ok(EXIT_FAILED),
                Err(Error::ObserverTimeout(secs)) => {
                    eprintln!("No test report received within {} seconds", secs);
                    Ok(EXIT_NO_REPORT)
                }
                Err(e) => Err(e),
            }
        }

        Commands::Config => {
            match paths::config_path() {
                Some(path) if path.exists() => println!("Config file: {}", path.display()),
                Some(path) => println!("Config file: {} (not found, using defaults)", path.display()),
                None => println!("Config file: unavailable on this platform"),
            }

            println!();
            println!("[runner]");
            println!("wait_time_ms = {}", config.runner.wait_time_ms);
            println!("start_delay_ms = {}", config.runner.start_delay_ms);
            println!("poll_interval_ms = {}", config.runner.poll_interval_ms);
            println!();
            println!("[report]");
            println!("socket = {:?}", config.report.socket_path().display().to_string());
            println!("send_timeout_ms = {}", config.report.send_timeout_ms);
            println!();
            println!("[observer]");
            println!("idle_timeout_secs = {}", config.observer.idle_timeout_secs);

            Ok(EXIT_PASSED)
        }
    }
}

fn print_message(message: &ReportMessage, json: bool) {
    if json {
        match serde_json::to_string(message) {
            Ok(line) => println!("{}", line),
            Err(e) => tracing::warn!("Could not encode report message: {}", e),
        }
        return;
    }

    match message {
        ReportMessage::Line { result } => println!("{}", console::format_line(result)),
        ReportMessage::Final(report) => println!("\n{}\n", console::format_summary(report)),
    }
}

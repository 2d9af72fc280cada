//! treeprobe - in-process test orchestration for live component trees
//!
//! Test cases are registered with [`Suite::describe`] / [`Group::it`], run
//! one at a time by a [`TestRunner`] against the running application, and
//! find their elements through a [`Resolver`] that waits for the host to
//! register them. Results stream to a [`Reporter`] as each case finishes.

pub mod cli;
pub mod commands;
pub mod common;
pub mod host;
pub mod observer;
pub mod report;
pub mod resolver;
pub mod runner;
pub mod suite;
pub mod tester;

// Re-export commonly used types
pub use common::{Error, ErrorKind, Result};
pub use report::{Report, ReportMessage, Reporter, TestResult};
pub use resolver::Resolver;
pub use runner::TestRunner;
pub use suite::{Group, Suite};
pub use tester::Tester;

//! Report message types
//!
//! Each message goes out as one JSON document; over a socket every document
//! is framed by the transport's length prefix.

use serde::{Deserialize, Serialize};

/// Outcome of one test case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub message: String,
    pub passed: bool,
}

impl TestResult {
    pub fn pass(description: &str) -> Self {
        Self {
            message: format!("{}  ✅", description),
            passed: true,
        }
    }

    pub fn fail(description: &str, error: &dyn std::fmt::Display) -> Self {
        Self {
            message: format!("{}  ❌\n   {}", description, error),
            passed: false,
        }
    }
}

/// Aggregate outcome of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub results: Vec<TestResult>,
    pub error_count: usize,
    /// Wall-clock seconds
    pub duration: f64,
}

impl Report {
    /// Build a report, counting failures from `results`
    pub fn new(results: Vec<TestResult>, duration: f64) -> Self {
        let error_count = results.iter().filter(|r| !r.passed).count();
        Self {
            results,
            error_count,
            duration,
        }
    }

    pub fn passed(&self) -> bool {
        self.error_count == 0
    }
}

/// Message sent to an observer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ReportMessage {
    /// One completed test case, sent as soon as it finishes
    Line { result: TestResult },
    /// End of the run, sent once after the last line
    Final(Report),
}

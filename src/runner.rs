//! Sequential test runner
//!
//! Runs registered test cases one at a time against the live host. Every
//! case yields exactly one result no matter how it ends, results stream to
//! the reporter as they happen, and the host is reset once the last case
//! finishes.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use tokio::time::Instant;

use crate::common::config::RunnerConfig;
use crate::common::{panic_message, Error, Result};
use crate::host::{Host, Registry};
use crate::report::{ConsoleReporter, Report, Reporter, TestResult};
use crate::resolver::Resolver;
use crate::suite::{Group, Suite};
use crate::tester::Tester;

/// Lifecycle of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Delaying,
    Running,
    Finalizing,
    Done,
}

/// One-shot orchestrator for a suite of test cases
///
/// [`TestRunner::run`] consumes the runner; running again needs a new one.
pub struct TestRunner {
    config: RunnerConfig,
    registry: Arc<dyn Registry>,
    host: Arc<dyn Host>,
    reporter: Box<dyn Reporter>,
    suite: Suite,
    state: RunState,
}

impl TestRunner {
    /// Create a runner that reports to the console
    pub fn new(config: RunnerConfig, registry: Arc<dyn Registry>, host: Arc<dyn Host>) -> Self {
        Self {
            config,
            registry,
            host,
            reporter: Box::new(ConsoleReporter),
            suite: Suite::new(),
            state: RunState::Idle,
        }
    }

    /// Replace the reporter
    pub fn with_reporter(mut self, reporter: impl Reporter + 'static) -> Self {
        self.reporter = Box::new(reporter);
        self
    }

    /// Append the cases of a separately built suite
    pub fn with_suite(mut self, suite: Suite) -> Self {
        self.suite.merge(suite);
        self
    }

    /// Declare a group of test cases directly on the runner
    pub fn describe<R>(
        &mut self,
        label: impl Into<String>,
        body: impl FnOnce(&mut Group<'_>) -> R,
    ) -> R {
        self.suite.describe(label, body)
    }

    /// Registered cases, in execution order
    pub fn suite(&self) -> &Suite {
        &self.suite
    }

    fn transition(&mut self, next: RunState) {
        tracing::debug!(from = ?self.state, to = ?next, "Run state change");
        self.state = next;
    }

    /// Run every registered case and return the aggregate report
    ///
    /// Failures inside test cases never escape; the only error returned is a
    /// failed host reset at the end of the run.
    pub async fn run(mut self) -> Result<Report> {
        let start_delay = self.config.start_delay();
        if !start_delay.is_zero() {
            self.transition(RunState::Delaying);
            tokio::time::sleep(start_delay).await;
        }

        self.transition(RunState::Running);
        let cases = std::mem::take(&mut self.suite).into_cases();
        tracing::info!(tests = cases.len(), "Starting test run");

        let started = Instant::now();
        let resolver = Resolver::new(self.registry.clone(), &self.config);
        let tester = Tester::new(resolver, self.host.clone());

        let mut results = Vec::with_capacity(cases.len());
        let mut error_count = 0;

        for case in cases {
            let (description, action) = case.into_parts();
            let run_case = action(tester.clone());

            let result = match AssertUnwindSafe(run_case).catch_unwind().await {
                Ok(Ok(())) => TestResult::pass(&description),
                Ok(Err(e)) => {
                    error_count += 1;
                    TestResult::fail(&description, &e)
                }
                Err(payload) => {
                    error_count += 1;
                    let e = Error::Panicked(panic_message(payload.as_ref()));
                    TestResult::fail(&description, &e)
                }
            };

            tracing::debug!(test = %description, passed = result.passed, "Test finished");
            if let Err(e) = self.reporter.send_line(&result).await {
                tracing::warn!("Failed to report result for '{}': {}", description, e);
            }
            results.push(result);
        }

        self.transition(RunState::Finalizing);
        self.host.clear_pending_work().await?;
        self.host.force_full_rerender();

        let report = Report {
            results,
            error_count,
            duration: started.elapsed().as_secs_f64(),
        };

        self.transition(RunState::Done);
        tracing::info!(
            tests = report.results.len(),
            failed = report.error_count,
            duration = report.duration,
            "Test run complete"
        );
        if let Err(e) = self.reporter.send_final(&report).await {
            tracing::warn!("Failed to report final results: {}", e);
        }

        Ok(report)
    }
}

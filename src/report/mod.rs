//! Reporting pipeline
//!
//! The runner streams one [`ReportMessage::Line`] per finished test case and
//! a single [`ReportMessage::Final`] at the end of the run. Where they end
//! up is up to the [`Reporter`]: the console, a local socket read by
//! `treeprobe observe`, or a channel inside the embedding process.

pub mod console;
mod protocol;
mod socket;
pub mod transport;

pub use protocol::{Report, ReportMessage, TestResult};
pub use socket::SocketReporter;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::common::{Error, Result};

/// Destination for report messages
#[async_trait]
pub trait Reporter: Send {
    /// Deliver the result of one test case
    async fn send_line(&mut self, result: &TestResult) -> Result<()>;

    /// Deliver the aggregate report; called once, after the last line
    async fn send_final(&mut self, report: &Report) -> Result<()>;
}

/// Prints results to stdout as they arrive
#[derive(Debug, Default)]
pub struct ConsoleReporter;

#[async_trait]
impl Reporter for ConsoleReporter {
    async fn send_line(&mut self, result: &TestResult) -> Result<()> {
        println!("{}", console::format_line(result));
        Ok(())
    }

    async fn send_final(&mut self, report: &Report) -> Result<()> {
        println!("\n{}\n", console::format_summary(report));
        Ok(())
    }
}

/// Forwards messages into an mpsc channel
pub struct ChannelReporter {
    tx: mpsc::UnboundedSender<ReportMessage>,
}

impl ChannelReporter {
    /// Create a reporter and the receiving end of its channel
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ReportMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn forward(&self, message: ReportMessage) -> Result<()> {
        self.tx
            .send(message)
            .map_err(|_| Error::Transport("report receiver was dropped".to_string()))
    }
}

#[async_trait]
impl Reporter for ChannelReporter {
    async fn send_line(&mut self, result: &TestResult) -> Result<()> {
        self.forward(ReportMessage::Line {
            result: result.clone(),
        })
    }

    async fn send_final(&mut self, report: &Report) -> Result<()> {
        self.forward(ReportMessage::Final(report.clone()))
    }
}

/// Sends every message to each reporter in turn
///
/// A failing reporter doesn't stop delivery to the others; the first error
/// is returned once all have been tried.
#[derive(Default)]
pub struct Fanout {
    reporters: Vec<Box<dyn Reporter>>,
}

impl Fanout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, reporter: impl Reporter + 'static) -> Self {
        self.reporters.push(Box::new(reporter));
        self
    }
}

#[async_trait]
impl Reporter for Fanout {
    async fn send_line(&mut self, result: &TestResult) -> Result<()> {
        let mut first_error = None;
        for reporter in &mut self.reporters {
            if let Err(e) = reporter.send_line(result).await {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    async fn send_final(&mut self, report: &Report) -> Result<()> {
        let mut first_error = None;
        for reporter in &mut self.reporters {
            if let Err(e) = reporter.send_final(report).await {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

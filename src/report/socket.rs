//! Delivers report messages to `treeprobe observe` over a local socket

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;

use crate::common::config::ReportConfig;
use crate::common::{Error, Result};

use super::protocol::{Report, ReportMessage, TestResult};
use super::transport::{self, Stream};
use super::Reporter;

/// Reporter writing framed JSON messages to an observer socket
///
/// Connects lazily on the first message. When a write on the cached
/// connection fails (the observer restarted, say) the message is sent once
/// more on a fresh connection before the error is returned.
pub struct SocketReporter {
    socket: PathBuf,
    send_timeout: Duration,
    stream: Option<Stream>,
}

impl SocketReporter {
    pub fn new(socket: impl Into<PathBuf>, send_timeout: Duration) -> Self {
        Self {
            socket: socket.into(),
            send_timeout,
            stream: None,
        }
    }

    pub fn from_config(config: &ReportConfig) -> Self {
        Self::new(config.socket_path(), config.send_timeout())
    }

    async fn connect(&self) -> Result<Stream> {
        transport::connect(&self.socket)
            .await
            .map_err(|e| Error::ObserverConnectionFailed {
                path: self.socket.display().to_string(),
                source: e,
            })
    }

    async fn write_frame(&self, stream: &mut Stream, frame: &[u8]) -> Result<()> {
        match tokio::time::timeout(self.send_timeout, transport::send_message(stream, frame)).await
        {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(Error::Transport(e.to_string())),
            Err(_) => Err(Error::Transport(format!(
                "send timed out after {}ms",
                self.send_timeout.as_millis()
            ))),
        }
    }

    /// Write one message, reconnecting once if the cached connection is stale
    async fn send(&mut self, message: &ReportMessage) -> Result<()> {
        let frame = serde_json::to_vec(message)?;

        if let Some(mut stream) = self.stream.take() {
            match self.write_frame(&mut stream, &frame).await {
                Ok(()) => {
                    self.stream = Some(stream);
                    return Ok(());
                }
                Err(e) => tracing::debug!("Observer connection is stale, reconnecting: {}", e),
            }
        }

        let mut stream = self.connect().await?;
        self.write_frame(&mut stream, &frame).await?;
        self.stream = Some(stream);
        Ok(())
    }
}

#[async_trait]
impl Reporter for SocketReporter {
    async fn send_line(&mut self, result: &TestResult) -> Result<()> {
        self.send(&ReportMessage::Line {
            result: result.clone(),
        })
        .await
    }

    async fn send_final(&mut self, report: &Report) -> Result<()> {
        self.send(&ReportMessage::Final(report.clone())).await
    }
}

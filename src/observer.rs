//! Report observer - socket listener that collects a run's messages

use std::path::{Path, PathBuf};
use std::time::Duration;

use interprocess::local_socket::traits::tokio::Listener as ListenerTrait;
use tokio::io::BufReader;

use crate::common::{paths, Error, Result};
use crate::report::transport::{self, Listener, Stream};
use crate::report::{Report, ReportMessage};

/// Listens for report messages from a test run
pub struct Observer {
    listener: Listener,
    socket: PathBuf,
    idle_timeout: Duration,
}

impl Observer {
    /// Bind the observer socket, replacing a stale one
    pub async fn bind(socket: impl Into<PathBuf>, idle_timeout: Duration) -> Result<Self> {
        let socket = socket.into();
        let listener = transport::create_listener(&socket).await?;
        tracing::info!("Observer listening on {}", socket.display());

        Ok(Self {
            listener,
            socket,
            idle_timeout,
        })
    }

    pub fn socket(&self) -> &Path {
        &self.socket
    }

    /// Wait for one complete run
    ///
    /// Calls `on_message` for every message in arrival order and returns the
    /// final report. Reporters may reconnect between messages; a connection
    /// closing before the final message is not an error.
    ///
    /// The idle timeout only bounds the wait for a reporter to connect. An
    /// open connection may stay quiet for as long as a single test takes.
    pub async fn wait_for_report<F>(&self, mut on_message: F) -> Result<Report>
    where
        F: FnMut(&ReportMessage),
    {
        loop {
            let accepted = tokio::time::timeout(self.idle_timeout, self.listener.accept())
                .await
                .map_err(|_| Error::ObserverTimeout(self.idle_timeout.as_secs()))?;

            let stream = match accepted {
                Ok(stream) => stream,
                Err(e) => {
                    tracing::error!("Accept error: {}", e);
                    continue;
                }
            };

            if let Some(report) = self.read_messages(stream, &mut on_message).await? {
                return Ok(report);
            }
        }
    }

    /// Read messages from one reporter connection until it closes or the
    /// final report arrives
    async fn read_messages<F>(&self, stream: Stream, on_message: &mut F) -> Result<Option<Report>>
    where
        F: FnMut(&ReportMessage),
    {
        let mut reader = BufReader::new(stream);

        loop {
            let data = match transport::recv_message(&mut reader).await {
                Ok(data) => data,
                Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                    tracing::debug!("Reporter disconnected");
                    return Ok(None);
                }
                Err(e) => {
                    tracing::warn!("Error reading report message: {}", e);
                    return Ok(None);
                }
            };

            let message: ReportMessage = match serde_json::from_slice(&data) {
                Ok(message) => message,
                Err(e) => {
                    tracing::warn!("Invalid report message: {}", e);
                    continue;
                }
            };

            on_message(&message);

            if let ReportMessage::Final(report) = message {
                return Ok(Some(report));
            }
        }
    }
}

impl Drop for Observer {
    fn drop(&mut self) {
        if let Err(e) = paths::remove_socket(&self.socket) {
            tracing::debug!("Could not remove observer socket: {}", e);
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::report::{Reporter, SocketReporter, TestResult};

    #[tokio::test]
    async fn test_collects_lines_then_final() {
        let tmp = tempfile::tempdir().unwrap();
        let socket = tmp.path().join("report.sock");
        let observer = Observer::bind(&socket, Duration::from_secs(5)).await.unwrap();

        let sender = tokio::spawn({
            let socket = socket.clone();
            async move {
                let mut reporter = SocketReporter::new(socket, Duration::from_secs(5));
                let lines = [TestResult::pass("a"), TestResult::fail("b", &"boom")];
                for line in &lines {
                    reporter.send_line(line).await.unwrap();
                }
                reporter
                    .send_final(&Report::new(lines.to_vec(), 0.1))
                    .await
                    .unwrap();
            }
        });

        let mut seen = Vec::new();
        let report = observer
            .wait_for_report(|message| seen.push(message.clone()))
            .await
            .unwrap();
        sender.await.unwrap();

        assert_eq!(seen.len(), 3);
        assert_eq!(report.error_count, 1);
        assert!(report.results[1].message.contains("boom"));
    }

    #[tokio::test]
    async fn test_idle_timeout() {
        let tmp = tempfile::tempdir().unwrap();
        let observer = Observer::bind(tmp.path().join("idle.sock"), Duration::from_millis(50))
            .await
            .unwrap();

        let err = observer.wait_for_report(|_| {}).await.unwrap_err();
        assert!(matches!(err, Error::ObserverTimeout(_)));
    }

    #[tokio::test]
    async fn test_slow_test_outlasts_idle_timeout() {
        let tmp = tempfile::tempdir().unwrap();
        let socket = tmp.path().join("slow.sock");
        let observer = Observer::bind(&socket, Duration::from_millis(50)).await.unwrap();

        let sender = tokio::spawn({
            let socket = socket.clone();
            async move {
                let mut reporter = SocketReporter::new(socket, Duration::from_secs(5));
                let first = TestResult::pass("quick");
                reporter.send_line(&first).await.unwrap();

                // The next test runs far longer than the idle timeout
                tokio::time::sleep(Duration::from_millis(200)).await;
                let second = TestResult::pass("slow");
                reporter.send_line(&second).await.unwrap();
                reporter
                    .send_final(&Report::new(vec![first, second], 0.2))
                    .await
                    .unwrap();
            }
        });

        let mut seen = 0;
        let report = observer.wait_for_report(|_| seen += 1).await.unwrap();
        sender.await.unwrap();

        assert_eq!(seen, 3);
        assert!(report.passed());
    }

    #[tokio::test]
    async fn test_drop_removes_socket() {
        let tmp = tempfile::tempdir().unwrap();
        let socket = tmp.path().join("gone.sock");
        let observer = Observer::bind(&socket, Duration::from_secs(1)).await.unwrap();
        assert!(socket.exists());

        drop(observer);
        assert!(!socket.exists());
    }
}

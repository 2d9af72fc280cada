//! End-to-end tests for the test engine
//!
//! These tests drive a complete run against an in-memory host:
//! 1. Registering elements while the run is in progress
//! 2. Running a suite through the public API
//! 3. Checking the streamed and aggregate reports

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use treeprobe::common::config::{Config, RunnerConfig};
use treeprobe::common::logging;
use treeprobe::host::memory::{MemoryHost, MemoryRegistry, StubElement};
use treeprobe::host::{Layout, Viewport};
use treeprobe::report::ChannelReporter;
use treeprobe::{Error, ReportMessage, Suite, TestRunner};

/// A small login screen: typing credentials and pressing submit mounts the
/// welcome banner after a short render delay
fn login_screen(registry: &Arc<MemoryRegistry>) -> Arc<Mutex<String>> {
    let email = Arc::new(Mutex::new(String::new()));

    let typed = email.clone();
    registry.insert(
        "Login.Email",
        StubElement::new()
            .on_change_text(move |text| *typed.lock().unwrap() = text.to_string())
            .into_handle(),
    );

    let submitted = Arc::new(AtomicBool::new(false));
    let flag = submitted.clone();
    let screen = registry.clone();
    registry.insert(
        "Login.Submit",
        StubElement::new()
            .on_press(move || {
                if flag.swap(true, Ordering::SeqCst) {
                    return;
                }
                let screen = screen.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(Duration::from_millis(250)).await;
                    screen.remove("Login.Submit");
                    screen.insert(
                        "Home.Banner",
                        StubElement::new()
                            .with_layout(Layout {
                                x: 0.0,
                                y: 0.0,
                                width: 375.0,
                                height: 80.0,
                                page_x: 0.0,
                                page_y: 0.0,
                            })
                            .into_handle(),
                    );
                });
            })
            .into_handle(),
    );

    email
}

fn login_suite() -> Suite {
    let mut suite = Suite::new();
    suite.describe("Login", |g| {
        g.it("signs in", |t| async move {
            t.fill_in("Login.Email", "ada@example.com").await?;
            t.press("Login.Submit").await?;
            t.exists("Home.Banner").await?;
            t.is_fully_visible("Home.Banner").await
        });
        g.it("hides the submit button", |t| async move {
            t.not_exists("Login.Submit").await?;
            Ok(())
        });
        g.it("has no error toast", |t| async move {
            t.pause(100).await;
            t.exists("Login.ErrorToast").await?;
            Ok(())
        });
    });
    suite
}

#[tokio::test(start_paused = true)]
async fn test_login_flow() {
    logging::init_cli();

    let registry = Arc::new(MemoryRegistry::new());
    let email = login_screen(&registry);
    let host = Arc::new(MemoryHost::new(Viewport::new(375.0, 667.0)));

    let (reporter, mut rx) = ChannelReporter::channel();
    let report = TestRunner::new(RunnerConfig::new(1000, 0), registry, host.clone())
        .with_suite(login_suite())
        .with_reporter(reporter)
        .run()
        .await
        .unwrap();

    assert_eq!(*email.lock().unwrap(), "ada@example.com");

    let passed: Vec<bool> = report.results.iter().map(|r| r.passed).collect();
    assert_eq!(passed, [true, true, false]);
    assert_eq!(report.error_count, 1);
    assert!(report.results[2].message.starts_with("Login: has no error toast"));
    assert!(report.results[2].message.contains("'Login.ErrorToast'"));

    // Lines arrive in registration order, then one final message
    let mut lines = 0;
    loop {
        match rx.recv().await {
            Some(ReportMessage::Line { result }) => {
                assert_eq!(result, report.results[lines]);
                lines += 1;
            }
            Some(ReportMessage::Final(final_report)) => {
                assert_eq!(final_report, report);
                break;
            }
            None => panic!("channel closed before the final report"),
        }
    }
    assert_eq!(lines, 3);

    assert_eq!(host.clear_count(), 1);
    assert_eq!(host.rerender_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_error_count_matches_failures() {
    let mut suite = Suite::new();
    suite.describe("Mixed", |g| {
        for i in 0..10u32 {
            g.it(&format!("case {}", i), move |t| async move {
                t.assert_true(i % 3 != 0)
            });
        }
    });

    let (reporter, _rx) = ChannelReporter::channel();
    let report = TestRunner::new(
        RunnerConfig::new(100, 0),
        Arc::new(MemoryRegistry::new()),
        Arc::new(MemoryHost::default()),
    )
    .with_suite(suite)
    .with_reporter(reporter)
    .run()
    .await
    .unwrap();

    let failures = report.results.iter().filter(|r| !r.passed).count();
    assert_eq!(report.results.len(), 10);
    assert_eq!(report.error_count, failures);
    assert_eq!(report.error_count, 4);
}

#[tokio::test(start_paused = true)]
async fn test_configured_runner() {
    let config = Config::from_toml_str(
        r#"
[runner]
wait_time_ms = 200
start_delay_ms = 50
"#,
    )
    .unwrap();

    let mut runner = TestRunner::new(
        config.runner,
        Arc::new(MemoryRegistry::new()),
        Arc::new(MemoryHost::default()),
    );
    runner.describe("Config", |g| {
        g.it("times out after the configured wait", |t| async move {
            let started = tokio::time::Instant::now();
            let err = t.exists("Never").await.unwrap_err();
            t.assert_equal(started.elapsed(), Duration::from_millis(200))?;
            match err {
                Error::ComponentNotFound { wait_ms, .. } => t.assert_equal(wait_ms, 200),
                other => Err(other),
            }
        });
    });

    let (reporter, _rx) = ChannelReporter::channel();
    let report = runner.with_reporter(reporter).run().await.unwrap();
    assert!(report.passed(), "{:?}", report.results);
}

#[cfg(unix)]
#[tokio::test]
async fn test_results_reach_observer_over_socket() {
    use treeprobe::observer::Observer;
    use treeprobe::report::SocketReporter;

    let tmp = tempfile::tempdir().unwrap();
    let socket = tmp.path().join("report.sock");
    let observer = Observer::bind(&socket, Duration::from_secs(10)).await.unwrap();

    let run = tokio::spawn({
        let socket = socket.clone();
        async move {
            let mut suite = Suite::new();
            suite.describe("Socket", |g| {
                g.it("passes", |_| async { Ok(()) });
                g.it("fails", |_| async { Err(Error::test_failed("boom")) });
            });

            TestRunner::new(
                RunnerConfig::new(100, 0),
                Arc::new(MemoryRegistry::new()),
                Arc::new(MemoryHost::default()),
            )
            .with_suite(suite)
            .with_reporter(SocketReporter::new(socket, Duration::from_secs(5)))
            .run()
            .await
        }
    });

    let mut events = Vec::new();
    let observed = observer
        .wait_for_report(|message| {
            events.push(match message {
                ReportMessage::Line { .. } => "line",
                ReportMessage::Final(_) => "final",
            })
        })
        .await
        .unwrap();
    let local = run.await.unwrap().unwrap();

    assert_eq!(events, ["line", "line", "final"]);
    assert_eq!(observed, local);
    assert_eq!(observed.error_count, 1);
    assert!(observed.results[1].message.contains("boom"));
}

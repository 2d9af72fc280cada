//! Identifier resolution
//!
//! Turns an identifier into a live element handle, waiting for the host to
//! register it. Tests routinely ask for an element while the host is still
//! rendering, so a single lookup is not enough.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};

use crate::common::config::RunnerConfig;
use crate::common::{Error, Result};
use crate::host::{ElementHandle, Registry};

/// Run `check` every `interval` until it yields a value or `timeout` elapses
///
/// The first check runs immediately. On each tick the check runs before the
/// deadline test, so a value found on the tick where the deadline expires is
/// still returned. The ticker lives inside this future and is dropped with
/// it on every exit path.
pub async fn poll_until<T, F>(interval: Duration, timeout: Duration, mut check: F) -> Option<T>
where
    F: FnMut() -> Option<T>,
{
    let started = Instant::now();
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        if let Some(value) = check() {
            return Some(value);
        }

        if started.elapsed() >= timeout {
            return None;
        }
    }
}

/// Resolves identifiers against the host registry with a bounded wait
#[derive(Clone)]
pub struct Resolver {
    registry: Arc<dyn Registry>,
    wait_time: Duration,
    poll_interval: Duration,
}

impl Resolver {
    pub fn new(registry: Arc<dyn Registry>, config: &RunnerConfig) -> Self {
        Self {
            registry,
            wait_time: config.wait_time(),
            poll_interval: config.poll_interval(),
        }
    }

    /// Maximum time a single `resolve` call waits
    pub fn wait_time(&self) -> Duration {
        self.wait_time
    }

    /// Wait for `identifier` to appear in the registry
    ///
    /// Fails with [`Error::ComponentNotFound`] once the wait time has elapsed
    /// without the registry ever returning an element.
    pub async fn resolve(&self, identifier: &str) -> Result<ElementHandle> {
        tracing::debug!(identifier, "Resolving component");

        let registry = &self.registry;
        let found = poll_until(self.poll_interval, self.wait_time, || {
            registry.get(identifier)
        })
        .await;

        match found {
            Some(element) => Ok(element),
            None => {
                tracing::debug!(identifier, "Component not found before deadline");
                Err(Error::component_not_found(
                    identifier,
                    self.wait_time.as_millis() as u64,
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ErrorKind;
    use crate::host::memory::{MemoryRegistry, StubElement};

    /// Registry whose single element shows up at a fixed point in time
    struct AppearsAt {
        identifier: &'static str,
        at: Instant,
    }

    impl Registry for AppearsAt {
        fn get(&self, identifier: &str) -> Option<ElementHandle> {
            (identifier == self.identifier && Instant::now() >= self.at)
                .then(|| StubElement::new().into_handle())
        }
    }

    fn resolver(registry: Arc<dyn Registry>, wait_time_ms: u64) -> Resolver {
        Resolver::new(registry, &RunnerConfig::new(wait_time_ms, 0))
    }

    #[tokio::test(start_paused = true)]
    async fn test_present_element_resolves_immediately() {
        let registry = Arc::new(MemoryRegistry::new());
        registry.insert("Home.Title", StubElement::new().into_handle());

        let started = Instant::now();
        resolver(registry, 5000).resolve("Home.Title").await.unwrap();
        assert!(started.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_element_times_out() {
        let registry = Arc::new(MemoryRegistry::new());

        let resolver = resolver(registry, 500);
        assert_eq!(resolver.wait_time(), Duration::from_millis(500));

        let started = Instant::now();
        let err = resolver.resolve("Nope").await.err().unwrap();
        assert!(started.elapsed() >= Duration::from_millis(500));
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.to_string().contains("'Nope'"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_registration_is_picked_up() {
        let registry = Arc::new(AppearsAt {
            identifier: "List.Row",
            at: Instant::now() + Duration::from_millis(250),
        });

        let started = Instant::now();
        resolver(registry, 2000).resolve("List.Row").await.unwrap();
        // Next poll tick after registration
        assert_eq!(started.elapsed(), Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_hit_on_deadline_tick_wins() {
        let registry = Arc::new(AppearsAt {
            identifier: "Edge",
            at: Instant::now() + Duration::from_millis(500),
        });

        assert!(resolver(registry, 500).resolve("Edge").await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_hit_after_deadline_tick_loses() {
        let registry = Arc::new(AppearsAt {
            identifier: "Edge",
            at: Instant::now() + Duration::from_millis(501),
        });

        let err = resolver(registry, 500).resolve("Edge").await.err().unwrap();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_until_counts_checks() {
        let mut calls = 0;
        let result: Option<()> = poll_until(
            Duration::from_millis(100),
            Duration::from_millis(300),
            || {
                calls += 1;
                None
            },
        )
        .await;

        assert!(result.is_none());
        // Ticks at 0, 100, 200 and 300ms
        assert_eq!(calls, 4);
    }
}

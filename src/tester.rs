//! Interaction primitives
//!
//! The handle every test action receives. Element operations resolve their
//! identifier first, so each one may wait up to the configured wait time.

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;

use crate::common::{Error, ErrorKind, Result};
use crate::host::{ElementHandle, Host, Layout, NativeComponent};
use crate::resolver::Resolver;

/// Measure a native component, bridging its callback into a future
///
/// If the host never invokes the callback this never completes. A callback
/// dropped without being invoked is reported as an internal error.
pub async fn measure_async(native: &dyn NativeComponent) -> Result<Layout> {
    let (tx, rx) = oneshot::channel();
    native.measure(Box::new(move |layout| {
        let _ = tx.send(layout);
    }));

    rx.await.map_err(|_| {
        Error::Internal("measure callback was dropped without being called".to_string())
    })
}

/// Handle passed to each test action
#[derive(Clone)]
pub struct Tester {
    resolver: Resolver,
    host: Arc<dyn Host>,
}

impl Tester {
    pub fn new(resolver: Resolver, host: Arc<dyn Host>) -> Self {
        Self { resolver, host }
    }

    /// Resolve an element, waiting for it to be registered
    pub async fn find_component(&self, identifier: &str) -> Result<ElementHandle> {
        self.resolver.resolve(identifier).await
    }

    /// Succeeds once `identifier` is registered
    pub async fn exists(&self, identifier: &str) -> Result<bool> {
        self.find_component(identifier).await?;
        Ok(true)
    }

    /// Succeeds if `identifier` stays unregistered for the whole wait time
    pub async fn not_exists(&self, identifier: &str) -> Result<bool> {
        match self.find_component(identifier).await {
            Ok(_) => Err(Error::ComponentPresent(identifier.to_string())),
            Err(e) => match e.kind() {
                ErrorKind::NotFound => Ok(true),
                ErrorKind::MissingCapability | ErrorKind::AssertionFailed | ErrorKind::Other => {
                    Err(e)
                }
            },
        }
    }

    /// Replace the text of an input element
    pub async fn fill_in(&self, identifier: &str, text: &str) -> Result<()> {
        let element = self.find_component(identifier).await?;
        let input = element
            .text_input()
            .ok_or_else(|| Error::missing_capability(identifier, "text input"))?;
        input.change_text(text);
        Ok(())
    }

    /// Activate a pressable element
    pub async fn press(&self, identifier: &str) -> Result<()> {
        let element = self.find_component(identifier).await?;
        let pressable = element
            .pressable()
            .ok_or_else(|| Error::missing_capability(identifier, "press"))?;
        pressable.press();
        Ok(())
    }

    /// Check that the element lies entirely inside the viewport
    pub async fn is_fully_visible(&self, identifier: &str) -> Result<()> {
        let element = self.find_component(identifier).await?;
        let native = element
            .native()
            .ok_or_else(|| Error::NoNativeComponent(identifier.to_string()))?;
        let layout = measure_async(native).await?;

        let viewport = self.host.viewport();
        let edges = viewport.overflowing_edges(&layout);
        if !edges.is_empty() {
            return Err(Error::test_failed(format!(
                "Component '{}' is not fully visible: {} edge outside the {}x{} viewport",
                identifier,
                edges.join("/"),
                viewport.width,
                viewport.height
            )));
        }

        Ok(())
    }

    /// Suspend the test for `ms` milliseconds
    pub async fn pause(&self, ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    /// Fail unless `actual == expected`
    pub fn assert_equal<A, B>(&self, actual: A, expected: B) -> Result<()>
    where
        A: PartialEq<B> + Debug,
        B: Debug,
    {
        if actual != expected {
            return Err(Error::Assertion(format!(
                "Expected {:?} to equal {:?}",
                actual, expected
            )));
        }
        Ok(())
    }

    /// Fail unless `value` is true
    pub fn assert_true(&self, value: bool) -> Result<()> {
        if !value {
            return Err(Error::test_failed("Expected value to be true, got false"));
        }
        Ok(())
    }
}

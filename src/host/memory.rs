//! In-memory host, registry and elements
//!
//! Used to drive the engine without a real component tree: embedders can
//! wire their own elements into a [`MemoryRegistry`], and the crate's tests
//! use it to script registration timing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;

use super::{
    Element, ElementHandle, Host, Layout, MeasureCallback, NativeComponent, Pressable, Registry,
    TextInput, Viewport,
};
use crate::common::{Error, Result};

type TextHandler = Box<dyn Fn(&str) + Send + Sync>;
type PressHandler = Box<dyn Fn() + Send + Sync>;

/// Registry backed by a hash map
#[derive(Default)]
pub struct MemoryRegistry {
    entries: RwLock<HashMap<String, ElementHandle>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) an element under `identifier`
    pub fn insert(&self, identifier: impl Into<String>, element: ElementHandle) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(identifier.into(), element);
    }

    /// Unregister an element, as the host does when it unmounts
    pub fn remove(&self, identifier: &str) -> Option<ElementHandle> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(identifier)
    }
}

impl Registry for MemoryRegistry {
    fn get(&self, identifier: &str) -> Option<ElementHandle> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(identifier)
            .cloned()
    }
}

/// Element assembled from optional handlers
#[derive(Default)]
pub struct StubElement {
    on_change_text: Option<TextHandler>,
    on_press: Option<PressHandler>,
    layout: Option<Layout>,
}

impl StubElement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_change_text(mut self, handler: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_change_text = Some(Box::new(handler));
        self
    }

    pub fn on_press(mut self, handler: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_press = Some(Box::new(handler));
        self
    }

    /// Give the element a native view measuring as `layout`
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn into_handle(self) -> ElementHandle {
        Arc::new(self)
    }
}

impl Element for StubElement {
    fn text_input(&self) -> Option<&dyn TextInput> {
        self.on_change_text.as_ref().map(|_| self as &dyn TextInput)
    }

    fn pressable(&self) -> Option<&dyn Pressable> {
        self.on_press.as_ref().map(|_| self as &dyn Pressable)
    }

    fn native(&self) -> Option<&dyn NativeComponent> {
        self.layout.as_ref().map(|_| self as &dyn NativeComponent)
    }
}

impl TextInput for StubElement {
    fn change_text(&self, text: &str) {
        if let Some(handler) = &self.on_change_text {
            handler(text);
        }
    }
}

impl Pressable for StubElement {
    fn press(&self) {
        if let Some(handler) = &self.on_press {
            handler();
        }
    }
}

impl NativeComponent for StubElement {
    fn measure(&self, callback: MeasureCallback) {
        callback(self.layout.unwrap_or_default());
    }
}

/// Host with a fixed viewport that counts reset requests
pub struct MemoryHost {
    viewport: Viewport,
    fail_reset: bool,
    clears: AtomicUsize,
    rerenders: AtomicUsize,
}

impl MemoryHost {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            fail_reset: false,
            clears: AtomicUsize::new(0),
            rerenders: AtomicUsize::new(0),
        }
    }

    /// Make `clear_pending_work` fail, to exercise the finalization path
    pub fn failing_reset(mut self) -> Self {
        self.fail_reset = true;
        self
    }

    /// Number of times pending work was cleared
    pub fn clear_count(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }

    /// Number of forced re-renders
    pub fn rerender_count(&self) -> usize {
        self.rerenders.load(Ordering::SeqCst)
    }
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new(Viewport::new(375.0, 667.0))
    }
}

#[async_trait]
impl Host for MemoryHost {
    async fn clear_pending_work(&self) -> Result<()> {
        self.clears.fetch_add(1, Ordering::SeqCst);
        if self.fail_reset {
            return Err(Error::HostReset("pending work could not be cleared".to_string()));
        }
        Ok(())
    }

    fn force_full_rerender(&self) {
        self.rerenders.fetch_add(1, Ordering::SeqCst);
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }
}

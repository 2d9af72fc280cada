//! Host-side collaborators
//!
//! The component tree, its identifier registry and the native measurement
//! primitive belong to the application under test. The engine only sees
//! them through these traits.

pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::common::Result;

/// Shared handle to a live element
pub type ElementHandle = Arc<dyn Element>;

/// Callback handed to [`NativeComponent::measure`]; invoked exactly once
pub type MeasureCallback = Box<dyn FnOnce(Layout) + Send>;

/// Read-only mapping from identifier to live element, owned by the host
pub trait Registry: Send + Sync {
    /// Look up an element by identifier
    fn get(&self, identifier: &str) -> Option<ElementHandle>;
}

/// A live element in the component tree
///
/// Each capability is optional; operations that need one fail with a
/// capability error when the element doesn't provide it.
pub trait Element: Send + Sync {
    fn text_input(&self) -> Option<&dyn TextInput> {
        None
    }

    fn pressable(&self) -> Option<&dyn Pressable> {
        None
    }

    fn native(&self) -> Option<&dyn NativeComponent> {
        None
    }
}

/// Element that accepts text changes
pub trait TextInput: Send + Sync {
    fn change_text(&self, text: &str);
}

/// Element that can be activated
pub trait Pressable: Send + Sync {
    fn press(&self);
}

/// Element backed by a native view that can report its geometry
pub trait NativeComponent: Send + Sync {
    fn measure(&self, callback: MeasureCallback);
}

/// Geometry reported by a native measurement
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Layout {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Absolute left edge
    pub page_x: f64,
    /// Absolute top edge
    pub page_y: f64,
}

/// Visible window rectangle, anchored at the origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Edges of `layout` that fall outside this viewport
    pub fn overflowing_edges(&self, layout: &Layout) -> Vec<&'static str> {
        let mut edges = Vec::new();
        if layout.page_x < 0.0 {
            edges.push("left");
        }
        if layout.page_y < 0.0 {
            edges.push("top");
        }
        if layout.page_x + layout.width > self.width {
            edges.push("right");
        }
        if layout.page_y + layout.height > self.height {
            edges.push("bottom");
        }
        edges
    }
}

/// The application instance under test
#[async_trait]
pub trait Host: Send + Sync {
    /// Flush async side effects accumulated by the run (storage, timers)
    async fn clear_pending_work(&self) -> Result<()>;

    /// Throw away and rebuild the component tree
    fn force_full_rerender(&self);

    /// Current window size
    fn viewport(&self) -> Viewport;
}

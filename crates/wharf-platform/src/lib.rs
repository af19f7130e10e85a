//! Platform abstraction layer for Wharf.
//!
//! Provides the native host window, the DevTools holder window, window
//! discovery, and the window operations the dock engine drives. Currently
//! implements Windows via the `windows` crate; other backends can be added
//! later.

#[cfg(windows)]
pub mod win32;

use wharf_core::Rect;

// ──────────────────────────────────────────────
// Platform Events
// ──────────────────────────────────────────────

/// Platform-agnostic event delivered by the native backend.
#[derive(Debug, Clone)]
pub enum PlatformEvent {
    /// Host client area changed.
    Resized { width: i32, height: i32 },
    /// The host moved to a monitor with a different DPI.
    DpiChanged(u32),
    /// Ctrl+Shift+D: advance the DevTools dock cycle.
    ToggleDevToolsDock,
    /// Ctrl+Shift+I: ask the content webview to open its DevTools.
    OpenDevTools,
    /// Live holder rectangle (host client coordinates) during a splitter
    /// drag. Delivered synchronously from the modal resize loop.
    HolderResizeDrag { rect: Rect },
    /// A background thread posted a wake message; drain pending channels.
    BackgroundWake,
    CloseRequested,
}

/// Callback invoked by the platform for each event, on the UI thread.
pub type EventCallback = Box<dyn FnMut(PlatformEvent)>;

/// Callback to wake the event loop from a background thread.
/// Arc so it can be cloned into multiple background threads.
pub type WakeCallback = std::sync::Arc<dyn Fn() + Send + Sync + 'static>;

// ──────────────────────────────────────────────
// Window configuration
// ──────────────────────────────────────────────

/// Configuration for creating the host window.
pub struct WindowConfig {
    pub title: String,
    pub width: i32,
    pub height: i32,
    /// Unscaled height of the top UI bar the layout reserves.
    pub top_bar_height: i32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Wharf".to_string(),
            width: 1200,
            height: 800,
            top_bar_height: 40,
        }
    }
}

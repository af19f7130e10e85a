//! Content webview wrapper: WebView2 via `wry`, built as a child of the
//! host window.

use std::sync::mpsc::Sender;

use wharf_core::Rect;
use wharf_platform::win32::HostWindow;
use wharf_platform::WakeCallback;
use wry::dpi::{PhysicalPosition, PhysicalSize};
use wry::{WebView, WebViewBuilder};

use crate::broker::{self, BrokerMessage};

pub struct ContentView {
    webview: WebView,
}

impl ContentView {
    /// Build the webview with DevTools enabled. Page messages are parsed in
    /// the ipc handler and queued for the UI thread; the waker makes sure
    /// the queue is drained promptly.
    pub fn new(
        host: &HostWindow,
        url: &str,
        bounds: Rect,
        messages: Sender<BrokerMessage>,
        waker: WakeCallback,
    ) -> Result<Self, wry::Error> {
        let webview = WebViewBuilder::new()
            .with_url(url)
            .with_bounds(to_wry_rect(bounds))
            .with_devtools(true)
            .with_ipc_handler(move |request: wry::http::Request<String>| {
                if let Some(message) = broker::parse(request.body()) {
                    let _ = messages.send(message);
                    waker();
                }
            })
            .build_as_child(host)?;
        Ok(Self { webview })
    }

    pub fn navigate(&self, url: &str) {
        if let Err(e) = self.webview.load_url(url) {
            log::warn!("navigation to {url} failed: {e}");
        }
    }

    pub fn set_bounds(&self, rect: Rect) {
        let _ = self.webview.set_bounds(to_wry_rect(rect));
    }

    /// Ask the runtime to open the DevTools window. It opens floating and
    /// externally owned; discovery picks it up on the next dock toggle.
    pub fn open_devtools(&self) {
        self.webview.open_devtools();
    }

    pub fn focus(&self) {
        let _ = self.webview.focus();
    }
}

fn to_wry_rect(rect: Rect) -> wry::Rect {
    wry::Rect {
        position: PhysicalPosition::new(rect.x, rect.y).into(),
        size: PhysicalSize::new(rect.width.max(0) as u32, rect.height.max(0) as u32).into(),
    }
}

//! One browser tab: content webview, docking session, and the window ops
//! the session drives. Each tab tracks at most one DevTools window and
//! owns its geometry table outright.

use std::sync::mpsc::Sender;

use wharf_core::{Rect, TabId};
use wharf_dock::{DockSession, SPLITTER_THICKNESS};
use wharf_platform::win32::{HostWindow, Win32WindowOps};
use wharf_platform::WakeCallback;

use crate::broker::BrokerMessage;
use crate::webview::ContentView;

pub struct Tab {
    pub id: TabId,
    pub content: ContentView,
    pub session: DockSession,
    pub ops: Win32WindowOps,
}

impl Tab {
    pub fn new(
        id: TabId,
        host: &HostWindow,
        url: &str,
        top_offset: i32,
        messages: Sender<BrokerMessage>,
        waker: WakeCallback,
    ) -> Result<Self, wry::Error> {
        let host_bounds = host.client_bounds();
        let bounds = Rect::new(
            0,
            top_offset,
            host_bounds.width,
            (host_bounds.height - top_offset).max(0),
        );
        let content = ContentView::new(host, url, bounds, messages, waker)?;
        Ok(Self {
            id,
            content,
            session: DockSession::new(top_offset),
            ops: Win32WindowOps::new(host, SPLITTER_THICKNESS),
        })
    }
}

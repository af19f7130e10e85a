//! Shell state: the tab table, the toggle coordinator, and platform event
//! handling. All of it lives on the UI thread; background scans hand their
//! results back through the coordinator's channel plus a posted wake.

use std::rc::Rc;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

use wharf_core::{DockState, ExternalWindow, HostHooks, RawWindowId, Rect, TabId};
use wharf_platform::win32::{DevToolsWindowScan, HostWindow};
use wharf_platform::PlatformEvent;

use crate::broker::BrokerMessage;
use crate::tab::Tab;
use crate::toggle::ToggleCoordinator;
use crate::webview::ContentView;

/// Unscaled height of the top UI bar; scaled by the window DPI at use.
pub const UI_BAR_HEIGHT: i32 = 40;

/// First page each new tab loads.
pub const START_PAGE: &str = "https://www.bing.com";

pub struct Shell {
    window: Rc<HostWindow>,
    tabs: Vec<Tab>,
    active: usize,
    coordinator: ToggleCoordinator,
    messages_tx: Sender<BrokerMessage>,
    messages_rx: Receiver<BrokerMessage>,
}

impl Shell {
    pub fn new(window: Rc<HostWindow>) -> Result<Self, wry::Error> {
        let (messages_tx, messages_rx) = channel();
        let coordinator =
            ToggleCoordinator::new(Arc::new(DevToolsWindowScan), window.waker());
        let mut shell = Self {
            window,
            tabs: Vec::new(),
            active: 0,
            coordinator,
            messages_tx,
            messages_rx,
        };
        shell.add_tab(START_PAGE, true)?;
        Ok(shell)
    }

    pub fn add_tab(&mut self, url: &str, active: bool) -> Result<TabId, wry::Error> {
        let id = self.tabs.len();
        let tab = Tab::new(
            id,
            &self.window,
            url,
            self.top_offset(),
            self.messages_tx.clone(),
            self.window.waker(),
        )?;
        self.tabs.push(tab);
        if active {
            self.active = id;
        }

        let top = self.top_offset();
        let claimed = self.claimed_ids(id);
        let window = Rc::clone(&self.window);
        let tab = &self.tabs[id];
        let mut hooks = ShellHooks {
            window: &window,
            content: &tab.content,
            top,
            claimed: &claimed,
        };
        hooks.notify_tab_ready(id, active);
        Ok(id)
    }

    pub fn handle_event(&mut self, event: PlatformEvent) {
        match event {
            PlatformEvent::Resized { .. } | PlatformEvent::DpiChanged(_) => self.relayout(),
            PlatformEvent::ToggleDevToolsDock => self.start_toggle(),
            PlatformEvent::OpenDevTools => {
                if let Some(tab) = self.tabs.get(self.active) {
                    tab.content.open_devtools();
                }
            }
            PlatformEvent::HolderResizeDrag { rect } => self.splitter_dragged(rect),
            PlatformEvent::BackgroundWake => self.drain_background(),
            PlatformEvent::CloseRequested => {}
        }
    }

    /// DPI-aware top offset the layout reserves for the UI bar.
    fn top_offset(&self) -> i32 {
        (UI_BAR_HEIGHT as f64 * self.window.dpi_scale()).round() as i32
    }

    /// Window ids tracked by every tab except `except`. Snapshotted on the
    /// UI thread before a scan so discovery never reads live tab state.
    fn claimed_ids(&self, except: TabId) -> Vec<RawWindowId> {
        self.tabs
            .iter()
            .filter(|tab| tab.id != except)
            .filter_map(|tab| tab.session.external().map(|w| w.id))
            .collect()
    }

    fn relayout(&mut self) {
        let top = self.top_offset();
        let claimed = self.claimed_ids(self.active);
        let window = Rc::clone(&self.window);
        let Some(tab) = self.tabs.get_mut(self.active) else {
            return;
        };
        let mut hooks = ShellHooks {
            window: &window,
            content: &tab.content,
            top,
            claimed: &claimed,
        };
        tab.session.apply_layout(&mut tab.ops, &mut hooks);
    }

    fn splitter_dragged(&mut self, rect: Rect) {
        let top = self.top_offset();
        let claimed = self.claimed_ids(self.active);
        let window = Rc::clone(&self.window);
        let Some(tab) = self.tabs.get_mut(self.active) else {
            return;
        };
        let mut hooks = ShellHooks {
            window: &window,
            content: &tab.content,
            top,
            claimed: &claimed,
        };
        tab.session.resize_drag(rect, &mut tab.ops, &mut hooks);
    }

    /// Phase one of a toggle: snapshot the claim list and kick off the
    /// background scan (only needed while the state is Unknown).
    fn start_toggle(&mut self) {
        let claimed = self.claimed_ids(self.active);
        let Some(tab) = self.tabs.get_mut(self.active) else {
            return;
        };
        let needs_discovery = tab.session.state(&mut tab.ops) == DockState::Unknown;
        self.coordinator.request(needs_discovery, claimed);
    }

    /// Phase two of a toggle, on the UI thread: adopt a discovered window
    /// if none was known, then advance the dock cycle.
    fn apply_toggle(&mut self, discovered: Option<ExternalWindow>) {
        let top = self.top_offset();
        let claimed = self.claimed_ids(self.active);
        let window = Rc::clone(&self.window);
        let Some(tab) = self.tabs.get_mut(self.active) else {
            return;
        };
        let mut hooks = ShellHooks {
            window: &window,
            content: &tab.content,
            top,
            claimed: &claimed,
        };
        if tab.session.state(&mut tab.ops) == DockState::Unknown {
            // The scan snapshot is stale by now; re-check the claim before
            // adopting so two tabs never track the same window.
            if let Some(found) = discovered {
                if !hooks.is_window_claimed(found.id) {
                    tab.session.adopt(found);
                }
            }
        }
        tab.session.toggle(&mut tab.ops, &mut hooks);
    }

    fn drain_background(&mut self) {
        while let Ok(message) = self.messages_rx.try_recv() {
            match message {
                BrokerMessage::Navigate { uri } => {
                    if let Some(tab) = self.tabs.get(self.active) {
                        tab.content.navigate(&uri);
                    }
                }
                BrokerMessage::OpenDevTools => {
                    if let Some(tab) = self.tabs.get(self.active) {
                        tab.content.open_devtools();
                    }
                }
                BrokerMessage::ToggleDevToolsDock => self.start_toggle(),
            }
        }

        while let Some(outcome) = self.coordinator.poll() {
            self.apply_toggle(outcome.discovered);
            if outcome.rerun {
                self.start_toggle();
            }
        }
    }
}

// ──────────────────────────────────────────────
// HostHooks
// ──────────────────────────────────────────────

/// Per-call `HostHooks` view over the shell's split-borrowed pieces.
struct ShellHooks<'a> {
    window: &'a HostWindow,
    content: &'a ContentView,
    top: i32,
    claimed: &'a [RawWindowId],
}

impl HostHooks for ShellHooks<'_> {
    fn content_top_offset(&self) -> i32 {
        self.top
    }

    fn apply_content_bounds(&mut self, rect: Rect) {
        self.content.set_bounds(rect);
    }

    fn is_window_claimed(&self, id: RawWindowId) -> bool {
        self.claimed.contains(&id)
    }

    fn request_focus_restore(&mut self) {
        // Reparenting moved input focus into the DevTools tree; the
        // accelerators live on the host window.
        self.window.focus();
    }

    fn notify_tab_ready(&mut self, tab: TabId, is_active: bool) {
        log::info!("tab {tab} ready (active: {is_active})");
        if is_active {
            self.content.focus();
        }
    }
}

// Dock engine: per-tab geometry table + the state machine that drives
// dock/undock transitions through the WindowOps seam.

mod geometry;
mod tests;

pub use geometry::{DockGeometry, MIN_PANEL_PX, SPLITTER_THICKNESS};

use wharf_core::{DockState, ExternalWindow, HostHooks, Rect, WindowOps};

// ──────────────────────────────────────────────
// DockSession
// ──────────────────────────────────────────────

/// One tab's docking session: the tracked DevTools window, the current dock
/// state, and the geometry table. All three are owned per tab: the window
/// is never shared across tabs, and every read of `state` revalidates the
/// tracked window first.
pub struct DockSession {
    tracked: Option<ExternalWindow>,
    state: DockState,
    geometry: DockGeometry,
}

impl DockSession {
    pub fn new(top_offset: i32) -> Self {
        Self {
            tracked: None,
            state: DockState::Unknown,
            geometry: DockGeometry::new(top_offset),
        }
    }

    /// Adopt a freshly discovered DevTools window. The window starts out
    /// floating, so the state moves to `Undocked`.
    pub fn adopt(&mut self, window: ExternalWindow) {
        log::debug!("adopting devtools window {:?} (pid {})", window.id, window.pid);
        self.tracked = Some(window);
        self.state = DockState::Undocked;
    }

    /// The tracked window, without revalidation. Discovery snapshots use
    /// this to build the claimed-id list; everything else goes through
    /// [`Self::state`].
    pub fn external(&self) -> Option<ExternalWindow> {
        self.tracked
    }

    pub fn geometry(&self) -> &DockGeometry {
        &self.geometry
    }

    /// Current dock state, revalidated: if the tracked window is gone (or
    /// its id was recycled to another process), everything tied to it is
    /// torn down and the state collapses to `Unknown`.
    pub fn state(&mut self, ops: &mut dyn WindowOps) -> DockState {
        if self.state != DockState::Unknown {
            let alive = self.tracked.map(|w| ops.is_alive(&w)).unwrap_or(false);
            if !alive {
                log::debug!("tracked devtools window vanished, resetting to unknown");
                if self.state.is_docked() {
                    ops.destroy_holder();
                }
                self.tracked = None;
                self.geometry.forget_window();
                self.state = DockState::Unknown;
            }
        }
        self.state
    }

    /// Advance one step through the dock cycle:
    /// Undocked → DockedRight → DockedLeft → DockedBottom → Undocked.
    /// A no-op while no DevTools window is known.
    pub fn toggle(&mut self, ops: &mut dyn WindowOps, hooks: &mut dyn HostHooks) {
        let target = self.state(ops).cycle_next();
        if target != DockState::Unknown {
            self.dock(target, ops, hooks);
        }
    }

    /// Move the tracked window to `target`.
    ///
    /// OS-level failures inside the ops implementor are best-effort: the
    /// recorded state and geometry advance regardless, so a partially
    /// failed transition is not rolled back.
    pub fn dock(&mut self, target: DockState, ops: &mut dyn WindowOps, hooks: &mut dyn HostHooks) {
        if self.state(ops) == DockState::Unknown || target == DockState::Unknown {
            return;
        }
        let Some(window) = self.tracked else { return };

        self.geometry.set_top_offset(hooks.content_top_offset());
        self.geometry.compute_defaults(ops.host_bounds());

        if let Some(edge) = target.splitter_edge() {
            // Entering a docked position. Capture the floating rectangle on
            // the way out of Undocked so the next undock can restore it.
            if self.state == DockState::Undocked {
                if let Some(rect) = ops.frame_rect(&window) {
                    self.geometry.capture_floating(rect);
                }
            }
            if let Some(strip) = self.geometry.anchored(target) {
                ops.ensure_holder(strip, edge);
                ops.embed(&window);
                log::debug!("docked devtools {:?} -> {:?}", self.state, target);
                self.state = target;
            }
        } else {
            // Back to floating: native chrome returns, the holder goes away,
            // and the window lands on its captured rectangle.
            ops.release(&window);
            ops.destroy_holder();
            if let Some(prev) = self.geometry.take_floating() {
                ops.move_window(&window, prev);
            }
            log::debug!("undocked devtools from {:?}", self.state);
            self.state = DockState::Undocked;
        }

        self.apply_layout(ops, hooks);
        hooks.request_focus_restore();
    }

    /// Re-apply the current layout: place the panel (when docked) and push
    /// the content rectangle to the shell. Called after transitions, host
    /// resizes, and live splitter drags. Never recomputes defaults.
    pub fn apply_layout(&mut self, ops: &mut dyn WindowOps, hooks: &mut dyn HostHooks) {
        self.geometry.set_top_offset(hooks.content_top_offset());
        self.geometry.set_host(ops.host_bounds());

        let state = self.state(ops);
        if let (Some(window), Some(edge)) = (self.tracked, state.splitter_edge()) {
            if let Some(strip) = self.geometry.anchored(state) {
                let embedded = DockGeometry::embedded_rect(strip, edge);
                ops.place_panel(&window, strip, embedded, edge);
            }
        }
        if let Some(content) = self.geometry.content_for(state) {
            hooks.apply_content_bounds(content);
        }
    }

    /// Live write-back from a splitter drag: update the dragged dimension,
    /// then re-apply so panel and content track the drag in real time.
    pub fn resize_drag(&mut self, live: Rect, ops: &mut dyn WindowOps, hooks: &mut dyn HostHooks) {
        let state = self.state(ops);
        if !state.is_docked() {
            return;
        }
        self.geometry.apply_drag(state, live);
        self.apply_layout(ops, hooks);
    }
}

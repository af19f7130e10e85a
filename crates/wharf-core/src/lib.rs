// ──────────────────────────────────────────────
// Geometry
// ──────────────────────────────────────────────

/// Axis-aligned rectangle in integer pixels.
///
/// Dock geometry lives in host client coordinates; floating rectangles for
/// undocked windows are in screen coordinates. The struct does not care.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    pub const fn bottom(&self) -> i32 {
        self.y + self.height
    }
}

// ──────────────────────────────────────────────
// Identity
// ──────────────────────────────────────────────

pub type TabId = usize;

/// Raw OS window identifier. Opaque outside the platform layer.
pub type RawWindowId = isize;

/// A window owned by another process, tracked by id + creating process.
///
/// Both values are recycled by the OS once the owner exits, so neither may be
/// trusted without revalidation; see [`WindowOps::is_alive`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExternalWindow {
    pub id: RawWindowId,
    pub pid: u32,
}

// ──────────────────────────────────────────────
// Dock state
// ──────────────────────────────────────────────

/// Where the DevTools panel sits relative to the content surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DockState {
    /// No DevTools window is known to exist.
    Unknown,
    /// The DevTools window exists and floats on its own.
    Undocked,
    DockedRight,
    DockedLeft,
    DockedBottom,
}

impl DockState {
    /// The position the toggle command advances to. Explicit transition
    /// table with a defined wraparound; `Unknown` never enters the cycle.
    pub fn cycle_next(self) -> Self {
        match self {
            Self::Unknown => Self::Unknown,
            Self::Undocked => Self::DockedRight,
            Self::DockedRight => Self::DockedLeft,
            Self::DockedLeft => Self::DockedBottom,
            Self::DockedBottom => Self::Undocked,
        }
    }

    pub fn is_docked(self) -> bool {
        matches!(self, Self::DockedRight | Self::DockedLeft | Self::DockedBottom)
    }

    /// The holder edge adjoining the content surface. This is where the
    /// splitter is painted and the only edge the user may resize from.
    pub fn splitter_edge(self) -> Option<Edge> {
        match self {
            Self::DockedRight => Some(Edge::Left),
            Self::DockedLeft => Some(Edge::Right),
            Self::DockedBottom => Some(Edge::Top),
            Self::Unknown | Self::Undocked => None,
        }
    }
}

/// An edge of the holder window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Left,
    Right,
    Top,
}

/// Fraction of the host area the CONTENT keeps when a dock position is
/// active, per axis. 1.0 means the full axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DockRatio {
    pub width: f32,
    pub height: f32,
}

impl DockRatio {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

// ──────────────────────────────────────────────
// Trait: WindowOps
// ──────────────────────────────────────────────

/// Native window operations the dock state machine drives.
///
/// One implementor exists per tab and owns at most one holder window. All
/// operations are best-effort: OS-level failures are logged by the
/// implementor and never surfaced, matching the subsystem's error model.
pub trait WindowOps {
    /// Host client area, client coordinates.
    fn host_bounds(&self) -> Rect;

    /// Liveness + identity revalidation: the id still names a live window
    /// AND that window still belongs to `window.pid`.
    fn is_alive(&self, window: &ExternalWindow) -> bool;

    /// Current on-screen rectangle of a floating window, screen coordinates.
    fn frame_rect(&self, window: &ExternalWindow) -> Option<Rect>;

    /// Create the holder window if absent. `strip` is the full panel strip
    /// (splitter band included); `edge` is the content-adjoining edge.
    fn ensure_holder(&mut self, strip: Rect, edge: Edge) -> bool;

    /// Tear the holder down. No-op if absent.
    fn destroy_holder(&mut self);

    /// Reparent `window` under the holder and strip its native chrome
    /// (caption, thick frame, system menu) so it renders as a panel.
    fn embed(&mut self, window: &ExternalWindow);

    /// Reparent `window` back to the desktop and restore its native chrome.
    fn release(&mut self, window: &ExternalWindow);

    /// Move a free-floating window, screen coordinates.
    fn move_window(&mut self, window: &ExternalWindow, rect: Rect);

    /// Position the holder strip and the embedded panel inside it for the
    /// current dock position, keeping both at the bottom of the z-order so
    /// they never occlude host chrome. `strip` is in host client
    /// coordinates, `embedded` in holder client coordinates.
    fn place_panel(&mut self, window: &ExternalWindow, strip: Rect, embedded: Rect, edge: Edge);
}

// ──────────────────────────────────────────────
// Trait: HostHooks
// ──────────────────────────────────────────────

/// The collaborator boundary: everything the docking core needs from the
/// surrounding browser shell.
pub trait HostHooks {
    /// DPI-aware height of the host's top UI bar. The layout must not
    /// overlap this strip.
    fn content_top_offset(&self) -> i32;

    /// Push the computed content rectangle to the rendering surface.
    fn apply_content_bounds(&mut self, rect: Rect);

    /// Whether another tab already tracks this window. Consulted during
    /// discovery so two tabs never dock the same DevTools instance.
    fn is_window_claimed(&self, id: RawWindowId) -> bool;

    /// Re-focus the host after a dock transition. Reparenting steals input
    /// focus as a side effect, so the shell must restore it explicitly.
    fn request_focus_restore(&mut self);

    /// Startup lifecycle signal: the tab's content surface is live.
    fn notify_tab_ready(&mut self, tab: TabId, is_active: bool);
}

// ──────────────────────────────────────────────
// Trait: HolderEvents
// ──────────────────────────────────────────────

/// Capability interface the holder window's message handling dispatches
/// into. Implemented by the holder component and registered with the
/// windowing layer; the windowing layer answers paint, frame-recalc and
/// hit-test queries from `splitter_edge`, and forwards the rest.
pub trait HolderEvents {
    /// The edge adjoining the content surface.
    fn splitter_edge(&self) -> Edge;

    /// Live rectangle (host client coordinates) while the user drags the
    /// holder's resize edge.
    fn resize_drag(&mut self, live: Rect);

    /// The holder window is being torn down. Cleanup only; no business
    /// logic may run after this fires.
    fn destroyed(&mut self);
}

// ──────────────────────────────────────────────
// Trait: DevToolsScan
// ──────────────────────────────────────────────

/// Locates the DevTools window among the windows of this process's direct
/// children. `claimed` lists window ids already owned by other tabs; the
/// scan must skip them. Runs on a background thread, so implementors hold
/// no window handles.
pub trait DevToolsScan: Send + Sync {
    fn scan(&self, claimed: &[RawWindowId]) -> Option<ExternalWindow>;
}

use std::collections::HashMap;

use wharf_core::{DockRatio, DockState, Edge, Rect};

// ──────────────────────────────────────────────
// Layout constants
// ──────────────────────────────────────────────

/// Width of the splitter band, in pixels. The band lives inside the panel
/// strip on the content-adjoining edge; the embedded DevTools window is
/// inset by this much so its visible edge never overlaps the splitter.
pub const SPLITTER_THICKNESS: i32 = 4;

/// Smallest panel dimension a drag may produce.
pub const MIN_PANEL_PX: i32 = 96;

/// Content share of the host per dock position (width, height).
/// DockedRight keeps 70% of the width for content; the panel gets the rest.
const RATIOS: &[(DockState, DockRatio)] = &[
    (DockState::DockedRight, DockRatio::new(0.7, 1.0)),
    (DockState::DockedLeft, DockRatio::new(0.7, 1.0)),
    (DockState::DockedBottom, DockRatio::new(1.0, 0.7)),
];

fn ratio_for(state: DockState) -> Option<DockRatio> {
    RATIOS.iter().find(|(s, _)| *s == state).map(|(_, r)| *r)
}

fn round(v: f32) -> i32 {
    v.round() as i32
}

// ──────────────────────────────────────────────
// DockGeometry
// ──────────────────────────────────────────────

/// Per-position panel rectangles plus the host bounds they are laid out in.
///
/// The table is per tab instance, never shared: each tracked DevTools window
/// gets its own geometry. Docked entries are the panel strip (splitter band
/// included) in host client coordinates; the `Undocked` entry, when present,
/// is the floating screen rectangle captured just before the first dock.
pub struct DockGeometry {
    top_offset: i32,
    host: Option<Rect>,
    rects: HashMap<DockState, Rect>,
}

impl DockGeometry {
    pub fn new(top_offset: i32) -> Self {
        Self {
            top_offset,
            host: None,
            rects: HashMap::new(),
        }
    }

    /// Update the reserved top strip (DPI changes move it).
    pub fn set_top_offset(&mut self, px: i32) {
        self.top_offset = px;
    }

    /// Track new host bounds without touching stored rectangles.
    pub fn set_host(&mut self, host: Rect) {
        self.host = Some(host);
    }

    /// Populate the three docked rectangles from the ratio table. Idempotent:
    /// once the table is populated, further calls only refresh the host
    /// bounds, so user drag adjustments survive incidental resize events.
    pub fn compute_defaults(&mut self, host: Rect) {
        self.host = Some(host);
        if RATIOS.iter().any(|(s, _)| self.rects.contains_key(s)) {
            return;
        }

        let area_h = (host.height - self.top_offset).max(0);
        for &(state, ratio) in RATIOS {
            let rect = match state {
                DockState::DockedRight => {
                    let w = round(host.width as f32 * (1.0 - ratio.width));
                    let h = round(area_h as f32 * ratio.height);
                    Rect::new(host.right() - w, host.y + self.top_offset, w, h)
                }
                DockState::DockedLeft => {
                    let w = round(host.width as f32 * (1.0 - ratio.width));
                    let h = round(area_h as f32 * ratio.height);
                    Rect::new(host.x, host.y + self.top_offset, w, h)
                }
                DockState::DockedBottom => {
                    let w = round(host.width as f32 * ratio.width);
                    let h = round(area_h as f32 * (1.0 - ratio.height));
                    Rect::new(host.x, host.bottom() - h, w, h)
                }
                DockState::Unknown | DockState::Undocked => continue,
            };
            self.rects.insert(state, rect);
        }
    }

    /// Write a live resize-drag rectangle back into the table. Only the
    /// dimension perpendicular to the splitter is user-adjustable; the other
    /// axis keeps tracking the host. No other position's geometry changes.
    pub fn apply_drag(&mut self, state: DockState, live: Rect) {
        let Some(edge) = state.splitter_edge() else { return };
        let max = self.host.map(|h| match edge {
            Edge::Left | Edge::Right => h.width - MIN_PANEL_PX,
            Edge::Top => h.height - self.top_offset - MIN_PANEL_PX,
        });
        let Some(rect) = self.rects.get_mut(&state) else { return };
        let clamp = |v: i32| {
            let v = v.max(MIN_PANEL_PX);
            max.map_or(v, |m| v.min(m.max(MIN_PANEL_PX)))
        };
        match edge {
            Edge::Left | Edge::Right => rect.width = clamp(live.width),
            Edge::Top => rect.height = clamp(live.height),
        }
    }

    /// Stored rectangle for a position, if the table has been populated.
    pub fn rect_for(&self, state: DockState) -> Option<Rect> {
        self.rects.get(&state).copied()
    }

    /// The stored panel strip re-anchored to its edge within the current
    /// host bounds. The draggable dimension is preserved exactly; the other
    /// axis stretches with the host.
    pub fn anchored(&self, state: DockState) -> Option<Rect> {
        let host = self.host?;
        let stored = self.rects.get(&state)?;
        let area_h = (host.height - self.top_offset).max(0);
        let rect = match state {
            DockState::DockedRight => Rect::new(
                host.right() - stored.width,
                host.y + self.top_offset,
                stored.width,
                area_h,
            ),
            DockState::DockedLeft => {
                Rect::new(host.x, host.y + self.top_offset, stored.width, area_h)
            }
            DockState::DockedBottom => Rect::new(
                host.x,
                host.bottom() - stored.height,
                host.width,
                stored.height,
            ),
            DockState::Unknown | DockState::Undocked => return None,
        };
        Some(rect)
    }

    /// The content rectangle for a state: the host minus the top UI strip,
    /// minus the panel strip when docked.
    pub fn content_for(&self, state: DockState) -> Option<Rect> {
        let host = self.host?;
        let full = Rect::new(
            host.x,
            host.y + self.top_offset,
            host.width,
            (host.height - self.top_offset).max(0),
        );
        if !state.is_docked() {
            return Some(full);
        }
        let strip = self.anchored(state)?;
        let rect = match state {
            DockState::DockedRight => {
                Rect::new(full.x, full.y, full.width - strip.width, full.height)
            }
            DockState::DockedLeft => Rect::new(
                full.x + strip.width,
                full.y,
                full.width - strip.width,
                full.height,
            ),
            DockState::DockedBottom => {
                Rect::new(full.x, full.y, full.width, full.height - strip.height)
            }
            DockState::Unknown | DockState::Undocked => full,
        };
        Some(rect)
    }

    /// Where the embedded DevTools window sits inside the holder strip
    /// (holder client coordinates): the strip minus the splitter band.
    pub fn embedded_rect(strip: Rect, edge: Edge) -> Rect {
        match edge {
            Edge::Left => Rect::new(
                SPLITTER_THICKNESS,
                0,
                strip.width - SPLITTER_THICKNESS,
                strip.height,
            ),
            Edge::Right => Rect::new(0, 0, strip.width - SPLITTER_THICKNESS, strip.height),
            Edge::Top => Rect::new(
                0,
                SPLITTER_THICKNESS,
                strip.width,
                strip.height - SPLITTER_THICKNESS,
            ),
        }
    }

    /// Remember the floating rectangle for a later undock.
    pub fn capture_floating(&mut self, rect: Rect) {
        self.rects.insert(DockState::Undocked, rect);
    }

    /// Consume the captured floating rectangle. It is recomputed fresh on
    /// the next dock.
    pub fn take_floating(&mut self) -> Option<Rect> {
        self.rects.remove(&DockState::Undocked)
    }

    /// Drop everything tied to the tracked window (the floating capture);
    /// docked defaults stay so a rediscovered window keeps its layout.
    pub fn forget_window(&mut self) {
        self.rects.remove(&DockState::Undocked);
    }

    pub fn host(&self) -> Option<Rect> {
        self.host
    }

    pub fn top_offset(&self) -> i32 {
        self.top_offset
    }
}

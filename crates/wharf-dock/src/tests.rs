#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use wharf_core::{
        DockState, Edge, ExternalWindow, HostHooks, RawWindowId, Rect, TabId, WindowOps,
    };

    use crate::{DockGeometry, DockSession, MIN_PANEL_PX, SPLITTER_THICKNESS};

    const HOST: Rect = Rect { x: 0, y: 0, width: 1000, height: 800 };
    const TOP: i32 = 40;
    const DEVTOOLS: ExternalWindow = ExternalWindow { id: 0x5100, pid: 4242 };
    const FLOATING: Rect = Rect { x: 120, y: 90, width: 640, height: 480 };

    // ──────────────────────────────────────────
    // Fakes
    // ──────────────────────────────────────────

    struct FakeOps {
        host: Rect,
        /// Live windows: id → owning pid.
        windows: HashMap<RawWindowId, u32>,
        frames: HashMap<RawWindowId, Rect>,
        holder: bool,
        embedded: Option<RawWindowId>,
        placements: Vec<(Rect, Rect, Edge)>,
        moves: Vec<(RawWindowId, Rect)>,
    }

    impl FakeOps {
        fn with_devtools() -> Self {
            let mut ops = Self {
                host: HOST,
                windows: HashMap::new(),
                frames: HashMap::new(),
                holder: false,
                embedded: None,
                placements: Vec::new(),
                moves: Vec::new(),
            };
            ops.windows.insert(DEVTOOLS.id, DEVTOOLS.pid);
            ops.frames.insert(DEVTOOLS.id, FLOATING);
            ops
        }

        fn close_devtools(&mut self) {
            self.windows.remove(&DEVTOOLS.id);
            self.frames.remove(&DEVTOOLS.id);
        }
    }

    impl WindowOps for FakeOps {
        fn host_bounds(&self) -> Rect {
            self.host
        }

        fn is_alive(&self, window: &ExternalWindow) -> bool {
            self.windows.get(&window.id) == Some(&window.pid)
        }

        fn frame_rect(&self, window: &ExternalWindow) -> Option<Rect> {
            self.frames.get(&window.id).copied()
        }

        fn ensure_holder(&mut self, _strip: Rect, _edge: Edge) -> bool {
            self.holder = true;
            true
        }

        fn destroy_holder(&mut self) {
            self.holder = false;
        }

        fn embed(&mut self, window: &ExternalWindow) {
            self.embedded = Some(window.id);
        }

        fn release(&mut self, window: &ExternalWindow) {
            if self.embedded == Some(window.id) {
                self.embedded = None;
            }
        }

        fn move_window(&mut self, window: &ExternalWindow, rect: Rect) {
            self.frames.insert(window.id, rect);
            self.moves.push((window.id, rect));
        }

        fn place_panel(&mut self, _window: &ExternalWindow, strip: Rect, embedded: Rect, edge: Edge) {
            self.placements.push((strip, embedded, edge));
        }
    }

    struct FakeHooks {
        top: i32,
        content: Option<Rect>,
        focus_restores: usize,
    }

    impl FakeHooks {
        fn new() -> Self {
            Self {
                top: TOP,
                content: None,
                focus_restores: 0,
            }
        }
    }

    impl HostHooks for FakeHooks {
        fn content_top_offset(&self) -> i32 {
            self.top
        }

        fn apply_content_bounds(&mut self, rect: Rect) {
            self.content = Some(rect);
        }

        fn is_window_claimed(&self, _id: RawWindowId) -> bool {
            false
        }

        fn request_focus_restore(&mut self) {
            self.focus_restores += 1;
        }

        fn notify_tab_ready(&mut self, _tab: TabId, _is_active: bool) {}
    }

    fn adopted_session() -> DockSession {
        let mut session = DockSession::new(TOP);
        session.adopt(DEVTOOLS);
        session
    }

    // ──────────────────────────────────────────
    // Toggle cycle
    // ──────────────────────────────────────────

    #[test]
    fn test_toggle_cycles_through_positions() {
        let mut ops = FakeOps::with_devtools();
        let mut hooks = FakeHooks::new();
        let mut session = adopted_session();

        let expected = [
            DockState::DockedRight,
            DockState::DockedLeft,
            DockState::DockedBottom,
            DockState::Undocked,
            DockState::DockedRight,
        ];
        for want in expected {
            session.toggle(&mut ops, &mut hooks);
            assert_eq!(session.state(&mut ops), want);
        }
    }

    #[test]
    fn test_toggle_without_window_is_noop() {
        let mut ops = FakeOps::with_devtools();
        let mut hooks = FakeHooks::new();
        let mut session = DockSession::new(TOP);

        session.toggle(&mut ops, &mut hooks);
        assert_eq!(session.state(&mut ops), DockState::Unknown);
        assert!(!ops.holder);
        assert_eq!(hooks.focus_restores, 0);
    }

    // ──────────────────────────────────────────
    // Liveness revalidation
    // ──────────────────────────────────────────

    #[test]
    fn test_state_resets_to_unknown_when_window_dies() {
        let mut ops = FakeOps::with_devtools();
        let mut hooks = FakeHooks::new();
        let mut session = adopted_session();

        session.dock(DockState::DockedRight, &mut ops, &mut hooks);
        assert_eq!(session.state(&mut ops), DockState::DockedRight);

        ops.close_devtools();
        assert_eq!(session.state(&mut ops), DockState::Unknown);
        // The holder only exists while docked.
        assert!(!ops.holder);
    }

    #[test]
    fn test_recycled_pid_counts_as_dead() {
        let mut ops = FakeOps::with_devtools();
        let mut hooks = FakeHooks::new();
        let mut session = adopted_session();

        session.dock(DockState::DockedLeft, &mut ops, &mut hooks);
        // Same window id, now owned by a different process.
        ops.windows.insert(DEVTOOLS.id, DEVTOOLS.pid + 1);
        assert_eq!(session.state(&mut ops), DockState::Unknown);
    }

    // ──────────────────────────────────────────
    // Default geometry
    // ──────────────────────────────────────────

    #[test]
    fn test_default_rects_match_ratio_table() {
        let mut geo = DockGeometry::new(TOP);
        geo.compute_defaults(HOST);

        assert_eq!(
            geo.anchored(DockState::DockedRight),
            Some(Rect::new(700, 40, 300, 760))
        );
        assert_eq!(
            geo.content_for(DockState::DockedRight),
            Some(Rect::new(0, 40, 700, 760))
        );

        assert_eq!(
            geo.anchored(DockState::DockedLeft),
            Some(Rect::new(0, 40, 300, 760))
        );
        assert_eq!(
            geo.content_for(DockState::DockedLeft),
            Some(Rect::new(300, 40, 700, 760))
        );

        // 70% of the 760px work area stays content, the rest is panel.
        assert_eq!(
            geo.anchored(DockState::DockedBottom),
            Some(Rect::new(0, 572, 1000, 228))
        );
        assert_eq!(
            geo.content_for(DockState::DockedBottom),
            Some(Rect::new(0, 40, 1000, 532))
        );
    }

    #[test]
    fn test_compute_defaults_is_idempotent() {
        let mut geo = DockGeometry::new(TOP);
        geo.compute_defaults(HOST);

        let dragged = Rect::new(550, 40, 450, 760);
        geo.apply_drag(DockState::DockedRight, dragged);
        let adjusted = geo.rect_for(DockState::DockedRight);

        geo.compute_defaults(HOST);
        assert_eq!(geo.rect_for(DockState::DockedRight), adjusted);
    }

    // ──────────────────────────────────────────
    // Drag write-back
    // ──────────────────────────────────────────

    #[test]
    fn test_apply_drag_touches_only_target_state() {
        let mut geo = DockGeometry::new(TOP);
        geo.compute_defaults(HOST);

        let left_before = geo.rect_for(DockState::DockedLeft);
        let bottom_before = geo.rect_for(DockState::DockedBottom);

        geo.apply_drag(DockState::DockedRight, Rect::new(500, 40, 500, 760));
        assert_eq!(geo.rect_for(DockState::DockedRight).map(|r| r.width), Some(500));
        assert_eq!(geo.rect_for(DockState::DockedLeft), left_before);
        assert_eq!(geo.rect_for(DockState::DockedBottom), bottom_before);
    }

    #[test]
    fn test_apply_drag_clamps_to_minimum() {
        let mut geo = DockGeometry::new(TOP);
        geo.compute_defaults(HOST);

        geo.apply_drag(DockState::DockedRight, Rect::new(990, 40, 10, 760));
        assert_eq!(
            geo.rect_for(DockState::DockedRight).map(|r| r.width),
            Some(MIN_PANEL_PX)
        );
    }

    #[test]
    fn test_anchoring_survives_host_resize() {
        let mut geo = DockGeometry::new(TOP);
        geo.compute_defaults(HOST);
        geo.apply_drag(DockState::DockedRight, Rect::new(550, 40, 450, 760));

        geo.set_host(Rect::new(0, 0, 1400, 900));
        let strip = geo.anchored(DockState::DockedRight).unwrap();
        // Dragged width is preserved; origin and height follow the host.
        assert_eq!(strip, Rect::new(950, 40, 450, 860));
    }

    #[test]
    fn test_embedded_rect_is_inset_by_splitter() {
        let strip = Rect::new(700, 40, 300, 760);
        assert_eq!(
            DockGeometry::embedded_rect(strip, Edge::Left),
            Rect::new(SPLITTER_THICKNESS, 0, 300 - SPLITTER_THICKNESS, 760)
        );
        assert_eq!(
            DockGeometry::embedded_rect(strip, Edge::Top),
            Rect::new(0, SPLITTER_THICKNESS, 300, 760 - SPLITTER_THICKNESS)
        );
    }

    // ──────────────────────────────────────────
    // Dock / undock round trip
    // ──────────────────────────────────────────

    #[test]
    fn test_undock_restores_captured_floating_rect() {
        let mut ops = FakeOps::with_devtools();
        let mut hooks = FakeHooks::new();
        let mut session = adopted_session();

        session.dock(DockState::DockedRight, &mut ops, &mut hooks);
        // Cycle through another position before undocking; the capture is
        // from the original floating rect, not recreated per transition.
        session.dock(DockState::DockedBottom, &mut ops, &mut hooks);
        session.dock(DockState::Undocked, &mut ops, &mut hooks);

        assert_eq!(ops.moves, vec![(DEVTOOLS.id, FLOATING)]);
        // The capture is discarded on undock.
        assert_eq!(session.geometry().rect_for(DockState::Undocked), None);
    }

    #[test]
    fn test_holder_exists_iff_docked() {
        let mut ops = FakeOps::with_devtools();
        let mut hooks = FakeHooks::new();
        let mut session = adopted_session();

        assert!(!ops.holder);
        session.dock(DockState::DockedRight, &mut ops, &mut hooks);
        assert!(ops.holder);
        session.dock(DockState::DockedLeft, &mut ops, &mut hooks);
        assert!(ops.holder);
        session.dock(DockState::Undocked, &mut ops, &mut hooks);
        assert!(!ops.holder);
    }

    #[test]
    fn test_dock_reparents_and_releases() {
        let mut ops = FakeOps::with_devtools();
        let mut hooks = FakeHooks::new();
        let mut session = adopted_session();

        session.dock(DockState::DockedBottom, &mut ops, &mut hooks);
        assert_eq!(ops.embedded, Some(DEVTOOLS.id));
        session.dock(DockState::Undocked, &mut ops, &mut hooks);
        assert_eq!(ops.embedded, None);
    }

    // ──────────────────────────────────────────
    // Layout application
    // ──────────────────────────────────────────

    #[test]
    fn test_dock_pushes_content_bounds_and_panel_placement() {
        let mut ops = FakeOps::with_devtools();
        let mut hooks = FakeHooks::new();
        let mut session = adopted_session();

        session.dock(DockState::DockedRight, &mut ops, &mut hooks);

        assert_eq!(hooks.content, Some(Rect::new(0, 40, 700, 760)));
        let (strip, embedded, edge) = *ops.placements.last().unwrap();
        assert_eq!(strip, Rect::new(700, 40, 300, 760));
        assert_eq!(edge, Edge::Left);
        assert_eq!(embedded.x, SPLITTER_THICKNESS);
        assert_eq!(embedded.width, 300 - SPLITTER_THICKNESS);
    }

    #[test]
    fn test_resize_drag_tracks_panel_and_content() {
        let mut ops = FakeOps::with_devtools();
        let mut hooks = FakeHooks::new();
        let mut session = adopted_session();

        session.dock(DockState::DockedRight, &mut ops, &mut hooks);
        session.resize_drag(Rect::new(600, 40, 400, 760), &mut ops, &mut hooks);

        let (strip, _, _) = *ops.placements.last().unwrap();
        assert_eq!(strip, Rect::new(600, 40, 400, 760));
        assert_eq!(hooks.content, Some(Rect::new(0, 40, 600, 760)));
    }

    #[test]
    fn test_resize_drag_ignored_while_undocked() {
        let mut ops = FakeOps::with_devtools();
        let mut hooks = FakeHooks::new();
        let mut session = adopted_session();

        let placements = ops.placements.len();
        session.resize_drag(Rect::new(600, 40, 400, 760), &mut ops, &mut hooks);
        assert_eq!(ops.placements.len(), placements);
    }

    #[test]
    fn test_every_transition_requests_focus_restore() {
        let mut ops = FakeOps::with_devtools();
        let mut hooks = FakeHooks::new();
        let mut session = adopted_session();

        session.dock(DockState::DockedRight, &mut ops, &mut hooks);
        session.dock(DockState::Undocked, &mut ops, &mut hooks);
        assert_eq!(hooks.focus_restores, 2);
    }
}

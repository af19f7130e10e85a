//! The `WindowOps` implementation the dock state machine drives: liveness
//! checks, reparenting, chrome stripping, and panel placement.

use std::cell::RefCell;
use std::rc::Rc;

use windows::Win32::Foundation::{HWND, RECT};
use windows::Win32::UI::WindowsAndMessaging::{
    GetClientRect, GetWindowLongW, GetWindowRect, GetWindowThreadProcessId, InvalidateRect,
    IsWindow, MoveWindow, SetParent, SetWindowLongW, SetWindowPos, GWL_STYLE, HWND_BOTTOM,
    SWP_FRAMECHANGED, SWP_NOACTIVATE, SWP_NOMOVE, SWP_NOSIZE, SWP_NOZORDER, WS_CAPTION,
    WS_MAXIMIZEBOX, WS_MINIMIZEBOX, WS_SYSMENU, WS_THICKFRAME,
};

use wharf_core::{Edge, ExternalWindow, Rect, WindowOps};

use crate::EventCallback;

use super::holder::HolderWindow;
use super::window::HostWindow;
use super::{hwnd_from_id, rect_from_win32};

/// Chrome stripped from the DevTools window while embedded and restored on
/// undock, so it renders as a panel rather than a top-level window.
const CHROME_STYLES: u32 =
    WS_CAPTION.0 | WS_SYSMENU.0 | WS_MINIMIZEBOX.0 | WS_MAXIMIZEBOX.0 | WS_THICKFRAME.0;

/// Per-tab window operations. Owns at most one holder window; all calls are
/// best-effort; OS failures are logged and the dock engine proceeds.
pub struct Win32WindowOps {
    host: HWND,
    callback: Rc<RefCell<EventCallback>>,
    holder: Option<HolderWindow>,
    splitter: i32,
}

impl Win32WindowOps {
    pub fn new(host: &HostWindow, splitter: i32) -> Self {
        Self {
            host: host.hwnd(),
            callback: host.callback(),
            holder: None,
            splitter,
        }
    }
}

impl WindowOps for Win32WindowOps {
    fn host_bounds(&self) -> Rect {
        let mut rc = RECT::default();
        unsafe {
            let _ = GetClientRect(self.host, &mut rc);
        }
        rect_from_win32(rc)
    }

    fn is_alive(&self, window: &ExternalWindow) -> bool {
        // Both the HWND and the pid are recycled by the OS, so require the
        // pair to still match before trusting either.
        let hwnd = hwnd_from_id(window.id);
        if !unsafe { IsWindow(Some(hwnd)) }.as_bool() {
            return false;
        }
        let mut pid = 0u32;
        unsafe { GetWindowThreadProcessId(hwnd, Some(&mut pid)) };
        pid == window.pid
    }

    fn frame_rect(&self, window: &ExternalWindow) -> Option<Rect> {
        let mut rc = RECT::default();
        unsafe { GetWindowRect(hwnd_from_id(window.id), &mut rc) }.ok()?;
        Some(rect_from_win32(rc))
    }

    fn ensure_holder(&mut self, strip: Rect, edge: Edge) -> bool {
        match &self.holder {
            Some(holder) => holder.set_edge(edge),
            None => {
                self.holder = HolderWindow::create(
                    self.host,
                    strip,
                    edge,
                    Rc::clone(&self.callback),
                    self.splitter,
                );
            }
        }
        self.holder.is_some()
    }

    fn destroy_holder(&mut self) {
        if let Some(holder) = self.holder.take() {
            holder.destroy();
        }
    }

    fn embed(&mut self, window: &ExternalWindow) {
        let Some(holder) = &self.holder else {
            log::warn!("embed without a holder window");
            return;
        };
        let hwnd = hwnd_from_id(window.id);
        unsafe {
            if let Err(e) = SetParent(hwnd, Some(holder.hwnd())) {
                log::warn!("reparent into holder failed: {e}");
            }
            let style = GetWindowLongW(hwnd, GWL_STYLE) as u32 & !CHROME_STYLES;
            SetWindowLongW(hwnd, GWL_STYLE, style as i32);
            let _ = SetWindowPos(
                hwnd,
                Some(HWND_BOTTOM),
                0,
                0,
                0,
                0,
                SWP_NOMOVE | SWP_NOSIZE | SWP_FRAMECHANGED | SWP_NOACTIVATE,
            );
        }
    }

    fn release(&mut self, window: &ExternalWindow) {
        let hwnd = hwnd_from_id(window.id);
        unsafe {
            if let Err(e) = SetParent(hwnd, None) {
                log::warn!("reparent to desktop failed: {e}");
            }
            let style = GetWindowLongW(hwnd, GWL_STYLE) as u32 | CHROME_STYLES;
            SetWindowLongW(hwnd, GWL_STYLE, style as i32);
            let _ = SetWindowPos(
                hwnd,
                None,
                0,
                0,
                0,
                0,
                SWP_NOMOVE | SWP_NOSIZE | SWP_FRAMECHANGED | SWP_NOZORDER | SWP_NOACTIVATE,
            );
        }
    }

    fn move_window(&mut self, window: &ExternalWindow, rect: Rect) {
        unsafe {
            if let Err(e) = MoveWindow(
                hwnd_from_id(window.id),
                rect.x,
                rect.y,
                rect.width,
                rect.height,
                true,
            ) {
                log::warn!("move window failed: {e}");
            }
        }
    }

    // Placement can run inside live drag dispatch while the forwarder is
    // borrowed; edge updates happen in ensure_holder only.
    fn place_panel(&mut self, window: &ExternalWindow, strip: Rect, embedded: Rect, _edge: Edge) {
        let Some(holder) = &self.holder else { return };
        let hwnd = hwnd_from_id(window.id);
        unsafe {
            // Bottom of the z-order: the panel stays under the holder and
            // the holder under its host siblings.
            let _ = SetWindowPos(
                holder.hwnd(),
                Some(HWND_BOTTOM),
                strip.x,
                strip.y,
                strip.width,
                strip.height,
                SWP_NOACTIVATE,
            );
            let _ = SetWindowPos(
                hwnd,
                Some(HWND_BOTTOM),
                embedded.x,
                embedded.y,
                embedded.width,
                embedded.height,
                SWP_NOACTIVATE,
            );
            let _ = InvalidateRect(Some(holder.hwnd()), None, true);
        }
    }
}

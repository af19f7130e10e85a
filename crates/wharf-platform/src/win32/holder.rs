//! DevTools holder window: the intermediary container that exists only
//! while docked. It hosts the reparented DevTools window, paints the
//! splitter band, and restricts resizing to the content-adjoining edge.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;

use windows::core::{w, PCWSTR};
use windows::Win32::Foundation::{COLORREF, HWND, LPARAM, LRESULT, POINT, RECT, WPARAM};
use windows::Win32::Graphics::Gdi::{
    BeginPaint, CreateSolidBrush, DeleteObject, EndPaint, FillRect, HBRUSH, PAINTSTRUCT,
    ScreenToClient,
};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DestroyWindow, GetClientRect, GetWindowRect, LoadCursorW,
    RegisterClassW, SetWindowLongPtrW, CREATESTRUCTW, CS_HREDRAW, CS_VREDRAW, GWLP_USERDATA,
    HTCLIENT, HTLEFT, HTRIGHT, HTTOP, IDC_ARROW, WINDOW_EX_STYLE, WM_DESTROY, WM_NCCALCSIZE,
    WM_NCCREATE, WM_NCHITTEST, WM_PAINT, WM_SIZING, WNDCLASSW, WS_CHILD, WS_CLIPCHILDREN,
    WS_CLIPSIBLINGS, WS_THICKFRAME, WS_VISIBLE,
};

use wharf_core::{Edge, HolderEvents, Rect};

use crate::{EventCallback, PlatformEvent};

use super::window_long_ptr;

const SPLITTER_COLOR: COLORREF = COLORREF(0x00303030);

static HOLDER_CLASS: Once = Once::new();
const HOLDER_CLASS_NAME: PCWSTR = w!("WharfDockHolder");

// ──────────────────────────────────────────────
// HolderEvents implementor
// ──────────────────────────────────────────────

/// The registered [`HolderEvents`] implementor. Paint, frame-recalc and
/// hit-test are answered from `splitter_edge`; resize drags forward into
/// the host event stream on the UI thread.
pub(crate) struct HolderForwarder {
    callback: Rc<RefCell<EventCallback>>,
    edge: Edge,
}

impl HolderEvents for HolderForwarder {
    fn splitter_edge(&self) -> Edge {
        self.edge
    }

    fn resize_drag(&mut self, live: Rect) {
        match self.callback.try_borrow_mut() {
            Ok(mut cb) => cb(PlatformEvent::HolderResizeDrag { rect: live }),
            Err(_) => log::trace!("re-entrant holder drag dropped"),
        }
    }

    fn destroyed(&mut self) {}
}

/// Per-window state stashed in `GWLP_USERDATA`. Freed in `WM_DESTROY`;
/// nothing runs against it afterwards.
struct HolderState {
    events: Rc<RefCell<dyn HolderEvents>>,
    host: HWND,
    splitter: i32,
}

// ──────────────────────────────────────────────
// HolderWindow
// ──────────────────────────────────────────────

pub(crate) struct HolderWindow {
    hwnd: HWND,
    forwarder: Rc<RefCell<HolderForwarder>>,
}

impl HolderWindow {
    pub(crate) fn create(
        host: HWND,
        strip: Rect,
        edge: Edge,
        callback: Rc<RefCell<EventCallback>>,
        splitter: i32,
    ) -> Option<Self> {
        unsafe {
            let instance = match GetModuleHandleW(None) {
                Ok(i) => i,
                Err(e) => {
                    log::warn!("holder: GetModuleHandleW failed: {e}");
                    return None;
                }
            };
            HOLDER_CLASS.call_once(|| unsafe {
                let wc = WNDCLASSW {
                    style: CS_HREDRAW | CS_VREDRAW,
                    lpfnWndProc: Some(holder_wndproc),
                    hInstance: instance.into(),
                    lpszClassName: HOLDER_CLASS_NAME,
                    hCursor: LoadCursorW(None, IDC_ARROW).unwrap_or_default(),
                    hbrBackground: HBRUSH(std::ptr::null_mut()),
                    ..Default::default()
                };
                RegisterClassW(&wc);
            });

            let forwarder = Rc::new(RefCell::new(HolderForwarder { callback, edge }));
            let state = Box::new(HolderState {
                events: Rc::clone(&forwarder) as Rc<RefCell<dyn HolderEvents>>,
                host,
                splitter,
            });
            let hwnd = match CreateWindowExW(
                WINDOW_EX_STYLE::default(),
                HOLDER_CLASS_NAME,
                w!("DevTools"),
                WS_CHILD | WS_CLIPCHILDREN | WS_CLIPSIBLINGS | WS_THICKFRAME | WS_VISIBLE,
                strip.x,
                strip.y,
                strip.width,
                strip.height,
                Some(host),
                None,
                Some(instance.into()),
                Some(Box::into_raw(state) as *const core::ffi::c_void),
            ) {
                Ok(hwnd) => hwnd,
                Err(e) => {
                    log::warn!("holder window creation failed: {e}");
                    return None;
                }
            };

            Some(Self { hwnd, forwarder })
        }
    }

    pub(crate) fn hwnd(&self) -> HWND {
        self.hwnd
    }

    /// Point the splitter at a new edge after a dock position change.
    pub(crate) fn set_edge(&self, edge: Edge) {
        self.forwarder.borrow_mut().edge = edge;
    }

    pub(crate) fn destroy(self) {
        unsafe {
            let _ = DestroyWindow(self.hwnd);
        }
    }
}

// ──────────────────────────────────────────────
// Window procedure
// ──────────────────────────────────────────────

unsafe extern "system" fn holder_wndproc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    if msg == WM_NCCREATE {
        let create = &*(lparam.0 as *const CREATESTRUCTW);
        SetWindowLongPtrW(hwnd, GWLP_USERDATA, create.lpCreateParams as isize);
        return DefWindowProcW(hwnd, msg, wparam, lparam);
    }

    let state_ptr = window_long_ptr(hwnd) as *mut HolderState;
    if state_ptr.is_null() {
        return DefWindowProcW(hwnd, msg, wparam, lparam);
    }

    match msg {
        // Client area spans the whole window: the thick-frame chrome is
        // removed while its resize behavior stays.
        WM_NCCALCSIZE => LRESULT(0),

        WM_NCHITTEST => hit_test(hwnd, &*state_ptr, lparam),

        WM_PAINT => {
            paint_splitter(hwnd, &*state_ptr);
            LRESULT(0)
        }

        WM_SIZING => {
            let state = &*state_ptr;
            // The modal size loop reports the proposed rect in screen
            // coordinates; the dock engine works in host client coords.
            let live = screen_to_host(state.host, *(lparam.0 as *const RECT));
            if let Ok(mut events) = state.events.try_borrow_mut() {
                events.resize_drag(live);
            }
            LRESULT(1)
        }

        WM_DESTROY => {
            SetWindowLongPtrW(hwnd, GWLP_USERDATA, 0);
            let state = Box::from_raw(state_ptr);
            // Teardown can arrive from inside an event dispatch that holds
            // the forwarder; destroyed() is cleanup-only either way.
            if let Ok(mut events) = state.events.try_borrow_mut() {
                events.destroyed();
            }
            LRESULT(0)
        }

        _ => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}

/// Only the edge adjoining the content surface may be grabbed for resize;
/// every other spot is plain client area.
unsafe fn hit_test(hwnd: HWND, state: &HolderState, lparam: LPARAM) -> LRESULT {
    let x = (lparam.0 & 0xFFFF) as i16 as i32;
    let y = ((lparam.0 >> 16) & 0xFFFF) as i16 as i32;
    let mut rc = RECT::default();
    let _ = GetWindowRect(hwnd, &mut rc);

    let grip = state.splitter.max(6);
    let Ok(events) = state.events.try_borrow() else {
        return LRESULT(HTCLIENT as isize);
    };
    let hit = match events.splitter_edge() {
        Edge::Left if x - rc.left <= grip => HTLEFT,
        Edge::Right if rc.right - x <= grip => HTRIGHT,
        Edge::Top if y - rc.top <= grip => HTTOP,
        _ => HTCLIENT,
    };
    LRESULT(hit as isize)
}

unsafe fn paint_splitter(hwnd: HWND, state: &HolderState) {
    let mut ps = PAINTSTRUCT::default();
    let hdc = BeginPaint(hwnd, &mut ps);

    let mut client = RECT::default();
    let _ = GetClientRect(hwnd, &mut client);
    let Ok(events) = state.events.try_borrow() else {
        let _ = EndPaint(hwnd, &ps);
        return;
    };
    let band = match events.splitter_edge() {
        Edge::Left => RECT {
            left: 0,
            top: 0,
            right: state.splitter,
            bottom: client.bottom,
        },
        Edge::Right => RECT {
            left: client.right - state.splitter,
            top: 0,
            right: client.right,
            bottom: client.bottom,
        },
        Edge::Top => RECT {
            left: 0,
            top: 0,
            right: client.right,
            bottom: state.splitter,
        },
    };
    let brush = CreateSolidBrush(SPLITTER_COLOR);
    FillRect(hdc, &band, brush);
    let _ = DeleteObject(brush.into());

    let _ = EndPaint(hwnd, &ps);
}

unsafe fn screen_to_host(host: HWND, rc: RECT) -> Rect {
    let mut tl = POINT { x: rc.left, y: rc.top };
    let mut br = POINT {
        x: rc.right,
        y: rc.bottom,
    };
    let _ = ScreenToClient(host, &mut tl);
    let _ = ScreenToClient(host, &mut br);
    Rect::new(tl.x, tl.y, br.x - tl.x, br.y - tl.y)
}

//! Host window backed by a registered Win32 window class.
//!
//! The window owns the shared [`EventCallback`]; the holder window and the
//! wake path post into the same callback, so the app sees one event stream
//! on the UI thread.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;

use raw_window_handle::{
    DisplayHandle, HandleError, HasDisplayHandle, HasWindowHandle, RawDisplayHandle,
    RawWindowHandle, Win32WindowHandle, WindowHandle, WindowsDisplayHandle,
};
use windows::core::{w, PCWSTR};
use windows::Win32::Foundation::{COLORREF, HWND, LPARAM, LRESULT, RECT, WPARAM};
use windows::Win32::Graphics::Gdi::{
    BeginPaint, CreateSolidBrush, DeleteObject, EndPaint, FillRect, HBRUSH, PAINTSTRUCT,
};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::HiDpi::GetDpiForWindow;
use windows::Win32::UI::Input::KeyboardAndMouse::{GetKeyState, SetFocus, VK_CONTROL, VK_SHIFT};
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DestroyWindow, DispatchMessageW, GetClientRect, GetMessageW,
    LoadCursorW, PostMessageW, PostQuitMessage, RegisterClassW, SetWindowLongPtrW, SetWindowPos,
    ShowWindow, TranslateMessage, CREATESTRUCTW, CS_HREDRAW, CS_VREDRAW, CW_USEDEFAULT,
    GWLP_USERDATA, IDC_ARROW, MSG, SWP_NOACTIVATE, SWP_NOZORDER, SW_SHOW, WINDOW_EX_STYLE,
    WM_CLOSE, WM_DESTROY, WM_DPICHANGED, WM_KEYDOWN, WM_NCCREATE, WM_PAINT, WM_SIZE,
    WNDCLASSW, WS_CLIPCHILDREN, WS_OVERLAPPEDWINDOW,
};

use wharf_core::Rect;

use crate::{EventCallback, PlatformEvent, WakeCallback, WindowConfig};

use super::{rect_from_win32, wide, window_long_ptr, WM_APP_WAKE};

const TOP_BAR_COLOR: COLORREF = COLORREF(0x002B2B2B);

static HOST_CLASS: Once = Once::new();
const HOST_CLASS_NAME: PCWSTR = w!("WharfHostWindow");

struct HostState {
    callback: Rc<RefCell<EventCallback>>,
    top_bar: i32,
}

/// Win32 host window. Created once per process run.
pub struct HostWindow {
    hwnd: HWND,
    callback: Rc<RefCell<EventCallback>>,
}

impl HostWindow {
    pub fn new(config: &WindowConfig, callback: EventCallback) -> windows::core::Result<Self> {
        unsafe {
            let instance = GetModuleHandleW(None)?;
            HOST_CLASS.call_once(|| unsafe {
                let wc = WNDCLASSW {
                    style: CS_HREDRAW | CS_VREDRAW,
                    lpfnWndProc: Some(host_wndproc),
                    hInstance: instance.into(),
                    lpszClassName: HOST_CLASS_NAME,
                    hCursor: LoadCursorW(None, IDC_ARROW).unwrap_or_default(),
                    hbrBackground: HBRUSH(std::ptr::null_mut()),
                    ..Default::default()
                };
                RegisterClassW(&wc);
            });

            let callback = Rc::new(RefCell::new(callback));
            let state = Box::new(HostState {
                callback: Rc::clone(&callback),
                top_bar: config.top_bar_height,
            });
            let title = wide(&config.title);
            // The state box transfers to the window in WM_NCCREATE and is
            // freed in WM_DESTROY.
            let hwnd = CreateWindowExW(
                WINDOW_EX_STYLE::default(),
                HOST_CLASS_NAME,
                PCWSTR::from_raw(title.as_ptr()),
                WS_OVERLAPPEDWINDOW | WS_CLIPCHILDREN,
                CW_USEDEFAULT,
                CW_USEDEFAULT,
                config.width,
                config.height,
                None,
                None,
                Some(instance.into()),
                Some(Box::into_raw(state) as *const core::ffi::c_void),
            )?;
            let _ = ShowWindow(hwnd, SW_SHOW);

            Ok(Self { hwnd, callback })
        }
    }

    pub fn hwnd(&self) -> HWND {
        self.hwnd
    }

    pub(crate) fn callback(&self) -> Rc<RefCell<EventCallback>> {
        Rc::clone(&self.callback)
    }

    /// Host client area, client coordinates.
    pub fn client_bounds(&self) -> Rect {
        let mut rc = RECT::default();
        unsafe {
            let _ = GetClientRect(self.hwnd, &mut rc);
        }
        rect_from_win32(rc)
    }

    pub fn dpi_scale(&self) -> f64 {
        unsafe { GetDpiForWindow(self.hwnd) as f64 / 96.0 }
    }

    /// Take keyboard focus back after a dock transition stole it.
    pub fn focus(&self) {
        unsafe {
            let _ = SetFocus(Some(self.hwnd));
        }
    }

    /// A waker for background threads: posts a wake message that surfaces
    /// as [`PlatformEvent::BackgroundWake`] on the UI thread.
    pub fn waker(&self) -> WakeCallback {
        // HWND is not Send; the raw value is.
        let hwnd = self.hwnd.0 as isize;
        std::sync::Arc::new(move || {
            let hwnd = HWND(hwnd as *mut core::ffi::c_void);
            let _ = unsafe { PostMessageW(Some(hwnd), WM_APP_WAKE, WPARAM(0), LPARAM(0)) };
        })
    }
}

impl HasWindowHandle for HostWindow {
    fn window_handle(&self) -> Result<WindowHandle<'_>, HandleError> {
        let raw = Win32WindowHandle::new(
            std::num::NonZeroIsize::new(self.hwnd.0 as isize).expect("host HWND is non-null"),
        );
        Ok(unsafe { WindowHandle::borrow_raw(RawWindowHandle::Win32(raw)) })
    }
}

impl HasDisplayHandle for HostWindow {
    fn display_handle(&self) -> Result<DisplayHandle<'_>, HandleError> {
        let raw = RawDisplayHandle::Windows(WindowsDisplayHandle::new());
        Ok(unsafe { DisplayHandle::borrow_raw(raw) })
    }
}

// ──────────────────────────────────────────────
// Message loop
// ──────────────────────────────────────────────

/// Run the Win32 message loop until the host window quits.
pub fn run_loop() {
    let mut msg = MSG::default();
    loop {
        let ret = unsafe { GetMessageW(&mut msg, None, 0, 0) };
        match ret.0 {
            0 => break,
            -1 => {
                log::error!("message loop error: {}", windows::core::Error::from_win32());
                break;
            }
            _ => unsafe {
                let _ = TranslateMessage(&msg);
                DispatchMessageW(&msg);
            },
        }
    }
}

// ──────────────────────────────────────────────
// Window procedure
// ──────────────────────────────────────────────

fn emit(state: &HostState, event: PlatformEvent) {
    match state.callback.try_borrow_mut() {
        Ok(mut cb) => cb(event),
        Err(_) => log::trace!("re-entrant host event dropped: {:?}", event),
    }
}

unsafe extern "system" fn host_wndproc(
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

    let state_ptr = window_long_ptr(hwnd) as *mut HostState;
    if state_ptr.is_null() {
        return DefWindowProcW(hwnd, msg, wparam, lparam);
    }

    match msg {
        WM_SIZE => {
            let state = &*state_ptr;
            let width = (lparam.0 & 0xFFFF) as i32;
            let height = ((lparam.0 >> 16) & 0xFFFF) as i32;
            emit(state, PlatformEvent::Resized { width, height });
            LRESULT(0)
        }

        WM_PAINT => {
            paint_top_bar(hwnd, &*state_ptr);
            LRESULT(0)
        }

        WM_KEYDOWN => {
            let state = &*state_ptr;
            let ctrl = GetKeyState(VK_CONTROL.0 as i32) < 0;
            let shift = GetKeyState(VK_SHIFT.0 as i32) < 0;
            match wparam.0 as u8 {
                b'D' if ctrl && shift => {
                    emit(state, PlatformEvent::ToggleDevToolsDock);
                    LRESULT(0)
                }
                b'I' if ctrl && shift => {
                    emit(state, PlatformEvent::OpenDevTools);
                    LRESULT(0)
                }
                _ => DefWindowProcW(hwnd, msg, wparam, lparam),
            }
        }

        WM_DPICHANGED => {
            let state = &*state_ptr;
            let dpi = (wparam.0 & 0xFFFF) as u32;
            let suggested = &*(lparam.0 as *const RECT);
            let _ = SetWindowPos(
                hwnd,
                None,
                suggested.left,
                suggested.top,
                suggested.right - suggested.left,
                suggested.bottom - suggested.top,
                SWP_NOZORDER | SWP_NOACTIVATE,
            );
            emit(state, PlatformEvent::DpiChanged(dpi));
            LRESULT(0)
        }

        WM_APP_WAKE => {
            emit(&*state_ptr, PlatformEvent::BackgroundWake);
            LRESULT(0)
        }

        WM_CLOSE => {
            emit(&*state_ptr, PlatformEvent::CloseRequested);
            let _ = DestroyWindow(hwnd);
            LRESULT(0)
        }

        WM_DESTROY => {
            SetWindowLongPtrW(hwnd, GWLP_USERDATA, 0);
            drop(Box::from_raw(state_ptr));
            PostQuitMessage(0);
            LRESULT(0)
        }

        _ => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}

unsafe fn paint_top_bar(hwnd: HWND, state: &HostState) {
    let mut ps = PAINTSTRUCT::default();
    let hdc = BeginPaint(hwnd, &mut ps);

    let mut client = RECT::default();
    let _ = GetClientRect(hwnd, &mut client);
    let dpi = GetDpiForWindow(hwnd);
    let bar = RECT {
        left: 0,
        top: 0,
        right: client.right,
        bottom: state.top_bar * dpi as i32 / 96,
    };
    let brush = CreateSolidBrush(TOP_BAR_COLOR);
    FillRect(hdc, &bar, brush);
    let _ = DeleteObject(brush.into());

    let _ = EndPaint(hwnd, &ps);
}

//! Windows backend: host window, holder window, discovery, window ops.

mod discovery;
mod external;
mod holder;
mod window;

pub use discovery::DevToolsWindowScan;
pub use external::Win32WindowOps;
pub use window::{run_loop, HostWindow};

use windows::Win32::Foundation::{HWND, RECT};
use windows::Win32::UI::WindowsAndMessaging::WM_APP;

use wharf_core::{RawWindowId, Rect};

/// Posted to the host window by [`crate::WakeCallback`]s from background
/// threads; surfaces as [`crate::PlatformEvent::BackgroundWake`].
pub(crate) const WM_APP_WAKE: u32 = WM_APP + 1;

pub(crate) fn hwnd_from_id(id: RawWindowId) -> HWND {
    HWND(id as *mut core::ffi::c_void)
}

pub(crate) fn id_from_hwnd(hwnd: HWND) -> RawWindowId {
    hwnd.0 as RawWindowId
}

pub(crate) fn rect_from_win32(rc: RECT) -> Rect {
    Rect::new(rc.left, rc.top, rc.right - rc.left, rc.bottom - rc.top)
}

pub(crate) fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// The per-window state pointer stashed in `GWLP_USERDATA`.
pub(crate) unsafe fn window_long_ptr(hwnd: HWND) -> isize {
    use windows::Win32::UI::WindowsAndMessaging::{GetWindowLongPtrW, GWLP_USERDATA};
    GetWindowLongPtrW(hwnd, GWLP_USERDATA)
}

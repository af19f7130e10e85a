//! DevTools window discovery.
//!
//! The WebView2 runtime spawns the DevTools window from a child process of
//! this one, so the scan walks the process table for direct children and
//! enumerates their top-level windows until one matches the known class.

use windows::Win32::Foundation::{CloseHandle, HWND, LPARAM, BOOL, FALSE, TRUE};
use windows::Win32::System::Diagnostics::ToolHelp::{
    CreateToolhelp32Snapshot, Process32FirstW, Process32NextW, PROCESSENTRY32W,
    TH32CS_SNAPPROCESS,
};
use windows::Win32::System::Threading::GetCurrentProcessId;
use windows::Win32::UI::WindowsAndMessaging::{
    EnumWindows, GetClassNameW, GetParent, GetWindowThreadProcessId,
};

use wharf_core::{DevToolsScan, ExternalWindow, RawWindowId};

use super::id_from_hwnd;

/// Window class the Chromium-based DevTools window registers.
const DEVTOOLS_CLASS: &str = "Chrome_WidgetWin_1";

/// Upper bound on process-table entries walked per scan, so a pathological
/// process tree degrades to "not found" instead of stalling the toggle.
const MAX_PROCESS_SCAN: usize = 4096;

/// Scans child processes for an unclaimed DevTools window. Stateless and
/// handle-free, so the scan can run on a background thread.
pub struct DevToolsWindowScan;

impl DevToolsScan for DevToolsWindowScan {
    fn scan(&self, claimed: &[RawWindowId]) -> Option<ExternalWindow> {
        let parent = unsafe { GetCurrentProcessId() };
        let snapshot = match unsafe { CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0) } {
            Ok(handle) => handle,
            Err(e) => {
                // Degrade to "not found"; the next toggle retries.
                log::debug!("process snapshot failed: {e}");
                return None;
            }
        };

        let mut entry = PROCESSENTRY32W {
            dwSize: std::mem::size_of::<PROCESSENTRY32W>() as u32,
            ..Default::default()
        };
        let mut found = None;
        let mut walked = 0usize;

        unsafe {
            if Process32FirstW(snapshot, &mut entry).is_ok() {
                loop {
                    if entry.th32ParentProcessID == parent {
                        found = find_in_process(entry.th32ProcessID, claimed);
                        if found.is_some() {
                            break;
                        }
                    }
                    walked += 1;
                    if walked >= MAX_PROCESS_SCAN {
                        log::warn!("process scan capped at {MAX_PROCESS_SCAN} entries");
                        break;
                    }
                    if Process32NextW(snapshot, &mut entry).is_err() {
                        break;
                    }
                }
            }
            let _ = CloseHandle(snapshot);
        }

        found
    }
}

struct EnumState<'a> {
    pid: u32,
    claimed: &'a [RawWindowId],
    found: Option<ExternalWindow>,
}

/// Enumerate top-level windows of one candidate child process.
fn find_in_process(pid: u32, claimed: &[RawWindowId]) -> Option<ExternalWindow> {
    let mut state = EnumState {
        pid,
        claimed,
        found: None,
    };
    unsafe {
        // Returns Err when the callback short-circuits; the out-param is
        // what matters.
        let _ = EnumWindows(
            Some(enum_windows_proc),
            LPARAM(&mut state as *mut EnumState as isize),
        );
    }
    state.found
}

unsafe extern "system" fn enum_windows_proc(hwnd: HWND, lparam: LPARAM) -> BOOL {
    let state = &mut *(lparam.0 as *mut EnumState);

    let mut pid = 0u32;
    GetWindowThreadProcessId(hwnd, Some(&mut pid));
    if pid != state.pid {
        return TRUE;
    }
    // Only top-level windows qualify; the DevTools window floats on its own.
    if GetParent(hwnd).is_ok_and(|p| !p.is_invalid()) {
        return TRUE;
    }

    let mut buf = [0u16; 256];
    let len = GetClassNameW(hwnd, &mut buf);
    if len <= 0 {
        return TRUE;
    }
    let class = String::from_utf16_lossy(&buf[..len as usize]);
    if class != DEVTOOLS_CLASS {
        return TRUE;
    }

    let id = id_from_hwnd(hwnd);
    if state.claimed.contains(&id) {
        // Another tab already docked this one; keep looking.
        return TRUE;
    }

    state.found = Some(ExternalWindow { id, pid });
    // First unclaimed match wins; stop the enumeration.
    FALSE
}

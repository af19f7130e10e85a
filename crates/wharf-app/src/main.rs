// Wharf: a minimal WebView2 browser shell with dockable DevTools.
// Wires the host window, the content webview, and the dock engine together.

mod broker;
mod toggle;

#[cfg(windows)]
mod shell;
#[cfg(windows)]
mod tab;
#[cfg(windows)]
mod webview;

#[cfg(windows)]
fn main() {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wharf_platform::win32::{run_loop, HostWindow};
    use wharf_platform::{PlatformEvent, WindowConfig};

    use crate::shell::Shell;

    env_logger::init();

    // The window procedure fires during creation, before the shell exists;
    // those early events are dropped.
    let shell: Rc<RefCell<Option<Shell>>> = Rc::new(RefCell::new(None));
    let events = Rc::clone(&shell);
    let callback = Box::new(move |event: PlatformEvent| {
        if let Some(shell) = events.borrow_mut().as_mut() {
            shell.handle_event(event);
        }
    });

    let config = WindowConfig {
        title: "Wharf".to_string(),
        top_bar_height: shell::UI_BAR_HEIGHT,
        ..WindowConfig::default()
    };
    let window = Rc::new(HostWindow::new(&config, callback).expect("create host window"));
    let state = Shell::new(Rc::clone(&window)).expect("create shell");
    *shell.borrow_mut() = Some(state);

    run_loop();
}

#[cfg(not(windows))]
fn main() {
    eprintln!("wharf requires Windows: the shell embeds WebView2 and docks its DevTools window");
    std::process::exit(1);
}

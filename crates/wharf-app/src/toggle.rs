//! Two-phase toggle coordinator.
//!
//! Phase one, the only off-thread work in the docking subsystem, scans
//! for the DevTools window on a background thread. Phase two applies the
//! dock transition on the UI thread once the wake message is drained, so
//! a phase-two apply never begins before its phase-one scan completes.
//! Overlapping toggle requests are serialized through a depth-one queue.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use wharf_core::{DevToolsScan, ExternalWindow, RawWindowId};
use wharf_platform::WakeCallback;

pub struct ToggleOutcome {
    /// Scan result from the background phase, when one was requested.
    pub discovered: Option<ExternalWindow>,
    /// Another toggle arrived while this one was in flight; re-request
    /// after applying so both run in issuance order.
    pub rerun: bool,
}

pub struct ToggleCoordinator {
    scanner: Arc<dyn DevToolsScan>,
    waker: WakeCallback,
    tx: Sender<Option<ExternalWindow>>,
    rx: Receiver<Option<ExternalWindow>>,
    in_flight: bool,
    queued: bool,
}

impl ToggleCoordinator {
    pub fn new(scanner: Arc<dyn DevToolsScan>, waker: WakeCallback) -> Self {
        let (tx, rx) = channel();
        Self {
            scanner,
            waker,
            tx,
            rx,
            in_flight: false,
            queued: false,
        }
    }

    /// Start the background phase of one toggle. `claimed` is a snapshot of
    /// window ids owned by other tabs, taken on the UI thread so the scan
    /// itself stays read-only.
    pub fn request(&mut self, needs_discovery: bool, claimed: Vec<RawWindowId>) {
        if self.in_flight {
            // A second toggle while one is pending queues behind it; a
            // third collapses into the same queued run.
            log::debug!("toggle already in flight, queueing");
            self.queued = true;
            return;
        }
        self.in_flight = true;

        let scanner = Arc::clone(&self.scanner);
        let waker = Arc::clone(&self.waker);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let found = if needs_discovery {
                scanner.scan(&claimed)
            } else {
                None
            };
            let _ = tx.send(found);
            waker();
        });
    }

    /// Collect one completed background phase, if any. Runs on the UI
    /// thread; the caller applies the transition and re-requests when
    /// `rerun` is set.
    pub fn poll(&mut self) -> Option<ToggleOutcome> {
        let discovered = self.rx.try_recv().ok()?;
        self.in_flight = false;
        let rerun = std::mem::take(&mut self.queued);
        Some(ToggleOutcome { discovered, rerun })
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    const DEVTOOLS: ExternalWindow = ExternalWindow { id: 0x7700, pid: 51 };

    struct FakeScan {
        result: Option<ExternalWindow>,
        delay: Duration,
        calls: AtomicUsize,
        seen_claimed: Mutex<Vec<Vec<RawWindowId>>>,
        threads: Mutex<Vec<thread::ThreadId>>,
    }

    impl FakeScan {
        fn new(result: Option<ExternalWindow>, delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                result,
                delay,
                calls: AtomicUsize::new(0),
                seen_claimed: Mutex::new(Vec::new()),
                threads: Mutex::new(Vec::new()),
            })
        }
    }

    impl DevToolsScan for FakeScan {
        fn scan(&self, claimed: &[RawWindowId]) -> Option<ExternalWindow> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen_claimed.lock().unwrap().push(claimed.to_vec());
            self.threads.lock().unwrap().push(thread::current().id());
            thread::sleep(self.delay);
            // Skip claimed candidates the way the real scan does.
            self.result.filter(|w| !claimed.contains(&w.id))
        }
    }

    fn counting_waker() -> (WakeCallback, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let inner = Arc::clone(&count);
        let waker: WakeCallback = Arc::new(move || {
            inner.fetch_add(1, Ordering::SeqCst);
        });
        (waker, count)
    }

    fn wait_poll(coord: &mut ToggleCoordinator) -> ToggleOutcome {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(outcome) = coord.poll() {
                return outcome;
            }
            assert!(Instant::now() < deadline, "background phase never completed");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_scan_runs_off_the_requesting_thread() {
        let scan = FakeScan::new(Some(DEVTOOLS), Duration::ZERO);
        let (waker, _) = counting_waker();
        let mut coord = ToggleCoordinator::new(Arc::clone(&scan) as Arc<dyn DevToolsScan>, waker);

        coord.request(true, Vec::new());
        let outcome = wait_poll(&mut coord);
        assert_eq!(outcome.discovered, Some(DEVTOOLS));
        assert!(!outcome.rerun);

        let threads = scan.threads.lock().unwrap();
        assert_eq!(threads.len(), 1);
        assert_ne!(threads[0], thread::current().id());
    }

    #[test]
    fn test_discovery_skipped_when_state_known() {
        let scan = FakeScan::new(Some(DEVTOOLS), Duration::ZERO);
        let (waker, _) = counting_waker();
        let mut coord = ToggleCoordinator::new(Arc::clone(&scan) as Arc<dyn DevToolsScan>, waker);

        coord.request(false, Vec::new());
        let outcome = wait_poll(&mut coord);
        assert_eq!(outcome.discovered, None);
        assert_eq!(scan.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_wake_fires_when_phase_completes() {
        let scan = FakeScan::new(None, Duration::ZERO);
        let (waker, wakes) = counting_waker();
        let mut coord = ToggleCoordinator::new(scan as Arc<dyn DevToolsScan>, waker);

        coord.request(true, Vec::new());
        wait_poll(&mut coord);
        assert!(wakes.load(Ordering::SeqCst) >= 1);
    }

    #[test]
    fn test_claimed_windows_are_skipped() {
        // Tab A already owns the only DevTools window; tab B's scan must
        // come up empty rather than double-dock it.
        let scan = FakeScan::new(Some(DEVTOOLS), Duration::ZERO);
        let (waker, _) = counting_waker();
        let mut coord = ToggleCoordinator::new(Arc::clone(&scan) as Arc<dyn DevToolsScan>, waker);

        coord.request(true, vec![DEVTOOLS.id]);
        let outcome = wait_poll(&mut coord);
        assert_eq!(outcome.discovered, None);
        assert_eq!(scan.seen_claimed.lock().unwrap()[0], vec![DEVTOOLS.id]);
    }

    #[test]
    fn test_overlapping_toggles_serialize() {
        let scan = FakeScan::new(Some(DEVTOOLS), Duration::from_millis(50));
        let (waker, _) = counting_waker();
        let mut coord = ToggleCoordinator::new(Arc::clone(&scan) as Arc<dyn DevToolsScan>, waker);

        coord.request(true, Vec::new());
        assert!(coord.in_flight());
        // Second toggle while the first scan still runs.
        coord.request(true, Vec::new());

        let first = wait_poll(&mut coord);
        assert!(first.rerun);
        assert_eq!(scan.calls.load(Ordering::SeqCst), 1);

        // The queued toggle runs only after the first apply phase.
        coord.request(true, Vec::new());
        let second = wait_poll(&mut coord);
        assert!(!second.rerun);
        assert_eq!(scan.calls.load(Ordering::SeqCst), 2);
        assert!(!coord.in_flight());
    }

    #[test]
    fn test_third_toggle_collapses_into_queue() {
        let scan = FakeScan::new(None, Duration::from_millis(50));
        let (waker, _) = counting_waker();
        let mut coord = ToggleCoordinator::new(Arc::clone(&scan) as Arc<dyn DevToolsScan>, waker);

        coord.request(true, Vec::new());
        coord.request(true, Vec::new());
        coord.request(true, Vec::new());

        let first = wait_poll(&mut coord);
        assert!(first.rerun);
        coord.request(true, Vec::new());
        let second = wait_poll(&mut coord);
        assert!(!second.rerun);
        assert_eq!(scan.calls.load(Ordering::SeqCst), 2);
    }
}

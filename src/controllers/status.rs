//! Indexer status panel: a self-rescheduling status poll plus on-demand
//! progress, stop and reset.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use chrono::{DateTime, Local};
use futures::future::join;

use super::ChangeNotifier;
use crate::models::{HostOptions, Progress, ResetOutcome, StatusSnapshot};
use crate::network::{ApiError, HttpTransport, SystemConfigClient};
use crate::timer::Timer;

/// Stops a running poll loop.  Checked before every fetch and before every
/// reschedule, so a cancelled loop issues no further requests.
#[derive(Debug, Clone, Default)]
pub struct PollHandle {
    cancelled: Rc<Cell<bool>>,
}

impl PollHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

/// Should `fresh` replace what is on screen?  Only when nothing is shown yet
/// or the job status itself changed.
pub fn should_replace(shown: Option<&StatusSnapshot>, fresh: &StatusSnapshot) -> bool {
    match shown {
        None => true,
        Some(shown) => shown.status != fresh.status,
    }
}

pub struct StatusController<H, Tm> {
    api: Rc<SystemConfigClient<H>>,
    timer: Rc<Tm>,
    interval_ms: u32,
    status: RefCell<Option<StatusSnapshot>>,
    progress: RefCell<Option<Progress>>,
    host: RefCell<Option<HostOptions>>,
    last_checked: Cell<Option<DateTime<Local>>>,
    /// Sequence of the latest status fetch sent, and of the latest one
    /// applied.  Responses older than the applied one are dropped.
    issued: Cell<u64>,
    applied: Cell<u64>,
    handle: RefCell<Option<PollHandle>>,
    notifier: ChangeNotifier,
}

impl<H: HttpTransport, Tm: Timer> StatusController<H, Tm> {
    pub fn new(api: Rc<SystemConfigClient<H>>, timer: Rc<Tm>, interval_ms: u32) -> Self {
        Self {
            api,
            timer,
            interval_ms,
            status: RefCell::new(None),
            progress: RefCell::new(None),
            host: RefCell::new(None),
            last_checked: Cell::new(None),
            issued: Cell::new(0),
            applied: Cell::new(0),
            handle: RefCell::new(None),
            notifier: ChangeNotifier::default(),
        }
    }

    pub fn set_on_change(&self, hook: impl Fn() + 'static) {
        self.notifier.set(hook);
    }

    pub fn status(&self) -> Option<StatusSnapshot> {
        self.status.borrow().clone()
    }

    pub fn progress(&self) -> Option<Progress> {
        *self.progress.borrow()
    }

    pub fn host(&self) -> Option<HostOptions> {
        self.host.borrow().clone()
    }

    /// Local time of the last status fetch that succeeded.
    pub fn last_checked(&self) -> Option<DateTime<Local>> {
        self.last_checked.get()
    }

    /// Show `fresh` unless it carries the status already on screen.
    /// Returns whether the display changed.
    pub fn apply_status(&self, fresh: StatusSnapshot) -> bool {
        let replace = should_replace(self.status.borrow().as_ref(), &fresh);
        if replace {
            debug_log!("Indexer status is now {}", fresh.status);
            *self.status.borrow_mut() = Some(fresh);
            self.notifier.notify();
        }
        replace
    }

    /// Fetch the status and show it.  A response that arrives after a newer
    /// one was applied, or after a reset, is dropped.
    pub async fn update_status(&self) -> Result<bool, ApiError> {
        let seq = self.issued.get() + 1;
        self.issued.set(seq);
        let fresh = self.api.get_status().await?;
        if seq <= self.applied.get() {
            debug_log!("Dropping stale status response #{}", seq);
            return Ok(false);
        }
        self.applied.set(seq);
        self.last_checked.set(Some(Local::now()));
        Ok(self.apply_status(fresh))
    }

    /// Fetch, wait, fetch again until `handle` is cancelled.  Failed fetches
    /// are logged and the loop carries on.
    pub async fn poll(&self, handle: PollHandle) {
        loop {
            if handle.is_cancelled() {
                break;
            }
            if let Err(e) = self.update_status().await {
                error_log!("Status poll failed: {}", e);
            }
            if handle.is_cancelled() {
                break;
            }
            self.timer.sleep(self.interval_ms).await;
        }
        debug_log!("Status polling stopped");
    }

    /// Everything the panel does while it is mounted: the poll loop next to
    /// one eager progress and host fetch.
    pub async fn run(&self, handle: PollHandle) {
        let eager = async {
            // failures are already logged by the fetchers
            let _ = self.fetch_progress().await;
            let _ = self.load_host().await;
        };
        join(self.poll(handle), eager).await;
    }

    /// Stop polling started by [`StatusController::start`].
    pub fn stop_polling(&self) {
        if let Some(handle) = self.handle.borrow_mut().take() {
            handle.cancel();
        }
    }

    /// Ask the backend to interrupt the running job.
    pub async fn stop(&self) -> Result<(), ApiError> {
        self.api.stop().await.inspect_err(|e| {
            error_log!("Failed to stop indexer: {}", e);
        })
    }

    pub async fn fetch_progress(&self) -> Result<Progress, ApiError> {
        match self.api.get_progress().await {
            Ok(progress) => {
                *self.progress.borrow_mut() = Some(progress);
                self.notifier.notify();
                Ok(progress)
            }
            Err(e) => {
                error_log!("Failed to fetch progress: {}", e);
                Err(e)
            }
        }
    }

    pub async fn load_host(&self) -> Result<(), ApiError> {
        match self.api.get_host().await {
            Ok(host) => {
                *self.host.borrow_mut() = Some(host);
                self.notifier.notify();
                Ok(())
            }
            Err(e) => {
                error_log!("Failed to load host options: {}", e);
                Err(e)
            }
        }
    }

    /// Wipe the backend's tables, then show whatever status it reports now
    /// even if the status name did not change.
    pub async fn reset(&self) -> Result<ResetOutcome, ApiError> {
        let outcome = self.api.reset().await.inspect_err(|e| {
            error_log!("Reset failed: {}", e);
        })?;
        debug_log!("Reset finished: {}", outcome.status);

        // polls still in flight describe the tables before the reset
        self.applied.set(self.issued.get());
        *self.status.borrow_mut() = None;
        *self.progress.borrow_mut() = None;
        if let Err(e) = self.update_status().await {
            error_log!("Status refresh after reset failed: {}", e);
            self.notifier.notify();
        }
        Ok(outcome)
    }
}

impl<H: HttpTransport + 'static, Tm: Timer + 'static> StatusController<H, Tm> {
    /// Spawn [`StatusController::run`] on the browser event loop.  A loop
    /// started earlier is cancelled first.
    pub fn start(self: &Rc<Self>) -> PollHandle {
        self.stop_polling();
        let handle = PollHandle::new();
        *self.handle.borrow_mut() = Some(handle.clone());

        let this = self.clone();
        let loop_handle = handle.clone();
        wasm_bindgen_futures::spawn_local(async move {
            this.run(loop_handle).await;
        });
        handle
    }
}

//! Schedule form: cron expression, enable flag, optional run-length limit
//! and the lead host, all saved with one button.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::future::join;

use super::ChangeNotifier;
use crate::models::{HostOptions, ScheduleConfig, SyncStatus};
use crate::network::{ApiError, HttpTransport, SystemConfigClient};
use crate::save_indicator::{settle_success, SaveIndicator, SaveState, SaveTiming};
use crate::timer::Timer;

pub struct ScheduleController<H, Tm> {
    api: Rc<SystemConfigClient<H>>,
    timer: Rc<Tm>,
    timing: SaveTiming,
    schedule: RefCell<Option<ScheduleConfig>>,
    host: RefCell<Option<HostOptions>>,
    last_sync: RefCell<Option<SyncStatus>>,
    /// Bumped on every local edit.
    revision: Cell<u64>,
    loading: Cell<bool>,
    indicator: RefCell<SaveIndicator>,
    notifier: ChangeNotifier,
}

impl<H: HttpTransport, Tm: Timer> ScheduleController<H, Tm> {
    pub fn new(api: Rc<SystemConfigClient<H>>, timer: Rc<Tm>, timing: SaveTiming) -> Self {
        Self {
            api,
            timer,
            timing,
            schedule: RefCell::new(None),
            host: RefCell::new(None),
            last_sync: RefCell::new(None),
            revision: Cell::new(0),
            loading: Cell::new(true),
            indicator: RefCell::new(SaveIndicator::new()),
            notifier: ChangeNotifier::default(),
        }
    }

    pub fn set_on_change(&self, hook: impl Fn() + 'static) {
        self.notifier.set(hook);
    }

    /// True until the schedule document has been fetched; the form stays
    /// disabled meanwhile.
    pub fn is_loading(&self) -> bool {
        self.loading.get()
    }

    pub fn schedule(&self) -> Option<ScheduleConfig> {
        self.schedule.borrow().clone()
    }

    pub fn cron(&self) -> Option<String> {
        self.schedule.borrow().as_ref().map(|s| s.cron.clone())
    }

    pub fn host(&self) -> Option<HostOptions> {
        self.host.borrow().clone()
    }

    pub fn save_state(&self) -> SaveState {
        self.indicator.borrow().state()
    }

    /// Peer hosts that did / did not pick up the last saved schedule.
    pub fn last_sync(&self) -> Option<SyncStatus> {
        self.last_sync.borrow().clone()
    }

    /// Fetch schedule and host once.
    pub async fn load(&self) -> Result<(), ApiError> {
        let (schedule, host) = join(self.api.get_schedule(), self.api.get_host()).await;
        let mut first_err = None;

        match schedule {
            Ok(schedule) => {
                *self.schedule.borrow_mut() = Some(schedule);
                self.loading.set(false);
            }
            Err(e) => {
                error_log!("Failed to load schedule: {}", e);
                first_err = Some(e);
            }
        }
        match host {
            Ok(host) => *self.host.borrow_mut() = Some(host),
            Err(e) => {
                error_log!("Failed to load host options: {}", e);
                first_err.get_or_insert(e);
            }
        }

        self.notifier.notify();
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn edit(&self, f: impl FnOnce(&mut ScheduleConfig)) {
        if let Some(schedule) = self.schedule.borrow_mut().as_mut() {
            f(schedule);
            self.revision.set(self.revision.get() + 1);
        }
    }

    pub fn set_cron(&self, cron: String) {
        self.edit(|s| s.cron = cron);
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.edit(|s| s.enable = enabled.to_string());
    }

    pub fn set_limit(&self, limit: bool) {
        self.edit(|s| s.limit = limit);
    }

    pub fn set_limit_hours(&self, hours: i64) {
        self.edit(|s| s.hours = hours);
    }

    pub fn set_limit_minutes(&self, minutes: i64) {
        self.edit(|s| s.minutes = minutes);
    }

    pub fn set_leader(&self, leader: String) {
        if let Some(host) = self.host.borrow_mut().as_mut() {
            host.leader = leader;
        }
    }

    fn fail(&self, what: &str, err: &ApiError) {
        error_log!("Failed to save {}: {}", what, err);
        self.indicator.borrow_mut().fail();
        self.notifier.notify();
    }

    /// Save schedule and host side by side.  Either failure turns the
    /// indicator to `Error`; only the schedule's success drives the delayed
    /// "success" display.
    pub async fn save_schedule(&self) -> Result<(), ApiError> {
        let Some(schedule) = self.schedule() else {
            warn_log!("Save requested before the schedule was loaded");
            return Ok(());
        };
        let host = self.host();
        let revision = self.revision.get();

        let ticket = self.indicator.borrow_mut().begin();
        self.notifier.notify();
        let notify = || self.notifier.notify();

        let schedule_save = async {
            match self.api.save_schedule(&schedule).await {
                Ok(mut saved) => {
                    let sync = saved.syncstatus.take();
                    if let Some(sync) = &sync {
                        debug_log!(
                            "Schedule synced to {:?}, failed on {:?}",
                            sync.sync_success,
                            sync.sync_failure
                        );
                    }
                    // edits made while the save was in flight win over the echo
                    if self.revision.get() == revision {
                        *self.schedule.borrow_mut() = Some(saved);
                    } else {
                        debug_log!("Schedule edited during save, keeping local changes");
                    }
                    *self.last_sync.borrow_mut() = sync;
                    settle_success(&self.indicator, self.timer.as_ref(), self.timing, ticket, &notify).await;
                    Ok(())
                }
                Err(e) => {
                    self.fail("schedule", &e);
                    Err(e)
                }
            }
        };

        let host_save = async {
            let Some(host) = host else {
                return Ok(());
            };
            match self.api.save_host(&host).await {
                Ok(_) => Ok(()),
                Err(e) => {
                    self.fail("host", &e);
                    Err(e)
                }
            }
        };

        let (schedule_result, host_result) = join(schedule_save, host_save).await;
        schedule_result.and(host_result)
    }
}

//! Extra metadata attributes the indexer records for every file.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::ChangeNotifier;
use crate::models::MetadataConfig;
use crate::network::{ApiError, HttpTransport, SystemConfigClient};
use crate::save_indicator::{settle_success, SaveIndicator, SaveState, SaveTiming};
use crate::timer::Timer;

pub struct MetadataController<H, Tm> {
    api: Rc<SystemConfigClient<H>>,
    timer: Rc<Tm>,
    timing: SaveTiming,
    config: RefCell<MetadataConfig>,
    loading: Cell<bool>,
    input: RefCell<String>,
    indicator: RefCell<SaveIndicator>,
    notifier: ChangeNotifier,
}

impl<H: HttpTransport, Tm: Timer> MetadataController<H, Tm> {
    pub fn new(api: Rc<SystemConfigClient<H>>, timer: Rc<Tm>, timing: SaveTiming) -> Self {
        Self {
            api,
            timer,
            timing,
            config: RefCell::new(MetadataConfig::default()),
            loading: Cell::new(true),
            input: RefCell::new(String::new()),
            indicator: RefCell::new(SaveIndicator::new()),
            notifier: ChangeNotifier::default(),
        }
    }

    pub fn set_on_change(&self, hook: impl Fn() + 'static) {
        self.notifier.set(hook);
    }

    pub fn attributes(&self) -> Vec<String> {
        self.config.borrow().attributes.clone()
    }

    pub fn input(&self) -> String {
        self.input.borrow().clone()
    }

    pub fn set_input(&self, value: String) {
        *self.input.borrow_mut() = value;
    }

    /// True until the attribute list has been fetched.  Every mutation
    /// persists the whole list, so none is allowed before that.
    pub fn is_loading(&self) -> bool {
        self.loading.get()
    }

    pub fn save_state(&self) -> SaveState {
        self.indicator.borrow().state()
    }

    pub async fn load(&self) -> Result<(), ApiError> {
        let config = self.api.get_metadata().await.inspect_err(|e| {
            error_log!("Failed to load metadata attributes: {}", e);
        })?;
        *self.config.borrow_mut() = config;
        self.loading.set(false);
        self.notifier.notify();
        Ok(())
    }

    /// Drop the first attribute equal to `attr` and persist the list.
    /// `Ok(false)` when there was nothing to remove.
    pub async fn remove(&self, attr: &str) -> Result<bool, ApiError> {
        if self.loading.get() {
            warn_log!("Attribute list not loaded, not removing {}", attr);
            return Ok(false);
        }
        let updated = {
            let mut config = self.config.borrow_mut();
            let Some(index) = config.attributes.iter().position(|a| a == attr) else {
                debug_log!("Attribute {} is not configured", attr);
                return Ok(false);
            };
            config.attributes.remove(index);
            config.clone()
        };
        self.persist(updated).await.map(|_| true)
    }

    /// Append whatever is in the input box, persist, and empty the box.
    /// `Ok(false)` when the box was empty or the list is not loaded yet.
    pub async fn submit(&self) -> Result<bool, ApiError> {
        if self.loading.get() {
            warn_log!("Attribute list not loaded, keeping input");
            return Ok(false);
        }
        let candidate = self.input.take();
        if candidate.is_empty() {
            return Ok(false);
        }
        let updated = {
            let mut config = self.config.borrow_mut();
            config.attributes.push(candidate);
            config.clone()
        };
        self.persist(updated).await.map(|_| true)
    }

    async fn persist(&self, config: MetadataConfig) -> Result<(), ApiError> {
        let ticket = self.indicator.borrow_mut().begin();
        self.notifier.notify();

        match self.api.save_metadata(&config).await {
            Ok(saved) => {
                *self.config.borrow_mut() = saved;
                let notify = || self.notifier.notify();
                notify();
                settle_success(&self.indicator, self.timer.as_ref(), self.timing, ticket, &notify).await;
                Ok(())
            }
            Err(e) => {
                error_log!("Failed to save metadata attributes: {}", e);
                self.indicator.borrow_mut().fail();
                self.notifier.notify();
                Err(e)
            }
        }
    }
}

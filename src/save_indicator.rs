//! Per-form save indicator: `idle → saving → {success, error}`.
//!
//! A successful save does not flip to "success" straight away.  The form
//! shows "success" after a short delay and clears it a few seconds later.
//! Both delayed steps carry the [`SaveTicket`] of the attempt that started
//! them and re-check the indicator when they fire, so a timer left over from
//! an earlier attempt can never touch a later one, and an `Error` is never
//! replaced by a pending "success".

use std::cell::RefCell;

use crate::constants::{METADATA_SAVE_CLEAR_MS, SAVE_CONFIRM_DELAY_MS, SCHEDULE_SAVE_CLEAR_MS};
use crate::timer::Timer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveState {
    #[default]
    Idle,
    Saving,
    Success,
    Error,
}

impl SaveState {
    /// CSS class the page puts on the form's status element.
    pub fn css_class(&self) -> &'static str {
        match self {
            SaveState::Idle => "",
            SaveState::Saving => "saving",
            SaveState::Success => "success",
            SaveState::Error => "error",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SaveState::Idle => "",
            SaveState::Saving => "Saving…",
            SaveState::Success => "Saved",
            SaveState::Error => "Save failed",
        }
    }
}

/// Delays for the success display, both measured from the moment the save
/// request settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveTiming {
    pub confirm_after_ms: u32,
    pub clear_after_ms: u32,
}

impl SaveTiming {
    pub fn schedule() -> Self {
        Self { confirm_after_ms: SAVE_CONFIRM_DELAY_MS, clear_after_ms: SCHEDULE_SAVE_CLEAR_MS }
    }

    pub fn metadata() -> Self {
        Self { confirm_after_ms: SAVE_CONFIRM_DELAY_MS, clear_after_ms: METADATA_SAVE_CLEAR_MS }
    }
}

/// Identifies one save attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveTicket(u64);

#[derive(Debug, Default)]
pub struct SaveIndicator {
    state: SaveState,
    attempt: u64,
}

impl SaveIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SaveState {
        self.state
    }

    /// Start a user-initiated save.
    pub fn begin(&mut self) -> SaveTicket {
        self.attempt += 1;
        self.state = SaveState::Saving;
        SaveTicket(self.attempt)
    }

    /// Any request belonging to the current save failed.
    pub fn fail(&mut self) {
        self.state = SaveState::Error;
    }

    /// Delayed "success".  Only applies while the ticket's attempt is still
    /// the latest one and nothing has failed.
    pub fn confirm(&mut self, ticket: SaveTicket) -> bool {
        if ticket.0 != self.attempt || self.state != SaveState::Saving {
            return false;
        }
        self.state = SaveState::Success;
        true
    }

    /// Delayed reset to idle.  Only clears the "success" of the same attempt.
    pub fn clear(&mut self, ticket: SaveTicket) -> bool {
        if ticket.0 != self.attempt || self.state != SaveState::Success {
            return false;
        }
        self.state = SaveState::Idle;
        true
    }
}

/// Run the delayed success sequence for `ticket`, calling `on_change` after
/// every transition that actually happened.
pub async fn settle_success<Tm: Timer>(
    indicator: &RefCell<SaveIndicator>,
    timer: &Tm,
    timing: SaveTiming,
    ticket: SaveTicket,
    on_change: &dyn Fn(),
) {
    timer.sleep(timing.confirm_after_ms).await;
    let confirmed = indicator.borrow_mut().confirm(ticket);
    if !confirmed {
        return;
    }
    on_change();

    timer
        .sleep(timing.clear_after_ms.saturating_sub(timing.confirm_after_ms))
        .await;
    let cleared = indicator.borrow_mut().clear(ticket);
    if cleared {
        on_change();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{InstantTimer, ManualTimer};
    use futures::executor::{block_on, LocalPool};
    use futures::task::LocalSpawnExt;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn success_path_visits_every_state() {
        let indicator = RefCell::new(SaveIndicator::new());
        let timer = InstantTimer::new();
        let seen = RefCell::new(Vec::new());

        let ticket = indicator.borrow_mut().begin();
        seen.borrow_mut().push(indicator.borrow().state());
        block_on(settle_success(&indicator, &timer, SaveTiming::schedule(), ticket, &|| {
            seen.borrow_mut().push(indicator.borrow().state())
        }));

        assert_eq!(
            *seen.borrow(),
            vec![SaveState::Saving, SaveState::Success, SaveState::Idle]
        );
        assert_eq!(timer.sleeps(), vec![500, 4_500]);
    }

    #[test]
    fn error_blocks_pending_confirmation() {
        let mut indicator = SaveIndicator::new();
        let ticket = indicator.begin();
        indicator.fail();
        assert!(!indicator.confirm(ticket));
        assert!(!indicator.clear(ticket));
        assert_eq!(indicator.state(), SaveState::Error);
    }

    #[test]
    fn stale_clear_timer_leaves_later_error_alone() {
        let indicator = Rc::new(RefCell::new(SaveIndicator::new()));
        let timer = ManualTimer::new();
        let changes = Rc::new(Cell::new(0));
        let mut pool = LocalPool::new();

        let first = indicator.borrow_mut().begin();
        {
            let (indicator, timer, changes) = (indicator.clone(), timer.clone(), changes.clone());
            pool.spawner()
                .spawn_local(async move {
                    settle_success(&indicator, timer.as_ref(), SaveTiming::schedule(), first, &|| {
                        changes.set(changes.get() + 1)
                    })
                    .await;
                })
                .unwrap();
        }
        pool.run_until_stalled();

        // first attempt shows "success" and waits to clear
        let (confirm_id, _) = timer.pending()[0];
        timer.fire(confirm_id);
        pool.run_until_stalled();
        assert_eq!(indicator.borrow().state(), SaveState::Success);

        // a second attempt fails before the first one's clear timer fires
        indicator.borrow_mut().begin();
        indicator.borrow_mut().fail();

        let (clear_id, ms) = timer.pending()[0];
        assert_eq!(ms, 4_500);
        timer.fire(clear_id);
        pool.run_until_stalled();

        assert_eq!(indicator.borrow().state(), SaveState::Error);
        assert_eq!(changes.get(), 1);
    }

    #[test]
    fn timing_presets() {
        assert_eq!(SaveTiming::schedule().clear_after_ms, 5_000);
        assert_eq!(SaveTiming::metadata().clear_after_ms, 6_000);
        assert_eq!(SaveState::Saving.css_class(), "saving");
    }
}

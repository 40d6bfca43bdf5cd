//! Controllers hold the state behind each panel and talk to the backend.
//! They know nothing about the DOM; pages register an on-change hook and
//! re-render from the controller's getters when it fires.

pub mod metadata;
pub mod schedule;
pub mod status;

pub use metadata::MetadataController;
pub use schedule::ScheduleController;
pub use status::{PollHandle, StatusController};

use std::cell::RefCell;
use std::rc::Rc;

/// Single re-render hook.  The hook is cloned out before it runs so it may
/// freely read the controller (and even replace itself).
#[derive(Default)]
pub struct ChangeNotifier {
    hook: RefCell<Option<Rc<dyn Fn()>>>,
}

impl ChangeNotifier {
    pub fn set(&self, hook: impl Fn() + 'static) {
        *self.hook.borrow_mut() = Some(Rc::new(hook));
    }

    pub fn notify(&self) {
        let hook = self.hook.borrow().clone();
        if let Some(hook) = hook {
            hook();
        }
    }
}

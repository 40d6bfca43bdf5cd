//! Two-way binding between the schedule's cron string and the visual cron
//! builder.
//!
//! The builder owns a text input and rewrites it whenever the user clicks
//! through its drop-downs; it also rewrites (and re-announces) the value when
//! the console pushes a freshly loaded string into it.  Without a guard the
//! two sides keep feeding each other, so every write goes through
//! [`CronFieldAdapter`], which drops widget updates that arrive while an
//! update is already being applied.

use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, HtmlInputElement};

/// What the adapter needs from a cron builder.
pub trait CronWidget {
    /// Write straight into the builder's own input.
    fn set_text(&self, cron: &str);
    fn text(&self) -> String;
    /// Leave the input so the builder re-parses what was written into it.
    fn commit(&self);
}

pub struct CronFieldAdapter<W> {
    widget: W,
    sink: Box<dyn Fn(String)>,
    applying: Cell<bool>,
}

/// Holds the "applying" flag for as long as it lives.
struct ApplyGuard<'a>(&'a Cell<bool>);

impl Drop for ApplyGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl<W: CronWidget> CronFieldAdapter<W> {
    /// `sink` receives every cron string the user produced in the widget.
    pub fn new(widget: W, sink: impl Fn(String) + 'static) -> Self {
        Self {
            widget,
            sink: Box::new(sink),
            applying: Cell::new(false),
        }
    }

    pub fn widget(&self) -> &W {
        &self.widget
    }

    pub fn is_applying(&self) -> bool {
        self.applying.get()
    }

    fn enter(&self) -> Option<ApplyGuard<'_>> {
        if self.applying.replace(true) {
            return None;
        }
        Some(ApplyGuard(&self.applying))
    }

    /// Called by the widget when its value changed.  Returns whether the
    /// value reached the model.
    pub fn on_widget_change(&self, value: &str) -> bool {
        let Some(_guard) = self.enter() else {
            debug_log!("cron widget echo ignored: {}", value);
            return false;
        };
        (self.sink)(value.to_string());
        true
    }

    /// Show a value loaded from the backend.  The model already holds it, so
    /// whatever the widget announces while re-rendering is not written back.
    pub fn seed(&self, cron: &str) {
        let _guard = self.enter();
        self.widget.set_text(cron);
        self.widget.commit();
    }
}

/// The builder as seen from the DOM: its backing `<input>`.
pub struct InputCronWidget {
    input: HtmlInputElement,
}

impl InputCronWidget {
    pub fn new(input: HtmlInputElement) -> Self {
        Self { input }
    }

    pub fn from_document(document: &Document, id: &str) -> Result<Self, JsValue> {
        let input = document
            .get_element_by_id(id)
            .ok_or_else(|| JsValue::from_str(&format!("#{} not found", id)))?
            .dyn_into::<HtmlInputElement>()?;
        Ok(Self::new(input))
    }

    pub fn input(&self) -> &HtmlInputElement {
        &self.input
    }
}

impl CronWidget for InputCronWidget {
    fn set_text(&self, cron: &str) {
        self.input.set_value(cron);
    }

    fn text(&self) -> String {
        self.input.value()
    }

    fn commit(&self) {
        if let Ok(event) = Event::new("blur") {
            let _ = self.input.dispatch_event(&event);
        }
        let _ = self.input.blur();
    }
}

/// Forward the builder's `change` events into the adapter.
pub fn bind_cron_input(adapter: Rc<CronFieldAdapter<InputCronWidget>>) -> Result<(), JsValue> {
    let input = adapter.widget().input().clone();
    let cb = Closure::wrap(Box::new(move |_e: Event| {
        let value = adapter.widget().text();
        adapter.on_widget_change(&value);
    }) as Box<dyn FnMut(_)>);
    input.add_event_listener_with_callback("change", cb.as_ref().unchecked_ref())?;
    cb.forget();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Stand-in builder that re-announces every value pushed into it, the
    /// way the real widget does while re-rendering.
    #[derive(Default)]
    struct EchoWidget {
        text: RefCell<String>,
        echo: RefCell<Option<Box<dyn Fn(String)>>>,
        commits: Cell<u32>,
    }

    impl CronWidget for Rc<EchoWidget> {
        fn set_text(&self, cron: &str) {
            *self.text.borrow_mut() = cron.to_string();
            if let Some(echo) = self.echo.borrow().as_ref() {
                echo(cron.to_string());
            }
        }

        fn text(&self) -> String {
            self.text.borrow().clone()
        }

        fn commit(&self) {
            self.commits.set(self.commits.get() + 1);
            // the widget normalises the expression and announces it again
            if let Some(echo) = self.echo.borrow().as_ref() {
                echo(format!("{} ", self.text.borrow()));
            }
        }
    }

    fn wired() -> (Rc<CronFieldAdapter<Rc<EchoWidget>>>, Rc<EchoWidget>, Rc<RefCell<Vec<String>>>) {
        let widget = Rc::new(EchoWidget::default());
        let model = Rc::new(RefCell::new(Vec::new()));
        let sink_model = model.clone();
        let adapter = Rc::new(CronFieldAdapter::new(widget.clone(), move |v| {
            sink_model.borrow_mut().push(v)
        }));
        let weak = Rc::downgrade(&adapter);
        *widget.echo.borrow_mut() = Some(Box::new(move |v: String| {
            if let Some(adapter) = weak.upgrade() {
                adapter.on_widget_change(&v);
            }
        }));
        (adapter, widget, model)
    }

    #[test]
    fn seeding_shows_loaded_value_without_writing_back() {
        let (adapter, widget, model) = wired();
        adapter.seed("0 1 * * 6");

        assert_eq!(widget.text(), "0 1 * * 6");
        assert_eq!(widget.commits.get(), 1);
        assert!(model.borrow().is_empty());
        assert!(!adapter.is_applying());
    }

    #[test]
    fn user_edit_reaches_model_once() {
        let (adapter, _widget, model) = wired();
        assert!(adapter.on_widget_change("*/5 * * * *"));
        assert_eq!(*model.borrow(), vec!["*/5 * * * *"]);
    }

    #[test]
    fn nested_update_is_dropped() {
        let widget = Rc::new(EchoWidget::default());
        let adapter = Rc::new_cyclic(|weak: &std::rc::Weak<CronFieldAdapter<Rc<EchoWidget>>>| {
            let weak = weak.clone();
            let calls = Rc::new(Cell::new(0));
            CronFieldAdapter::new(widget.clone(), move |v| {
                calls.set(calls.get() + 1);
                // a model write that bounces straight back into the widget
                if let Some(adapter) = weak.upgrade() {
                    assert!(!adapter.on_widget_change(&v));
                }
            })
        });
        assert!(adapter.on_widget_change("0 0 * * *"));
        assert!(!adapter.is_applying());
    }
}

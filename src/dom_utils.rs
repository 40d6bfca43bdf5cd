//! dom_utils.rs – thin helper layer for the repetitive DOM work the pages do.
//!
//! Panels are built with `create_element` calls; these wrappers keep the
//! mount / show / hide / listener boilerplate out of the page modules.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlElement, HtmlInputElement};

use crate::constants::APP_CONTAINER_ID;
use crate::save_indicator::SaveState;

/// Remove the `hidden` class so the element becomes visible.
pub fn show(el: &Element) {
    let _ = el.class_list().remove_1("hidden");
    let _ = el.class_list().add_1("visible");
}

/// Hide the element by toggling CSS classes.
pub fn hide(el: &Element) {
    let _ = el.class_list().remove_1("visible");
    let _ = el.class_list().add_1("hidden");
}

pub fn set_visible(el: &Element, visible: bool) {
    if visible {
        show(el);
    } else {
        hide(el);
    }
}

pub fn clear_children(el: &Element) {
    while let Some(child) = el.first_child() {
        let _ = el.remove_child(&child);
    }
}

/// Find (or create) the panel `id` inside `#app-container` and empty it.
pub fn mount_panel(document: &Document, id: &str, class: &str) -> Result<HtmlElement, JsValue> {
    let app_container = document
        .get_element_by_id(APP_CONTAINER_ID)
        .ok_or_else(|| JsValue::from_str("app-container missing"))?;

    let panel: HtmlElement = if let Some(el) = document.get_element_by_id(id) {
        el.dyn_into()?
    } else {
        let el: HtmlElement = document.create_element("div")?.dyn_into()?;
        el.set_id(id);
        el.set_class_name(class);
        app_container.append_child(&el)?;
        el
    };
    clear_children(&panel);
    Ok(panel)
}

/// Remove a mounted panel.  No-op when it is not in the document.
pub fn unmount_panel(document: &Document, id: &str) -> Result<(), JsValue> {
    if let Some(el) = document.get_element_by_id(id) {
        if let Some(parent) = el.parent_node() {
            parent.remove_child(&el)?;
        }
    }
    Ok(())
}

pub fn element_with_text(document: &Document, tag: &str, text: &str) -> Result<Element, JsValue> {
    let el = document.create_element(tag)?;
    el.set_text_content(Some(text));
    Ok(el)
}

/// `<label for=id>` followed by an `<input type=kind id=id>`, both appended
/// to `parent`.
pub fn labeled_input(
    document: &Document,
    parent: &Element,
    id: &str,
    label: &str,
    kind: &str,
) -> Result<HtmlInputElement, JsValue> {
    let label_el = element_with_text(document, "label", label)?;
    label_el.set_attribute("for", id)?;

    let input: HtmlInputElement = document.create_element("input")?.dyn_into()?;
    input.set_id(id);
    input.set_attribute("type", kind)?;
    input.set_class_name("console-input");

    parent.append_child(&label_el)?;
    parent.append_child(&input)?;
    Ok(input)
}

pub fn button(document: &Document, label: &str, class: &str) -> Result<HtmlElement, JsValue> {
    let btn: HtmlElement = document.create_element("button")?.dyn_into()?;
    btn.set_attribute("type", "button")?;
    btn.set_inner_html(label);
    btn.set_class_name(class);
    Ok(btn)
}

pub fn set_disabled(el: &Element, disabled: bool) {
    if disabled {
        let _ = el.set_attribute("disabled", "");
    } else {
        let _ = el.remove_attribute("disabled");
    }
}

/// Attach a long-lived listener.  The closure is leaked; panels live as long
/// as the page.
pub fn on_event(target: &Element, event: &str, handler: impl FnMut(Event) + 'static) -> Result<(), JsValue> {
    let cb = Closure::wrap(Box::new(handler) as Box<dyn FnMut(_)>);
    target.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref())?;
    cb.forget();
    Ok(())
}

/// Class attribute for a form's save indicator element.
pub fn save_state_class(state: SaveState) -> String {
    match state.css_class() {
        "" => "save-state".to_string(),
        modifier => format!("save-state {}", modifier),
    }
}

pub fn render_save_state(el: &Element, state: SaveState) {
    el.set_class_name(&save_state_class(state));
    el.set_text_content(Some(state.label()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_state_classes() {
        assert_eq!(save_state_class(SaveState::Idle), "save-state");
        assert_eq!(save_state_class(SaveState::Error), "save-state error");
        assert_eq!(save_state_class(SaveState::Success), "save-state success");
    }
}

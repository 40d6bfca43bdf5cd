// src/pages/metadata.rs
//
// Metadata attributes: the configured list with a remove button per entry,
// and a small form to add one.

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{Document, Element};

use crate::constants::METADATA_PANEL_ID;
use crate::controllers::MetadataController;
use crate::dom_utils;
use crate::network::HttpTransport;
use crate::timer::Timer;

/// Mount the metadata panel and wire it to `ctrl`.
pub fn mount_metadata<H, Tm>(document: &Document, ctrl: Rc<MetadataController<H, Tm>>) -> Result<(), JsValue>
where
    H: HttpTransport + 'static,
    Tm: Timer + 'static,
{
    let panel = dom_utils::mount_panel(document, METADATA_PANEL_ID, "metadata-panel")?;
    let title = dom_utils::element_with_text(document, "h2", "Metadata Attributes")?;
    panel.append_child(&title)?;

    let list = document.create_element("ul")?;
    list.set_class_name("metadata-attributes");
    panel.append_child(&list)?;

    let form = document.create_element("form")?;
    form.set_class_name("metadata-form");
    panel.append_child(&form)?;
    // disabled until the list is loaded; saves always send the whole list
    let fieldset = document.create_element("fieldset")?;
    form.append_child(&fieldset)?;
    let input = dom_utils::labeled_input(document, &fieldset, "metadata-new", "New attribute", "text")?;
    let submit: Element = document.create_element("button")?;
    submit.set_attribute("type", "submit")?;
    submit.set_text_content(Some("Add"));
    fieldset.append_child(&submit)?;
    let save_state = document.create_element("span")?;
    form.append_child(&save_state)?;

    let weak = Rc::downgrade(&ctrl);
    {
        let weak = weak.clone();
        let target = input.clone();
        dom_utils::on_event(&input, "input", move |_e| {
            if let Some(ctrl) = weak.upgrade() {
                ctrl.set_input(target.value());
            }
        })?;
    }
    {
        let weak = weak.clone();
        dom_utils::on_event(&form, "submit", move |e| {
            e.prevent_default();
            let Some(ctrl) = weak.upgrade() else {
                return;
            };
            wasm_bindgen_futures::spawn_local(async move {
                let _ = ctrl.submit().await;
            });
        })?;
    }

    let render = {
        let weak = weak.clone();
        move || {
            let Some(ctrl) = weak.upgrade() else {
                return;
            };
            dom_utils::set_disabled(&fieldset, ctrl.is_loading());
            if let Err(e) = render_list(&list, &ctrl) {
                crate::error_log!("Failed to render metadata attributes: {:?}", e);
            }
            if input.value() != ctrl.input() {
                input.set_value(&ctrl.input());
            }
            dom_utils::render_save_state(&save_state, ctrl.save_state());
        }
    };
    render();
    ctrl.set_on_change(render);

    dom_utils::show(&panel);
    Ok(())
}

fn render_list<H, Tm>(list: &Element, ctrl: &Rc<MetadataController<H, Tm>>) -> Result<(), JsValue>
where
    H: HttpTransport + 'static,
    Tm: Timer + 'static,
{
    let document = list
        .owner_document()
        .ok_or_else(|| JsValue::from_str("detached attribute list"))?;
    dom_utils::clear_children(list);

    for attr in ctrl.attributes() {
        let item = dom_utils::element_with_text(&document, "li", &attr)?;
        let remove = dom_utils::button(&document, "Remove", "btn-link")?;
        let weak = Rc::downgrade(ctrl);
        dom_utils::on_event(&remove, "click", move |_e| {
            let Some(ctrl) = weak.upgrade() else {
                return;
            };
            let attr = attr.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let _ = ctrl.remove(&attr).await;
            });
        })?;
        item.append_child(&remove)?;
        list.append_child(&item)?;
    }
    Ok(())
}

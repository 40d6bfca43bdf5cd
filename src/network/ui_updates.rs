use std::cell::RefCell;

use js_sys::Array;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

// Number of status polls answered so far, shown next to the activity LED
thread_local! {
    static POLL_COUNTER: RefCell<u32> = const { RefCell::new(0) };
}

/// Colour class for the header badge.
pub fn status_color(status: &str) -> &'static str {
    match status {
        "running" => "green",
        "stopped" | "limit" => "yellow",
        _ => "red",
    }
}

/// Update the indexer badge in the page header.  No-op when the element
/// does not exist yet.
pub fn update_indexer_badge(status: &str) {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    if let Some(el) = document.get_element_by_id("indexer-status") {
        let class_list = el.class_list();
        for c in ["red", "yellow", "green"] {
            let _ = class_list.remove_1(c);
        }
        let _ = class_list.add_1(status_color(status));
        el.set_text_content(Some(&format!("Indexer: {}", status)));
    }
}

/// Blink the poll LED once.
pub fn flash_activity() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(led) = window.document().and_then(|d| d.get_element_by_id("poll-activity")) else {
        return;
    };

    let count = POLL_COUNTER.with(|counter| {
        let mut counter = counter.borrow_mut();
        *counter = counter.wrapping_add(1);
        *counter
    });
    led.set_text_content(Some(&format!("POLL {:04}", count)));
    led.set_class_name("flash");

    let led_clone = led.clone();
    let clear_callback = Closure::wrap(Box::new(move || {
        led_clone.set_class_name("");
    }) as Box<dyn FnMut()>);

    if let Err(e) = window.set_timeout_with_callback_and_timeout_and_arguments(
        clear_callback.as_ref().unchecked_ref(),
        150,
        &Array::new(),
    ) {
        crate::warn_log!("Failed to schedule LED reset: {:?}", e);
    }
    clear_callback.forget();
}

//! Browser console for the copyright alerts indexer: schedule, live status
//! and metadata attributes, talking to the plugin's `systemconfig` REST
//! resources.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Document;

#[macro_use]
mod macros;

pub mod components;
pub mod constants;
pub mod controllers;
pub mod dom_utils;
pub mod models;
pub mod network;
pub mod pages;
pub mod save_indicator;
pub mod timer;

#[cfg(test)]
mod test_support;

use constants::{APP_CONTAINER_ID, METADATA_PANEL_ID, SCHEDULE_PANEL_ID, STATUS_PANEL_ID};
use controllers::{MetadataController, ScheduleController, StatusController};
use network::config::ConsoleConfig;
use network::{FetchTransport, SystemConfigClient};
use timer::GlooTimer;

/// Everything a mounted console keeps alive.  Pages only hold weak
/// references to the controllers.
struct Console {
    _schedule: Rc<ScheduleController<FetchTransport, GlooTimer>>,
    status: Rc<StatusController<FetchTransport, GlooTimer>>,
    _metadata: Rc<MetadataController<FetchTransport, GlooTimer>>,
}

thread_local! {
    static CONSOLE: RefCell<Option<Console>> = const { RefCell::new(None) };
}

// Main entry point for the WASM application
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    // Initialize better panic messages
    console_error_panic_hook::set_once();

    if let Err(e) = network::init_api_config() {
        debug_log!("No build-time API base URL ({}), using relative paths", e);
    }

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global `window` exists"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("should have a document on window"))?;

    let Some(app_container) = document.get_element_by_id(APP_CONTAINER_ID) else {
        warn_log!("#{} not found, console not mounted", APP_CONTAINER_ID);
        return Ok(());
    };
    // The hosting page may point at the plugin's path without a rebuild
    if let Some(base) = app_container.get_attribute("data-api-base") {
        network::init_api_config_js(&base)?;
    }

    mount_console(&document, ConsoleConfig::default())
}

/// Tear the console down and mount it again, e.g. after
/// `init_api_config_js` pointed it at another backend.
#[wasm_bindgen]
pub fn remount() -> Result<(), JsValue> {
    teardown()?;
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    mount_console(&document, ConsoleConfig::default())
}

/// Stop status polling and remove every panel.
#[wasm_bindgen]
pub fn teardown() -> Result<(), JsValue> {
    if let Some(console) = CONSOLE.with(|c| c.borrow_mut().take()) {
        console.status.stop_polling();
        debug_log!("Console torn down");
    }
    if let Some(document) = web_sys::window().and_then(|w| w.document()) {
        for id in [SCHEDULE_PANEL_ID, STATUS_PANEL_ID, METADATA_PANEL_ID] {
            dom_utils::unmount_panel(&document, id)?;
        }
    }
    Ok(())
}

fn mount_console(document: &Document, config: ConsoleConfig) -> Result<(), JsValue> {
    let api_config = network::current_api_config();
    debug_log!("Mounting console against '{}'", api_config.base_url());

    let api = Rc::new(SystemConfigClient::new(&api_config, Rc::new(FetchTransport)));
    let timer = Rc::new(GlooTimer);

    let schedule = Rc::new(ScheduleController::new(api.clone(), timer.clone(), config.schedule_save));
    let status = Rc::new(StatusController::new(api.clone(), timer.clone(), config.poll_interval_ms));
    let metadata = Rc::new(MetadataController::new(api, timer, config.metadata_save));

    pages::mount_status(document, status.clone())?;
    pages::mount_schedule(document, schedule.clone())?;
    pages::mount_metadata(document, metadata.clone())?;

    {
        let schedule = schedule.clone();
        spawn_local(async move {
            // failures are logged by the controller
            let _ = schedule.load().await;
        });
    }
    {
        let metadata = metadata.clone();
        spawn_local(async move {
            let _ = metadata.load().await;
        });
    }
    status.start();

    CONSOLE.with(|c| {
        *c.borrow_mut() = Some(Console {
            _schedule: schedule,
            status,
            _metadata: metadata,
        })
    });
    Ok(())
}

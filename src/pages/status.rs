// src/pages/status.rs
//
// Indexer status: polled run details, on-demand progress counts, plus the
// stop and reset controls.

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{Document, Element};

use crate::constants::STATUS_PANEL_ID;
use crate::controllers::StatusController;
use crate::dom_utils;
use crate::models::StatusSnapshot;
use crate::network::ui_updates::{flash_activity, update_indexer_badge};
use crate::network::HttpTransport;
use crate::timer::Timer;

const DASH: &str = "-";

struct StatusView {
    details: Element,
    last_checked: Element,
    progress: Element,
    hosts: Element,
    stop_btn: Element,
}

/// Label / value rows shown for a status snapshot.
fn status_rows(status: Option<&StatusSnapshot>) -> Vec<(&'static str, String)> {
    let field = |value: Option<&String>| value.cloned().unwrap_or_else(|| DASH.to_string());
    match status {
        None => vec![("Status", "Loading…".to_string())],
        Some(s) => vec![
            ("Status", s.status.clone()),
            ("Stage", field(s.stage.as_ref())),
            ("Last run started", field(s.runstart.as_ref())),
            ("Last run ended", field(s.runend.as_ref())),
            ("Run time", field(s.runtime.as_ref())),
            ("Run by", field(s.host.as_ref())),
            ("Lead server", field(s.leader.as_ref())),
        ],
    }
}

impl StatusView {
    fn render<H: HttpTransport, Tm: Timer>(&self, ctrl: &StatusController<H, Tm>) -> Result<(), JsValue> {
        let document = self
            .details
            .owner_document()
            .ok_or_else(|| JsValue::from_str("detached status panel"))?;

        let status = ctrl.status();
        dom_utils::clear_children(&self.details);
        for (label, value) in status_rows(status.as_ref()) {
            let term = dom_utils::element_with_text(&document, "dt", label)?;
            let detail = dom_utils::element_with_text(&document, "dd", &value)?;
            self.details.append_child(&term)?;
            self.details.append_child(&detail)?;
        }
        if let Some(status) = &status {
            update_indexer_badge(&status.status);
        }
        dom_utils::set_visible(&self.stop_btn, status.as_ref().is_some_and(|s| s.is_running()));

        let checked = ctrl
            .last_checked()
            .map(|t| format!("Last checked {}", t.format("%H:%M:%S")))
            .unwrap_or_default();
        self.last_checked.set_text_content(Some(&checked));

        let progress = match ctrl.progress() {
            Some(p) => format!("{} files indexed, {} files queued", p.file_count, p.queue_count),
            None => String::new(),
        };
        self.progress.set_text_content(Some(&progress));

        let hosts = match ctrl.host() {
            Some(h) => format!(
                "Lead server: {}, this server: {}",
                h.leader,
                h.current.as_deref().unwrap_or(DASH)
            ),
            None => String::new(),
        };
        self.hosts.set_text_content(Some(&hosts));

        flash_activity();
        Ok(())
    }
}

/// Mount the status panel and wire it to `ctrl`.  Polling is started by the
/// caller.
pub fn mount_status<H, Tm>(document: &Document, ctrl: Rc<StatusController<H, Tm>>) -> Result<(), JsValue>
where
    H: HttpTransport + 'static,
    Tm: Timer + 'static,
{
    let panel = dom_utils::mount_panel(document, STATUS_PANEL_ID, "status-panel")?;
    let title = dom_utils::element_with_text(document, "h2", "Indexer Status")?;
    panel.append_child(&title)?;

    let details = document.create_element("dl")?;
    details.set_class_name("status-details");
    panel.append_child(&details)?;

    let last_checked = document.create_element("p")?;
    last_checked.set_class_name("last-checked");
    panel.append_child(&last_checked)?;

    let hosts = document.create_element("p")?;
    hosts.set_class_name("host-info");
    panel.append_child(&hosts)?;

    let progress = document.create_element("p")?;
    progress.set_class_name("progress");
    panel.append_child(&progress)?;

    let weak = Rc::downgrade(&ctrl);
    let controls = document.create_element("div")?;
    controls.set_class_name("status-controls");
    panel.append_child(&controls)?;

    // Progress refresh -------------------------------------------------
    let progress_btn = dom_utils::button(document, "Refresh progress", "btn-secondary")?;
    controls.append_child(&progress_btn)?;
    {
        let weak = weak.clone();
        dom_utils::on_event(&progress_btn, "click", move |_e| {
            let Some(ctrl) = weak.upgrade() else {
                return;
            };
            wasm_bindgen_futures::spawn_local(async move {
                let _ = ctrl.fetch_progress().await;
            });
        })?;
    }

    // Stop -------------------------------------------------------------
    let stop_btn = dom_utils::button(document, "Stop", "btn-danger")?;
    controls.append_child(&stop_btn)?;
    {
        let weak = weak.clone();
        dom_utils::on_event(&stop_btn, "click", move |_e| {
            let Some(ctrl) = weak.upgrade() else {
                return;
            };
            wasm_bindgen_futures::spawn_local(async move {
                let _ = ctrl.stop().await;
            });
        })?;
    }

    // Reset ------------------------------------------------------------
    let reset_btn = dom_utils::button(document, "Reset index", "btn-danger")?;
    controls.append_child(&reset_btn)?;
    {
        let weak = weak.clone();
        dom_utils::on_event(&reset_btn, "click", move |_e| {
            let confirmed = web_sys::window()
                .and_then(|w| {
                    w.confirm_with_message("Delete all indexed files, queues and host records?")
                        .ok()
                })
                .unwrap_or(false);
            if !confirmed {
                return;
            }
            let Some(ctrl) = weak.upgrade() else {
                return;
            };
            wasm_bindgen_futures::spawn_local(async move {
                let _ = ctrl.reset().await;
            });
        })?;
    }

    let view = Rc::new(StatusView {
        details,
        last_checked,
        progress,
        hosts,
        stop_btn: stop_btn.into(),
    });
    view.render(&ctrl)?;
    {
        let view = view.clone();
        ctrl.set_on_change(move || {
            if let Some(ctrl) = weak.upgrade() {
                if let Err(e) = view.render(&ctrl) {
                    crate::error_log!("Failed to render status: {:?}", e);
                }
            }
        });
    }

    dom_utils::show(&panel);
    Ok(())
}

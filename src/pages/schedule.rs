// src/pages/schedule.rs
//
// Alerts generation schedule: enable flag, cron builder, run-length limit and
// lead host, saved together.

use std::cell::Cell;
use std::rc::{Rc, Weak};

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlInputElement, HtmlSelectElement};

use crate::components::cron_field::{bind_cron_input, CronFieldAdapter, InputCronWidget};
use crate::components::integer_input::bind_integer_input;
use crate::constants::{CRON_INPUT_ID, SCHEDULE_PANEL_ID};
use crate::controllers::ScheduleController;
use crate::dom_utils;
use crate::models::{HostOptions, ScheduleConfig, SyncStatus};
use crate::network::HttpTransport;
use crate::timer::Timer;

struct ScheduleView {
    fieldset: Element,
    enable: HtmlInputElement,
    cron: Rc<CronFieldAdapter<InputCronWidget>>,
    limit: HtmlInputElement,
    limit_fields: Element,
    hours: HtmlInputElement,
    minutes: HtmlInputElement,
    leader: HtmlSelectElement,
    save_state: Element,
    sync: Element,
    seeded: Cell<bool>,
    hosts_shown: Cell<bool>,
}

impl ScheduleView {
    fn render<H: HttpTransport, Tm: Timer>(&self, ctrl: &ScheduleController<H, Tm>) {
        dom_utils::set_disabled(&self.fieldset, ctrl.is_loading());
        dom_utils::render_save_state(&self.save_state, ctrl.save_state());

        if let Some(schedule) = ctrl.schedule() {
            if !self.seeded.replace(true) {
                self.fill(&schedule);
            }
            dom_utils::set_visible(&self.limit_fields, schedule.limit);
        }
        if let Some(host) = ctrl.host() {
            if !self.hosts_shown.replace(true) {
                let _ = self.fill_hosts(&host);
            }
        }
        let _ = self.render_sync(ctrl.last_sync());
    }

    fn fill(&self, schedule: &ScheduleConfig) {
        self.enable.set_checked(schedule.is_enabled());
        self.cron.seed(&schedule.cron);
        self.limit.set_checked(schedule.limit);
        self.hours.set_value(&schedule.hours.to_string());
        self.minutes.set_value(&schedule.minutes.to_string());
    }

    fn fill_hosts(&self, host: &HostOptions) -> Result<(), JsValue> {
        dom_utils::clear_children(&self.leader);
        let document = self
            .leader
            .owner_document()
            .ok_or_else(|| JsValue::from_str("detached select"))?;
        for name in &host.options {
            let label = match host.current.as_deref() {
                Some(current) if current == name => format!("{} (this server)", name),
                _ => name.clone(),
            };
            let option = dom_utils::element_with_text(&document, "option", &label)?;
            option.set_attribute("value", name)?;
            self.leader.append_child(&option)?;
        }
        self.leader.set_value(&host.leader);
        Ok(())
    }

    fn render_sync(&self, sync: Option<SyncStatus>) -> Result<(), JsValue> {
        dom_utils::clear_children(&self.sync);
        let Some(sync) = sync else {
            return Ok(());
        };
        let document = self
            .sync
            .owner_document()
            .ok_or_else(|| JsValue::from_str("detached sync list"))?;
        for (title, hosts, class) in [
            ("Configuration synced to", &sync.sync_success, "sync-success"),
            ("Configuration failed to sync to", &sync.sync_failure, "sync-failure"),
        ] {
            if hosts.is_empty() {
                continue;
            }
            let heading = dom_utils::element_with_text(&document, "h4", title)?;
            let list = document.create_element("ul")?;
            list.set_class_name(class);
            for host in hosts {
                let item = dom_utils::element_with_text(&document, "li", host)?;
                list.append_child(&item)?;
            }
            self.sync.append_child(&heading)?;
            self.sync.append_child(&list)?;
        }
        Ok(())
    }
}

fn checkbox_listener<H, Tm>(
    input: &HtmlInputElement,
    ctrl: Weak<ScheduleController<H, Tm>>,
    apply: impl Fn(&ScheduleController<H, Tm>, bool) + 'static,
) -> Result<(), JsValue>
where
    H: HttpTransport + 'static,
    Tm: Timer + 'static,
{
    let target = input.clone();
    dom_utils::on_event(input, "change", move |_e| {
        if let Some(ctrl) = ctrl.upgrade() {
            apply(&ctrl, target.checked());
        }
    })
}

/// Mount the schedule panel and wire it to `ctrl`.
pub fn mount_schedule<H, Tm>(document: &Document, ctrl: Rc<ScheduleController<H, Tm>>) -> Result<(), JsValue>
where
    H: HttpTransport + 'static,
    Tm: Timer + 'static,
{
    let panel = dom_utils::mount_panel(document, SCHEDULE_PANEL_ID, "schedule-panel")?;
    let title = dom_utils::element_with_text(document, "h2", "Alerts Generation Schedule")?;
    panel.append_child(&title)?;

    let fieldset = document.create_element("fieldset")?;
    panel.append_child(&fieldset)?;
    let weak = Rc::downgrade(&ctrl);

    // Enable -----------------------------------------------------------
    let enable = dom_utils::labeled_input(document, &fieldset, "schedule-enable", "Enable alerts generation", "checkbox")?;
    checkbox_listener(&enable, weak.clone(), |c, v| c.set_enabled(v))?;

    // Cron builder -----------------------------------------------------
    let cron_input = dom_utils::labeled_input(document, &fieldset, CRON_INPUT_ID, "Run at", "text")?;
    let cron = {
        let weak = weak.clone();
        Rc::new(CronFieldAdapter::new(InputCronWidget::new(cron_input), move |value| {
            if let Some(ctrl) = weak.upgrade() {
                ctrl.set_cron(value);
            }
        }))
    };
    bind_cron_input(cron.clone())?;

    // Limit ------------------------------------------------------------
    let limit = dom_utils::labeled_input(document, &fieldset, "schedule-limit", "Limit run time", "checkbox")?;
    let limit_fields = document.create_element("div")?;
    limit_fields.set_class_name("limit-fields");
    fieldset.append_child(&limit_fields)?;
    {
        let limit_fields = limit_fields.clone();
        checkbox_listener(&limit, weak.clone(), move |c, v| {
            c.set_limit(v);
            dom_utils::set_visible(&limit_fields, v);
        })?;
    }

    let hours = dom_utils::labeled_input(document, &limit_fields, "schedule-hours", "Hours", "text")?;
    {
        let weak = weak.clone();
        bind_integer_input(&hours, move |v| {
            if let Some(ctrl) = weak.upgrade() {
                ctrl.set_limit_hours(v);
            }
        })?;
    }
    let minutes = dom_utils::labeled_input(document, &limit_fields, "schedule-minutes", "Minutes", "text")?;
    {
        let weak = weak.clone();
        bind_integer_input(&minutes, move |v| {
            if let Some(ctrl) = weak.upgrade() {
                ctrl.set_limit_minutes(v);
            }
        })?;
    }

    // Lead host --------------------------------------------------------
    let leader_label = dom_utils::element_with_text(document, "label", "Lead server")?;
    leader_label.set_attribute("for", "schedule-leader")?;
    let leader: HtmlSelectElement = document.create_element("select")?.dyn_into()?;
    leader.set_id("schedule-leader");
    fieldset.append_child(&leader_label)?;
    fieldset.append_child(&leader)?;
    {
        let weak = weak.clone();
        let target = leader.clone();
        dom_utils::on_event(&leader, "change", move |_e| {
            if let Some(ctrl) = weak.upgrade() {
                ctrl.set_leader(target.value());
            }
        })?;
    }

    // Save -------------------------------------------------------------
    let save_btn = dom_utils::button(document, "Save", "btn-primary")?;
    fieldset.append_child(&save_btn)?;
    let save_state = document.create_element("span")?;
    fieldset.append_child(&save_state)?;
    {
        let weak = weak.clone();
        dom_utils::on_event(&save_btn, "click", move |_e| {
            let Some(ctrl) = weak.upgrade() else {
                return;
            };
            wasm_bindgen_futures::spawn_local(async move {
                // failures end up in the save indicator
                let _ = ctrl.save_schedule().await;
            });
        })?;
    }

    let sync = document.create_element("div")?;
    sync.set_class_name("sync-status");
    panel.append_child(&sync)?;

    let view = Rc::new(ScheduleView {
        fieldset,
        enable,
        cron,
        limit,
        limit_fields,
        hours,
        minutes,
        leader,
        save_state,
        sync,
        seeded: Cell::new(false),
        hosts_shown: Cell::new(false),
    });
    view.render(&ctrl);
    {
        let view = view.clone();
        ctrl.set_on_change(move || {
            if let Some(ctrl) = weak.upgrade() {
                view.render(&ctrl);
            }
        });
    }

    dom_utils::show(&panel);
    Ok(())
}

#![forbid(unsafe_code)]

//! `wasm-bindgen` exports for the counter SPA.
//!
//! This module wraps [`super::spa_core::SpaCore`] and executes its
//! [`HostAction`] lists against the DOM, the History API, and timers.
//! Only compiled on `wasm32` targets.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Reflect;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, Window};

use tally_core::app::HostAction;
use tally_core::snapshot::StateSnapshot;
use tally_core::widget::{DisplayModel, IDLE_STATUS};

use super::spa_core::{SpaCore, snapshot_json};

fn console_error(msg: &str) {
    let global = js_sys::global();
    let Ok(console) = Reflect::get(&global, &"console".into()) else {
        return;
    };
    let Ok(error) = Reflect::get(&console, &"error".into()) else {
        return;
    };
    let Ok(error_fn) = error.dyn_into::<js_sys::Function>() else {
        return;
    };
    let _ = error_fn.call1(&console, &JsValue::from_str(msg));
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            // Keep it simple and robust: always print something useful.
            let msg = if let Some(loc) = info.location() {
                format!(
                    "panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                )
            } else {
                format!("panic: {info}")
            };
            console_error(&msg);
        }));
    });
}

fn window() -> Option<Window> {
    web_sys::window()
}

fn document() -> Option<Document> {
    window()?.document()
}

fn element_by_id(id: &str) -> Option<Element> {
    document()?.get_element_by_id(id)
}

fn set_text(id: &str, text: &str) {
    if let Some(el) = element_by_id(id) {
        el.set_text_content(Some(text));
    }
}

fn set_timeout(callback: &Closure<dyn FnMut()>, delay_ms: i32) -> Option<i32> {
    window()?
        .set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            delay_ms,
        )
        .ok()
}

fn clear_timeout(handle: i32) {
    if let Some(win) = window() {
        win.clear_timeout_with_handle(handle);
    }
}

/// Shared mutable state behind the event closures. Timer closures are
/// kept alive here until they fire or are superseded.
struct Shell {
    core: SpaCore,
    keydown: Option<Closure<dyn FnMut(web_sys::KeyboardEvent)>>,
    status_revert: Option<(i32, Closure<dyn FnMut()>)>,
    updating_clear: Option<(i32, Closure<dyn FnMut()>)>,
}

type SharedShell = Rc<RefCell<Shell>>;

/// Browser shell for the Tally counter SPA.
///
/// The bootstrap script constructs one instance, optionally reports a
/// failed backend self-check, and calls [`CounterSpa::start`] once.
/// All later activity flows through the event listeners installed here.
#[wasm_bindgen]
pub struct CounterSpa {
    shell: SharedShell,
    // Installed once for the app's lifetime; kept so they are not freed.
    _click: Option<Closure<dyn FnMut(web_sys::MouseEvent)>>,
    _popstate: Option<Closure<dyn FnMut(web_sys::PopStateEvent)>>,
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    install_panic_hook();
}

#[wasm_bindgen]
impl CounterSpa {
    /// Create the SPA against the current location. `base_path` is the
    /// prefix the app is deployed under, or empty for root.
    #[wasm_bindgen(constructor)]
    pub fn new(base_path: Option<String>) -> Self {
        install_panic_hook();
        let location_path = window()
            .and_then(|w| w.location().pathname().ok())
            .unwrap_or_else(|| "/".to_owned());
        Self {
            shell: Rc::new(RefCell::new(Shell {
                core: SpaCore::new(base_path, &location_path),
                keydown: None,
                status_revert: None,
                updating_clear: None,
            })),
            _click: None,
            _popstate: None,
        }
    }

    /// Record a failed backend self-check. Call before [`start`];
    /// the session then runs read-only on whatever state history holds.
    #[wasm_bindgen(js_name = failBackend)]
    pub fn fail_backend(&mut self, reason: &str) {
        self.shell.borrow_mut().core.report_backend_failure(reason);
    }

    /// Install the global listeners and perform the initial dispatch.
    /// Call exactly once, after the module is instantiated.
    pub fn start(&mut self) {
        {
            let mut shell = self.shell.borrow_mut();
            if !shell.core.backend_ready() {
                // Not failed either: the normal healthy path.
                shell.core.report_backend_ready();
            }
        }
        self.install_click_delegation();
        self.install_popstate();

        let state_json = current_history_state_json();
        let actions = self
            .shell
            .borrow_mut()
            .core
            .startup(state_json.as_deref());
        apply_actions(&self.shell, &actions);
    }
}

impl CounterSpa {
    fn install_click_delegation(&mut self) {
        let Some(doc) = document() else {
            return;
        };
        let handle = Rc::clone(&self.shell);
        let closure = Closure::wrap(Box::new(move |event: web_sys::MouseEvent| {
            on_click(&handle, &event);
        }) as Box<dyn FnMut(_)>);
        if doc
            .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
            .is_ok()
        {
            self._click = Some(closure);
        }
    }

    fn install_popstate(&mut self) {
        let Some(win) = window() else {
            return;
        };
        let handle = Rc::clone(&self.shell);
        let closure = Closure::wrap(Box::new(move |event: web_sys::PopStateEvent| {
            let state = event.state();
            let state_json = js_state_to_json(&state);
            let path = window()
                .and_then(|w| w.location().pathname().ok())
                .unwrap_or_else(|| "/".to_owned());
            let actions = handle
                .borrow_mut()
                .core
                .handle_popstate(&path, state_json.as_deref());
            apply_actions(&handle, &actions);
        }) as Box<dyn FnMut(_)>);
        if win
            .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref())
            .is_ok()
        {
            self._popstate = Some(closure);
        }
    }
}

/// Single delegated click handler: nav links carry `data-route`, the
/// widget and test-view buttons are matched by id.
fn on_click(shell: &SharedShell, event: &web_sys::MouseEvent) {
    let Some(target) = event
        .target()
        .and_then(|t| t.dyn_into::<Element>().ok())
    else {
        return;
    };

    if let Ok(Some(link)) = target.closest("[data-route]") {
        if let Some(path) = link.get_attribute("data-route") {
            event.prevent_default();
            let actions = shell.borrow_mut().core.navigate(&path);
            apply_actions(shell, &actions);
        }
        return;
    }

    let Ok(Some(button)) = target.closest("button") else {
        return;
    };
    match button.id().as_str() {
        "btn-increment" => perform(shell, "increment"),
        "btn-decrement" => perform(shell, "decrement"),
        "btn-reset" => perform(shell, "reset"),
        "run-tests" => {
            let html = shell.borrow_mut().core.run_checks_html();
            if let Some(el) = element_by_id("test-results") {
                el.set_inner_html(&html);
            }
        }
        "run-benchmarks" => {
            let html = shell.borrow_mut().core.run_benchmarks_html();
            if let Some(el) = element_by_id("benchmark-results") {
                el.set_inner_html(&html);
            }
        }
        _ => {}
    }
}

fn perform(shell: &SharedShell, op_name: &str) {
    let actions = shell.borrow_mut().core.perform_named(op_name);
    apply_actions(shell, &actions);
}

fn apply_actions(shell: &SharedShell, actions: &[HostAction]) {
    for action in actions {
        match action {
            HostAction::SetContent { html } => {
                if let Some(el) = element_by_id("app") {
                    el.set_inner_html(html);
                }
            }
            HostAction::MountCounterWidget => mount_keydown(shell),
            HostAction::TeardownCounterWidget => unmount_keydown(shell),
            HostAction::MountTestView => {
                // Buttons are handled by the delegated click listener.
            }
            HostAction::PushHistory { url, snapshot } => {
                push_history(url, *snapshot);
            }
            HostAction::ReplaceHistory { url, snapshot } => {
                replace_history(url, *snapshot);
            }
            HostAction::SetNavActive { path } => set_nav_active(path),
            HostAction::SetDisplay(display) => set_display(display),
            HostAction::SetStatus {
                text,
                revert_after_ms,
            } => set_status(shell, text, *revert_after_ms),
            HostAction::MarkUpdating { clear_after_ms } => {
                mark_updating(shell, *clear_after_ms);
            }
        }
    }
}

fn mount_keydown(shell: &SharedShell) {
    if shell.borrow().keydown.is_some() {
        return;
    }
    let Some(doc) = document() else {
        return;
    };
    let handle = Rc::clone(shell);
    let closure = Closure::wrap(Box::new(move |event: web_sys::KeyboardEvent| {
        let actions = handle.borrow_mut().core.handle_key(
            &event.key(),
            event.ctrl_key(),
            event.meta_key(),
        );
        if actions.is_empty() {
            return;
        }
        event.prevent_default();
        apply_actions(&handle, &actions);
    }) as Box<dyn FnMut(_)>);
    if doc
        .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())
        .is_ok()
    {
        shell.borrow_mut().keydown = Some(closure);
    }
}

fn unmount_keydown(shell: &SharedShell) {
    let Some(closure) = shell.borrow_mut().keydown.take() else {
        return;
    };
    if let Some(doc) = document() {
        let _ = doc
            .remove_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
    }
}

fn current_history_state_json() -> Option<String> {
    let state = window()?.history().ok()?.state().ok()?;
    js_state_to_json(&state)
}

fn js_state_to_json(state: &JsValue) -> Option<String> {
    if state.is_null() || state.is_undefined() {
        return None;
    }
    js_sys::JSON::stringify(state).ok().map(String::from)
}

fn snapshot_to_js(snapshot: StateSnapshot) -> JsValue {
    js_sys::JSON::parse(&snapshot_json(snapshot)).unwrap_or(JsValue::NULL)
}

fn push_history(url: &str, snapshot: Option<StateSnapshot>) {
    let state = snapshot.map_or(JsValue::NULL, snapshot_to_js);
    if let Some(history) = window().and_then(|w| w.history().ok()) {
        let _ = history.push_state_with_url(&state, "", Some(url));
    }
}

fn replace_history(url: &str, snapshot: StateSnapshot) {
    if let Some(history) = window().and_then(|w| w.history().ok()) {
        let _ = history.replace_state_with_url(&snapshot_to_js(snapshot), "", Some(url));
    }
}

fn set_nav_active(path: &str) {
    let Some(doc) = document() else {
        return;
    };
    let Ok(links) = doc.query_selector_all("[data-route]") else {
        return;
    };
    for i in 0..links.length() {
        let Some(el) = links.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
            continue;
        };
        let matches = el.get_attribute("data-route").as_deref() == Some(path);
        let classes = el.class_list();
        if matches {
            let _ = classes.add_1("active");
        } else {
            let _ = classes.remove_1("active");
        }
    }
}

fn set_display(display: &DisplayModel) {
    if let Some(el) = element_by_id("counter-display") {
        el.set_text_content(Some(&display.value.to_string()));
        if let Ok(html_el) = el.dyn_into::<HtmlElement>() {
            let style = html_el.style();
            let _ = style.set_property("color", display.color);
            let _ = style.set_property("font-size", display.font_size);
        }
    }
    set_text("total-ops", &display.total_operations.to_string());
    if let Some(doc) = document() {
        doc.set_title(&display.title);
    }
}

fn set_status(shell: &SharedShell, text: &str, revert_after_ms: Option<u32>) {
    set_text("perf-info", text);

    if let Some((handle, _)) = shell.borrow_mut().status_revert.take() {
        clear_timeout(handle);
    }
    let Some(delay) = revert_after_ms else {
        // Persistent status (degraded mode): no revert.
        return;
    };

    let closure = Closure::wrap(Box::new(move || {
        set_text("perf-info", IDLE_STATUS);
    }) as Box<dyn FnMut()>);
    if let Some(handle) = set_timeout(&closure, delay as i32) {
        shell.borrow_mut().status_revert = Some((handle, closure));
    }
}

fn mark_updating(shell: &SharedShell, clear_after_ms: u32) {
    let Some(el) = element_by_id("counter-display") else {
        return;
    };
    let _ = el.class_list().add_1("updating");

    if let Some((handle, _)) = shell.borrow_mut().updating_clear.take() {
        clear_timeout(handle);
    }
    let closure = Closure::wrap(Box::new(move || {
        if let Some(el) = element_by_id("counter-display") {
            let _ = el.class_list().remove_1("updating");
        }
    }) as Box<dyn FnMut()>);
    if let Some(handle) = set_timeout(&closure, clear_after_ms as i32) {
        shell.borrow_mut().updating_clear = Some((handle, closure));
    }
}

//! wasm entry point.

use std::cell::RefCell;

use scrollchain_core::{DetachHandle, OverscrollBehavior};
use scrollchain_platform_web::{attach_by_id, navigator_capability, web_chaining, WebScrollChaining};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlElement, HtmlSelectElement};

use crate::{
    demo_config, selected_behavior, strategy_from_query, BEHAVIOR_SELECT_ID,
    BEHAVIOR_TARGET_SELECTORS, CURRENT_BEHAVIOR_SELECTOR, DEVICE_INFO_ID, PLATFORM_INFO_ID,
    SCROLL_CONTENT_ID,
};

struct BehaviorListener {
    select: Element,
    closure: Closure<dyn FnMut(Event)>,
}

impl BehaviorListener {
    fn remove(self) {
        if let Err(err) = self
            .select
            .remove_event_listener_with_callback("change", self.closure.as_ref().unchecked_ref())
        {
            log::warn!("failed to remove behavior select listener: {err:?}");
        }
    }
}

struct DemoState {
    chaining: WebScrollChaining,
    handle: DetachHandle,
    behavior_listener: Option<BehaviorListener>,
}

thread_local! {
    static DEMO: RefCell<Option<DemoState>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::new(log::Level::Debug));

    let window = web_sys::window().ok_or("no global window exists")?;
    let document = window.document().ok_or("should have a document on window")?;

    let query = window.location().search().unwrap_or_default();
    let mut chaining = web_chaining(demo_config(strategy_from_query(&query)))?;
    let handle = attach_by_id(&mut chaining, SCROLL_CONTENT_ID)?;

    let behavior_listener = wire_behavior_select(&document)?;
    apply_overscroll_behavior(&document, OverscrollBehavior::Auto);
    fill_device_info(&window, &document);

    if !handle.is_inert() {
        log::info!("scroll chaining enabled for #{SCROLL_CONTENT_ID}");
    }

    DEMO.with(|demo| {
        *demo.borrow_mut() = Some(DemoState {
            chaining,
            handle,
            behavior_listener,
        });
    });
    Ok(())
}

/// Logs and returns the controller state.
#[wasm_bindgen]
pub fn debug_scroll_chaining() -> String {
    let report = DEMO.with(|demo| match demo.borrow().as_ref() {
        Some(state) => match state.handle.snapshot() {
            Some(snapshot) => snapshot.to_string(),
            None => format!("inactive ({:?})", state.handle),
        },
        None => "not started".to_string(),
    });
    log::info!("{report}");
    report
}

#[wasm_bindgen]
pub fn detach_scroll_chaining() {
    DEMO.with(|demo| {
        if let Some(state) = demo.borrow_mut().as_mut() {
            state.chaining.detach_all();
            if let Some(listener) = state.behavior_listener.take() {
                listener.remove();
            }
        }
    });
}

fn wire_behavior_select(document: &Document) -> Result<Option<BehaviorListener>, JsValue> {
    let Some(select) = document.get_element_by_id(BEHAVIOR_SELECT_ID) else {
        return Ok(None);
    };

    let document_for_closure = document.clone();
    let closure = Closure::wrap(Box::new(move |event: Event| {
        let Some(select) = event
            .target()
            .and_then(|target| target.dyn_into::<HtmlSelectElement>().ok())
        else {
            return;
        };
        let behavior = selected_behavior(&select.value());
        apply_overscroll_behavior(&document_for_closure, behavior);
    }) as Box<dyn FnMut(Event)>);

    select.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())?;
    Ok(Some(BehaviorListener { select, closure }))
}

fn apply_overscroll_behavior(document: &Document, behavior: OverscrollBehavior) {
    for selector in BEHAVIOR_TARGET_SELECTORS {
        let element = document
            .query_selector(selector)
            .ok()
            .flatten()
            .and_then(|element| element.dyn_into::<HtmlElement>().ok());
        if let Some(element) = element {
            if let Err(err) = element
                .style()
                .set_property("overscroll-behavior", behavior.as_css())
            {
                log::warn!("failed to apply overscroll-behavior to {selector}: {err:?}");
            }
        }
    }

    if let Ok(labels) = document.query_selector_all(CURRENT_BEHAVIOR_SELECTOR) {
        for index in 0..labels.length() {
            if let Some(label) = labels.get(index) {
                label.set_text_content(Some(behavior.as_css()));
            }
        }
    }
    log::info!("applied overscroll-behavior: {behavior}");
}

fn fill_device_info(window: &web_sys::Window, document: &Document) {
    let capability = navigator_capability(window);
    if let Some(slot) = document.get_element_by_id(DEVICE_INFO_ID) {
        slot.set_text_content(Some(capability.device_kind().label()));
    }
    if let Some(slot) = document.get_element_by_id(PLATFORM_INFO_ID) {
        let platform = window
            .navigator()
            .platform()
            .ok()
            .filter(|platform| !platform.is_empty())
            .unwrap_or_else(|| "Unknown".to_string());
        slot.set_text_content(Some(&platform));
    }
}

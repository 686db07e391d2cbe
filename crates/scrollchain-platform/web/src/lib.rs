//! Web platform adapter for scroll chaining.
//!
//! Implements the core platform traits on top of `web-sys`: DOM listeners for
//! touch and scroll events, `requestAnimationFrame` for frame callbacks,
//! `window.scrollBy` for the page, and the navigator for capability checks.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use scrollchain_core::{
    ChainingConfig, ChainingEnvironment, EventDisposition, FrameRequestId, FrameScheduler,
    InputEvent, InputKind, InputListener, ListenerKey, Page, ScrollChaining, ScrollElement,
    ScrollMetrics, StyleTarget, SystemClock, UserAgentCapability,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{AddEventListenerOptions, Document, Event, HtmlElement, TouchEvent, Window};

pub type WebScrollChaining = ScrollChaining<WebScrollElement, WebPage>;

fn inline_property(element: &HtmlElement, name: &str) -> Option<String> {
    match element.style().get_property_value(name) {
        Ok(value) if !value.is_empty() => Some(value),
        Ok(_) => None,
        Err(err) => {
            log::warn!("failed to read style {name}: {err:?}");
            None
        }
    }
}

macro_rules! impl_style_target {
    ($ty:ty, $field:ident) => {
        impl StyleTarget for $ty {
            fn style_property(&self, name: &str) -> Option<String> {
                inline_property(&self.$field, name)
            }

            fn set_style_property(&self, name: &str, value: &str) {
                if let Err(err) = self.$field.style().set_property(name, value) {
                    log::warn!("failed to set style {name}: {err:?}");
                }
            }

            fn remove_style_property(&self, name: &str) {
                if let Err(err) = self.$field.style().remove_property(name) {
                    log::warn!("failed to remove style {name}: {err:?}");
                }
            }

            fn has_class(&self, class: &str) -> bool {
                self.$field.class_list().contains(class)
            }

            fn add_class(&self, class: &str) {
                if let Err(err) = self.$field.class_list().add_1(class) {
                    log::warn!("failed to add class {class}: {err:?}");
                }
            }

            fn remove_class(&self, class: &str) {
                if let Err(err) = self.$field.class_list().remove_1(class) {
                    log::warn!("failed to remove class {class}: {err:?}");
                }
            }
        }
    };
}

struct RegisteredListener {
    kind: InputKind,
    closure: Closure<dyn FnMut(Event)>,
}

/// A DOM element acting as the inner scroller.
pub struct WebScrollElement {
    element: HtmlElement,
    listeners: RefCell<HashMap<ListenerKey, RegisteredListener>>,
    next_key: Cell<u64>,
}

impl_style_target!(WebScrollElement, element);

impl WebScrollElement {
    pub fn new(element: HtmlElement) -> Rc<Self> {
        Rc::new(Self {
            element,
            listeners: RefCell::new(HashMap::new()),
            next_key: Cell::new(1),
        })
    }

    /// Looks up `#id` in `document`.
    pub fn by_id(document: &Document, id: &str) -> Option<Rc<Self>> {
        document
            .get_element_by_id(id)
            .and_then(|element| element.dyn_into::<HtmlElement>().ok())
            .map(Self::new)
    }

    pub fn element(&self) -> &HtmlElement {
        &self.element
    }
}

impl ScrollElement for WebScrollElement {
    /// `scrollTop` comes back truncated to whole pixels, so a fractional
    /// offset below 1 reads as the top edge.
    fn metrics(&self) -> ScrollMetrics {
        ScrollMetrics::new(
            self.element.scroll_top() as f64,
            self.element.client_height() as f64,
            self.element.scroll_height() as f64,
        )
    }

    fn add_listener(&self, kind: InputKind, listener: InputListener) -> Option<ListenerKey> {
        let closure = Closure::wrap(Box::new(move |event: Event| {
            // Only the first active touch point is consulted.
            let touch_y = event
                .dyn_ref::<TouchEvent>()
                .and_then(|touch_event| touch_event.touches().get(0))
                .map(|touch| touch.client_y() as f64);
            let input = InputEvent { kind, touch_y };
            if listener(&input) == EventDisposition::PreventDefault {
                event.prevent_default();
            }
        }) as Box<dyn FnMut(Event)>);

        let options = AddEventListenerOptions::new();
        options.set_passive(kind.is_passive());
        if let Err(err) = self
            .element
            .add_event_listener_with_callback_and_add_event_listener_options(
                kind.event_type(),
                closure.as_ref().unchecked_ref(),
                &options,
            )
        {
            log::warn!("failed to add {} listener: {err:?}", kind.event_type());
            return None;
        }

        let key = ListenerKey(self.next_key.get());
        self.next_key.set(key.0 + 1);
        self.listeners
            .borrow_mut()
            .insert(key, RegisteredListener { kind, closure });
        Some(key)
    }

    fn remove_listener(&self, key: ListenerKey) {
        let Some(registered) = self.listeners.borrow_mut().remove(&key) else {
            return;
        };
        // Works on detached nodes too; the listener table lives on the node.
        if let Err(err) = self.element.remove_event_listener_with_callback(
            registered.kind.event_type(),
            registered.closure.as_ref().unchecked_ref(),
        ) {
            log::warn!(
                "failed to remove {} listener: {err:?}",
                registered.kind.event_type()
            );
        }
    }

    fn same_element(&self, other: &Self) -> bool {
        self.element == other.element
    }
}

/// The browser window as the outer scroll surface.
pub struct WebPage {
    window: Window,
    body: HtmlElement,
}

impl_style_target!(WebPage, body);

impl WebPage {
    pub fn new(window: Window) -> Result<Rc<Self>, JsValue> {
        let document = window.document().ok_or("window has no document")?;
        let body = document.body().ok_or("document has no body")?;
        Ok(Rc::new(Self { window, body }))
    }

    pub fn body(&self) -> &HtmlElement {
        &self.body
    }
}

impl Page for WebPage {
    fn scroll_by(&self, dy: f64) {
        self.window.scroll_by_with_x_and_y(0.0, dy);
    }
}

/// `requestAnimationFrame`-backed frame scheduler.
pub struct WebFrameScheduler {
    window: Window,
}

impl WebFrameScheduler {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl FrameScheduler for WebFrameScheduler {
    fn request_frame(&self, callback: Box<dyn FnOnce(f64) + 'static>) -> Option<FrameRequestId> {
        let closure = Closure::once_into_js(move |timestamp: f64| callback(timestamp));
        match self.window.request_animation_frame(closure.unchecked_ref()) {
            Ok(id) => Some(FrameRequestId(id as i64)),
            Err(err) => {
                log::warn!("requestAnimationFrame failed: {err:?}");
                None
            }
        }
    }

    fn cancel_frame(&self, id: FrameRequestId) {
        if let Err(err) = self.window.cancel_animation_frame(id.0 as i32) {
            log::warn!("cancelAnimationFrame failed: {err:?}");
        }
    }
}

/// Reads the user agent and touch support from `navigator`.
pub fn navigator_capability(window: &Window) -> UserAgentCapability {
    let navigator = window.navigator();
    let user_agent = navigator.user_agent().unwrap_or_default();
    let touch_points = navigator.max_touch_points().max(0) as u32;
    UserAgentCapability::new(user_agent).with_max_touch_points(touch_points)
}

/// Builds the environment for the current window.
pub fn web_environment(window: &Window) -> ChainingEnvironment {
    ChainingEnvironment::new(
        Rc::new(SystemClock::new()),
        Rc::new(WebFrameScheduler::new(window.clone())),
        Rc::new(navigator_capability(window)),
    )
}

/// Creates a [`WebScrollChaining`] for the current window.
pub fn web_chaining(config: ChainingConfig) -> Result<WebScrollChaining, JsValue> {
    let window = web_sys::window().ok_or("no global window exists")?;
    let env = web_environment(&window);
    let page = WebPage::new(window)?;
    Ok(ScrollChaining::new(page, env, config))
}

/// Attaches to `#element_id`. A missing element yields an inert handle.
pub fn attach_by_id(
    chaining: &mut WebScrollChaining,
    element_id: &str,
) -> Result<scrollchain_core::DetachHandle, JsValue> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or("should have a document on window")?;
    Ok(chaining.attach(WebScrollElement::by_id(&document, element_id)))
}

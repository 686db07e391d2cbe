//! In-memory stand-ins for the host platform.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use scrollchain_core::{
    Clock, EventDisposition, FrameRequestId, FrameScheduler, InputEvent, InputKind, InputListener,
    ListenerKey, Page, ScrollElement, ScrollMetrics, StyleTarget,
};

/// Milliseconds between simulated frames.
pub const FRAME_INTERVAL_MS: f64 = 16.0;

/// Inline styles and class list of a fake node.
#[derive(Debug, Default)]
pub struct FakeStyles {
    properties: RefCell<BTreeMap<String, String>>,
    classes: RefCell<BTreeSet<String>>,
}

impl FakeStyles {
    pub fn properties(&self) -> BTreeMap<String, String> {
        self.properties.borrow().clone()
    }

    pub fn classes(&self) -> BTreeSet<String> {
        self.classes.borrow().clone()
    }
}

impl StyleTarget for FakeStyles {
    fn style_property(&self, name: &str) -> Option<String> {
        self.properties.borrow().get(name).cloned()
    }

    fn set_style_property(&self, name: &str, value: &str) {
        self.properties
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
    }

    fn remove_style_property(&self, name: &str) {
        self.properties.borrow_mut().remove(name);
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.borrow().contains(class)
    }

    fn add_class(&self, class: &str) {
        self.classes.borrow_mut().insert(class.to_string());
    }

    fn remove_class(&self, class: &str) {
        self.classes.borrow_mut().remove(class);
    }
}

macro_rules! delegate_style_target {
    ($ty:ty, $field:ident) => {
        impl StyleTarget for $ty {
            fn style_property(&self, name: &str) -> Option<String> {
                self.$field.style_property(name)
            }
            fn set_style_property(&self, name: &str, value: &str) {
                self.$field.set_style_property(name, value)
            }
            fn remove_style_property(&self, name: &str) {
                self.$field.remove_style_property(name)
            }
            fn has_class(&self, class: &str) -> bool {
                self.$field.has_class(class)
            }
            fn add_class(&self, class: &str) {
                self.$field.add_class(class)
            }
            fn remove_class(&self, class: &str) {
                self.$field.remove_class(class)
            }
        }
    };
}

struct RegisteredListener {
    key: ListenerKey,
    kind: InputKind,
    passive: bool,
    listener: InputListener,
}

/// A scrollable element with settable metrics and a listener table.
pub struct FakeScrollElement {
    id: u32,
    metrics: Cell<ScrollMetrics>,
    listeners: RefCell<Vec<RegisteredListener>>,
    next_key: Cell<u64>,
    connected: Cell<bool>,
    styles: FakeStyles,
}

delegate_style_target!(FakeScrollElement, styles);

impl FakeScrollElement {
    pub fn new(id: u32, metrics: ScrollMetrics) -> Rc<Self> {
        Rc::new(Self {
            id,
            metrics: Cell::new(metrics),
            listeners: RefCell::new(Vec::new()),
            next_key: Cell::new(1),
            connected: Cell::new(true),
            styles: FakeStyles::default(),
        })
    }

    /// A 400px tall element over 1000px of content.
    pub fn scroller(id: u32, scroll_offset: f64) -> Rc<Self> {
        Self::new(id, ScrollMetrics::new(scroll_offset, 400.0, 1000.0))
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn styles(&self) -> &FakeStyles {
        &self.styles
    }

    pub fn set_metrics(&self, metrics: ScrollMetrics) {
        self.metrics.set(metrics);
    }

    /// Moves the scroll offset, clamped to the scrollable range.
    pub fn set_scroll_offset(&self, offset: f64) {
        let mut metrics = self.metrics.get();
        metrics.scroll_offset = offset.clamp(0.0, metrics.max_offset());
        self.metrics.set(metrics);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn listener_count_for(&self, kind: InputKind) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|registered| registered.kind == kind)
            .count()
    }

    /// Whether every listener for `kind` was registered passive.
    pub fn is_passive(&self, kind: InputKind) -> bool {
        self.listeners
            .borrow()
            .iter()
            .filter(|registered| registered.kind == kind)
            .all(|registered| registered.passive)
    }

    /// Simulates removal from the document. Listeners stay registered but
    /// no longer receive events.
    pub fn remove_from_document(&self) {
        self.connected.set(false);
    }

    pub fn is_connected(&self) -> bool {
        self.connected.get()
    }

    /// Delivers `event` to the listeners for its kind, in registration order.
    pub fn dispatch(&self, event: InputEvent) -> EventDisposition {
        if !self.connected.get() {
            return EventDisposition::Default;
        }

        // Listeners may detach while running, so dispatch from a copy.
        let targets: Vec<InputListener> = self
            .listeners
            .borrow()
            .iter()
            .filter(|registered| registered.kind == event.kind)
            .map(|registered| registered.listener.clone())
            .collect();

        let mut disposition = EventDisposition::Default;
        for listener in targets {
            if listener(&event) == EventDisposition::PreventDefault {
                disposition = EventDisposition::PreventDefault;
            }
        }
        disposition
    }
}

impl ScrollElement for FakeScrollElement {
    fn metrics(&self) -> ScrollMetrics {
        self.metrics.get()
    }

    fn add_listener(&self, kind: InputKind, listener: InputListener) -> Option<ListenerKey> {
        let key = ListenerKey(self.next_key.get());
        self.next_key.set(key.0 + 1);
        self.listeners.borrow_mut().push(RegisteredListener {
            key,
            kind,
            passive: kind.is_passive(),
            listener,
        });
        Some(key)
    }

    fn remove_listener(&self, key: ListenerKey) {
        self.listeners
            .borrow_mut()
            .retain(|registered| registered.key != key);
    }

    fn same_element(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

/// The page: records every scroll call and owns the body styles.
#[derive(Default)]
pub struct FakePage {
    scroll_calls: RefCell<Vec<f64>>,
    scroll_y: Cell<f64>,
    body: FakeStyles,
}

delegate_style_target!(FakePage, body);

impl FakePage {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn body(&self) -> &FakeStyles {
        &self.body
    }

    pub fn scroll_calls(&self) -> Vec<f64> {
        self.scroll_calls.borrow().clone()
    }

    pub fn scroll_y(&self) -> f64 {
        self.scroll_y.get()
    }

    pub fn clear_scroll_calls(&self) {
        self.scroll_calls.borrow_mut().clear();
    }
}

impl Page for FakePage {
    fn scroll_by(&self, dy: f64) {
        self.scroll_calls.borrow_mut().push(dy);
        self.scroll_y.set(self.scroll_y.get() + dy);
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn advance(&self, millis: f64) {
        self.now.set(self.now.get() + millis);
    }

    pub fn set(&self, millis: f64) {
        self.now.set(millis);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> f64 {
        self.now.get()
    }
}

/// Frame scheduler whose frames run only on [`advance_frame`](Self::advance_frame).
#[derive(Default)]
pub struct ManualFrameScheduler {
    next_id: Cell<i64>,
    frame_time: Cell<f64>,
    queue: RefCell<Vec<(FrameRequestId, Box<dyn FnOnce(f64)>)>>,
    cancelled: Cell<usize>,
    refusing: Cell<bool>,
}

impl ManualFrameScheduler {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn pending_count(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Makes subsequent frame requests fail, like a host without
    /// `requestAnimationFrame`.
    pub fn set_refusing(&self, refusing: bool) {
        self.refusing.set(refusing);
    }

    /// Number of cancellations that removed a still-pending callback.
    pub fn cancelled_count(&self) -> usize {
        self.cancelled.get()
    }

    /// Runs the callbacks queued before this frame began. Callbacks they
    /// schedule wait for the next frame. Returns how many ran.
    pub fn advance_frame(&self) -> usize {
        let time = self.frame_time.get() + FRAME_INTERVAL_MS;
        self.frame_time.set(time);

        let pending = std::mem::take(&mut *self.queue.borrow_mut());
        let ran = pending.len();
        for (_, callback) in pending {
            callback(time);
        }
        ran
    }

    /// Advances frames until nothing is pending or `max_frames` ran.
    /// Returns the number of frames advanced.
    pub fn run_until_idle(&self, max_frames: usize) -> usize {
        let mut frames = 0;
        while frames < max_frames && self.pending_count() > 0 {
            self.advance_frame();
            frames += 1;
        }
        frames
    }
}

impl FrameScheduler for ManualFrameScheduler {
    fn request_frame(&self, callback: Box<dyn FnOnce(f64)>) -> Option<FrameRequestId> {
        if self.refusing.get() {
            return None;
        }
        let id = FrameRequestId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.queue.borrow_mut().push((id, callback));
        Some(id)
    }

    fn cancel_frame(&self, id: FrameRequestId) {
        let mut queue = self.queue.borrow_mut();
        let before = queue.len();
        queue.retain(|(pending, _)| *pending != id);
        if queue.len() != before {
            self.cancelled.set(self.cancelled.get() + 1);
        }
    }
}

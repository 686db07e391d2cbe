//! Platform abstraction traits for scroll chaining.
//!
//! These traits let the controller talk to the host (a browser page, a test
//! harness) without depending on any DOM binding directly. Everything runs on
//! the UI thread, so none of them require `Send` or `Sync`.

use std::rc::Rc;

use web_time::Instant;

use crate::boundary::ScrollMetrics;
use crate::style::StyleTarget;

/// Provides timing information for gesture tracking.
pub trait Clock {
    /// Returns the current time in milliseconds.
    ///
    /// Only differences between two readings are meaningful.
    fn now_millis(&self) -> f64;
}

/// Clock backed by [`web_time::Instant`], which maps to `performance.now()` on
/// wasm and to the monotonic system clock elsewhere.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_millis(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1_000.0
    }
}

/// Identifier returned by a [`FrameScheduler`] for a pending frame callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameRequestId(pub i64);

/// The host's frame-scheduling primitive (`requestAnimationFrame` on the web).
pub trait FrameScheduler {
    /// Schedules `callback` to run on the next frame with the frame timestamp
    /// in milliseconds. Returns `None` if the host refused the request.
    fn request_frame(&self, callback: Box<dyn FnOnce(f64) + 'static>) -> Option<FrameRequestId>;

    /// Cancels a pending callback. Cancelling an id that already ran is a no-op.
    fn cancel_frame(&self, id: FrameRequestId);
}

/// Kind of input event the controller listens for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputKind {
    TouchStart,
    TouchMove,
    TouchEnd,
    Scroll,
}

impl InputKind {
    /// DOM event type name.
    pub fn event_type(self) -> &'static str {
        match self {
            InputKind::TouchStart => "touchstart",
            InputKind::TouchMove => "touchmove",
            InputKind::TouchEnd => "touchend",
            InputKind::Scroll => "scroll",
        }
    }

    /// Whether the listener may be registered as passive.
    ///
    /// Touch move must stay non-passive so the controller can suppress the
    /// browser's default handling.
    pub fn is_passive(self) -> bool {
        !matches!(self, InputKind::TouchMove)
    }
}

/// Input event as seen by the controller.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InputEvent {
    pub kind: InputKind,
    /// Client Y of the first active touch point, if any.
    pub touch_y: Option<f64>,
}

impl InputEvent {
    pub fn touch(kind: InputKind, touch_y: f64) -> Self {
        Self {
            kind,
            touch_y: Some(touch_y),
        }
    }

    pub fn touch_end() -> Self {
        Self {
            kind: InputKind::TouchEnd,
            touch_y: None,
        }
    }

    pub fn scroll() -> Self {
        Self {
            kind: InputKind::Scroll,
            touch_y: None,
        }
    }
}

/// What the host should do with the event after the listener ran.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum EventDisposition {
    /// Let the browser's default handling proceed.
    #[default]
    Default,
    /// Suppress default handling (`preventDefault`).
    PreventDefault,
}

/// Listener callback registered on a [`ScrollElement`].
pub type InputListener = Rc<dyn Fn(&InputEvent) -> EventDisposition>;

/// Key identifying a registered listener on one element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerKey(pub u64);

/// The inner scrollable element.
pub trait ScrollElement: StyleTarget {
    /// Current layout metrics.
    fn metrics(&self) -> ScrollMetrics;

    /// Registers `listener` for `kind`. Returns `None` if the host refused.
    fn add_listener(&self, kind: InputKind, listener: InputListener) -> Option<ListenerKey>;

    /// Removes a listener previously returned by [`add_listener`](Self::add_listener).
    ///
    /// Must tolerate unknown keys and elements already removed from the document.
    fn remove_listener(&self, key: ListenerKey);

    /// Whether `other` refers to the same underlying element.
    fn same_element(&self, other: &Self) -> bool;
}

/// The outer scroll surface. Style methods address the document body.
pub trait Page: StyleTarget {
    /// Scrolls the page vertically by `dy` pixels.
    fn scroll_by(&self, dy: f64);
}

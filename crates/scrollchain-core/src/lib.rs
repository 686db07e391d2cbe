//! Scroll chaining for nested touch scroll containers.
//!
//! On platforms that do not chain scroll momentum from an inner scroller to
//! the page once the inner one hits its top or bottom, a
//! [`ScrollChainController`] watches touch movement on the element and hands
//! the gesture to the page at the boundary, either by releasing the event and
//! synthesizing decaying page momentum or by forwarding the move delta.
//!
//! The crate is host-agnostic: the DOM (or a test harness) plugs in through
//! the traits in [`platform`] and [`style`].

pub mod attach;
pub mod boundary;
pub mod capability;
pub mod config;
pub mod controller;
pub mod frame_clock;
pub mod gesture;
pub mod momentum;
pub mod platform;
pub mod style;

pub use attach::{DetachHandle, ScrollChaining};
pub use boundary::{Boundary, ScrollMetrics};
pub use capability::{ChainingCapability, DeviceKind, StaticCapability, UserAgentCapability};
pub use config::{
    ChainStrategy, ChainingConfig, BOUNDARY_TOLERANCE, DECELERATION, MOMENTUM_FACTOR, STOP_VELOCITY,
    VELOCITY_DEAD_ZONE,
};
pub use controller::{ChainSnapshot, ChainingEnvironment, ScrollChainController};
pub use frame_clock::{FrameCallbackRegistration, FrameClock};
pub use gesture::{GestureState, MoveDecision};
pub use momentum::PageScrollAnimator;
pub use platform::{
    Clock, EventDisposition, FrameRequestId, FrameScheduler, InputEvent, InputKind, InputListener,
    ListenerKey, Page, ScrollElement, SystemClock,
};
pub use style::{
    OverscrollBehavior, ParseOverscrollBehaviorError, StyleGuard, StyleOverrides, StyleTarget,
    SCROLL_LOCK_CLASSES,
};

//! Robot-style driver for scripted touch gestures.
//!
//! # Example
//!
//! ```
//! use scrollchain_core::{ChainingConfig, EventDisposition};
//! use scrollchain_testing::{FakeScrollElement, TestPlatform};
//!
//! let platform = TestPlatform::ios();
//! let mut chaining = platform.chaining(ChainingConfig::default());
//! let element = FakeScrollElement::scroller(1, 0.0);
//! let _handle = chaining.attach(Some(element.clone()));
//!
//! let mut robot = platform.robot(element);
//! robot.press(100.0);
//! // Pulling down at the top releases the gesture to the page.
//! assert_eq!(robot.drag_to(120.0, 10.0), EventDisposition::Default);
//! robot.advance_frame();
//! assert_eq!(platform.page.scroll_calls(), vec![-60.0]);
//! ```

use std::rc::Rc;

use scrollchain_core::{
    ChainingConfig, ChainingEnvironment, EventDisposition, InputEvent, InputKind, ScrollChaining,
    StaticCapability, UserAgentCapability,
};

use crate::fakes::{FakePage, FakeScrollElement, ManualClock, ManualFrameScheduler};

pub const IOS_USER_AGENT: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Mobile/15E148 Safari/604.1";
pub const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Fake page, clock and frame scheduler wired into a [`ChainingEnvironment`].
pub struct TestPlatform {
    pub page: Rc<FakePage>,
    pub clock: Rc<ManualClock>,
    pub frames: Rc<ManualFrameScheduler>,
    pub env: ChainingEnvironment,
}

impl TestPlatform {
    pub fn with_user_agent(user_agent: &str) -> Self {
        Self::with_capability(UserAgentCapability::new(user_agent))
    }

    pub fn with_capability(capability: impl scrollchain_core::ChainingCapability + 'static) -> Self {
        let page = FakePage::new();
        let clock = ManualClock::new();
        let frames = ManualFrameScheduler::new();
        let env = ChainingEnvironment::new(clock.clone(), frames.clone(), Rc::new(capability));
        Self {
            page,
            clock,
            frames,
            env,
        }
    }

    pub fn ios() -> Self {
        Self::with_user_agent(IOS_USER_AGENT)
    }

    pub fn desktop() -> Self {
        Self::with_user_agent(DESKTOP_USER_AGENT)
    }

    /// Platform that always enables chaining regardless of user agent.
    pub fn enabled() -> Self {
        Self::with_capability(StaticCapability(true))
    }

    pub fn chaining(&self, config: ChainingConfig) -> ScrollChaining<FakeScrollElement, FakePage> {
        ScrollChaining::new(self.page.clone(), self.env.clone(), config)
    }

    pub fn robot(&self, element: Rc<FakeScrollElement>) -> TouchRobot {
        TouchRobot {
            element,
            clock: self.clock.clone(),
            frames: self.frames.clone(),
        }
    }
}

/// Performs touch gestures on one fake element.
pub struct TouchRobot {
    element: Rc<FakeScrollElement>,
    clock: Rc<ManualClock>,
    frames: Rc<ManualFrameScheduler>,
}

impl TouchRobot {
    pub fn element(&self) -> &Rc<FakeScrollElement> {
        &self.element
    }

    /// Puts a finger down at `y`.
    pub fn press(&mut self, y: f64) -> EventDisposition {
        self.element
            .dispatch(InputEvent::touch(InputKind::TouchStart, y))
    }

    /// Moves the finger to `y` after `elapsed_ms`.
    pub fn drag_to(&mut self, y: f64, elapsed_ms: f64) -> EventDisposition {
        self.clock.advance(elapsed_ms);
        self.element
            .dispatch(InputEvent::touch(InputKind::TouchMove, y))
    }

    /// Moves through each `y` in `path`, `step_ms` apart, returning every
    /// disposition.
    pub fn drag_path(&mut self, path: &[f64], step_ms: f64) -> Vec<EventDisposition> {
        path.iter().map(|&y| self.drag_to(y, step_ms)).collect()
    }

    pub fn release(&mut self) -> EventDisposition {
        self.element.dispatch(InputEvent::touch_end())
    }

    /// Scrolls the element natively and fires its scroll event.
    pub fn scroll_element_to(&mut self, offset: f64) -> EventDisposition {
        self.element.set_scroll_offset(offset);
        self.element.dispatch(InputEvent::scroll())
    }

    pub fn advance_frame(&mut self) -> usize {
        self.clock.advance(crate::fakes::FRAME_INTERVAL_MS);
        self.frames.advance_frame()
    }

    /// Runs frames until no callback is pending, up to `max_frames`.
    pub fn settle(&mut self, max_frames: usize) -> usize {
        let mut frames = 0;
        while frames < max_frames && self.frames.pending_count() > 0 {
            self.advance_frame();
            frames += 1;
        }
        frames
    }
}

//! Testing utilities for scroll chaining.
//!
//! Fakes for every platform trait plus a [`TouchRobot`] that scripts touch
//! gestures against them, so tests exercise the same attach path a browser
//! host uses.

pub mod fakes;
pub mod robot;

pub use fakes::{
    FakePage, FakeScrollElement, FakeStyles, ManualClock, ManualFrameScheduler, FRAME_INTERVAL_MS,
};
pub use robot::{TestPlatform, TouchRobot, DESKTOP_USER_AGENT, IOS_USER_AGENT};

/// Installs `env_logger` for the current test binary; safe to call repeatedly.
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

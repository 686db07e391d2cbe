//! Controller configuration.

use crate::style::OverscrollBehavior;

/// Converts a px/ms touch velocity into a per-frame page scroll step.
pub const MOMENTUM_FACTOR: f64 = 30.0;

/// Per-frame multiplier applied to the momentum step.
pub const DECELERATION: f64 = 0.92;

/// Touch velocities (px/ms) below this are treated as jitter and not handed off.
pub const VELOCITY_DEAD_ZONE: f64 = 0.1;

/// The momentum loop stops once the per-frame step (px) drops below this.
pub const STOP_VELOCITY: f64 = 1.0;

/// Bottom-edge tolerance in pixels.
pub const BOUNDARY_TOLERANCE: f64 = 1.0;

/// How a gesture is handed to the page once the element reaches a boundary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChainStrategy {
    /// Release the event to the browser and synthesize a decaying page scroll
    /// from the current touch velocity.
    #[default]
    Momentum,
    /// Suppress the event and scroll the page by the move delta on the next
    /// frame, replacing any forward still pending.
    DirectForward,
}

/// Configuration for a scroll chaining attachment.
#[derive(Clone, Debug, PartialEq)]
pub struct ChainingConfig {
    pub momentum_factor: f64,
    pub deceleration: f64,
    pub velocity_dead_zone: f64,
    pub stop_velocity: f64,
    pub boundary_tolerance: f64,
    pub strategy: ChainStrategy,
    /// `overscroll-behavior` applied to the element while attached.
    pub overscroll_behavior: Option<OverscrollBehavior>,
    /// Clear scroll locks on the document body while attached.
    pub unlock_body: bool,
    /// Apply native touch scrolling hints to the element while attached.
    pub touch_hints: bool,
}

impl Default for ChainingConfig {
    fn default() -> Self {
        Self {
            momentum_factor: MOMENTUM_FACTOR,
            deceleration: DECELERATION,
            velocity_dead_zone: VELOCITY_DEAD_ZONE,
            stop_velocity: STOP_VELOCITY,
            boundary_tolerance: BOUNDARY_TOLERANCE,
            strategy: ChainStrategy::default(),
            overscroll_behavior: None,
            unlock_body: true,
            touch_hints: true,
        }
    }
}

impl ChainingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strategy(mut self, strategy: ChainStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_momentum(mut self, factor: f64, deceleration: f64) -> Self {
        self.momentum_factor = factor;
        self.deceleration = deceleration.clamp(0.0, 0.999);
        self
    }

    pub fn with_velocity_dead_zone(mut self, dead_zone: f64) -> Self {
        self.velocity_dead_zone = dead_zone.abs();
        self
    }

    pub fn with_stop_velocity(mut self, stop_velocity: f64) -> Self {
        self.stop_velocity = stop_velocity.abs();
        self
    }

    pub fn with_boundary_tolerance(mut self, tolerance: f64) -> Self {
        self.boundary_tolerance = tolerance.max(0.0);
        self
    }

    pub fn with_overscroll_behavior(mut self, behavior: OverscrollBehavior) -> Self {
        self.overscroll_behavior = Some(behavior);
        self
    }

    /// Disables every style mutation.
    pub fn without_style_overrides(mut self) -> Self {
        self.overscroll_behavior = None;
        self.unlock_body = false;
        self.touch_hints = false;
        self
    }

    pub fn with_body_unlock(mut self, enabled: bool) -> Self {
        self.unlock_body = enabled;
        self
    }

    pub fn with_touch_hints(mut self, enabled: bool) -> Self {
        self.touch_hints = enabled;
        self
    }
}

//! Page scroll animation driven by frame callbacks.
//!
//! Momentum hand-off seeds a per-frame step from the touch velocity and
//! multiplies it by a constant deceleration every frame, a plain exponential
//! decay that only needs to feel continuous.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::config::ChainingConfig;
use crate::frame_clock::{FrameCallbackRegistration, FrameClock};

/// Schedules one momentum frame; the callback reschedules itself until the
/// step falls below the stop velocity.
fn schedule_next_frame<F>(state: Rc<RefCell<Option<MomentumState>>>, frame_clock: FrameClock, on_scroll: F)
where
    F: Fn(f64) + 'static,
{
    let state_for_closure = state.clone();
    let frame_clock_for_closure = frame_clock.clone();

    let registration = frame_clock.with_frame_millis(move |_frame_time| {
        let should_continue = {
            let state_guard = state_for_closure.borrow();
            let Some(anim_state) = state_guard.as_ref() else {
                return;
            };

            if !anim_state.is_running.get() {
                return;
            }

            let step = anim_state.step.get();
            if step.abs() < anim_state.stop_velocity {
                anim_state.is_running.set(false);
                log::trace!(
                    "momentum finished after {} frames, {:.1}px total",
                    anim_state.frames.get(),
                    anim_state.total_delta.get()
                );
                false
            } else {
                on_scroll(step);
                anim_state.frames.set(anim_state.frames.get() + 1);
                anim_state
                    .total_delta
                    .set(anim_state.total_delta.get() + step);
                anim_state.step.set(step * anim_state.deceleration);
                true
            }
        };

        if should_continue {
            schedule_next_frame(
                state_for_closure.clone(),
                frame_clock_for_closure.clone(),
                on_scroll,
            );
        }
    });

    // Keep the registration alive so the pending frame is not cancelled.
    if let Some(anim_state) = state.borrow_mut().as_mut() {
        if !registration.is_active() {
            anim_state.is_running.set(false);
        }
        anim_state.registration = Some(registration);
    }
}

/// State for an active momentum animation.
struct MomentumState {
    /// Page scroll applied on the next frame, in pixels.
    step: Cell<f64>,
    deceleration: f64,
    stop_velocity: f64,
    /// Pending frame callback.
    registration: Option<FrameCallbackRegistration>,
    is_running: Cell<bool>,
    frames: Cell<u32>,
    total_delta: Cell<f64>,
}

/// Drives page scrolling on behalf of a chained gesture.
///
/// At most one momentum animation and one forwarded delta are pending at a
/// time; starting a new one cancels its predecessor.
pub struct PageScrollAnimator {
    state: Rc<RefCell<Option<MomentumState>>>,
    forward: Rc<RefCell<Option<FrameCallbackRegistration>>>,
    frame_clock: FrameClock,
}

impl PageScrollAnimator {
    pub fn new(frame_clock: FrameClock) -> Self {
        Self {
            state: Rc::new(RefCell::new(None)),
            forward: Rc::new(RefCell::new(None)),
            frame_clock,
        }
    }

    /// Starts a momentum hand-off for a touch velocity in px/ms.
    ///
    /// `on_scroll` receives the page scroll step for each frame. Returns
    /// `false` when the velocity falls inside the dead zone and nothing was
    /// scheduled.
    pub fn start_momentum<F>(&self, velocity: f64, config: &ChainingConfig, on_scroll: F) -> bool
    where
        F: Fn(f64) + 'static,
    {
        if velocity.abs() < config.velocity_dead_zone {
            return false;
        }

        self.cancel_momentum();

        let anim_state = MomentumState {
            step: Cell::new(velocity * config.momentum_factor),
            deceleration: config.deceleration,
            stop_velocity: config.stop_velocity,
            registration: None,
            is_running: Cell::new(true),
            frames: Cell::new(0),
            total_delta: Cell::new(0.0),
        };
        *self.state.borrow_mut() = Some(anim_state);

        schedule_next_frame(self.state.clone(), self.frame_clock.clone(), on_scroll);
        true
    }

    /// Applies `delta` through `on_scroll` on the next frame, replacing a
    /// forward that has not run yet.
    pub fn forward_delta<F>(&self, delta: f64, on_scroll: F)
    where
        F: FnOnce(f64) + 'static,
    {
        if let Some(previous) = self.forward.borrow_mut().take() {
            previous.cancel();
        }

        let slot = Rc::downgrade(&self.forward);
        let registration = self.frame_clock.with_frame_millis(move |_frame_time| {
            on_scroll(delta);
            if let Some(slot) = slot.upgrade() {
                slot.borrow_mut().take();
            }
        });
        if registration.is_active() {
            *self.forward.borrow_mut() = Some(registration);
        }
    }

    pub fn cancel_momentum(&self) {
        if let Some(state) = self.state.borrow_mut().take() {
            state.is_running.set(false);
            // Dropping the registration cancels the pending frame.
            drop(state.registration);
        }
    }

    /// Cancels everything pending.
    pub fn cancel(&self) {
        self.cancel_momentum();
        if let Some(pending) = self.forward.borrow_mut().take() {
            pending.cancel();
        }
    }

    pub fn is_momentum_running(&self) -> bool {
        self.state
            .borrow()
            .as_ref()
            .is_some_and(|s| s.is_running.get())
    }

    pub fn has_pending_forward(&self) -> bool {
        self.forward.borrow().is_some()
    }

    pub fn is_running(&self) -> bool {
        self.is_momentum_running() || self.has_pending_forward()
    }
}

impl Clone for PageScrollAnimator {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            forward: self.forward.clone(),
            frame_clock: self.frame_clock.clone(),
        }
    }
}

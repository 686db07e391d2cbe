//! Per-element gesture controller.

use std::fmt;
use std::rc::Rc;

use crate::boundary::{Boundary, ScrollMetrics};
use crate::capability::ChainingCapability;
use crate::config::{ChainStrategy, ChainingConfig};
use crate::frame_clock::FrameClock;
use crate::gesture::{GestureState, MoveDecision};
use crate::momentum::PageScrollAnimator;
use crate::platform::{Clock, EventDisposition, FrameScheduler, InputEvent, InputKind, Page, ScrollElement};

/// Host services shared by every attachment.
#[derive(Clone)]
pub struct ChainingEnvironment {
    pub clock: Rc<dyn Clock>,
    pub frame_clock: FrameClock,
    pub capability: Rc<dyn ChainingCapability>,
}

impl ChainingEnvironment {
    pub fn new(
        clock: Rc<dyn Clock>,
        scheduler: Rc<dyn FrameScheduler>,
        capability: Rc<dyn ChainingCapability>,
    ) -> Self {
        Self {
            clock,
            frame_clock: FrameClock::new(scheduler),
            capability,
        }
    }
}

/// Debug view of a controller.
#[derive(Clone, Debug, PartialEq)]
pub struct ChainSnapshot {
    pub metrics: ScrollMetrics,
    pub boundary: Boundary,
    pub velocity: f64,
    pub last_y: Option<f64>,
    pub last_timestamp: Option<f64>,
    pub animating: bool,
    pub strategy: ChainStrategy,
}

impl fmt::Display for ChainSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "at top: {}", self.boundary.at_top)?;
        writeln!(f, "at bottom: {}", self.boundary.at_bottom)?;
        writeln!(f, "scroll offset: {}", self.metrics.scroll_offset)?;
        writeln!(f, "scroll height: {}", self.metrics.scroll_extent)?;
        writeln!(f, "client height: {}", self.metrics.visible_height)?;
        writeln!(f, "velocity: {:.3} px/ms", self.velocity)?;
        writeln!(f, "strategy: {:?}", self.strategy)?;
        write!(f, "animating: {}", self.animating)
    }
}

/// Decides, per touch move, whether the element keeps the gesture or the page
/// takes it over.
pub struct ScrollChainController<E, P> {
    element: Rc<E>,
    page: Rc<P>,
    clock: Rc<dyn Clock>,
    config: ChainingConfig,
    gesture: Option<GestureState>,
    boundary: Boundary,
    animator: PageScrollAnimator,
}

impl<E, P> ScrollChainController<E, P>
where
    E: ScrollElement,
    P: Page + 'static,
{
    pub fn new(element: Rc<E>, page: Rc<P>, env: &ChainingEnvironment, config: ChainingConfig) -> Self {
        let boundary = Boundary::from_metrics(element.metrics(), config.boundary_tolerance);
        Self {
            element,
            page,
            clock: env.clock.clone(),
            config,
            gesture: None,
            boundary,
            animator: PageScrollAnimator::new(env.frame_clock.clone()),
        }
    }

    /// Routes a host event to the matching handler.
    pub fn handle_event(&mut self, event: &InputEvent) -> EventDisposition {
        match (event.kind, event.touch_y) {
            (InputKind::TouchStart, Some(y)) => {
                self.on_touch_start(y);
                EventDisposition::Default
            }
            (InputKind::TouchMove, Some(y)) => self.on_touch_move(y),
            (InputKind::TouchEnd, _) => {
                self.on_touch_end();
                EventDisposition::Default
            }
            (InputKind::Scroll, _) => {
                self.on_scroll();
                EventDisposition::Default
            }
            (kind, None) => {
                log::trace!("{} without touch points ignored", kind.event_type());
                EventDisposition::Default
            }
        }
    }

    pub fn on_touch_start(&mut self, y: f64) {
        let now = self.clock.now_millis();
        let boundary = self.refresh_boundary();
        self.gesture = Some(GestureState::begin(y, now, boundary));
        log::trace!("touch start at y={y} {boundary:?}");
    }

    pub fn on_touch_move(&mut self, current_y: f64) -> EventDisposition {
        let now = self.clock.now_millis();
        let boundary = self.refresh_boundary();

        let Some(gesture) = self.gesture else {
            log::trace!("touch move without touch start; tracking from y={current_y}");
            self.gesture = Some(GestureState::begin(current_y, now, boundary));
            return EventDisposition::Default;
        };

        let (next, decision) = gesture.track_move(current_y, now, boundary);
        match decision {
            MoveDecision::Consume => {
                self.gesture = Some(next);
                match self.config.strategy {
                    ChainStrategy::Momentum => EventDisposition::PreventDefault,
                    // The element scrolls natively under the finger.
                    ChainStrategy::DirectForward => EventDisposition::Default,
                }
            }
            MoveDecision::Chain { velocity, delta_y } => match self.config.strategy {
                ChainStrategy::Momentum => {
                    self.gesture = Some(next);
                    self.transfer_momentum_to_page(velocity);
                    EventDisposition::Default
                }
                ChainStrategy::DirectForward => {
                    self.gesture = Some(next.advance(current_y, now));
                    self.forward_to_page(delta_y);
                    EventDisposition::PreventDefault
                }
            },
        }
    }

    pub fn on_touch_end(&mut self) {
        if let Some(gesture) = self.gesture.take() {
            let ended = gesture.end();
            log::trace!("touch end after {:.1}px", ended.travel());
        }
    }

    /// Boundary bookkeeping for native scroll events.
    pub fn on_scroll(&mut self) {
        self.refresh_boundary();
    }

    /// Hands the current touch velocity (px/ms) to the page as momentum.
    ///
    /// Returns `false` if the velocity was inside the dead zone.
    pub fn transfer_momentum_to_page(&self, velocity: f64) -> bool {
        let page = self.page.clone();
        let started = self
            .animator
            .start_momentum(velocity, &self.config, move |step| page.scroll_by(step));
        if started {
            log::trace!("momentum hand-off at {velocity:.3} px/ms");
        }
        started
    }

    fn forward_to_page(&self, delta_y: f64) {
        let page = self.page.clone();
        self.animator.forward_delta(delta_y, move |delta| page.scroll_by(delta));
    }

    pub fn cancel_pending_frames(&self) {
        self.animator.cancel();
    }

    /// Shared handle to the animator, usable without borrowing the controller.
    pub fn animator(&self) -> PageScrollAnimator {
        self.animator.clone()
    }

    pub fn gesture(&self) -> Option<GestureState> {
        self.gesture
    }

    pub fn boundary(&self) -> Boundary {
        self.boundary
    }

    pub fn config(&self) -> &ChainingConfig {
        &self.config
    }

    pub fn snapshot(&self) -> ChainSnapshot {
        ChainSnapshot {
            metrics: self.element.metrics(),
            boundary: self.boundary,
            velocity: self.gesture.map_or(0.0, |g| g.velocity),
            last_y: self.gesture.map(|g| g.last_y),
            last_timestamp: self.gesture.map(|g| g.last_timestamp),
            animating: self.animator.is_running(),
            strategy: self.config.strategy,
        }
    }

    fn refresh_boundary(&mut self) -> Boundary {
        self.boundary = Boundary::from_metrics(self.element.metrics(), self.config.boundary_tolerance);
        self.boundary
    }
}

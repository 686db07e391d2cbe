//! Per-gesture touch tracking.
//!
//! [`GestureState`] is a plain value: each handler takes the previous state and
//! returns the next one, so the controller never mutates gesture fields behind
//! the caller's back.

use crate::boundary::Boundary;

/// Outcome of a single touch move.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MoveDecision {
    /// The element keeps the gesture; default handling should be suppressed.
    Consume,
    /// The gesture points outward from a reached boundary and should be
    /// handed to the page.
    Chain {
        /// Velocity in px/ms computed from this event.
        velocity: f64,
        /// `last_y - current_y`; positive when the finger moves up.
        delta_y: f64,
    },
}

/// Touch tracking state for one gesture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureState {
    pub start_y: f64,
    pub last_y: f64,
    /// Milliseconds.
    pub last_timestamp: f64,
    /// Signed speed in px/ms.
    pub velocity: f64,
    pub boundary: Boundary,
}

impl GestureState {
    /// Starts a gesture at `y`.
    pub fn begin(y: f64, now: f64, boundary: Boundary) -> Self {
        Self {
            start_y: y,
            last_y: y,
            last_timestamp: now,
            velocity: 0.0,
            boundary,
        }
    }

    /// Processes a move to `current_y` at `now` with freshly computed flags.
    ///
    /// When the gesture chains, `last_y` and `last_timestamp` stay where they
    /// were, so the next move measures its delta from the last consumed
    /// position.
    pub fn track_move(self, current_y: f64, now: f64, boundary: Boundary) -> (Self, MoveDecision) {
        let delta_y = self.last_y - current_y;
        let delta_time = now - self.last_timestamp;

        let mut next = self;
        if delta_time > 0.0 {
            next.velocity = delta_y / delta_time;
        }
        next.boundary = boundary;

        let chain_up = delta_y < 0.0 && boundary.at_top;
        let chain_down = delta_y > 0.0 && boundary.at_bottom;
        if chain_up || chain_down {
            let decision = MoveDecision::Chain {
                velocity: next.velocity,
                delta_y,
            };
            return (next, decision);
        }

        next.last_y = current_y;
        next.last_timestamp = now;
        (next, MoveDecision::Consume)
    }

    /// Advances the tracked position without deciding anything.
    ///
    /// Used by strategies that consume chained moves themselves.
    pub fn advance(self, current_y: f64, now: f64) -> Self {
        Self {
            last_y: current_y,
            last_timestamp: now,
            ..self
        }
    }

    /// Ends the gesture.
    pub fn end(self) -> Self {
        Self {
            velocity: 0.0,
            ..self
        }
    }

    /// Total distance travelled since the gesture began, positive upward.
    pub fn travel(&self) -> f64 {
        self.start_y - self.last_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BETWEEN: Boundary = Boundary {
        at_top: false,
        at_bottom: false,
    };
    const TOP: Boundary = Boundary {
        at_top: true,
        at_bottom: false,
    };
    const BOTTOM: Boundary = Boundary {
        at_top: false,
        at_bottom: true,
    };

    #[test]
    fn begin_resets_velocity() {
        let g = GestureState::begin(120.0, 5.0, BETWEEN);
        assert_eq!(g.start_y, 120.0);
        assert_eq!(g.last_y, 120.0);
        assert_eq!(g.last_timestamp, 5.0);
        assert_eq!(g.velocity, 0.0);
    }

    #[test]
    fn consumed_move_advances_position() {
        let g = GestureState::begin(200.0, 0.0, BETWEEN);
        let (g, decision) = g.track_move(180.0, 10.0, BETWEEN);
        assert_eq!(decision, MoveDecision::Consume);
        assert_eq!(g.velocity, 2.0);
        assert_eq!(g.last_y, 180.0);
        assert_eq!(g.last_timestamp, 10.0);
        assert_eq!(g.travel(), 20.0);
    }

    #[test]
    fn zero_delta_time_keeps_previous_velocity() {
        let g = GestureState::begin(200.0, 0.0, BETWEEN);
        let (g, _) = g.track_move(190.0, 10.0, BETWEEN);
        assert_eq!(g.velocity, 1.0);
        let (g, _) = g.track_move(150.0, 10.0, BETWEEN);
        assert_eq!(g.velocity, 1.0);
    }

    #[test]
    fn pulling_down_at_top_chains() {
        let g = GestureState::begin(100.0, 0.0, TOP);
        let (_, decision) = g.track_move(120.0, 10.0, TOP);
        assert_eq!(
            decision,
            MoveDecision::Chain {
                velocity: -2.0,
                delta_y: -20.0
            }
        );
    }

    #[test]
    fn pushing_up_at_top_is_consumed() {
        let g = GestureState::begin(100.0, 0.0, TOP);
        let (_, decision) = g.track_move(80.0, 10.0, TOP);
        assert_eq!(decision, MoveDecision::Consume);
    }

    #[test]
    fn pushing_up_at_bottom_chains() {
        let g = GestureState::begin(100.0, 0.0, BOTTOM);
        let (_, decision) = g.track_move(80.0, 10.0, BOTTOM);
        assert!(matches!(decision, MoveDecision::Chain { velocity, .. } if velocity == 2.0));
    }

    #[test]
    fn chained_move_keeps_last_position() {
        let g = GestureState::begin(100.0, 0.0, TOP);
        let (g, _) = g.track_move(110.0, 10.0, TOP);
        assert_eq!(g.last_y, 100.0);
        assert_eq!(g.last_timestamp, 0.0);

        // The next delta is measured from the last consumed position.
        let (g, decision) = g.track_move(115.0, 20.0, TOP);
        assert_eq!(g.velocity, -0.75);
        assert!(matches!(decision, MoveDecision::Chain { delta_y, .. } if delta_y == -15.0));
    }

    #[test]
    fn end_zeroes_velocity() {
        let g = GestureState::begin(100.0, 0.0, BETWEEN);
        let (g, _) = g.track_move(50.0, 10.0, BETWEEN);
        assert_eq!(g.end().velocity, 0.0);
    }
}

//! Scroll boundary detection.

/// Layout metrics of a scrollable element, in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollMetrics {
    /// Current scroll offset (`scrollTop`).
    pub scroll_offset: f64,
    /// Visible height (`clientHeight`).
    pub visible_height: f64,
    /// Total scrollable extent (`scrollHeight`).
    pub scroll_extent: f64,
}

impl ScrollMetrics {
    pub fn new(scroll_offset: f64, visible_height: f64, scroll_extent: f64) -> Self {
        Self {
            scroll_offset,
            visible_height,
            scroll_extent,
        }
    }

    /// Largest offset the element can reach.
    pub fn max_offset(&self) -> f64 {
        (self.scroll_extent - self.visible_height).max(0.0)
    }
}

/// Whether an element sits at its top and/or bottom scroll boundary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Boundary {
    pub at_top: bool,
    pub at_bottom: bool,
}

impl Boundary {
    /// Computes boundary flags.
    ///
    /// `tolerance` absorbs sub-pixel rounding at the bottom edge on fractional
    /// device pixel ratios. An element without layout (all zero) is at both
    /// boundaries.
    pub fn from_metrics(metrics: ScrollMetrics, tolerance: f64) -> Self {
        Self {
            at_top: metrics.scroll_offset <= 0.0,
            at_bottom: metrics.scroll_offset + metrics.visible_height
                >= metrics.scroll_extent - tolerance,
        }
    }

    /// Neither boundary reached.
    pub fn is_between(&self) -> bool {
        !self.at_top && !self.at_bottom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_when_offset_is_zero_or_negative() {
        let b = Boundary::from_metrics(ScrollMetrics::new(0.0, 400.0, 1000.0), 1.0);
        assert!(b.at_top);
        assert!(!b.at_bottom);

        // iOS reports negative offsets while rubber-banding past the top.
        let b = Boundary::from_metrics(ScrollMetrics::new(-12.0, 400.0, 1000.0), 1.0);
        assert!(b.at_top);
    }

    #[test]
    fn bottom_tolerates_subpixel_rounding() {
        let b = Boundary::from_metrics(ScrollMetrics::new(599.4, 400.0, 1000.0), 1.0);
        assert!(b.at_bottom);
        assert!(!b.at_top);

        let b = Boundary::from_metrics(ScrollMetrics::new(598.0, 400.0, 1000.0), 1.0);
        assert!(!b.at_bottom);
    }

    #[test]
    fn zero_layout_is_at_both_boundaries() {
        let b = Boundary::from_metrics(ScrollMetrics::default(), 1.0);
        assert!(b.at_top && b.at_bottom);
        assert!(!b.is_between());
    }

    #[test]
    fn content_shorter_than_viewport_is_at_both_boundaries() {
        let metrics = ScrollMetrics::new(0.0, 400.0, 250.0);
        let b = Boundary::from_metrics(metrics, 1.0);
        assert!(b.at_top && b.at_bottom);
        assert_eq!(metrics.max_offset(), 0.0);
    }

    #[test]
    fn middle_is_between() {
        let b = Boundary::from_metrics(ScrollMetrics::new(300.0, 400.0, 1000.0), 1.0);
        assert!(b.is_between());
    }
}

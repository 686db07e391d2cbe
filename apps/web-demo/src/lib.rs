//! Browser demo for scroll chaining.
//!
//! The page is expected to contain a nested scroller `#scrollContent`, an
//! optional `<select id="behaviorSelect">` with overscroll-behavior values,
//! and optional `#deviceInfo` / `#platformInfo` / `#currentBehavior` slots.

use scrollchain_core::{ChainStrategy, ChainingConfig, OverscrollBehavior};

#[cfg(target_arch = "wasm32")]
mod web;

pub const SCROLL_CONTENT_ID: &str = "scrollContent";
pub const BEHAVIOR_SELECT_ID: &str = "behaviorSelect";
pub const DEVICE_INFO_ID: &str = "deviceInfo";
pub const PLATFORM_INFO_ID: &str = "platformInfo";
pub const CURRENT_BEHAVIOR_SELECTOR: &str = "#currentBehavior";

/// Containers that receive the selected overscroll behavior alongside the
/// scroller itself.
pub const BEHAVIOR_TARGET_SELECTORS: [&str; 3] = ["#scrollContent", ".content-wrapper", ".container"];

pub fn demo_config(strategy: ChainStrategy) -> ChainingConfig {
    ChainingConfig::default()
        .with_strategy(strategy)
        .with_overscroll_behavior(OverscrollBehavior::Auto)
}

/// Reads `?strategy=forward` style query strings; anything else is momentum.
pub fn strategy_from_query(query: &str) -> ChainStrategy {
    let forward = query
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .any(|(key, value)| key == "strategy" && value.eq_ignore_ascii_case("forward"));
    if forward {
        ChainStrategy::DirectForward
    } else {
        ChainStrategy::Momentum
    }
}

/// Parses the behavior selector value, falling back to `auto`.
pub fn selected_behavior(value: &str) -> OverscrollBehavior {
    value.parse().unwrap_or_else(|err| {
        log::warn!("{err}; using auto");
        OverscrollBehavior::Auto
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_query_parsing() {
        assert_eq!(strategy_from_query("?strategy=forward"), ChainStrategy::DirectForward);
        assert_eq!(strategy_from_query("debug=1&strategy=FORWARD"), ChainStrategy::DirectForward);
        assert_eq!(strategy_from_query("?strategy=momentum"), ChainStrategy::Momentum);
        assert_eq!(strategy_from_query(""), ChainStrategy::Momentum);
    }

    #[test]
    fn unknown_behavior_falls_back_to_auto() {
        assert_eq!(selected_behavior("contain"), OverscrollBehavior::Contain);
        assert_eq!(selected_behavior("sideways"), OverscrollBehavior::Auto);
    }

    #[test]
    fn demo_config_keeps_default_momentum() {
        let config = demo_config(ChainStrategy::Momentum);
        assert_eq!(config.momentum_factor, 30.0);
        assert_eq!(config.overscroll_behavior, Some(OverscrollBehavior::Auto));
    }
}

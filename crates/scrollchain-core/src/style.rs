//! Scoped inline style and class overrides.
//!
//! Attachments mutate inline styles on the element and on the document body.
//! [`StyleGuard`] snapshots whatever was there before so detaching puts the
//! exact prior values back instead of clearing them.

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

/// Something carrying inline style properties and a class list.
pub trait StyleTarget {
    /// Inline value of `name`, or `None` when unset.
    fn style_property(&self, name: &str) -> Option<String>;
    fn set_style_property(&self, name: &str, value: &str);
    fn remove_style_property(&self, name: &str);
    fn has_class(&self, class: &str) -> bool;
    fn add_class(&self, class: &str);
    fn remove_class(&self, class: &str);
}

/// Classes commonly used by modal and scroll-lock libraries to freeze the body.
pub const SCROLL_LOCK_CLASSES: [&str; 5] = [
    "overflow-hidden",
    "fixed",
    "no-scroll",
    "modal-open",
    "body-scroll-lock",
];

/// Value for the CSS `overscroll-behavior` property.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OverscrollBehavior {
    #[default]
    Auto,
    Contain,
    None,
}

impl OverscrollBehavior {
    pub const ALL: [OverscrollBehavior; 3] = [
        OverscrollBehavior::Auto,
        OverscrollBehavior::Contain,
        OverscrollBehavior::None,
    ];

    pub fn as_css(self) -> &'static str {
        match self {
            OverscrollBehavior::Auto => "auto",
            OverscrollBehavior::Contain => "contain",
            OverscrollBehavior::None => "none",
        }
    }
}

impl fmt::Display for OverscrollBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_css())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOverscrollBehaviorError {
    value: String,
}

impl fmt::Display for ParseOverscrollBehaviorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid overscroll-behavior {:?}; expected auto, contain or none",
            self.value
        )
    }
}

impl std::error::Error for ParseOverscrollBehaviorError {}

impl FromStr for OverscrollBehavior {
    type Err = ParseOverscrollBehaviorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(OverscrollBehavior::Auto),
            "contain" => Ok(OverscrollBehavior::Contain),
            "none" => Ok(OverscrollBehavior::None),
            _ => Err(ParseOverscrollBehaviorError {
                value: s.to_string(),
            }),
        }
    }
}

/// A set of inline property assignments and class removals.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StyleOverrides {
    properties: Vec<(&'static str, String)>,
    removed_classes: Vec<&'static str>,
}

impl StyleOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears common scroll locks on the document body.
    pub fn body_unlock() -> Self {
        let mut overrides = Self::new()
            .with_property("overflow", "auto")
            .with_property("position", "static")
            .with_property("height", "auto")
            .with_property("touch-action", "manipulation");
        overrides.removed_classes.extend(SCROLL_LOCK_CLASSES);
        overrides
    }

    /// Hints the platform's native touch scrolling on a scroll container.
    pub fn touch_hints() -> Self {
        Self::new()
            .with_property("-webkit-overflow-scrolling", "touch")
            .with_property("touch-action", "manipulation")
    }

    pub fn with_property(mut self, name: &'static str, value: impl Into<String>) -> Self {
        let value = value.into();
        match self.properties.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = value,
            None => self.properties.push((name, value)),
        }
        self
    }

    pub fn without_class(mut self, class: &'static str) -> Self {
        if !self.removed_classes.contains(&class) {
            self.removed_classes.push(class);
        }
        self
    }

    /// Merges `other` into `self`; later assignments win.
    pub fn merge(mut self, other: StyleOverrides) -> Self {
        for (name, value) in other.properties {
            self = self.with_property(name, value);
        }
        for class in other.removed_classes {
            self = self.without_class(class);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty() && self.removed_classes.is_empty()
    }
}

/// Holds overrides applied to a target until [`restore`](Self::restore).
pub struct StyleGuard {
    target: Rc<dyn StyleTarget>,
    saved_properties: Vec<(&'static str, Option<String>)>,
    removed_classes: Vec<&'static str>,
    restored: bool,
}

impl StyleGuard {
    /// Snapshots the affected properties and classes of `target`, then applies
    /// `overrides`.
    pub fn acquire(target: Rc<dyn StyleTarget>, overrides: &StyleOverrides) -> Self {
        let saved_properties = overrides
            .properties
            .iter()
            .map(|(name, _)| (*name, target.style_property(name)))
            .collect();

        let removed_classes: Vec<&'static str> = overrides
            .removed_classes
            .iter()
            .copied()
            .filter(|class| target.has_class(class))
            .collect();

        for (name, value) in &overrides.properties {
            target.set_style_property(name, value);
        }
        for class in &removed_classes {
            target.remove_class(class);
        }

        Self {
            target,
            saved_properties,
            removed_classes,
            restored: false,
        }
    }

    /// Writes back the snapshot. Subsequent calls do nothing.
    pub fn restore(&mut self) {
        if self.restored {
            return;
        }
        self.restored = true;

        for (name, previous) in self.saved_properties.iter().rev() {
            match previous {
                Some(value) => self.target.set_style_property(name, value),
                None => self.target.remove_style_property(name),
            }
        }
        for class in &self.removed_classes {
            self.target.add_class(class);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_behaviors_case_insensitively() {
        assert_eq!("auto".parse::<OverscrollBehavior>(), Ok(OverscrollBehavior::Auto));
        assert_eq!(" Contain ".parse::<OverscrollBehavior>(), Ok(OverscrollBehavior::Contain));
        assert_eq!("NONE".parse::<OverscrollBehavior>(), Ok(OverscrollBehavior::None));
    }

    #[test]
    fn rejects_unknown_behavior() {
        let err = "bounce".parse::<OverscrollBehavior>().unwrap_err();
        assert!(err.to_string().contains("bounce"));
    }

    #[test]
    fn display_round_trips_through_css_name() {
        for behavior in OverscrollBehavior::ALL {
            assert_eq!(behavior.to_string().parse::<OverscrollBehavior>(), Ok(behavior));
        }
    }

    #[test]
    fn later_property_wins() {
        let overrides = StyleOverrides::touch_hints()
            .merge(StyleOverrides::new().with_property("touch-action", "pan-y"));
        assert_eq!(
            overrides.properties,
            vec![
                ("-webkit-overflow-scrolling", "touch".to_string()),
                ("touch-action", "pan-y".to_string()),
            ]
        );
    }

    #[test]
    fn body_unlock_removes_lock_classes() {
        let overrides = StyleOverrides::body_unlock();
        assert_eq!(overrides.removed_classes, SCROLL_LOCK_CLASSES.to_vec());
        assert!(!overrides.is_empty());
    }
}

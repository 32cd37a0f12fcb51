//! Filter controls
//!
//! A [`FilterControl`] is a pure selection source: it holds the option list
//! for one attribute and its current value, and turns user actions into
//! [`ControlEvent`]s. It never filters anything itself.

use serde::Serialize;
use tracing::warn;

use crate::model::{Attribute, Enumeration, FilterOption, Tag};

/// Notification emitted by a filter control
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "event")]
pub enum ControlEvent {
    /// The user picked an option; the empty value means "no constraint"
    SelectionChanged { attribute: Attribute, value: String },
    /// The user cleared the control
    Reset { attribute: Attribute },
}

impl ControlEvent {
    pub fn attribute(&self) -> Attribute {
        match self {
            ControlEvent::SelectionChanged { attribute, .. } => *attribute,
            ControlEvent::Reset { attribute } => *attribute,
        }
    }
}

/// Selection widget state for one attribute
#[derive(Debug, Clone, Serialize)]
pub struct FilterControl {
    attribute: Attribute,
    options: Vec<FilterOption>,
    /// Current value, empty when unconstrained
    value: String,
    enabled: bool,
}

impl FilterControl {
    /// A hidden control with no options
    pub fn new(attribute: Attribute) -> Self {
        Self {
            attribute,
            options: Vec::new(),
            value: String::new(),
            enabled: false,
        }
    }

    /// Fill the option list from an enumeration and show the control.
    pub fn populate<T: Tag>(&mut self, enumeration: &Enumeration<T>) {
        if enumeration.attribute() != self.attribute {
            warn!(
                "Refusing to populate {} control with {} options",
                self.attribute,
                enumeration.attribute()
            );
            return;
        }
        self.options = enumeration.options();
        self.value.clear();
        self.enabled = true;
    }

    /// Hide the control. Events are ignored until it is populated again.
    pub fn disable(&mut self) {
        self.enabled = false;
        self.value.clear();
    }

    /// User picked `value`. Returns `None` while the control is hidden.
    pub fn select(&mut self, value: &str) -> Option<ControlEvent> {
        if !self.enabled {
            return None;
        }
        self.value = value.to_string();
        Some(ControlEvent::SelectionChanged {
            attribute: self.attribute,
            value: self.value.clone(),
        })
    }

    /// User cleared the control.
    pub fn reset(&mut self) -> Option<ControlEvent> {
        if !self.enabled {
            return None;
        }
        self.value.clear();
        Some(ControlEvent::Reset {
            attribute: self.attribute,
        })
    }

    pub fn attribute(&self) -> Attribute {
        self.attribute
    }

    pub fn options(&self) -> &[FilterOption] {
        &self.options
    }

    /// Current value, `None` when unconstrained
    pub fn value(&self) -> Option<&str> {
        if self.value.is_empty() {
            None
        } else {
            Some(&self.value)
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{COLORS, SPOTS};

    #[test]
    fn test_hidden_until_populated() {
        let mut control = FilterControl::new(Attribute::Color);
        assert!(!control.is_enabled());
        assert!(control.options().is_empty());
        assert_eq!(control.select("0"), None);
        assert_eq!(control.reset(), None);
    }

    #[test]
    fn test_populate_normalizes_labels() {
        let mut control = FilterControl::new(Attribute::Spots);
        control.populate(&SPOTS);
        assert!(control.is_enabled());
        assert_eq!(control.value(), None);
        assert_eq!(control.options()[0].label, "None");
        assert_eq!(control.options()[1].value, "1");
        assert_eq!(control.options()[1].label, "White");
    }

    #[test]
    fn test_populate_rejects_wrong_attribute() {
        let mut control = FilterControl::new(Attribute::Spots);
        control.populate(&COLORS);
        assert!(!control.is_enabled());
        assert!(control.options().is_empty());
    }

    #[test]
    fn test_select_and_reset_events() {
        let mut control = FilterControl::new(Attribute::Color);
        control.populate(&COLORS);

        let event = control.select("0").unwrap();
        assert_eq!(
            event,
            ControlEvent::SelectionChanged {
                attribute: Attribute::Color,
                value: "0".to_string()
            }
        );
        assert_eq!(control.value(), Some("0"));

        let event = control.reset().unwrap();
        assert_eq!(event, ControlEvent::Reset { attribute: Attribute::Color });
        assert_eq!(event.attribute(), Attribute::Color);
        assert_eq!(control.value(), None);
    }

    #[test]
    fn test_disable_clears_value() {
        let mut control = FilterControl::new(Attribute::Color);
        control.populate(&COLORS);
        control.select("2");
        control.disable();
        assert_eq!(control.value(), None);
        assert_eq!(control.select("2"), None);
    }
}

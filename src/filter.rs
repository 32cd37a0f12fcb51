//! Filter selections and the pure filter function
//!
//! A [`FilterSelection`] holds one [`Constraint`] per attribute. The two
//! constraints compose with logical AND; an unset constraint admits every
//! record. [`apply`] derives the visible set from the canonical set and never
//! reorders records.

use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::control::ControlEvent;
use crate::model::{Attribute, ColorTag, Record, SpotTag, Tag};

/// A control reported a value absent from the attribute's enumeration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{value}' is not a known {attribute} option")]
pub struct SelectionMismatch {
    pub attribute: Attribute,
    pub value: String,
}

/// Per-attribute constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "value")]
pub enum Constraint<T> {
    /// No constraint: every record passes
    Unset,
    /// Only records carrying this tag pass
    Is(T),
    /// Value matched no tag: no record passes
    Unmatched(String),
}

impl<T> Default for Constraint<T> {
    fn default() -> Self {
        Constraint::Unset
    }
}

impl<T: Tag> Constraint<T> {
    /// Resolve a raw control value. The empty string means "no constraint".
    pub fn resolve(value: &str) -> Self {
        match Self::try_resolve(value) {
            Ok(constraint) => constraint,
            Err(mismatch) => {
                warn!("{}", mismatch);
                Constraint::Unmatched(mismatch.value)
            }
        }
    }

    /// Strict variant of [`resolve`](Self::resolve)
    pub fn try_resolve(value: &str) -> Result<Self, SelectionMismatch> {
        if value.trim().is_empty() {
            return Ok(Constraint::Unset);
        }
        T::enumeration()
            .lookup(value)
            .map(Constraint::Is)
            .ok_or_else(|| SelectionMismatch {
                attribute: T::ATTRIBUTE,
                value: value.to_string(),
            })
    }

    pub fn admits(&self, tag: T) -> bool {
        match self {
            Constraint::Unset => true,
            Constraint::Is(selected) => *selected == tag,
            Constraint::Unmatched(_) => false,
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, Constraint::Unset)
    }
}

/// Active selections for both attributes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterSelection {
    pub color: Constraint<ColorTag>,
    pub spots: Constraint<SpotTag>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_color(mut self, color: ColorTag) -> Self {
        self.color = Constraint::Is(color);
        self
    }

    pub fn with_spots(mut self, spots: SpotTag) -> Self {
        self.spots = Constraint::Is(spots);
        self
    }

    /// Set one attribute from a raw control value
    pub fn set(&mut self, attribute: Attribute, value: &str) {
        match attribute {
            Attribute::Color => self.color = Constraint::resolve(value),
            Attribute::Spots => self.spots = Constraint::resolve(value),
        }
    }

    /// Drop the constraint on one attribute
    pub fn clear(&mut self, attribute: Attribute) {
        self.set(attribute, "");
    }

    /// Apply a control event to the matching half of the selection.
    ///
    /// A reset is the same as a change to the empty value.
    pub fn update(&mut self, event: &ControlEvent) {
        match event {
            ControlEvent::SelectionChanged { attribute, value } => self.set(*attribute, value),
            ControlEvent::Reset { attribute } => self.clear(*attribute),
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.color.admits(record.color) && self.spots.admits(record.spots)
    }

    pub fn is_unconstrained(&self) -> bool {
        self.color.is_unset() && self.spots.is_unset()
    }
}

/// Records of `canonical` matching `selection`, in canonical order
pub fn apply(canonical: &[Record], selection: &FilterSelection) -> Vec<Record> {
    canonical
        .iter()
        .filter(|record| selection.matches(record))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LatLng, RecordId, COLORS, SPOTS};
    use proptest::prelude::*;

    fn scenario() -> Vec<Record> {
        vec![
            Record::new("R1", LatLng::new(52.0, 5.0), ColorTag::Red, SpotTag::White).with_id(RecordId(0)),
            Record::new("R2", LatLng::new(52.1, 5.1), ColorTag::Red, SpotTag::None).with_id(RecordId(1)),
            Record::new("R3", LatLng::new(52.2, 5.2), ColorTag::Brown, SpotTag::White).with_id(RecordId(2)),
        ]
    }

    fn names(records: &[Record]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_scenario_sequence() {
        let canonical = scenario();
        let mut selection = FilterSelection::new();

        selection.set(Attribute::Color, "red");
        assert_eq!(names(&apply(&canonical, &selection)), vec!["R1", "R2"]);

        selection.set(Attribute::Spots, "white");
        assert_eq!(names(&apply(&canonical, &selection)), vec!["R1"]);

        selection.update(&ControlEvent::Reset { attribute: Attribute::Color });
        assert_eq!(selection.color, Constraint::Unset);
        assert_eq!(names(&apply(&canonical, &selection)), vec!["R1", "R3"]);
    }

    #[test]
    fn test_option_values_resolve() {
        let canonical = scenario();
        let mut selection = FilterSelection::new();
        // "5" is the option value of brown
        selection.set(Attribute::Color, "5");
        assert_eq!(names(&apply(&canonical, &selection)), vec!["R3"]);
    }

    #[test]
    fn test_empty_canonical() {
        let selection = FilterSelection::new().with_color(ColorTag::Red);
        assert!(apply(&[], &selection).is_empty());
        assert!(apply(&[], &FilterSelection::new()).is_empty());
    }

    #[test]
    fn test_unknown_value_matches_nothing() {
        let canonical = scenario();
        let mut selection = FilterSelection::new();
        selection.set(Attribute::Color, "purple");
        assert_eq!(selection.color, Constraint::Unmatched("purple".to_string()));
        assert!(apply(&canonical, &selection).is_empty());

        selection.set(Attribute::Spots, "99");
        assert!(apply(&canonical, &selection).is_empty());
    }

    #[test]
    fn test_try_resolve_reports_mismatch() {
        let err = Constraint::<SpotTag>::try_resolve("stripes").unwrap_err();
        assert_eq!(err.attribute, Attribute::Spots);
        assert_eq!(err.value, "stripes");
        assert_eq!(err.to_string(), "'stripes' is not a known spots option");

        assert_eq!(Constraint::<SpotTag>::try_resolve(""), Ok(Constraint::Unset));
        assert_eq!(
            Constraint::<SpotTag>::try_resolve("1"),
            Ok(Constraint::Is(SpotTag::White))
        );
    }

    fn arb_record() -> impl Strategy<Value = Record> {
        let colors: Vec<ColorTag> = COLORS.tags().collect();
        let spots: Vec<SpotTag> = SPOTS.tags().collect();
        (
            "[a-z]{1,8}",
            -90.0..90.0f64,
            -180.0..180.0f64,
            prop::sample::select(colors),
            prop::sample::select(spots),
        )
            .prop_map(|(name, lat, lon, color, spots)| {
                Record::new(name, LatLng::new(lat, lon), color, spots)
            })
    }

    fn arb_canonical() -> impl Strategy<Value = Vec<Record>> {
        prop::collection::vec(arb_record(), 0..40).prop_map(|records| {
            records
                .into_iter()
                .enumerate()
                .map(|(i, r)| r.with_id(RecordId(i)))
                .collect()
        })
    }

    fn arb_constraint<T: Tag>() -> impl Strategy<Value = Constraint<T>> {
        let tags: Vec<T> = T::enumeration().tags().collect();
        prop_oneof![
            Just(Constraint::Unset),
            prop::sample::select(tags).prop_map(Constraint::Is),
            Just(Constraint::Unmatched("bogus".to_string())),
        ]
    }

    fn arb_selection() -> impl Strategy<Value = FilterSelection> {
        (arb_constraint::<ColorTag>(), arb_constraint::<SpotTag>())
            .prop_map(|(color, spots)| FilterSelection { color, spots })
    }

    proptest! {
        #[test]
        fn filtered_is_subset(canonical in arb_canonical(), selection in arb_selection()) {
            let visible = apply(&canonical, &selection);
            for record in &visible {
                prop_assert!(canonical.contains(record));
            }
        }

        #[test]
        fn unset_selection_is_identity(canonical in arb_canonical()) {
            prop_assert_eq!(apply(&canonical, &FilterSelection::new()), canonical);
        }

        #[test]
        fn refiltering_is_idempotent(canonical in arb_canonical(), selection in arb_selection()) {
            let once = apply(&canonical, &selection);
            let twice = apply(&once, &selection);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn filtering_preserves_order(canonical in arb_canonical(), selection in arb_selection()) {
            let ids: Vec<usize> = apply(&canonical, &selection).iter().map(|r| r.id.0).collect();
            prop_assert!(ids.windows(2).all(|w| w[0] < w[1]));
        }

        #[test]
        fn reset_equals_unset(
            canonical in arb_canonical(),
            color in arb_constraint::<ColorTag>(),
            spots in arb_constraint::<SpotTag>(),
        ) {
            let mut reset = FilterSelection { color, spots: spots.clone() };
            reset.update(&ControlEvent::Reset { attribute: Attribute::Color });
            let unset = FilterSelection { color: Constraint::Unset, spots };
            prop_assert_eq!(apply(&canonical, &reset), apply(&canonical, &unset));
        }
    }
}

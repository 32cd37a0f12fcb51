//! Observation record types

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use super::enumeration::{deserialize_tag, Attribute, EnumEntry, Enumeration, Tag};

/// Cap color of an observed mushroom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTag {
    Red,
    Green,
    Yellow,
    Blue,
    White,
    Brown,
}

/// Spot pattern on the cap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpotTag {
    None,
    White,
    Yellow,
    Red,
    Brown,
}

pub static COLORS: Enumeration<ColorTag> = Enumeration::new(
    Attribute::Color,
    &[
        EnumEntry { tag: ColorTag::Red, name: "red" },
        EnumEntry { tag: ColorTag::Green, name: "green" },
        EnumEntry { tag: ColorTag::Yellow, name: "yellow" },
        EnumEntry { tag: ColorTag::Blue, name: "blue" },
        EnumEntry { tag: ColorTag::White, name: "white" },
        EnumEntry { tag: ColorTag::Brown, name: "brown" },
    ],
);

pub static SPOTS: Enumeration<SpotTag> = Enumeration::new(
    Attribute::Spots,
    &[
        EnumEntry { tag: SpotTag::None, name: "none" },
        EnumEntry { tag: SpotTag::White, name: "white" },
        EnumEntry { tag: SpotTag::Yellow, name: "yellow" },
        EnumEntry { tag: SpotTag::Red, name: "red" },
        EnumEntry { tag: SpotTag::Brown, name: "brown" },
    ],
);

impl Tag for ColorTag {
    const ATTRIBUTE: Attribute = Attribute::Color;

    fn enumeration() -> &'static Enumeration<Self> {
        &COLORS
    }
}

impl Tag for SpotTag {
    const ATTRIBUTE: Attribute = Attribute::Spots;

    fn enumeration() -> &'static Enumeration<Self> {
        &SPOTS
    }
}

impl<'de> Deserialize<'de> for ColorTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_tag(deserializer)
    }
}

impl<'de> Deserialize<'de> for SpotTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_tag(deserializer)
    }
}

impl fmt::Display for ColorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl fmt::Display for SpotTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Geographic position, serialized as `[lat, lon]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LatLng {
    pub lat: f64,
    pub lon: f64,
}

impl LatLng {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Finite and within WGS84 bounds
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

impl From<[f64; 2]> for LatLng {
    fn from([lat, lon]: [f64; 2]) -> Self {
        Self { lat, lon }
    }
}

impl From<LatLng> for [f64; 2] {
    fn from(pos: LatLng) -> Self {
        [pos.lat, pos.lon]
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

/// Positional identity of a record within the fetched sequence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RecordId(pub usize);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single mushroom observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Assigned by the record store when the fetch completes
    #[serde(skip)]
    pub id: RecordId,
    pub name: String,
    #[serde(alias = "latlng")]
    pub position: LatLng,
    pub color: ColorTag,
    #[serde(rename = "spotPattern", alias = "spots")]
    pub spots: SpotTag,
}

impl Record {
    pub fn new(name: impl Into<String>, position: LatLng, color: ColorTag, spots: SpotTag) -> Self {
        Self {
            id: RecordId::default(),
            name: name.into(),
            position,
            color,
            spots,
        }
    }

    pub fn with_id(mut self, id: RecordId) -> Self {
        self.id = id;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_cover_every_variant() {
        let colors: Vec<ColorTag> = COLORS.tags().collect();
        assert_eq!(
            colors,
            vec![
                ColorTag::Red,
                ColorTag::Green,
                ColorTag::Yellow,
                ColorTag::Blue,
                ColorTag::White,
                ColorTag::Brown,
            ]
        );
        let spots: Vec<SpotTag> = SPOTS.tags().collect();
        assert_eq!(spots.len(), 5);
        assert_eq!(COLORS.attribute(), Attribute::Color);
        assert_eq!(SPOTS.attribute(), Attribute::Spots);
    }

    #[test]
    fn test_serialized_name_matches_table() {
        for tag in COLORS.tags() {
            let json = serde_json::to_string(&tag).unwrap();
            assert_eq!(json, format!("\"{}\"", tag.name()));
        }
        for tag in SPOTS.tags() {
            let json = serde_json::to_string(&tag).unwrap();
            assert_eq!(json, format!("\"{}\"", tag.name()));
        }
    }

    #[test]
    fn test_record_deserialize_names() {
        let json = r#"{"name": "Fly agaric", "position": [52.08, 5.23], "color": "red", "spotPattern": "white"}"#;
        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(record.name, "Fly agaric");
        assert_eq!(record.position, LatLng::new(52.08, 5.23));
        assert_eq!(record.color, ColorTag::Red);
        assert_eq!(record.spots, SpotTag::White);
        assert_eq!(record.id, RecordId(0));
    }

    #[test]
    fn test_record_deserialize_ordinals_and_aliases() {
        let json = r#"{"name": "Porcini", "latlng": [52.0, 5.0], "color": 5, "spots": 0}"#;
        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(record.color, ColorTag::Brown);
        assert_eq!(record.spots, SpotTag::None);
    }

    #[test]
    fn test_record_deserialize_unknown_tag() {
        let json = r#"{"name": "x", "position": [0.0, 0.0], "color": "purple", "spotPattern": "none"}"#;
        assert!(serde_json::from_str::<Record>(json).is_err());

        let json = r#"{"name": "x", "position": [0.0, 0.0], "color": 0, "spotPattern": 9}"#;
        assert!(serde_json::from_str::<Record>(json).is_err());
    }

    #[test]
    fn test_latlng_validity() {
        assert!(LatLng::new(52.081222, 5.235965).is_valid());
        assert!(LatLng::new(-90.0, 180.0).is_valid());
        assert!(!LatLng::new(91.0, 0.0).is_valid());
        assert!(!LatLng::new(0.0, -180.5).is_valid());
        assert!(!LatLng::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_record_serializes_spot_pattern() {
        let record = Record::new("Chanterelle", LatLng::new(1.0, 2.0), ColorTag::Yellow, SpotTag::None);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["spotPattern"], "none");
        assert_eq!(value["position"], serde_json::json!([1.0, 2.0]));
        assert!(value.get("id").is_none());
    }
}

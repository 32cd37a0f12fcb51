//! Observation records and their closed attribute enumerations
//!
//! - `record` - Record, LatLng, RecordId and the two tag types
//! - `enumeration` - static (tag, label) tables backing the filter controls

pub mod enumeration;
pub mod record;

pub use enumeration::{normalize_label, Attribute, EnumEntry, Enumeration, FilterOption, Tag};
pub use record::{ColorTag, LatLng, Record, RecordId, SpotTag, COLORS, SPOTS};

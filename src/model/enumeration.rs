//! Closed attribute enumerations
//!
//! Every filterable attribute is backed by a statically declared table of
//! `(tag, name)` entries. Table order is the option order shown in a filter
//! control, and the ordinal of each entry doubles as its option value.

use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;

/// Filterable record attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    Color,
    #[serde(alias = "spotPattern")]
    Spots,
}

impl Attribute {
    pub const ALL: [Attribute; 2] = [Attribute::Color, Attribute::Spots];

    pub fn name(&self) -> &'static str {
        match self {
            Attribute::Color => "color",
            Attribute::Spots => "spots",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A member of a closed attribute enumeration
pub trait Tag: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    /// Attribute this tag belongs to
    const ATTRIBUTE: Attribute;

    /// The static table listing every tag of this attribute
    fn enumeration() -> &'static Enumeration<Self>;

    /// Raw (lowercase) tag name
    fn name(self) -> &'static str {
        Self::enumeration().name_of(self)
    }

    /// Display label, e.g. `Red`
    fn label(self) -> String {
        normalize_label(self.name())
    }
}

/// One entry of an enumeration table
#[derive(Debug)]
pub struct EnumEntry<T: 'static> {
    pub tag: T,
    pub name: &'static str,
}

/// Ordered, statically declared tag table for one attribute
#[derive(Debug)]
pub struct Enumeration<T: 'static> {
    attribute: Attribute,
    entries: &'static [EnumEntry<T>],
}

impl<T> Enumeration<T> {
    pub const fn new(attribute: Attribute, entries: &'static [EnumEntry<T>]) -> Self {
        Self { attribute, entries }
    }
}

impl<T: Tag> Enumeration<T> {
    pub fn attribute(&self) -> Attribute {
        self.attribute
    }

    pub fn entries(&self) -> &'static [EnumEntry<T>] {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Tags in table order
    pub fn tags(&self) -> impl Iterator<Item = T> + '_ {
        self.entries.iter().map(|entry| entry.tag)
    }

    pub fn name_of(&self, tag: T) -> &'static str {
        self.entries
            .iter()
            .find(|entry| entry.tag == tag)
            .map_or("", |entry| entry.name)
    }

    pub fn by_ordinal(&self, ordinal: usize) -> Option<T> {
        self.entries.get(ordinal).map(|entry| entry.tag)
    }

    /// Map a control value back to a tag.
    ///
    /// Accepts the option value (the entry's ordinal as a decimal string) or
    /// the tag name, case-insensitively.
    pub fn lookup(&self, value: &str) -> Option<T> {
        let value = value.trim();
        if let Ok(ordinal) = value.parse::<usize>() {
            return self.by_ordinal(ordinal);
        }
        self.entries
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(value))
            .map(|entry| entry.tag)
    }

    /// Option list for a filter control, in table order
    pub fn options(&self) -> Vec<FilterOption> {
        self.entries
            .iter()
            .enumerate()
            .map(|(ordinal, entry)| FilterOption {
                value: ordinal.to_string(),
                label: normalize_label(entry.name),
            })
            .collect()
    }
}

/// A selectable option in a filter control
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
}

/// Upper-case the first character and lower-case the rest.
pub fn normalize_label(raw: &str) -> String {
    let lower = raw.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TagRepr {
    Ordinal(usize),
    Name(String),
}

/// Deserialize a tag from either its name or its ordinal.
pub(crate) fn deserialize_tag<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Tag,
{
    let enumeration = T::enumeration();
    match TagRepr::deserialize(deserializer)? {
        TagRepr::Ordinal(ordinal) => enumeration.by_ordinal(ordinal).ok_or_else(|| {
            de::Error::custom(format!("unknown {} ordinal {}", T::ATTRIBUTE, ordinal))
        }),
        TagRepr::Name(name) => enumeration.lookup(&name).ok_or_else(|| {
            de::Error::custom(format!("unknown {} tag '{}'", T::ATTRIBUTE, name))
        }),
    }
}

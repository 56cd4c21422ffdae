//! Entity types: discovered links, attribute fields, and durable records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A candidate entity discovered on a category listing page.
///
/// Transient: produced by discovery, consumed once by the orchestrator,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityLink {
    /// Human-readable display name derived from the href.
    pub name: String,

    /// Absolute URL of the entity's detail page.
    pub url: String,
}

impl EntityLink {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// The fixed set of infobox attributes the extractor recognizes.
///
/// Matching against row labels is exact and case-sensitive; anything
/// else in the infobox is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeKind {
    Abilities,
    Born,
    BondedWith,
    Titles,
    Aliases,
    Profession,
    Groups,
    Birthplace,
    Residence,
    Nationality,
}

impl AttributeKind {
    /// All attribute kinds, in infobox label order.
    pub const ALL: [AttributeKind; 10] = [
        AttributeKind::Abilities,
        AttributeKind::Born,
        AttributeKind::BondedWith,
        AttributeKind::Titles,
        AttributeKind::Aliases,
        AttributeKind::Profession,
        AttributeKind::Groups,
        AttributeKind::Birthplace,
        AttributeKind::Residence,
        AttributeKind::Nationality,
    ];

    /// The exact infobox row label for this attribute.
    pub fn label(&self) -> &'static str {
        match self {
            AttributeKind::Abilities => "Abilities",
            AttributeKind::Born => "Born",
            AttributeKind::BondedWith => "Bonded With",
            AttributeKind::Titles => "Titles",
            AttributeKind::Aliases => "Aliases",
            AttributeKind::Profession => "Profession",
            AttributeKind::Groups => "Groups",
            AttributeKind::Birthplace => "Birthplace",
            AttributeKind::Residence => "Residence",
            AttributeKind::Nationality => "Nationality",
        }
    }

    /// Look up an attribute by its exact (already trimmed) row label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.label() == label)
    }
}

/// The ten optional biographical attributes of an entity.
///
/// Extraction fills only the fields whose labels appear in the infobox;
/// everything else stays `None` and downstream readers treat that as
/// "unknown".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityFields {
    pub abilities: Option<String>,
    pub born: Option<String>,
    pub bonded_with: Option<String>,
    pub titles: Option<String>,
    pub aliases: Option<String>,
    pub profession: Option<String>,
    pub groups: Option<String>,
    pub birthplace: Option<String>,
    pub residence: Option<String>,
    pub nationality: Option<String>,
}

impl EntityFields {
    /// Create an empty field set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read one attribute.
    pub fn get(&self, kind: AttributeKind) -> Option<&str> {
        match kind {
            AttributeKind::Abilities => self.abilities.as_deref(),
            AttributeKind::Born => self.born.as_deref(),
            AttributeKind::BondedWith => self.bonded_with.as_deref(),
            AttributeKind::Titles => self.titles.as_deref(),
            AttributeKind::Aliases => self.aliases.as_deref(),
            AttributeKind::Profession => self.profession.as_deref(),
            AttributeKind::Groups => self.groups.as_deref(),
            AttributeKind::Birthplace => self.birthplace.as_deref(),
            AttributeKind::Residence => self.residence.as_deref(),
            AttributeKind::Nationality => self.nationality.as_deref(),
        }
    }

    /// Write one attribute.
    pub fn set(&mut self, kind: AttributeKind, value: impl Into<String>) {
        let value = Some(value.into());
        match kind {
            AttributeKind::Abilities => self.abilities = value,
            AttributeKind::Born => self.born = value,
            AttributeKind::BondedWith => self.bonded_with = value,
            AttributeKind::Titles => self.titles = value,
            AttributeKind::Aliases => self.aliases = value,
            AttributeKind::Profession => self.profession = value,
            AttributeKind::Groups => self.groups = value,
            AttributeKind::Birthplace => self.birthplace = value,
            AttributeKind::Residence => self.residence = value,
            AttributeKind::Nationality => self.nationality = value,
        }
    }

    /// True when no attribute was extracted.
    pub fn is_empty(&self) -> bool {
        AttributeKind::ALL.iter().all(|kind| self.get(*kind).is_none())
    }
}

/// Fields for an entity about to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntity {
    /// Unique identifying key across runs.
    pub name: String,

    pub fields: EntityFields,

    /// Identifier of the already-persisted image, if any.
    pub image_id: Option<i64>,
}

impl NewEntity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: EntityFields::new(),
            image_id: None,
        }
    }

    pub fn with_fields(mut self, fields: EntityFields) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_image_id(mut self, image_id: i64) -> Self {
        self.image_id = Some(image_id);
        self
    }
}

/// A persisted entity.
///
/// Created once per name by the ingestion pipeline, never updated in
/// place by it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRecord {
    /// Store-generated identifier.
    pub id: i64,

    /// Unique identifying key across runs.
    pub name: String,

    #[serde(flatten)]
    pub fields: EntityFields,

    /// Reference to the entity's image, if one was resolved.
    pub image_id: Option<i64>,

    pub created_at: DateTime<Utc>,
}

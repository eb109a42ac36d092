//! Core type definitions for family-tree processing
//!
//! This module contains the fundamental input types: person identifiers,
//! gender tags, and the raw person record consumed by the pipeline.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Unique identifier for a person record
///
/// Identifiers are externally assigned and stable. The original data source
/// uses millisecond timestamps, so the representation is a plain `u64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PersonId(pub u64);

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for PersonId {
    fn from(id: u64) -> Self {
        PersonId(id)
    }
}

/// Gender tag carried on a person record
///
/// Serialized values match the stored Spanish tags (`"hombre"`, `"mujer"`);
/// anything else deserializes as [`Gender::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub enum Gender {
    /// Male: `"hombre"`
    #[serde(rename = "hombre")]
    Male,
    /// Female: `"mujer"`
    #[serde(rename = "mujer")]
    Female,
    /// Missing or unrecognized tag
    #[default]
    #[serde(other)]
    Unknown,
}

impl Gender {
    /// Returns true if this tag is male
    pub fn is_male(&self) -> bool {
        matches!(self, Gender::Male)
    }

    /// Returns true if this tag is female
    pub fn is_female(&self) -> bool {
        matches!(self, Gender::Female)
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
            Gender::Unknown => write!(f, "unknown"),
        }
    }
}

/// Deserialize an id array that may be null or contain nulls, dropping them.
fn id_list<'de, D>(deserializer: D) -> Result<Vec<PersonId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<Option<PersonId>>> = Option::deserialize(deserializer)?;
    Ok(raw.into_iter().flatten().flatten().collect())
}

/// A raw person record as supplied by the external data store
///
/// Field renames match the JSON shape the original application persists
/// (`nombre`, `apellido`, `padresIds`, ...), so stored exports deserialize
/// directly. Relation arrays are null-filtered during deserialization; every
/// further cleanup (deduplication, dangling ids, self-references) happens
/// when a [`PersonGraph`](crate::graph::PersonGraph) is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    /// Unique, externally assigned id
    pub id: PersonId,
    /// Given name
    #[serde(rename = "nombre")]
    pub given_name: String,
    /// Family name
    #[serde(rename = "apellido", default)]
    pub family_name: String,
    /// Birth date, carried as an opaque string and ignored by the pipeline
    #[serde(rename = "fechaNacimiento", default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    /// Gender tag
    #[serde(rename = "genero", default)]
    pub gender: Gender,
    /// Free-text country, ignored by the pipeline
    #[serde(rename = "pais", default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Free-text city, ignored by the pipeline
    #[serde(rename = "ciudad", default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Claimed parent ids (0..2+, may repeat across records)
    #[serde(rename = "padresIds", default, deserialize_with = "id_list")]
    pub parent_ids: Vec<PersonId>,
    /// Claimed child ids
    #[serde(rename = "hijosIds", default, deserialize_with = "id_list")]
    pub child_ids: Vec<PersonId>,
    /// Claimed spouse id
    #[serde(rename = "conyugeId", default)]
    pub spouse_id: Option<PersonId>,
}

impl Person {
    /// Create a new person with empty relations
    pub fn new(id: u64, given_name: impl Into<String>, family_name: impl Into<String>) -> Self {
        Self {
            id: PersonId(id),
            given_name: given_name.into(),
            family_name: family_name.into(),
            birth_date: None,
            gender: Gender::Unknown,
            country: None,
            city: None,
            parent_ids: Vec::new(),
            child_ids: Vec::new(),
            spouse_id: None,
        }
    }

    /// Set the gender tag
    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = gender;
        self
    }

    /// Set the claimed spouse
    pub fn with_spouse(mut self, spouse: u64) -> Self {
        self.spouse_id = Some(PersonId(spouse));
        self
    }

    /// Set the claimed parents
    pub fn with_parents(mut self, parents: &[u64]) -> Self {
        self.parent_ids = parents.iter().map(|&id| PersonId(id)).collect();
        self
    }

    /// Set the claimed children
    pub fn with_children(mut self, children: &[u64]) -> Self {
        self.child_ids = children.iter().map(|&id| PersonId(id)).collect();
        self
    }

    /// Set the birth date string
    pub fn with_birth_date(mut self, date: impl Into<String>) -> Self {
        self.birth_date = Some(date.into());
        self
    }

    /// Full display name, given name first
    pub fn full_name(&self) -> String {
        if self.family_name.is_empty() {
            self.given_name.clone()
        } else {
            format!("{} {}", self.given_name, self.family_name)
        }
    }
}

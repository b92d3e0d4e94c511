//! Genre models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::require_text;

/// Which entity kind a genre applies to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GenreKind {
    Movie,
    Actor,
}

impl GenreKind {
    /// Stored form of the kind
    pub fn as_str(self) -> &'static str {
        match self {
            GenreKind::Movie => "movie",
            GenreKind::Actor => "actor",
        }
    }
}

/// Genre record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Genre {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: GenreKind,
    #[serde(with = "common::timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Genre creation payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenreInput {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: GenreKind,
}

impl GenreInput {
    pub fn validate(&self) -> Result<(), String> {
        require_text(&self.name, "name")
    }
}

impl Genre {
    pub fn new(input: GenreInput) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: input.name,
            kind: input.kind,
            created_at: common::timestamp::now(),
        }
    }
}

/// Optional genre filter on listings
#[derive(Debug, Clone, Deserialize)]
pub struct GenreQuery {
    #[serde(rename = "type")]
    pub kind: Option<GenreKind>,
}

//! Actor models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ImageSettings, dedupe_refs, require_text};

/// Actor record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Actor {
    pub id: String,
    pub name: String,
    pub age: Option<u32>,
    pub image: Option<String>,
    pub image_settings: Option<ImageSettings>,
    /// Ids of the movies the actor plays in
    #[serde(default)]
    pub movies: Vec<String>,
    pub description: Option<String>,
    /// Ids of `actor` genres
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(with = "common::timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Complete desired state of an actor, used for both create and update
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ActorInput {
    pub name: String,
    pub age: Option<u32>,
    pub image: Option<String>,
    pub image_settings: Option<ImageSettings>,
    #[serde(default)]
    pub movies: Vec<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
}

impl ActorInput {
    pub fn validate(&self) -> Result<(), String> {
        require_text(&self.name, "name")?;
        if let Some(settings) = &self.image_settings {
            settings.validate()?;
        }
        Ok(())
    }

    pub fn normalized(mut self) -> Self {
        self.movies = dedupe_refs(self.movies);
        self.genres = dedupe_refs(self.genres);
        self
    }
}

impl Actor {
    pub fn new(input: ActorInput) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: input.name,
            age: input.age,
            image: input.image,
            image_settings: input.image_settings,
            movies: input.movies,
            description: input.description,
            genres: input.genres,
            is_favorite: false,
            created_at: common::timestamp::now(),
        }
    }
}

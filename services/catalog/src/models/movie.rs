//! Movie models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ImageSettings, dedupe_refs, require_text};

/// Movie record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub id: String,
    pub title: String,
    pub url: Option<String>,
    pub image: Option<String>,
    pub image_settings: Option<ImageSettings>,
    /// Ids of the actors playing in the movie
    #[serde(default)]
    pub actors: Vec<String>,
    pub description: Option<String>,
    /// Ids of `movie` genres
    #[serde(default)]
    pub genres: Vec<String>,
    /// Running time in minutes
    pub duration: Option<u32>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(with = "common::timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Complete desired state of a movie, used for both create and update
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MovieInput {
    pub title: String,
    pub url: Option<String>,
    pub image: Option<String>,
    pub image_settings: Option<ImageSettings>,
    #[serde(default)]
    pub actors: Vec<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    pub duration: Option<u32>,
}

impl MovieInput {
    pub fn validate(&self) -> Result<(), String> {
        require_text(&self.title, "title")?;
        if let Some(settings) = &self.image_settings {
            settings.validate()?;
        }
        Ok(())
    }

    /// Same input with duplicate references removed
    pub fn normalized(mut self) -> Self {
        self.actors = dedupe_refs(self.actors);
        self.genres = dedupe_refs(self.genres);
        self
    }
}

impl Movie {
    /// Build a new record with a fresh id and creation time
    pub fn new(input: MovieInput) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: input.title,
            url: input.url,
            image: input.image,
            image_settings: input.image_settings,
            actors: input.actors,
            description: input.description,
            genres: input.genres,
            duration: input.duration,
            is_favorite: false,
            created_at: common::timestamp::now(),
        }
    }
}

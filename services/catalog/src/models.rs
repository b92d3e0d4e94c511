//! API models for request and response payloads

use serde::{Deserialize, Serialize};

pub mod actor;
pub mod genre;
pub mod movie;

pub use actor::{Actor, ActorInput};
pub use genre::{Genre, GenreInput, GenreKind, GenreQuery};
pub use movie::{Movie, MovieInput};

fn default_scale() -> f64 {
    1.0
}

fn default_position() -> f64 {
    50.0
}

/// How a poster or portrait is framed when displayed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ImageSettings {
    /// Zoom factor, 1.0 shows the image as is
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// Horizontal focal point in percent
    #[serde(default = "default_position")]
    pub position_x: f64,
    /// Vertical focal point in percent
    #[serde(default = "default_position")]
    pub position_y: f64,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            scale: default_scale(),
            position_x: default_position(),
            position_y: default_position(),
        }
    }
}

impl ImageSettings {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.scale > 0.0 && self.scale <= 10.0) {
            return Err("Image scale must be greater than 0 and at most 10".to_string());
        }

        let in_range = |v: f64| (0.0..=100.0).contains(&v);
        if !in_range(self.position_x) || !in_range(self.position_y) {
            return Err("Image position must be between 0 and 100".to_string());
        }

        Ok(())
    }
}

/// Drop repeated ids, keeping the first occurrence
pub fn dedupe_refs(refs: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    refs.into_iter()
        .filter(|id| seen.insert(id.clone()))
        .collect()
}

pub(crate) fn require_text(value: &str, field: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("Field `{}` is required", field));
    }
    Ok(())
}

/// Skip/limit query parameters for plain listings
#[derive(Debug, Clone, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub skip: u64,
    #[serde(default = "PageQuery::default_limit")]
    pub limit: u64,
}

impl PageQuery {
    fn default_limit() -> u64 {
        100
    }
}

/// Limit query parameter for the home page rails
#[derive(Debug, Clone, Deserialize)]
pub struct LimitQuery {
    #[serde(default = "LimitQuery::default_limit")]
    pub limit: u64,
}

impl LimitQuery {
    fn default_limit() -> u64 {
        6
    }
}

/// Query parameters for the search endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    pub q: String,
    #[serde(rename = "type")]
    pub scope: Option<String>,
}

/// Which entity kinds a search covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchScope {
    Both,
    Movies,
    Actors,
    /// Unrecognised scope, matches nothing
    Nothing,
}

impl SearchScope {
    pub fn parse(scope: Option<&str>) -> Self {
        match scope {
            None | Some("") => SearchScope::Both,
            Some("movies") => SearchScope::Movies,
            Some("actors") => SearchScope::Actors,
            Some(_) => SearchScope::Nothing,
        }
    }

    pub fn includes_movies(self) -> bool {
        matches!(self, SearchScope::Both | SearchScope::Movies)
    }

    pub fn includes_actors(self) -> bool {
        matches!(self, SearchScope::Both | SearchScope::Actors)
    }
}

/// Search results grouped by kind
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResults {
    pub movies: Vec<Movie>,
    pub actors: Vec<Actor>,
}

/// Favorite movies and actors
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FavoritesResponse {
    pub movies: Vec<Movie>,
    pub actors: Vec<Actor>,
}

/// Result of a favorite toggle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteResponse {
    pub is_favorite: bool,
}

/// Plain message response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

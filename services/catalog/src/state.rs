//! Application state shared across handlers

use auth::{AuthService, JwtService, UserRepository};
use common::DocumentStore;
use std::sync::Arc;

use crate::{
    config::CorsOrigins,
    repositories::{ActorRepository, GenreRepository, MovieRepository},
    seed::{AdminSeed, Seeder},
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub auth: AuthService,
    pub movie_repository: MovieRepository,
    pub actor_repository: ActorRepository,
    pub genre_repository: GenreRepository,
    pub seeder: Seeder,
    pub cors_origins: CorsOrigins,
}

impl AppState {
    /// Wire every repository to the same store
    pub fn new(
        store: Arc<dyn DocumentStore>,
        jwt: JwtService,
        admin: AdminSeed,
        cors_origins: CorsOrigins,
    ) -> Self {
        let users = UserRepository::new(store.clone());
        let movie_repository = MovieRepository::new(store.clone());
        let actor_repository = ActorRepository::new(store.clone());
        let genre_repository = GenreRepository::new(store.clone());
        let seeder = Seeder::new(
            users.clone(),
            movie_repository.clone(),
            actor_repository.clone(),
            genre_repository.clone(),
            admin,
        );

        Self {
            store,
            auth: AuthService::new(users, jwt),
            movie_repository,
            actor_repository,
            genre_repository,
            seeder,
            cors_origins,
        }
    }
}

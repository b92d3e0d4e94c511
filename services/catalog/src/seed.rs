//! Sample data seeding
//!
//! Populates an empty catalog with an administrator, a handful of genres,
//! actors and movies. Movies go through the repository so each actor's
//! `movies` list is filled by relationship reconciliation.

use auth::{AuthError, UserRepository};
use thiserror::Error;
use tracing::info;

use crate::{
    models::{ActorInput, GenreInput, GenreKind, MovieInput},
    repositories::{ActorRepository, GenreRepository, MovieRepository, RepositoryError},
};

/// Errors raised while seeding
#[derive(Error, Debug)]
pub enum SeedError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Result of a seeding request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The catalog already held movies, nothing was written
    AlreadySeeded,
    Created,
}

impl SeedOutcome {
    pub fn message(self) -> &'static str {
        match self {
            SeedOutcome::AlreadySeeded => "Data already exists",
            SeedOutcome::Created => "Sample data created successfully",
        }
    }
}

/// Administrator account created by the seeder
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub username: String,
    pub password: String,
}

/// Writes the sample catalog
#[derive(Clone)]
pub struct Seeder {
    users: UserRepository,
    movies: MovieRepository,
    actors: ActorRepository,
    genres: GenreRepository,
    admin: AdminSeed,
}

struct SampleActor {
    name: &'static str,
    age: u32,
    image: &'static str,
    description: &'static str,
    genre: usize,
    favorite: bool,
}

struct SampleMovie {
    title: &'static str,
    url: &'static str,
    image: &'static str,
    actor: usize,
    description: &'static str,
    genre: usize,
    duration: u32,
    favorite: bool,
}

const MOVIE_GENRES: [&str; 5] = ["Action", "Comédie", "Drame", "Sci-Fi", "Horreur"];
const ACTOR_GENRES: [&str; 3] = ["Action", "Comédie", "Drame"];

const ACTORS: [SampleActor; 3] = [
    SampleActor {
        name: "Leonardo DiCaprio",
        age: 49,
        image: "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcTmLMnelGCKCLTRHYxRqB7_AjmP5lBZa3NhxA&usqp=CAU",
        description: "Acteur et producteur américain, multiple oscarisé",
        genre: 2,
        favorite: true,
    },
    SampleActor {
        name: "Scarlett Johansson",
        age: 39,
        image: "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcQHzk7X8KH8_Yzng-LDt6xKTFQ-LLqVbC4Muw&usqp=CAU",
        description: "Actrice américaine polyvalente",
        genre: 0,
        favorite: false,
    },
    SampleActor {
        name: "Ryan Gosling",
        age: 43,
        image: "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcSyGn_JEA7x2BKfQ0tNW8qJPxl-hfPnLzwgTw&usqp=CAU",
        description: "Acteur et musicien canadien",
        genre: 2,
        favorite: false,
    },
];

const MOVIES: [SampleMovie; 5] = [
    SampleMovie {
        title: "Inception",
        url: "https://example.com/inception",
        image: "https://m.media-amazon.com/images/M/MV5BMjAxMzY3NjcxNF5BMl5BanBnXkFtZTcwNTI5OTM0Mw@@._V1_.jpg",
        actor: 0,
        description: "Un voleur qui s'infiltre dans les rêves des autres doit accomplir l'impossible : l'inception.",
        genre: 3,
        duration: 148,
        favorite: true,
    },
    SampleMovie {
        title: "Black Widow",
        url: "https://example.com/black-widow",
        image: "https://m.media-amazon.com/images/M/MV5BNjRmNDI5MjMtMmFhZi00NzYzLWIzMGEtNGJmNzEyODU2OTVjXkEyXkFqcGdeQXVyNjg2NjQwMDQ@._V1_.jpg",
        actor: 1,
        description: "Natasha Romanoff affronte son passé et une conspiration menaçante.",
        genre: 0,
        duration: 134,
        favorite: true,
    },
    SampleMovie {
        title: "La La Land",
        url: "https://example.com/la-la-land",
        image: "https://m.media-amazon.com/images/M/MV5BMzUzNDM2NzM2MV5BMl5BanBnXkFtZTgwNTM3NTg4OTE@._V1_.jpg",
        actor: 2,
        description: "Une histoire d'amour moderne entre un pianiste de jazz et une actrice aspirante à Los Angeles.",
        genre: 2,
        duration: 128,
        favorite: false,
    },
    SampleMovie {
        title: "Titanic",
        url: "https://example.com/titanic",
        image: "https://m.media-amazon.com/images/M/MV5BMDdmZGU3NDQtY2E5My00ZTliLWIzOTUtMTY4ZGI1YjdiNjk3XkEyXkFqcGdeQXVyNTA4NzY1MzY@._V1_.jpg",
        actor: 0,
        description: "Une histoire d'amour épique sur le navire le plus célèbre du monde.",
        genre: 2,
        duration: 195,
        favorite: false,
    },
    SampleMovie {
        title: "The Wolf of Wall Street",
        url: "https://example.com/wolf-wall-street",
        image: "https://m.media-amazon.com/images/M/MV5BMjIxMjgxNTk0MF5BMl5BanBnXkFtZTgwNjIyOTg2MDE@._V1_.jpg",
        actor: 0,
        description: "L'histoire vraie de Jordan Belfort, de son ascension à la chute spectaculaire de sa carrière de courtier.",
        genre: 2,
        duration: 180,
        favorite: false,
    },
];

impl Seeder {
    pub fn new(
        users: UserRepository,
        movies: MovieRepository,
        actors: ActorRepository,
        genres: GenreRepository,
        admin: AdminSeed,
    ) -> Self {
        Self {
            users,
            movies,
            actors,
            genres,
            admin,
        }
    }

    /// Seed the catalog unless it already holds a movie
    ///
    /// The emptiness check and the inserts are not atomic, so two concurrent
    /// first calls can both seed.
    pub async fn run(&self) -> Result<SeedOutcome, SeedError> {
        if self.movies.count().await? > 0 {
            info!("Catalog already holds movies, skipping seed");
            return Ok(SeedOutcome::AlreadySeeded);
        }

        self.seed_admin().await?;

        let movie_genres = self.seed_genres(&MOVIE_GENRES, GenreKind::Movie).await?;
        let actor_genres = self.seed_genres(&ACTOR_GENRES, GenreKind::Actor).await?;

        let mut actor_ids = Vec::with_capacity(ACTORS.len());
        for sample in &ACTORS {
            let actor = self
                .actors
                .create(ActorInput {
                    name: sample.name.to_string(),
                    age: Some(sample.age),
                    image: Some(sample.image.to_string()),
                    description: Some(sample.description.to_string()),
                    genres: vec![actor_genres[sample.genre].clone()],
                    ..Default::default()
                })
                .await?;
            if sample.favorite {
                self.actors.toggle_favorite(&actor.id).await?;
            }
            actor_ids.push(actor.id);
        }

        for sample in &MOVIES {
            let movie = self
                .movies
                .create(MovieInput {
                    title: sample.title.to_string(),
                    url: Some(sample.url.to_string()),
                    image: Some(sample.image.to_string()),
                    actors: vec![actor_ids[sample.actor].clone()],
                    description: Some(sample.description.to_string()),
                    genres: vec![movie_genres[sample.genre].clone()],
                    duration: Some(sample.duration),
                    ..Default::default()
                })
                .await?;
            if sample.favorite {
                self.movies.toggle_favorite(&movie.id).await?;
            }
        }

        info!(
            "Seeded {} movies and {} actors",
            MOVIES.len(),
            ACTORS.len()
        );
        Ok(SeedOutcome::Created)
    }

    async fn seed_admin(&self) -> Result<(), SeedError> {
        if self
            .users
            .find_by_username(&self.admin.username)
            .await?
            .is_some()
        {
            return Ok(());
        }

        self.users
            .create(&self.admin.username, &self.admin.password)
            .await?;
        info!("Created admin user: {}", self.admin.username);
        Ok(())
    }

    async fn seed_genres(
        &self,
        names: &[&str],
        kind: GenreKind,
    ) -> Result<Vec<String>, SeedError> {
        let mut ids = Vec::with_capacity(names.len());
        for name in names {
            let genre = self
                .genres
                .create(GenreInput {
                    name: name.to_string(),
                    kind,
                })
                .await?;
            ids.push(genre.id);
        }
        Ok(ids)
    }
}

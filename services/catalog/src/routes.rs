//! Catalog service routes

use auth::{
    User,
    models::{LoginCredentials, TokenResponse, UserResponse},
};
use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    http::{
        HeaderValue, Method, StatusCode,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    middleware,
    response::IntoResponse,
    routing::{delete, get, patch, post, put},
};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::{
    config::CorsOrigins,
    error::ApiResult,
    middleware::auth_middleware,
    models::{
        ActorInput, FavoriteResponse, FavoritesResponse, GenreInput, GenreQuery, LimitQuery,
        MessageResponse, MovieInput, PageQuery, SearchQuery, SearchResults, SearchScope,
    },
    repositories::SEARCH_LIMIT,
    state::AppState,
};

/// Favorites endpoint cap per kind
const FAVORITES_LIMIT: u64 = 100;

/// Create the router for the catalog service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/api/auth/me", get(me))
        .route("/api/movies", post(create_movie))
        .route("/api/movies/:id", put(update_movie).delete(delete_movie))
        .route("/api/actors", post(create_actor))
        .route("/api/actors/:id", put(update_actor).delete(delete_actor))
        .route("/api/genres", post(create_genre))
        .route("/api/genres/:id", delete(delete_genre))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/api/auth/login", post(login))
        .route("/api/movies", get(list_movies))
        .route("/api/movies/featured", get(featured_movie))
        .route("/api/movies/recent", get(recent_movies))
        .route("/api/movies/favorites", get(favorite_movies))
        .route("/api/movies/by-genre/:genre_id", get(movies_by_genre))
        .route("/api/movies/:id", get(get_movie))
        .route("/api/movies/:id/favorite", patch(toggle_movie_favorite))
        .route("/api/actors", get(list_actors))
        .route("/api/actors/recent", get(recent_actors))
        .route("/api/actors/favorites", get(favorite_actors))
        .route("/api/actors/by-genre/:genre_id", get(actors_by_genre))
        .route("/api/actors/:id", get(get_actor))
        .route("/api/actors/:id/favorite", patch(toggle_actor_favorite))
        .route("/api/genres", get(list_genres))
        .route("/api/favorites", get(favorites))
        .route("/api/search", get(search))
        .route("/api/init-data", post(init_data));

    let cors = cors_layer(&state.cors_origins);

    public_routes
        .merge(protected_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

fn cors_layer(origins: &CorsOrigins) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION]);

    match origins {
        CorsOrigins::Any => cors.allow_origin(Any),
        CorsOrigins::List(list) => {
            let origins: Vec<HeaderValue> = list
                .iter()
                .filter_map(|origin| match HeaderValue::from_str(origin) {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!("Ignoring invalid CORS origin: {}", origin);
                        None
                    }
                })
                .collect();
            cors.allow_origin(origins).allow_credentials(true)
        }
    }
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let store_ok = state.store.health_check().await;
    let status = if store_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if store_ok { "ok" } else { "degraded" },
            "service": "catalog"
        })),
    )
}

// Auth

pub async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<LoginCredentials>,
) -> ApiResult<impl IntoResponse> {
    let token = state
        .auth
        .login(&credentials.username, &credentials.password)
        .await?;
    Ok(Json(TokenResponse::bearer(token)))
}

pub async fn me(Extension(user): Extension<User>) -> impl IntoResponse {
    Json(UserResponse::from(user))
}

// Movies

pub async fn list_movies(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> ApiResult<impl IntoResponse> {
    let movies = state.movie_repository.list(page.skip, page.limit).await?;
    Ok(Json(movies))
}

/// Most recently created movie, `null` on an empty catalog
pub async fn featured_movie(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.movie_repository.featured().await?))
}

pub async fn recent_movies(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.movie_repository.recent(query.limit).await?))
}

pub async fn favorite_movies(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.movie_repository.favorites(query.limit).await?))
}

pub async fn movies_by_genre(
    State(state): State<AppState>,
    Path(genre_id): Path<String>,
    Query(query): Query<LimitQuery>,
) -> ApiResult<impl IntoResponse> {
    let movies = state
        .movie_repository
        .by_genre(&genre_id, query.limit)
        .await?;
    Ok(Json(movies))
}

pub async fn get_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.movie_repository.get(&id).await?))
}

pub async fn create_movie(
    State(state): State<AppState>,
    Json(input): Json<MovieInput>,
) -> ApiResult<impl IntoResponse> {
    let movie = state.movie_repository.create(input).await?;
    Ok((StatusCode::CREATED, Json(movie)))
}

pub async fn update_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<MovieInput>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.movie_repository.update(&id, input).await?))
}

pub async fn delete_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    state.movie_repository.delete(&id).await?;
    Ok(Json(MessageResponse::new("Movie deleted")))
}

pub async fn toggle_movie_favorite(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let is_favorite = state.movie_repository.toggle_favorite(&id).await?;
    Ok(Json(FavoriteResponse { is_favorite }))
}

// Actors

pub async fn list_actors(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> ApiResult<impl IntoResponse> {
    let actors = state.actor_repository.list(page.skip, page.limit).await?;
    Ok(Json(actors))
}

pub async fn recent_actors(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.actor_repository.recent(query.limit).await?))
}

pub async fn favorite_actors(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.actor_repository.favorites(query.limit).await?))
}

pub async fn actors_by_genre(
    State(state): State<AppState>,
    Path(genre_id): Path<String>,
    Query(query): Query<LimitQuery>,
) -> ApiResult<impl IntoResponse> {
    let actors = state
        .actor_repository
        .by_genre(&genre_id, query.limit)
        .await?;
    Ok(Json(actors))
}

pub async fn get_actor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.actor_repository.get(&id).await?))
}

pub async fn create_actor(
    State(state): State<AppState>,
    Json(input): Json<ActorInput>,
) -> ApiResult<impl IntoResponse> {
    let actor = state.actor_repository.create(input).await?;
    Ok((StatusCode::CREATED, Json(actor)))
}

pub async fn update_actor(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<ActorInput>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.actor_repository.update(&id, input).await?))
}

pub async fn delete_actor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    state.actor_repository.delete(&id).await?;
    Ok(Json(MessageResponse::new("Actor deleted")))
}

pub async fn toggle_actor_favorite(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let is_favorite = state.actor_repository.toggle_favorite(&id).await?;
    Ok(Json(FavoriteResponse { is_favorite }))
}

// Genres

pub async fn list_genres(
    State(state): State<AppState>,
    Query(query): Query<GenreQuery>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.genre_repository.list(query.kind).await?))
}

pub async fn create_genre(
    State(state): State<AppState>,
    Json(input): Json<GenreInput>,
) -> ApiResult<impl IntoResponse> {
    let genre = state.genre_repository.create(input).await?;
    Ok((StatusCode::CREATED, Json(genre)))
}

pub async fn delete_genre(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    state.genre_repository.delete(&id).await?;
    Ok(Json(MessageResponse::new("Genre deleted")))
}

// Cross-entity

pub async fn favorites(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let movies = state.movie_repository.favorites(FAVORITES_LIMIT).await?;
    let actors = state.actor_repository.favorites(FAVORITES_LIMIT).await?;
    Ok(Json(FavoritesResponse { movies, actors }))
}

/// Case-insensitive substring search; an unknown `type` matches nothing
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<impl IntoResponse> {
    let scope = SearchScope::parse(query.scope.as_deref());
    let mut results = SearchResults::default();

    if scope.includes_movies() {
        results.movies = state
            .movie_repository
            .search(&query.q, SEARCH_LIMIT)
            .await?;
    }
    if scope.includes_actors() {
        results.actors = state
            .actor_repository
            .search(&query.q, SEARCH_LIMIT)
            .await?;
    }

    Ok(Json(results))
}

pub async fn init_data(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let outcome = state.seeder.run().await?;
    Ok(Json(MessageResponse::new(outcome.message())))
}

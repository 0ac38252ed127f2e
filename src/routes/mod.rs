use axum::{
    routing::{get, post},
    Router,
};

use crate::app::AppState;

pub mod auth;
pub mod movies;

/// Everything mounted under `/api`.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/movies", get(movies::list_movies))
        .route("/movies/:id/credits", get(movies::movie_credits))
        .route(
            "/movies/:id/recommendations",
            get(movies::movie_recommendations),
        )
        .route("/movies/:id/similar", get(movies::similar_movies))
        .route("/movies/:id/videos", get(movies::movie_videos))
        .route("/auth/login", post(auth::login))
        .route("/auth/register", post(auth::register))
}

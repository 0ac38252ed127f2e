use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, warn};

use crate::app::AppState;
use crate::error::{ApiError, ApiResult};
use crate::models::{Credits, Movie, Results, Video};
use crate::tmdb::parse_movie_id;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct MoviesQuery {
    pub id: Option<String>,
    pub query: Option<String>,
    pub page: Option<String>,
}

impl MoviesQuery {
    /// A repeated key keeps its first value.
    fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "id" => &mut params.id,
                "query" => &mut params.query,
                "page" => &mut params.page,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        params
    }
}

/// Missing, zero or unparsable pages fall back to the first page.
fn page_or_default(raw: Option<&str>) -> u32 {
    raw.and_then(|p| p.trim().parse::<u32>().ok())
        .filter(|p| *p > 0)
        .unwrap_or(1)
}

/// `GET /api/movies`: details when `id` is given, search when `query` is
/// non-empty, otherwise the popular list.
pub async fn list_movies(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> ApiResult<Response> {
    let params = match query {
        Ok(Query(pairs)) => MoviesQuery::from_pairs(pairs),
        Err(rejection) => {
            warn!("Rejecting query string: {}", rejection.body_text());
            return Err(ApiError::Validation("Invalid query parameters".to_string()));
        }
    };
    let failed = ApiError::upstream("Failed to fetch movies");
    let page = page_or_default(params.page.as_deref());

    if let Some(id) = params.id.as_deref().filter(|id| !id.is_empty()) {
        debug!("Fetching details for movie {}", id);
        let details = state.tmdb.movie_details(id).await.map_err(failed)?;
        return Ok(Json(details).into_response());
    }

    if let Some(query) = params.query.as_deref().filter(|q| !q.trim().is_empty()) {
        debug!("Searching movies for '{}' (page {})", query, page);
        let found = state
            .tmdb
            .search_movies(query, page)
            .await
            .map_err(failed)?;
        return Ok(Json(found).into_response());
    }

    debug!("Fetching popular movies (page {})", page);
    let popular = state.tmdb.popular_movies(page).await.map_err(failed)?;
    Ok(Json(popular).into_response())
}

fn movie_id(path: Result<Path<String>, PathRejection>) -> ApiResult<i64> {
    let invalid = || ApiError::Validation("Invalid movie ID".to_string());
    let raw = match path {
        Ok(Path(raw)) => raw,
        Err(rejection) => {
            warn!("Rejecting movie id path: {}", rejection.body_text());
            return Err(invalid());
        }
    };
    parse_movie_id(&raw).ok_or_else(|| {
        warn!("Rejecting non-numeric movie id '{}'", raw);
        invalid()
    })
}

pub async fn movie_credits(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<Credits>> {
    let id = movie_id(id)?;
    let credits = state
        .tmdb
        .movie_credits(id)
        .await
        .map_err(ApiError::upstream("Failed to fetch credits"))?;
    Ok(Json(credits))
}

pub async fn movie_recommendations(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<Results<Movie>>> {
    let id = movie_id(id)?;
    let recommended = state
        .tmdb
        .movie_recommendations(id)
        .await
        .map_err(ApiError::upstream("Failed to fetch recommendations"))?;
    Ok(Json(recommended))
}

pub async fn similar_movies(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<Results<Movie>>> {
    let id = movie_id(id)?;
    let similar = state
        .tmdb
        .similar_movies(id)
        .await
        .map_err(ApiError::upstream("Failed to fetch similar movies"))?;
    Ok(Json(similar))
}

pub async fn movie_videos(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<Results<Video>>> {
    let id = movie_id(id)?;
    let videos = state
        .tmdb
        .movie_videos(id)
        .await
        .map_err(ApiError::upstream("Failed to fetch videos"))?;
    Ok(Json(videos))
}

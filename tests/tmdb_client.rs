use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use cinebrowse::error::ApiError;
use cinebrowse::models::MovieId;
use cinebrowse::tmdb::{TmdbApi, TmdbClient};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

const KEY: &str = "SECRETKEY123";

type Seen = Arc<Mutex<Vec<String>>>;

async fn fake_tmdb(State(seen): State<Seen>, uri: Uri) -> Response {
    seen.lock().unwrap().push(uri.to_string());
    match uri.path() {
        "/3/movie/popular" => (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "status_code": 7,
                "status_message": "Invalid API key: You must be granted a valid key.",
                "success": false
            })),
        )
            .into_response(),
        "/3/movie/13/videos" => "<html>not json</html>".into_response(),
        "/3/movie/550" => Json(json!({
            "id": 550,
            "title": "Fight Club",
            "overview": null,
            "release_date": "1999-10-15",
            "runtime": 139,
            "genres": [{ "id": 18, "name": "Drama" }],
            "videos": { "results": [
                { "id": "v1", "key": "qtRKdVHc-cE", "name": "Trailer", "site": "YouTube", "type": "Trailer" }
            ]},
            "credits": {
                "cast": [{ "id": 819, "name": "Edward Norton", "character": "The Narrator", "profile_path": null }],
                "crew": [{ "id": 7467, "name": "David Fincher", "job": "Director", "profile_path": null }]
            }
        }))
        .into_response(),
        "/3/search/movie" => Json(json!({
            "page": 1,
            "results": [],
            "total_pages": 0,
            "total_results": 0
        }))
        .into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn spawn_fake_tmdb() -> (TmdbClient, Seen) {
    let seen = Seen::default();
    let app = Router::new().fallback(fake_tmdb).with_state(seen.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake tmdb");
    });
    let client = TmdbClient::new(KEY, format!("http://{addr}/3"), "en-US").expect("client builds");
    (client, seen)
}

async fn closed_port() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    listener.local_addr().expect("local addr")
}

#[tokio::test]
async fn transport_errors_do_not_leak_the_api_key() {
    let addr = closed_port().await;
    let client = TmdbClient::new(KEY, format!("http://{addr}/3"), "en-US").unwrap();

    let err = client.popular_movies(1).await.unwrap_err();
    assert!(!format!("{err:#}").contains(KEY), "{err:#}");
    assert!(!format!("{err:?}").contains(KEY), "{err:?}");

    let api_err = ApiError::upstream("Failed to fetch movies")(err);
    assert!(!api_err.to_string().contains(KEY), "{api_err}");
    assert!(!format!("{api_err:?}").contains(KEY));
    assert_eq!(api_err.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let (client, seen) = spawn_fake_tmdb().await;

    let err = client.popular_movies(1).await.unwrap_err();
    let text = format!("{err:#}");
    assert!(text.contains("401"), "{text}");
    assert!(!text.contains(KEY), "{text}");
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn unparsable_success_body_is_an_error() {
    let (client, _seen) = spawn_fake_tmdb().await;

    let err = client.movie_videos(13).await.unwrap_err();
    assert!(format!("{err:#}").contains("JSON parse failed"), "{err:#}");
}

#[tokio::test]
async fn details_request_appends_videos_and_credits() {
    let (client, seen) = spawn_fake_tmdb().await;

    let details = client.movie_details("550").await.unwrap();
    assert_eq!(details.movie.id(), &MovieId::Number(550));
    assert_eq!(details.movie.overview, "");
    assert_eq!(details.runtime, Some(139));
    assert_eq!(details.credits.cast[0].character, "The Narrator");
    assert_eq!(details.directors(), vec!["David Fincher"]);
    assert_eq!(details.trailer().map(|v| v.key.as_str()), Some("qtRKdVHc-cE"));

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let request = &seen[0];
    assert!(request.starts_with("/3/movie/550?"), "{request}");
    assert!(request.contains(&format!("api_key={KEY}")), "{request}");
    assert!(request.contains("language=en-US"), "{request}");
    assert!(
        request.contains("append_to_response=videos%2Ccredits"),
        "{request}"
    );
}

#[tokio::test]
async fn search_terms_are_percent_encoded() {
    let (client, seen) = spawn_fake_tmdb().await;

    let page = client.search_movies("the matrix & co", 2).await.unwrap();
    assert!(page.results.is_empty());

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].starts_with("/3/search/movie?"), "{}", seen[0]);
    assert!(
        seen[0].ends_with("&query=the%20matrix%20%26%20co&page=2"),
        "{}",
        seen[0]
    );
}

//! Fetch a movie from TMDB through the same client the server uses and print
//! what the API routes would return for it.
//! Usage:
//!   cargo run --bin tmdb_props -- <tmdb_id>
//!   cargo run --bin tmdb_props -- search <query>
//! Requires TMDB_API_KEY in the environment (.env supported).

use anyhow::{bail, Context, Result};
use cinebrowse::models::{image_url, ImageSize};
use cinebrowse::tmdb::{parse_movie_id, TmdbApi, TmdbClient};
use dotenvy::dotenv;
use serde_json::json;
use std::env;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv();
    let args: Vec<String> = env::args().skip(1).collect();
    let tmdb = TmdbClient::from_env()?;

    match args.as_slice() {
        [cmd, rest @ ..] if cmd == "search" && !rest.is_empty() => {
            let query = rest.join(" ");
            let page = tmdb.search_movies(&query, 1).await?;
            println!(
                "{} results over {} pages for '{}'",
                page.total_results, page.total_pages, query
            );
            for movie in page.results {
                println!("  {:>8}  {} ({})", movie.id(), movie.title, movie.release_date);
            }
        }
        [id] => {
            let id = parse_movie_id(id).context("movie id must be numeric")?;
            let details = tmdb.movie_details(&id.to_string()).await?;
            let recommendations = tmdb.movie_recommendations(id).await?;
            let similar = tmdb.similar_movies(id).await?;

            let props = json!({
                "id": details.movie.id(),
                "title": details.movie.title,
                "release_date": details.movie.release_date,
                "runtime": details.runtime,
                "genres": details.genres.iter().map(|g| g.name.as_str()).collect::<Vec<_>>(),
                "directors": details.directors(),
                "cast": details.credits.cast.iter().take(10).map(|c| c.name.as_str()).collect::<Vec<_>>(),
                "trailer": details.trailer().map(|v| format!("https://www.youtube.com/watch?v={}", v.key)),
                "poster": details.movie.poster_url(ImageSize::Poster),
                "backdrop": details.movie.backdrop_path.as_deref().map(|p| image_url(p, ImageSize::Original)),
                "recommendations": recommendations.results.len(),
                "similar": similar.results.len(),
            });
            println!("{}", serde_json::to_string_pretty(&props)?);
        }
        _ => bail!("usage: tmdb_props <tmdb_id> | tmdb_props search <query>"),
    }
    Ok(())
}

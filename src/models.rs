use serde::{Deserialize, Deserializer, Serialize};

pub const IMAGE_HOST: &str = "image.tmdb.org";
const IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Movie identifiers arrive as numbers from TMDB and as strings for uploads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MovieId {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for MovieId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MovieId::Number(n) => write!(f, "{n}"),
            MovieId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovieSource {
    Tmdb,
    Upload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    id: MovieId,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub release_date: String,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popularity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre_ids: Option<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adult: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<MovieSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backdrop_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trailer_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tmdb_id: Option<i64>,
}

impl Movie {
    pub fn new(id: MovieId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            overview: String::new(),
            poster_path: None,
            backdrop_path: None,
            release_date: String::new(),
            vote_average: 0.0,
            vote_count: 0,
            popularity: None,
            original_language: None,
            original_title: None,
            genre_ids: None,
            adult: None,
            media_type: None,
            source: None,
            duration: None,
            thumbnail_url: None,
            backdrop_url: None,
            trailer_url: None,
            tmdb_id: None,
        }
    }

    /// The identifier is fixed at construction; there is no setter.
    pub fn id(&self) -> &MovieId {
        &self.id
    }

    pub fn poster_url(&self, size: ImageSize) -> Option<String> {
        self.poster_path.as_deref().map(|p| image_url(p, size))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    pub key: String,
    pub name: String,
    pub site: String,
    #[serde(rename = "type")]
    pub video_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastMember {
    pub id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub character: String,
    #[serde(default)]
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewMember {
    pub id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub job: String,
    #[serde(default)]
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credits {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

/// `{ "results": [...] }`, the shape TMDB uses for videos, similar and
/// recommendation lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Results<T> {
    pub results: Vec<T>,
}

impl<T> Default for Results<T> {
    fn default() -> Self {
        Self {
            results: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieDetails {
    #[serde(flatten)]
    pub movie: Movie,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub videos: Results<Video>,
    #[serde(default)]
    pub credits: Credits,
}

impl MovieDetails {
    /// First YouTube trailer, falling back to a teaser.
    pub fn trailer(&self) -> Option<&Video> {
        let youtube = |kind: &str| {
            self.videos
                .results
                .iter()
                .find(|v| v.site.eq_ignore_ascii_case("YouTube") && v.video_type == kind)
        };
        youtube("Trailer").or_else(|| youtube("Teaser"))
    }

    pub fn directors(&self) -> Vec<&str> {
        self.credits
            .crew
            .iter()
            .filter(|c| c.job == "Director")
            .map(|c| c.name.as_str())
            .collect()
    }
}

/// Paginated envelope returned by list and search endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub page: u32,
    pub results: Vec<T>,
    pub total_pages: u32,
    pub total_results: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    Thumbnail,
    Poster,
    Original,
}

impl ImageSize {
    fn as_path(&self) -> &'static str {
        match self {
            ImageSize::Thumbnail => "w200",
            ImageSize::Poster => "w500",
            ImageSize::Original => "original",
        }
    }
}

pub fn image_url(path: &str, size: ImageSize) -> String {
    let path = path.trim_start_matches('/');
    format!("{IMAGE_BASE}/{}/{path}", size.as_path())
}

/// Only images served from the TMDB image host are loaded.
pub fn is_allowed_image_url(url: &str) -> bool {
    let Some(rest) = url.strip_prefix("https://") else {
        return false;
    };
    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    host.eq_ignore_ascii_case(IMAGE_HOST)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_tmdb_details_with_appended_collections() {
        let value = json!({
            "id": 550,
            "title": "Fight Club",
            "overview": "An insomniac office worker...",
            "poster_path": "/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg",
            "backdrop_path": null,
            "release_date": "1999-10-15",
            "vote_average": 8.4,
            "vote_count": 26280,
            "runtime": 139,
            "genres": [{ "id": 18, "name": "Drama" }],
            "videos": { "results": [
                { "id": "v1", "key": "abc", "name": "Teaser", "site": "YouTube", "type": "Teaser" },
                { "id": "v2", "key": "def", "name": "Official Trailer", "site": "YouTube", "type": "Trailer" }
            ]},
            "credits": {
                "cast": [{ "id": 819, "name": "Edward Norton", "character": "Narrator", "profile_path": null }],
                "crew": [{ "id": 7467, "name": "David Fincher", "job": "Director", "profile_path": "/x.jpg" }]
            }
        });
        let details: MovieDetails = serde_json::from_value(value).expect("details deserialize");
        assert_eq!(details.movie.id(), &MovieId::Number(550));
        assert_eq!(details.runtime, Some(139));
        assert_eq!(details.genres[0].name, "Drama");
        assert_eq!(details.trailer().map(|v| v.key.as_str()), Some("def"));
        assert_eq!(details.directors(), vec!["David Fincher"]);
    }

    #[test]
    fn details_without_appended_collections_default_to_empty() {
        let details: MovieDetails =
            serde_json::from_value(json!({ "id": "upload-7", "title": "Home Video" }))
                .expect("details deserialize");
        assert_eq!(details.movie.id(), &MovieId::Text("upload-7".to_string()));
        assert!(details.videos.results.is_empty());
        assert!(details.credits.cast.is_empty());
        assert!(details.trailer().is_none());
    }

    #[test]
    fn source_is_restricted_to_known_values() {
        let ok: Movie =
            serde_json::from_value(json!({ "id": 1, "title": "A", "source": "upload" })).unwrap();
        assert_eq!(ok.source, Some(MovieSource::Upload));
        let bad = serde_json::from_value::<Movie>(json!({ "id": 1, "title": "A", "source": "dvd" }));
        assert!(bad.is_err());
    }

    #[test]
    fn absent_optional_fields_are_not_serialized() {
        let movie = Movie::new(MovieId::Number(3), "Minimal");
        let value = serde_json::to_value(&movie).unwrap();
        assert!(value.get("source").is_none());
        assert!(value.get("tmdb_id").is_none());
        assert_eq!(value["poster_path"], serde_json::Value::Null);
    }

    #[test]
    fn image_urls_stay_on_the_allowed_host() {
        let url = image_url("/abc.jpg", ImageSize::Poster);
        assert_eq!(url, "https://image.tmdb.org/t/p/w500/abc.jpg");
        assert!(is_allowed_image_url(&url));
        assert!(!is_allowed_image_url("https://evil.example/t/p/w500/abc.jpg"));
        assert!(!is_allowed_image_url("http://image.tmdb.org/t/p/w500/abc.jpg"));
        assert!(!is_allowed_image_url("https://image.tmdb.org.evil.example/x.jpg"));
    }
}

use std::cmp::Ordering;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::RequestId;
use crate::models::{genre, Movie, MovieId, UNKNOWN_YEAR};
use crate::services::{CatalogStats, Reason, Recommendation};

use super::AppState;

/// Search responses list at most this many movies; `total` stays uncapped
const SEARCH_RESULT_CAP: usize = 50;
/// Browse size used when the request does not name one
const DEFAULT_BROWSE_LIMIT: usize = 20;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct CreateMovieRequest {
    pub id: MovieId,
    pub title: String,
    pub year: Option<i32>,
    #[serde(default)]
    pub genre: String,
    pub rating: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct BrowseQuery {
    pub genres: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct MovieResponse {
    pub id: MovieId,
    pub title: String,
    pub year: i32,
    pub genre: String,
    pub rating: f64,
    pub img: String,
}

impl From<&Movie> for MovieResponse {
    fn from(movie: &Movie) -> Self {
        Self {
            id: movie.id,
            title: movie.title.clone(),
            year: movie.year,
            genre: movie.genre_field(),
            rating: movie.rating,
            img: poster_url(&movie.title),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub movies: Vec<MovieResponse>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub movies: Vec<MovieResponse>,
    pub total: usize,
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
    pub total_movies: usize,
    pub message: String,
    pub started_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationBase {
    pub id: MovieId,
    pub title: String,
    pub genre: String,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub id: MovieId,
    pub title: String,
    pub year: i32,
    pub genre: String,
    pub rating: f64,
    pub img: String,
    pub reason: Reason,
}

impl From<Recommendation> for RecommendationResponse {
    fn from(rec: Recommendation) -> Self {
        let Recommendation { movie, reason } = rec;
        Self {
            id: movie.id,
            year: movie.year,
            genre: movie.genre_field(),
            rating: movie.rating,
            img: poster_url(&movie.title),
            title: movie.title,
            reason,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub base: RecommendationBase,
    pub recommendations: Vec<RecommendationResponse>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct GenresResponse {
    pub genres: Vec<String>,
    pub total: usize,
}

/// Placeholder poster art in the catalog's palette
fn poster_url(title: &str) -> String {
    let safe = title
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ')
        .collect::<String>()
        .trim()
        .replace(' ', "+");
    let text = if safe.is_empty() { "Marquee" } else { safe.as_str() };
    format!("https://placehold.co/500x750/1e0730/a855f7?text={text}")
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Service status and catalog size
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let catalog = state.catalog.read().await;
    let total = catalog.len();
    Json(StatusResponse {
        status: "online".to_string(),
        total_movies: total,
        message: format!("catalog loaded with {total} movies"),
        started_at: state.started_at,
    })
}

/// List movies in title order, paginated
pub async fn list_movies(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Json<ListResponse> {
    let catalog = state.catalog.read().await;
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query
        .per_page
        .unwrap_or(state.config.default_page_size)
        .max(1);

    let total = catalog.len();
    // page and per_page come straight from the query string and can be huge;
    // saturate instead of overflowing
    let movies: Vec<MovieResponse> = catalog
        .iter()
        .skip(per_page.saturating_mul(page - 1))
        .take(per_page)
        .map(MovieResponse::from)
        .collect();

    Json(ListResponse {
        movies,
        total,
        page,
        per_page,
        total_pages: total.saturating_add(per_page - 1) / per_page,
    })
}

/// Search movies by title substring
pub async fn search_movies(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<SearchResponse>> {
    let term = query.q.unwrap_or_default().trim().to_string();
    if term.is_empty() {
        return Err(AppError::InvalidInput(
            "query parameter \"q\" is required".to_string(),
        ));
    }

    let catalog = state.catalog.read().await;
    let matches = catalog.search(&term);
    let total = matches.len();
    let movies: Vec<MovieResponse> = matches
        .into_iter()
        .take(SEARCH_RESULT_CAP)
        .map(MovieResponse::from)
        .collect();

    Ok(Json(SearchResponse {
        movies,
        total,
        query: term,
    }))
}

/// Movie details by id
pub async fn get_movie(
    State(state): State<AppState>,
    Path(id): Path<MovieId>,
) -> AppResult<Json<MovieResponse>> {
    let catalog = state.catalog.read().await;
    let movie = catalog
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("no movie with id {id}")))?;
    Ok(Json(MovieResponse::from(movie)))
}

/// Add a movie to the catalog
pub async fn create_movie(
    State(state): State<AppState>,
    Json(request): Json<CreateMovieRequest>,
) -> AppResult<(StatusCode, Json<MovieResponse>)> {
    let title = request.title.trim().to_string();
    if title.is_empty() {
        return Err(AppError::InvalidInput("title must not be empty".to_string()));
    }

    let movie = Movie::new(
        request.id,
        title,
        request.year.unwrap_or(UNKNOWN_YEAR),
        genre::normalize_field(&request.genre),
        request.rating.unwrap_or(0.0),
    );

    let mut catalog = state.catalog.write().await;
    let movie = catalog.add(movie)?;
    Ok((StatusCode::CREATED, Json(MovieResponse::from(&movie))))
}

/// Remove a movie by title
pub async fn delete_movie(
    State(state): State<AppState>,
    Query(query): Query<DeleteQuery>,
) -> AppResult<Json<MovieResponse>> {
    let mut catalog = state.catalog.write().await;
    let movie = catalog
        .remove(&query.title)
        .ok_or_else(|| AppError::NotFound(format!("no movie titled '{}'", query.title.trim())))?;
    Ok(Json(MovieResponse::from(&movie)))
}

/// Ranked recommendations for a movie
pub async fn recommendations_for(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(id): Path<MovieId>,
) -> AppResult<Json<RecommendationsResponse>> {
    tracing::info!(
        request_id = %request_id,
        movie_id = id,
        "Processing recommendation request"
    );

    let catalog = state.catalog.read().await;
    let base = catalog
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("no movie with id {id}")))?;
    let base = RecommendationBase {
        id: base.id,
        title: base.title.clone(),
        genre: base.genre_field(),
    };

    let ranked = catalog.recommend(id).unwrap_or_default();
    let total = ranked.len();
    let recommendations: Vec<RecommendationResponse> = ranked
        .into_iter()
        .take(state.config.recommend_cap)
        .map(RecommendationResponse::from)
        .collect();

    tracing::info!(
        request_id = %request_id,
        movie_id = id,
        total,
        returned = recommendations.len(),
        "Recommendations ready"
    );

    Ok(Json(RecommendationsResponse {
        base,
        recommendations,
        total,
    }))
}

/// Browse top-rated movies, optionally narrowed to a genre
pub async fn browse_recommendations(
    State(state): State<AppState>,
    Query(query): Query<BrowseQuery>,
) -> Json<Vec<MovieResponse>> {
    let catalog = state.catalog.read().await;
    let filter = query.genres.unwrap_or_default().trim().to_lowercase();
    let limit = query.limit.unwrap_or(DEFAULT_BROWSE_LIMIT);

    let mut movies: Vec<&Movie> = catalog
        .iter()
        .filter(|movie| filter.is_empty() || movie.genre_field().to_lowercase().contains(&filter))
        .collect();
    // Stable sort: equally rated movies stay in title order
    movies.sort_by(|a, b| b.rating.partial_cmp(&a.rating).unwrap_or(Ordering::Equal));

    Json(
        movies
            .into_iter()
            .take(limit)
            .map(MovieResponse::from)
            .collect(),
    )
}

/// All distinct genre tags in the catalog
pub async fn list_genres(State(state): State<AppState>) -> Json<GenresResponse> {
    let catalog = state.catalog.read().await;
    let genres = catalog.distinct_genres();
    let total = genres.len();
    Json(GenresResponse { genres, total })
}

/// Catalog rating statistics
pub async fn stats(State(state): State<AppState>) -> AppResult<Json<CatalogStats>> {
    let catalog = state.catalog.read().await;
    let stats = catalog
        .stats()
        .ok_or_else(|| AppError::NotFound("catalog is empty".to_string()))?;
    Ok(Json(stats))
}

/// Download the catalog as CSV, in title order
pub async fn export_catalog(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let catalog = state.catalog.read().await;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    // serialize only emits a header once the first row arrives; an empty
    // catalog must still export one
    writer
        .write_record(["id", "title", "year", "genre", "vote_average"])
        .map_err(|e| AppError::Internal(format!("failed to write export header: {e}")))?;
    for row in catalog.export_rows() {
        writer
            .serialize(row)
            .map_err(|e| AppError::Internal(format!("failed to serialize export row: {e}")))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("failed to flush export: {e}")))?;

    Ok(([(header::CONTENT_TYPE, "text/csv; charset=utf-8")], bytes))
}

use serde::{Deserialize, Serialize};

use super::genre;

/// Identifier for a movie, as carried by the source catalog data
pub type MovieId = u64;

/// Year stored when the source field cannot be parsed
pub const UNKNOWN_YEAR: i32 = 0;

/// Normalizes a title into the key used for ordering and exact lookup
pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

/// A single movie record in the catalog
///
/// Records are immutable after construction; every mutation of the catalog
/// replaces whole records rather than editing them in place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    /// Unique identifier across the whole catalog
    pub id: MovieId,
    /// Display title, trimmed
    pub title: String,
    /// Release year, [`UNKNOWN_YEAR`] when the source data was unparseable
    pub year: i32,
    /// Distinct genre tags in source order
    pub genres: Vec<String>,
    /// Average rating, 0.0 when the source data was unparseable
    pub rating: f64,
}

/// One parsed row of the source catalog, before record construction
///
/// The ingestion layer only guarantees the id; rating and year stay raw so
/// record construction can apply the best-effort conversions.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMovieRow {
    pub id: MovieId,
    pub title: String,
    pub genre: String,
    pub rating: String,
    pub year: String,
}

impl Movie {
    /// Creates a movie from already-validated fields
    pub fn new(id: MovieId, title: String, year: i32, genres: Vec<String>, rating: f64) -> Self {
        Self {
            id,
            title: title.trim().to_string(),
            year,
            genres,
            rating,
        }
    }

    /// Builds a movie from a raw catalog row
    ///
    /// Year keeps the first four characters of the source field ("1995-12-22"
    /// becomes 1995); rating falls back to 0.0; the genre field is split,
    /// deduplicated, and mapped to display names.
    pub fn from_raw(raw: &RawMovieRow) -> Self {
        let year = raw
            .year
            .trim()
            .chars()
            .take(4)
            .collect::<String>()
            .parse::<i32>()
            .unwrap_or(UNKNOWN_YEAR);
        let rating = raw.rating.trim().parse::<f64>().unwrap_or(0.0);

        Self::new(raw.id, raw.title.clone(), year, genre::normalize_field(&raw.genre), rating)
    }

    /// Lowercased, trimmed title used as the catalog ordering key
    pub fn normalized_title(&self) -> String {
        normalize_title(&self.title)
    }

    /// Genre tags joined back into the pipe-delimited external form
    pub fn genre_field(&self) -> String {
        self.genres.join("|")
    }
}

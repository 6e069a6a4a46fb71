use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};

use crate::models::{MovieId, RawMovieRow};

const ID_NAMES: &[&str] = &["movie_id", "id"];
const TITLE_NAMES: &[&str] = &["title", "original_title"];
const GENRE_NAMES: &[&str] = &["genres", "genre"];
const RATING_NAMES: &[&str] = &["vote_average", "rating"];
const YEAR_NAMES: &[&str] = &["release_date", "year", "release_year"];

/// Parsed rows plus a count of lines that could not be used
#[derive(Debug, Default)]
pub struct LoadedRows {
    pub rows: Vec<RawMovieRow>,
    pub skipped: usize,
}

/// Column positions for one file, resolved from its header when possible
#[derive(Debug, Clone, Copy)]
struct Columns {
    id: usize,
    title: usize,
    genre: Option<usize>,
    rating: Option<usize>,
    year: Option<usize>,
}

impl Columns {
    /// Fixed layout of the historical dump format
    const POSITIONAL: Self = Self {
        id: 1,
        title: 3,
        genre: Some(4),
        rating: Some(5),
        year: Some(6),
    };

    /// Resolves columns by header name; id and title must both be present
    fn from_headers(headers: &StringRecord) -> Option<Self> {
        let find = |names: &[&str]| {
            headers
                .iter()
                .position(|header| names.contains(&header.trim().to_lowercase().as_str()))
        };
        Some(Self {
            id: find(ID_NAMES)?,
            title: find(TITLE_NAMES)?,
            genre: find(GENRE_NAMES),
            rating: find(RATING_NAMES),
            year: find(YEAR_NAMES),
        })
    }
}

/// Reads catalog rows from a CSV file on disk
pub fn read_catalog_file(path: impl AsRef<Path>) -> Result<LoadedRows, csv::Error> {
    let file = File::open(path)?;
    read_catalog(file)
}

/// Reads catalog rows from any CSV source
///
/// Rows missing a parseable id or a non-empty title are counted as skipped
/// rather than failing the whole load; only I/O errors abort.
pub fn read_catalog<R: Read>(source: R) -> Result<LoadedRows, csv::Error> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(source);
    let columns = Columns::from_headers(reader.headers()?).unwrap_or(Columns::POSITIONAL);

    let mut loaded = LoadedRows::default();
    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(err) if matches!(err.kind(), csv::ErrorKind::Io(_)) => return Err(err),
            Err(_) => {
                loaded.skipped += 1;
                continue;
            }
        };
        match extract_row(&record, columns) {
            Some(row) => loaded.rows.push(row),
            None => loaded.skipped += 1,
        }
    }
    Ok(loaded)
}

fn extract_row(record: &StringRecord, columns: Columns) -> Option<RawMovieRow> {
    let id: MovieId = record.get(columns.id)?.trim().parse().ok()?;
    let title = record.get(columns.title)?.trim();
    if title.is_empty() {
        return None;
    }
    let field =
        |column: Option<usize>| column.and_then(|idx| record.get(idx)).unwrap_or("").to_string();

    Some(RawMovieRow {
        id,
        title: title.to_string(),
        genre: field(columns.genre),
        rating: field(columns.rating),
        year: field(columns.year),
    })
}

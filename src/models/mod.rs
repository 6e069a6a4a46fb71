pub mod genre;
pub mod movie;

pub use movie::{normalize_title, Movie, MovieId, RawMovieRow, UNKNOWN_YEAR};

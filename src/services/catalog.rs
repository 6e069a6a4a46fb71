use std::collections::{BTreeSet, HashMap};

use serde::Serialize;
use thiserror::Error;

use crate::models::{Movie, MovieId, RawMovieRow};
use crate::services::{GraphBuilder, Recommendation, Recommender, SimilarityGraph, TitleIndex};

/// Rejection reasons for manual insertion
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConflictError {
    #[error("a movie with id {0} already exists")]
    DuplicateId(MovieId),
    #[error("a movie titled '{0}' already exists")]
    DuplicateTitle(String),
}

impl ConflictError {
    /// The record field the conflict was detected on
    pub fn field(&self) -> &'static str {
        match self {
            Self::DuplicateId(_) => "id",
            Self::DuplicateTitle(_) => "title",
        }
    }
}

/// Outcome counters for a bulk load
#[derive(Debug, Default, Clone, Copy, Serialize)]
pub struct LoadSummary {
    pub loaded: usize,
    pub duplicate_ids: usize,
    pub duplicate_titles: usize,
}

/// Aggregate rating figures over the whole catalog
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CatalogStats {
    pub total_movies: usize,
    pub average_rating: f64,
    pub highest_rating: f64,
    pub lowest_rating: f64,
    pub graph_edges: usize,
}

/// One line of a catalog export
#[derive(Debug, Serialize)]
pub struct ExportRow {
    pub id: MovieId,
    pub title: String,
    pub year: i32,
    pub genre: String,
    pub vote_average: f64,
}

/// In-memory movie store coordinating three views of the same records
///
/// A movie is either present in all three structures or absent from all of
/// them: the title index for ordered access, the id map for O(1) lookup, and
/// the similarity graph for traversal. Every mutation keeps the three in
/// lockstep.
#[derive(Debug, Default)]
pub struct Catalog {
    titles: TitleIndex,
    by_id: HashMap<MovieId, Movie>,
    graph: SimilarityGraph,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bulk-loads parsed rows, then wires similarity edges in one pass
    ///
    /// Rows repeating an already-seen id or normalized title are dropped
    /// from all structures; the first occurrence wins.
    pub fn load(&mut self, rows: &[RawMovieRow], builder: &GraphBuilder) -> LoadSummary {
        let mut summary = LoadSummary::default();
        let mut accepted: Vec<Movie> = Vec::new();

        for row in rows {
            if self.by_id.contains_key(&row.id) {
                summary.duplicate_ids += 1;
                continue;
            }
            let movie = Movie::from_raw(row);
            if !self.titles.insert(movie.clone()) {
                summary.duplicate_titles += 1;
                continue;
            }
            self.by_id.insert(movie.id, movie.clone());
            self.graph.add_vertex(movie.id);
            accepted.push(movie);
            summary.loaded += 1;
        }

        builder.build(&accepted, &mut self.graph);
        summary
    }

    /// Inserts a single movie, connecting it to exact genre-field matches
    ///
    /// Unlike bulk loading, a conflicting id or title is an error rather
    /// than a silent drop.
    pub fn add(&mut self, movie: Movie) -> Result<Movie, ConflictError> {
        if self.by_id.contains_key(&movie.id) {
            return Err(ConflictError::DuplicateId(movie.id));
        }
        if self.titles.get(&movie.title).is_some() {
            return Err(ConflictError::DuplicateTitle(movie.title.clone()));
        }

        let genre_field = movie.genre_field();
        let peers: Vec<MovieId> = self
            .by_id
            .values()
            .filter(|existing| existing.genre_field() == genre_field)
            .map(|existing| existing.id)
            .collect();

        self.titles.insert(movie.clone());
        self.by_id.insert(movie.id, movie.clone());
        self.graph.add_vertex(movie.id);
        for peer in peers {
            self.graph.add_edge(movie.id, peer);
        }
        Ok(movie)
    }

    /// Removes a movie by title, scrubbing it from every structure
    pub fn remove(&mut self, title: &str) -> Option<Movie> {
        let movie = self.titles.remove(title)?;
        self.graph.remove_vertex(movie.id);
        self.by_id.remove(&movie.id);
        Some(movie)
    }

    pub fn get(&self, id: MovieId) -> Option<&Movie> {
        self.by_id.get(&id)
    }

    /// Exact lookup by title, normalized
    pub fn find_exact(&self, title: &str) -> Option<&Movie> {
        self.titles.get(title)
    }

    /// All movies, ascending by normalized title
    pub fn iter(&self) -> impl Iterator<Item = &Movie> {
        self.titles.iter()
    }

    /// Case-insensitive substring search over titles, in title order
    pub fn search(&self, term: &str) -> Vec<&Movie> {
        let needle = term.to_lowercase();
        self.titles
            .iter()
            .filter(|movie| movie.normalized_title().contains(&needle))
            .collect()
    }

    /// Ranked suggestions for a movie id; None when the id is unknown
    pub fn recommend(&self, id: MovieId) -> Option<Vec<Recommendation>> {
        let base = self.by_id.get(&id)?;
        Some(Recommender::new(self).recommend(base))
    }

    /// Every genre tag present in the catalog, sorted
    pub fn distinct_genres(&self) -> Vec<String> {
        let tags: BTreeSet<&String> = self
            .titles
            .iter()
            .flat_map(|movie| movie.genres.iter())
            .collect();
        tags.into_iter().cloned().collect()
    }

    /// Rating aggregates; None for an empty catalog
    pub fn stats(&self) -> Option<CatalogStats> {
        if self.by_id.is_empty() {
            return None;
        }
        let mut sum = 0.0;
        let mut highest = f64::MIN;
        let mut lowest = f64::MAX;
        for movie in self.by_id.values() {
            sum += movie.rating;
            highest = highest.max(movie.rating);
            lowest = lowest.min(movie.rating);
        }
        Some(CatalogStats {
            total_movies: self.by_id.len(),
            average_rating: sum / self.by_id.len() as f64,
            highest_rating: highest,
            lowest_rating: lowest,
            graph_edges: self.graph.edge_count(),
        })
    }

    /// Snapshot of the catalog in export shape, ascending by title
    pub fn export_rows(&self) -> Vec<ExportRow> {
        self.titles
            .iter()
            .map(|movie| ExportRow {
                id: movie.id,
                title: movie.title.clone(),
                year: movie.year,
                genre: movie.genre_field(),
                vote_average: movie.rating,
            })
            .collect()
    }

    pub fn graph(&self) -> &SimilarityGraph {
        &self.graph
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Checks the presence invariant across all three structures
    #[cfg(test)]
    fn assert_consistent(&self) {
        assert_eq!(self.titles.len(), self.by_id.len());
        assert_eq!(self.graph.vertex_count(), self.by_id.len());
        for movie in self.titles.iter() {
            assert!(self.by_id.contains_key(&movie.id));
            assert!(self.graph.contains(movie.id));
        }
    }
}

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::models::Movie;
use crate::services::SimilarityGraph;

/// Default number of higher-rated peers each movie is compared against
pub const DEFAULT_WINDOW: usize = 10;
/// Default maximum rating gap for an edge, inclusive
pub const DEFAULT_RATING_THRESHOLD: f64 = 1.0;

/// Bulk edge construction over a loaded catalog
///
/// Movies are grouped per genre tag and each group is sorted by rating, so
/// every movie only needs to be compared against a small window of its
/// closest-rated peers instead of the whole group.
#[derive(Debug, Clone, Copy)]
pub struct GraphBuilder {
    window: usize,
    rating_threshold: f64,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            rating_threshold: DEFAULT_RATING_THRESHOLD,
        }
    }
}

impl GraphBuilder {
    pub fn new(window: usize, rating_threshold: f64) -> Self {
        Self {
            window,
            rating_threshold,
        }
    }

    /// Adds similarity edges for every genre group in `movies`
    ///
    /// Only edges are added; every movie is expected to already be a vertex.
    /// The sort is stable, so movies with equal ratings keep their slice
    /// order and the resulting edge set is deterministic.
    pub fn build(&self, movies: &[Movie], graph: &mut SimilarityGraph) {
        let mut by_genre: HashMap<&str, Vec<&Movie>> = HashMap::new();
        for movie in movies {
            for tag in &movie.genres {
                by_genre.entry(tag.as_str()).or_default().push(movie);
            }
        }

        for group in by_genre.values_mut() {
            group.sort_by(|a, b| a.rating.partial_cmp(&b.rating).unwrap_or(Ordering::Equal));
            for (i, movie) in group.iter().enumerate() {
                for peer in group.iter().skip(i + 1).take(self.window) {
                    // Ascending order: once a peer is too far, all later ones are
                    if peer.rating - movie.rating > self.rating_threshold {
                        break;
                    }
                    graph.add_edge(movie.id, peer.id);
                }
            }
        }
    }
}

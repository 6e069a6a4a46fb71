use std::cmp::Ordering;
use std::collections::HashSet;

use serde::Serialize;

use crate::models::{Movie, MovieId};
use crate::services::Catalog;

/// Minimum normalized Levenshtein similarity for a title match
const SIMILARITY_THRESHOLD: f64 = 0.8;
/// Maximum number of movies collected from the graph neighborhood
const TRAVERSAL_LIMIT: usize = 50;

/// Why a movie made it into the suggestion list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    FranchiseOrName,
    GenreOrRating,
}

/// One ranked suggestion
#[derive(Debug, Clone)]
pub struct Recommendation {
    pub movie: Movie,
    pub reason: Reason,
}

/// Hybrid recommender: title similarity first, graph proximity second
///
/// The text pass scans every title and keeps candidates that share a genre
/// with the base and either read nearly the same or contain the base title.
/// The graph pass walks the similarity neighborhood and keeps anything
/// rated at least as high as the base. A movie found by both passes keeps
/// the text reason.
pub struct Recommender<'a> {
    catalog: &'a Catalog,
}

impl<'a> Recommender<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Collects and ranks suggestions for a base movie
    pub fn recommend(&self, base: &Movie) -> Vec<Recommendation> {
        let mut picks: Vec<Recommendation> = Vec::new();
        let mut seen: HashSet<MovieId> = HashSet::new();
        let base_key = base.normalized_title();

        for candidate in self.catalog.iter() {
            if candidate.id == base.id || !shares_genre(base, candidate) {
                continue;
            }
            let candidate_key = candidate.normalized_title();
            let similarity = strsim::normalized_levenshtein(&base_key, &candidate_key);
            if similarity >= SIMILARITY_THRESHOLD || candidate_key.contains(&base_key) {
                seen.insert(candidate.id);
                picks.push(Recommendation {
                    movie: candidate.clone(),
                    reason: Reason::FranchiseOrName,
                });
            }
        }

        for id in self.catalog.graph().bfs(base.id, TRAVERSAL_LIMIT) {
            if seen.contains(&id) {
                continue;
            }
            let Some(candidate) = self.catalog.get(id) else {
                continue;
            };
            if candidate.rating >= base.rating {
                seen.insert(id);
                picks.push(Recommendation {
                    movie: candidate.clone(),
                    reason: Reason::GenreOrRating,
                });
            }
        }

        // Stable sort: equal entries keep discovery order, so output is
        // deterministic for a given catalog
        picks.sort_by(|a, b| {
            reason_rank(a.reason)
                .cmp(&reason_rank(b.reason))
                .then_with(|| b.movie.rating.partial_cmp(&a.movie.rating).unwrap_or(Ordering::Equal))
        });
        picks
    }
}

fn reason_rank(reason: Reason) -> u8 {
    match reason {
        Reason::FranchiseOrName => 0,
        Reason::GenreOrRating => 1,
    }
}

fn shares_genre(a: &Movie, b: &Movie) -> bool {
    a.genres.iter().any(|tag| b.genres.contains(tag))
}

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use crate::models::MovieId;

/// Undirected graph over movie ids, kept as an adjacency map
///
/// Neighbor sets are ordered so traversal output is deterministic for a
/// given graph. Edges are stored in both directions; `a -> b` exists exactly
/// when `b -> a` does.
#[derive(Debug, Default)]
pub struct SimilarityGraph {
    adjacency: HashMap<MovieId, BTreeSet<MovieId>>,
}

impl SimilarityGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a vertex; existing vertices keep their edges
    pub fn add_vertex(&mut self, id: MovieId) {
        self.adjacency.entry(id).or_default();
    }

    /// Connects two existing vertices; self-loops and unknown ids are ignored
    pub fn add_edge(&mut self, a: MovieId, b: MovieId) {
        if a == b || !self.adjacency.contains_key(&a) || !self.adjacency.contains_key(&b) {
            return;
        }
        self.adjacency.entry(a).or_default().insert(b);
        self.adjacency.entry(b).or_default().insert(a);
    }

    /// Drops a vertex and scrubs it from every neighbor's edge set
    pub fn remove_vertex(&mut self, id: MovieId) -> bool {
        let Some(neighbors) = self.adjacency.get(&id).cloned() else {
            return false;
        };
        for neighbor in neighbors {
            if let Some(edges) = self.adjacency.get_mut(&neighbor) {
                edges.remove(&id);
            }
        }
        self.adjacency.remove(&id);
        true
    }

    pub fn contains(&self, id: MovieId) -> bool {
        self.adjacency.contains_key(&id)
    }

    /// Direct neighbors of a vertex, ascending by id
    pub fn neighbors(&self, id: MovieId) -> impl Iterator<Item = MovieId> + '_ {
        self.adjacency.get(&id).into_iter().flatten().copied()
    }

    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(BTreeSet::len).sum::<usize>() / 2
    }

    /// Breadth-first traversal from a start vertex, collecting at most
    /// `limit` reachable ids
    ///
    /// The start vertex itself is never part of the result. An unknown start
    /// or a zero limit yields an empty list. Within one hop, vertices are
    /// visited in ascending id order.
    pub fn bfs(&self, start: MovieId, limit: usize) -> Vec<MovieId> {
        if !self.adjacency.contains_key(&start) {
            return Vec::new();
        }

        let mut visited: HashSet<MovieId> = [start].into();
        let mut queue: VecDeque<MovieId> = [start].into();
        let mut reached = Vec::new();

        while reached.len() < limit {
            let Some(current) = queue.pop_front() else {
                break;
            };
            if current != start {
                reached.push(current);
            }
            if let Some(neighbors) = self.adjacency.get(&current) {
                for &neighbor in neighbors {
                    if visited.insert(neighbor) {
                        queue.push_back(neighbor);
                    }
                }
            }
        }
        reached
    }
}

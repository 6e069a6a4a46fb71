use std::cmp::Ordering;

use crate::models::{normalize_title, Movie};

type Link = Option<Box<Node>>;

/// One tree node, owning its record and both subtrees
#[derive(Debug)]
struct Node {
    movie: Movie,
    key: String,
    height: i32,
    left: Link,
    right: Link,
}

impl Node {
    fn new(movie: Movie, key: String) -> Self {
        Self {
            movie,
            key,
            height: 1,
            left: None,
            right: None,
        }
    }

    fn balance_factor(&self) -> i32 {
        TitleIndex::height_of(&self.left) - TitleIndex::height_of(&self.right)
    }

    fn update_height(&mut self) {
        self.height = 1 + TitleIndex::height_of(&self.left).max(TitleIndex::height_of(&self.right));
    }
}

/// Height-balanced binary search tree keyed by normalized title
///
/// Every structural helper takes ownership of a subtree and returns the
/// possibly-new subtree root, so rebalancing is a matter of swapping owned
/// boxes; no node is ever aliased. Lookups, inserts, and removals are
/// O(log n); in-order iteration visits records in ascending title order.
#[derive(Debug, Default)]
pub struct TitleIndex {
    root: Link,
    len: usize,
}

impl TitleIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records in the index
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Inserts a record keyed by its normalized title
    ///
    /// Returns false when the key is already present: the first record on a
    /// key wins and the new one is dropped, leaving the tree untouched.
    pub fn insert(&mut self, movie: Movie) -> bool {
        let key = movie.normalized_title();
        let (root, inserted) = Self::insert_at(self.root.take(), movie, key);
        self.root = Some(root);
        if inserted {
            self.len += 1;
        }
        inserted
    }

    /// Removes the record with a matching normalized title, if any
    pub fn remove(&mut self, title: &str) -> Option<Movie> {
        let key = normalize_title(title);
        let (root, removed) = Self::remove_at(self.root.take(), &key);
        self.root = root;
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    /// Exact lookup by normalized title
    pub fn get(&self, title: &str) -> Option<&Movie> {
        let key = normalize_title(title);
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match key.as_str().cmp(node.key.as_str()) {
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
                Ordering::Equal => return Some(&node.movie),
            };
        }
        None
    }

    /// Lazy in-order iterator over records, ascending by normalized title
    ///
    /// Restartable: each call walks the tree from scratch.
    pub fn iter(&self) -> InOrderIter<'_> {
        InOrderIter::new(self.root.as_deref())
    }

    fn height_of(link: &Link) -> i32 {
        link.as_ref().map_or(0, |node| node.height)
    }

    fn balance_of(link: &Link) -> i32 {
        link.as_ref().map_or(0, |node| node.balance_factor())
    }

    fn insert_at(link: Link, movie: Movie, key: String) -> (Box<Node>, bool) {
        let mut node = match link {
            None => return (Box::new(Node::new(movie, key)), true),
            Some(node) => node,
        };

        let inserted = match key.cmp(&node.key) {
            Ordering::Less => {
                let (child, inserted) = Self::insert_at(node.left.take(), movie, key);
                node.left = Some(child);
                inserted
            }
            Ordering::Greater => {
                let (child, inserted) = Self::insert_at(node.right.take(), movie, key);
                node.right = Some(child);
                inserted
            }
            // Duplicate key: the existing record wins, subtree unchanged
            Ordering::Equal => return (node, false),
        };

        if !inserted {
            return (node, false);
        }
        (Self::rebalance(node), true)
    }

    fn remove_at(link: Link, key: &str) -> (Link, Option<Movie>) {
        let mut node = match link {
            None => return (None, None),
            Some(node) => node,
        };

        let removed = match key.cmp(node.key.as_str()) {
            Ordering::Less => {
                let (child, removed) = Self::remove_at(node.left.take(), key);
                node.left = child;
                removed
            }
            Ordering::Greater => {
                let (child, removed) = Self::remove_at(node.right.take(), key);
                node.right = child;
                removed
            }
            Ordering::Equal => {
                return match (node.left.take(), node.right.take()) {
                    (None, right) => (right, Some(node.movie)),
                    (left, None) => (left, Some(node.movie)),
                    (left, Some(right)) => {
                        // Two children: pull up the in-order successor (the
                        // minimum of the right subtree), then delete it from
                        // where it came from; rebalancing happens bottom-up
                        // on the way out.
                        let successor_key = Self::min_key(&right);
                        let (right, successor) = Self::remove_at(Some(right), &successor_key);
                        let successor =
                            successor.expect("successor key was found in the right subtree");
                        let removed = std::mem::replace(&mut node.movie, successor);
                        node.key = successor_key;
                        node.left = left;
                        node.right = right;
                        (Some(Self::rebalance(node)), Some(removed))
                    }
                };
            }
        };

        if removed.is_none() {
            return (Some(node), None);
        }
        (Some(Self::rebalance(node)), removed)
    }

    /// Restores the AVL balance invariant at a node after a structural change
    fn rebalance(mut node: Box<Node>) -> Box<Node> {
        node.update_height();

        let balance = node.balance_factor();
        if balance > 1 {
            if Self::balance_of(&node.left) < 0 {
                // Left-right case: rotate the left child first
                node.left = node.left.take().map(Self::rotate_left);
            }
            return Self::rotate_right(node);
        }
        if balance < -1 {
            if Self::balance_of(&node.right) > 0 {
                // Right-left case: rotate the right child first
                node.right = node.right.take().map(Self::rotate_right);
            }
            return Self::rotate_left(node);
        }
        node
    }

    fn rotate_right(mut z: Box<Node>) -> Box<Node> {
        let mut y = z.left.take().expect("right rotation requires a left child");
        z.left = y.right.take();
        z.update_height();
        y.right = Some(z);
        y.update_height();
        y
    }

    fn rotate_left(mut z: Box<Node>) -> Box<Node> {
        let mut y = z.right.take().expect("left rotation requires a right child");
        z.right = y.left.take();
        z.update_height();
        y.left = Some(z);
        y.update_height();
        y
    }

    fn min_key(node: &Node) -> String {
        let mut current = node;
        while let Some(left) = current.left.as_deref() {
            current = left;
        }
        current.key.clone()
    }
}

/// In-order traversal state: the stack holds every unvisited ancestor
pub struct InOrderIter<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> InOrderIter<'a> {
    fn new(root: Option<&'a Node>) -> Self {
        let mut iter = Self { stack: Vec::new() };
        iter.push_left_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut node: Option<&'a Node>) {
        while let Some(current) = node {
            self.stack.push(current);
            node = current.left.as_deref();
        }
    }
}

impl<'a> Iterator for InOrderIter<'a> {
    type Item = &'a Movie;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        Some(&node.movie)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MovieId;

    fn test_movie(id: MovieId, title: &str, rating: f64) -> Movie {
        Movie::new(id, title.to_string(), 2000, vec!["Drama".to_string()], rating)
    }

    /// Checks heights and the balance invariant on every node, returning the
    /// subtree height
    fn check_balanced(link: &Link) -> i32 {
        match link {
            None => 0,
            Some(node) => {
                let left = check_balanced(&node.left);
                let right = check_balanced(&node.right);
                assert!(
                    (left - right).abs() <= 1,
                    "balance violated at key '{}'",
                    node.key
                );
                assert_eq!(
                    node.height,
                    1 + left.max(right),
                    "stale height at key '{}'",
                    node.key
                );
                1 + left.max(right)
            }
        }
    }

    fn collected_keys(index: &TitleIndex) -> Vec<String> {
        index.iter().map(Movie::normalized_title).collect()
    }

    #[test]
    fn test_insert_then_get() {
        let mut index = TitleIndex::new();
        assert!(index.insert(test_movie(1, "The Matrix", 8.1)));
        assert_eq!(index.get("The Matrix").map(|m| m.id), Some(1));
        // Lookup normalizes case and surrounding whitespace
        assert_eq!(index.get("  the matrix  ").map(|m| m.id), Some(1));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_get_missing_returns_none() {
        let mut index = TitleIndex::new();
        index.insert(test_movie(1, "Alien", 8.0));
        assert!(index.get("Aliens").is_none());
        assert!(TitleIndex::new().get("Alien").is_none());
    }

    #[test]
    fn test_duplicate_key_first_record_wins() {
        let mut index = TitleIndex::new();
        assert!(index.insert(test_movie(1, "Alien", 8.0)));
        assert!(!index.insert(test_movie(2, "  ALIEN  ", 5.0)));
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("alien").map(|m| m.id), Some(1));
        assert_eq!(index.get("alien").map(|m| m.rating), Some(8.0));
    }

    #[test]
    fn test_in_order_is_strictly_increasing() {
        let mut index = TitleIndex::new();
        for (id, title) in [
            (1, "Se7en"),
            (2, "Alien"),
            (3, "Zodiac"),
            (4, "Heat"),
            (5, "Moon"),
            (6, "Brazil"),
        ] {
            index.insert(test_movie(id, title, 7.0));
        }
        let keys = collected_keys(&index);
        assert_eq!(keys.len(), 6);
        assert!(keys.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_iterator_is_restartable() {
        let mut index = TitleIndex::new();
        index.insert(test_movie(1, "Alien", 8.0));
        index.insert(test_movie(2, "Heat", 7.9));
        let first: Vec<MovieId> = index.iter().map(|m| m.id).collect();
        let second: Vec<MovieId> = index.iter().map(|m| m.id).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_sorted_inserts_stay_within_avl_height_bound() {
        // Ascending inserts are the degenerate case for an unbalanced BST
        let mut index = TitleIndex::new();
        let n = 200;
        for i in 0..n {
            index.insert(test_movie(i as MovieId, &format!("Movie {i:04}"), 5.0));
        }
        assert_eq!(index.len(), n);

        let bound = 1.44 * ((n + 2) as f64).log2();
        assert!(
            (TitleIndex::height_of(&index.root) as f64) <= bound,
            "height {} exceeds AVL bound {bound:.2}",
            TitleIndex::height_of(&index.root)
        );
        check_balanced(&index.root);
        let keys = collected_keys(&index);
        assert!(keys.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_descending_and_interleaved_inserts_stay_balanced() {
        let mut index = TitleIndex::new();
        for i in (0..100).rev() {
            index.insert(test_movie(i as MovieId, &format!("Movie {i:03}"), 5.0));
        }
        check_balanced(&index.root);

        // Zig-zag pattern exercises the left-right and right-left cases
        let mut index = TitleIndex::new();
        for (id, title) in ["m", "a", "g", "c", "e", "z", "t", "w", "u"].iter().enumerate() {
            index.insert(test_movie(id as MovieId, title, 5.0));
        }
        check_balanced(&index.root);
    }

    #[test]
    fn test_remove_leaf_and_single_child_nodes() {
        let mut index = TitleIndex::new();
        for (id, title) in [(1, "d"), (2, "b"), (3, "f"), (4, "a"), (5, "e")] {
            index.insert(test_movie(id, title, 5.0));
        }

        // Leaf
        assert_eq!(index.remove("a").map(|m| m.id), Some(4));
        assert!(index.get("a").is_none());
        check_balanced(&index.root);

        // Single child: "f" keeps only "e" after the leaf removal
        assert_eq!(index.remove("f").map(|m| m.id), Some(3));
        assert!(index.get("f").is_none());
        assert_eq!(index.get("e").map(|m| m.id), Some(5));
        check_balanced(&index.root);
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_remove_node_with_two_children_uses_successor() {
        let mut index = TitleIndex::new();
        for (id, title) in [(1, "m"), (2, "f"), (3, "t"), (4, "a"), (5, "h"), (6, "p"), (7, "z")] {
            index.insert(test_movie(id, title, 5.0));
        }

        let removed = index.remove("m");
        assert_eq!(removed.map(|m| m.id), Some(1));
        assert!(index.get("m").is_none());
        assert_eq!(index.len(), 6);
        check_balanced(&index.root);

        let keys = collected_keys(&index);
        assert_eq!(keys, vec!["a", "f", "h", "p", "t", "z"]);
    }

    #[test]
    fn test_remove_missing_is_a_noop() {
        let mut index = TitleIndex::new();
        index.insert(test_movie(1, "Alien", 8.0));
        assert!(index.remove("Blade Runner").is_none());
        assert_eq!(index.len(), 1);
        assert!(TitleIndex::new().remove("anything").is_none());
    }

    #[test]
    fn test_remove_everything_in_mixed_order() {
        let mut index = TitleIndex::new();
        let titles = ["g", "c", "k", "a", "e", "i", "m", "b", "d", "f", "h", "j", "l", "n"];
        for (id, title) in titles.iter().enumerate() {
            index.insert(test_movie(id as MovieId, title, 5.0));
        }

        for title in ["g", "a", "n", "e", "k", "b", "m", "c", "l", "d", "j", "f", "i", "h"] {
            assert!(index.remove(title).is_some(), "failed to remove '{title}'");
            check_balanced(&index.root);
            let keys = collected_keys(&index);
            assert!(keys.windows(2).all(|pair| pair[0] < pair[1]));
        }
        assert!(index.is_empty());
        assert!(index.iter().next().is_none());
    }
}

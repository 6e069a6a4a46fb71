pub mod catalog;
pub mod graph_builder;
pub mod loader;
pub mod recommender;
pub mod similarity_graph;
pub mod title_index;

pub use catalog::{Catalog, CatalogStats, ConflictError, ExportRow, LoadSummary};
pub use graph_builder::GraphBuilder;
pub use loader::{read_catalog, read_catalog_file, LoadedRows};
pub use recommender::{Reason, Recommendation, Recommender};
pub use similarity_graph::SimilarityGraph;
pub use title_index::TitleIndex;

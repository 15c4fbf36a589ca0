pub mod assigner;
pub mod canonical;
pub mod config;
pub mod graph;
pub mod input;
pub mod matcher;
pub mod model;
pub mod normalizer;
pub mod storage;
pub mod utils;

pub use assigner::{assign_brands, assign_record, Assignment, BrandCatalog};
pub use canonical::resolve_canonical;
pub use graph::{build_graph, BrandRelationshipMap};
pub use matcher::{BrandMatcher, PriorityClass};
pub use model::{
    AssignedRecord, BrandConnectionRecord, ConfigError, MatchError, MatchResult, ProductRecord,
    StorageError,
};

pub mod sqlite;

use crate::model::{MatchResult, StorageError};
use crate::utils::RecordKey;

pub use sqlite::SqliteSink;

/// Destination for per-record match results.
/// Writes are upserts and may arrive in any order.
pub trait ResultSink {
    fn save_result(&self, key: &RecordKey<'_>, result: &MatchResult) -> Result<(), StorageError>;
}

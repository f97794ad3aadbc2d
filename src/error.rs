use std::path::PathBuf;

use thiserror::Error;

use crate::model::ItemKey;

/// Errors surfaced by the timeline outside of pointer interaction.
///
/// Interaction entry points never fail; stale or inconsistent gesture state
/// turns into a no-op instead.
#[derive(Error, Debug)]
pub enum TimelineError {
    #[error("visible window is empty: end ({end_ms}) must be after start ({start_ms})")]
    EmptyWindow { start_ms: i64, end_ms: i64 },

    #[error("group ids must be dense from 0: found id {found} at index {index}")]
    NonDenseGroups { index: usize, found: usize },

    #[error("item {key} points at row {row}, but there are only {row_count} groups")]
    UnknownRow {
        key: ItemKey,
        row: usize,
        row_count: usize,
    },

    #[error("failed to access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TimelineError>;

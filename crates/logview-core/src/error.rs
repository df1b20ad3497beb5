// File: crates/logview-core/src/error.rs
// Summary: Error type shared by the data model, renderer seam and configuration loading.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("segment has {depths} depths but {values} values")]
    SegmentLengthMismatch { depths: usize, values: usize },

    #[error("segment is empty")]
    EmptySegment,

    #[error("depth not strictly increasing at index {index}")]
    NonMonotonicDepth { index: usize },

    #[error("non-finite sample at index {index}")]
    NonFiniteSample { index: usize },

    #[error("container has no drawable area ({width}x{height})")]
    ZeroSizedContainer { width: f32, height: f32 },

    #[error("unknown renderer handle {0}")]
    UnknownHandle(u64),

    #[error("renderer failed: {0}")]
    Renderer(String),

    #[error("invalid presentation config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("failed to load curve '{curve_id}'")]
    DataSource {
        curve_id: String,
        #[source]
        source: anyhow::Error,
    },
}

pub type Result<T, E = ChartError> = std::result::Result<T, E>;

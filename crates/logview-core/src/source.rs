// File: crates/logview-core/src/source.rs
// Summary: Data source seam for segmented curves plus an in-memory implementation.

use std::collections::HashMap;

use anyhow::anyhow;

use crate::error::{ChartError, Result};
use crate::series::SegmentedSeries;

/// Where curves come from. Depths ascending, segments never empty.
pub trait DataSource {
    fn load_segmented_series(&self, curve_id: &str) -> Result<SegmentedSeries>;
}

/// Curves held in memory, keyed by curve id.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    curves: HashMap<String, SegmentedSeries>,
}

impl MemorySource {
    pub fn new() -> Self { Self::default() }

    pub fn with(mut self, series: SegmentedSeries) -> Self {
        self.insert(series);
        self
    }

    /// Add or replace a curve.
    pub fn insert(&mut self, series: SegmentedSeries) {
        self.curves.insert(series.curve_id.clone(), series);
    }

    pub fn len(&self) -> usize { self.curves.len() }
    pub fn is_empty(&self) -> bool { self.curves.is_empty() }
}

impl DataSource for MemorySource {
    fn load_segmented_series(&self, curve_id: &str) -> Result<SegmentedSeries> {
        self.curves.get(curve_id).cloned().ok_or_else(|| ChartError::DataSource {
            curve_id: curve_id.to_string(),
            source: anyhow!("no such curve"),
        })
    }
}

impl<S: DataSource + ?Sized> DataSource for &S {
    fn load_segmented_series(&self, curve_id: &str) -> Result<SegmentedSeries> {
        (**self).load_segmented_series(curve_id)
    }
}

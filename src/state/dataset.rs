// Chart data.
//
// A dataset is created once from user input or an uploaded file and is never
// mutated afterwards; new input replaces it wholesale. Series data is
// one-dimensional; heatmap data is a matrix addressed through a row-major
// flattened index.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DatasetError;
use crate::mapper::value_bounds;

pub const DEFAULT_X_AXIS_LABEL: &str = "X-axis";
pub const DEFAULT_Y_AXIS_LABEL: &str = "Y-axis";

// ═══════════════════════════════════════════════════════════════════════════
// Series
// ═══════════════════════════════════════════════════════════════════════════

/// Category labels with aligned numeric values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    labels: Vec<String>,
    values: Vec<f64>,
    x_axis_label: String,
    y_axis_label: String,
}

impl Series {
    pub fn new(labels: Vec<String>, values: Vec<f64>) -> Result<Self, DatasetError> {
        if labels.len() != values.len() {
            return Err(DatasetError::LengthMismatch {
                labels: labels.len(),
                values: values.len(),
            });
        }
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(DatasetError::NonFinite { index });
        }

        Ok(Self {
            labels,
            values,
            x_axis_label: DEFAULT_X_AXIS_LABEL.to_string(),
            y_axis_label: DEFAULT_Y_AXIS_LABEL.to_string(),
        })
    }

    /// Set the axis titles (taken from a CSV header).
    pub fn with_axis_labels(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.x_axis_label = x.into();
        self.y_axis_label = y.into();
        self
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn x_axis_label(&self) -> &str {
        &self.x_axis_label
    }

    pub fn y_axis_label(&self) -> &str {
        &self.y_axis_label
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Heatmap
// ═══════════════════════════════════════════════════════════════════════════

/// Two axis-label sequences plus a matrix indexed `[row][col]`.
///
/// Row is the y-axis index, column is the x-axis index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heatmap {
    x: Vec<String>,
    y: Vec<String>,
    z: Vec<Vec<f64>>,
}

impl Heatmap {
    pub fn new(x: Vec<String>, y: Vec<String>, z: Vec<Vec<f64>>) -> Result<Self, DatasetError> {
        if z.len() != y.len() {
            return Err(DatasetError::RowCountMismatch {
                rows: z.len(),
                y_labels: y.len(),
            });
        }
        for (row, cells) in z.iter().enumerate() {
            if cells.len() != x.len() {
                return Err(DatasetError::RowWidthMismatch {
                    row,
                    cols: cells.len(),
                    x_labels: x.len(),
                });
            }
            if let Some(col) = cells.iter().position(|v| !v.is_finite()) {
                return Err(DatasetError::NonFinite {
                    index: row * x.len() + col,
                });
            }
        }

        Ok(Self { x, y, z })
    }

    pub fn x_labels(&self) -> &[String] {
        &self.x
    }

    pub fn y_labels(&self) -> &[String] {
        &self.y
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.z
    }

    pub fn num_rows(&self) -> usize {
        self.y.len()
    }

    pub fn num_cols(&self) -> usize {
        self.x.len()
    }

    /// Row-major flattened index of a cell.
    #[inline]
    pub fn flat_index(&self, row: usize, col: usize) -> usize {
        row * self.num_cols() + col
    }

    /// `(row, col)` of a flattened index.
    #[inline]
    pub fn cell_of(&self, flat_index: usize) -> Option<(usize, usize)> {
        let cols = self.num_cols();
        if cols == 0 || flat_index >= self.num_rows() * cols {
            return None;
        }
        Some((flat_index / cols, flat_index % cols))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Dataset
// ═══════════════════════════════════════════════════════════════════════════

/// Any chart data the core can sonify.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Dataset {
    Series(Series),
    Heatmap(Heatmap),
}

impl Dataset {
    /// Number of elements in the flattened index space.
    pub fn flat_len(&self) -> usize {
        match self {
            Dataset::Series(series) => series.len(),
            Dataset::Heatmap(heatmap) => heatmap.num_rows() * heatmap.num_cols(),
        }
    }

    /// Values in flattened order (row-major for heatmaps).
    pub fn flattened(&self) -> Vec<f64> {
        match self {
            Dataset::Series(series) => series.values().to_vec(),
            Dataset::Heatmap(heatmap) => heatmap.rows().iter().flatten().copied().collect(),
        }
    }

    /// Global minimum and maximum over the whole dataset.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        value_bounds(self.flattened())
    }

    pub fn is_heatmap(&self) -> bool {
        matches!(self, Dataset::Heatmap(_))
    }
}

impl From<Series> for Dataset {
    fn from(series: Series) -> Self {
        Dataset::Series(series)
    }
}

impl From<Heatmap> for Dataset {
    fn from(heatmap: Heatmap) -> Self {
        Dataset::Heatmap(heatmap)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Chart kind & sonification mode
// ═══════════════════════════════════════════════════════════════════════════

/// The graph type the user selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
    Scatter,
    Heatmap,
}

impl ChartKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::Line => "line",
            ChartKind::Scatter => "scatter",
            ChartKind::Heatmap => "heatmap",
        }
    }
}

impl FromStr for ChartKind {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bar" => Ok(ChartKind::Bar),
            "line" => Ok(ChartKind::Line),
            "scatter" => Ok(ChartKind::Scatter),
            "heatmap" => Ok(ChartKind::Heatmap),
            other => Err(DatasetError::UnknownChartKind(other.to_string())),
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a run turns events into sound.
///
/// Chosen once when playback starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SonificationMode {
    /// One short tone per value (bar, scatter).
    Discrete,
    /// One oscillator gliding between values (line).
    Continuous,
    /// One short tone per matrix cell, slice-local scaling.
    Heatmap,
}

// ═══════════════════════════════════════════════════════════════════════════
// Chart
// ═══════════════════════════════════════════════════════════════════════════

/// A dataset together with the graph type it is displayed as.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub name: Option<String>,
    pub kind: ChartKind,
    pub dataset: Dataset,
}

impl Chart {
    /// Pair a graph type with data.
    ///
    /// A heatmap dataset always displays as a heatmap, and a series cannot.
    pub fn new(kind: ChartKind, dataset: Dataset) -> Result<Self, DatasetError> {
        match (&dataset, kind) {
            (Dataset::Heatmap(_), ChartKind::Heatmap) => {}
            (Dataset::Series(_), kind) if kind != ChartKind::Heatmap => {}
            _ => return Err(DatasetError::IncompatibleKind(kind.to_string())),
        }

        Ok(Self {
            name: None,
            kind,
            dataset,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.name = if name.trim().is_empty() {
            None
        } else {
            Some(name.trim().to_string())
        };
        self
    }

    pub fn mode(&self) -> SonificationMode {
        match self.kind {
            ChartKind::Line => SonificationMode::Continuous,
            ChartKind::Heatmap => SonificationMode::Heatmap,
            ChartKind::Bar | ChartKind::Scatter => SonificationMode::Discrete,
        }
    }

    /// Whole-dataset range, used to refill the end field after a bad entry.
    pub fn default_range(&self) -> Option<(usize, usize)> {
        match self.dataset.flat_len() {
            0 => None,
            len => Some((0, len - 1)),
        }
    }
}

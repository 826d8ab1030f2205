// src/loader.rs
//
// Dataset loading from user input: uploaded CSV text, manually entered
// label/value pairs, and heatmap matrices. All loaders return a validated
// `Dataset`; none of them touch playback state.

use std::path::Path;

use log::{debug, info};
use serde::Deserialize;

use crate::error::DatasetError;
use crate::state::{Chart, ChartKind, Dataset, Heatmap, Series};

/// Smallest number of points a chart is drawn with.
pub const MIN_CHART_POINTS: usize = 2;

// ═══════════════════════════════════════════════════════════════════════════
// CSV
// ═══════════════════════════════════════════════════════════════════════════

/// Parse CSV text into a series.
///
/// The header names the axes (first two columns). Every data row needs a
/// non-empty label in the first column and a number in the second; extra
/// columns are ignored. Row numbers in errors count the header as row 1.
pub fn parse_csv(text: &str) -> Result<Series, DatasetError> {
    let rows: Vec<&str> = text.trim().lines().collect();
    if rows.len() < 2 {
        return Err(DatasetError::MissingRows);
    }

    let header: Vec<&str> = rows[0].split(',').collect();
    if header.len() < 2 {
        return Err(DatasetError::ShortHeader);
    }

    let mut labels = Vec::with_capacity(rows.len() - 1);
    let mut values = Vec::with_capacity(rows.len() - 1);

    for (index, row) in rows.iter().enumerate().skip(1) {
        let row_number = index + 1;
        let cols: Vec<&str> = row.split(',').collect();
        if cols.len() < 2 {
            return Err(DatasetError::ShortRow { row: row_number });
        }

        let label = cols[0].trim();
        if label.is_empty() {
            return Err(DatasetError::MissingLabel { row: row_number });
        }

        let value = cols[1]
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or(DatasetError::InvalidNumber { row: row_number })?;

        labels.push(label.to_string());
        values.push(value);
    }

    debug!("parsed {} CSV rows", values.len());
    Ok(Series::new(labels, values)?.with_axis_labels(header[0].trim(), header[1].trim()))
}

/// Check an upload before reading it.
pub fn validate_upload(file_name: &str, size: u64, limit_bytes: u64) -> Result<(), DatasetError> {
    if !file_name.ends_with(".csv") {
        return Err(DatasetError::NotCsv);
    }
    if size > limit_bytes {
        return Err(DatasetError::TooLarge { size, limit_bytes });
    }
    Ok(())
}

/// Byte count reported by a host that only has floating-point numbers.
pub fn checked_upload_size(size: f64) -> Result<u64, DatasetError> {
    if size.is_finite() && size >= 0.0 && size.fract() == 0.0 && size <= u64::MAX as f64 {
        Ok(size as u64)
    } else {
        Err(DatasetError::InvalidSize(size))
    }
}

/// Validate and parse a CSV file from disk.
pub fn load_csv_file(path: impl AsRef<Path>, limit_bytes: u64) -> Result<Series, DatasetError> {
    let path = path.as_ref();
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let size = std::fs::metadata(path)?.len();
    validate_upload(&file_name, size, limit_bytes)?;

    let text = std::fs::read_to_string(path)?;
    let series = parse_csv(&text)?;
    info!("loaded {} points from {}", series.len(), path.display());
    Ok(series)
}

// ═══════════════════════════════════════════════════════════════════════════
// JSON
// ═══════════════════════════════════════════════════════════════════════════

/// Manually entered data as stored by the data-entry form.
#[derive(Debug, Deserialize)]
struct ManualData {
    labels: Vec<String>,
    values: Vec<f64>,
}

/// Heatmap data: axis labels and a row-major matrix.
#[derive(Debug, Deserialize)]
struct HeatmapData {
    x: Vec<String>,
    y: Vec<String>,
    z: Vec<Vec<f64>>,
}

/// Either JSON shape, told apart by its keys.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DatasetJson {
    Heatmap(HeatmapData),
    Manual(ManualData),
}

pub fn parse_manual_json(json: &str) -> Result<Series, DatasetError> {
    let data: ManualData = serde_json::from_str(json)?;
    Series::new(data.labels, data.values)
}

pub fn parse_heatmap_json(json: &str) -> Result<Heatmap, DatasetError> {
    let data: HeatmapData = serde_json::from_str(json)?;
    Heatmap::new(data.x, data.y, data.z)
}

/// Parse either manual data or heatmap data.
pub fn parse_dataset_json(json: &str) -> Result<Dataset, DatasetError> {
    match serde_json::from_str::<DatasetJson>(json)? {
        DatasetJson::Heatmap(data) => Ok(Heatmap::new(data.x, data.y, data.z)?.into()),
        DatasetJson::Manual(data) => Ok(Series::new(data.labels, data.values)?.into()),
    }
}

/// Manual data from the data-entry form rows, skipping blank rows.
pub fn series_from_rows<'a>(
    rows: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Result<Series, DatasetError> {
    let mut labels = Vec::new();
    let mut values = Vec::new();

    for (index, (label, value)) in rows.into_iter().enumerate() {
        let (label, value) = (label.trim(), value.trim());
        if label.is_empty() && value.is_empty() {
            continue;
        }
        let row = index + 1;
        if label.is_empty() {
            return Err(DatasetError::MissingLabel { row });
        }
        let value = value
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or(DatasetError::InvalidNumber { row })?;
        labels.push(label.to_string());
        values.push(value);
    }

    Series::new(labels, values)
}

// ═══════════════════════════════════════════════════════════════════════════
// Chart
// ═══════════════════════════════════════════════════════════════════════════

/// Pair loaded data with the selected graph type.
///
/// Charts need at least [`MIN_CHART_POINTS`] points.
pub fn build_chart(kind: ChartKind, dataset: Dataset) -> Result<Chart, DatasetError> {
    if dataset.flat_len() < MIN_CHART_POINTS {
        return Err(DatasetError::InsufficientData);
    }
    Chart::new(kind, dataset)
}

/// Load a dataset file, choosing the parser by extension.
pub fn load_dataset_file(path: impl AsRef<Path>, limit_bytes: u64) -> Result<Dataset, DatasetError> {
    let path = path.as_ref();
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        let json = std::fs::read_to_string(path)?;
        parse_dataset_json(&json)
    } else {
        load_csv_file(path, limit_bytes).map(Dataset::from)
    }
}

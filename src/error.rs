//! Error types for the sonification core.
//!
//! Every failure leaves the playback state machine where it was. Validation
//! problems are surfaced to the user and are fully recoverable; resource
//! problems must be resolved (audio started from a user gesture) before any
//! playback action is accepted.

use thiserror::Error;

/// A user-supplied range or control value was rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// An index field did not contain an integer.
    ///
    /// ```
    /// # use sonify::ValidationError;
    /// let err = ValidationError::NotANumber { field: "start", input: "abc".to_string() };
    /// assert_eq!(err.to_string(), "start index is not a number: 'abc'");
    /// ```
    #[error("{field} index is not a number: '{input}'")]
    NotANumber { field: &'static str, input: String },

    /// The requested range does not fit the dataset.
    ///
    /// `max_index` is the largest valid index, used by the UI to reset the end
    /// field.
    #[error("Please enter valid start and end indices between 0 and {max_index}.")]
    OutOfBounds {
        start: i64,
        end: i64,
        max_index: usize,
    },

    /// The dataset has no points to sonify.
    #[error("No data points to sonify in the selected range.")]
    EmptyRange,

    #[error("playback speed {0} is outside the allowed range")]
    InvalidSpeed(f64),
}

/// The audio capability cannot be used yet.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResourceError {
    /// Browsers only allow audio after a user gesture.
    #[error("audio output has not been started; start it from a user gesture first")]
    AudioNotStarted,
}

/// Dataset construction or parsing failed.
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("CSV data must have at least one data row in addition to the header.")]
    MissingRows,

    #[error("The CSV header must have at least two columns.")]
    ShortHeader,

    /// Rows are numbered from 1, header included.
    #[error("Row {row} does not have enough columns.")]
    ShortRow { row: usize },

    #[error("Missing x-value at row {row}.")]
    MissingLabel { row: usize },

    #[error("Invalid number in the Y-axis at row {row}.")]
    InvalidNumber { row: usize },

    #[error("labels and values differ in length ({labels} labels, {values} values)")]
    LengthMismatch { labels: usize, values: usize },

    #[error("heatmap has {rows} rows but {y_labels} y labels")]
    RowCountMismatch { rows: usize, y_labels: usize },

    #[error("heatmap row {row} has {cols} cells but there are {x_labels} x labels")]
    RowWidthMismatch {
        row: usize,
        cols: usize,
        x_labels: usize,
    },

    #[error("value at index {index} is not finite")]
    NonFinite { index: usize },

    #[error("Insufficient data to create a graph.")]
    InsufficientData,

    #[error("Invalid file type. Please upload a CSV file.")]
    NotCsv,

    /// The host reported a size that is not a byte count.
    #[error("invalid file size {0}")]
    InvalidSize(f64),

    #[error("File is too large. Please upload a file smaller than {limit_bytes} bytes.")]
    TooLarge { size: u64, limit_bytes: u64 },

    #[error("unknown graph type '{0}'")]
    UnknownChartKind(String),

    #[error("a {0} graph cannot display this data")]
    IncompatibleKind(String),

    #[error("invalid JSON data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read data: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration could not be loaded or is inconsistent.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Anything `PlaybackSession::play` can reject.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlaybackError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Resource(#[from] ResourceError),
}

// src/range.rs
//
// Range extraction: validate the user's index window and turn it into the
// event sequence of one run.

use log::warn;

use crate::error::ValidationError;
use crate::event::{EventSequence, SonificationEvent};
use crate::mapper::{FrequencyBand, value_bounds};
use crate::state::Dataset;

/// Inclusive index window over the flattened dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SonificationRange {
    pub start: usize,
    pub end: usize,
}

impl SonificationRange {
    /// Validate `[start, end]` against a flattened length.
    pub fn checked(start: i64, end: i64, flat_len: usize) -> Result<Self, ValidationError> {
        if flat_len == 0 {
            return Err(ValidationError::EmptyRange);
        }

        let max_index = flat_len - 1;
        let in_bounds = start >= 0 && start <= end && (end as u64) <= max_index as u64;
        if !in_bounds {
            return Err(ValidationError::OutOfBounds {
                start,
                end,
                max_index,
            });
        }

        Ok(Self {
            start: start as usize,
            end: end as usize,
        })
    }
}

/// Parse one index form field.
pub fn parse_index(field: &'static str, input: &str) -> Result<i64, ValidationError> {
    input
        .trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::NotANumber {
            field,
            input: input.to_string(),
        })
}

/// Parse the start and end form fields.
pub fn parse_range(start: &str, end: &str) -> Result<(i64, i64), ValidationError> {
    Ok((parse_index("start", start)?, parse_index("end", end)?))
}

/// Build the event sequence for `[start, end]`.
///
/// Series data is scaled with the min/max of the whole dataset, so the same
/// value always sounds at the same pitch whatever the window. Heatmap data is
/// scaled with the min/max of the selected cells, so a narrow window still
/// spans the whole band.
pub fn extract(
    dataset: &Dataset,
    start: i64,
    end: i64,
    band: FrequencyBand,
) -> Result<EventSequence, ValidationError> {
    let flattened = dataset.flattened();
    let range = SonificationRange::checked(start, end, flattened.len()).inspect_err(|e| {
        warn!("rejected sonification range [{start}, {end}]: {e}");
    })?;

    let slice = &flattened[range.start..=range.end];
    if slice.is_empty() {
        return Err(ValidationError::EmptyRange);
    }

    let bounds = match dataset {
        Dataset::Series(_) => value_bounds(flattened.iter().copied()),
        Dataset::Heatmap(_) => value_bounds(slice.iter().copied()),
    };
    let (lo, hi) = bounds.ok_or(ValidationError::EmptyRange)?;

    let events = slice
        .iter()
        .enumerate()
        .map(|(offset, value)| SonificationEvent {
            frequency: band.map(*value, lo, hi),
            source_index: range.start + offset,
        })
        .collect();

    Ok(EventSequence::new(events))
}

/// Same as [`extract`], reading the indices from raw form text.
pub fn extract_from_input(
    dataset: &Dataset,
    start: &str,
    end: &str,
    band: FrequencyBand,
) -> Result<EventSequence, ValidationError> {
    let (start, end) = parse_range(start, end)?;
    extract(dataset, start, end, band)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Heatmap, Series};

    fn approx_all(got: &[f64], want: &[f64]) {
        assert_eq!(got.len(), want.len());
        for (g, w) in got.iter().zip(want) {
            assert!((g - w).abs() < 1e-9, "{got:?} != {want:?}");
        }
    }

    fn series(values: &[f64]) -> Dataset {
        let labels = (0..values.len()).map(|i| i.to_string()).collect();
        Dataset::from(Series::new(labels, values.to_vec()).unwrap())
    }

    fn heatmap_2x3() -> Dataset {
        let x = vec!["a".into(), "b".into(), "c".into()];
        let y = vec!["r0".into(), "r1".into()];
        Dataset::from(Heatmap::new(x, y, vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap())
    }

    #[test]
    fn test_full_range_linear_mapping() {
        let events = extract(&series(&[1.0, 2.0, 3.0, 4.0, 5.0]), 0, 4, FrequencyBand::STANDARD)
            .unwrap();
        approx_all(&events.frequencies(), &[200.0, 350.0, 500.0, 650.0, 800.0]);
        assert_eq!(events.source_indices(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_constant_series_maps_to_midpoint() {
        let data = series(&[5.0, 5.0, 5.0]);
        for (start, end) in [(0, 2), (1, 1), (0, 1)] {
            let events = extract(&data, start, end, FrequencyBand::STANDARD).unwrap();
            assert!(events.frequencies().iter().all(|f| *f == 500.0));
        }
    }

    #[test]
    fn test_series_uses_global_bounds() {
        let events = extract(&series(&[1.0, 2.0, 3.0, 4.0, 5.0]), 1, 2, FrequencyBand::STANDARD)
            .unwrap();
        approx_all(&events.frequencies(), &[350.0, 500.0]);
    }

    #[test]
    fn test_heatmap_slice_is_row_major_with_local_bounds() {
        let data = heatmap_2x3();
        let events = extract(&data, 1, 4, FrequencyBand::STANDARD).unwrap();
        assert_eq!(events.source_indices(), vec![1, 2, 3, 4]);
        let values: Vec<f64> = events
            .source_indices()
            .iter()
            .map(|i| data.flattened()[*i])
            .collect();
        assert_eq!(values, vec![2.0, 3.0, 4.0, 5.0]);
        // slice-local min 2 / max 5
        approx_all(&events.frequencies(), &[200.0, 400.0, 600.0, 800.0]);
    }

    #[test]
    fn test_length_and_contiguity() {
        let data = series(&[3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0]);
        for start in 0..8 {
            for end in start..8 {
                let events = extract(&data, start, end, FrequencyBand::STANDARD).unwrap();
                assert_eq!(events.len() as i64, end - start + 1);
                let indices = events.source_indices();
                assert!(indices.windows(2).all(|w| w[1] == w[0] + 1));
                assert_eq!(indices[0] as i64, start);
            }
        }
    }

    #[test]
    fn test_rejects_bad_ranges() {
        let data = series(&[1.0, 2.0, 3.0]);
        for (start, end) in [(2, 1), (-1, 1), (0, 3), (5, 9)] {
            let err = extract(&data, start, end, FrequencyBand::STANDARD).unwrap_err();
            assert_eq!(
                err,
                ValidationError::OutOfBounds {
                    start,
                    end,
                    max_index: 2
                }
            );
        }
        assert_eq!(
            err_message(&data, 0, 3),
            "Please enter valid start and end indices between 0 and 2."
        );
    }

    fn err_message(data: &Dataset, start: i64, end: i64) -> String {
        extract(data, start, end, FrequencyBand::STANDARD)
            .unwrap_err()
            .to_string()
    }

    #[test]
    fn test_rejects_empty_dataset() {
        let empty = Dataset::from(Series::new(vec![], vec![]).unwrap());
        assert_eq!(
            extract(&empty, 0, 0, FrequencyBand::STANDARD),
            Err(ValidationError::EmptyRange)
        );
    }

    #[test]
    fn test_rejects_non_numeric_input() {
        let data = series(&[1.0, 2.0, 3.0]);
        let err = extract_from_input(&data, "one", "2", FrequencyBand::STANDARD).unwrap_err();
        assert!(matches!(err, ValidationError::NotANumber { field: "start", .. }));

        let err = extract_from_input(&data, "0", "", FrequencyBand::STANDARD).unwrap_err();
        assert!(matches!(err, ValidationError::NotANumber { field: "end", .. }));

        let events = extract_from_input(&data, " 0 ", "2", FrequencyBand::STANDARD).unwrap();
        assert_eq!(events.len(), 3);
    }
}

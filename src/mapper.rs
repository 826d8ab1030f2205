// src/mapper.rs

use serde::{Deserialize, Serialize};

/// Audible frequency band that data values are mapped into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrequencyBand {
    /// Frequency for the dataset minimum (Hz)
    pub min: f64,

    /// Frequency for the dataset maximum (Hz)
    pub max: f64,
}

impl FrequencyBand {
    /// Band used by the current tool.
    pub const STANDARD: FrequencyBand = FrequencyBand {
        min: 200.0,
        max: 800.0,
    };

    /// Wider band used by the first revision of the tool.
    pub const WIDE: FrequencyBand = FrequencyBand {
        min: 100.0,
        max: 1000.0,
    };

    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    /// Map `value` from `[domain_min, domain_max]` into this band.
    ///
    /// A degenerate domain (`domain_min == domain_max`) maps every value to
    /// the band midpoint. Values outside the domain extrapolate linearly.
    #[inline]
    pub fn map(&self, value: f64, domain_min: f64, domain_max: f64) -> f64 {
        map_value_to_frequency(value, domain_min, domain_max, *self)
    }
}

impl Default for FrequencyBand {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Linear value-to-frequency mapping.
pub fn map_value_to_frequency(
    value: f64,
    domain_min: f64,
    domain_max: f64,
    band: FrequencyBand,
) -> f64 {
    if domain_min == domain_max {
        return band.midpoint();
    }

    let normalized = (value - domain_min) / (domain_max - domain_min);
    band.min + normalized * (band.max - band.min)
}

/// Smallest and largest value of a sequence.
///
/// Returns `None` for an empty sequence.
pub fn value_bounds(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values.into_iter().fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

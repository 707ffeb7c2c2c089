//! Engine Configuration and Validation

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a configuration is rejected at startup
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// FFT window length must be a power of two
    #[error("frequency window size {0} is not a power of two")]
    WindowNotPowerOfTwo(usize),

    /// Fixed-point lanes cannot hold the worst-case bin magnitude
    #[error("frequency window size {0} exceeds the i16 headroom limit of {max}", max = MAX_FREQUENCY_WINDOW)]
    WindowTooLarge(usize),

    /// Quartile ranks degenerate below this size
    #[error("time window size {0} is smaller than the minimum of 4")]
    TimeWindowTooSmall(usize),

    /// Histogram buckets must tile the half-spectrum exactly
    #[error("{buckets} histogram buckets cannot evenly tile {half_bins} non-DC spectrum bins")]
    HistogramMismatch { buckets: usize, half_bins: usize },
}

/// Largest frequency window for which every unnormalized bin of an 8-bit
/// input signal (worst case W * 128) still fits the i16 FFT lanes.
pub const MAX_FREQUENCY_WINDOW: usize = 256;

/// Validated engine configuration.
///
/// Window sizes are fixed for the lifetime of an engine; per-window scratch
/// buffers (histograms, spectra, sort buffers) are sized from these values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Window length for time-domain features
    pub time_window: usize,
    /// Window length for frequency-domain features (power of two)
    pub frequency_window: usize,
    /// Number of spectral power histogram buckets, DC bucket included
    pub histogram_buckets: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            time_window: 128,
            frequency_window: 128,
            histogram_buckets: 9,
        }
    }
}

impl EngineConfig {
    /// Check every structural constraint once, before any window is processed
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.time_window < 4 {
            return Err(ConfigError::TimeWindowTooSmall(self.time_window));
        }
        if !self.frequency_window.is_power_of_two() {
            return Err(ConfigError::WindowNotPowerOfTwo(self.frequency_window));
        }
        if self.frequency_window > MAX_FREQUENCY_WINDOW {
            return Err(ConfigError::WindowTooLarge(self.frequency_window));
        }
        let half_bins = self.frequency_window / 2;
        if self.histogram_buckets < 2 || half_bins % (self.histogram_buckets - 1) != 0 {
            return Err(ConfigError::HistogramMismatch {
                buckets: self.histogram_buckets,
                half_bins,
            });
        }
        Ok(())
    }

    /// Hop between consecutive time-domain windows (50% overlap)
    pub fn time_hop(&self) -> usize {
        (self.time_window / 2).max(1)
    }

    /// Hop between consecutive frequency-domain windows (50% overlap)
    pub fn frequency_hop(&self) -> usize {
        (self.frequency_window / 2).max(1)
    }

    /// Consecutive spectrum bins folded into each non-DC histogram bucket
    pub fn histogram_divider(&self) -> usize {
        (self.frequency_window / 2) / (self.histogram_buckets - 1)
    }
}

//! Immutable Sample Stream Storage

use crate::window::SlidingWindows;
use crate::{Axis, Sample};

/// Immutable, fixed-length sequence of 3-axis samples.
///
/// The stream is read-only for the duration of any feature computation;
/// derived streams (jerk, magnitude, filtered) are separate allocations.
#[derive(Debug, Clone)]
pub struct SampleStream {
    /// Pre-allocated storage
    samples: Box<[Sample]>,
}

impl SampleStream {
    /// Create a stream from recorded samples
    pub fn new(samples: Vec<Sample>) -> Self {
        Self {
            samples: samples.into_boxed_slice(),
        }
    }

    /// Number of samples in the stream
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if the stream is empty
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample at an absolute position
    pub fn get(&self, index: usize) -> Option<&Sample> {
        self.samples.get(index)
    }

    /// The whole stream as a slice
    pub fn as_slice(&self) -> &[Sample] {
        &self.samples
    }

    /// Copy out the values of one axis as a contiguous track
    pub fn axis_track(&self, axis: Axis) -> Vec<i8> {
        self.samples.iter().map(|s| s.axis(axis)).collect()
    }

    /// Iterate half-overlapping windows of `window` samples (hop = window / 2)
    pub fn windows(&self, window: usize) -> SlidingWindows<'_, Sample> {
        SlidingWindows::half_overlapping(&self.samples, window)
    }
}

impl std::ops::Index<usize> for SampleStream {
    type Output = Sample;

    fn index(&self, index: usize) -> &Sample {
        &self.samples[index]
    }
}

impl From<Vec<Sample>> for SampleStream {
    fn from(samples: Vec<Sample>) -> Self {
        Self::new(samples)
    }
}

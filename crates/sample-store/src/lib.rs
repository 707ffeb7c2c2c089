//! Accelerometer Sample Store
//!
//! Provides the 3-axis sample data model, an immutable fixed-length sample
//! stream, and half-overlapping sliding-window iteration over it.

mod store;
mod window;

pub use store::SampleStream;
pub use window::SlidingWindows;

use serde::{Deserialize, Serialize};

/// Number of sensor axes per sample
pub const NUM_AXES: usize = 3;

/// One accelerometer reading: three signed 8-bit axis values in [-128, 127]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    pub x: i8,
    pub y: i8,
    pub z: i8,
}

impl Sample {
    /// Create a sample from its three axis values
    pub const fn new(x: i8, y: i8, z: i8) -> Self {
        Self { x, y, z }
    }

    /// Value of the given axis
    pub const fn axis(&self, axis: Axis) -> i8 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }
}

/// One of the three sensor channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// All axes, in channel order
    pub const ALL: [Axis; NUM_AXES] = [Axis::X, Axis::Y, Axis::Z];

    /// Zero-based channel index
    pub const fn index(&self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
            Axis::Z => write!(f, "z"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_selection() {
        let s = Sample::new(-5, 10, 127);
        assert_eq!(s.axis(Axis::X), -5);
        assert_eq!(s.axis(Axis::Y), 10);
        assert_eq!(s.axis(Axis::Z), 127);
    }

    #[test]
    fn test_axis_index_order() {
        for (i, axis) in Axis::ALL.iter().enumerate() {
            assert_eq!(axis.index(), i);
        }
    }

    #[test]
    fn test_sample_postcard_roundtrip() {
        let s = Sample::new(1, -2, 3);
        let bytes = postcard::to_allocvec(&s).unwrap();
        let back: Sample = postcard::from_bytes(&bytes).unwrap();
        assert_eq!(back, s);
    }
}

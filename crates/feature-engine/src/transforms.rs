//! Stream Transforms and Filters
//!
//! Elementwise operators that turn a raw sample stream into a derived scalar
//! stream (jerk, axis combiners, median filtering). Every transform returns
//! exactly as many values as its input so any output can feed the sliding
//! window iterator interchangeably with the raw stream; the final position
//! is zero where no successor sample exists.

use sample_store::{Axis, SampleStream};

/// First difference between consecutive samples of one axis
pub fn jerk(stream: &SampleStream, axis: Axis) -> Vec<i16> {
    let data = stream.as_slice();
    if data.is_empty() {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(data.len());
    for pair in data.windows(2) {
        out.push(pair[1].axis(axis) as i16 - pair[0].axis(axis) as i16);
    }
    out.push(0);
    out
}

/// Squared 3-axis magnitude per sample
pub fn magnitude_sq(stream: &SampleStream) -> Vec<i32> {
    combine(stream, |x, y, z| x * x + y * y + z * z)
}

/// 3-axis magnitude per sample
pub fn magnitude(stream: &SampleStream) -> Vec<f32> {
    combine(stream, |x, y, z| ((x * x + y * y + z * z) as f32).sqrt())
}

/// L1 norm (sum of absolute axis values) per sample
pub fn l1_norm(stream: &SampleStream) -> Vec<i16> {
    combine(stream, |x, y, z| (x.abs() + y.abs() + z.abs()) as i16)
}

/// Squared magnitude of the per-axis first differences
pub fn jerk_magnitude_sq(stream: &SampleStream) -> Vec<i32> {
    combine_jerk(stream, |x, y, z| x * x + y * y + z * z)
}

/// Magnitude of the per-axis first differences
pub fn jerk_magnitude(stream: &SampleStream) -> Vec<f32> {
    combine_jerk(stream, |x, y, z| ((x * x + y * y + z * z) as f32).sqrt())
}

/// L1 norm of the per-axis first differences
pub fn jerk_l1_norm(stream: &SampleStream) -> Vec<i16> {
    combine_jerk(stream, |x, y, z| (x.abs() + y.abs() + z.abs()) as i16)
}

fn combine<T: Default>(stream: &SampleStream, f: impl Fn(i32, i32, i32) -> T) -> Vec<T> {
    let data = stream.as_slice();
    if data.is_empty() {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(data.len());
    for s in &data[..data.len() - 1] {
        out.push(f(s.x as i32, s.y as i32, s.z as i32));
    }
    out.push(T::default());
    out
}

fn combine_jerk<T: Default>(stream: &SampleStream, f: impl Fn(i32, i32, i32) -> T) -> Vec<T> {
    let data = stream.as_slice();
    if data.is_empty() {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(data.len());
    for pair in data.windows(2) {
        let dx = pair[1].x as i32 - pair[0].x as i32;
        let dy = pair[1].y as i32 - pair[0].y as i32;
        let dz = pair[1].z as i32 - pair[0].z as i32;
        out.push(f(dx, dy, dz));
    }
    out.push(T::default());
    out
}

/// Branchless median of three values
#[inline]
fn median3_of(a: i8, b: i8, c: i8) -> i8 {
    a.min(b).max(a.max(b).min(c))
}

/// 3-point median filter over one axis.
///
/// Output position `i` is the median of samples `i-1`, `i`, `i+1`; the
/// first and last positions have no full neighborhood and are emitted as
/// zero. Only the previous two raw samples are carried as state while the
/// filter advances.
pub fn median3(stream: &SampleStream, axis: Axis) -> Vec<i8> {
    let data = stream.as_slice();
    if data.len() < 3 {
        return vec![0; data.len()];
    }

    let mut out = Vec::with_capacity(data.len());
    out.push(0);
    let mut prev = data[0].axis(axis);
    let mut curr = data[1].axis(axis);
    for s in &data[2..] {
        let next = s.axis(axis);
        out.push(median3_of(prev, curr, next));
        prev = curr;
        curr = next;
    }
    out.push(0);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use sample_store::Sample;

    fn stream_x(values: &[i8]) -> SampleStream {
        SampleStream::new(values.iter().map(|&v| Sample::new(v, 0, 0)).collect())
    }

    #[test]
    fn test_jerk_differences_and_pad() {
        let stream = stream_x(&[10, 13, 9, 9, -120]);
        assert_eq!(jerk(&stream, Axis::X), vec![3, -4, 0, -129, 0]);
    }

    #[test]
    fn test_jerk_empty_stream() {
        let stream = stream_x(&[]);
        assert!(jerk(&stream, Axis::X).is_empty());
    }

    #[test]
    fn test_magnitude_sq_combines_axes() {
        let stream = SampleStream::new(vec![
            Sample::new(3, 4, 0),
            Sample::new(-128, -128, -128),
            Sample::new(1, 1, 1),
        ]);
        // final position zero-padded
        assert_eq!(magnitude_sq(&stream), vec![25, 3 * 128 * 128, 0]);
    }

    #[test]
    fn test_magnitude_is_root_of_squared() {
        let stream = SampleStream::new(vec![Sample::new(3, 4, 0), Sample::new(0, 0, 0)]);
        let m = magnitude(&stream);
        assert!((m[0] - 5.0).abs() < 1e-6);
        assert_eq!(m[1], 0.0);
    }

    #[test]
    fn test_l1_norm() {
        let stream = SampleStream::new(vec![
            Sample::new(-3, 4, -5),
            Sample::new(-128, 127, 0),
            Sample::new(0, 0, 0),
        ]);
        assert_eq!(l1_norm(&stream), vec![12, 255, 0]);
    }

    #[test]
    fn test_jerk_magnitude_sq() {
        let stream = SampleStream::new(vec![
            Sample::new(0, 0, 0),
            Sample::new(1, 2, 2),
            Sample::new(1, 2, 2),
        ]);
        assert_eq!(jerk_magnitude_sq(&stream), vec![9, 0, 0]);
    }

    #[test]
    fn test_jerk_l1_norm_extremes() {
        let stream = SampleStream::new(vec![
            Sample::new(-128, -128, -128),
            Sample::new(127, 127, 127),
        ]);
        assert_eq!(jerk_l1_norm(&stream), vec![765, 0]);
    }

    #[test]
    fn test_median3_reference_sequence() {
        let stream = stream_x(&[1, 9, 2, 9, 1]);
        assert_eq!(median3(&stream, Axis::X), vec![0, 2, 9, 2, 0]);
    }

    #[test]
    fn test_median3_short_streams() {
        assert_eq!(median3(&stream_x(&[]), Axis::X), Vec::<i8>::new());
        assert_eq!(median3(&stream_x(&[7]), Axis::X), vec![0]);
        assert_eq!(median3(&stream_x(&[7, 8]), Axis::X), vec![0, 0]);
    }

    #[test]
    fn test_median3_of_all_orderings() {
        for perm in [
            [1, 2, 3],
            [1, 3, 2],
            [2, 1, 3],
            [2, 3, 1],
            [3, 1, 2],
            [3, 2, 1],
        ] {
            assert_eq!(median3_of(perm[0], perm[1], perm[2]), 2, "{perm:?}");
        }
    }

    #[test]
    fn test_filtered_stream_feeds_window_iterator() {
        // a derived stream windows exactly like a raw one
        let stream = stream_x(&[1, 9, 2, 9, 1, 3, 7, 3, 5, 5, 5, 5]);
        let filtered = median3(&stream, Axis::X);
        let windows: Vec<&[i8]> =
            sample_store::SlidingWindows::half_overlapping(&filtered, 8).collect();
        assert_eq!(windows.len(), 2);
        let summary = crate::stats::counting_summary(windows[0]);
        assert!(summary.min <= summary.median && summary.median <= summary.max);
    }

    #[test]
    fn test_transform_length_matches_input() {
        let stream = stream_x(&[1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(jerk(&stream, Axis::X).len(), 7);
        assert_eq!(magnitude_sq(&stream).len(), 7);
        assert_eq!(l1_norm(&stream).len(), 7);
        assert_eq!(jerk_magnitude(&stream).len(), 7);
        assert_eq!(median3(&stream, Axis::X).len(), 7);
    }
}

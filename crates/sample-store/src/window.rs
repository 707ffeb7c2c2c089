//! Sliding Window Iteration

/// Lazy iterator over fixed-size windows of a slice, advancing by `hop`.
///
/// A window starting at offset `o` is produced iff `o + window <= len`, so
/// the last exact fit is included and any shorter trailing remainder is
/// dropped. A slice shorter than one window yields no windows at all.
/// Iteration never mutates the underlying slice; recreating the iterator
/// replays the identical window sequence.
#[derive(Debug, Clone)]
pub struct SlidingWindows<'a, T> {
    data: &'a [T],
    window: usize,
    hop: usize,
    offset: usize,
}

impl<'a, T> SlidingWindows<'a, T> {
    /// Create an iterator with an explicit hop (clamped to at least 1)
    pub fn new(data: &'a [T], window: usize, hop: usize) -> Self {
        assert!(window > 0, "window size must be nonzero");
        Self {
            data,
            window,
            hop: hop.max(1),
            offset: 0,
        }
    }

    /// The 50%-overlap convention used throughout the engine: hop = window / 2
    pub fn half_overlapping(data: &'a [T], window: usize) -> Self {
        Self::new(data, window, window / 2)
    }

    /// Number of windows the iterator will produce in total
    pub fn count_windows(&self) -> usize {
        if self.data.len() < self.window {
            0
        } else {
            (self.data.len() - self.window) / self.hop + 1
        }
    }
}

impl<'a, T> Iterator for SlidingWindows<'a, T> {
    type Item = &'a [T];

    fn next(&mut self) -> Option<&'a [T]> {
        if self.offset + self.window > self.data.len() {
            return None;
        }
        let item = &self.data[self.offset..self.offset + self.window];
        self.offset += self.hop;
        Some(item)
    }
}

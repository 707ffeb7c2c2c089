//! FFT Engines
//!
//! Two numeric variants of the forward DFT over one real-valued window:
//! a floating-point path backed by rustfft and a fixed-point path over i16
//! lanes for integer spectral features. Both produce the unnormalized
//! spectrum in natural bin order:
//!
//! ```text
//!    [DC] [F1] [F2] ... [FNQ-1] [FNQ] [-FNQ-1] ... [-F2] [-F1]
//!      0    1   2   ...   N/2-1  N/2    N/2+1  ...  N-2   N-1
//! ```
//!
//! For real input `bin[N-k]` is the conjugate of `bin[k]`, so only bins
//! 0..=N/2 carry independent information. No normalization is applied;
//! magnitudes scale with the window length.

use crate::config::{ConfigError, MAX_FREQUENCY_WINDOW};
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

/// Floating-point spectrum analyzer for one fixed window length
pub struct SpectrumAnalyzer {
    forward: Arc<dyn Fft<f32>>,
    inverse: Arc<dyn Fft<f32>>,
    size: usize,
}

impl SpectrumAnalyzer {
    /// Plan transforms for the given window length (must be a power of two)
    pub fn new(size: usize) -> Result<Self, ConfigError> {
        if !size.is_power_of_two() {
            return Err(ConfigError::WindowNotPowerOfTwo(size));
        }
        let mut planner = FftPlanner::new();
        Ok(Self {
            forward: planner.plan_fft_forward(size),
            inverse: planner.plan_fft_inverse(size),
            size,
        })
    }

    /// Planned window length
    pub fn size(&self) -> usize {
        self.size
    }

    /// Unnormalized forward DFT of a real window, natural bin order
    pub fn forward(&self, window: &[f32]) -> Vec<Complex<f32>> {
        assert_eq!(window.len(), self.size);
        let mut buffer: Vec<Complex<f32>> =
            window.iter().map(|&v| Complex::new(v, 0.0)).collect();
        self.forward.process(&mut buffer);
        buffer
    }

    /// Unnormalized inverse DFT, in place. Dividing the result by the window
    /// length recovers the original signal of a forward transform.
    pub fn inverse(&self, spectrum: &mut [Complex<f32>]) {
        assert_eq!(spectrum.len(), self.size);
        self.inverse.process(spectrum);
    }
}

/// Fixed-point radix-2 FFT over i16 real/imaginary lanes.
///
/// Twiddle factors are Q15; butterfly products are promoted to i32 before
/// the `>> 15` rescale. Unit twiddles bypass the multiply entirely, so
/// inputs whose spectra are mathematically integer-exact (e.g. a constant
/// window) transform without rounding error. The window length is capped so
/// the worst-case bin magnitude of an 8-bit input still fits the lanes.
pub struct FixedPointFft {
    size: usize,
    /// (cos, -sin) of 2*pi*k/size in Q15, for k in 0..size/2
    twiddles: Vec<(i16, i16)>,
}

impl FixedPointFft {
    /// Build the twiddle table for the given window length
    pub fn new(size: usize) -> Result<Self, ConfigError> {
        if !size.is_power_of_two() || size < 2 {
            return Err(ConfigError::WindowNotPowerOfTwo(size));
        }
        if size > MAX_FREQUENCY_WINDOW {
            return Err(ConfigError::WindowTooLarge(size));
        }
        let twiddles = (0..size / 2)
            .map(|k| {
                let theta = -2.0 * std::f64::consts::PI * k as f64 / size as f64;
                (
                    (theta.cos() * 32767.0).round() as i16,
                    (theta.sin() * 32767.0).round() as i16,
                )
            })
            .collect();
        Ok(Self { size, twiddles })
    }

    /// Planned window length
    pub fn size(&self) -> usize {
        self.size
    }

    /// In-place unnormalized transform; `im` must be zeroed by the caller
    /// for a real-valued window. Output in natural bin order.
    pub fn process(&self, re: &mut [i16], im: &mut [i16]) {
        assert_eq!(re.len(), self.size);
        assert_eq!(im.len(), self.size);

        bit_reverse_permute(re, im);

        let n = self.size;
        let mut len = 2;
        while len <= n {
            let half = len / 2;
            let stride = n / len;
            for start in (0..n).step_by(len) {
                for k in 0..half {
                    let i = start + k;
                    let j = i + half;
                    let (t_re, t_im) = if k == 0 {
                        // w = 1 exactly; skip the Q15 rounding
                        (re[j] as i32, im[j] as i32)
                    } else {
                        let (w_re, w_im) = self.twiddles[k * stride];
                        let b_re = re[j] as i32;
                        let b_im = im[j] as i32;
                        (
                            (w_re as i32 * b_re - w_im as i32 * b_im) >> 15,
                            (w_re as i32 * b_im + w_im as i32 * b_re) >> 15,
                        )
                    };
                    let a_re = re[i] as i32;
                    let a_im = im[i] as i32;
                    re[i] = (a_re + t_re) as i16;
                    im[i] = (a_im + t_im) as i16;
                    re[j] = (a_re - t_re) as i16;
                    im[j] = (a_im - t_im) as i16;
                }
            }
            len *= 2;
        }
    }
}

/// Reorder both lanes into bit-reversed index order (decimation in time)
fn bit_reverse_permute(re: &mut [i16], im: &mut [i16]) {
    let n = re.len();
    let mut j = 0usize;
    for i in 1..n {
        let mut bit = n >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j |= bit;
        if i < j {
            re.swap(i, j);
            im.swap(i, j);
        }
    }
}

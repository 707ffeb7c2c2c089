//! Spectral Feature Extraction
//!
//! Descriptors computed on unnormalized spectra in natural bin order (see
//! `fft`). Single-axis features take one spectrum; the combined-magnitude
//! features take all three per-axis spectra at once.

use rustfft::num_complex::Complex;

/// Threshold below which a float bin counts as empty in the dominant-bin scan
pub const DOMINANT_EPSILON: f32 = 0.1;

/// Squared magnitude of one i16 bin; u32 holds the worst case
/// (2 * 32767^2 < 2^31) without wraparound.
#[inline]
pub fn magnitude_sq(re: i16, im: i16) -> u32 {
    (re as i32 * re as i32) as u32 + (im as i32 * im as i32) as u32
}

/// Squared magnitude of the highest-frequency bin above the epsilon
/// threshold, scanning from the Nyquist bin down to DC. `None` when the
/// whole half-spectrum is below it.
pub fn dominant_magnitude_f(spectrum: &[Complex<f32>]) -> Option<f32> {
    let nyquist = spectrum.len() / 2;
    for bin in (0..=nyquist).rev() {
        let msq = spectrum[bin].norm_sqr();
        if msq.abs() > DOMINANT_EPSILON {
            return Some(msq);
        }
    }
    None
}

/// Integer variant of the dominant-bin scan: the first nonzero bin from the
/// Nyquist bin downwards.
pub fn dominant_magnitude_i(re: &[i16], im: &[i16]) -> Option<u32> {
    let nyquist = re.len() / 2;
    for bin in (0..=nyquist).rev() {
        let msq = magnitude_sq(re[bin], im[bin]);
        if msq != 0 {
            return Some(msq);
        }
    }
    None
}

/// Squared magnitude of every bin 0..=N/2, ascending
pub fn power_density_f(spectrum: &[Complex<f32>]) -> Vec<f32> {
    (0..=spectrum.len() / 2)
        .map(|bin| spectrum[bin].norm_sqr())
        .collect()
}

/// Integer power spectral density over bins 0..=N/2
pub fn power_density_i(re: &[i16], im: &[i16]) -> Vec<u32> {
    (0..=re.len() / 2)
        .map(|bin| magnitude_sq(re[bin], im[bin]))
        .collect()
}

/// Shannon entropy of the squared magnitudes over all N bins, normalized to
/// a probability distribution. Zero-power bins contribute nothing; an
/// all-zero spectrum has entropy 0 by convention.
pub fn spectral_entropy(spectrum: &[Complex<f32>]) -> f32 {
    let msq: Vec<f32> = spectrum.iter().map(|c| c.norm_sqr()).collect();
    let total: f32 = msq.iter().sum();
    if total <= 0.0 {
        return 0.0;
    }
    let mut entropy = 0.0f32;
    for &m in &msq {
        let p = m / total;
        if p > 0.0 {
            entropy += p * p.log2();
        }
    }
    -entropy
}

/// Fold bins 0..=N/2 into `buckets` power sums: bucket 0 holds the DC bin
/// alone, the remaining buckets aggregate equal runs of
/// `(N/2) / (buckets - 1)` consecutive bins, the last run ending exactly on
/// the Nyquist bin.
pub fn power_histogram_f(spectrum: &[Complex<f32>], buckets: usize) -> Vec<f32> {
    let nyquist = spectrum.len() / 2;
    let divider = nyquist / (buckets - 1);
    debug_assert_eq!(divider * (buckets - 1), nyquist);

    let mut bins = vec![0.0f32; buckets];
    bins[0] = spectrum[0].norm_sqr();
    for i in 1..=nyquist {
        bins[(i - 1) / divider + 1] += spectrum[i].norm_sqr();
    }
    bins
}

/// Integer power histogram; bucket sums accumulate in u64 so a full run of
/// saturated bins cannot wrap.
pub fn power_histogram_i(re: &[i16], im: &[i16], buckets: usize) -> Vec<u64> {
    let nyquist = re.len() / 2;
    let divider = nyquist / (buckets - 1);
    debug_assert_eq!(divider * (buckets - 1), nyquist);

    let mut bins = vec![0u64; buckets];
    bins[0] = magnitude_sq(re[0], im[0]) as u64;
    for i in 1..=nyquist {
        bins[(i - 1) / divider + 1] += magnitude_sq(re[i], im[i]) as u64;
    }
    bins
}

/// One-sided total magnitude across all three axes: per bin, the square
/// root of the summed squared magnitudes, doubled for every bin except DC
/// and Nyquist to account for the mirrored negative-frequency half.
pub fn combined_magnitude(spectra: [&[Complex<f32>]; 3]) -> f32 {
    let nyquist = spectra[0].len() / 2;
    let mut sum = 0.0f32;
    for bin in 0..=nyquist {
        let msq: f32 = spectra.iter().map(|s| s[bin].norm_sqr()).sum();
        let magnitude = msq.sqrt();
        if bin != 0 && bin != nyquist {
            sum += 2.0 * magnitude;
        } else {
            sum += magnitude;
        }
    }
    sum
}

/// Integer variant: the squared sums are kept without the root and
/// accumulate in u64 (three u32 magnitudes per bin, doubled, over N/2 bins
/// overflows u32).
pub fn combined_magnitude_sq(re: [&[i16]; 3], im: [&[i16]; 3]) -> u64 {
    let nyquist = re[0].len() / 2;
    let mut sum = 0u64;
    for bin in 0..=nyquist {
        let msq: u64 = (0..3)
            .map(|axis| magnitude_sq(re[axis][bin], im[axis][bin]) as u64)
            .sum();
        if bin != 0 && bin != nyquist {
            sum += 2 * msq;
        } else {
            sum += msq;
        }
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fft::{FixedPointFft, SpectrumAnalyzer};

    fn sinusoid(n: usize, k: usize, amplitude: f32) -> Vec<f32> {
        (0..n)
            .map(|i| amplitude * (2.0 * std::f32::consts::PI * k as f32 * i as f32 / n as f32).cos())
            .collect()
    }

    #[test]
    fn test_dominant_magnitude_picks_highest_bin() {
        let n = 32;
        let analyzer = SpectrumAnalyzer::new(n).unwrap();
        // components at bins 2 and 5; the scan must report bin 5
        let signal: Vec<f32> = sinusoid(n, 2, 40.0)
            .iter()
            .zip(sinusoid(n, 5, 10.0))
            .map(|(a, b)| a + b)
            .collect();
        let spectrum = analyzer.forward(&signal);
        let dominant = dominant_magnitude_f(&spectrum).unwrap();
        assert!((dominant - spectrum[5].norm_sqr()).abs() < 1e-2);
    }

    #[test]
    fn test_dominant_magnitude_silent_spectrum() {
        let analyzer = SpectrumAnalyzer::new(16).unwrap();
        let spectrum = analyzer.forward(&[0.0; 16]);
        assert_eq!(dominant_magnitude_f(&spectrum), None);

        let re = [0i16; 16];
        let im = [0i16; 16];
        assert_eq!(dominant_magnitude_i(&re, &im), None);
    }

    #[test]
    fn test_density_length_and_dc() {
        let analyzer = SpectrumAnalyzer::new(8).unwrap();
        let density = power_density_f(&analyzer.forward(&[5.0; 8]));
        assert_eq!(density.len(), 5);
        assert!((density[0] - 1600.0).abs() < 1e-3);
        for &d in &density[1..] {
            assert!(d < 1e-6);
        }
    }

    #[test]
    fn test_entropy_of_pure_tone_is_minimal() {
        let n = 64;
        let analyzer = SpectrumAnalyzer::new(n).unwrap();
        let spectrum = analyzer.forward(&sinusoid(n, 7, 100.0));
        // energy in exactly two mirrored bins: entropy = 1 bit
        let entropy = spectral_entropy(&spectrum);
        assert!(entropy < 1.1, "entropy = {entropy}");
    }

    #[test]
    fn test_entropy_of_constant_is_zero() {
        let analyzer = SpectrumAnalyzer::new(16).unwrap();
        let entropy = spectral_entropy(&analyzer.forward(&[7.0; 16]));
        assert!(entropy < 1e-4);
    }

    #[test]
    fn test_entropy_of_noise_approaches_log2_n() {
        let n = 128;
        let analyzer = SpectrumAnalyzer::new(n).unwrap();
        // LCG noise, uniform-ish over [-128, 127]
        let mut state = 0x12345678u32;
        let signal: Vec<f32> = (0..n)
            .map(|_| {
                state = state.wrapping_mul(1664525).wrapping_add(1013904223);
                ((state >> 24) as i32 - 128) as f32
            })
            .collect();
        let entropy = spectral_entropy(&analyzer.forward(&signal));
        let limit = (n as f32).log2();
        assert!(entropy > 0.8 * limit, "entropy = {entropy}, log2(n) = {limit}");
        assert!(entropy <= limit + 1e-3);
    }

    #[test]
    fn test_histogram_conserves_energy_float() {
        let n = 32;
        let analyzer = SpectrumAnalyzer::new(n).unwrap();
        let signal: Vec<f32> = (0..n).map(|i| ((i * 13 % 17) as f32) - 8.0).collect();
        let spectrum = analyzer.forward(&signal);

        let bins = power_histogram_f(&spectrum, 5);
        assert_eq!(bins.len(), 5);
        let bucketed: f32 = bins.iter().sum();
        let total: f32 = power_density_f(&spectrum).iter().sum();
        assert!((bucketed - total).abs() < total * 1e-5);
    }

    #[test]
    fn test_histogram_conserves_energy_integer() {
        let n = 32;
        let fft = FixedPointFft::new(n).unwrap();
        let mut re: Vec<i16> = (0..n).map(|i| ((i * 29 + 3) % 150) as i16 - 75).collect();
        let mut im = vec![0i16; n];
        fft.process(&mut re, &mut im);

        let bins = power_histogram_i(&re, &im, 5);
        let bucketed: u64 = bins.iter().sum();
        let total: u64 = power_density_i(&re, &im).iter().map(|&m| m as u64).sum();
        assert_eq!(bucketed, total);
    }

    #[test]
    fn test_histogram_dc_bucket_isolated() {
        let analyzer = SpectrumAnalyzer::new(16).unwrap();
        let bins = power_histogram_f(&analyzer.forward(&[3.0; 16]), 5);
        assert!((bins[0] - (16.0f32 * 3.0).powi(2)).abs() < 1e-3);
        for &b in &bins[1..] {
            assert!(b < 1e-6);
        }
    }

    #[test]
    fn test_combined_magnitude_sq_matches_full_spectrum() {
        // impulse per axis transforms exactly; the one-sided doubling must
        // reproduce the full-spectrum sum
        let n = 16;
        let fft = FixedPointFft::new(n).unwrap();
        let mut re = [[0i16; 16]; 3];
        let mut im = [[0i16; 16]; 3];
        for axis in 0..3 {
            re[axis][0] = 100;
            let (r, i) = (&mut re[axis], &mut im[axis]);
            fft.process(r, i);
        }

        let one_sided = combined_magnitude_sq(
            [&re[0], &re[1], &re[2]],
            [&im[0], &im[1], &im[2]],
        );

        let mut full = 0u64;
        for axis in 0..3 {
            for bin in 0..n {
                full += magnitude_sq(re[axis][bin], im[axis][bin]) as u64;
            }
        }
        assert_eq!(one_sided, full);
        assert_eq!(full, 3 * 16 * 100 * 100);
    }

    #[test]
    fn test_combined_magnitude_constant_axes() {
        let n = 8;
        let analyzer = SpectrumAnalyzer::new(n).unwrap();
        let spectra: Vec<Vec<Complex<f32>>> =
            (0..3).map(|_| analyzer.forward(&[5.0; 8])).collect();
        let sum = combined_magnitude([&spectra[0], &spectra[1], &spectra[2]]);
        // only DC carries energy: sqrt(3 * (8*5)^2) = 40 * sqrt(3)
        let expected = 40.0f32 * 3.0f32.sqrt();
        assert!((sum - expected).abs() < 1e-2);
    }
}

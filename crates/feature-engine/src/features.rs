//! Feature Registry and Window Driver
//!
//! Static descriptors for every supported feature and the engine that runs
//! one feature over every window of a stream, writing results to a sink.

use crate::config::{ConfigError, EngineConfig};
use crate::fft::{FixedPointFft, SpectrumAnalyzer};
use crate::sink::{FeatureSink, Value};
use crate::{spectral, stats, transforms};
use rustfft::num_complex::Complex;
use sample_store::{Axis, SampleStream, NUM_AXES};
use tracing::debug;

/// Every feature the engine can compute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureKind {
    // Time domain, counting histogram path
    Min,
    Max,
    MinMax,
    Q25,
    Median,
    Q75,
    Iqr,
    MedianIqr,
    MedianIqrMinMax,
    // Time domain, sort-based cross-check path
    SortMedian,
    SortIqr,
    // Frequency domain
    SpectralMaximaInt,
    SpectralMaximaFloat,
    SpectralDensityInt,
    SpectralDensityFloat,
    SpectralEntropy,
    SpectralHistogramInt,
    SpectralHistogramFloat,
    // Cross-axis frequency domain (the axis argument is ignored)
    CombinedMagnitude,
    CombinedMagnitudeSq,
}

/// Benchmark repetition class; a hint for the bench harness only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostClass {
    VeryFast,
    Fast,
    Moderate,
    Slow,
}

/// One registry row: stable name, dispatch tag, benchmark class
#[derive(Debug, Clone, Copy)]
pub struct FeatureDescriptor {
    pub name: &'static str,
    pub kind: FeatureKind,
    pub cost: CostClass,
}

macro_rules! descriptor {
    ($name:literal, $kind:ident, $cost:ident) => {
        FeatureDescriptor {
            name: $name,
            kind: FeatureKind::$kind,
            cost: CostClass::$cost,
        }
    };
}

/// All supported features, by stable name
pub static REGISTRY: &[FeatureDescriptor] = &[
    descriptor!("min", Min, VeryFast),
    descriptor!("max", Max, VeryFast),
    descriptor!("min+max", MinMax, VeryFast),
    descriptor!("q25", Q25, VeryFast),
    descriptor!("median", Median, VeryFast),
    descriptor!("q75", Q75, VeryFast),
    descriptor!("iqr", Iqr, VeryFast),
    descriptor!("median+iqr", MedianIqr, VeryFast),
    descriptor!("median+iqr+min+max", MedianIqrMinMax, VeryFast),
    descriptor!("sort_median", SortMedian, Fast),
    descriptor!("sort_iqr", SortIqr, Fast),
    descriptor!("spectral_maxima_i", SpectralMaximaInt, Moderate),
    descriptor!("spectral_maxima_f", SpectralMaximaFloat, Moderate),
    descriptor!("spectral_density_i", SpectralDensityInt, Moderate),
    descriptor!("spectral_density_f", SpectralDensityFloat, Moderate),
    descriptor!("spectral_entropy_f", SpectralEntropy, Slow),
    descriptor!("spectral_histogram_i", SpectralHistogramInt, Slow),
    descriptor!("spectral_histogram_f", SpectralHistogramFloat, Slow),
    descriptor!("spectral_ma_f", CombinedMagnitude, Slow),
    descriptor!("spectral_ma_squared_i", CombinedMagnitudeSq, Slow),
];

impl FeatureKind {
    /// Look a feature up by its registry name
    pub fn from_name(name: &str) -> Option<FeatureKind> {
        REGISTRY.iter().find(|d| d.name == name).map(|d| d.kind)
    }

    /// Stable registry name
    pub fn name(&self) -> &'static str {
        self.descriptor().name
    }

    /// Benchmark repetition class
    pub fn cost(&self) -> CostClass {
        self.descriptor().cost
    }

    /// Whether this feature consumes all three axes at once
    pub fn is_cross_axis(&self) -> bool {
        matches!(
            self,
            FeatureKind::CombinedMagnitude | FeatureKind::CombinedMagnitudeSq
        )
    }

    fn descriptor(&self) -> &'static FeatureDescriptor {
        REGISTRY
            .iter()
            .find(|d| d.kind == *self)
            .expect("every FeatureKind has a registry row")
    }
}

/// Stream transforms runnable through the same sink interface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformKind {
    Median3,
    L1Norm,
    MagnitudeSq,
    Magnitude,
    Jerk,
    JerkL1Norm,
    JerkMagnitudeSq,
    JerkMagnitude,
}

/// All supported transforms
pub static TRANSFORMS: &[TransformKind] = &[
    TransformKind::Median3,
    TransformKind::L1Norm,
    TransformKind::MagnitudeSq,
    TransformKind::Magnitude,
    TransformKind::Jerk,
    TransformKind::JerkL1Norm,
    TransformKind::JerkMagnitudeSq,
    TransformKind::JerkMagnitude,
];

impl TransformKind {
    /// Stable name
    pub fn name(&self) -> &'static str {
        match self {
            TransformKind::Median3 => "t_median",
            TransformKind::L1Norm => "t_l1norm",
            TransformKind::MagnitudeSq => "t_magnitude_sq",
            TransformKind::Magnitude => "t_magnitude",
            TransformKind::Jerk => "t_jerk",
            TransformKind::JerkL1Norm => "t_jerk+l1norm",
            TransformKind::JerkMagnitudeSq => "t_jerk+magnitude_sq",
            TransformKind::JerkMagnitude => "t_jerk+magnitude",
        }
    }

    /// Look a transform up by its stable name
    pub fn from_name(name: &str) -> Option<TransformKind> {
        TRANSFORMS.iter().copied().find(|t| t.name() == name)
    }
}

/// Windowed feature extraction engine.
///
/// Owns the validated configuration and the FFT plans for the configured
/// frequency window; one engine computes any number of features over any
/// number of streams.
pub struct FeatureEngine {
    config: EngineConfig,
    analyzer: SpectrumAnalyzer,
    fixed_fft: FixedPointFft,
}

impl FeatureEngine {
    /// Validate the configuration and plan the transforms
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let analyzer = SpectrumAnalyzer::new(config.frequency_window)?;
        let fixed_fft = FixedPointFft::new(config.frequency_window)?;
        Ok(Self {
            config,
            analyzer,
            fixed_fft,
        })
    }

    /// The validated configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run one feature over every window of the stream, emitting each result
    /// to the sink. Cross-axis features ignore `axis` and attribute their
    /// single result to `Axis::X`. A stream shorter than one window emits
    /// nothing.
    pub fn run(
        &self,
        stream: &SampleStream,
        kind: FeatureKind,
        axis: Axis,
        sink: &mut dyn FeatureSink,
    ) {
        use FeatureKind::*;
        debug!("running {} on axis {axis}, {} samples", kind.name(), stream.len());
        match kind {
            Min | Max | MinMax | Q25 | Median | Q75 | Iqr | MedianIqr | MedianIqrMinMax
            | SortMedian | SortIqr => self.run_time(stream, kind, axis, sink),
            SpectralMaximaInt | SpectralDensityInt | SpectralHistogramInt => {
                self.run_spectral_int(stream, kind, axis, sink)
            }
            SpectralMaximaFloat | SpectralDensityFloat | SpectralEntropy
            | SpectralHistogramFloat => self.run_spectral_float(stream, kind, axis, sink),
            CombinedMagnitude => self.run_combined_float(stream, sink),
            CombinedMagnitudeSq => self.run_combined_int(stream, sink),
        }
    }

    fn run_time(
        &self,
        stream: &SampleStream,
        kind: FeatureKind,
        axis: Axis,
        sink: &mut dyn FeatureSink,
    ) {
        let name = kind.name();
        for (index, window) in stream.windows(self.config.time_window).enumerate() {
            let values: Vec<i8> = window.iter().map(|s| s.axis(axis)).collect();
            match kind {
                FeatureKind::Min => {
                    sink.emit(name, axis, index, Value::Int(stats::window_min(&values) as i64));
                }
                FeatureKind::Max => {
                    sink.emit(name, axis, index, Value::Int(stats::window_max(&values) as i64));
                }
                FeatureKind::MinMax => {
                    sink.emit_all(
                        name,
                        axis,
                        index,
                        &[
                            Value::Int(stats::window_min(&values) as i64),
                            Value::Int(stats::window_max(&values) as i64),
                        ],
                    );
                }
                FeatureKind::Q25 => {
                    let v = stats::select_nth(&values, values.len() / 4);
                    sink.emit(name, axis, index, Value::Int(v as i64));
                }
                FeatureKind::Median => {
                    let v = stats::select_nth(&values, values.len() / 2);
                    sink.emit(name, axis, index, Value::Int(v as i64));
                }
                FeatureKind::Q75 => {
                    let v = stats::select_nth(&values, values.len() * 3 / 4);
                    sink.emit(name, axis, index, Value::Int(v as i64));
                }
                FeatureKind::Iqr => {
                    let summary = stats::counting_summary(&values);
                    sink.emit(name, axis, index, Value::Int(summary.iqr as i64));
                }
                FeatureKind::MedianIqr => {
                    let summary = stats::counting_summary(&values);
                    sink.emit_all(
                        name,
                        axis,
                        index,
                        &[
                            Value::Int(summary.median as i64),
                            Value::Int(summary.iqr as i64),
                        ],
                    );
                }
                FeatureKind::MedianIqrMinMax => {
                    let summary = stats::counting_summary(&values);
                    sink.emit_all(
                        name,
                        axis,
                        index,
                        &[
                            Value::Int(summary.median as i64),
                            Value::Int(summary.iqr as i64),
                            Value::Int(summary.min as i64),
                            Value::Int(summary.max as i64),
                        ],
                    );
                }
                FeatureKind::SortMedian => {
                    let summary = stats::sorted_summary(&values);
                    sink.emit(name, axis, index, Value::Int(summary.median as i64));
                }
                FeatureKind::SortIqr => {
                    let summary = stats::sorted_summary(&values);
                    sink.emit(name, axis, index, Value::Int(summary.iqr as i64));
                }
                _ => unreachable!("not a time-domain feature"),
            }
        }
    }

    fn run_spectral_int(
        &self,
        stream: &SampleStream,
        kind: FeatureKind,
        axis: Axis,
        sink: &mut dyn FeatureSink,
    ) {
        let name = kind.name();
        let n = self.config.frequency_window;
        for (index, window) in stream.windows(n).enumerate() {
            let mut re: Vec<i16> = window.iter().map(|s| s.axis(axis) as i16).collect();
            let mut im = vec![0i16; n];
            self.fixed_fft.process(&mut re, &mut im);

            match kind {
                FeatureKind::SpectralMaximaInt => {
                    // an all-zero half-spectrum emits nothing for this window
                    if let Some(msq) = spectral::dominant_magnitude_i(&re, &im) {
                        sink.emit(name, axis, index, Value::Int(msq as i64));
                    }
                }
                FeatureKind::SpectralDensityInt => {
                    let values: Vec<Value> = spectral::power_density_i(&re, &im)
                        .into_iter()
                        .map(|m| Value::Int(m as i64))
                        .collect();
                    sink.emit_all(name, axis, index, &values);
                }
                FeatureKind::SpectralHistogramInt => {
                    let values: Vec<Value> =
                        spectral::power_histogram_i(&re, &im, self.config.histogram_buckets)
                            .into_iter()
                            .map(|b| Value::Int(b as i64))
                            .collect();
                    sink.emit_all(name, axis, index, &values);
                }
                _ => unreachable!("not an integer spectral feature"),
            }
        }
    }

    fn run_spectral_float(
        &self,
        stream: &SampleStream,
        kind: FeatureKind,
        axis: Axis,
        sink: &mut dyn FeatureSink,
    ) {
        let name = kind.name();
        let n = self.config.frequency_window;
        for (index, window) in stream.windows(n).enumerate() {
            let signal: Vec<f32> = window.iter().map(|s| s.axis(axis) as f32).collect();
            let spectrum = self.analyzer.forward(&signal);

            match kind {
                FeatureKind::SpectralMaximaFloat => {
                    if let Some(msq) = spectral::dominant_magnitude_f(&spectrum) {
                        sink.emit(name, axis, index, Value::Float(msq));
                    }
                }
                FeatureKind::SpectralDensityFloat => {
                    let values: Vec<Value> = spectral::power_density_f(&spectrum)
                        .into_iter()
                        .map(Value::Float)
                        .collect();
                    sink.emit_all(name, axis, index, &values);
                }
                FeatureKind::SpectralEntropy => {
                    sink.emit(
                        name,
                        axis,
                        index,
                        Value::Float(spectral::spectral_entropy(&spectrum)),
                    );
                }
                FeatureKind::SpectralHistogramFloat => {
                    let values: Vec<Value> =
                        spectral::power_histogram_f(&spectrum, self.config.histogram_buckets)
                            .into_iter()
                            .map(Value::Float)
                            .collect();
                    sink.emit_all(name, axis, index, &values);
                }
                _ => unreachable!("not a float spectral feature"),
            }
        }
    }

    fn run_combined_float(&self, stream: &SampleStream, sink: &mut dyn FeatureSink) {
        let name = FeatureKind::CombinedMagnitude.name();
        let n = self.config.frequency_window;
        for (index, window) in stream.windows(n).enumerate() {
            let spectra: Vec<Vec<Complex<f32>>> = Axis::ALL
                .iter()
                .map(|&axis| {
                    let signal: Vec<f32> = window.iter().map(|s| s.axis(axis) as f32).collect();
                    self.analyzer.forward(&signal)
                })
                .collect();
            let sum = spectral::combined_magnitude([&spectra[0], &spectra[1], &spectra[2]]);
            sink.emit(name, Axis::X, index, Value::Float(sum));
        }
    }

    fn run_combined_int(&self, stream: &SampleStream, sink: &mut dyn FeatureSink) {
        let name = FeatureKind::CombinedMagnitudeSq.name();
        let n = self.config.frequency_window;
        for (index, window) in stream.windows(n).enumerate() {
            let mut re = vec![vec![0i16; n]; NUM_AXES];
            let mut im = vec![vec![0i16; n]; NUM_AXES];
            for (slot, &axis) in Axis::ALL.iter().enumerate() {
                for (j, s) in window.iter().enumerate() {
                    re[slot][j] = s.axis(axis) as i16;
                }
                self.fixed_fft.process(&mut re[slot], &mut im[slot]);
            }
            let sum =
                spectral::combined_magnitude_sq([&re[0], &re[1], &re[2]], [&im[0], &im[1], &im[2]]);
            sink.emit(name, Axis::X, index, Value::Int(sum as i64));
        }
    }
}

/// Run one stream transform, emitting each output sample to the sink with
/// its stream position as the index.
pub fn run_transform(
    stream: &SampleStream,
    kind: TransformKind,
    axis: Axis,
    sink: &mut dyn FeatureSink,
) {
    let name = kind.name();
    debug!("running {} on axis {axis}, {} samples", name, stream.len());
    match kind {
        TransformKind::Median3 => {
            for (i, v) in transforms::median3(stream, axis).into_iter().enumerate() {
                sink.emit(name, axis, i, Value::Int(v as i64));
            }
        }
        TransformKind::L1Norm => {
            for (i, v) in transforms::l1_norm(stream).into_iter().enumerate() {
                sink.emit(name, axis, i, Value::Int(v as i64));
            }
        }
        TransformKind::MagnitudeSq => {
            for (i, v) in transforms::magnitude_sq(stream).into_iter().enumerate() {
                sink.emit(name, axis, i, Value::Int(v as i64));
            }
        }
        TransformKind::Magnitude => {
            for (i, v) in transforms::magnitude(stream).into_iter().enumerate() {
                sink.emit(name, axis, i, Value::Float(v));
            }
        }
        TransformKind::Jerk => {
            for (i, v) in transforms::jerk(stream, axis).into_iter().enumerate() {
                sink.emit(name, axis, i, Value::Int(v as i64));
            }
        }
        TransformKind::JerkL1Norm => {
            for (i, v) in transforms::jerk_l1_norm(stream).into_iter().enumerate() {
                sink.emit(name, axis, i, Value::Int(v as i64));
            }
        }
        TransformKind::JerkMagnitudeSq => {
            for (i, v) in transforms::jerk_magnitude_sq(stream).into_iter().enumerate() {
                sink.emit(name, axis, i, Value::Int(v as i64));
            }
        }
        TransformKind::JerkMagnitude => {
            for (i, v) in transforms::jerk_magnitude(stream).into_iter().enumerate() {
                sink.emit(name, axis, i, Value::Float(v));
            }
        }
    }
}

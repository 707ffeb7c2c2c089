//! Windowed Feature Extraction Engine
//!
//! Statistical and spectral descriptors over half-overlapping windows of a
//! 3-axis motion-sensor stream: rank statistics via counting histograms,
//! integer and floating-point FFTs, spectral descriptors, and the
//! transform/filter stage that conditions the stream before windowing.

pub mod config;
pub mod features;
pub mod fft;
pub mod sink;
pub mod spectral;
pub mod stats;
pub mod transforms;

pub use config::{ConfigError, EngineConfig};
pub use features::{
    run_transform, CostClass, FeatureDescriptor, FeatureEngine, FeatureKind, TransformKind,
    REGISTRY, TRANSFORMS,
};
pub use fft::{FixedPointFft, SpectrumAnalyzer};
pub use sink::{FeatureSink, LogSink, MemorySink, ResultRecord, Value};
pub use stats::RankSummary;

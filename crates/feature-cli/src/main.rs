//! Accel Feature Pipeline - Command-Line Driver
//!
//! Runs every registered feature over a sample stream (a JSON file of
//! `[x, y, z]` triples, or synthetic noise when no path is given) and prints
//! the accumulated results as JSON.

use anyhow::{Context, Result};
use feature_engine::{EngineConfig, FeatureEngine, MemorySink, REGISTRY};
use sample_store::{Axis, Sample, SampleStream};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

fn main() -> Result<()> {
    init_logging();

    info!("=== Accel Feature Pipeline v{} ===", env!("CARGO_PKG_VERSION"));

    let stream = match std::env::args().nth(1) {
        Some(path) => load_stream(&path)?,
        None => noise_stream(1024),
    };
    info!("Loaded {} samples", stream.len());

    let engine = FeatureEngine::new(EngineConfig::default())?;
    let mut sink = MemorySink::new();
    for descriptor in REGISTRY {
        if descriptor.kind.is_cross_axis() {
            engine.run(&stream, descriptor.kind, Axis::X, &mut sink);
        } else {
            for axis in Axis::ALL {
                engine.run(&stream, descriptor.kind, axis, &mut sink);
            }
        }
    }
    info!("Extracted {} results", sink.len());

    println!("{}", serde_json::to_string_pretty(sink.records())?);
    Ok(())
}

/// Read a stream from a JSON array of `[x, y, z]` triples
fn load_stream(path: &str) -> Result<SampleStream> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    let triples: Vec<[i8; 3]> = serde_json::from_str(&text).context("parsing sample JSON")?;
    Ok(SampleStream::new(
        triples
            .into_iter()
            .map(|[x, y, z]| Sample::new(x, y, z))
            .collect(),
    ))
}

/// Deterministic pseudo-random stream for demo runs without input data
fn noise_stream(n: usize) -> SampleStream {
    let mut state = 0xACE1u32;
    let mut next = || {
        state = state.wrapping_mul(1664525).wrapping_add(1013904223);
        (state >> 24) as i8
    };
    SampleStream::new((0..n).map(|_| Sample::new(next(), next(), next())).collect())
}

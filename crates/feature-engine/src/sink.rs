//! Result Sinks
//!
//! Every feature writes its per-window results through a caller-supplied
//! sink receiving (feature id, axis, window index, value). Whether results
//! are logged immediately or accumulated is the sink's policy, not the
//! engine's.

use sample_store::Axis;
use serde::Serialize;
use tracing::info;

/// One emitted scalar, tagged by numeric path
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Value {
    Int(i64),
    Float(f32),
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

/// One (feature, axis, window, value) result
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResultRecord {
    pub feature: &'static str,
    pub axis: Axis,
    pub window: usize,
    pub value: Value,
}

/// Destination for feature results
pub trait FeatureSink {
    /// Receive one result. Called once per scalar, in window order.
    fn emit(&mut self, feature: &'static str, axis: Axis, window: usize, value: Value);

    /// Receive a short fixed sequence (density bins, histogram buckets) for
    /// one window, in ascending order.
    fn emit_all(&mut self, feature: &'static str, axis: Axis, window: usize, values: &[Value]) {
        for &value in values {
            self.emit(feature, axis, window, value);
        }
    }
}

/// Sink that accumulates every record (the read-back policy)
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Vec<ResultRecord>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records emitted so far, in emission order
    pub fn records(&self) -> &[ResultRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ResultRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

impl FeatureSink for MemorySink {
    fn emit(&mut self, feature: &'static str, axis: Axis, window: usize, value: Value) {
        self.records.push(ResultRecord {
            feature,
            axis,
            window,
            value,
        });
    }
}

/// Sink that logs one line per result, fields space-separated (the
/// immediate-output policy)
#[derive(Debug, Default)]
pub struct LogSink;

impl FeatureSink for LogSink {
    fn emit(&mut self, feature: &'static str, axis: Axis, window: usize, value: Value) {
        info!(target: "feature_results", "{feature} {axis} {window} {value}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_accumulates_in_order() {
        let mut sink = MemorySink::new();
        sink.emit("median", Axis::X, 0, Value::Int(4));
        sink.emit("median", Axis::X, 1, Value::Int(7));
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.records()[0].value, Value::Int(4));
        assert_eq!(sink.records()[1].window, 1);
    }

    #[test]
    fn test_emit_all_preserves_sequence() {
        let mut sink = MemorySink::new();
        let values: Vec<Value> = (0..5).map(|i| Value::Int(i)).collect();
        sink.emit_all("spectral_density_i", Axis::Z, 3, &values);
        assert_eq!(sink.len(), 5);
        for (i, record) in sink.records().iter().enumerate() {
            assert_eq!(record.value, Value::Int(i as i64));
            assert_eq!(record.window, 3);
        }
    }

    #[test]
    fn test_value_display_space_free() {
        assert_eq!(Value::Int(-7).to_string(), "-7");
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
    }
}

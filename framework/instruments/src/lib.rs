pub mod report;

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// One row of telemetry for a single timed operation attempt.
///
/// A record is created at the moment an operation settles, is immutable from
/// then on, and is only ever appended to a [`ResultsSink`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    /// Attempt number, monotonic by one per attempt within the lifetime of a
    /// single iteration runner. Not unique across runners.
    pub operation_number: u64,
    /// Wall-clock time at which the operation settled.
    pub completed_at: DateTime<Utc>,
    pub instance_name: String,
    /// Names the viewer handle (one per iteration) that issued the operation.
    pub viewer_name: String,
    pub description: String,
    pub elapsed_ms: f64,
    pub success: bool,
    /// Serialized representation of the operation error. Only set on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Ordered records for one instance, keyed by the viewer that produced them.
pub type InstanceResults = BTreeMap<String, Vec<TelemetryRecord>>;

/// The shared append-only store that collects records from all concurrent
/// runners.
///
/// The sink is the single source of truth for a run. Per-instance views are
/// derived queries over it rather than separately maintained maps, so there
/// is exactly one place a record can land.
#[derive(Debug, Clone, Default)]
pub struct ResultsSink {
    records: Arc<Mutex<Vec<TelemetryRecord>>>,
}

impl ResultsSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, record: TelemetryRecord) {
        self.records.lock().push(record);
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// A point-in-time copy of every record appended so far, in append order.
    pub fn snapshot(&self) -> Vec<TelemetryRecord> {
        self.records.lock().clone()
    }

    /// Derived view for one instance: viewer name to the ordered records that
    /// viewer produced.
    pub fn for_instance(&self, instance_name: &str) -> InstanceResults {
        let records = self.records.lock();

        let mut results = InstanceResults::new();
        for record in records.iter() {
            if record.instance_name != instance_name {
                continue;
            }

            results
                .entry(record.viewer_name.clone())
                .or_default()
                .push(record.clone());
        }

        results
    }
}

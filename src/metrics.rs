//! Prometheus metrics for reconciliation runs
//!
//! Process-local counters describing what a run did. Printed on request at
//! the end of a run; never consulted for control flow.

use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec, register_gauge, register_histogram, CounterVec, Encoder, Gauge,
    Histogram, TextEncoder,
};

lazy_static! {
    /// Counter: git steps by name and status
    pub static ref STEPS: CounterVec = register_counter_vec!(
        "reposync_steps_total",
        "Reconciliation steps by step name and status",
        &["step", "status"]
    )
    .expect("Failed to create steps metric");

    /// Histogram: wall-clock time per repository (seconds)
    pub static ref RECONCILE_DURATION: Histogram = register_histogram!(
        "reposync_reconcile_duration_seconds",
        "Duration of one repository reconciliation",
        vec![0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0]
    )
    .expect("Failed to create reconcile_duration metric");

    /// Gauge: reconciliations currently holding an admission slot
    pub static ref ACTIVE_RECONCILIATIONS: Gauge = register_gauge!(
        "reposync_active_reconciliations",
        "Reconciliations currently admitted by the gate"
    )
    .expect("Failed to create active_reconciliations metric");
}

/// Count one finished step
pub fn record_step(step: &str, ok: bool) {
    let status = if ok { "success" } else { "failure" };
    STEPS.with_label_values(&[step, status]).inc();
}

/// Record the duration of one reconciliation
pub fn observe_reconcile_duration(duration_secs: f64) {
    RECONCILE_DURATION.observe(duration_secs);
}

/// Set the number of admitted reconciliations
pub fn set_active(count: usize) {
    ACTIVE_RECONCILIATIONS.set(count as f64);
}

/// Encode all metrics as Prometheus text format
pub fn encode_metrics() -> crate::Result<String> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| crate::ReposyncError::Other(format!("Failed to encode metrics: {}", e)))?;
    String::from_utf8(buffer)
        .map_err(|e| crate::ReposyncError::Other(format!("Metrics are not UTF-8: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        record_step("clone", true);
        record_step("commit", false);
        observe_reconcile_duration(1.5);
        set_active(2);

        let output = encode_metrics().unwrap();
        assert!(output.contains("reposync_steps_total"));
        assert!(output.contains("reposync_reconcile_duration_seconds"));
        assert!(output.contains("reposync_active_reconciliations"));
    }
}

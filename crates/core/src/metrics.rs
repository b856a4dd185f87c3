//! Prometheus metrics for the transcode pipeline.
//!
//! Collectors are process-wide statics; the server registers them through
//! [`all_metrics`].

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts};
use std::time::Duration;

use crate::job::TranscodeError;

/// Jobs finished, by result.
pub static JOBS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("ladderline_jobs_total", "Total transcode jobs finished"),
        &["result"], // "succeeded", "rejected", "failed"
    )
    .unwrap()
});

/// Job duration in seconds, from probe to encoder exit.
pub static JOB_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "ladderline_job_duration_seconds",
            "Duration of transcode jobs",
        )
        .buckets(vec![
            0.1, 1.0, 5.0, 15.0, 30.0, 60.0, 120.0, 300.0, 600.0, 1800.0, 3600.0,
        ]),
        &["result"],
    )
    .unwrap()
});

/// Renditions produced per successful job.
pub static RENDITIONS_PER_JOB: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "ladderline_renditions_per_job",
            "Number of renditions produced per successful job",
        )
        .buckets(vec![1.0, 2.0, 3.0, 4.0, 6.0, 8.0]),
        &[],
    )
    .unwrap()
});

/// Failed jobs, by failing stage.
pub static JOB_FAILURES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("ladderline_job_failures_total", "Failed jobs by stage"),
        &["stage"], // "probe", "resolve", "plan", "encode"
    )
    .unwrap()
});

/// Records a successful job.
pub fn record_success(duration: Duration, renditions: usize) {
    JOBS_TOTAL.with_label_values(&["succeeded"]).inc();
    JOB_DURATION
        .with_label_values(&["succeeded"])
        .observe(duration.as_secs_f64());
    RENDITIONS_PER_JOB
        .with_label_values(&[])
        .observe(renditions as f64);
}

/// Records a failed job. Client errors count as `rejected`.
pub fn record_failure(duration: Duration, error: &TranscodeError) {
    let result = if error.is_client_error() {
        "rejected"
    } else {
        "failed"
    };
    JOBS_TOTAL.with_label_values(&[result]).inc();
    JOB_DURATION
        .with_label_values(&[result])
        .observe(duration.as_secs_f64());
    JOB_FAILURES.with_label_values(&[error.stage()]).inc();
}

/// Returns all core metrics for registration with a Prometheus registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(JOBS_TOTAL.clone()),
        Box::new(JOB_DURATION.clone()),
        Box::new(RENDITIONS_PER_JOB.clone()),
        Box::new(JOB_FAILURES.clone()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prober::ProbeError;

    #[test]
    fn test_record_failure_counts_stage() {
        let before = JOB_FAILURES.with_label_values(&["probe"]).get();
        record_failure(Duration::from_millis(5), &ProbeError::parse("empty").into());
        assert!(JOB_FAILURES.with_label_values(&["probe"]).get() > before);
    }

    #[test]
    fn test_all_metrics_register() {
        let registry = prometheus::Registry::new();
        for metric in all_metrics() {
            registry.register(metric).unwrap();
        }
        record_success(Duration::from_secs(1), 4);
        let names: Vec<String> = registry
            .gather()
            .iter()
            .map(|family| family.get_name().to_string())
            .collect();
        assert!(names.contains(&"ladderline_jobs_total".to_string()));
        assert!(names.contains(&"ladderline_renditions_per_job".to_string()));
    }
}

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Initialize Prometheus metrics exporter
pub fn init_metrics() -> PrometheusHandle {
    let builder = PrometheusBuilder::new();

    let handle = builder
        .install_recorder()
        .expect("Failed to install Prometheus recorder");

    init_metric_descriptions();

    handle
}

/// Initialize metric descriptions (can be called multiple times safely)
fn init_metric_descriptions() {
    describe_counter!(
        "compare_queries_total",
        "Total number of comparison queries"
    );
    describe_histogram!(
        "compare_query_duration_seconds",
        "Query pipeline duration in seconds"
    );
    describe_histogram!(
        "compare_result_count",
        "Number of providers returned per query"
    );
    describe_counter!(
        "compare_errors_total",
        "Total number of rejected or failed queries"
    );
    describe_gauge!(
        "care_compare_info",
        "Service version and build information"
    );

    gauge!("care_compare_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
}

/// Record a completed query
pub fn record_query(procedure: &str, display: &str) {
    counter!(
        "compare_queries_total",
        "procedure" => procedure.to_string(),
        "display" => display.to_string(),
    )
    .increment(1);
}

/// Record how many providers a query returned
pub fn record_result_count(count: usize) {
    histogram!("compare_result_count").record(count as f64);
}

/// Record query pipeline duration
pub fn record_duration(procedure: &str, duration: Duration) {
    histogram!(
        "compare_query_duration_seconds",
        "procedure" => procedure.to_string(),
    )
    .record(duration.as_secs_f64());
}

/// Record a rejected or failed query
pub fn record_error(error_type: &str) {
    counter!(
        "compare_errors_total",
        "error_type" => error_type.to_string(),
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_metrics() {
        init_metric_descriptions();

        record_query("45378", "table");
        record_result_count(3);
        record_duration("45378", Duration::from_millis(2));
        record_error("invalid_query");

        // Recording without an installed recorder is a no-op; the calls
        // just must not panic
    }
}

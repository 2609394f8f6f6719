use axum::{routing::get, Router};
use axum_prometheus::PrometheusMetricLayer;

/// Prometheus layer plus the `/metrics` route, with the service's own series
/// described up front.
pub fn setup_metrics() -> (PrometheusMetricLayer<'static>, Router) {
    let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();

    metrics::describe_counter!(
        "pricelens_ingest_runs_total",
        "Completed catalog ingestion runs"
    );
    metrics::describe_counter!(
        "pricelens_ingest_documents_total",
        "Documents upserted into the semantic index"
    );
    metrics::describe_counter!(
        "pricelens_analyze_requests_total",
        "Completed analysis requests"
    );
    metrics::describe_histogram!(
        "pricelens_ingest_duration_seconds",
        "Wall time of one ingestion run"
    );
    metrics::describe_histogram!(
        "pricelens_analyze_duration_seconds",
        "Wall time of one analysis request"
    );

    let app = Router::new().route("/metrics", get(|| async move { metric_handle.render() }));
    (prometheus_layer, app)
}

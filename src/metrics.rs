use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus exporter and register all application metrics.
/// Returns a `PrometheusHandle` whose `render()` method produces the
/// text/plain Prometheus scrape payload.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    // Pre-register counters so they appear even before the first increment.
    counter!("wagers_placed_total").absolute(0);
    counter!("purchases_total").absolute(0);
    counter!("purchase_rejections_total").absolute(0);
    counter!("compensations_total").absolute(0);

    Ok(handle)
}

/// A handle backed by a recorder that is not installed globally, for tests
/// that build several apps in one process.
pub fn detached_handle() -> PrometheusHandle {
    PrometheusBuilder::new().build_recorder().handle()
}

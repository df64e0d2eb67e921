// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Prometheus metrics for tunneldeck.
//!
//! All metrics live in a process-wide registry exposed at `/metrics`.
//! The interesting signals are reconciliation outcomes and the DNS
//! create/delete/skip counters, which together make the convergence
//! behavior observable: a healthy steady state shows reconciliations
//! succeeding with zero creates and deletes.

use prometheus::{Counter, CounterVec, Encoder, Histogram, HistogramOpts, Opts, Registry, TextEncoder};
use std::sync::LazyLock;
use std::time::Duration;

/// Namespace prefix for all tunneldeck metrics
const METRICS_NAMESPACE: &str = "tunneldeck";

/// Global Prometheus metrics registry
pub static METRICS_REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

/// Total ingress reconciliations by outcome (`success` or `error`)
pub static RECONCILIATIONS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_ingress_reconciliations_total"),
        "Total number of ingress reconciliation runs by outcome",
    );
    let counter = CounterVec::new(opts, &["status"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

/// Duration of ingress reconciliation runs in seconds
pub static RECONCILIATION_DURATION_SECONDS: LazyLock<Histogram> = LazyLock::new(|| {
    let opts = HistogramOpts::new(
        format!("{METRICS_NAMESPACE}_ingress_reconciliation_duration_seconds"),
        "Duration of ingress reconciliation runs in seconds",
    )
    .buckets(vec![0.01, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0]);
    let histogram = Histogram::with_opts(opts).unwrap();
    METRICS_REGISTRY
        .register(Box::new(histogram.clone()))
        .unwrap();
    histogram
});

/// Tunnel CNAME records created by the reconciler
pub static DNS_RECORDS_CREATED_TOTAL: LazyLock<Counter> = LazyLock::new(|| {
    let counter = Counter::new(
        format!("{METRICS_NAMESPACE}_dns_records_created_total"),
        "Total tunnel CNAME records created by the reconciler",
    )
    .unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

/// Stale tunnel CNAME records deleted by the reconciler
pub static DNS_RECORDS_DELETED_TOTAL: LazyLock<Counter> = LazyLock::new(|| {
    let counter = Counter::new(
        format!("{METRICS_NAMESPACE}_dns_records_deleted_total"),
        "Total stale tunnel CNAME records deleted by the reconciler",
    )
    .unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

/// Desired hostnames skipped because a foreign record holds the name
pub static DNS_RECORDS_SKIPPED_TOTAL: LazyLock<Counter> = LazyLock::new(|| {
    let counter = Counter::new(
        format!("{METRICS_NAMESPACE}_dns_records_skipped_total"),
        "Desired hostnames left unrouted because a non-owned record already holds the name",
    )
    .unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

/// Record a successful reconciliation run.
pub fn record_reconciliation_success(duration: Duration) {
    RECONCILIATIONS_TOTAL.with_label_values(&["success"]).inc();
    RECONCILIATION_DURATION_SECONDS.observe(duration.as_secs_f64());
}

/// Record a failed reconciliation run.
pub fn record_reconciliation_error(duration: Duration) {
    RECONCILIATIONS_TOTAL.with_label_values(&["error"]).inc();
    RECONCILIATION_DURATION_SECONDS.observe(duration.as_secs_f64());
}

/// Record one CNAME creation.
pub fn record_dns_created() {
    DNS_RECORDS_CREATED_TOTAL.inc();
}

/// Record one stale CNAME deletion.
pub fn record_dns_deleted() {
    DNS_RECORDS_DELETED_TOTAL.inc();
}

/// Record one skipped hostname.
pub fn record_dns_skipped() {
    DNS_RECORDS_SKIPPED_TOTAL.inc();
}

/// Gather and encode all metrics in Prometheus text format.
///
/// # Errors
///
/// Returns an error if encoding fails.
pub fn gather_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = METRICS_REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(format!("UTF-8 error: {e}")))
}

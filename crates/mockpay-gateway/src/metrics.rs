use prometheus::{Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry};
use std::sync::{LazyLock, Once};

pub static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

pub static SESSIONS_CREATED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "mockpay_sessions_created_total",
        "Total number of checkout sessions created",
    )
    .unwrap()
});

pub static PAYMENTS_SUCCEEDED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "mockpay_payments_succeeded_total",
        "Total number of successful mock payments",
    )
    .unwrap()
});

pub static PAYMENTS_FAILED: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        Opts::new(
            "mockpay_payments_failed_total",
            "Failed mock payments by failure code",
        ),
        &["code"],
    )
    .unwrap()
});

pub static PAYMENT_LATENCY: LazyLock<Histogram> = LazyLock::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "mockpay_payment_latency_seconds",
            "Payment submission latency including simulated delay",
        )
        .buckets(vec![0.01, 0.05, 0.1, 0.5, 1.0, 2.0, 2.5, 5.0, 10.0]),
    )
    .unwrap()
});

pub static RECEIPTS_RENDERED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "mockpay_receipts_rendered_total",
        "Total number of PDF receipts rendered",
    )
    .unwrap()
});

pub static WEBHOOKS_ECHOED: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        Opts::new(
            "mockpay_webhooks_echoed_total",
            "Webhook stub calls by direction and event",
        ),
        &["direction", "event"],
    )
    .unwrap()
});

static REGISTER: Once = Once::new();

/// Register all metrics with the registry. Safe to call more than once.
pub fn register_metrics() {
    REGISTER.call_once(|| {
        REGISTRY
            .register(Box::new(SESSIONS_CREATED.clone()))
            .unwrap();
        REGISTRY
            .register(Box::new(PAYMENTS_SUCCEEDED.clone()))
            .unwrap();
        REGISTRY
            .register(Box::new(PAYMENTS_FAILED.clone()))
            .unwrap();
        REGISTRY
            .register(Box::new(PAYMENT_LATENCY.clone()))
            .unwrap();
        REGISTRY
            .register(Box::new(RECEIPTS_RENDERED.clone()))
            .unwrap();
        REGISTRY
            .register(Box::new(WEBHOOKS_ECHOED.clone()))
            .unwrap();
    });
}

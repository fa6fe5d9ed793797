//! Prometheus metrics for HTTP traffic and cart activity.

use std::sync::OnceLock;

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder, core::Collector,
};
use salvo::{
    Request, Response, handler,
    http::{
        StatusCode,
        header::{CONTENT_TYPE, HeaderValue},
    },
};
use tracing::error;

use storefront_app::domain::carts::models::{AddOutcome, QuantityUpdate};

use super::settings;

const DURATION_BUCKETS: [f64; 13] = [
    0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

#[derive(Debug)]
struct StorefrontMetrics {
    registry: Registry,
    requests_total: IntCounterVec,
    request_duration_seconds: HistogramVec,
    requests_in_flight: IntGauge,
    cart_mutations_total: IntCounterVec,
    inconsistent_references_total: IntCounter,
}

static METRICS: OnceLock<Option<StorefrontMetrics>> = OnceLock::new();

/// What a successful cart write did to the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CartMutation {
    Inserted,
    Merged,
    Updated,
    Deleted,
    Removed,
}

impl CartMutation {
    fn label(self) -> &'static str {
        match self {
            Self::Inserted => "inserted",
            Self::Merged => "merged",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
            Self::Removed => "removed",
        }
    }
}

impl<T> From<&AddOutcome<T>> for CartMutation {
    fn from(outcome: &AddOutcome<T>) -> Self {
        if outcome.is_merged() {
            Self::Merged
        } else {
            Self::Inserted
        }
    }
}

impl<T> From<&QuantityUpdate<T>> for CartMutation {
    fn from(update: &QuantityUpdate<T>) -> Self {
        if update.is_deleted() {
            Self::Deleted
        } else {
            Self::Updated
        }
    }
}

/// Count a cart write by its outcome.
pub(crate) fn record_cart_mutation(mutation: impl Into<CartMutation>) {
    if let Some(metrics) = recording() {
        metrics
            .cart_mutations_total
            .with_label_values(&[mutation.into().label()])
            .inc();
    }
}

/// Count a cart line found pointing at a product that could not be resolved.
pub(crate) fn record_inconsistent_reference() {
    if let Some(metrics) = recording() {
        metrics.inconsistent_references_total.inc();
    }
}

#[derive(Debug)]
pub(super) struct InFlightRequestGuard {
    tracked: bool,
}

impl InFlightRequestGuard {
    pub(super) fn track() -> Self {
        let tracked = recording()
            .map(|metrics| metrics.requests_in_flight.inc())
            .is_some();

        Self { tracked }
    }
}

impl Drop for InFlightRequestGuard {
    fn drop(&mut self) {
        if self.tracked
            && let Some(metrics) = metrics()
        {
            metrics.requests_in_flight.dec();
        }
    }
}

pub(super) fn observe_request(method: &str, route: &str, status_code: u16, duration_seconds: f64) {
    let Some(metrics) = recording() else {
        return;
    };

    metrics
        .requests_total
        .with_label_values(&[method, route, status_class(status_code)])
        .inc();

    metrics
        .request_duration_seconds
        .with_label_values(&[method, route])
        .observe(duration_seconds);
}

#[handler]
pub(crate) async fn metrics_handler(_req: &mut Request, res: &mut Response) {
    let Some(metrics) = metrics() else {
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
        return;
    };

    let encoder = TextEncoder::new();
    let mut encoded = Vec::new();

    if let Err(source) = encoder.encode(&metrics.registry.gather(), &mut encoded) {
        error!("failed to encode metrics: {source}");
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);

        return;
    }

    res.headers_mut().insert(
        CONTENT_TYPE,
        HeaderValue::from_static(prometheus::TEXT_FORMAT),
    );
    res.render(String::from_utf8_lossy(&encoded).into_owned());
}

fn metrics() -> Option<&'static StorefrontMetrics> {
    METRICS
        .get_or_init(|| {
            build_metrics()
                .inspect_err(|source| error!("failed to build metrics registry: {source}"))
                .ok()
        })
        .as_ref()
}

fn recording() -> Option<&'static StorefrontMetrics> {
    settings::metrics_enabled().then(metrics).flatten()
}

fn register<C>(registry: &Registry, collector: C) -> prometheus::Result<C>
where
    C: Collector + Clone + 'static,
{
    registry.register(Box::new(collector.clone()))?;

    Ok(collector)
}

fn build_metrics() -> prometheus::Result<StorefrontMetrics> {
    let registry = Registry::new_custom(Some("storefront_json".to_string()), None)?;

    let requests_total = register(
        &registry,
        IntCounterVec::new(
            Opts::new("http_requests_total", "HTTP requests by method, route and status class."),
            &["method", "route", "status_class"],
        )?,
    )?;

    let request_duration_seconds = register(
        &registry,
        HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request duration in seconds by method and route.",
            )
            .buckets(DURATION_BUCKETS.to_vec()),
            &["method", "route"],
        )?,
    )?;

    let requests_in_flight = register(
        &registry,
        IntGauge::new("http_requests_in_flight", "HTTP requests currently being served.")?,
    )?;

    let cart_mutations_total = register(
        &registry,
        IntCounterVec::new(
            Opts::new("cart_mutations_total", "Successful cart writes by outcome."),
            &["outcome"],
        )?,
    )?;

    let inconsistent_references_total = register(
        &registry,
        IntCounter::new(
            "cart_inconsistent_references_total",
            "Cart lines found referencing a product that could not be resolved.",
        )?,
    )?;

    Ok(StorefrontMetrics {
        registry,
        requests_total,
        request_duration_seconds,
        requests_in_flight,
        cart_mutations_total,
        inconsistent_references_total,
    })
}

fn status_class(status_code: u16) -> &'static str {
    match status_code {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    }
}

//! Prometheus metrics registry for the Remedi backend.
//!
//! [`AppMetrics`] owns all registered metrics and the [`Registry`] they
//! belong to. Construct it once at startup, wrap in `Arc`, and hand it to
//! the router.
//!
//! Exposed at `GET /metrics` in Prometheus text exposition format
//! (`text/plain; version=0.0.4`).

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{MatchedPath, Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use prometheus::{CounterVec, Histogram, HistogramOpts, Opts, Registry};

pub const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// All application-level Prometheus metrics.
pub struct AppMetrics {
    /// Generation calls, labelled by endpoint (`chat`, `summarize`) and outcome.
    pub generation_requests_total: CounterVec,
    /// Chat replies that start with the emergency marker.
    pub emergency_replies_total: prometheus::Counter,
    /// Alert dispatch attempts, labelled by transport and outcome.
    pub alerts_total: CounterVec,
    /// HTTP request count, labelled by method, path, and status code.
    pub http_requests_total: CounterVec,
    /// HTTP request latency histogram in seconds.
    pub http_request_duration: Histogram,
    /// The registry that owns all of the above metrics.
    pub registry: Registry,
}

impl AppMetrics {
    /// Create and register all metrics. Returns an error if any metric
    /// name is invalid or duplicated.
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let generation_requests_total = CounterVec::new(
            Opts::new(
                "remedi_generation_requests_total",
                "Text generation calls by endpoint and outcome",
            ),
            &["endpoint", "outcome"],
        )?;

        let emergency_replies_total = prometheus::Counter::with_opts(Opts::new(
            "remedi_emergency_replies_total",
            "Chat replies carrying the emergency marker",
        ))?;

        let alerts_total = CounterVec::new(
            Opts::new(
                "remedi_alerts_total",
                "Emergency alert dispatch attempts by transport and outcome",
            ),
            &["transport", "outcome"],
        )?;

        let http_requests_total = CounterVec::new(
            Opts::new(
                "remedi_http_requests_total",
                "HTTP requests by method, path, and status",
            ),
            &["method", "path", "status"],
        )?;

        // Generation calls dominate latency, so the buckets reach further than usual.
        let http_request_duration = Histogram::with_opts(
            HistogramOpts::new(
                "remedi_http_request_duration_seconds",
                "HTTP request latency in seconds",
            )
            .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        )?;

        registry.register(Box::new(generation_requests_total.clone()))?;
        registry.register(Box::new(emergency_replies_total.clone()))?;
        registry.register(Box::new(alerts_total.clone()))?;
        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration.clone()))?;

        Ok(Self {
            generation_requests_total,
            emergency_replies_total,
            alerts_total,
            http_requests_total,
            http_request_duration,
            registry,
        })
    }

    /// Render all metrics as Prometheus text format (for the `/metrics` endpoint).
    pub fn render(&self) -> Result<String, prometheus::Error> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buf = Vec::new();
        encoder.encode(&metric_families, &mut buf)?;
        Ok(String::from_utf8(buf).unwrap_or_default())
    }

    pub fn record_generation(&self, endpoint: &str, ok: bool) {
        let outcome = if ok { "success" } else { "error" };
        self.generation_requests_total
            .with_label_values(&[endpoint, outcome])
            .inc();
    }

    pub fn record_alert(&self, transport: &str, outcome: &str) {
        self.alerts_total.with_label_values(&[transport, outcome]).inc();
    }
}

/// `GET /metrics` handler.
pub async fn metrics_handler(State(metrics): State<Arc<AppMetrics>>) -> Response {
    match metrics.render() {
        Ok(body) => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)
            .body(Body::from(body))
            .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response()),
        Err(err) => {
            tracing::error!("Failed to render metrics: {}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, "metrics error").into_response()
        }
    }
}

/// Middleware recording request count and latency per matched route.
pub async fn track_http(
    State(metrics): State<Arc<AppMetrics>>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let started = Instant::now();
    let response = next.run(request).await;

    metrics
        .http_request_duration
        .observe(started.elapsed().as_secs_f64());
    metrics
        .http_requests_total
        .with_label_values(&[method.as_str(), path.as_str(), response.status().as_str()])
        .inc();

    response
}

//! Metrics helper structs for convenient metric recording

use std::time::Duration;

use prometheus::{Encoder, TextEncoder};

use crate::template::OnMissing;

use super::{
    API_ERRORS_TOTAL, DRAFTS_EXPIRED_TOTAL, DRAFTS_SAVED_TOTAL, EXPORTS_TOTAL, RENDERS_TOTAL,
    RENDER_LATENCY, UNRESOLVED_PLACEHOLDERS_TOTAL,
};

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

/// Helper struct for recording render metrics
pub struct RenderMetrics;

impl RenderMetrics {
    /// Record one resolver pass
    pub fn record(on_missing: OnMissing, elapsed: Duration) {
        RENDERS_TOTAL
            .with_label_values(&[on_missing.as_str()])
            .inc();
        RENDER_LATENCY.observe(elapsed.as_secs_f64());
    }

    /// Record placeholders left without a value by a preview render
    pub fn record_unresolved(count: usize) {
        UNRESOLVED_PLACEHOLDERS_TOTAL.inc_by(count as u64);
    }
}

/// Helper struct for recording export metrics
pub struct ExportMetrics;

impl ExportMetrics {
    pub fn record(format: &str) {
        EXPORTS_TOTAL.with_label_values(&[format]).inc();
    }
}

/// Helper struct for recording API error metrics
pub struct ApiMetrics;

impl ApiMetrics {
    pub fn record_error(code: &str) {
        API_ERRORS_TOTAL.with_label_values(&[code]).inc();
    }
}

/// Helper struct for recording draft metrics
pub struct DraftMetrics;

impl DraftMetrics {
    pub fn record_saved() {
        DRAFTS_SAVED_TOTAL.inc();
    }

    pub fn record_expired(count: usize) {
        DRAFTS_EXPIRED_TOTAL.inc_by(count as u64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_metrics_recorded() {
        let before = RENDERS_TOTAL.with_label_values(&["preserve"]).get();
        RenderMetrics::record(OnMissing::Preserve, Duration::from_micros(20));
        assert!(RENDERS_TOTAL.with_label_values(&["preserve"]).get() > before);
    }

    #[test]
    fn test_encode_metrics_contains_prefix() {
        ExportMetrics::record("raw");
        let output = encode_metrics().unwrap();
        assert!(output.contains("email_templates_exports_total"));
    }
}

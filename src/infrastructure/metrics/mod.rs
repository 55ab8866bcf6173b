//! Prometheus metrics for the template service.
//!
//! - Render metrics (renders by missing-value mode, unresolved placeholders, latency)
//! - Export metrics (exports by format)
//! - API error metrics (errors by code)
//! - Storage gauges (templates stored, drafts saved)

mod helpers;

pub use helpers::{encode_metrics, ApiMetrics, DraftMetrics, ExportMetrics, RenderMetrics};

use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, register_int_gauge,
    Histogram, IntCounter, IntCounterVec, IntGauge,
};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "email_templates";

lazy_static! {
    // ============================================================================
    // Render Metrics
    // ============================================================================

    /// Total placeholder resolutions by missing-value mode
    pub static ref RENDERS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_renders_total", METRIC_PREFIX),
        "Total template renders",
        &["on_missing"]
    ).unwrap();

    /// Placeholders left without a value during renders
    pub static ref UNRESOLVED_PLACEHOLDERS_TOTAL: IntCounter = register_int_counter!(
        format!("{}_unresolved_placeholders_total", METRIC_PREFIX),
        "Placeholders rendered without a value"
    ).unwrap();

    /// Time spent resolving a template body
    pub static ref RENDER_LATENCY: Histogram = register_histogram!(
        format!("{}_render_latency_seconds", METRIC_PREFIX),
        "Template render latency in seconds",
        vec![0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05]
    ).unwrap();

    // ============================================================================
    // Export Metrics
    // ============================================================================

    /// Total exports by format
    pub static ref EXPORTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_exports_total", METRIC_PREFIX),
        "Total template exports",
        &["format"]
    ).unwrap();

    // ============================================================================
    // API Metrics
    // ============================================================================

    /// API errors by error code
    pub static ref API_ERRORS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_api_errors_total", METRIC_PREFIX),
        "Total API error responses",
        &["code"]
    ).unwrap();

    // ============================================================================
    // Storage Metrics
    // ============================================================================

    /// Number of stored templates (refreshed on scrape)
    pub static ref TEMPLATES_STORED: IntGauge = register_int_gauge!(
        format!("{}_templates_stored", METRIC_PREFIX),
        "Number of stored templates"
    ).unwrap();

    /// Draft writes
    pub static ref DRAFTS_SAVED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_drafts_saved_total", METRIC_PREFIX),
        "Total drafts saved"
    ).unwrap();

    /// Drafts removed by expiry sweeps
    pub static ref DRAFTS_EXPIRED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_drafts_expired_total", METRIC_PREFIX),
        "Total expired drafts removed"
    ).unwrap();
}

//! Metrics collection and exposition.
//!
//! # Metrics
//! - `flag_requests_total` (counter): requests by method, endpoint, status
//! - `flag_request_duration_seconds` (histogram): latency by endpoint
//! - `flags_submitted_total` (counter): flags written to the store
//! - `flag_colors_submitted_total` (counter): color rows written
//! - `flag_submissions_rejected_total` (counter): refused bodies by reason
//!   (`no_hex_color`, `malformed`, `too_large`)
//!
//! Recording is a no-op until a recorder is installed, so handlers and tests
//! can call these freely.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::http::error::AppError;

/// Install the Prometheus recorder and serve it on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one finished request.
pub fn record_request(method: &str, status: u16, endpoint: &'static str, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("endpoint", endpoint.to_string()),
        ("status", status.to_string()),
    ];
    counter!("flag_requests_total", &labels).increment(1);
    histogram!("flag_request_duration_seconds", "endpoint" => endpoint)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_flag_stored(colors: usize) {
    counter!("flags_submitted_total").increment(1);
    counter!("flag_colors_submitted_total").increment(colors as u64);
}

pub fn record_rejected_submission(err: &AppError) {
    let reason = match err {
        AppError::NoHexColor => "no_hex_color",
        AppError::MalformedSubmission(_) => "malformed",
        AppError::PayloadTooLarge(_) => "too_large",
        _ => "other",
    };
    counter!("flag_submissions_rejected_total", "reason" => reason).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use metrics_util::debugging::{DebugValue, DebuggingRecorder};

    /// Run `f` against a local recorder and return every metric it touched as
    /// `(name, labels, value)`.
    fn capture(f: impl FnOnce()) -> Vec<(String, Vec<(String, String)>, DebugValue)> {
        let recorder = DebuggingRecorder::new();
        let snapshotter = recorder.snapshotter();
        metrics::with_local_recorder(&recorder, f);

        snapshotter
            .snapshot()
            .into_vec()
            .into_iter()
            .map(|(key, _, _, value)| {
                let key = key.key();
                let mut labels: Vec<_> = key
                    .labels()
                    .map(|l| (l.key().to_string(), l.value().to_string()))
                    .collect();
                labels.sort();
                (key.name().to_string(), labels, value)
            })
            .collect()
    }

    fn counter(
        metrics: &[(String, Vec<(String, String)>, DebugValue)],
        name: &str,
        labels: &[(&str, &str)],
    ) -> Option<u64> {
        metrics.iter().find_map(|(n, l, v)| {
            let same_labels = l.len() == labels.len()
                && labels.iter().all(|(k, val)| l.iter().any(|(lk, lv)| lk == k && lv == val));
            match v {
                DebugValue::Counter(c) if n == name && same_labels => Some(*c),
                _ => None,
            }
        })
    }

    #[test]
    fn test_record_flag_stored() {
        let metrics = capture(|| record_flag_stored(3));
        assert_eq!(counter(&metrics, "flags_submitted_total", &[]), Some(1));
        assert_eq!(counter(&metrics, "flag_colors_submitted_total", &[]), Some(3));
    }

    #[test]
    fn test_rejections_are_counted_by_reason() {
        let metrics = capture(|| {
            record_rejected_submission(&AppError::NoHexColor);
            record_rejected_submission(&AppError::NoHexColor);
            record_rejected_submission(&AppError::MalformedSubmission("eof".into()));
            record_rejected_submission(&AppError::PayloadTooLarge(16));
        });

        let rejected = "flag_submissions_rejected_total";
        assert_eq!(counter(&metrics, rejected, &[("reason", "no_hex_color")]), Some(2));
        assert_eq!(counter(&metrics, rejected, &[("reason", "malformed")]), Some(1));
        assert_eq!(counter(&metrics, rejected, &[("reason", "too_large")]), Some(1));
    }

    #[test]
    fn test_record_request() {
        let metrics = capture(|| record_request("POST", 201, "submit_flag", Instant::now()));

        assert_eq!(
            counter(
                &metrics,
                "flag_requests_total",
                &[("method", "POST"), ("endpoint", "submit_flag"), ("status", "201")],
            ),
            Some(1)
        );
        let latency = metrics
            .iter()
            .find(|(name, _, _)| name == "flag_request_duration_seconds");
        assert!(matches!(latency, Some((_, _, DebugValue::Histogram(v))) if v.len() == 1));
    }
}

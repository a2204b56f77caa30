//! Snapshot formatting for host-side logging and diagnostics
//!
//! No protocol surface: these render published snapshots into strings the
//! host can log, display, or pipe elsewhere.

use serde::Serialize;

use crate::fusion::FusionUpdate;

/// A published snapshot with its bookkeeping timestamp, flattened for output
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotRecord {
    /// Milliseconds since epoch of the event that produced the snapshot
    pub timestamp_ms: Option<u64>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub sigma: Option<f64>,
    /// False after a reset, true for a position-carrying snapshot
    pub has_fix: bool,
}

impl SnapshotRecord {
    pub fn new(update: &FusionUpdate, timestamp_ms: Option<u64>) -> Self {
        match update.fix() {
            Some(fix) => Self {
                timestamp_ms,
                x: Some(fix.x),
                y: Some(fix.y),
                sigma: Some(fix.sigma),
                has_fix: true,
            },
            None => Self {
                timestamp_ms,
                x: None,
                y: None,
                sigma: None,
                has_fix: false,
            },
        }
    }
}

/// Renders snapshot records into an output string
pub trait FixFormatter {
    fn format(&self, record: &SnapshotRecord) -> String;
}

/// Human-readable single-line output
#[derive(Debug, Clone, Copy, Default)]
pub struct TextFormatter;

impl FixFormatter for TextFormatter {
    fn format(&self, record: &SnapshotRecord) -> String {
        match (record.x, record.y, record.sigma) {
            (Some(x), Some(y), Some(sigma)) => {
                let stamp = record
                    .timestamp_ms
                    .map(|t| format!("[{}ms] ", t))
                    .unwrap_or_default();
                format!("{}position ({:.2}, {:.2}) m, sigma {:.2} m", stamp, x, y, sigma)
            }
            _ => "no fix".to_string(),
        }
    }
}

/// Compact JSON object per snapshot
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter;

impl FixFormatter for JsonFormatter {
    fn format(&self, record: &SnapshotRecord) -> String {
        // Serialization of a plain record of options cannot fail
        serde_json::to_string(record).unwrap_or_else(|_| "{}".to_string())
    }
}

/// One CSV row per snapshot: timestamp_ms,x,y,sigma
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvFormatter;

impl CsvFormatter {
    pub fn header(&self) -> &'static str {
        "timestamp_ms,x_m,y_m,sigma_m"
    }
}

impl FixFormatter for CsvFormatter {
    fn format(&self, record: &SnapshotRecord) -> String {
        let stamp = record
            .timestamp_ms
            .map(|t| t.to_string())
            .unwrap_or_default();
        match (record.x, record.y, record.sigma) {
            (Some(x), Some(y), Some(sigma)) => {
                format!("{},{:.4},{:.4},{:.4}", stamp, x, y, sigma)
            }
            _ => format!("{},,,", stamp),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::PositionFix;

    fn sample() -> SnapshotRecord {
        SnapshotRecord::new(
            &FusionUpdate::Fix(PositionFix::new(5.25, -3.5, 0.75)),
            Some(12_345),
        )
    }

    #[test]
    fn text_format_includes_position_and_sigma() {
        let text = TextFormatter.format(&sample());
        assert!(text.contains("(5.25, -3.50)"));
        assert!(text.contains("sigma 0.75"));
        assert!(text.contains("12345ms"));
    }

    #[test]
    fn json_format_round_trips() {
        let json = JsonFormatter.format(&sample());
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["x"], 5.25);
        assert_eq!(value["has_fix"], true);
        assert_eq!(value["timestamp_ms"], 12_345);
    }

    #[test]
    fn csv_format_matches_header_arity() {
        let formatter = CsvFormatter;
        let row = formatter.format(&sample());
        assert_eq!(
            row.split(',').count(),
            formatter.header().split(',').count()
        );
    }

    #[test]
    fn reset_renders_as_no_fix() {
        let record = SnapshotRecord::new(&FusionUpdate::Reset, None);
        assert_eq!(TextFormatter.format(&record), "no fix");
        assert_eq!(CsvFormatter.format(&record), ",,,");

        let value: serde_json::Value =
            serde_json::from_str(&JsonFormatter.format(&record)).unwrap();
        assert_eq!(value["has_fix"], false);
        assert!(value["x"].is_null());
    }
}

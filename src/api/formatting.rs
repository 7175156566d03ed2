//! Sample output formatting and serialization
//!
//! Progress samples can be rendered as human-readable text, JSON, or CSV
//! rows for logging and offline inspection.

use crate::api::types::OutputFormat;
use crate::core::ProgressSample;
use serde::Serialize;

/// Sample with values rounded to the formatter precision
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedSample {
    pub epoch: u64,
    pub timestamp_ms: u64,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub bearing_deg: f64,
    pub fraction: f64,
    pub marker_visible: bool,
}

/// Converts samples into [`FormattedSample`]s
pub struct SampleFormatter {
    /// Default output format
    pub default_format: OutputFormat,
    /// Decimal places kept for floating-point values
    pub precision: u8,
}

impl Default for SampleFormatter {
    fn default() -> Self {
        Self {
            default_format: OutputFormat::Text,
            precision: 6,
        }
    }
}

impl SampleFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default output format
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.default_format = format;
        self
    }

    /// Set the precision for floating-point values
    pub fn with_precision(mut self, precision: u8) -> Self {
        self.precision = precision;
        self
    }

    pub fn format(&self, sample: &ProgressSample) -> FormattedSample {
        FormattedSample {
            epoch: sample.epoch,
            timestamp_ms: sample.timestamp_ms,
            latitude_deg: self.round_to_precision(sample.position.latitude()),
            longitude_deg: self.round_to_precision(sample.position.longitude()),
            bearing_deg: self.round_to_precision(sample.bearing_deg),
            fraction: self.round_to_precision(sample.fraction),
            marker_visible: sample.marker_visible,
        }
    }

    /// Render a sample as one line in the default format
    pub fn render(&self, sample: &ProgressSample) -> Result<String, serde_json::Error> {
        let formatted = self.format(sample);
        match self.default_format {
            OutputFormat::Text => Ok(TextFormatter::compact().format_text(&formatted)),
            OutputFormat::Json => JsonFormatter::new().format_json(&formatted),
            OutputFormat::Csv => Ok(CsvFormatter::new().format_csv(&formatted)),
        }
    }

    fn round_to_precision(&self, value: f64) -> f64 {
        let multiplier = 10_f64.powi(self.precision as i32);
        (value * multiplier).round() / multiplier
    }
}

/// Human-readable text formatter
#[derive(Default)]
pub struct TextFormatter {
    /// Single-line output
    pub compact: bool,
}

impl TextFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compact() -> Self {
        Self { compact: true }
    }

    pub fn format_text(&self, sample: &FormattedSample) -> String {
        let visibility = if sample.marker_visible { "shown" } else { "hidden" };
        if self.compact {
            return format!(
                "#{} t={}ms {:.6}°, {:.6}° hdg {:.1}° {:>5.1}% {}",
                sample.epoch,
                sample.timestamp_ms,
                sample.latitude_deg,
                sample.longitude_deg,
                sample.bearing_deg,
                sample.fraction * 100.0,
                visibility
            );
        }

        let mut output = String::new();
        output.push_str(&format!("Epoch #{} at {} ms:\n", sample.epoch, sample.timestamp_ms));
        output.push_str(&format!("  Latitude:  {:.6}°\n", sample.latitude_deg));
        output.push_str(&format!("  Longitude: {:.6}°\n", sample.longitude_deg));
        output.push_str(&format!("  Bearing:   {:.1}°\n", sample.bearing_deg));
        output.push_str(&format!("  Progress:  {:.1}%\n", sample.fraction * 100.0));
        output.push_str(&format!("  Marker:    {}\n", visibility));
        output
    }
}

/// JSON formatter for structured output
#[derive(Default)]
pub struct JsonFormatter {
    /// Pretty print JSON
    pub pretty: bool,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    pub fn format_json(&self, sample: &FormattedSample) -> Result<String, serde_json::Error> {
        if self.pretty {
            serde_json::to_string_pretty(sample)
        } else {
            serde_json::to_string(sample)
        }
    }
}

/// CSV formatter for data logging
pub struct CsvFormatter {
    /// Include header row
    pub include_header: bool,
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self { include_header: true }
    }
}

impl CsvFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(&self) -> String {
        "epoch,timestamp_ms,latitude,longitude,bearing,fraction,visible".to_string()
    }

    pub fn format_csv(&self, sample: &FormattedSample) -> String {
        format!(
            "{},{},{:.6},{:.6},{:.1},{:.4},{}",
            sample.epoch,
            sample.timestamp_ms,
            sample.latitude_deg,
            sample.longitude_deg,
            sample.bearing_deg,
            sample.fraction,
            sample.marker_visible
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Coordinate;

    fn sample() -> ProgressSample {
        ProgressSample {
            position: Coordinate::new(28.61391234567, 77.20901234567).unwrap(),
            bearing_deg: 212.34,
            marker_visible: true,
            fraction: 0.25,
            epoch: 3,
            timestamp_ms: 1200,
        }
    }

    #[test]
    fn test_precision_rounding() {
        let formatted = SampleFormatter::new().with_precision(3).format(&sample());
        assert_eq!(formatted.latitude_deg, 28.614);
        assert_eq!(formatted.longitude_deg, 77.209);
        assert_eq!(formatted.fraction, 0.25);
    }

    #[test]
    fn test_compact_text() {
        let line = SampleFormatter::new().render(&sample()).unwrap();
        assert!(line.starts_with("#3 t=1200ms 28.613912°, 77.209012°"));
        assert!(line.ends_with("25.0% shown"));
    }

    #[test]
    fn test_verbose_text() {
        let formatted = SampleFormatter::new().format(&sample());
        let text = TextFormatter::new().format_text(&formatted);
        assert!(text.contains("Epoch #3 at 1200 ms"));
        assert!(text.contains("Marker:    shown"));
    }

    #[test]
    fn test_json_fields() {
        let line = SampleFormatter::new()
            .with_format(OutputFormat::Json)
            .render(&sample())
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["epoch"], 3);
        assert_eq!(value["marker_visible"], true);
        assert_eq!(value["fraction"], 0.25);
    }

    #[test]
    fn test_csv_row_matches_header() {
        let csv = CsvFormatter::new();
        let row = csv.format_csv(&SampleFormatter::new().format(&sample()));
        assert_eq!(row.split(',').count(), csv.header().split(',').count());
        assert_eq!(row, "3,1200,28.613912,77.209012,212.3,0.2500,true");
    }
}

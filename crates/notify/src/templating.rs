//! Minijinja rendering of the report email.
//!
//! The body template is a built-in default but can be overridden with any
//! template string, so a fresh [`minijinja::Environment`] is created per
//! render call rather than pre-registering templates.

use vigil_core::UptimeReport;

use crate::traits::DeliveryError;

/// Default HTML body for the report email.
pub const DEFAULT_BODY_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Container Report</title></head>
<body>
    <h1>Daily Container Report</h1>
    <p>{{ start_time | date }} - {{ end_time | date }}</p>
    <p>Total Containers: {{ container_count }}</p>
    <p>Online Containers: {{ container_on_count }}</p>
    <p>Offline Containers: {{ container_off_count }}</p>
    <p>Total Uptime: {{ total_uptime | round(2) }}h</p>
</body>
</html>
"#;

/// Renders report emails using minijinja.
#[derive(Debug)]
pub struct TemplateRenderer {
    _private: (),
}

impl TemplateRenderer {
    /// Create a new template renderer.
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Build a configured minijinja environment with custom filters.
    fn build_env() -> minijinja::Environment<'static> {
        let mut env = minijinja::Environment::new();
        env.add_filter("date", date_filter);
        env.add_filter("round", round_filter);
        env
    }

    /// Render a body template with the report as context.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::Template`] if the template is invalid or
    /// rendering fails.
    pub fn render(&self, template_str: &str, report: &UptimeReport) -> Result<String, DeliveryError> {
        let env = Self::build_env();
        env.render_str(template_str, report)
            .map_err(|e| DeliveryError::Template(e.to_string()))
    }

    /// Render the built-in report body.
    pub fn render_body(&self, report: &UptimeReport) -> Result<String, DeliveryError> {
        self.render(DEFAULT_BODY_TEMPLATE, report)
    }

    /// Validate that a template string parses without errors.
    pub fn validate(&self, template_str: &str) -> Result<(), DeliveryError> {
        let env = Self::build_env();
        env.template_from_str(template_str)
            .map_err(|e| DeliveryError::Template(e.to_string()))?;
        Ok(())
    }
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Subject line for the report email.
pub fn subject(report: &UptimeReport) -> String {
    format!(
        "Container Management System Report from {} to {}",
        report.start_time.to_rfc2822(),
        report.end_time.to_rfc2822()
    )
}

/// Custom filter: calendar date (YYYY-MM-DD) of an RFC 3339 timestamp.
fn date_filter(value: String) -> String {
    value.chars().take(10).collect()
}

/// Custom filter: round a float to N decimal places.
fn round_filter(value: f64, decimals: Option<u32>) -> String {
    let n = decimals.unwrap_or(0);
    format!("{:.prec$}", value, prec = n as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono::Utc;

    fn sample_report() -> UptimeReport {
        UptimeReport {
            container_count: 10,
            container_on_count: 7,
            container_off_count: 3,
            total_uptime: 24.5,
            start_time: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            end_time: Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn default_body_shows_counts_and_window() {
        let renderer = TemplateRenderer::new();
        let body = renderer.render_body(&sample_report()).unwrap();

        assert!(body.contains("Total Containers: 10"));
        assert!(body.contains("Online Containers: 7"));
        assert!(body.contains("Offline Containers: 3"));
        assert!(body.contains("Total Uptime: 24.50h"));
        assert!(body.contains("2024-01-01 - 2024-01-02"));
    }

    #[test]
    fn custom_template_renders_report_fields() {
        let renderer = TemplateRenderer::new();
        let result = renderer
            .render("{{ container_on_count }}/{{ container_count }} up", &sample_report())
            .unwrap();
        assert_eq!(result, "7/10 up");
    }

    #[test]
    fn invalid_template_produces_error() {
        let renderer = TemplateRenderer::new();
        let result = renderer.render("{{ unclosed", &sample_report());
        match result.unwrap_err() {
            DeliveryError::Template(msg) => assert!(!msg.is_empty()),
            other => panic!("expected Template error, got: {:?}", other),
        }
    }

    #[test]
    fn validate_accepts_default_template() {
        let renderer = TemplateRenderer::new();
        assert!(renderer.validate(DEFAULT_BODY_TEMPLATE).is_ok());
    }

    #[test]
    fn validate_rejects_bad_syntax() {
        let renderer = TemplateRenderer::new();
        assert!(renderer.validate("{% for x %}").is_err());
    }

    #[test]
    fn subject_names_both_window_edges() {
        let line = subject(&sample_report());
        assert!(line.starts_with("Container Management System Report from "));
        assert!(line.contains("1 Jan 2024"));
        assert!(line.contains("2 Jan 2024"));
    }
}

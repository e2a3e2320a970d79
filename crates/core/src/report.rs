use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One finished report cycle: classification counts and accumulated uptime
/// over the window `[window_start, window_end)`.
///
/// Produced fresh per window and handed to the sink once; nothing holds on
/// to it across cycles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UptimeReport {
    pub container_count: usize,
    pub container_on_count: usize,
    pub container_off_count: usize,
    pub total_uptime: f64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn report_serializes_wire_field_names() {
        let report = UptimeReport {
            container_count: 10,
            container_on_count: 7,
            container_off_count: 3,
            total_uptime: 24.5,
            start_time: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            end_time: Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["container_count"], 10);
        assert_eq!(json["container_on_count"], 7);
        assert_eq!(json["container_off_count"], 3);
        assert_eq!(json["total_uptime"], 24.5);
    }
}

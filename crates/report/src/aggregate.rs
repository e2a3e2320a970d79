//! Windowed uptime aggregation.
//!
//! Pure computation over already-fetched records: no I/O, no suspension,
//! no state beyond the accumulators local to one call.

use chrono::{DateTime, Utc};

use vigil_core::{ContainerStatus, StatusIndex};

const SECS_PER_HOUR: f64 = 3600.0;

/// Classification counts and accumulated uptime for one window.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UptimeStats {
    pub on_count: usize,
    pub off_count: usize,
    pub total_uptime_hours: f64,
}

/// Fractional hours between two timestamps.
fn hours_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / (SECS_PER_HOUR * 1000.0)
}

/// Aggregate one report window `[start, end)`.
///
/// Walks every container keyed in `window_records` (containers with an
/// empty record list included) in record order:
///
/// - An ON record contributes `min(observed-since-start, reported ON
///   duration)` hours. The cap matters when the container turned on before
///   `start`: its reported duration then exceeds the portion of the ON
///   interval inside the window, and only the in-window portion counts.
/// - An OFF record advances the last known off-transition, which anchors
///   the tail segment below.
///
/// The window alone cannot tell whether an ON observed near `end`
/// continues past it, so the first record of `boundary_records` — fetched
/// from `[end, now)` — settles the final classification:
///
/// - Boundary ON: the container is on at the window edge. The tail from
///   the last off-transition to `end` is credited, capped by the boundary
///   record's reported ON duration.
/// - Boundary OFF: the container is off, whatever the window walk said.
/// - No boundary record: the last in-window state decides; a container
///   with no records at all is off.
///
/// Only the first boundary record per container is consulted; a probe
/// misconfigured to return more is ignored past the first.
pub fn aggregate(
    window_records: &StatusIndex,
    boundary_records: &StatusIndex,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> UptimeStats {
    let mut stats = UptimeStats::default();

    for (container_id, records) in window_records {
        let mut is_online = false;
        let mut last_off = start;

        for record in records {
            match record.status {
                ContainerStatus::On => {
                    stats.total_uptime_hours += f64::min(
                        hours_between(start, record.last_updated),
                        record.uptime as f64 / SECS_PER_HOUR,
                    );
                    is_online = true;
                }
                ContainerStatus::Off => {
                    if record.last_updated > last_off {
                        last_off = record.last_updated;
                    }
                    is_online = false;
                }
            }
        }

        match boundary_records.get(container_id).and_then(|r| r.first()) {
            Some(boundary) if boundary.status == ContainerStatus::On => {
                stats.on_count += 1;
                stats.total_uptime_hours += f64::min(
                    hours_between(last_off, end),
                    boundary.uptime as f64 / SECS_PER_HOUR,
                );
            }
            Some(_) => {
                stats.off_count += 1;
            }
            None => {
                if is_online {
                    stats.on_count += 1;
                } else {
                    stats.off_count += 1;
                }
            }
        }
    }

    stats
}

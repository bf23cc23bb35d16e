//! Derived presentation metrics.
//!
//! Pure functions recomputed on every render from the current view model.
//! Nothing here touches the network or the store.

use crate::model::{LaneCounts, LaneId, SignalTimings};

/// Allocated green-time assumed when the active lane has no timing entry.
/// Display fallback only, never authoritative.
pub const DEFAULT_SIGNAL_TIME: u32 = 30;

/// Three-level classification of a lane's vehicle count relative to the
/// busiest lane at that instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DensityTier {
    Low,
    Medium,
    High,
}

impl DensityTier {
    /// Presentation color for the tier (High is red, Medium yellow, Low green).
    pub fn color_name(self) -> &'static str {
        match self {
            DensityTier::High => "red",
            DensityTier::Medium => "yellow",
            DensityTier::Low => "green",
        }
    }
}

/// Maximum count across all lanes, defaulting to 1 when every lane is empty
/// or no counts are present, so percentage math never divides by zero.
fn max_count(counts: Option<&LaneCounts>) -> u32 {
    counts
        .and_then(|c| c.values().max().copied())
        .filter(|&max| max > 0)
        .unwrap_or(1)
}

/// Classify a lane's count against the busiest lane.
///
/// High at >= 75% of the maximum, Medium at >= 50%, otherwise Low.
pub fn density_tier(count: u32, counts: Option<&LaneCounts>) -> DensityTier {
    let pct = density_percent(count, counts);
    if pct >= 75.0 {
        DensityTier::High
    } else if pct >= 50.0 {
        DensityTier::Medium
    } else {
        DensityTier::Low
    }
}

/// A lane's count as a percentage of the busiest lane's count.
pub fn density_percent(count: u32, counts: Option<&LaneCounts>) -> f64 {
    f64::from(count) / f64::from(max_count(counts)) * 100.0
}

/// Sum of all lane counts, 0 when absent.
pub fn total_vehicles(counts: Option<&LaneCounts>) -> u32 {
    counts.map(|c| c.values().sum()).unwrap_or(0)
}

/// Total vehicles divided by the fixed lane count, rounded to the nearest
/// integer; 0 when counts are absent.
pub fn average_per_lane(counts: Option<&LaneCounts>) -> u32 {
    (f64::from(total_vehicles(counts)) / f64::from(LaneId::COUNT)).round() as u32
}

/// Fraction of the active lane's allocated green-time that has elapsed,
/// as a percentage.
///
/// Returns 0 when any input is missing. Not clamped: stale data where
/// `remaining_time` exceeds the allocation yields a negative percentage.
pub fn signal_progress_percent(
    current_lane: Option<LaneId>,
    signal_timings: Option<&SignalTimings>,
    remaining_time: Option<u32>,
) -> f64 {
    let (Some(lane), Some(timings), Some(remaining)) =
        (current_lane, signal_timings, remaining_time)
    else {
        return 0.0;
    };
    let allocated = timings.get(&lane).copied().unwrap_or(DEFAULT_SIGNAL_TIME);
    (f64::from(allocated) - f64::from(remaining)) / f64::from(allocated) * 100.0
}

/// Render a countdown as zero-padded `MM:SS`, or `"--"` when absent.
pub fn format_countdown(seconds: Option<u32>) -> String {
    match seconds {
        Some(s) => format!("{:02}:{:02}", s / 60, s % 60),
        None => "--".to_string(),
    }
}

/// Format a backend timestamp for display.
///
/// The controller emits naive ISO-8601 local times; an RFC 3339 timestamp is
/// also accepted. `"N/A"` when missing, `"Invalid Date"` when unparseable.
pub fn format_timestamp(timestamp: Option<&str>) -> String {
    let Some(raw) = timestamp else {
        return "N/A".to_string();
    };
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return dt.format("%b %e, %H:%M:%S").to_string();
    }
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format("%b %e, %H:%M:%S").to_string();
    }
    "Invalid Date".to_string()
}

//! Output formatting helpers for CLI commands
//!
//! Declarative mapping of the view model to terminal markup: tables for the
//! junction and the history log, badges for the session flags. All functions
//! return strings; nothing here mutates state.

use crate::metrics;
use crate::model::{ConnectionState, HistoryEntry, LaneId, ProcessingState};
use crate::store::DashboardState;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};

/// One-line session header: connection and processing badges.
pub fn format_status_line(state: &DashboardState) -> String {
    let connection = match state.connection {
        ConnectionState::Connected => "Connected".green().to_string(),
        ConnectionState::Disconnected => "Disconnected".red().to_string(),
    };
    let processing = match state.processing {
        ProcessingState::Processing => "Processing".cyan().to_string(),
        ProcessingState::Idle => "Idle".yellow().to_string(),
    };
    format!("Backend: {connection}  |  Pipeline: {processing}")
}

/// Junction table: per-lane counts, density tiers, and signal timings.
pub fn format_junction_table(state: &DashboardState) -> String {
    let snapshot = state.snapshot.as_ref();
    let counts = snapshot.map(|s| &s.lane_counts);
    let timings = snapshot.map(|s| &s.signal_timings);
    let current = snapshot.and_then(|s| s.current_lane);

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Lane", "Vehicles", "Density", "Allocated", "Signal"]);

    for lane in LaneId::ALL {
        let count = counts.and_then(|c| c.get(&lane).copied()).unwrap_or(0);
        let tier = metrics::density_tier(count, counts);
        let tier_str = match tier {
            metrics::DensityTier::High => "High".red().to_string(),
            metrics::DensityTier::Medium => "Medium".yellow().to_string(),
            metrics::DensityTier::Low => "Low".green().to_string(),
        };
        let allocated = timings
            .and_then(|t| t.get(&lane).copied())
            .map(|t| format!("{t}s"))
            .unwrap_or_else(|| "-".to_string());
        let signal = if current == Some(lane) {
            "GREEN".green().bold().to_string()
        } else {
            "red".red().to_string()
        };

        table.add_row(vec![
            Cell::new(lane),
            Cell::new(count),
            Cell::new(tier_str),
            Cell::new(allocated),
            Cell::new(signal),
        ]);
    }

    table.to_string()
}

/// Countdown, progress, and aggregate summary lines for the active signal.
pub fn format_signal_summary(state: &DashboardState) -> String {
    let snapshot = state.snapshot.as_ref();
    let counts = snapshot.map(|s| &s.lane_counts);
    let current = snapshot.and_then(|s| s.current_lane);
    let remaining = snapshot.and_then(|s| s.remaining_time);

    let active = current
        .map(|lane| lane.to_string())
        .unwrap_or_else(|| "None".to_string());
    let countdown = metrics::format_countdown(remaining);
    let progress = metrics::signal_progress_percent(
        current,
        snapshot.map(|s| &s.signal_timings),
        remaining,
    );
    let total = metrics::total_vehicles(counts);
    let average = metrics::average_per_lane(counts);

    format!(
        "Active lane: {active}  Remaining: {countdown}  Progress: {progress:.0}%\n\
         Total vehicles: {total}  Avg per lane: {average}"
    )
}

/// History table in backend order (newest first).
pub fn format_history_table(history: &[HistoryEntry]) -> String {
    if history.is_empty() {
        return "No traffic history available".to_string();
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Timestamp",
        "Lane",
        "North",
        "South",
        "East",
        "West",
        "Signal Time",
    ]);

    for entry in history {
        table.add_row(vec![
            Cell::new(metrics::format_timestamp(entry.timestamp.as_deref())),
            Cell::new(entry.lane),
            Cell::new(entry.north_count),
            Cell::new(entry.south_count),
            Cell::new(entry.east_count),
            Cell::new(entry.west_count),
            Cell::new(format!("{}s", entry.signal_time)),
        ]);
    }

    table.to_string()
}

/// Full dashboard frame: badges, error banner, junction, signal, history.
pub fn render_dashboard(state: &DashboardState) -> String {
    let mut out = String::new();
    out.push_str(&format_status_line(state));
    out.push('\n');
    if let Some(error) = &state.last_error {
        out.push_str(&format!("{} {error}\n", "Error:".red().bold()));
    }
    out.push('\n');
    out.push_str(&format_junction_table(state));
    out.push('\n');
    out.push_str(&format_signal_summary(state));
    out.push_str("\n\n");
    out.push_str(&format_history_table(&state.history));
    out.push('\n');
    out
}

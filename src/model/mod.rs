//! Domain and wire types for the dashboard view model.
//!
//! These mirror the controller's REST payloads: the current traffic snapshot,
//! historical signal cycles, and the local session state the pollers and the
//! command dispatcher maintain.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One of the four fixed compass approaches to the junction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LaneId {
    North,
    South,
    East,
    West,
}

impl LaneId {
    /// All lanes, in display order.
    pub const ALL: [LaneId; 4] = [LaneId::North, LaneId::South, LaneId::East, LaneId::West];

    /// Fixed lane cardinality; aggregate averages divide by this.
    pub const COUNT: u32 = 4;
}

impl fmt::Display for LaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LaneId::North => "North",
            LaneId::South => "South",
            LaneId::East => "East",
            LaneId::West => "West",
        };
        f.write_str(name)
    }
}

/// Per-lane vehicle counts as reported by the controller.
pub type LaneCounts = BTreeMap<LaneId, u32>;

/// Per-lane allocated green-time, in seconds.
pub type SignalTimings = BTreeMap<LaneId, u32>;

/// The most recently received authoritative description of the controller's
/// current decision.
///
/// If `current_lane` is set, `signal_timings` should contain an entry for it;
/// a missing entry is tolerated and defaults to 30s for display only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficSnapshot {
    /// Approach that currently has right-of-way, if any.
    pub current_lane: Option<LaneId>,
    /// Vehicle counts per lane.
    #[serde(default)]
    pub lane_counts: LaneCounts,
    /// Seconds until the next signal change.
    pub remaining_time: Option<u32>,
    /// Allocated green-time per lane.
    #[serde(default)]
    pub signal_timings: SignalTimings,
    /// Controller-side timestamp (naive ISO-8601, taken as received).
    pub timestamp: Option<String>,
}

/// One completed signal cycle from the controller's log.
///
/// Immutable once received; entries keep whatever order the backend returns
/// (newest-first assumed, never re-sorted by the client).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: Option<String>,
    pub lane: LaneId,
    #[serde(default)]
    pub north_count: u32,
    #[serde(default)]
    pub south_count: u32,
    #[serde(default)]
    pub east_count: u32,
    #[serde(default)]
    pub west_count: u32,
    /// Green-time allocated for this cycle, in seconds.
    pub signal_time: u32,
}

/// Whether the backend is currently reachable.
///
/// Set by the startup health probe and every status poll cycle: any poll
/// success means Connected, any transport-level failure means Disconnected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ConnectionState {
    Connected,
    #[default]
    Disconnected,
}

/// Whether the controller is running its detection pipeline.
///
/// Transitions only on acknowledged success of start/stop commands, never
/// optimistically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ProcessingState {
    #[default]
    Idle,
    Processing,
}

/// Input source for the controller's detection pipeline.
///
/// The live camera feed is encoded on the wire as the sentinel value `0`,
/// a file source as its path string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoSource {
    Webcam,
    File(String),
}

impl Serialize for VideoSource {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            VideoSource::Webcam => serializer.serialize_u64(0),
            VideoSource::File(path) => serializer.serialize_str(path),
        }
    }
}

impl From<Option<String>> for VideoSource {
    fn from(path: Option<String>) -> Self {
        match path {
            Some(p) if !p.is_empty() => VideoSource::File(p),
            _ => VideoSource::Webcam,
        }
    }
}

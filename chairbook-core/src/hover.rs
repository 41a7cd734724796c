//! Pointer-to-time-slot snapping for the day columns.
//!
//! A pointer offset inside a column snaps down to the 15-minute grid and is
//! clamped to the visible hour range. Snapping is a pure function of its
//! input, so repeated pointer-move events never accumulate state.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar_math::minutes_to_label;

pub const SLOT_MINUTES: u32 = 15;
const SLOTS_PER_HOUR: u32 = 60 / SLOT_MINUTES;

/// Geometry of the visible time axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeAxis {
    pub zoom_pixels_per_hour: f64,
    pub start_hour: u32,
    pub end_hour: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoverPreview {
    pub snapped_top: f64,
    pub label: String,
    pub day: NaiveDate,
    pub staff_id: Option<String>,
}

impl TimeAxis {
    pub fn quarter_height(&self) -> f64 {
        self.zoom_pixels_per_hour / f64::from(SLOTS_PER_HOUR)
    }

    fn last_index(&self) -> u32 {
        (self.end_hour.saturating_sub(self.start_hour) + 1) * SLOTS_PER_HOUR - 1
    }

    /// Quarter-hour index under pointer offset `y`, clamped to the axis.
    pub fn slot_index(&self, y: f64) -> u32 {
        let quarter = self.quarter_height();
        if quarter.is_nan() || quarter <= 0.0 || !y.is_finite() {
            return 0;
        }
        let raw = (y / quarter).floor();
        if raw <= 0.0 {
            0
        } else {
            // Truncation is safe: the value is clamped to a u32 index below.
            raw.min(f64::from(self.last_index())) as u32
        }
    }

    pub fn snap(&self, y: f64, day: NaiveDate, staff_id: Option<&str>) -> HoverPreview {
        let index = self.slot_index(y);
        HoverPreview {
            snapped_top: f64::from(index) * self.quarter_height(),
            label: minutes_to_label(self.start_hour * 60 + index * SLOT_MINUTES),
            day,
            staff_id: staff_id.map(str::to_string),
        }
    }
}

/// Holds the single transient hover preview for the calendar body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HoverTracker {
    current: Option<HoverPreview>,
}

impl HoverTracker {
    pub fn pointer_move(
        &mut self,
        axis: &TimeAxis,
        y: f64,
        day: NaiveDate,
        staff_id: Option<&str>,
    ) -> &HoverPreview {
        self.current.insert(axis.snap(y, day, staff_id))
    }

    /// The pointer left the column: no highlight survives.
    pub fn pointer_leave(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&HoverPreview> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 4).unwrap()
    }

    fn axis(zoom: f64, start: u32, end: u32) -> TimeAxis {
        TimeAxis {
            zoom_pixels_per_hour: zoom,
            start_hour: start,
            end_hour: end,
        }
    }

    #[test]
    fn test_snap_top_of_column() {
        let preview = axis(100.0, 0, 23).snap(0.0, day(), None);
        assert_eq!(preview.label, "00:00");
        assert_eq!(preview.snapped_top, 0.0);
    }

    #[test]
    fn test_snap_second_quarter() {
        let preview = axis(100.0, 0, 23).snap(26.0, day(), Some("s1"));
        assert_eq!(preview.label, "00:15");
        assert_eq!(preview.snapped_top, 25.0);
        assert_eq!(preview.staff_id.as_deref(), Some("s1"));
    }

    #[test]
    fn test_snap_offsets_by_start_hour() {
        let preview = axis(80.0, 9, 17).snap(130.0, day(), None);
        // quarter = 20px, index 6 -> 90 minutes after 09:00
        assert_eq!(preview.label, "10:30");
        assert_eq!(preview.snapped_top, 120.0);
    }

    #[test]
    fn test_snap_clamps_to_visible_range() {
        let a = axis(100.0, 9, 17);
        assert_eq!(a.snap(-40.0, day(), None).label, "09:00");
        let last = a.snap(1.0e6, day(), None);
        assert_eq!(last.label, "17:45");
        assert_eq!(a.slot_index(f64::NAN), 0);
    }

    #[test]
    fn test_pointer_moves_are_idempotent_and_leave_clears() {
        let a = axis(100.0, 8, 20);
        let mut tracker = HoverTracker::default();
        let first = tracker.pointer_move(&a, 60.0, day(), None).clone();
        tracker.pointer_move(&a, 300.0, day(), None);
        let again = tracker.pointer_move(&a, 60.0, day(), None).clone();
        assert_eq!(first, again);

        tracker.pointer_leave();
        assert!(tracker.current().is_none());
    }
}

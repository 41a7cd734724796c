//! Two-click date range picker.
//!
//! The first click sets the start and clears the end; the second click sets
//! the end (swapping if it falls before the start). Clicks only edit the
//! draft. `apply` commits it, `cancel` restores the last committed range and
//! `clear` commits an empty range immediately.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::calendar_math::last_day_of_month;

/// An inclusive span of calendar days with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateSpan {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateSpan {
    /// Build a span, ordering the two bounds.
    pub fn new(a: NaiveDate, b: NaiveDate) -> Self {
        if b < a {
            DateSpan { start: b, end: a }
        } else {
            DateSpan { start: a, end: b }
        }
    }

    pub fn single(day: NaiveDate) -> Self {
        DateSpan {
            start: day,
            end: day,
        }
    }

    pub fn is_single_day(&self) -> bool {
        self.start == self.end
    }

    pub fn is_full_month(&self) -> bool {
        is_full_month_range(self.start, self.end)
    }
}

/// True when `start` is the 1st and `end` the last day of the same month.
pub fn is_full_month_range(start: NaiveDate, end: NaiveDate) -> bool {
    start.day() == 1
        && start.year() == end.year()
        && start.month() == end.month()
        && end == last_day_of_month(end)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PickerPhase {
    #[default]
    SelectingStart,
    SelectingEnd,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangePicker {
    committed: Option<DateSpan>,
    draft_start: Option<NaiveDate>,
    draft_end: Option<NaiveDate>,
    phase: PickerPhase,
    hover: Option<NaiveDate>,
}

impl RangePicker {
    pub fn new(committed: Option<DateSpan>) -> Self {
        RangePicker {
            committed,
            draft_start: committed.map(|r| r.start),
            draft_end: committed.map(|r| r.end),
            ..Default::default()
        }
    }

    pub fn committed(&self) -> Option<DateSpan> {
        self.committed
    }

    pub fn phase(&self) -> PickerPhase {
        self.phase
    }

    pub fn draft_start(&self) -> Option<NaiveDate> {
        self.draft_start
    }

    pub fn draft_end(&self) -> Option<NaiveDate> {
        self.draft_end
    }

    pub fn click(&mut self, day: NaiveDate) {
        match (self.phase, self.draft_start) {
            (PickerPhase::SelectingEnd, Some(start)) => {
                let span = DateSpan::new(start, day);
                self.draft_start = Some(span.start);
                self.draft_end = Some(span.end);
                self.phase = PickerPhase::SelectingStart;
            }
            _ => {
                self.draft_start = Some(day);
                self.draft_end = None;
                self.phase = PickerPhase::SelectingEnd;
            }
        }
        self.hover = None;
    }

    /// Record the hovered day. Only has a visible effect while picking the end.
    pub fn hover(&mut self, day: Option<NaiveDate>) {
        self.hover = day;
    }

    /// The range to highlight: the draft, or while picking the end, the start
    /// joined with the hovered day. Nothing is committed by previewing.
    pub fn preview(&self) -> Option<DateSpan> {
        let start = self.draft_start?;
        match (self.phase, self.hover, self.draft_end) {
            (PickerPhase::SelectingEnd, Some(hovered), _) => Some(DateSpan::new(start, hovered)),
            (_, _, Some(end)) => Some(DateSpan::new(start, end)),
            _ => Some(DateSpan::single(start)),
        }
    }

    /// Commit the draft. A start without an end commits a single day.
    /// Returns the committed range, or `None` if there is no draft at all.
    pub fn apply(&mut self) -> Option<DateSpan> {
        let start = self.draft_start?;
        let span = DateSpan::new(start, self.draft_end.unwrap_or(start));
        self.committed = Some(span);
        self.draft_end = Some(span.end);
        self.draft_start = Some(span.start);
        self.phase = PickerPhase::SelectingStart;
        self.hover = None;
        Some(span)
    }

    /// Drop the draft and go back to the last committed range.
    pub fn cancel(&mut self) {
        *self = RangePicker::new(self.committed);
    }

    /// Null both bounds and commit that immediately.
    pub fn clear(&mut self) {
        *self = RangePicker::new(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_is_full_month_range() {
        assert!(is_full_month_range(date(2025, 3, 1), date(2025, 3, 31)));
        assert!(!is_full_month_range(date(2025, 3, 1), date(2025, 3, 15)));
        assert!(is_full_month_range(date(2024, 2, 1), date(2024, 2, 29)));
        assert!(!is_full_month_range(date(2025, 3, 1), date(2025, 4, 30)));
        assert!(!is_full_month_range(date(2024, 3, 1), date(2025, 3, 31)));
    }

    #[test]
    fn test_second_click_before_first_swaps() {
        let mut picker = RangePicker::default();
        picker.click(date(2025, 3, 20));
        assert_eq!(picker.phase(), PickerPhase::SelectingEnd);
        picker.click(date(2025, 3, 10));
        assert_eq!(picker.phase(), PickerPhase::SelectingStart);

        let committed = picker.apply().unwrap();
        assert_eq!(committed, DateSpan::new(date(2025, 3, 10), date(2025, 3, 20)));
        assert_eq!(committed.start, date(2025, 3, 10));
        assert_eq!(picker.committed(), Some(committed));
    }

    #[test]
    fn test_first_click_clears_end() {
        let mut picker = RangePicker::new(Some(DateSpan::new(date(2025, 3, 1), date(2025, 3, 5))));
        picker.click(date(2025, 4, 2));
        assert_eq!(picker.draft_start(), Some(date(2025, 4, 2)));
        assert_eq!(picker.draft_end(), None);
    }

    #[test]
    fn test_hover_previews_without_committing() {
        let mut picker = RangePicker::default();
        picker.click(date(2025, 3, 10));
        picker.hover(Some(date(2025, 3, 4)));
        assert_eq!(
            picker.preview(),
            Some(DateSpan::new(date(2025, 3, 4), date(2025, 3, 10)))
        );
        assert_eq!(picker.draft_end(), None);
        assert_eq!(picker.committed(), None);
    }

    #[test]
    fn test_hover_ignored_when_selecting_start() {
        let mut picker = RangePicker::default();
        picker.click(date(2025, 3, 10));
        picker.click(date(2025, 3, 12));
        picker.hover(Some(date(2025, 3, 30)));
        assert_eq!(
            picker.preview(),
            Some(DateSpan::new(date(2025, 3, 10), date(2025, 3, 12)))
        );
    }

    #[test]
    fn test_cancel_restores_last_committed() {
        let original = DateSpan::new(date(2025, 3, 1), date(2025, 3, 5));
        let mut picker = RangePicker::new(Some(original));
        picker.click(date(2025, 5, 1));
        picker.click(date(2025, 5, 9));
        picker.cancel();
        assert_eq!(picker.committed(), Some(original));
        assert_eq!(picker.preview(), Some(original));
    }

    #[test]
    fn test_clear_commits_empty_range() {
        let mut picker = RangePicker::new(Some(DateSpan::single(date(2025, 3, 1))));
        picker.clear();
        assert_eq!(picker.committed(), None);
        assert_eq!(picker.preview(), None);
        picker.cancel();
        assert_eq!(picker.committed(), None);
    }

    #[test]
    fn test_apply_with_only_start_commits_single_day() {
        let mut picker = RangePicker::default();
        picker.click(date(2025, 3, 7));
        assert_eq!(picker.apply(), Some(DateSpan::single(date(2025, 3, 7))));
        assert!(RangePicker::default().apply().is_none());
    }
}

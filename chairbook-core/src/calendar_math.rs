//! Calendar date arithmetic: week/month grids, header labels and time slots.
//!
//! Weeks start on Sunday (weekday 0). Everything here works on local
//! calendar days (`NaiveDate`); there is no timezone handling.

use chrono::{Datelike, Days, Months, NaiveDate};

use crate::locale::Locale;
use crate::view_state::ViewMode;

/// Number of cells in a month grid: six full weeks.
pub const MONTH_GRID_DAYS: usize = 42;

/// The Sunday on or before `date`.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.weekday().num_days_from_sunday()))
}

/// Seven consecutive days starting at `start` (not necessarily a Sunday).
pub fn week_days(start: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take(7).collect()
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let first = first_of_month(date);
    first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}

/// Shift by whole calendar months, clamping the day to the target month's length
/// (Jan 31 + 1 month = Feb 28/29).
pub fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    let shifted = if months >= 0 {
        date.checked_add_months(Months::new(months.unsigned_abs()))
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))
    };
    shifted.unwrap_or(date)
}

pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    let shifted = if days >= 0 {
        date.checked_add_days(Days::new(days.unsigned_abs()))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    };
    shifted.unwrap_or(date)
}

/// 42 consecutive days starting at the Sunday on or before the first of
/// `date`'s month. Always six full weeks, spilling into adjacent months.
pub fn month_matrix(date: NaiveDate) -> Vec<NaiveDate> {
    start_of_week(first_of_month(date))
        .iter_days()
        .take(MONTH_GRID_DAYS)
        .collect()
}

/// Title shown above the calendar for the current view.
///
/// - day: `"5 Mar 2025"`
/// - month: `"March 2025"`
/// - week: `"2-8 Mar 2025"`, or `"30 Mar 2025 – 5 Apr 2025"` across a month/year boundary
///
/// `week_start` overrides the Sunday-aligned start of the anchor's week.
pub fn header_label(
    view: ViewMode,
    anchor: NaiveDate,
    week_start: Option<NaiveDate>,
    locale: Locale,
) -> String {
    match view {
        ViewMode::Day => day_label(anchor, locale),
        ViewMode::Month => format!("{} {}", locale.month_name(anchor.month()), anchor.year()),
        ViewMode::Week => {
            let start = week_start.unwrap_or_else(|| start_of_week(anchor));
            let end = add_days(start, 6);
            if start.year() == end.year() && start.month() == end.month() {
                format!(
                    "{}-{} {} {}",
                    start.day(),
                    end.day(),
                    locale.short_month_name(end.month()),
                    end.year()
                )
            } else {
                format!("{} – {}", day_label(start, locale), day_label(end, locale))
            }
        }
    }
}

fn day_label(date: NaiveDate, locale: Locale) -> String {
    format!(
        "{} {} {}",
        date.day(),
        locale.short_month_name(date.month()),
        date.year()
    )
}

/// Zero-padded `"HH:MM"` for a minute offset from midnight.
/// Out-of-range input is not clamped (1500 -> "25:00").
pub fn minutes_to_label(total_minutes: u32) -> String {
    format!("{:02}:{:02}", total_minutes / 60, total_minutes % 60)
}

/// Restartable sequence of `"HH:MM-HH:MM"` slots covering
/// `[start_hour * 60, end_hour * 60)` in steps of `interval_minutes`.
///
/// Cloning the value restarts the sequence from the beginning. Bounds that
/// overflow `u32` minutes yield an empty sequence, and the sequence stops at
/// the first slot whose end would overflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSlots {
    next: u32,
    end: u32,
    interval: u32,
}

pub fn time_slots(start_hour: u32, end_hour: u32, interval_minutes: u32) -> TimeSlots {
    match (start_hour.checked_mul(60), end_hour.checked_mul(60)) {
        (Some(next), Some(end)) => TimeSlots {
            next,
            end,
            interval: interval_minutes,
        },
        _ => TimeSlots {
            next: 0,
            end: 0,
            interval: interval_minutes,
        },
    }
}

impl Iterator for TimeSlots {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        // A zero interval would never advance.
        if self.interval == 0 || self.next >= self.end {
            return None;
        }
        let start = self.next;
        let Some(end) = start.checked_add(self.interval) else {
            self.next = self.end;
            return None;
        };
        self.next = end;
        Some(format!("{}-{}", minutes_to_label(start), minutes_to_label(end)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.interval == 0 || self.next >= self.end {
            return (0, Some(0));
        }
        let mut remaining = (self.end - self.next).div_ceil(self.interval);
        let last_end = u64::from(self.next) + u64::from(remaining) * u64::from(self.interval);
        if last_end > u64::from(u32::MAX) {
            remaining -= 1;
        }
        (remaining as usize, Some(remaining as usize))
    }
}

impl ExactSizeIterator for TimeSlots {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_start_of_week_is_sunday_and_contains_date() {
        let mut d = date(2024, 12, 20);
        for _ in 0..400 {
            let sow = start_of_week(d);
            assert_eq!(sow.weekday(), Weekday::Sun);
            assert!(sow <= d);
            assert!(d <= add_days(sow, 6));
            d = d.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_month_matrix_is_six_weeks_from_sunday() {
        for month in 1..=12 {
            let matrix = month_matrix(date(2025, month, 17));
            assert_eq!(matrix.len(), 42);
            assert_eq!(matrix[0].weekday(), Weekday::Sun);
            assert!(matrix.contains(&date(2025, month, 1)));
            assert!(matrix.windows(2).all(|w| w[1] == w[0].succ_opt().unwrap()));
        }
    }

    #[test]
    fn test_month_matrix_when_month_starts_on_sunday() {
        // June 2025 starts on a Sunday, so the grid starts on the 1st itself.
        let matrix = month_matrix(date(2025, 6, 30));
        assert_eq!(matrix[0], date(2025, 6, 1));
        assert_eq!(matrix[41], date(2025, 7, 12));
    }

    #[test]
    fn test_header_labels() {
        let anchor = date(2025, 3, 5);
        assert_eq!(header_label(ViewMode::Day, anchor, None, Locale::En), "5 Mar 2025");
        assert_eq!(header_label(ViewMode::Month, anchor, None, Locale::En), "March 2025");
        assert_eq!(header_label(ViewMode::Week, anchor, None, Locale::En), "2-8 Mar 2025");
        assert_eq!(
            header_label(ViewMode::Week, date(2025, 4, 1), None, Locale::En),
            "30 Mar 2025 – 5 Apr 2025"
        );
        assert_eq!(
            header_label(ViewMode::Week, date(2025, 12, 31), None, Locale::En),
            "28 Dec 2025 – 3 Jan 2026"
        );
    }

    #[test]
    fn test_header_label_uses_custom_week_start() {
        let label = header_label(
            ViewMode::Week,
            date(2025, 3, 12),
            Some(date(2025, 3, 12)),
            Locale::En,
        );
        assert_eq!(label, "12-18 Mar 2025");
    }

    #[test]
    fn test_header_label_locale_only_changes_names() {
        let anchor = date(2025, 3, 5);
        assert_eq!(header_label(ViewMode::Month, anchor, None, Locale::De), "März 2025");
        assert_eq!(header_label(ViewMode::Day, anchor, None, Locale::Fr), "5 mars 2025");
    }

    #[test]
    fn test_minutes_to_label() {
        assert_eq!(minutes_to_label(0), "00:00");
        assert_eq!(minutes_to_label(615), "10:15");
        assert_eq!(minutes_to_label(1500), "25:00");
    }

    #[test]
    fn test_time_slots_ten_to_twenty_half_hourly() {
        let slots: Vec<String> = time_slots(10, 20, 30).collect();
        assert_eq!(slots.len(), 20);
        assert_eq!(slots.first().unwrap(), "10:00-10:30");
        assert_eq!(slots.last().unwrap(), "19:30-20:00");
    }

    #[test]
    fn test_time_slots_are_restartable() {
        let slots = time_slots(9, 10, 15);
        assert_eq!(slots.len(), 4);
        let first: Vec<String> = slots.clone().collect();
        let second: Vec<String> = slots.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_time_slots_zero_interval_is_empty() {
        assert_eq!(time_slots(9, 17, 0).count(), 0);
    }

    #[test]
    fn test_time_slots_huge_interval_stops_instead_of_overflowing() {
        let slots = time_slots(8, 20, u32::MAX);
        assert_eq!(slots.len(), 0);
        assert_eq!(slots.collect::<Vec<_>>(), Vec::<String>::new());
    }

    #[test]
    fn test_time_slots_out_of_range_hours_are_empty() {
        assert_eq!(time_slots(80_000_000, 80_000_001, 30).count(), 0);
        assert_eq!(time_slots(0, u32::MAX, 30).len(), 0);
    }

    #[test]
    fn test_time_slots_stop_before_slot_end_overflows() {
        // 71_582_787h and 71_582_788h are the last whole hours below u32::MAX minutes.
        let slots = time_slots(71_582_787, 71_582_788, 50);
        assert_eq!(slots.len(), 1);
        assert_eq!(slots.count(), 1);
    }

    #[test]
    fn test_add_months_clamps_day() {
        assert_eq!(add_months(date(2025, 1, 31), 1), date(2025, 2, 28));
        assert_eq!(add_months(date(2025, 3, 31), -1), date(2025, 2, 28));
        assert_eq!(last_day_of_month(date(2024, 2, 10)), date(2024, 2, 29));
    }
}

//! Appointment events shown on the calendar.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{ChairbookError, ChairbookResult};

/// A booked appointment.
///
/// `start < end` holds for every constructed event, and the day an event
/// sits on cannot be changed after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawCalendarEvent")]
pub struct CalendarEvent {
    pub id: String,
    date: NaiveDate,
    pub title: String,
    pub client_name: String,
    pub staff_id: String,
    #[serde(with = "hhmm")]
    start: NaiveTime,
    #[serde(with = "hhmm")]
    end: NaiveTime,
    pub color: String,
}

impl CalendarEvent {
    pub fn new(
        id: impl Into<String>,
        date: NaiveDate,
        window: TimeWindow,
        title: impl Into<String>,
        client_name: impl Into<String>,
        staff_id: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        CalendarEvent {
            id: id.into(),
            date,
            title: title.into(),
            client_name: client_name.into(),
            staff_id: staff_id.into(),
            start: window.start(),
            end: window.end(),
            color: color.into(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    pub fn window(&self) -> TimeWindow {
        TimeWindow {
            start: self.start,
            end: self.end,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCalendarEvent {
    id: String,
    date: NaiveDate,
    title: String,
    client_name: String,
    staff_id: String,
    #[serde(with = "hhmm")]
    start: NaiveTime,
    #[serde(with = "hhmm")]
    end: NaiveTime,
    #[serde(default)]
    color: String,
}

impl TryFrom<RawCalendarEvent> for CalendarEvent {
    type Error = ChairbookError;

    fn try_from(raw: RawCalendarEvent) -> Result<Self, Self::Error> {
        let window = TimeWindow::new(raw.start, raw.end)?;
        Ok(CalendarEvent::new(
            raw.id,
            raw.date,
            window,
            raw.title,
            raw.client_name,
            raw.staff_id,
            raw.color,
        ))
    }
}

/// A same-day time range with `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeWindow {
    start: NaiveTime,
    end: NaiveTime,
}

impl TimeWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> ChairbookResult<Self> {
        if start >= end {
            return Err(ChairbookError::InvalidTimeWindow {
                start: start.format(hhmm::FORMAT).to_string(),
                end: end.format(hhmm::FORMAT).to_string(),
            });
        }
        Ok(TimeWindow { start, end })
    }

    /// Build from two `"HH:MM"` strings.
    pub fn from_labels(start: &str, end: &str) -> ChairbookResult<Self> {
        TimeWindow::new(parse_hhmm(start)?, parse_hhmm(end)?)
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }
}

/// Parses `"HH:MM-HH:MM"`.
impl FromStr for TimeWindow {
    type Err = ChairbookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .split_once('-')
            .ok_or_else(|| ChairbookError::Parse(format!("expected HH:MM-HH:MM, got '{s}'")))?;
        TimeWindow::from_labels(start.trim(), end.trim())
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            self.start.format(hhmm::FORMAT),
            self.end.format(hhmm::FORMAT)
        )
    }
}

pub fn parse_hhmm(s: &str) -> ChairbookResult<NaiveTime> {
    NaiveTime::parse_from_str(s, hhmm::FORMAT)
        .map_err(|_| ChairbookError::Parse(format!("invalid time '{s}', expected HH:MM")))
}

/// Serde adapter for `"HH:MM"` times of day.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_window_parses_slot_label() {
        let window: TimeWindow = "14:00-14:30".parse().unwrap();
        assert_eq!(window.to_string(), "14:00-14:30");
        assert_eq!(window.start(), NaiveTime::from_hms_opt(14, 0, 0).unwrap());
        assert_eq!(window.end(), NaiveTime::from_hms_opt(14, 30, 0).unwrap());
    }

    #[test]
    fn test_time_window_rejects_inverted_range() {
        let err = "15:00-14:00".parse::<TimeWindow>().unwrap_err();
        assert!(matches!(err, ChairbookError::InvalidTimeWindow { .. }));
        assert!("15:00-15:00".parse::<TimeWindow>().is_err());
        assert!("any".parse::<TimeWindow>().is_err());
    }

    #[test]
    fn test_event_json_uses_hhmm_times() {
        let event = CalendarEvent::new(
            "e1",
            NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(),
            "09:00-09:45".parse().unwrap(),
            "Haircut",
            "Ada",
            "s1",
            "#ff0000",
        );
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["start"], "09:00");
        assert_eq!(json["end"], "09:45");
        assert_eq!(json["clientName"], "Ada");
        assert_eq!(json["date"], "2025-03-04");
    }

    #[test]
    fn test_event_deserialize_enforces_start_before_end() {
        let json = r#"{"id":"e1","date":"2025-03-04","title":"Cut","clientName":"Ada",
            "staffId":"s1","start":"11:00","end":"10:00","color":""}"#;
        assert!(serde_json::from_str::<CalendarEvent>(json).is_err());
    }
}

//! View state controller: day/week/month mode, anchor date and navigation.
//!
//! Transitions are pure: `ViewState::apply` consumes the state and an action
//! and returns the next state.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar_math::{
    add_days, add_months, first_of_month, month_matrix, start_of_week, week_days,
};
use crate::error::ChairbookError;
use crate::range_picker::DateSpan;
use crate::staff_filter::StaffSelection;

pub const MIN_ZOOM: u32 = 40;
pub const MAX_ZOOM: u32 = 240;
pub const ZOOM_STEP: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Day,
    Week,
    Month,
}

impl FromStr for ViewMode {
    type Err = ChairbookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "day" => Ok(ViewMode::Day),
            "week" => Ok(ViewMode::Week),
            "month" => Ok(ViewMode::Month),
            _ => Err(ChairbookError::Parse(format!(
                "unknown view '{s}', expected day, week or month"
            ))),
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::Day => write!(f, "day"),
            ViewMode::Week => write!(f, "week"),
            ViewMode::Month => write!(f, "month"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub view_mode: ViewMode,
    pub anchor_date: NaiveDate,
    /// Week start set by a range selection. Not necessarily a Sunday.
    pub custom_week_start: Option<NaiveDate>,
    pub staff_selection: StaffSelection,
    pub location: Option<String>,
    pub zoom_pixels_per_hour: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ViewAction {
    Next,
    Prev,
    Today { today: NaiveDate },
    /// The day/week/month toggle.
    SetMode { mode: ViewMode },
    CommitRange { range: DateSpan },
    /// Jump to the day view of `date`.
    ShowDay { date: NaiveDate },
    ZoomIn,
    ZoomOut,
    SetLocation { location: Option<String> },
    SetStaffSelection { selection: StaffSelection },
}

impl ViewState {
    pub fn new(today: NaiveDate, zoom_pixels_per_hour: u32) -> Self {
        ViewState {
            view_mode: ViewMode::Day,
            anchor_date: today,
            custom_week_start: None,
            staff_selection: StaffSelection::AllBusiness,
            location: None,
            zoom_pixels_per_hour: zoom_pixels_per_hour.clamp(MIN_ZOOM, MAX_ZOOM),
        }
    }

    pub fn apply(self, action: ViewAction) -> ViewState {
        match action {
            ViewAction::Next => self.step(1),
            ViewAction::Prev => self.step(-1),
            ViewAction::Today { today } => ViewState {
                view_mode: ViewMode::Day,
                anchor_date: today,
                custom_week_start: None,
                ..self
            },
            ViewAction::SetMode { mode } => ViewState {
                view_mode: mode,
                custom_week_start: None,
                ..self
            },
            ViewAction::CommitRange { range } => self.commit_range(range),
            ViewAction::ShowDay { date } => ViewState {
                view_mode: ViewMode::Day,
                anchor_date: date,
                custom_week_start: None,
                ..self
            },
            ViewAction::ZoomIn => ViewState {
                zoom_pixels_per_hour: (self.zoom_pixels_per_hour + ZOOM_STEP).min(MAX_ZOOM),
                ..self
            },
            ViewAction::ZoomOut => ViewState {
                zoom_pixels_per_hour: self
                    .zoom_pixels_per_hour
                    .saturating_sub(ZOOM_STEP)
                    .max(MIN_ZOOM),
                ..self
            },
            ViewAction::SetLocation { location } => ViewState { location, ..self },
            ViewAction::SetStaffSelection { selection } => ViewState {
                staff_selection: selection,
                ..self
            },
        }
    }

    fn step(self, direction: i32) -> ViewState {
        match self.view_mode {
            ViewMode::Day => ViewState {
                anchor_date: add_days(self.anchor_date, i64::from(direction)),
                ..self
            },
            ViewMode::Week => {
                let days = i64::from(direction) * 7;
                ViewState {
                    anchor_date: add_days(self.anchor_date, days),
                    custom_week_start: self.custom_week_start.map(|d| add_days(d, days)),
                    ..self
                }
            }
            ViewMode::Month => ViewState {
                anchor_date: add_months(self.anchor_date, direction),
                ..self
            },
        }
    }

    /// Pick a view from the shape of a committed range: a full calendar month
    /// shows that month, a single day shows that day, anything else shows a
    /// week starting at the range start.
    fn commit_range(self, range: DateSpan) -> ViewState {
        if range.is_full_month() {
            ViewState {
                view_mode: ViewMode::Month,
                anchor_date: first_of_month(range.start),
                custom_week_start: None,
                ..self
            }
        } else if range.is_single_day() {
            ViewState {
                view_mode: ViewMode::Day,
                anchor_date: range.start,
                custom_week_start: None,
                ..self
            }
        } else {
            ViewState {
                view_mode: ViewMode::Week,
                anchor_date: range.start,
                custom_week_start: Some(range.start),
                ..self
            }
        }
    }

    /// The custom week start if set, else the Sunday of the anchor's week.
    pub fn effective_week_start(&self) -> NaiveDate {
        self.custom_week_start
            .unwrap_or_else(|| start_of_week(self.anchor_date))
    }

    /// Days the current view renders.
    pub fn visible_days(&self) -> Vec<NaiveDate> {
        match self.view_mode {
            ViewMode::Day => vec![self.anchor_date],
            ViewMode::Week => week_days(self.effective_week_start()),
            ViewMode::Month => month_matrix(self.anchor_date),
        }
    }
}

//! Core engine for the chairbook admin calendar.
//!
//! This crate holds the logic underneath the booking UI:
//! - `calendar_math` for week/month grids, header labels and time slots
//! - `view_state` and `range_picker` for day/week/month navigation
//! - `hover` for snapping the pointer to the 15-minute grid
//! - `staff_filter` and `waitlist` for what the calendar and waitlist show
//! - `booking` for the client -> date -> time -> service wizard
//! - `scheduler`, the single owner that applies every command

pub mod booking;
pub mod calendar_math;
pub mod clock;
pub mod config;
pub mod error;
pub mod event;
pub mod hover;
pub mod locale;
pub mod range_picker;
pub mod roster;
pub mod scheduler;
pub mod staff_filter;
pub mod view_state;
pub mod waitlist;

pub use error::{ChairbookError, ChairbookResult};
pub use scheduler::{Command, Scheduler, Transition};

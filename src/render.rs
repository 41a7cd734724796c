//! Terminal rendering for chairbook types.
//!
//! Extension traits that add colored output to chairbook-core types using
//! owo_colors.

use chairbook_core::event::CalendarEvent;
use chairbook_core::hover::HoverPreview;
use chairbook_core::staff_filter::StaffView;
use chairbook_core::waitlist::{WaitlistEntry, WaitlistStatus};
use chrono::{Datelike, NaiveDate};
use owo_colors::OwoColorize;

pub trait Render {
    fn render(&self) -> String;
}

impl Render for CalendarEvent {
    fn render(&self) -> String {
        let tag = format!("[{}]", self.staff_id);
        format!(
            "  {} {} {} {}",
            self.window().to_string().cyan(),
            self.title,
            self.client_name.dimmed(),
            tag.dimmed()
        )
    }
}

impl Render for WaitlistEntry {
    fn render(&self) -> String {
        let status = match self.status {
            WaitlistStatus::Upcoming => self.status.to_string().green().to_string(),
            WaitlistStatus::Expired => self.status.to_string().red().to_string(),
            WaitlistStatus::Booked => self.status.to_string().blue().to_string(),
        };
        let price = self
            .price_cents
            .map(|c| format!("{}.{:02}", c / 100, c % 100))
            .unwrap_or_default();
        format!(
            "  {} {} {} {} {}",
            self.requested_date.format("%a %b %-d"),
            self.client_name.bold(),
            self.note,
            price.dimmed(),
            status
        )
    }
}

impl Render for HoverPreview {
    fn render(&self) -> String {
        let column = self.staff_id.as_deref().unwrap_or("all staff");
        format!(
            "{} {} (top {:.1}px, {})",
            self.label.bold(),
            self.day.format("%a %b %-d"),
            self.snapped_top,
            column.dimmed()
        )
    }
}

/// One line describing who the calendar shows.
pub fn render_staff_line(view: &StaffView, names: &[&str]) -> String {
    match view {
        StaffView::NoStaffConfigured => "No staff configured".dimmed().to_string(),
        StaffView::Visible(ids) if ids.is_empty() => "No staff selected".dimmed().to_string(),
        StaffView::Visible(_) => format!("Staff: {}", names.join(", ")),
    }
}

/// A six-week grid. Days outside `anchor`'s month are dimmed, days with
/// appointments get a dot, today is highlighted.
pub fn render_month_grid(
    days: &[NaiveDate],
    anchor: NaiveDate,
    today: NaiveDate,
    events: &[&CalendarEvent],
) -> String {
    let mut lines = vec![" Su  Mo  Tu  We  Th  Fr  Sa".dimmed().to_string()];

    for week in days.chunks(7) {
        let cells: Vec<String> = week
            .iter()
            .map(|day| {
                let marker = if events.iter().any(|e| e.date() == *day) { "•" } else { " " };
                let cell = format!("{:>3}{}", day.day(), marker);
                if *day == today {
                    cell.reversed().to_string()
                } else if day.month() != anchor.month() {
                    cell.dimmed().to_string()
                } else {
                    cell
                }
            })
            .collect();
        lines.push(cells.join(""));
    }

    lines.join("\n")
}

/// Each day with its appointments underneath.
pub fn render_day_list(days: &[NaiveDate], events: &[&CalendarEvent]) -> String {
    let mut lines = Vec::new();

    for day in days {
        lines.push(day.format("%a %b %-d").to_string().bold().to_string());
        let todays: Vec<&&CalendarEvent> = events.iter().filter(|e| e.date() == *day).collect();
        if todays.is_empty() {
            lines.push(format!("  {}", "No appointments".dimmed()));
        }
        for event in todays {
            lines.push(event.render());
        }
    }

    lines.join("\n")
}

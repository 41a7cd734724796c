use anyhow::Result;
use chairbook_core::scheduler::{Command, Scheduler};
use chairbook_core::view_state::ViewMode;
use chrono::NaiveDate;
use owo_colors::OwoColorize;

use crate::render::{render_day_list, render_month_grid, render_staff_line};

pub fn run(
    scheduler: &mut Scheduler,
    mode: Option<ViewMode>,
    date: Option<NaiveDate>,
) -> Result<()> {
    // A single-day range lands on that day's view.
    if let Some(date) = date {
        scheduler.dispatch(Command::RangeClick { date });
        scheduler.dispatch(Command::RangeApply);
    }
    if let Some(mode) = mode {
        scheduler.dispatch(Command::SetView { mode });
    }

    let view = scheduler.view();
    let days = scheduler.visible_days();
    let events = scheduler.visible_events();

    println!("{}", scheduler.header_label().bold());

    let staff = scheduler.visible_staff();
    let names: Vec<&str> = staff.iter().map(|s| s.name.as_str()).collect();
    println!("{}", render_staff_line(&scheduler.staff_view(), &names));
    println!();

    match view.view_mode {
        ViewMode::Month => println!(
            "{}",
            render_month_grid(&days, view.anchor_date, scheduler.today(), &events)
        ),
        ViewMode::Day | ViewMode::Week => println!("{}", render_day_list(&days, &events)),
    }

    Ok(())
}

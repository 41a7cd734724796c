use anyhow::Result;
use chairbook_core::scheduler::{Command, Scheduler};
use chairbook_core::waitlist::{DateBucket, SortKey, WaitlistStatus};
use owo_colors::OwoColorize;

use crate::render::Render;

pub fn run(
    scheduler: &mut Scheduler,
    status: Option<WaitlistStatus>,
    bucket: Option<DateBucket>,
    sort: Option<SortKey>,
) -> Result<()> {
    scheduler.dispatch(Command::OpenWaitlist);
    if let Some(status) = status {
        scheduler.dispatch(Command::SetWaitlistTab { status });
    }
    if let Some(bucket) = bucket {
        scheduler.dispatch(Command::SetWaitlistBucket { bucket });
    }
    if let Some(sort) = sort {
        scheduler.dispatch(Command::SetWaitlistSort { sort });
    }

    let entries = scheduler.visible_waitlist();
    if entries.is_empty() {
        println!("{}", "No waitlist entries".dimmed());
        return Ok(());
    }

    for entry in entries {
        println!("{}", entry.render());
    }

    Ok(())
}

use anyhow::Result;
use chairbook_core::calendar_math::time_slots;
use owo_colors::OwoColorize;

pub fn run(start_hour: u32, end_hour: u32, interval_minutes: u32) -> Result<()> {
    if interval_minutes == 0 {
        anyhow::bail!("Slot interval must be greater than zero");
    }

    let slots = time_slots(start_hour, end_hour, interval_minutes);
    if slots.len() == 0 {
        println!("{}", "No slots in this range".dimmed());
        return Ok(());
    }

    for slot in slots {
        println!("{slot}");
    }

    Ok(())
}

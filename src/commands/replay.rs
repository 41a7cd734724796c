use std::path::Path;

use anyhow::{Context, Result};
use chairbook_core::scheduler::{Command, Scheduler};
use serde_json::json;

pub fn run(scheduler: &mut Scheduler, script: &Path) -> Result<()> {
    let content = std::fs::read_to_string(script)
        .with_context(|| format!("Could not read {}", script.display()))?;
    let commands: Vec<Command> = serde_json::from_str(&content)
        .with_context(|| format!("Could not parse commands in {}", script.display()))?;

    let transitions = scheduler.replay(commands);

    let output = json!({
        "transitions": transitions,
        "snapshot": scheduler.snapshot(),
        "events": scheduler.events(),
        "waitlist": scheduler.waitlist().entries(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

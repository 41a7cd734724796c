//! Staff, clients and the service catalog, plus the seed file that loads them.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ChairbookError, ChairbookResult};
use crate::event::CalendarEvent;
use crate::waitlist::WaitlistEntry;

/// Placeholder used when a name yields no initials.
pub const INITIALS_PLACEHOLDER: &str = "?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StaffStatus {
    Available,
    Busy,
    Offline,
    // Kept separate from Offline: some screens treat the two alike, others don't.
    NotWorking,
}

impl StaffStatus {
    /// Whether the member counts as part of today's scheduled team.
    pub fn is_scheduled(self) -> bool {
        !matches!(self, StaffStatus::Offline | StaffStatus::NotWorking)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffMember {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub initials: String,
    #[serde(default)]
    pub role: String,
    pub status: StaffStatus,
    #[serde(default)]
    pub bookings_today: u32,
    /// Location the member works at. `None` works everywhere.
    #[serde(default)]
    pub location_id: Option<String>,
}

impl StaffMember {
    pub fn works_at(&self, location: Option<&str>) -> bool {
        match (location, self.location_id.as_deref()) {
            (Some(wanted), Some(actual)) => wanted == actual,
            _ => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub initials: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub name: String,
    pub duration_minutes: u32,
    pub price_cents: u32,
    #[serde(default)]
    pub color: String,
}

/// Uppercase first letters of up to two whitespace-separated name tokens.
pub fn initials_for(name: &str) -> String {
    let initials: String = name
        .split_whitespace()
        .take(2)
        .filter_map(|token| token.chars().next())
        .flat_map(char::to_uppercase)
        .collect();

    if initials.is_empty() {
        INITIALS_PLACEHOLDER.to_string()
    } else {
        initials
    }
}

/// Everything the scheduler starts with, as stored in a seed TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub staff: Vec<StaffMember>,
    #[serde(default)]
    pub services: Vec<Service>,
    #[serde(default)]
    pub clients: Vec<Client>,
    #[serde(default)]
    pub events: Vec<CalendarEvent>,
    #[serde(default)]
    pub waitlist: Vec<WaitlistEntry>,
}

impl Seed {
    pub fn load(path: &Path) -> ChairbookResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut seed: Seed = toml::from_str(&content)
            .map_err(|e| ChairbookError::Serialization(format!("{}: {e}", path.display())))?;

        for member in &mut seed.staff {
            if member.initials.is_empty() {
                member.initials = initials_for(&member.name);
            }
        }

        tracing::debug!(
            path = %path.display(),
            staff = seed.staff.len(),
            events = seed.events.len(),
            waitlist = seed.waitlist.len(),
            "seed loaded"
        );
        Ok(seed)
    }
}

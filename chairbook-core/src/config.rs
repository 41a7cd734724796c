//! Engine configuration at ~/.config/chairbook/config.toml

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{ChairbookError, ChairbookResult};
use crate::event::TimeWindow;
use crate::locale::Locale;

const DEFAULT_DAY_START_HOUR: u32 = 8;
const DEFAULT_DAY_END_HOUR: u32 = 20;
const DEFAULT_SLOT_INTERVAL: u32 = 30;
const DEFAULT_ZOOM: u32 = 100;
static DEFAULT_WALK_IN_NAME: &str = "Walk-in";
// "Any time" bookings land in this window. Not derived from the service duration.
static DEFAULT_ANY_TIME_START: &str = "10:00";
static DEFAULT_ANY_TIME_END: &str = "11:00";

fn default_locale() -> String {
    Locale::default().to_string()
}

fn default_day_start_hour() -> u32 {
    DEFAULT_DAY_START_HOUR
}

fn default_day_end_hour() -> u32 {
    DEFAULT_DAY_END_HOUR
}

fn default_slot_interval() -> u32 {
    DEFAULT_SLOT_INTERVAL
}

fn default_zoom() -> u32 {
    DEFAULT_ZOOM
}

fn default_walk_in_name() -> String {
    DEFAULT_WALK_IN_NAME.to_string()
}

fn default_any_time_start() -> String {
    DEFAULT_ANY_TIME_START.to_string()
}

fn default_any_time_end() -> String {
    DEFAULT_ANY_TIME_END.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChairbookConfig {
    #[serde(default = "default_locale")]
    pub locale: String,

    #[serde(default = "default_day_start_hour")]
    pub day_start_hour: u32,

    #[serde(default = "default_day_end_hour")]
    pub day_end_hour: u32,

    #[serde(default = "default_slot_interval")]
    pub slot_interval_minutes: u32,

    #[serde(default = "default_zoom")]
    pub zoom_pixels_per_hour: u32,

    #[serde(default = "default_walk_in_name")]
    pub walk_in_name: String,

    /// Staff member new calendar bookings are assigned to.
    /// Falls back to the first member on the roster.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_staff_id: Option<String>,

    #[serde(default = "default_any_time_start")]
    pub any_time_start: String,

    #[serde(default = "default_any_time_end")]
    pub any_time_end: String,

    /// Location shown on startup. `None` shows every location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Seed roster (staff, services, clients, events, waitlist) in TOML.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed_path: Option<PathBuf>,
}

impl Default for ChairbookConfig {
    fn default() -> Self {
        ChairbookConfig {
            locale: default_locale(),
            day_start_hour: DEFAULT_DAY_START_HOUR,
            day_end_hour: DEFAULT_DAY_END_HOUR,
            slot_interval_minutes: DEFAULT_SLOT_INTERVAL,
            zoom_pixels_per_hour: DEFAULT_ZOOM,
            walk_in_name: default_walk_in_name(),
            default_staff_id: None,
            any_time_start: default_any_time_start(),
            any_time_end: default_any_time_end(),
            location: None,
            seed_path: None,
        }
    }
}

impl ChairbookConfig {
    pub fn config_path() -> ChairbookResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ChairbookError::Config("Could not determine config directory".into()))?
            .join("chairbook");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default config path, creating a commented-out file first
    /// if there is none. `CHAIRBOOK_*` environment variables override the file.
    pub fn load() -> ChairbookResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> ChairbookResult<Self> {
        let config: ChairbookConfig = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("CHAIRBOOK"))
            .build()
            .map_err(|e| ChairbookError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| ChairbookError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ChairbookResult<()> {
        if self.day_start_hour >= self.day_end_hour || self.day_end_hour > 24 {
            return Err(ChairbookError::Config(format!(
                "day hours must satisfy start < end <= 24 (got {}..{})",
                self.day_start_hour, self.day_end_hour
            )));
        }
        if self.slot_interval_minutes == 0 {
            return Err(ChairbookError::Config(
                "slot_interval_minutes must be greater than zero".into(),
            ));
        }
        if self.zoom_pixels_per_hour == 0 {
            return Err(ChairbookError::Config(
                "zoom_pixels_per_hour must be greater than zero".into(),
            ));
        }
        self.any_time_window()?;
        Ok(())
    }

    pub fn locale(&self) -> Locale {
        Locale::from_token(&self.locale)
    }

    pub fn any_time_window(&self) -> ChairbookResult<TimeWindow> {
        TimeWindow::from_labels(&self.any_time_start, &self.any_time_end)
    }

    /// The seed path with `~` expanded.
    pub fn seed_path(&self) -> Option<PathBuf> {
        self.seed_path.as_ref().map(|p| {
            PathBuf::from(shellexpand::tilde(&p.to_string_lossy()).into_owned())
        })
    }

    /// Write a config file with every option commented out.
    pub fn create_default_config(path: &Path) -> ChairbookResult<()> {
        let contents = format!(
            "\
# chairbook configuration

# Locale for calendar labels (en, de, fr, es):
# locale = \"en\"

# Visible hours of the day view:
# day_start_hour = {DEFAULT_DAY_START_HOUR}
# day_end_hour = {DEFAULT_DAY_END_HOUR}

# Length of bookable time slots, in minutes:
# slot_interval_minutes = {DEFAULT_SLOT_INTERVAL}

# Vertical scale of the calendar body:
# zoom_pixels_per_hour = {DEFAULT_ZOOM}

# Client name used for walk-in bookings:
# walk_in_name = \"{DEFAULT_WALK_IN_NAME}\"

# Staff member new calendar bookings are assigned to:
# default_staff_id = \"1\"

# Window used for \"any time\" bookings:
# any_time_start = \"{DEFAULT_ANY_TIME_START}\"
# any_time_end = \"{DEFAULT_ANY_TIME_END}\"

# Location shown on startup:
# location = \"main\"

# Staff, services, clients, events and waitlist to start from:
# seed_path = \"~/.config/chairbook/seed.toml\"
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ChairbookError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| ChairbookError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

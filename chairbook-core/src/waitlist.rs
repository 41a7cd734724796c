//! Waitlist entries and the tab / date-bucket / sort engine over them.

use std::cmp::{Ordering, Reverse};
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::ChairbookError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WaitlistStatus {
    #[default]
    Upcoming,
    Expired,
    Booked,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitlistEntry {
    pub id: String,
    pub client_name: String,
    pub requested_date: NaiveDate,
    #[serde(default)]
    pub status: WaitlistStatus,
    #[serde(default)]
    pub note: String,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub price_cents: Option<u32>,
    #[serde(default)]
    pub service_id: Option<String>,
}

impl WaitlistEntry {
    /// A fresh upcoming entry with a random id.
    pub fn upcoming(
        client_name: impl Into<String>,
        requested_date: NaiveDate,
        note: impl Into<String>,
        created_at: NaiveDateTime,
    ) -> Self {
        WaitlistEntry {
            id: uuid::Uuid::new_v4().to_string(),
            client_name: client_name.into(),
            requested_date,
            status: WaitlistStatus::Upcoming,
            note: note.into(),
            created_at,
            price_cents: None,
            service_id: None,
        }
    }
}

/// Relative-date window over requested dates, measured from today's midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DateBucket {
    #[serde(rename = "today")]
    Today,
    #[serde(rename = "3days")]
    ThreeDays,
    #[serde(rename = "7days")]
    SevenDays,
    #[serde(rename = "30days")]
    ThirtyDays,
    #[default]
    #[serde(rename = "all")]
    All,
}

impl DateBucket {
    /// Whether a request `diff` days from today falls in the bucket.
    /// Past requests (negative diff) only match `All`.
    pub fn contains(self, diff: i64) -> bool {
        match self {
            DateBucket::All => true,
            DateBucket::Today => diff == 0,
            DateBucket::ThreeDays => (0..=3).contains(&diff),
            DateBucket::SevenDays => (0..=7).contains(&diff),
            DateBucket::ThirtyDays => (0..=30).contains(&diff),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    CreatedOldest,
    #[default]
    CreatedNewest,
    PriceHighest,
    PriceLowest,
    RequestedNearest,
    RequestedFurthest,
}

impl SortKey {
    fn compare(self, a: &WaitlistEntry, b: &WaitlistEntry) -> Ordering {
        // Missing prices sort as zero.
        let price = |e: &WaitlistEntry| e.price_cents.unwrap_or(0);
        match self {
            SortKey::CreatedOldest => a.created_at.cmp(&b.created_at),
            SortKey::CreatedNewest => Reverse(a.created_at).cmp(&Reverse(b.created_at)),
            SortKey::PriceHighest => price(b).cmp(&price(a)),
            SortKey::PriceLowest => price(a).cmp(&price(b)),
            SortKey::RequestedNearest => a.requested_date.cmp(&b.requested_date),
            SortKey::RequestedFurthest => b.requested_date.cmp(&a.requested_date),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WaitlistFilter {
    pub status: WaitlistStatus,
    pub bucket: DateBucket,
    pub sort: SortKey,
}

impl WaitlistFilter {
    pub fn matches(&self, entry: &WaitlistEntry, today: NaiveDate) -> bool {
        let diff = (entry.requested_date - today).num_days();
        entry.status == self.status && self.bucket.contains(diff)
    }

    /// Filter `entries` and order them by the active sort key.
    /// Ties keep their original order.
    pub fn apply<'a>(
        &self,
        entries: &'a [WaitlistEntry],
        today: NaiveDate,
    ) -> Vec<&'a WaitlistEntry> {
        let mut visible: Vec<&WaitlistEntry> =
            entries.iter().filter(|e| self.matches(e, today)).collect();
        visible.sort_by(|a, b| self.sort.compare(a, b));
        visible
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Waitlist {
    entries: Vec<WaitlistEntry>,
    pub filter: WaitlistFilter,
}

impl Waitlist {
    pub fn new(entries: Vec<WaitlistEntry>) -> Self {
        Waitlist {
            entries,
            filter: WaitlistFilter::default(),
        }
    }

    pub fn entries(&self) -> &[WaitlistEntry] {
        &self.entries
    }

    pub fn visible(&self, today: NaiveDate) -> Vec<&WaitlistEntry> {
        self.filter.apply(&self.entries, today)
    }

    pub fn add(&mut self, entry: WaitlistEntry) {
        self.entries.push(entry);
    }

    /// Mark an upcoming entry booked and switch to the booked tab.
    /// Returns false if the entry is missing or not upcoming.
    pub fn book(&mut self, id: &str) -> bool {
        let Some(entry) = self
            .entries
            .iter_mut()
            .find(|e| e.id == id && e.status == WaitlistStatus::Upcoming)
        else {
            return false;
        };
        entry.status = WaitlistStatus::Booked;
        self.filter.status = WaitlistStatus::Booked;
        true
    }

    /// Delete an entry for good.
    pub fn remove(&mut self, id: &str) -> Option<WaitlistEntry> {
        let index = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(index))
    }

    /// Back to the upcoming tab with no date restriction.
    pub fn reset_filters(&mut self) {
        self.filter.status = WaitlistStatus::default();
        self.filter.bucket = DateBucket::default();
    }
}

impl FromStr for WaitlistStatus {
    type Err = ChairbookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upcoming" => Ok(WaitlistStatus::Upcoming),
            "expired" => Ok(WaitlistStatus::Expired),
            "booked" => Ok(WaitlistStatus::Booked),
            _ => Err(ChairbookError::Parse(format!("unknown waitlist status '{s}'"))),
        }
    }
}

impl FromStr for DateBucket {
    type Err = ChairbookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "today" => Ok(DateBucket::Today),
            "3days" => Ok(DateBucket::ThreeDays),
            "7days" => Ok(DateBucket::SevenDays),
            "30days" => Ok(DateBucket::ThirtyDays),
            "all" => Ok(DateBucket::All),
            _ => Err(ChairbookError::Parse(format!("unknown date bucket '{s}'"))),
        }
    }
}

impl FromStr for SortKey {
    type Err = ChairbookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created-oldest" => Ok(SortKey::CreatedOldest),
            "created-newest" => Ok(SortKey::CreatedNewest),
            "price-highest" => Ok(SortKey::PriceHighest),
            "price-lowest" => Ok(SortKey::PriceLowest),
            "requested-nearest" => Ok(SortKey::RequestedNearest),
            "requested-furthest" => Ok(SortKey::RequestedFurthest),
            _ => Err(ChairbookError::Parse(format!("unknown sort key '{s}'"))),
        }
    }
}

impl fmt::Display for WaitlistStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaitlistStatus::Upcoming => write!(f, "upcoming"),
            WaitlistStatus::Expired => write!(f, "expired"),
            WaitlistStatus::Booked => write!(f, "booked"),
        }
    }
}

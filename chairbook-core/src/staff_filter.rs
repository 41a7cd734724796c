//! Staff/resource visibility.
//!
//! A `StaffSelection` says which team members the calendar shows. Resolving
//! it against the roster yields the visible id set; the same selection also
//! drives which events are drawn.

use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::event::CalendarEvent;
use crate::roster::StaffMember;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum StaffSelection {
    /// Everyone at the selected location.
    #[default]
    AllBusiness,
    /// Everyone not offline or off work.
    ScheduledTeam,
    /// An explicit set. An empty set shows nobody.
    Custom { ids: BTreeSet<String> },
    /// Members with an appointment today, or everyone if nobody has one.
    WithAppointments,
    Single { id: String },
}

impl StaffSelection {
    /// "Clear all": an empty custom set, which hides every member and event.
    pub fn cleared() -> Self {
        StaffSelection::Custom {
            ids: BTreeSet::new(),
        }
    }
}

/// Outcome of resolving a selection. Keeps "nobody selected" apart from
/// "nobody on the roster".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaffView {
    NoStaffConfigured,
    Visible(BTreeSet<String>),
}

impl StaffView {
    pub fn ids(&self) -> BTreeSet<String> {
        match self {
            StaffView::NoStaffConfigured => BTreeSet::new(),
            StaffView::Visible(ids) => ids.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            StaffView::NoStaffConfigured => true,
            StaffView::Visible(ids) => ids.is_empty(),
        }
    }
}

pub struct StaffFilter<'a> {
    staff: &'a [StaffMember],
    events: &'a [CalendarEvent],
    today: NaiveDate,
    location: Option<&'a str>,
    by_id: HashMap<&'a str, &'a StaffMember>,
}

impl<'a> StaffFilter<'a> {
    pub fn new(
        staff: &'a [StaffMember],
        events: &'a [CalendarEvent],
        today: NaiveDate,
        location: Option<&'a str>,
    ) -> Self {
        let by_id = staff.iter().map(|s| (s.id.as_str(), s)).collect();
        StaffFilter {
            staff,
            events,
            today,
            location,
            by_id,
        }
    }

    fn at_location(&self) -> impl Iterator<Item = &'a StaffMember> + '_ {
        self.staff.iter().filter(|s| s.works_at(self.location))
    }

    fn all_ids(&self) -> BTreeSet<String> {
        self.at_location().map(|s| s.id.clone()).collect()
    }

    /// Staff ids with an appointment today, falling back to everyone.
    fn with_appointments(&self) -> BTreeSet<String> {
        let booked: BTreeSet<&str> = self
            .events
            .iter()
            .filter(|e| e.date() == self.today)
            .map(|e| e.staff_id.as_str())
            .collect();

        let ids: BTreeSet<String> = self
            .at_location()
            .filter(|s| booked.contains(s.id.as_str()))
            .map(|s| s.id.clone())
            .collect();

        if ids.is_empty() { self.all_ids() } else { ids }
    }

    pub fn resolve(&self, selection: &StaffSelection) -> StaffView {
        if self.staff.is_empty() {
            return StaffView::NoStaffConfigured;
        }

        let ids = match selection {
            StaffSelection::AllBusiness => self.all_ids(),
            StaffSelection::ScheduledTeam => self
                .at_location()
                .filter(|s| s.status.is_scheduled())
                .map(|s| s.id.clone())
                .collect(),
            StaffSelection::Custom { ids } => self
                .at_location()
                .filter(|s| ids.contains(&s.id))
                .map(|s| s.id.clone())
                .collect(),
            StaffSelection::WithAppointments => self.with_appointments(),
            StaffSelection::Single { id } => self
                .at_location()
                .filter(|s| &s.id == id)
                .map(|s| s.id.clone())
                .collect(),
        };
        StaffView::Visible(ids)
    }

    /// Visible staff members in roster order.
    pub fn visible_staff(&self, selection: &StaffSelection) -> Vec<&'a StaffMember> {
        let ids = self.resolve(selection).ids();
        self.staff.iter().filter(|s| ids.contains(&s.id)).collect()
    }

    fn location_match(&self, event: &CalendarEvent) -> bool {
        match self.by_id.get(event.staff_id.as_str()) {
            Some(member) => member.works_at(self.location),
            None => self.location.is_none(),
        }
    }

    /// Build the event visibility predicate for `selection`:
    /// location match AND the selection's own condition.
    pub fn event_predicate<'s>(
        &'s self,
        selection: &'s StaffSelection,
    ) -> impl Fn(&CalendarEvent) -> bool + 's {
        let inferred = match selection {
            StaffSelection::WithAppointments => Some(self.with_appointments()),
            _ => None,
        };

        move |event: &CalendarEvent| {
            if !self.location_match(event) {
                return false;
            }
            let staff_id = event.staff_id.as_str();
            match selection {
                StaffSelection::AllBusiness => true,
                StaffSelection::ScheduledTeam => self
                    .by_id
                    .get(staff_id)
                    .is_some_and(|s| s.status.is_scheduled()),
                StaffSelection::Custom { ids } => ids.contains(staff_id),
                StaffSelection::WithAppointments => {
                    inferred.as_ref().is_some_and(|ids| ids.contains(staff_id))
                }
                StaffSelection::Single { id } => id == staff_id,
            }
        }
    }

    /// Toggle one member in or out of the visible set and re-derive the mode:
    /// the full set becomes all-business, anything less becomes custom.
    /// Unknown ids leave the selection unchanged.
    pub fn toggle(&self, selection: &StaffSelection, staff_id: &str) -> StaffSelection {
        let all = self.all_ids();
        if !all.contains(staff_id) {
            tracing::warn!(staff_id, "toggle for staff member not on the roster");
            return selection.clone();
        }

        let mut ids = self.resolve(selection).ids();
        if !ids.remove(staff_id) {
            ids.insert(staff_id.to_string());
        }

        if ids == all {
            StaffSelection::AllBusiness
        } else {
            StaffSelection::Custom { ids }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::StaffStatus;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 4).unwrap()
    }

    fn member(id: &str, status: StaffStatus, location: Option<&str>) -> StaffMember {
        StaffMember {
            id: id.to_string(),
            name: id.to_uppercase(),
            initials: id.to_uppercase(),
            role: "stylist".to_string(),
            status,
            bookings_today: 0,
            location_id: location.map(str::to_string),
        }
    }

    fn event(id: &str, staff_id: &str, date: NaiveDate) -> CalendarEvent {
        CalendarEvent::new(
            id,
            date,
            "10:00-11:00".parse().unwrap(),
            "Cut",
            "Ada",
            staff_id,
            "",
        )
    }

    fn roster() -> Vec<StaffMember> {
        vec![
            member("a", StaffStatus::Available, Some("north")),
            member("b", StaffStatus::Offline, Some("north")),
            member("c", StaffStatus::NotWorking, Some("south")),
            member("d", StaffStatus::Busy, None),
        ]
    }

    fn ids(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_scheduled_team_excludes_offline_and_not_working() {
        let staff = roster();
        let filter = StaffFilter::new(&staff, &[], today(), None);
        assert_eq!(
            filter.resolve(&StaffSelection::ScheduledTeam),
            StaffView::Visible(ids(&["a", "d"]))
        );
    }

    #[test]
    fn test_location_restricts_all_business() {
        let staff = roster();
        let filter = StaffFilter::new(&staff, &[], today(), Some("north"));
        assert_eq!(
            filter.resolve(&StaffSelection::AllBusiness),
            StaffView::Visible(ids(&["a", "b", "d"]))
        );
    }

    #[test]
    fn test_with_appointments_uses_today_and_falls_back() {
        let staff = roster();
        let events = vec![
            event("e1", "b", today()),
            event("e2", "c", today().succ_opt().unwrap()),
        ];
        let filter = StaffFilter::new(&staff, &events, today(), None);
        assert_eq!(
            filter.resolve(&StaffSelection::WithAppointments),
            StaffView::Visible(ids(&["b"]))
        );

        let filter = StaffFilter::new(&staff, &events[1..], today(), None);
        assert_eq!(
            filter.resolve(&StaffSelection::WithAppointments),
            StaffView::Visible(ids(&["a", "b", "c", "d"]))
        );
    }

    #[test]
    fn test_empty_custom_set_hides_every_event() {
        let staff = roster();
        let events = vec![event("e1", "a", today()), event("e2", "d", today())];
        let filter = StaffFilter::new(&staff, &events, today(), None);
        let cleared = StaffSelection::cleared();

        let visible = filter.event_predicate(&cleared);
        assert!(events.iter().all(|e| !visible(e)));
        assert_eq!(filter.resolve(&cleared), StaffView::Visible(BTreeSet::new()));
    }

    #[test]
    fn test_no_staff_configured_is_distinct_from_cleared() {
        let filter = StaffFilter::new(&[], &[], today(), None);
        assert_eq!(
            filter.resolve(&StaffSelection::cleared()),
            StaffView::NoStaffConfigured
        );
    }

    #[test]
    fn test_toggle_rederives_mode() {
        let staff = roster();
        let filter = StaffFilter::new(&staff, &[], today(), None);

        let partial = filter.toggle(&StaffSelection::AllBusiness, "b");
        assert_eq!(
            partial,
            StaffSelection::Custom {
                ids: ids(&["a", "c", "d"])
            }
        );

        let full = filter.toggle(&partial, "b");
        assert_eq!(full, StaffSelection::AllBusiness);

        let from_cleared = filter.toggle(&StaffSelection::cleared(), "c");
        assert_eq!(from_cleared, StaffSelection::Custom { ids: ids(&["c"]) });

        assert_eq!(filter.toggle(&partial, "zz"), partial);
    }

    #[test]
    fn test_event_predicate_checks_location_and_mode() {
        let staff = roster();
        let events = vec![
            event("e1", "a", today()),
            event("e2", "c", today()),
            event("e3", "ghost", today()),
        ];
        let filter = StaffFilter::new(&staff, &events, today(), Some("north"));
        let all = StaffSelection::AllBusiness;
        let visible = filter.event_predicate(&all);
        let shown: Vec<&str> = events
            .iter()
            .filter(|e| visible(e))
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(shown, vec!["e1"]);

        let single = StaffSelection::Single { id: "a".to_string() };
        let visible = filter.event_predicate(&single);
        assert!(visible(&events[0]));
        assert!(!visible(&events[1]));
    }
}

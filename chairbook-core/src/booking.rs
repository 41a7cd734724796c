//! The four-step booking wizard: client -> date -> time -> service.
//!
//! Steps only move forward one at a time, and only once the current step's
//! selection is made. Any earlier step can be revisited from the breadcrumb.
//! Completing the draft is a pure function producing either a calendar
//! event or a waitlist entry; applying it to the schedule is the caller's job.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::ChairbookError;
use crate::event::{CalendarEvent, TimeWindow};
use crate::roster::{Client, Service, initials_for};
use crate::waitlist::WaitlistEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStep {
    Client,
    Date,
    Time,
    Service,
}

/// Forward moves the wizard allows. Backward moves are always allowed.
const FORWARD_TRANSITIONS: [(BookingStep, BookingStep); 3] = [
    (BookingStep::Client, BookingStep::Date),
    (BookingStep::Date, BookingStep::Time),
    (BookingStep::Time, BookingStep::Service),
];

impl BookingStep {
    pub fn can_transition(self, to: BookingStep) -> bool {
        to < self || FORWARD_TRANSITIONS.contains(&(self, to))
    }

    pub fn next(self) -> Option<BookingStep> {
        FORWARD_TRANSITIONS
            .iter()
            .find(|(from, _)| *from == self)
            .map(|(_, to)| *to)
    }
}

/// Where the wizard was opened from, which decides what completing it creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OriginMode {
    Waitlist,
    Calendar,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ClientChoice {
    Existing { id: String },
    WalkIn,
}

/// The time step's answer: a concrete slot or "any time".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TimeChoice {
    Any,
    Window(TimeWindow),
}

impl FromStr for TimeChoice {
    type Err = ChairbookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("any") {
            Ok(TimeChoice::Any)
        } else {
            s.parse().map(TimeChoice::Window)
        }
    }
}

impl TryFrom<String> for TimeChoice {
    type Error = ChairbookError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<TimeChoice> for String {
    fn from(choice: TimeChoice) -> Self {
        choice.to_string()
    }
}

impl fmt::Display for TimeChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeChoice::Any => write!(f, "any"),
            TimeChoice::Window(window) => write!(f, "{window}"),
        }
    }
}

/// Transient state of an open wizard. Dropped on close or completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDraft {
    step: BookingStep,
    pub origin: OriginMode,
    pub selected_client: Option<ClientChoice>,
    pub selected_date: Option<NaiveDate>,
    pub selected_time: Option<TimeChoice>,
    pub selected_service_id: Option<String>,
}

impl BookingDraft {
    pub fn new(origin: OriginMode) -> Self {
        BookingDraft {
            step: BookingStep::Client,
            origin,
            selected_client: None,
            selected_date: None,
            selected_time: None,
            selected_service_id: None,
        }
    }

    pub fn step(&self) -> BookingStep {
        self.step
    }

    fn has_selection_for(&self, step: BookingStep) -> bool {
        match step {
            BookingStep::Client => self.selected_client.is_some(),
            BookingStep::Date => self.selected_date.is_some(),
            BookingStep::Time => self.selected_time.is_some(),
            BookingStep::Service => self.selected_service_id.is_some(),
        }
    }

    /// Whether "continue" is enabled on the current step.
    pub fn can_advance(&self) -> bool {
        self.step.next().is_some() && self.has_selection_for(self.step)
    }

    /// Whether "apply" is enabled: on the service step with a service chosen.
    pub fn can_complete(&self) -> bool {
        self.step == BookingStep::Service && self.selected_service_id.is_some()
    }

    /// Move to the next step. Returns false (and stays put) when disabled.
    pub fn advance(&mut self) -> bool {
        match self.step.next() {
            Some(next) if self.has_selection_for(self.step) => {
                self.step = next;
                true
            }
            _ => false,
        }
    }

    /// Breadcrumb navigation. Only earlier steps (or the current one) are reachable.
    pub fn jump_to(&mut self, step: BookingStep) -> bool {
        if step == self.step {
            return true;
        }
        if step < self.step && self.step.can_transition(step) {
            self.step = step;
            return true;
        }
        false
    }

    pub fn select_client(&mut self, choice: ClientChoice) -> bool {
        self.select_on(BookingStep::Client, |d| d.selected_client = Some(choice))
    }

    pub fn select_date(&mut self, date: NaiveDate) -> bool {
        self.select_on(BookingStep::Date, |d| d.selected_date = Some(date))
    }

    pub fn select_time(&mut self, time: TimeChoice) -> bool {
        self.select_on(BookingStep::Time, |d| d.selected_time = Some(time))
    }

    pub fn select_service(&mut self, service_id: String) -> bool {
        self.select_on(BookingStep::Service, |d| d.selected_service_id = Some(service_id))
    }

    // Selections only count on the step that shows them.
    fn select_on(&mut self, step: BookingStep, set: impl FnOnce(&mut Self)) -> bool {
        if self.step != step {
            return false;
        }
        set(self);
        true
    }
}

/// Everything completing a draft needs from the surrounding schedule.
pub struct CompletionContext<'a> {
    pub clients: &'a [Client],
    pub services: &'a [Service],
    pub today: NaiveDate,
    pub now: NaiveDateTime,
    pub walk_in_name: &'a str,
    pub default_staff_id: &'a str,
    pub any_time_window: TimeWindow,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BookingOutcome {
    Event { event: CalendarEvent },
    Waitlisted { entry: WaitlistEntry },
}

impl BookingDraft {
    /// Build what the wizard creates. `None` while apply is disabled or the
    /// chosen service no longer exists.
    pub fn complete(&self, ctx: &CompletionContext<'_>) -> Option<BookingOutcome> {
        if !self.can_complete() {
            return None;
        }
        let service_id = self.selected_service_id.as_deref()?;
        let service = ctx.services.iter().find(|s| s.id == service_id)?;

        let display_date = self.selected_date.unwrap_or(ctx.today);
        let client_name = self
            .client_name(ctx.clients)
            .unwrap_or(ctx.walk_in_name)
            .to_string();

        let outcome = match self.origin {
            OriginMode::Waitlist => {
                let mut entry =
                    WaitlistEntry::upcoming(client_name, display_date, &service.name, ctx.now);
                entry.price_cents = Some(service.price_cents);
                entry.service_id = Some(service.id.clone());
                BookingOutcome::Waitlisted { entry }
            }
            OriginMode::Calendar => {
                let window = match self.selected_time {
                    Some(TimeChoice::Window(window)) => window,
                    Some(TimeChoice::Any) | None => ctx.any_time_window,
                };
                let event = CalendarEvent::new(
                    uuid::Uuid::new_v4().to_string(),
                    display_date,
                    window,
                    &service.name,
                    client_name,
                    ctx.default_staff_id,
                    &service.color,
                );
                BookingOutcome::Event { event }
            }
        };
        Some(outcome)
    }

    fn client_name<'a>(&self, clients: &'a [Client]) -> Option<&'a str> {
        match self.selected_client.as_ref()? {
            ClientChoice::Existing { id } => clients
                .iter()
                .find(|c| &c.id == id)
                .map(|c| c.name.as_str()),
            ClientChoice::WalkIn => None,
        }
    }
}

/// Translation keys for the new-client form's field errors.
pub const NAME_REQUIRED: &str = "booking.new_client.name_required";
pub const PHONE_REQUIRED: &str = "booking.new_client.phone_required";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<&'static str>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone.is_none()
    }
}

/// The "new client" modal's inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClientForm {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(skip_deserializing)]
    pub errors: FieldErrors,
}

impl NewClientForm {
    pub fn validate(&self) -> FieldErrors {
        FieldErrors {
            name: self.name.trim().is_empty().then_some(NAME_REQUIRED),
            phone: self.phone.trim().is_empty().then_some(PHONE_REQUIRED),
        }
    }

    /// Turn valid input into a client, or report per-field errors.
    pub fn into_client(self) -> Result<Client, FieldErrors> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(errors);
        }
        let name = self.name.trim().to_string();
        Ok(Client {
            id: uuid::Uuid::new_v4().to_string(),
            initials: initials_for(&name),
            name,
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn services() -> Vec<Service> {
        vec![Service {
            id: "cut".to_string(),
            name: "Haircut".to_string(),
            duration_minutes: 30,
            price_cents: 2500,
            color: "#336699".to_string(),
        }]
    }

    fn clients() -> Vec<Client> {
        vec![Client {
            id: "c1".to_string(),
            name: "Ada Lovelace".to_string(),
            email: String::new(),
            phone: "555".to_string(),
            initials: "AL".to_string(),
        }]
    }

    fn walk_through(origin: OriginMode, time: TimeChoice) -> BookingDraft {
        let mut draft = BookingDraft::new(origin);
        assert!(draft.select_client(ClientChoice::Existing { id: "c1".to_string() }));
        assert!(draft.advance());
        assert!(draft.select_date(date(2025, 3, 14)));
        assert!(draft.advance());
        assert!(draft.select_time(time));
        assert!(draft.advance());
        assert!(draft.select_service("cut".to_string()));
        draft
    }

    fn context<'a>(clients: &'a [Client], services: &'a [Service]) -> CompletionContext<'a> {
        CompletionContext {
            clients,
            services,
            today: date(2025, 3, 4),
            now: date(2025, 3, 4).and_hms_opt(9, 30, 0).unwrap(),
            walk_in_name: "Walk-in",
            default_staff_id: "s1",
            any_time_window: "10:00-11:00".parse().unwrap(),
        }
    }

    #[test]
    fn test_transition_table() {
        use BookingStep as S;
        assert!(S::Client.can_transition(S::Date));
        assert!(!S::Client.can_transition(S::Time));
        assert!(!S::Date.can_transition(S::Service));
        assert!(S::Service.can_transition(S::Client));
        assert!(S::Time.can_transition(S::Date));
        assert_eq!(S::Service.next(), None);
    }

    #[test]
    fn test_cannot_advance_without_selection() {
        let mut draft = BookingDraft::new(OriginMode::Calendar);
        assert!(!draft.can_advance());
        assert!(!draft.advance());
        assert_eq!(draft.step(), BookingStep::Client);
        assert!(!draft.jump_to(BookingStep::Service));
        // A selection for a later step is not accepted early.
        assert!(!draft.select_date(date(2025, 3, 1)));
        assert_eq!(draft.selected_date, None);
    }

    #[test]
    fn test_breadcrumb_goes_back_only() {
        let mut draft = walk_through(OriginMode::Calendar, TimeChoice::Any);
        assert_eq!(draft.step(), BookingStep::Service);
        assert!(draft.jump_to(BookingStep::Date));
        assert_eq!(draft.step(), BookingStep::Date);
        assert!(!draft.jump_to(BookingStep::Service));
        assert_eq!(draft.selected_service_id.as_deref(), Some("cut"));
    }

    #[test]
    fn test_apply_disabled_without_service() {
        let mut draft = walk_through(OriginMode::Calendar, TimeChoice::Any);
        draft.selected_service_id = None;
        let (clients, services) = (clients(), services());
        assert!(!draft.can_complete());
        assert!(draft.complete(&context(&clients, &services)).is_none());
    }

    #[test]
    fn test_calendar_completion_uses_selected_slot() {
        let draft = walk_through(OriginMode::Calendar, "14:00-14:30".parse().unwrap());
        let (clients, services) = (clients(), services());
        let Some(BookingOutcome::Event { event }) = draft.complete(&context(&clients, &services))
        else {
            panic!("expected a calendar event");
        };
        assert_eq!(event.date(), date(2025, 3, 14));
        assert_eq!(event.window().to_string(), "14:00-14:30");
        assert_eq!(event.client_name, "Ada Lovelace");
        assert_eq!(event.staff_id, "s1");
        assert_eq!(event.title, "Haircut");
        assert_eq!(event.color, "#336699");
    }

    #[test]
    fn test_any_time_uses_fallback_window() {
        let draft = walk_through(OriginMode::Calendar, TimeChoice::Any);
        let (clients, services) = (clients(), services());
        let Some(BookingOutcome::Event { event }) = draft.complete(&context(&clients, &services))
        else {
            panic!("expected a calendar event");
        };
        assert_eq!(event.window().to_string(), "10:00-11:00");
    }

    #[test]
    fn test_waitlist_completion_and_walk_in_name() {
        let mut draft = BookingDraft::new(OriginMode::Waitlist);
        draft.select_client(ClientChoice::WalkIn);
        draft.advance();
        draft.select_date(date(2025, 3, 20));
        draft.advance();
        draft.select_time(TimeChoice::Any);
        draft.advance();
        draft.select_service("cut".to_string());

        let (clients, services) = (clients(), services());
        let Some(BookingOutcome::Waitlisted { entry }) =
            draft.complete(&context(&clients, &services))
        else {
            panic!("expected a waitlist entry");
        };
        assert_eq!(entry.client_name, "Walk-in");
        assert_eq!(entry.requested_date, date(2025, 3, 20));
        assert_eq!(entry.note, "Haircut");
        assert_eq!(entry.price_cents, Some(2500));
        assert_eq!(entry.status, crate::waitlist::WaitlistStatus::Upcoming);
    }

    #[test]
    fn test_time_choice_parsing() {
        assert_eq!("any".parse::<TimeChoice>().unwrap(), TimeChoice::Any);
        assert!("9-10".parse::<TimeChoice>().is_err());
        let json = serde_json::to_string(&TimeChoice::from_str("09:00-09:30").unwrap()).unwrap();
        assert_eq!(json, "\"09:00-09:30\"");
    }

    #[test]
    fn test_new_client_validation() {
        let errors = NewClientForm::default().into_client().unwrap_err();
        assert_eq!(errors.name, Some(NAME_REQUIRED));
        assert_eq!(errors.phone, Some(PHONE_REQUIRED));

        let form = NewClientForm {
            name: " grace  brewster hopper ".to_string(),
            phone: "555-0100".to_string(),
            ..Default::default()
        };
        let client = form.into_client().unwrap();
        assert_eq!(client.initials, "GB");
        assert_eq!(client.name, "grace  brewster hopper");
    }
}

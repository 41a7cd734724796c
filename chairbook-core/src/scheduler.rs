//! The single controller that owns all schedule state.
//!
//! Every user interaction arrives as a `Command` and is applied atomically by
//! `Scheduler::dispatch`. Illegal or disabled actions are no-ops reported as
//! `Transition::Ignored`; nothing here panics or partially commits.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::booking::{
    BookingDraft, BookingOutcome, BookingStep, ClientChoice, CompletionContext, FieldErrors,
    NewClientForm, OriginMode, TimeChoice,
};
use crate::calendar_math::{header_label, time_slots};
use crate::clock::Clock;
use crate::config::ChairbookConfig;
use crate::error::ChairbookResult;
use crate::event::{CalendarEvent, TimeWindow};
use crate::hover::{HoverPreview, HoverTracker, TimeAxis};
use crate::locale::Locale;
use crate::range_picker::RangePicker;
use crate::roster::{Client, Seed, Service, StaffMember};
use crate::staff_filter::{StaffFilter, StaffSelection, StaffView};
use crate::view_state::{ViewAction, ViewMode, ViewState};
use crate::waitlist::{DateBucket, SortKey, Waitlist, WaitlistEntry, WaitlistStatus};

/// Staff id used when neither the config nor the roster provides one.
pub const UNASSIGNED_STAFF_ID: &str = "unassigned";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    // Navigation
    Next,
    Prev,
    Today,
    SetView { mode: ViewMode },
    ZoomIn,
    ZoomOut,
    SetLocation { location: Option<String> },

    // Staff visibility
    SelectStaff { selection: StaffSelection },
    ToggleStaff { id: String },
    SelectAllStaff,
    ClearAllStaff,

    // Range picker
    RangeClick { date: NaiveDate },
    RangeHover { date: Option<NaiveDate> },
    RangeApply,
    RangeCancel,
    RangeClear,

    // Hover preview
    PointerMove {
        y: f64,
        day: NaiveDate,
        #[serde(default)]
        staff_id: Option<String>,
    },
    PointerLeave,

    // Booking wizard
    OpenBooking { origin: OriginMode },
    CloseBooking,
    SelectClient { client: ClientChoice },
    SelectDate { date: NaiveDate },
    SelectTime { time: String },
    SelectService { id: String },
    Continue,
    JumpTo { step: BookingStep },
    ApplyBooking,

    // New-client modal
    OpenNewClient,
    SubmitNewClient {
        name: String,
        phone: String,
        #[serde(default)]
        email: String,
    },
    CloseNewClient,

    // Waitlist
    OpenWaitlist,
    CloseWaitlist,
    SetWaitlistTab { status: WaitlistStatus },
    SetWaitlistBucket { bucket: DateBucket },
    SetWaitlistSort { sort: SortKey },
    BookWaitlistEntry { id: String },
    RemoveWaitlistEntry { id: String },
    AddWaitlistEntry {
        client_name: String,
        requested_date: NaiveDate,
        #[serde(default)]
        note: String,
        #[serde(default)]
        service_id: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Transition {
    Applied,
    /// The action was disabled in the current state.
    Ignored,
    /// Field-level validation failed; the modal stays open.
    Invalid { errors: FieldErrors },
    Completed { outcome: BookingOutcome },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Panel {
    #[default]
    Calendar,
    Waitlist,
}

/// Values from configuration the scheduler works with.
#[derive(Debug, Clone)]
pub struct Settings {
    pub locale: Locale,
    pub day_start_hour: u32,
    pub day_end_hour: u32,
    pub slot_interval_minutes: u32,
    pub zoom_pixels_per_hour: u32,
    pub walk_in_name: String,
    pub default_staff_id: Option<String>,
    pub any_time_window: TimeWindow,
    pub location: Option<String>,
}

impl Settings {
    pub fn from_config(config: &ChairbookConfig) -> ChairbookResult<Self> {
        config.validate()?;
        Ok(Settings {
            locale: config.locale(),
            day_start_hour: config.day_start_hour,
            day_end_hour: config.day_end_hour,
            slot_interval_minutes: config.slot_interval_minutes,
            zoom_pixels_per_hour: config.zoom_pixels_per_hour,
            walk_in_name: config.walk_in_name.clone(),
            default_staff_id: config.default_staff_id.clone(),
            any_time_window: config.any_time_window()?,
            location: config.location.clone(),
        })
    }
}

/// Read-only picture of the schedule for the rendering layer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot<'a> {
    pub header: String,
    pub view: &'a ViewState,
    pub visible_days: Vec<NaiveDate>,
    pub visible_staff: Vec<&'a StaffMember>,
    pub no_staff_configured: bool,
    pub events: Vec<&'a CalendarEvent>,
    pub panel: Panel,
    pub waitlist: Vec<&'a WaitlistEntry>,
    pub hover: Option<&'a HoverPreview>,
    pub booking: Option<&'a BookingDraft>,
    /// Slot labels offered while the wizard is on the time step.
    pub time_slots: Vec<String>,
    pub new_client: Option<&'a NewClientForm>,
}

pub struct Scheduler {
    settings: Settings,
    clock: Box<dyn Clock>,
    view: ViewState,
    range_picker: RangePicker,
    hover: HoverTracker,
    events: Vec<CalendarEvent>,
    staff: Vec<StaffMember>,
    services: Vec<Service>,
    clients: Vec<Client>,
    waitlist: Waitlist,
    booking: Option<BookingDraft>,
    new_client: Option<NewClientForm>,
    panel: Panel,
}

impl Scheduler {
    pub fn new(settings: Settings, seed: Seed, clock: Box<dyn Clock>) -> Self {
        let mut view = ViewState::new(clock.today(), settings.zoom_pixels_per_hour);
        view.location = settings.location.clone();

        Scheduler {
            settings,
            clock,
            view,
            range_picker: RangePicker::default(),
            hover: HoverTracker::default(),
            events: seed.events,
            staff: seed.staff,
            services: seed.services,
            clients: seed.clients,
            waitlist: Waitlist::new(seed.waitlist),
            booking: None,
            new_client: None,
            panel: Panel::Calendar,
        }
    }

    // STATE ACCESS:

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn range_picker(&self) -> &RangePicker {
        &self.range_picker
    }

    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    pub fn staff(&self) -> &[StaffMember] {
        &self.staff
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn waitlist(&self) -> &Waitlist {
        &self.waitlist
    }

    pub fn booking(&self) -> Option<&BookingDraft> {
        self.booking.as_ref()
    }

    pub fn new_client_form(&self) -> Option<&NewClientForm> {
        self.new_client.as_ref()
    }

    pub fn panel(&self) -> Panel {
        self.panel
    }

    pub fn hover(&self) -> Option<&HoverPreview> {
        self.hover.current()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    // DERIVED VIEWS:

    pub fn header_label(&self) -> String {
        header_label(
            self.view.view_mode,
            self.view.anchor_date,
            Some(self.view.effective_week_start()),
            self.settings.locale,
        )
    }

    pub fn visible_days(&self) -> Vec<NaiveDate> {
        self.view.visible_days()
    }

    pub fn time_axis(&self) -> TimeAxis {
        TimeAxis {
            zoom_pixels_per_hour: f64::from(self.view.zoom_pixels_per_hour),
            start_hour: self.settings.day_start_hour,
            end_hour: self.settings.day_end_hour,
        }
    }

    /// Bookable slot labels for the time step.
    pub fn time_slots(&self) -> Vec<String> {
        time_slots(
            self.settings.day_start_hour,
            self.settings.day_end_hour,
            self.settings.slot_interval_minutes,
        )
        .collect()
    }

    fn staff_filter(&self) -> StaffFilter<'_> {
        StaffFilter::new(
            &self.staff,
            &self.events,
            self.today(),
            self.view.location.as_deref(),
        )
    }

    pub fn staff_view(&self) -> StaffView {
        self.staff_filter().resolve(&self.view.staff_selection)
    }

    pub fn visible_staff(&self) -> Vec<&StaffMember> {
        self.staff_filter().visible_staff(&self.view.staff_selection)
    }

    /// Events passing the staff predicate on the rendered days, ordered by day
    /// and start time.
    pub fn visible_events(&self) -> Vec<&CalendarEvent> {
        let days = self.visible_days();
        let (Some(first), Some(last)) = (days.first().copied(), days.last().copied()) else {
            return Vec::new();
        };

        let filter = self.staff_filter();
        let visible = filter.event_predicate(&self.view.staff_selection);
        let mut events: Vec<&CalendarEvent> = self
            .events
            .iter()
            .filter(|e| first <= e.date() && e.date() <= last)
            .filter(|e| visible(e))
            .collect();
        events.sort_by(|a, b| {
            (a.date(), a.start(), &a.staff_id).cmp(&(b.date(), b.start(), &b.staff_id))
        });
        events
    }

    pub fn visible_waitlist(&self) -> Vec<&WaitlistEntry> {
        self.waitlist.visible(self.today())
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            header: self.header_label(),
            view: &self.view,
            visible_days: self.visible_days(),
            visible_staff: self.visible_staff(),
            no_staff_configured: self.staff_view() == StaffView::NoStaffConfigured,
            events: self.visible_events(),
            panel: self.panel,
            waitlist: self.visible_waitlist(),
            hover: self.hover(),
            booking: self.booking(),
            time_slots: match self.booking() {
                Some(draft) if draft.step() == BookingStep::Time => self.time_slots(),
                _ => Vec::new(),
            },
            new_client: self.new_client_form(),
        }
    }

    fn default_staff_id(&self) -> &str {
        self.settings
            .default_staff_id
            .as_deref()
            .or_else(|| self.staff.first().map(|s| s.id.as_str()))
            .unwrap_or(UNASSIGNED_STAFF_ID)
    }

    // COMMANDS:

    /// Apply commands in order, as a recorded session would.
    pub fn replay(&mut self, commands: impl IntoIterator<Item = Command>) -> Vec<Transition> {
        commands.into_iter().map(|c| self.dispatch(c)).collect()
    }

    pub fn dispatch(&mut self, command: Command) -> Transition {
        debug!(?command, "dispatch");
        let transition = match command {
            Command::Next => self.update_view(ViewAction::Next),
            Command::Prev => self.update_view(ViewAction::Prev),
            Command::Today => {
                let today = self.today();
                self.update_view(ViewAction::Today { today })
            }
            Command::SetView { mode } => self.update_view(ViewAction::SetMode { mode }),
            Command::ZoomIn => self.update_view(ViewAction::ZoomIn),
            Command::ZoomOut => self.update_view(ViewAction::ZoomOut),
            Command::SetLocation { location } => {
                self.update_view(ViewAction::SetLocation { location })
            }

            Command::SelectStaff { selection } => {
                self.update_view(ViewAction::SetStaffSelection { selection })
            }
            Command::ToggleStaff { id } => {
                let selection = self.staff_filter().toggle(&self.view.staff_selection, &id);
                self.update_view(ViewAction::SetStaffSelection { selection })
            }
            Command::SelectAllStaff => self.update_view(ViewAction::SetStaffSelection {
                selection: StaffSelection::AllBusiness,
            }),
            Command::ClearAllStaff => self.update_view(ViewAction::SetStaffSelection {
                selection: StaffSelection::cleared(),
            }),

            Command::RangeClick { date } => {
                self.range_picker.click(date);
                Transition::Applied
            }
            Command::RangeHover { date } => {
                self.range_picker.hover(date);
                Transition::Applied
            }
            Command::RangeApply => match self.range_picker.apply() {
                Some(range) => self.update_view(ViewAction::CommitRange { range }),
                None => Transition::Ignored,
            },
            Command::RangeCancel => {
                self.range_picker.cancel();
                Transition::Applied
            }
            Command::RangeClear => {
                self.range_picker.clear();
                Transition::Applied
            }

            Command::PointerMove { y, day, staff_id } => {
                let axis = self.time_axis();
                self.hover.pointer_move(&axis, y, day, staff_id.as_deref());
                Transition::Applied
            }
            Command::PointerLeave => {
                self.hover.pointer_leave();
                Transition::Applied
            }

            Command::OpenBooking { origin } => {
                self.booking = Some(BookingDraft::new(origin));
                self.new_client = None;
                Transition::Applied
            }
            Command::CloseBooking => {
                self.booking = None;
                self.new_client = None;
                Transition::Applied
            }
            Command::SelectClient { client } => self.select_client(client),
            Command::SelectDate { date } => self.with_draft(|draft| draft.select_date(date)),
            Command::SelectTime { time } => match time.parse::<TimeChoice>() {
                Ok(choice) => self.with_draft(|draft| draft.select_time(choice)),
                Err(e) => {
                    warn!(time = %time, error = %e, "unparsable time selection");
                    Transition::Ignored
                }
            },
            Command::SelectService { id } => {
                if self.services.iter().any(|s| s.id == id) {
                    self.with_draft(|draft| draft.select_service(id))
                } else {
                    Transition::Ignored
                }
            }
            Command::Continue => self.with_draft(BookingDraft::advance),
            Command::JumpTo { step } => self.with_draft(|draft| draft.jump_to(step)),
            Command::ApplyBooking => self.apply_booking(),

            Command::OpenNewClient => match &self.booking {
                Some(draft) if draft.step() == BookingStep::Client => {
                    self.new_client = Some(NewClientForm::default());
                    Transition::Applied
                }
                _ => Transition::Ignored,
            },
            Command::SubmitNewClient { name, phone, email } => {
                self.submit_new_client(NewClientForm {
                    name,
                    phone,
                    email,
                    errors: FieldErrors::default(),
                })
            }
            Command::CloseNewClient => {
                self.new_client = None;
                Transition::Applied
            }

            Command::OpenWaitlist => {
                self.panel = Panel::Waitlist;
                Transition::Applied
            }
            Command::CloseWaitlist => {
                self.panel = Panel::Calendar;
                Transition::Applied
            }
            Command::SetWaitlistTab { status } => {
                self.waitlist.filter.status = status;
                Transition::Applied
            }
            Command::SetWaitlistBucket { bucket } => {
                self.waitlist.filter.bucket = bucket;
                Transition::Applied
            }
            Command::SetWaitlistSort { sort } => {
                self.waitlist.filter.sort = sort;
                Transition::Applied
            }
            Command::BookWaitlistEntry { id } => {
                if self.waitlist.book(&id) {
                    info!(id = %id, "waitlist entry booked");
                    Transition::Applied
                } else {
                    Transition::Ignored
                }
            }
            Command::RemoveWaitlistEntry { id } => match self.waitlist.remove(&id) {
                Some(_) => {
                    info!(id = %id, "waitlist entry removed");
                    Transition::Applied
                }
                None => Transition::Ignored,
            },
            Command::AddWaitlistEntry {
                client_name,
                requested_date,
                note,
                service_id,
            } => self.add_waitlist_entry(client_name, requested_date, note, service_id),
        };

        if transition == Transition::Ignored {
            debug!("command ignored in current state");
        }
        transition
    }

    fn update_view(&mut self, action: ViewAction) -> Transition {
        self.view = self.view.clone().apply(action);
        Transition::Applied
    }

    fn with_draft(&mut self, f: impl FnOnce(&mut BookingDraft) -> bool) -> Transition {
        match self.booking.as_mut() {
            Some(draft) => {
                if f(draft) {
                    Transition::Applied
                } else {
                    Transition::Ignored
                }
            }
            None => Transition::Ignored,
        }
    }

    fn select_client(&mut self, client: ClientChoice) -> Transition {
        if let ClientChoice::Existing { id } = &client {
            if !self.clients.iter().any(|c| &c.id == id) {
                return Transition::Ignored;
            }
        }
        self.with_draft(|draft| draft.select_client(client))
    }

    fn submit_new_client(&mut self, form: NewClientForm) -> Transition {
        let (Some(open_form), Some(draft)) = (self.new_client.as_mut(), self.booking.as_mut())
        else {
            return Transition::Ignored;
        };

        match form.into_client() {
            Err(errors) => {
                open_form.errors = errors.clone();
                Transition::Invalid { errors }
            }
            Ok(client) => {
                info!(client_id = %client.id, "client created");
                draft.jump_to(BookingStep::Client);
                draft.select_client(ClientChoice::Existing {
                    id: client.id.clone(),
                });
                draft.advance();
                self.clients.push(client);
                self.new_client = None;
                Transition::Applied
            }
        }
    }

    fn apply_booking(&mut self) -> Transition {
        let Some(draft) = self.booking.as_ref() else {
            return Transition::Ignored;
        };

        let ctx = CompletionContext {
            clients: &self.clients,
            services: &self.services,
            today: self.clock.today(),
            now: self.clock.now(),
            walk_in_name: &self.settings.walk_in_name,
            default_staff_id: self.default_staff_id(),
            any_time_window: self.settings.any_time_window,
        };
        let Some(outcome) = draft.complete(&ctx) else {
            return Transition::Ignored;
        };

        match &outcome {
            BookingOutcome::Waitlisted { entry } => {
                info!(id = %entry.id, date = %entry.requested_date, "booking added to waitlist");
                self.waitlist.add(entry.clone());
                self.waitlist.reset_filters();
                self.panel = Panel::Waitlist;
            }
            BookingOutcome::Event { event } => {
                info!(
                    id = %event.id,
                    date = %event.date(),
                    window = %event.window(),
                    "appointment booked"
                );
                let date = event.date();
                self.events.push(event.clone());
                self.update_view(ViewAction::ShowDay { date });
            }
        }

        self.booking = None;
        self.new_client = None;
        Transition::Completed { outcome }
    }

    fn add_waitlist_entry(
        &mut self,
        client_name: String,
        requested_date: NaiveDate,
        note: String,
        service_id: Option<String>,
    ) -> Transition {
        if client_name.trim().is_empty() {
            return Transition::Ignored;
        }
        let mut entry =
            WaitlistEntry::upcoming(client_name.trim(), requested_date, note, self.now());
        if let Some(service) = service_id
            .as_deref()
            .and_then(|id| self.services.iter().find(|s| s.id == id))
        {
            entry.price_cents = Some(service.price_cents);
            entry.service_id = Some(service.id.clone());
        }
        info!(id = %entry.id, "waitlist entry added");
        self.waitlist.add(entry);
        Transition::Applied
    }
}

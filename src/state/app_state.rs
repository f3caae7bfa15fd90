use crate::calendar::{self, CalendarEvent};
use chrono::Duration;
use sporza_api::WeekSchedule;

/// Latest refresh outcome. The week slot is replaced only on full success,
/// so a failed cycle keeps serving the previous (stale but valid) snapshot.
#[derive(Debug, Default)]
pub struct AppState {
    week: Option<WeekSchedule>,
    last_update_success: bool,
}

impl AppState {
    pub fn on_week_loaded(&mut self, week: WeekSchedule) {
        self.week = Some(week);
        self.last_update_success = true;
    }

    pub fn on_refresh_failed(&mut self) {
        self.last_update_success = false;
    }

    /// Whether the most recent refresh cycle succeeded. Stale data may still
    /// be served while this is false.
    pub fn available(&self) -> bool {
        self.last_update_success
    }

    pub fn week(&self) -> Option<&WeekSchedule> {
        self.week.as_ref()
    }

    /// Events for the coming seven days, soonest first.
    pub fn upcoming_events(&self) -> Vec<CalendarEvent> {
        let Some(week) = &self.week else {
            return Vec::new();
        };
        let now = calendar::now_local();
        calendar::events_in_range(week, now, now + Duration::days(7))
    }

    /// The next upcoming event, if any.
    pub fn next_event(&self) -> Option<CalendarEvent> {
        self.upcoming_events().into_iter().next()
    }
}

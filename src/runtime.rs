use std::sync::Arc;

use chrono::{Datelike, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::config::BookingConfig;
use crate::error::CalendarError;
use crate::models::form::FieldEdit;
use crate::models::form_state::FormState;
use crate::models::holiday::Holiday;
use crate::service::calendar::{CalendarView, MonthGrid};
use crate::service::holiday_service::{HolidayService, HolidaySource};
use crate::service::submission::{submit_booking, SubmitOutcome};
use crate::service::submission_service::{BookingSubmitter, HttpBookingSubmitter};
use crate::tasks::holiday_query::{HolidayQuery, HolidayQueryState};

pub fn today_in(timezone: Tz) -> NaiveDate {
    Utc::now().with_timezone(&timezone).date_naive()
}

/// One mounted booking form: field state, the visible month, and the holiday
/// query keyed by the selected date's year.
pub struct BookingSession {
    form: FormState,
    calendar: CalendarView,
    holidays: HolidayQuery,
    submitter: Arc<dyn BookingSubmitter>,
}

impl BookingSession {
    pub fn new(
        config: Arc<BookingConfig>,
        source: Arc<dyn HolidaySource>,
        submitter: Arc<dyn BookingSubmitter>,
        today: NaiveDate,
    ) -> Self {
        let session = Self {
            form: FormState::new(config, today),
            calendar: CalendarView::new(today),
            holidays: HolidayQuery::new(source),
            submitter,
        };
        session.holidays.request_year(today.year());
        session
    }

    pub fn from_config(config: Arc<BookingConfig>, today: NaiveDate) -> Self {
        let source = Arc::new(HolidayService::from_config(&config));
        let submitter = Arc::new(HttpBookingSubmitter::from_config(&config));
        Self::new(config, source, submitter, today)
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn calendar(&self) -> &CalendarView {
        &self.calendar
    }

    pub fn holidays(&self) -> &HolidayQuery {
        &self.holidays
    }

    pub fn edit(&mut self, edit: FieldEdit) -> bool {
        let changed = self.form.apply(edit);
        self.follow_selected_year();
        changed
    }

    pub fn previous_month(&mut self) {
        self.calendar.previous_month();
        self.holidays.request_year(self.calendar.year);
    }

    pub fn next_month(&mut self) {
        self.calendar.next_month();
        self.holidays.request_year(self.calendar.year);
    }

    /// Shows the month containing `date` and loads its year's holidays.
    pub fn show_month_of(&mut self, date: NaiveDate) {
        self.calendar = CalendarView::new(date);
        self.holidays.request_year(date.year());
    }

    /// Holidays of `year`, or `None` until that year has settled. A failed
    /// fetch yields an empty list so booking stays possible.
    pub fn holidays_for(&self, year: i32) -> Option<Arc<Vec<Holiday>>> {
        match self.holidays.state() {
            HolidayQueryState::Ready { year: loaded, holidays } if loaded == year => Some(holidays),
            HolidayQueryState::Failed { year: failed, .. } if failed == year => {
                Some(Arc::new(Vec::new()))
            }
            _ => None,
        }
    }

    pub fn month_grid(&self) -> Result<MonthGrid, CalendarError> {
        let holidays = self.holidays_for(self.calendar.year).unwrap_or_default();
        self.calendar.grid(&holidays, self.form.fields().date)
    }

    /// Clicks `date`. Disabled dates leave the form untouched, as do dates
    /// whose year's holidays are still loading.
    pub fn select_date(&mut self, date: NaiveDate) -> bool {
        let Some(holidays) = self.holidays_for(date.year()) else {
            tracing::debug!(date = %date, "holidays for this year are not loaded yet");
            self.holidays.request_year(date.year());
            return false;
        };
        let Some(selection) = self.calendar.select(date, &holidays) else {
            return false;
        };
        let selected = self.form.select_date(selection);
        self.follow_selected_year();
        selected
    }

    /// Clicks a day number of the visible month.
    pub fn select_day(&mut self, day: u32) -> bool {
        match self.calendar.date_for_day(day) {
            Some(date) => self.select_date(date),
            None => false,
        }
    }

    pub fn calendar_error(&self) -> Option<String> {
        self.form.calendar_error(self.holidays.has_error())
    }

    pub fn date_notices(&self) -> Vec<String> {
        self.form.date_notices(&self.selected_year_holidays())
    }

    pub fn shows_time_slots(&self) -> bool {
        self.form.shows_time_slots(&self.selected_year_holidays())
    }

    pub fn can_submit(&self) -> bool {
        self.form.can_submit(&self.selected_year_holidays())
    }

    /// Waits for the selected year's holidays before validating, so a
    /// national holiday cannot slip through while they are loading.
    pub async fn submit(&mut self, today: NaiveDate) -> SubmitOutcome {
        if let Some(date) = self.form.fields().date {
            if self.holidays_for(date.year()).is_none() {
                self.holidays.request_year(date.year());
                self.holidays.settled().await;
            }
        }
        let holidays = self.selected_year_holidays();
        let outcome = submit_booking(self.submitter.as_ref(), &mut self.form, &holidays, today).await;
        if outcome == SubmitOutcome::Succeeded {
            self.calendar = CalendarView::new(today);
            self.follow_selected_year();
        }
        outcome
    }

    fn selected_year_holidays(&self) -> Arc<Vec<Holiday>> {
        self.form
            .fields()
            .date
            .and_then(|date| self.holidays_for(date.year()))
            .unwrap_or_default()
    }

    fn follow_selected_year(&self) {
        if let Some(date) = self.form.fields().date {
            self.holidays.request_year(date.year());
        }
    }
}

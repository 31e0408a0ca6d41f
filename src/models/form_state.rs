use std::sync::Arc;

use chrono::NaiveDate;

use crate::config::BookingConfig;
use crate::error::SubmitError;
use crate::models::booking::{BookingPayload, SubmitResponse};
use crate::models::form::{FieldEdit, FormData, FormErrors, FormField};
use crate::models::holiday::Holiday;
use crate::service::calendar::{blocked_date_reason, DateSelection};
use crate::service::submission::{
    interpret_response, SubmissionStatus, SubmitOutcome, SubmitRejection,
};
use crate::service::validation::{is_form_empty, validate_form, GENERAL_VALIDATION_ERROR};

pub const HOLIDAYS_UNAVAILABLE: &str = "holiday information is currently not available";

/// Field values plus the UI state derived from them.
#[derive(Debug, Clone)]
pub struct FormState {
    config: Arc<BookingConfig>,
    fields: FormData,
    errors: FormErrors,
    holiday_info: Option<Holiday>,
    status: SubmissionStatus,
}

impl FormState {
    pub fn new(config: Arc<BookingConfig>, today: NaiveDate) -> Self {
        let fields = FormData::with_defaults(config.default_age, today);
        Self {
            config,
            fields,
            errors: FormErrors::new(),
            holiday_info: None,
            status: SubmissionStatus::Idle,
        }
    }

    pub fn config(&self) -> &BookingConfig {
        &self.config
    }

    pub fn fields(&self) -> &FormData {
        &self.fields
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    pub fn holiday_info(&self) -> Option<&Holiday> {
        self.holiday_info.as_ref()
    }

    pub fn status(&self) -> &SubmissionStatus {
        &self.status
    }

    pub fn is_submitting(&self) -> bool {
        self.status == SubmissionStatus::Submitting
    }

    pub fn is_success(&self) -> bool {
        self.status == SubmissionStatus::Succeeded
    }

    pub fn submit_error(&self) -> Option<&str> {
        match &self.status {
            SubmissionStatus::Failed { message } => Some(message),
            _ => None,
        }
    }

    /// Applies one edit. Returns whether the value changed.
    ///
    /// A change drops that field's error and any submission error. Edits are
    /// refused while a submission is in flight.
    pub fn apply(&mut self, edit: FieldEdit) -> bool {
        if self.is_submitting() {
            tracing::debug!(field = %edit.field(), "edit ignored while submitting");
            return false;
        }
        let field = edit.field();
        let changed = match edit {
            FieldEdit::FirstName(value) => replace_if_changed(&mut self.fields.first_name, value),
            FieldEdit::LastName(value) => replace_if_changed(&mut self.fields.last_name, value),
            FieldEdit::Email(value) => replace_if_changed(&mut self.fields.email, value),
            FieldEdit::Age(value) => replace_if_changed(&mut self.fields.age, value),
            FieldEdit::Photo(value) => replace_if_changed(&mut self.fields.photo, value),
            FieldEdit::Time(value) => replace_if_changed(&mut self.fields.time, value),
            FieldEdit::Date(value) => {
                let changed = replace_if_changed(&mut self.fields.date, value);
                if changed {
                    self.holiday_info = None;
                }
                changed
            }
        };
        if changed {
            self.errors.remove(field);
            if matches!(self.status, SubmissionStatus::Failed { .. }) {
                self.status = SubmissionStatus::Idle;
            }
            tracing::debug!(field = %field, "field updated");
        }
        changed
    }

    /// Applies a calendar selection: the date, then its observance (if any).
    pub fn select_date(&mut self, selection: DateSelection) -> bool {
        if self.is_submitting() {
            return false;
        }
        self.apply(FieldEdit::Date(Some(selection.date)));
        self.holiday_info = selection.observance;
        true
    }

    pub fn is_form_empty(&self) -> bool {
        is_form_empty(&self.fields, self.holiday_info.as_ref())
    }

    pub fn validate(&self) -> FormErrors {
        validate_form(
            &self.fields,
            self.holiday_info.as_ref(),
            &self.config.time_slots,
        )
    }

    /// Time slots are hidden on Sundays and national holidays.
    pub fn shows_time_slots(&self, holidays: &[Holiday]) -> bool {
        let national = self.holiday_info.as_ref().is_some_and(Holiday::is_national);
        let blocked = self
            .fields
            .date
            .and_then(|date| blocked_date_reason(date, holidays))
            .is_some();
        !national && !blocked
    }

    /// Mirrors the submit button's enabled state.
    pub fn can_submit(&self, holidays: &[Holiday]) -> bool {
        !self.is_submitting()
            && !self.is_form_empty()
            && self.errors.is_empty()
            && self.shows_time_slots(holidays)
    }

    /// Error line under the calendar: the date error, else the fetch warning.
    pub fn calendar_error(&self, holidays_failed: bool) -> Option<String> {
        if let Some(message) = self.errors.get(FormField::Date) {
            return Some(message.to_string());
        }
        holidays_failed.then(|| HOLIDAYS_UNAVAILABLE.to_string())
    }

    /// Informational lines shown below the calendar.
    pub fn date_notices(&self, holidays: &[Holiday]) -> Vec<String> {
        let mut notices = Vec::new();
        if let Some(info) = &self.holiday_info {
            notices.push(info.name.clone());
        }
        if let Some(reason) = self
            .fields
            .date
            .and_then(|date| blocked_date_reason(date, holidays))
        {
            notices.push(reason.to_string());
        }
        notices
    }

    /// First half of a submission: validate and, if valid, enter `Submitting`.
    pub fn begin_submission(
        &mut self,
        holidays: &[Holiday],
    ) -> Result<BookingPayload, SubmitRejection> {
        if self.is_submitting() {
            return Err(SubmitRejection::Busy);
        }
        self.status = SubmissionStatus::Validating;

        let mut errors = self.validate();
        if !errors.contains(FormField::Date) {
            if let Some(reason) = self
                .fields
                .date
                .and_then(|date| blocked_date_reason(date, holidays))
            {
                errors.insert(FormField::Date, reason);
            }
        }
        if !errors.is_empty() {
            tracing::info!(fields = errors.len(), "booking form invalid");
            return Err(self.reject(errors));
        }

        let Some(payload) = BookingPayload::from_form(&self.fields, self.config.timezone) else {
            tracing::error!("validated form could not be turned into a payload");
            return Err(self.reject(FormErrors::general(GENERAL_VALIDATION_ERROR)));
        };
        self.errors = FormErrors::new();
        self.status = SubmissionStatus::Submitting;
        Ok(payload)
    }

    /// Second half of a submission: record the response.
    pub fn finish_submission(
        &mut self,
        result: Result<SubmitResponse, SubmitError>,
        today: NaiveDate,
    ) -> SubmitOutcome {
        if !self.is_submitting() {
            tracing::warn!(status = ?self.status, "submission finished without being started");
        }
        match interpret_response(result) {
            Ok(()) => {
                tracing::info!("booking submitted");
                self.reset(today);
                self.status = SubmissionStatus::Succeeded;
                SubmitOutcome::Succeeded
            }
            Err(message) => {
                self.status = SubmissionStatus::Failed {
                    message: message.clone(),
                };
                SubmitOutcome::Failed(message)
            }
        }
    }

    fn reject(&mut self, errors: FormErrors) -> SubmitRejection {
        self.errors = errors.clone();
        self.status = SubmissionStatus::Idle;
        SubmitRejection::Invalid(errors)
    }

    fn reset(&mut self, today: NaiveDate) {
        self.fields = FormData::with_defaults(self.config.default_age, today);
        self.errors = FormErrors::new();
        self.holiday_info = None;
    }
}

fn replace_if_changed<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

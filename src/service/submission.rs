use chrono::NaiveDate;
use tracing::Instrument;
use uuid::Uuid;

use crate::error::SubmitError;
use crate::models::booking::{ErrorBody, SubmitResponse};
use crate::models::form::FormErrors;
use crate::models::form_state::FormState;
use crate::models::holiday::Holiday;
use crate::service::submission_service::BookingSubmitter;

pub const UNEXPECTED_SUBMIT_ERROR: &str = "An unexpected error occurred. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Validating,
    Submitting,
    Succeeded,
    Failed {
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitRejection {
    /// A request is already in flight.
    Busy,
    Invalid(FormErrors),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Succeeded,
    Invalid(FormErrors),
    Failed(String),
    Busy,
}

impl From<SubmitRejection> for SubmitOutcome {
    fn from(rejection: SubmitRejection) -> Self {
        match rejection {
            SubmitRejection::Busy => SubmitOutcome::Busy,
            SubmitRejection::Invalid(errors) => SubmitOutcome::Invalid(errors),
        }
    }
}

/// Maps the transport result to success or the message shown to the user.
pub fn interpret_response(result: Result<SubmitResponse, SubmitError>) -> Result<(), String> {
    let response = match result {
        Ok(response) => response,
        Err(err) => {
            tracing::warn!(error = %err, "booking request failed");
            return Err(UNEXPECTED_SUBMIT_ERROR.to_string());
        }
    };
    if response.is_success() {
        return Ok(());
    }
    let message = serde_json::from_str::<ErrorBody>(&response.body)
        .ok()
        .and_then(|body| body.message)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| format!("Submission failed with status: {}", response.status));
    tracing::warn!(status = response.status, message = %message, "booking rejected");
    Err(message)
}

/// Validates, posts once and records the result on `form`.
pub async fn submit_booking(
    submitter: &dyn BookingSubmitter,
    form: &mut FormState,
    holidays: &[Holiday],
    today: NaiveDate,
) -> SubmitOutcome {
    let span = tracing::info_span!("submission", id = %Uuid::new_v4());
    async move {
        let payload = match form.begin_submission(holidays) {
            Ok(payload) => payload,
            Err(rejection) => return rejection.into(),
        };
        tracing::info!(date = %payload.date, time = %payload.time, "posting booking");
        let result = submitter.submit(&payload).await;
        form.finish_submission(result, today)
    }
    .instrument(span)
    .await
}

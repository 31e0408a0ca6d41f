use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Mutex;
use workoutBooking::config::BookingConfig;
use workoutBooking::error::SubmitError;
use workoutBooking::models::booking::{BookingPayload, SubmitResponse};
use workoutBooking::models::form::{AgeInput, FieldEdit, FormField, PhotoFile};
use workoutBooking::models::form_state::FormState;
use workoutBooking::models::holiday::{Holiday, HolidayType};
use workoutBooking::service::calendar::{CalendarView, SUNDAY_NOTICE};
use workoutBooking::service::submission::{
    interpret_response, submit_booking, SubmissionStatus, SubmitOutcome, SubmitRejection,
    UNEXPECTED_SUBMIT_ERROR,
};
use workoutBooking::service::submission_service::BookingSubmitter;

struct FakeSubmitter {
    response: Result<SubmitResponse, String>,
    payloads: Mutex<Vec<BookingPayload>>,
}

impl FakeSubmitter {
    fn responding(status: u16, body: &str) -> Self {
        Self {
            response: Ok(SubmitResponse {
                status,
                body: body.to_string(),
            }),
            payloads: Mutex::new(Vec::new()),
        }
    }

    fn unreachable() -> Self {
        Self {
            response: Err("connection refused".to_string()),
            payloads: Mutex::new(Vec::new()),
        }
    }

    async fn sent(&self) -> Vec<BookingPayload> {
        self.payloads.lock().await.clone()
    }
}

#[async_trait]
impl BookingSubmitter for FakeSubmitter {
    async fn submit(&self, payload: &BookingPayload) -> Result<SubmitResponse, SubmitError> {
        self.payloads.lock().await.push(payload.clone());
        match &self.response {
            Ok(response) => Ok(response.clone()),
            Err(_) => Err(transport_error()),
        }
    }
}

fn transport_error() -> SubmitError {
    let err = reqwest::Client::new()
        .post("not a url")
        .build()
        .unwrap_err();
    SubmitError::Request(err)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn today() -> NaiveDate {
    date(2026, 3, 2)
}

fn filled_form() -> FormState {
    let mut form = FormState::new(Arc::new(BookingConfig::default()), today());
    form.apply(FieldEdit::FirstName(" Anna ".to_string()));
    form.apply(FieldEdit::LastName("Kowalska".to_string()));
    form.apply(FieldEdit::Email("anna@example.com".to_string()));
    form.apply(FieldEdit::Age(AgeInput::Years(30)));
    form.apply(FieldEdit::Photo(Some(PhotoFile::new(
        "anna.png",
        2 * 1024 * 1024,
        "image/png",
    ))));
    form.apply(FieldEdit::Date(Some(date(2026, 3, 10))));
    form.apply(FieldEdit::Time(Some("10:00".to_string())));
    form
}

#[tokio::test]
async fn valid_booking_posts_once_and_resets_on_success() {
    let submitter = FakeSubmitter::responding(200, "");
    let mut form = filled_form();
    assert!(form.validate().is_empty());
    assert!(form.can_submit(&[]));

    let reset_day = date(2026, 3, 3);
    let outcome = submit_booking(&submitter, &mut form, &[], reset_day).await;

    assert_eq!(outcome, SubmitOutcome::Succeeded);
    let sent = submitter.sent().await;
    assert_eq!(sent.len(), 1);
    let payload = &sent[0];
    assert_eq!(payload.first_name, "Anna");
    assert_eq!(payload.last_name, "Kowalska");
    assert_eq!(payload.email, "anna@example.com");
    assert_eq!(payload.age, 30);
    assert_eq!(payload.time, "10:00");
    assert_eq!(payload.photo.name, "anna.png");
    // Midnight in Warsaw (CET) is 23:00 UTC the day before.
    assert_eq!(payload.date, "2026-03-09T23:00:00.000Z");

    assert!(form.is_success());
    assert!(form.errors().is_empty());
    assert!(form.holiday_info().is_none());
    let fields = form.fields();
    assert!(fields.first_name.is_empty());
    assert!(fields.email.is_empty());
    assert!(fields.photo.is_none());
    assert!(fields.time.is_none());
    assert_eq!(fields.age, AgeInput::Years(18));
    assert_eq!(fields.date, Some(reset_day));
}

#[tokio::test]
async fn payload_serializes_with_camel_case_keys() {
    let mut form = filled_form();
    let payload = form.begin_submission(&[]).unwrap();
    let json = serde_json::to_value(&payload).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "firstName": "Anna",
            "lastName": "Kowalska",
            "email": "anna@example.com",
            "age": 30,
            "photo": { "name": "anna.png", "size": 2097152, "type": "image/png" },
            "date": "2026-03-09T23:00:00.000Z",
            "time": "10:00"
        })
    );
}

#[tokio::test]
async fn invalid_form_makes_no_request() {
    let submitter = FakeSubmitter::responding(200, "");
    let mut form = filled_form();
    form.apply(FieldEdit::Email("user@@example.com".to_string()));

    let outcome = submit_booking(&submitter, &mut form, &[], today()).await;

    match outcome {
        SubmitOutcome::Invalid(errors) => {
            assert_eq!(errors.len(), 1);
            assert!(errors.contains(FormField::Email));
        }
        other => panic!("expected invalid outcome, got {:?}", other),
    }
    assert!(submitter.sent().await.is_empty());
    assert_eq!(form.status(), &SubmissionStatus::Idle);
    assert!(form.errors().contains(FormField::Email));
    assert!(!form.can_submit(&[]));
}

#[tokio::test]
async fn editing_a_field_clears_only_its_error() {
    let mut form = filled_form();
    form.apply(FieldEdit::Email(String::new()));
    form.apply(FieldEdit::Photo(None));
    let _ = form.begin_submission(&[]);
    assert!(form.errors().contains(FormField::Email));
    assert!(form.errors().contains(FormField::Photo));

    assert!(form.apply(FieldEdit::Email("anna@example.com".to_string())));
    assert!(!form.errors().contains(FormField::Email));
    assert!(form.errors().contains(FormField::Photo));

    assert!(!form.apply(FieldEdit::Email("anna@example.com".to_string())));
}

#[tokio::test]
async fn server_error_message_is_surfaced_and_form_kept() {
    let submitter = FakeSubmitter::responding(422, r#"{"message":"Slot already taken"}"#);
    let mut form = filled_form();

    let outcome = submit_booking(&submitter, &mut form, &[], today()).await;

    assert_eq!(outcome, SubmitOutcome::Failed("Slot already taken".to_string()));
    assert_eq!(form.submit_error(), Some("Slot already taken"));
    assert_eq!(form.fields().first_name, " Anna ");
    assert_eq!(submitter.sent().await.len(), 1);
}

#[tokio::test]
async fn status_fallback_when_body_has_no_message() {
    let submitter = FakeSubmitter::responding(500, "<html>oops</html>");
    let mut form = filled_form();
    let outcome = submit_booking(&submitter, &mut form, &[], today()).await;
    assert_eq!(
        outcome,
        SubmitOutcome::Failed("Submission failed with status: 500".to_string())
    );

    let outcome = interpret_response(Ok(SubmitResponse {
        status: 400,
        body: r#"{"message":""}"#.to_string(),
    }));
    assert_eq!(outcome, Err("Submission failed with status: 400".to_string()));
}

#[tokio::test]
async fn transport_failure_uses_generic_message() {
    let submitter = FakeSubmitter::unreachable();
    let mut form = filled_form();
    let outcome = submit_booking(&submitter, &mut form, &[], today()).await;
    assert_eq!(outcome, SubmitOutcome::Failed(UNEXPECTED_SUBMIT_ERROR.to_string()));
    assert!(matches!(form.status(), SubmissionStatus::Failed { .. }));

    // Any edit returns the form to idle and drops the banner.
    form.apply(FieldEdit::LastName("Nowak".to_string()));
    assert_eq!(form.status(), &SubmissionStatus::Idle);
    assert_eq!(form.submit_error(), None);
}

#[tokio::test]
async fn second_submit_while_in_flight_is_rejected() {
    let mut form = filled_form();
    let payload = form.begin_submission(&[]).unwrap();
    assert!(form.is_submitting());
    assert!(!form.can_submit(&[]));

    assert_eq!(form.begin_submission(&[]), Err(SubmitRejection::Busy));
    assert!(!form.apply(FieldEdit::FirstName("Other".to_string())));

    let outcome = form.finish_submission(
        Ok(SubmitResponse {
            status: 201,
            body: String::new(),
        }),
        today(),
    );
    assert_eq!(outcome, SubmitOutcome::Succeeded);
    assert_eq!(payload.first_name, "Anna");
}

#[tokio::test]
async fn sunday_selection_is_ignored_and_date_kept() {
    let mut form = filled_form();
    let view = CalendarView::new(date(2026, 3, 10));
    let sunday = date(2026, 3, 8);

    assert!(view.select(sunday, &[]).is_none());
    assert_eq!(form.fields().date, Some(date(2026, 3, 10)));

    // Set directly, bypassing the calendar: submission is still blocked.
    form.apply(FieldEdit::Date(Some(sunday)));
    assert!(!form.can_submit(&[]));
    let submitter = FakeSubmitter::responding(200, "");
    let outcome = submit_booking(&submitter, &mut form, &[], today()).await;
    match outcome {
        SubmitOutcome::Invalid(errors) => {
            assert_eq!(errors.get(FormField::Date), Some(SUNDAY_NOTICE));
        }
        other => panic!("expected invalid outcome, got {:?}", other),
    }
    assert!(submitter.sent().await.is_empty());
}

#[tokio::test]
async fn observance_relaxes_time_slot_and_is_cleared_on_date_change() {
    let mothers_day = Holiday {
        name: "Mother's Day".to_string(),
        date: "2026-05-26".to_string(),
        holiday_type: HolidayType::Observance,
        country: "Poland".to_string(),
    };
    let holidays = vec![mothers_day.clone()];
    let mut form = filled_form();
    form.apply(FieldEdit::Time(None));

    let view = CalendarView::new(date(2026, 5, 1));
    let selection = view.select(date(2026, 5, 26), &holidays).unwrap();
    assert!(form.select_date(selection));
    assert_eq!(form.holiday_info(), Some(&mothers_day));
    assert!(!form.is_form_empty());
    assert!(form.validate().is_empty());
    assert_eq!(form.date_notices(&holidays), vec!["Mother's Day".to_string()]);

    let payload = form.begin_submission(&holidays).unwrap();
    assert_eq!(payload.time, "");
    form.finish_submission(
        Ok(SubmitResponse {
            status: 500,
            body: String::new(),
        }),
        today(),
    );

    let selection = view.select(date(2026, 5, 27), &holidays).unwrap();
    form.select_date(selection);
    assert!(form.holiday_info().is_none());
    assert!(form.is_form_empty());
}

#[tokio::test]
async fn calendar_error_prefers_date_error_over_fetch_warning() {
    let mut form = filled_form();
    assert_eq!(form.calendar_error(false), None);
    assert_eq!(
        form.calendar_error(true).as_deref(),
        Some("holiday information is currently not available")
    );

    form.apply(FieldEdit::Date(None));
    let _ = form.begin_submission(&[]);
    assert_eq!(form.calendar_error(true).as_deref(), Some("Date is required"));
}

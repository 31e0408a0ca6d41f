use chrono::{NaiveDate, NaiveTime, SecondsFormat, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::form::{FormData, PhotoFile};

/// JSON body posted to the submission endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPayload {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: i64,
    pub photo: PhotoFile,
    pub date: String,
    pub time: String,
}

impl BookingPayload {
    /// Returns `None` when a field the payload needs is missing or non-numeric.
    pub fn from_form(form: &FormData, timezone: Tz) -> Option<Self> {
        let age = form.age.years()?;
        let photo = form.photo.clone()?;
        let date = iso_instant(form.date?, timezone)?;
        Some(Self {
            first_name: form.first_name.trim().to_string(),
            last_name: form.last_name.trim().to_string(),
            email: form.email.trim().to_string(),
            age,
            photo,
            date,
            time: form.time_slot().unwrap_or_default().to_string(),
        })
    }
}

/// Local midnight of `date` in `timezone`, as a UTC ISO-8601 string.
pub fn iso_instant(date: NaiveDate, timezone: Tz) -> Option<String> {
    let local = timezone
        .from_local_datetime(&date.and_time(NaiveTime::MIN))
        .earliest()?;
    Some(
        local
            .with_timezone(&Utc)
            .to_rfc3339_opts(SecondsFormat::Millis, true),
    )
}

/// Status and raw body of the submission response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitResponse {
    pub status: u16,
    pub body: String,
}

impl SubmitResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: Option<String>,
}

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::models::form::{AgeInput, FormData, FormErrors, FormField};
use crate::models::holiday::Holiday;

pub const MIN_AGE: i64 = 8;
pub const MAX_AGE: i64 = 100;
pub const MAX_PHOTO_BYTES: u64 = 5 * 1024 * 1024;
pub const GENERAL_VALIDATION_ERROR: &str = "An error occurred while validating the form";
pub const INVALID_DATE: &str = "Invalid date";

const MIN_NAME_CHARS: usize = 2;
const MAX_NAME_CHARS: usize = 50;
const MAX_EMAIL_CHARS: usize = 254;
const MAX_LOCAL_PART_CHARS: usize = 64;

// RFC 5322 derived, ASCII only: dot-atom or quoted local part; hostname, IPv4 literal or
// general address literal as domain.
const EMAIL_PATTERN: &str = r##"(?i-u)^(?:[a-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-z0-9!#$%&'*+/=?^_`{|}~-]+)*|"(?:[\x01-\x08\x0b\x0c\x0e-\x1f\x21\x23-\x5b\x5d-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])*")@(?:(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z0-9](?:[a-z0-9-]*[a-z0-9])?|\[(?:(?:2(?:5[0-5]|[0-4][0-9])|1[0-9][0-9]|[1-9]?[0-9])\.){3}(?:(?:2(?:5[0-5]|[0-4][0-9])|1[0-9][0-9]|[1-9]?[0-9])|[a-z0-9-]*[a-z0-9]:(?:[\x01-\x08\x0b\x0c\x0e-\x1f\x21-\x5a\x53-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])+)\])$"##;

static EMAIL_REGEX: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN));

/// Per-field validation; the first failing rule of each field wins.
///
/// Internal failures are logged and collapse into a single `general` error.
pub fn validate_form(
    form: &FormData,
    holiday_info: Option<&Holiday>,
    time_slots: &[String],
) -> FormErrors {
    match validate_fields(form, holiday_info, time_slots) {
        Ok(errors) => errors,
        Err(err) => {
            tracing::error!(error = %err, "validation error");
            FormErrors::general(GENERAL_VALIDATION_ERROR)
        }
    }
}

fn validate_fields(
    form: &FormData,
    holiday_info: Option<&Holiday>,
    time_slots: &[String],
) -> Result<FormErrors, regex::Error> {
    let mut errors = FormErrors::new();

    let first_name = check_name(
        &form.first_name,
        "Your name is required",
        "Name must be at least 2 characters long",
        "Name must be less than 50 characters",
    );
    if let Some(message) = first_name {
        errors.insert(FormField::FirstName, message);
    }

    let last_name = check_name(
        &form.last_name,
        "Your last name is required",
        "Last name must be at least 2 characters long",
        "Last name must be less than 50 characters",
    );
    if let Some(message) = last_name {
        errors.insert(FormField::LastName, message);
    }

    if let Some(message) = check_email(&form.email)? {
        errors.insert(FormField::Email, message);
    }

    match &form.photo {
        None => errors.insert(FormField::Photo, "Photo is required"),
        Some(photo) if photo.size > MAX_PHOTO_BYTES => {
            errors.insert(FormField::Photo, "Photo must be less than 5MB")
        }
        Some(photo) if !photo.mime_type.starts_with("image/") => {
            errors.insert(FormField::Photo, "File must be an image")
        }
        Some(_) => {}
    }

    match form.time_slot() {
        None if holiday_info.is_none() => {
            errors.insert(FormField::Time, "Please select a time slot")
        }
        Some(time) if !time_slots.iter().any(|slot| slot == time) => {
            errors.insert(FormField::Time, "Invalid time slot selected")
        }
        _ => {}
    }

    match &form.age {
        AgeInput::NotANumber(_) => errors.insert(FormField::Age, "Age must be a number"),
        AgeInput::Years(age) if !(MIN_AGE..=MAX_AGE).contains(age) => {
            errors.insert(FormField::Age, "Age must be between 8 and 100")
        }
        AgeInput::Years(_) => {}
    }

    if form.date.is_none() {
        errors.insert(FormField::Date, "Date is required");
    }

    Ok(errors)
}

fn check_name(
    value: &str,
    required: &'static str,
    too_short: &'static str,
    too_long: &'static str,
) -> Option<&'static str> {
    let chars = value.chars().count();
    if value.trim().is_empty() {
        Some(required)
    } else if chars < MIN_NAME_CHARS {
        Some(too_short)
    } else if chars > MAX_NAME_CHARS {
        Some(too_long)
    } else {
        None
    }
}

fn check_email(email: &str) -> Result<Option<&'static str>, regex::Error> {
    if email.trim().is_empty() {
        return Ok(Some("Email address is required"));
    }
    if email.chars().count() > MAX_EMAIL_CHARS {
        return Ok(Some("Email address must be less than 254 characters"));
    }
    if !email.contains('@') {
        return Ok(Some(
            "Please use correct formatting. Example: address@email.com",
        ));
    }
    let regex = EMAIL_REGEX.as_ref().map_err(|err| err.clone())?;
    if !regex.is_match(email) {
        return Ok(Some("Please enter a valid email address"));
    }

    let mut parts = email.split('@');
    let local_part = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();
    if local_part.chars().count() > MAX_LOCAL_PART_CHARS {
        Ok(Some("Local part of email cannot exceed 64 characters"))
    } else if domain.starts_with('-') || domain.ends_with('-') {
        Ok(Some("Domain name cannot start or end with a hyphen"))
    } else if domain.contains("..") {
        Ok(Some("Domain name cannot contain consecutive dots"))
    } else {
        Ok(None)
    }
}

/// Gate for the submit control. Not the authoritative validity check.
pub fn is_form_empty(form: &FormData, holiday_info: Option<&Holiday>) -> bool {
    form.first_name.trim().is_empty()
        || form.last_name.trim().is_empty()
        || form.email.trim().is_empty()
        || form.photo.is_none()
        || (form.time_slot().is_none() && holiday_info.is_none())
}

/// Parses `YYYY-MM-DD` date text entered by the user.
pub fn parse_date_input(raw: &str) -> Result<NaiveDate, &'static str> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| INVALID_DATE)
}

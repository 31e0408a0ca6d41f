pub mod calendar;
pub mod holiday_service;
pub mod submission;
pub mod submission_service;
pub mod validation;

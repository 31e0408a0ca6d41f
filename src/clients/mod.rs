pub mod holiday_client;
pub mod submission_client;

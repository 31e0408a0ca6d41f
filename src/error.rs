use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config line {line}: {content}")]
    InvalidLine { line: usize, content: String },
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

#[derive(Debug, Error)]
pub enum HolidayFetchError {
    #[error("holiday request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("holiday request returned status {0}")]
    Status(u16),
    #[error("failed to decode holiday list: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("booking request failed: {0}")]
    Request(#[from] reqwest::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalendarError {
    #[error("month index {0} is out of range 0..=11")]
    InvalidMonth(u32),
    #[error("date {year}-{month:02}-{day:02} is out of range")]
    OutOfRange { year: i32, month: u32, day: u32 },
}

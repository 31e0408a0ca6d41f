use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const NATIONAL_HOLIDAY: &str = "NATIONAL_HOLIDAY";
pub const OBSERVANCE: &str = "OBSERVANCE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HolidayType {
    NationalHoliday,
    Observance,
    Other(String),
}

impl From<String> for HolidayType {
    fn from(value: String) -> Self {
        match value.as_str() {
            NATIONAL_HOLIDAY => HolidayType::NationalHoliday,
            OBSERVANCE => HolidayType::Observance,
            _ => HolidayType::Other(value),
        }
    }
}

impl From<HolidayType> for String {
    fn from(value: HolidayType) -> Self {
        match value {
            HolidayType::NationalHoliday => NATIONAL_HOLIDAY.to_string(),
            HolidayType::Observance => OBSERVANCE.to_string(),
            HolidayType::Other(other) => other,
        }
    }
}

/// One entry of the provider's holiday list. Unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    pub name: String,
    /// `YYYY-MM-DD`
    pub date: String,
    #[serde(rename = "type")]
    pub holiday_type: HolidayType,
    #[serde(default)]
    pub country: String,
}

impl Holiday {
    pub fn is_national(&self) -> bool {
        self.holiday_type == HolidayType::NationalHoliday
    }

    pub fn is_observance(&self) -> bool {
        self.holiday_type == HolidayType::Observance
    }

    pub fn falls_on(&self, date: NaiveDate) -> bool {
        self.date == format_date(date)
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

use std::collections::HashMap;
use std::fs;

use chrono_tz::Tz;

use crate::error::ConfigError;

pub const DEFAULT_HOLIDAY_API_URL: &str = "https://api.api-ninjas.com/v1/holidays";
pub const DEFAULT_COUNTRY: &str = "PL";
pub const DEFAULT_SUBMIT_URL: &str = "http://letsworkout.pl/submit";
pub const DEFAULT_TIME_SLOTS: [&str; 7] = [
    "08:00", "10:00", "12:00", "14:00", "16:30", "18:30", "20:00",
];
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Europe::Warsaw;
pub const DEFAULT_AGE: i64 = 18;

/// Raw `KEY=VALUE` pairs read from the file named by `CONFIG_FILE`.
#[derive(Debug, Default, Clone)]
pub struct AppConfig {
    values: HashMap<String, String>,
}

impl AppConfig {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut values = HashMap::new();
        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
            let Some((key, value)) = trimmed.split_once('=') else {
                return Err(ConfigError::InvalidLine {
                    line: idx + 1,
                    content: line.to_string(),
                });
            };
            let key = key.trim();
            let mut value = value.trim().to_string();
            if value.len() >= 2
                && ((value.starts_with('"') && value.ends_with('"'))
                    || (value.starts_with('\'') && value.ends_with('\'')))
            {
                value = value[1..value.len() - 1].to_string();
            }
            values.insert(key.to_string(), value);
        }
        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Immutable settings injected into the form at startup.
#[derive(Debug, Clone)]
pub struct BookingConfig {
    pub holiday_api_url: String,
    pub holiday_api_key: String,
    pub country: String,
    pub submit_url: String,
    pub time_slots: Vec<String>,
    pub timezone: Tz,
    pub default_age: i64,
    pub log_filter: Option<String>,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            holiday_api_url: DEFAULT_HOLIDAY_API_URL.to_string(),
            holiday_api_key: String::new(),
            country: DEFAULT_COUNTRY.to_string(),
            submit_url: DEFAULT_SUBMIT_URL.to_string(),
            time_slots: DEFAULT_TIME_SLOTS.iter().map(|slot| slot.to_string()).collect(),
            timezone: DEFAULT_TIMEZONE,
            default_age: DEFAULT_AGE,
            log_filter: None,
        }
    }
}

impl BookingConfig {
    /// Builds the config from a key lookup, keeping defaults for absent keys.
    pub fn from_lookup<F>(get_prop: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(url) = get_prop("HOLIDAY_API_URL") {
            config.holiday_api_url = url;
        }
        if let Some(key) = get_prop("HOLIDAY_API_KEY") {
            config.holiday_api_key = key;
        }
        if let Some(country) = get_prop("HOLIDAY_COUNTRY") {
            config.country = country;
        }
        if let Some(url) = get_prop("SUBMIT_URL") {
            config.submit_url = url;
        }
        if let Some(raw) = get_prop("TIME_SLOTS") {
            let slots: Vec<String> = raw
                .split(',')
                .map(|slot| slot.trim().to_string())
                .filter(|slot| !slot.is_empty())
                .collect();
            if slots.is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "TIME_SLOTS".to_string(),
                    value: raw,
                });
            }
            config.time_slots = slots;
        }
        if let Some(raw) = get_prop("TIMEZONE") {
            config.timezone = raw.parse::<Tz>().map_err(|_| ConfigError::InvalidValue {
                key: "TIMEZONE".to_string(),
                value: raw.clone(),
            })?;
        }
        if let Some(raw) = get_prop("DEFAULT_AGE") {
            config.default_age = raw.trim().parse::<i64>().map_err(|_| ConfigError::InvalidValue {
                key: "DEFAULT_AGE".to_string(),
                value: raw.clone(),
            })?;
        }
        config.log_filter = get_prop("BOOKING_LOG");
        Ok(config)
    }

    pub fn is_time_slot(&self, time: &str) -> bool {
        self.time_slots.iter().any(|slot| slot == time)
    }
}

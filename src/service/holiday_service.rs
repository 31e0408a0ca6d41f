use async_trait::async_trait;

use crate::clients::holiday_client;
use crate::config::BookingConfig;
use crate::error::HolidayFetchError;
use crate::models::holiday::Holiday;

#[async_trait]
pub trait HolidaySource: Send + Sync {
    async fn holidays_for_year(&self, year: i32) -> Result<Vec<Holiday>, HolidayFetchError>;
}

pub struct HolidayService {
    client: reqwest::Client,
    base_url: String,
    country: String,
    api_key: String,
}

impl HolidayService {
    pub fn new(base_url: String, country: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            country,
            api_key,
        }
    }

    pub fn from_config(config: &BookingConfig) -> Self {
        Self::new(
            config.holiday_api_url.clone(),
            config.country.clone(),
            config.holiday_api_key.clone(),
        )
    }
}

#[async_trait]
impl HolidaySource for HolidayService {
    async fn holidays_for_year(&self, year: i32) -> Result<Vec<Holiday>, HolidayFetchError> {
        holiday_client::fetch_holidays(
            &self.client,
            &self.base_url,
            &self.country,
            year,
            &self.api_key,
        )
        .await
    }
}

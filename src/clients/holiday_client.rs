use reqwest::StatusCode;

use crate::error::HolidayFetchError;
use crate::models::holiday::Holiday;

pub const API_KEY_HEADER: &str = "X-Api-Key";

pub async fn fetch_holidays(
    client: &reqwest::Client,
    base_url: &str,
    country: &str,
    year: i32,
    api_key: &str,
) -> Result<Vec<Holiday>, HolidayFetchError> {
    let year = year.to_string();
    let response = client
        .get(base_url)
        .query(&[("country", country), ("year", year.as_str())])
        .header(API_KEY_HEADER, api_key)
        .send()
        .await?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(HolidayFetchError::Status(status.as_u16()));
    }

    let text = response.text().await?;
    let holidays: Vec<Holiday> = serde_json::from_str(&text)?;
    Ok(holidays)
}

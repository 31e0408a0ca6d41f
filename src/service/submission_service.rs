use async_trait::async_trait;

use crate::clients::submission_client;
use crate::config::BookingConfig;
use crate::error::SubmitError;
use crate::models::booking::{BookingPayload, SubmitResponse};

#[async_trait]
pub trait BookingSubmitter: Send + Sync {
    async fn submit(&self, payload: &BookingPayload) -> Result<SubmitResponse, SubmitError>;
}

pub struct HttpBookingSubmitter {
    client: reqwest::Client,
    url: String,
}

impl HttpBookingSubmitter {
    pub fn new(url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }

    pub fn from_config(config: &BookingConfig) -> Self {
        Self::new(config.submit_url.clone())
    }
}

#[async_trait]
impl BookingSubmitter for HttpBookingSubmitter {
    async fn submit(&self, payload: &BookingPayload) -> Result<SubmitResponse, SubmitError> {
        let response = submission_client::post_booking(&self.client, &self.url, payload).await?;
        Ok(response)
    }
}

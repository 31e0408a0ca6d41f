use crate::models::booking::{BookingPayload, SubmitResponse};

pub async fn post_booking(
    client: &reqwest::Client,
    url: &str,
    payload: &BookingPayload,
) -> Result<SubmitResponse, reqwest::Error> {
    let response = client
        .post(url)
        .header("Content-Type", "application/json")
        .json(payload)
        .send()
        .await?;

    let status = response.status().as_u16();
    // Body only feeds the error message; an unreadable one reads as empty.
    let body = response.text().await.unwrap_or_default();
    Ok(SubmitResponse { status, body })
}

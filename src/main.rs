#![allow(non_snake_case)]

mod cli;

use std::env;
use std::sync::Arc;

use workoutBooking::config::{AppConfig, BookingConfig};
use workoutBooking::logging::init_logging;

#[tokio::main]
async fn main() {
    let config = match env::var("CONFIG_FILE") {
        Ok(path) => AppConfig::from_file(&path).unwrap_or_else(|e| {
            eprintln!("Ignoring config file: {}", e);
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    };

    let get_prop = |key: &str| -> Option<String> {
        config.get(key).or_else(|| env::var(key).ok())
    };

    let booking_config = match BookingConfig::from_lookup(get_prop) {
        Ok(booking_config) => booking_config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };
    init_logging(booking_config.log_filter.as_deref());
    if booking_config.holiday_api_key.is_empty() {
        tracing::warn!("HOLIDAY_API_KEY is not set; holiday lookups will fail");
    }

    cli::cli(Arc::new(booking_config)).await;
}

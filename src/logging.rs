use tracing_subscriber::EnvFilter;

pub const DEFAULT_LOG_FILTER: &str = "off";

/// Installs the stderr subscriber. Logging stays off unless a filter such as
/// `workoutBooking=debug` is configured through `BOOKING_LOG`.
pub fn init_logging(filter: Option<&str>) {
    let filter = EnvFilter::try_new(filter.unwrap_or(DEFAULT_LOG_FILTER))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

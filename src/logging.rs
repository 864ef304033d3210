use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

pub const LOG_ENV: &str = "POLYNOMIAL_REGRESSION_LOG";

const DEFAULT_FILTER: &str = "polynomial_regression_fuw=info,poly_fit=info,likelihood=info";

/// Initialises tracing.
pub fn init() -> Result<(), Box<dyn std::error::Error>> {
    let format_filter =
        EnvFilter::try_from_env(LOG_ENV).or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))?;
    let format_layer = tracing_subscriber::fmt::layer()
        .without_time()
        .with_filter(format_filter);

    tracing_subscriber::registry().with(format_layer).try_init()?;

    Ok(())
}

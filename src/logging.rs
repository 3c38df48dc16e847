use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "EDITDESK_LOG";
const DEFAULT_FILTER: &str = "info";

/// Installs the global fmt subscriber. Safe to call more than once.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    if let Err(err) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
    {
        tracing::debug!("tracing subscriber already installed: {err}");
    }
}

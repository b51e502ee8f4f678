//! Tracing subscriber setup

use crate::settings::Settings;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber
///
/// `RUST_LOG` wins over [`Settings::log_filter`]. Development mode logs in
/// a human-readable format, other environments log JSON lines. Logs go to
/// stderr so command output stays machine-readable.
pub fn init(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if settings.is_dev_mode() {
        builder.pretty().init();
    } else {
        builder.json().init();
    }
}

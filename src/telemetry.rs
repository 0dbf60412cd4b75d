use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::fmt::MakeWriter;

/// Analytics events stay visible whatever the default level is.
const ANALYTICS_DIRECTIVE: &str = "analytics=info";

/// Filter used when `RUST_LOG` is unset: `default_level` plus analytics.
pub fn default_filter(default_level: &str) -> Result<EnvFilter, ParseError> {
    Ok(EnvFilter::try_new(default_level)?.add_directive(ANALYTICS_DIRECTIVE.parse()?))
}

/// Build the env filter: `RUST_LOG` wins, otherwise [`default_filter`].
pub fn env_filter(default_level: &str) -> Result<EnvFilter, ParseError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => default_filter(default_level),
    }
}

/// Install a fmt subscriber writing to `sink`.
///
/// Calling it twice is harmless; the second install is skipped.
pub fn init_subscriber<Sink>(default_level: &str, sink: Sink) -> Result<(), ParseError>
where
    Sink: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_level)?)
        .with_writer(sink)
        .with_target(false)
        .try_init();
    Ok(())
}

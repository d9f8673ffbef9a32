use std::sync::Once;

/// Used when neither the config nor `RUST_LOG` names a filter. Keeps the
/// wgpu/naga internals quiet.
pub const DEFAULT_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn";

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g.
/// "pulse_engine=debug,wgpu=warn").
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger. Later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = resolve_filter(config.env_filter, std::env::var("RUST_LOG").ok());

        env_logger::Builder::new()
            .parse_filters(&filter)
            .write_style(config.write_style)
            .init();

        log::debug!("logging initialized ({filter})");
    });
}

/// Explicit filter, then `RUST_LOG`, then [`DEFAULT_FILTER`]. Blank values
/// count as unset at every level.
fn resolve_filter(explicit: Option<String>, env: Option<String>) -> String {
    let set = |f: &String| !f.trim().is_empty();

    explicit
        .filter(set)
        .or_else(|| env.filter(set))
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

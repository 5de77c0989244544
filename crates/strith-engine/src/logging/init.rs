use std::sync::Once;

/// Process-wide logger setup.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "strith_engine=debug,wgpu_core=warn"). When unset, `RUST_LOG` is consulted,
/// then [`DEFAULT_FILTER`].
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

/// Filter used when neither the config nor `RUST_LOG` provide one.
///
/// wgpu's internal crates are chatty at `info`; keep them at `warn`.
pub const DEFAULT_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn";

static INIT: Once = Once::new();

/// Installs `env_logger` as the `log` backend once.
///
/// Subsequent calls are ignored. If another logger was installed first the
/// error is reported on stderr and the existing logger is kept.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = config
            .env_filter
            .or_else(|| std::env::var("RUST_LOG").ok())
            .unwrap_or_else(|| DEFAULT_FILTER.to_string());

        let mut builder = env_logger::Builder::new();
        builder.parse_filters(&filter);
        builder.write_style(config.write_style);

        if let Err(e) = builder.try_init() {
            eprintln!("strith: logger already installed: {e}");
            return;
        }

        log::debug!("logging initialized (filter: {filter})");
    });
}

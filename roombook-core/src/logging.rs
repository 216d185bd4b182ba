use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    reload,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

use crate::config::LoggingConfig;

/// Handle to the process-wide minimum log level.
///
/// The level is the one piece of ambient state the bootstrap touches, so it is
/// changed through this handle instead of a global setter.
pub struct LogControl {
    handle: reload::Handle<LevelFilter, Registry>,
    /// An explicitly configured level is never overridden by the bootstrap
    pinned: bool,
    // Keeps the layer alive when it was never installed into a subscriber.
    _detached: Option<reload::Layer<LevelFilter, Registry>>,
}

impl LogControl {
    /// Build a control whose layer is not installed anywhere. Used in tests and
    /// by callers that manage their own subscriber.
    #[must_use]
    pub fn detached(level: LevelFilter, pinned: bool) -> Self {
        let (layer, handle) = reload::Layer::new(level);
        Self {
            handle,
            pinned,
            _detached: Some(layer),
        }
    }

    #[must_use]
    pub fn current_level(&self) -> Option<LevelFilter> {
        self.handle.clone_current()
    }

    #[must_use]
    pub const fn is_pinned(&self) -> bool {
        self.pinned
    }

    pub fn set_level(&self, level: LevelFilter) -> anyhow::Result<()> {
        self.handle
            .modify(|current| *current = level)
            .map_err(|e| anyhow::anyhow!("Failed to change log level: {e}"))
    }
}

/// Initialize structured logging based on configuration
///
/// Supports both JSON (production) and pretty (development) formats.
/// `RUST_LOG` directives are honoured on top of the reloadable level.
pub fn init_logging(config: &LoggingConfig, debug: bool) -> anyhow::Result<LogControl> {
    let level = initial_level(config, debug)?;
    let (level_layer, handle) = reload::Layer::new(level);

    let env_filter = EnvFilter::try_from_default_env().ok();
    let registry = tracing_subscriber::registry().with(level_layer).with(env_filter);

    if config.format.as_str() == "json" {
        let json_layer = fmt::layer()
            .json()
            .with_span_events(FmtSpan::CLOSE)
            .with_current_span(true)
            .with_target(true)
            .with_line_number(true);
        registry.with(json_layer).try_init()?;
    } else {
        let pretty_layer = fmt::layer()
            .with_target(true)
            .with_line_number(true)
            .with_file(false);
        registry.with(pretty_layer).try_init()?;
    }

    Ok(LogControl {
        handle,
        pinned: config.level.is_some(),
        _detached: None,
    })
}

/// Raise the minimum level to info when not running in debug mode.
///
/// No effect in debug mode or when the level was pinned by configuration.
pub fn configure_logging(control: &LogControl, debug: bool) -> anyhow::Result<()> {
    if debug || control.is_pinned() {
        return Ok(());
    }
    control.set_level(LevelFilter::INFO)
}

fn initial_level(config: &LoggingConfig, debug: bool) -> anyhow::Result<LevelFilter> {
    match &config.level {
        Some(level) => Ok(LevelFilter::from_level(parse_log_level(level)?)),
        None if debug => Ok(LevelFilter::DEBUG),
        None => Ok(LevelFilter::WARN),
    }
}

/// Parse log level string to tracing Level
fn parse_log_level(level: &str) -> anyhow::Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" | "warning" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(anyhow::anyhow!("Invalid log level: {level}")),
    }
}

use std::sync::Once;

use env_logger::WriteStyle;
use log::LevelFilter;

/// Logger configuration for [`init_logging`].
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// `env_logger` filter directives, e.g. `"geoprim_engine=debug,wgpu=warn"`.
    /// Takes precedence over `RUST_LOG`.
    pub env_filter: Option<String>,
    pub write_style: WriteStyle,
}

impl LoggingConfig {
    pub fn with_filter(filter: impl Into<String>) -> Self {
        Self {
            env_filter: Some(filter.into()),
            ..Self::default()
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: WriteStyle::Auto,
        }
    }
}

/// Where the active filter came from.
#[derive(Debug, Clone, PartialEq, Eq)]
enum FilterSource {
    Explicit(String),
    Env(String),
    Fallback(LevelFilter),
}

fn resolve_filter(explicit: Option<String>, env: Option<String>) -> FilterSource {
    match (explicit, env) {
        (Some(filter), _) => FilterSource::Explicit(filter),
        (None, Some(filter)) if !filter.trim().is_empty() => FilterSource::Env(filter),
        _ => FilterSource::Fallback(LevelFilter::Info),
    }
}

static INIT: Once = Once::new();

/// Installs an `env_logger` backend for the `log` facade, once per process.
///
/// Later calls do nothing. If another logger is already installed it is left
/// in place.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let source = resolve_filter(config.env_filter, std::env::var("RUST_LOG").ok());

        let mut builder = env_logger::Builder::new();
        match &source {
            FilterSource::Explicit(filter) | FilterSource::Env(filter) => {
                builder.parse_filters(filter);
            }
            FilterSource::Fallback(level) => {
                builder.filter_level(*level);
            }
        }
        builder.write_style(config.write_style);

        match builder.try_init() {
            Ok(()) => log::debug!("logger installed ({source:?})"),
            Err(_) => log::debug!("logger already installed; keeping it"),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_filter_wins_over_env() {
        let source = resolve_filter(Some("warn".into()), Some("trace".into()));
        assert_eq!(source, FilterSource::Explicit("warn".into()));
    }

    #[test]
    fn env_filter_used_when_no_explicit_one() {
        let source = resolve_filter(None, Some("geoprim_engine=debug".into()));
        assert_eq!(source, FilterSource::Env("geoprim_engine=debug".into()));
    }

    #[test]
    fn blank_env_falls_back_to_info() {
        let info = FilterSource::Fallback(LevelFilter::Info);
        assert_eq!(resolve_filter(None, Some("  ".into())), info);
        assert_eq!(resolve_filter(None, None), info);
    }

    #[test]
    fn with_filter_keeps_auto_style() {
        let config = LoggingConfig::with_filter("debug");
        assert_eq!(config.env_filter.as_deref(), Some("debug"));
        assert!(matches!(config.write_style, WriteStyle::Auto));
    }
}

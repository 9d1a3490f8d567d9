//! Subscriber setup for the theograph binaries.
//!
//! `RUST_LOG` selects the filter (default `info`). `LOG_FORMAT=json` switches
//! to JSON lines; `LOG_SPANS` and `LOG_LOCATION` add span events and
//! file/line fields.

use std::env;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub service_name: String,
    pub format: LogFormat,
    /// Log span open/close events
    pub log_spans: bool,
    pub include_location: bool,
}

impl TracingConfig {
    /// Settings for `service_name`, read from the process environment.
    pub fn for_service(service_name: impl Into<String>) -> Self {
        Self::from_lookup(service_name, |key| env::var(key).ok())
    }

    fn from_lookup<F>(service_name: impl Into<String>, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let flag = |key: &str| {
            lookup(key)
                .map(|v| v.trim().eq_ignore_ascii_case("true"))
                .unwrap_or(false)
        };

        let format = match lookup("LOG_FORMAT") {
            Some(v) if v.trim().eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Self {
            service_name: service_name.into(),
            format,
            log_spans: flag("LOG_SPANS"),
            include_location: flag("LOG_LOCATION"),
        }
    }
}

/// Install the global subscriber. A second call keeps the first subscriber.
pub fn init_tracing(config: TracingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let span_events = if config.log_spans {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let registry = tracing_subscriber::registry().with(filter);
    let installed = match config.format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_events(span_events)
                    .with_file(config.include_location)
                    .with_line_number(config.include_location),
            )
            .try_init(),
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .with_span_events(span_events)
                    .with_file(config.include_location)
                    .with_line_number(config.include_location),
            )
            .try_init(),
    };

    if installed.is_ok() {
        tracing::info!(
            service = %config.service_name,
            format = ?config.format,
            "Tracing initialized"
        );
    }
}

//! Tracing subscriber configuration for funchain.
//!
//! The chain crates only emit events through [`tracing`]; nothing is printed
//! until a subscriber is installed. [`TracingConfig`] installs one:
//!
//! | Level | What is logged |
//! |-------|----------------|
//! | `WARN` | panics contained in hooks and cleanups |
//! | `DEBUG` | the `chain` span, failed steps, skipped steps and destinations |
//! | `TRACE` | every step start, dropped excess arguments |
//!
//! # Example
//!
//! ```
//! use funchain_tracing::{TracingConfig, TracingFormat};
//! use tracing::Level;
//!
//! TracingConfig::new()
//!     .with_level(Level::DEBUG)
//!     .with_format(TracingFormat::Compact)
//!     .with_env_filter("funchain_chain=trace")
//!     .init();
//! ```

use core::fmt;
use core::str::FromStr;

use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

// ─────────────────────────────────────────────────────────────────────────────
// TracingFormat
// ─────────────────────────────────────────────────────────────────────────────

/// Tracing output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TracingFormat {
    /// Human-readable multi-line output (default).
    #[default]
    Pretty,
    /// Compact single-line output.
    Compact,
    /// JSON structured output for log aggregation.
    Json,
}

impl fmt::Display for TracingFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TracingFormat::Pretty => f.write_str("pretty"),
            TracingFormat::Compact => f.write_str("compact"),
            TracingFormat::Json => f.write_str("json"),
        }
    }
}

/// Error returned when parsing an unknown [`TracingFormat`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tracing format '{0}', expected pretty, compact or json")]
pub struct ParseFormatError(String);

impl FromStr for TracingFormat {
    type Err = ParseFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(TracingFormat::Pretty),
            "compact" => Ok(TracingFormat::Compact),
            "json" => Ok(TracingFormat::Json),
            _ => Err(ParseFormatError(s.to_string())),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// TracingConfig
// ─────────────────────────────────────────────────────────────────────────────

/// Subscriber settings.
///
/// ```
/// use funchain_tracing::{TracingConfig, TracingFormat};
/// use tracing::Level;
///
/// // Development: every step, with span enter/exit
/// let dev = TracingConfig::new()
///     .with_level(Level::TRACE)
///     .with_span_events(true);
///
/// // Production: JSON, only contained panics
/// let prod = TracingConfig::new()
///     .with_level(Level::WARN)
///     .with_format(TracingFormat::Json);
/// # let _ = (dev, prod);
/// ```
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Maximum log level, used when no filter is set or the filter is invalid.
    pub level: Level,
    /// Output format.
    pub format: TracingFormat,
    /// Directive string such as `funchain_chain=debug,my_app=info`.
    pub env_filter: Option<String>,
    /// Whether span enter/exit events are logged.
    pub span_events: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: TracingFormat::Pretty,
            env_filter: None,
            span_events: false,
        }
    }
}

impl TracingConfig {
    /// Creates the default configuration: `INFO`, pretty, no span events.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum log level.
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Sets the output format.
    #[must_use]
    pub fn with_format(mut self, format: TracingFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets a directive string (`target=level,...`).
    #[must_use]
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Enables span enter/exit events.
    #[must_use]
    pub fn with_span_events(mut self, enabled: bool) -> Self {
        self.span_events = enabled;
        self
    }

    /// Builds the filter. An invalid directive string falls back to `level`.
    #[must_use]
    pub fn filter(&self) -> EnvFilter {
        match &self.env_filter {
            Some(directives) => EnvFilter::try_new(directives).unwrap_or_else(|err| {
                tracing::warn!(%err, %directives, "invalid tracing filter, using level");
                EnvFilter::new(self.level.as_str())
            }),
            None => EnvFilter::new(self.level.as_str()),
        }
    }

    fn fmt_span(&self) -> FmtSpan {
        if self.span_events {
            FmtSpan::ENTER | FmtSpan::EXIT
        } else {
            FmtSpan::NONE
        }
    }

    /// Installs the global subscriber.
    ///
    /// Returns `false` when a global subscriber was already installed; the
    /// existing one is kept.
    pub fn init(&self) -> bool {
        let registry = tracing_subscriber::registry().with(self.filter());
        let layer = tracing_subscriber::fmt::layer().with_span_events(self.fmt_span());

        let installed = match self.format {
            TracingFormat::Pretty => registry.with(layer.pretty()).try_init(),
            TracingFormat::Compact => registry.with(layer.compact()).try_init(),
            TracingFormat::Json => registry.with(layer.json()).try_init(),
        }
        .is_ok();

        if installed {
            tracing::debug!(level = %self.level, format = %self.format, "tracing initialized");
        }
        installed
    }
}

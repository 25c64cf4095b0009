//! Rulebook Logging
//!
//! Lightweight structured logging shared by the Rulebook crates. Output goes
//! to stderr and is controlled entirely through environment variables, so a
//! library user never has to install a subscriber to see what the rule
//! engine is doing.
//!
//! # Usage
//!
//! ```rust
//! use rulebook_log::{debug, trace, warn};
//!
//! debug!("Parsed {} rules", 3);
//! trace!(target: "rulebook::validator", "Checking field {}", "email");
//! warn!("Ignoring unknown card type {}", "jcb");
//! ```
//!
//! # Environment Variables
//!
//! - `RULEBOOK_DEBUG=1` - Shortcut for `RULEBOOK_LOG_LEVEL=debug`
//! - `RULEBOOK_LOG_LEVEL=trace|debug|info|warn|error|off` - Minimum level (default `warn`)
//! - `RULEBOOK_LOG_FORMAT=json|compact|pretty` - Output format (default `json`)
//! - `RULEBOOK_LOG_TIMESTAMPS=1|0` - Include timestamps (default on)

use once_cell::sync::Lazy;
use std::env;
use std::io::Write;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};

/// Log level, ordered from most to least verbose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Level {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    /// Nothing is emitted
    Off = 5,
}

impl Level {
    /// Upper-case level name as it appears in output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Off => "OFF",
        }
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Level::Trace,
            1 => Level::Debug,
            2 => Level::Info,
            3 => Level::Warn,
            4 => Level::Error,
            _ => Level::Off,
        }
    }
}

impl FromStr for Level {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Ok(Level::Trace),
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warn" | "warning" => Ok(Level::Warn),
            "error" => Ok(Level::Error),
            "off" | "none" => Ok(Level::Off),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// One JSON object per line
    Json,
    /// `HH:MM:SS L target: message`
    Compact,
    /// Full timestamp, padded level and bracketed target
    Pretty,
}

impl FromStr for Format {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "compact" => Ok(Format::Compact),
            "pretty" => Ok(Format::Pretty),
            _ => Err(()),
        }
    }
}

// Minimum level; UNSET until configuration is loaded or overridden.
const UNSET: u8 = u8::MAX;

static LOG_LEVEL: AtomicU8 = AtomicU8::new(UNSET);

static CONFIG: Lazy<LogConfig> = Lazy::new(|| {
    let config = LogConfig::from_env();
    // A set_level override made before the first load wins over the env.
    let _ = LOG_LEVEL.compare_exchange(
        UNSET,
        config.level as u8,
        Ordering::SeqCst,
        Ordering::SeqCst,
    );
    config
});

#[inline]
fn level_raw() -> u8 {
    match LOG_LEVEL.load(Ordering::Relaxed) {
        UNSET => {
            init();
            LOG_LEVEL.load(Ordering::Relaxed)
        }
        raw => raw,
    }
}

/// Logging configuration, read once from the environment.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Minimum level that is written
    pub level: Level,
    /// Output format
    pub format: Format,
    /// Whether lines carry a timestamp
    pub timestamps: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::Warn,
            format: Format::Json,
            timestamps: true,
        }
    }
}

impl LogConfig {
    /// Build the configuration from `RULEBOOK_*` environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let debug = env_flag("RULEBOOK_DEBUG").unwrap_or(false);

        let level = env::var("RULEBOOK_LOG_LEVEL")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(if debug { Level::Debug } else { defaults.level });

        let format = env::var("RULEBOOK_LOG_FORMAT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.format);

        let timestamps = env_flag("RULEBOOK_LOG_TIMESTAMPS").unwrap_or(defaults.timestamps);

        Self {
            level,
            format,
            timestamps,
        }
    }
}

fn env_flag(key: &str) -> Option<bool> {
    env::var(key)
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

/// Force configuration loading. Logging initializes itself on first use.
pub fn init() {
    Lazy::force(&CONFIG);
}

/// Active configuration.
pub fn config() -> &'static LogConfig {
    &CONFIG
}

/// Whether a message at `level` would be written.
#[inline]
pub fn is_level_enabled(level: Level) -> bool {
    level != Level::Off && level as u8 >= level_raw()
}

/// Current minimum level.
pub fn current_level() -> Level {
    Level::from_u8(level_raw())
}

/// Override the minimum level at runtime.
pub fn set_level(level: Level) {
    LOG_LEVEL.store(level as u8, Ordering::SeqCst);
}

#[doc(hidden)]
pub fn log(level: Level, target: &str, message: &str) {
    if !is_level_enabled(level) {
        return;
    }

    let line = render(config(), level, target, message);
    let _ = writeln!(std::io::stderr().lock(), "{}", line);
}

fn render(config: &LogConfig, level: Level, target: &str, message: &str) -> String {
    match config.format {
        Format::Json => render_json(level, target, message),
        Format::Compact => {
            let mut line = String::new();
            if config.timestamps {
                line.push_str(&chrono::Local::now().format("%H:%M:%S ").to_string());
            }
            let initial = level.as_str().chars().next().unwrap_or('?');
            line.push_str(&format!("{} {}: {}", initial, target, message));
            line
        }
        Format::Pretty => {
            let mut line = String::new();
            if config.timestamps {
                line.push_str(
                    &chrono::Local::now()
                        .format("%Y-%m-%d %H:%M:%S%.3f ")
                        .to_string(),
                );
            }
            line.push_str(&format!("{:5} [{}] {}", level.as_str(), target, message));
            line
        }
    }
}

#[cfg(feature = "json")]
fn render_json(level: Level, target: &str, message: &str) -> String {
    #[derive(serde::Serialize)]
    struct Entry<'a> {
        timestamp: String,
        level: &'a str,
        target: &'a str,
        message: &'a str,
    }

    let entry = Entry {
        timestamp: chrono::Utc::now().to_rfc3339(),
        level: level.as_str(),
        target,
        message,
    };
    serde_json::to_string(&entry).unwrap_or_else(|_| message.to_string())
}

#[cfg(not(feature = "json"))]
fn render_json(level: Level, target: &str, message: &str) -> String {
    format!("{} {}: {}", level.as_str(), target, message)
}

#[doc(hidden)]
#[macro_export]
macro_rules! __log {
    ($level:expr, $target:expr, $($arg:tt)+) => {
        if $crate::is_level_enabled($level) {
            $crate::log($level, $target, &format!($($arg)+));
        }
    };
}

/// Log a trace message.
#[macro_export]
macro_rules! trace {
    (target: $target:expr, $($arg:tt)+) => { $crate::__log!($crate::Level::Trace, $target, $($arg)+) };
    ($($arg:tt)+) => { $crate::__log!($crate::Level::Trace, module_path!(), $($arg)+) };
}

/// Log a debug message.
#[macro_export]
macro_rules! debug {
    (target: $target:expr, $($arg:tt)+) => { $crate::__log!($crate::Level::Debug, $target, $($arg)+) };
    ($($arg:tt)+) => { $crate::__log!($crate::Level::Debug, module_path!(), $($arg)+) };
}

/// Log an info message.
#[macro_export]
macro_rules! info {
    (target: $target:expr, $($arg:tt)+) => { $crate::__log!($crate::Level::Info, $target, $($arg)+) };
    ($($arg:tt)+) => { $crate::__log!($crate::Level::Info, module_path!(), $($arg)+) };
}

/// Log a warning message.
#[macro_export]
macro_rules! warn {
    (target: $target:expr, $($arg:tt)+) => { $crate::__log!($crate::Level::Warn, $target, $($arg)+) };
    ($($arg:tt)+) => { $crate::__log!($crate::Level::Warn, module_path!(), $($arg)+) };
}

/// Log an error message.
#[macro_export]
macro_rules! error {
    (target: $target:expr, $($arg:tt)+) => { $crate::__log!($crate::Level::Error, $target, $($arg)+) };
    ($($arg:tt)+) => { $crate::__log!($crate::Level::Error, module_path!(), $($arg)+) };
}

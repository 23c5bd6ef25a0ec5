//! A small, zero-dependency logger for the intern workspace.
//!
//! Messages go to stderr, tagged with a colored level and the module path of
//! the call site. The minimum level is process-global and can be changed at
//! any time, either directly or from the `INTERN_LOG` environment variable.
//!
//! # Example
//!
//! ```
//! use intern_log::{debug, trace, Level};
//!
//! intern_log::set_level(Level::Debug);
//!
//! let pages = 3;
//! debug!("arena holds {} pages", pages);
//! trace!("not printed at debug level");
//! ```

use std::fmt::{self, Arguments};
use std::io::Write;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};

/// Environment variable read by [`init_from_env`].
pub const ENV_VAR: &str = "INTERN_LOG";

/// Severity of a log message, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Failures the caller must act on.
    Error = 0,
    /// Rejected requests and suspicious usage.
    Warn = 1,
    /// Coarse lifecycle events.
    Info = 2,
    /// Checkpoint and re-layout activity.
    Debug = 3,
    /// Per-page allocator activity.
    Trace = 4,
}

impl Level {
    const fn color_code(self) -> &'static str {
        match self {
            Level::Error => "\x1b[31m",
            Level::Warn => "\x1b[33m",
            Level::Info => "\x1b[32m",
            Level::Debug => "\x1b[36m",
            Level::Trace => "\x1b[35m",
        }
    }

    /// Returns the upper-case name of this level.
    pub const fn as_str(self) -> &'static str {
        match self {
            Level::Error => "ERROR",
            Level::Warn => "WARN",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
            Level::Trace => "TRACE",
        }
    }

    const fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Level::Error,
            1 => Level::Warn,
            2 => Level::Info,
            3 => Level::Debug,
            _ => Level::Trace,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a level name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLevelError {
    input: String,
}

impl fmt::Display for ParseLevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid log level: {:?}", self.input)
    }
}

impl std::error::Error for ParseLevelError {}

impl FromStr for Level {
    type Err = ParseLevelError;

    /// Parses a level name, ignoring case.
    ///
    /// ```
    /// use intern_log::Level;
    ///
    /// assert_eq!("debug".parse::<Level>(), Ok(Level::Debug));
    /// assert_eq!(" WARN ".parse::<Level>(), Ok(Level::Warn));
    /// assert!("loud".parse::<Level>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ERROR" => Ok(Level::Error),
            "WARN" | "WARNING" => Ok(Level::Warn),
            "INFO" => Ok(Level::Info),
            "DEBUG" => Ok(Level::Debug),
            "TRACE" => Ok(Level::Trace),
            _ => Err(ParseLevelError {
                input: s.to_string(),
            }),
        }
    }
}

/// Holds the active minimum level.
pub struct Logger {
    level: AtomicU8,
}

impl Logger {
    const fn new(level: Level) -> Self {
        Logger {
            level: AtomicU8::new(level as u8),
        }
    }

    /// Sets the minimum level; less severe messages are dropped.
    pub fn set_level(&self, level: Level) {
        self.level.store(level as u8, Ordering::Relaxed);
    }

    /// Returns the current minimum level.
    pub fn level(&self) -> Level {
        Level::from_u8(self.level.load(Ordering::Relaxed))
    }

    /// Returns true if a message at `level` would be written.
    pub fn enabled(&self, level: Level) -> bool {
        level as u8 <= self.level.load(Ordering::Relaxed)
    }
}

/// Library code stays quiet unless asked otherwise.
static LOGGER: Logger = Logger::new(Level::Warn);

/// Returns the process-wide logger.
pub fn get_logger() -> &'static Logger {
    &LOGGER
}

/// Sets the minimum level of the process-wide logger.
pub fn set_level(level: Level) {
    LOGGER.set_level(level);
}

/// Parses `s` and applies it as the minimum level.
///
/// ```
/// intern_log::set_level_from_str("trace").unwrap();
/// assert_eq!(intern_log::get_logger().level(), intern_log::Level::Trace);
/// ```
pub fn set_level_from_str(s: &str) -> Result<Level, ParseLevelError> {
    let level = s.parse()?;
    set_level(level);
    Ok(level)
}

/// Applies the level named by the environment variable `var`, if it is set.
///
/// Returns the applied level, or `None` when the variable is unset. An
/// unparsable value leaves the current level untouched.
pub fn init_from_var(var: &str) -> Result<Option<Level>, ParseLevelError> {
    match std::env::var(var) {
        Ok(value) => set_level_from_str(&value).map(Some),
        Err(_) => Ok(None),
    }
}

/// Applies the level named by `INTERN_LOG`, if it is set.
pub fn init_from_env() -> Result<Option<Level>, ParseLevelError> {
    init_from_var(ENV_VAR)
}

#[doc(hidden)]
pub fn __log_with_target(level: Level, target: &str, args: Arguments) {
    const RESET: &str = "\x1b[0m";

    let color = level.color_code();
    let mut stderr = std::io::stderr().lock();
    // A closed stderr is not worth failing the caller over.
    let _ = writeln!(stderr, "{color}[{level}]{RESET} {target}: {args}");
}

/// Logs a message at an explicit level.
///
/// ```
/// use intern_log::{log, Level};
///
/// log!(level: Level::Info, "interned {} strings", 42);
/// ```
#[macro_export]
macro_rules! log {
    (level: $level:expr, $($arg:tt)*) => {{
        let level = $level;
        if $crate::get_logger().enabled(level) {
            $crate::__log_with_target(level, module_path!(), format_args!($($arg)*));
        }
    }};
}

/// Logs at [`Level::Error`].
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Error, $($arg)*)
    };
}

/// Logs at [`Level::Warn`].
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Warn, $($arg)*)
    };
}

/// Logs at [`Level::Info`].
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Info, $($arg)*)
    };
}

/// Logs at [`Level::Debug`].
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Debug, $($arg)*)
    };
}

/// Logs at [`Level::Trace`].
///
/// ```
/// use intern_log::trace;
///
/// # let page = 7;
/// trace!("allocated page {}", page);
/// ```
#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Trace, $($arg)*)
    };
}

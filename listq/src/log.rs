//! Structured JSON logging to stderr.
//!
//! Each line is a JSON object with `level`, `msg`, any extra fields and an
//! ISO 8601 UTC `ts`:
//!
//! ```json
//! {"level":"debug","msg":"rejected filter","resource":"users","kind":"unknown_column","ts":"2025-01-16T10:30:00.000Z"}
//! ```
//!
//! # Usage
//!
//! ```no_run
//! # use listq::log;
//! log::info!("loaded {} resources", 3);
//! log::debug!("only in debug builds");
//!
//! // Structured, key-value fields
//! log!(warn, "rejected filter", resource: "users", kind: "syntax");
//! ```
//!
//! The validators never log. Logging happens in the layers around them
//! (`ListQuery::validate`, the CLI).

use std::fmt::Write as _;
use std::time::{SystemTime, UNIX_EPOCH};

/// Current UTC time as `YYYY-MM-DDTHH:MM:SS.sssZ`.
#[doc(hidden)]
#[must_use]
pub fn __timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    __format_timestamp(now.as_secs(), now.subsec_millis())
}

/// Format seconds since the Unix epoch plus milliseconds.
///
/// Date part uses Howard Hinnant's `civil_from_days`:
/// <https://howardhinnant.github.io/date_algorithms.html#civil_from_days>
#[doc(hidden)]
#[must_use]
#[allow(clippy::similar_names)] // doe/doy are standard date algorithm abbreviations
pub fn __format_timestamp(secs: u64, millis: u32) -> String {
    let days = secs / 86_400;
    let time = secs % 86_400;
    let (hours, minutes, seconds) = (time / 3600, time % 3600 / 60, time % 60);

    // Shift the epoch to 0000-03-01
    let z = days + 719_468;
    let era = z / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + u64::from(month <= 2);

    format!("{year:04}-{month:02}-{day:02}T{hours:02}:{minutes:02}:{seconds:02}.{millis:03}Z")
}

/// Escape a string for a JSON string value.
#[doc(hidden)]
#[must_use]
pub fn __escape_json(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            },
            c => out.push(c),
        }
    }
    out
}

/// Build one JSON log line from level, message and key-value fields.
#[doc(hidden)]
#[must_use]
pub fn __build_log_line(level: &str, msg: &str, fields: &[(&str, &str)]) -> String {
    let mut line = String::with_capacity(48 + msg.len() + fields.len() * 24);
    let _ = write!(
        line,
        r#"{{"level":"{}","msg":"{}""#,
        __escape_json(level),
        __escape_json(msg)
    );
    for (key, value) in fields {
        let _ = write!(line, r#","{}":"{}""#, __escape_json(key), __escape_json(value));
    }
    let _ = write!(line, r#","ts":"{}"}}"#, __timestamp());
    line
}

/// Log an informational message to stderr.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        use std::io::Write;
        let line = $crate::log::__build_log_line("info", &format!($($arg)*), &[]);
        let _ = writeln!(std::io::stderr(), "{}", line);
    }};
}

/// Log a warning to stderr.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        use std::io::Write;
        let line = $crate::log::__build_log_line("warn", &format!($($arg)*), &[]);
        let _ = writeln!(std::io::stderr(), "{}", line);
    }};
}

/// Log an error to stderr.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        use std::io::Write;
        let line = $crate::log::__build_log_line("error", &format!($($arg)*), &[]);
        let _ = writeln!(std::io::stderr(), "{}", line);
    }};
}

/// Log a debug message to stderr. No-op in release builds.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        #[cfg(debug_assertions)]
        {
            use std::io::Write;
            let line = $crate::log::__build_log_line("debug", &format!($($arg)*), &[]);
            let _ = writeln!(std::io::stderr(), "{}", line);
        }
    }};
}

// Re-export with clean names for `log::info!()` etc.
pub use log_debug as debug;
pub use log_error as error;
pub use log_info as info;
pub use log_warn as warn;

/// Structured logging with key-value fields.
///
/// `log!(debug, ...)` is not compiled out in release builds; use
/// `log::debug!` for that.
#[macro_export]
macro_rules! log {
    ($level:ident, $msg:expr $(, $key:ident : $value:expr)* $(,)?) => {{
        use std::io::Write;
        let fields: &[(&str, &str)] = &[
            $( (stringify!($key), &format!("{}", $value)) ),*
        ];
        let line = $crate::log::__build_log_line(stringify!($level), $msg, fields);
        let _ = writeln!(std::io::stderr(), "{}", line);
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_json() {
        assert_eq!(__escape_json("hello"), "hello");
        assert_eq!(__escape_json(r#"say "hi""#), r#"say \"hi\""#);
        assert_eq!(__escape_json(r"a\b"), r"a\\b");
        assert_eq!(__escape_json("a\nb\tc\r"), "a\\nb\\tc\\r");
        assert_eq!(__escape_json("\x01"), "\\u0001");
        assert_eq!(__escape_json("日本"), "日本");
    }

    #[test]
    fn test_format_timestamp_epoch() {
        assert_eq!(__format_timestamp(0, 0), "1970-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_format_timestamp_known_dates() {
        // 2000-02-29 (leap day) 12:34:56
        assert_eq!(
            __format_timestamp(951_827_696, 789),
            "2000-02-29T12:34:56.789Z"
        );
        // 2024-01-01 00:00:00
        assert_eq!(
            __format_timestamp(1_704_067_200, 5),
            "2024-01-01T00:00:00.005Z"
        );
        // 2025-12-31 23:59:59
        assert_eq!(
            __format_timestamp(1_767_225_599, 999),
            "2025-12-31T23:59:59.999Z"
        );
    }

    #[test]
    fn test_timestamp_shape() {
        let ts = __timestamp();
        assert_eq!(ts.len(), 24);
        assert!(ts.ends_with('Z'));
        assert_eq!(ts.as_bytes()[10], b'T');
    }

    #[test]
    fn test_build_log_line() {
        let line = __build_log_line(
            "warn",
            "rejected \"filter\"",
            &[("resource", "users"), ("kind", "syntax")],
        );
        assert!(line.starts_with(
            r#"{"level":"warn","msg":"rejected \"filter\"","resource":"users","kind":"syntax","ts":""#
        ));
        assert!(line.ends_with(r#"Z"}"#));
    }

    #[test]
    fn test_macros_compile() {
        crate::log::debug!("debug {}", 1);
        crate::log!(info, "structured", count: 2, name: "x");
    }
}

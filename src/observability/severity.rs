//! Log severities and the status-code policy that selects them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Severity of an emitted line, ordered by increasing urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    #[default]
    Info,
    Warn,
    Error,
    Fatal,
}

impl Severity {
    /// Severity for a completed request with the given status code.
    pub fn for_status(status: u16) -> Self {
        match status {
            500.. => Severity::Fatal,
            400..=499 => Severity::Warn,
            _ => Severity::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized severity name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log level `{0}`")]
pub struct UnknownSeverity(pub String);

impl FromStr for Severity {
    type Err = UnknownSeverity;

    /// Accepts the standard level names. DEBUG and NOTSET collapse to INFO
    /// since nothing below INFO is ever written.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NOTSET" | "DEBUG" | "INFO" => Ok(Severity::Info),
            "WARN" | "WARNING" => Ok(Severity::Warn),
            "ERROR" => Ok(Severity::Error),
            "FATAL" | "CRITICAL" => Ok(Severity::Fatal),
            _ => Err(UnknownSeverity(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_bands() {
        for status in [100, 200, 204, 301, 399] {
            assert_eq!(Severity::for_status(status), Severity::Info, "status {status}");
        }
        for status in [400, 404, 429, 499] {
            assert_eq!(Severity::for_status(status), Severity::Warn, "status {status}");
        }
        for status in [500, 502, 503, 599] {
            assert_eq!(Severity::for_status(status), Severity::Fatal, "status {status}");
        }
    }

    #[test]
    fn test_ordering() {
        assert!(Severity::Info < Severity::Warn);
        assert!(Severity::Warn < Severity::Error);
        assert!(Severity::Error < Severity::Fatal);
    }

    #[test]
    fn test_parse_level_names() {
        assert_eq!("INFO".parse::<Severity>().unwrap(), Severity::Info);
        assert_eq!("debug".parse::<Severity>().unwrap(), Severity::Info);
        assert_eq!("WARNING".parse::<Severity>().unwrap(), Severity::Warn);
        assert_eq!("Error".parse::<Severity>().unwrap(), Severity::Error);
        assert_eq!("CRITICAL".parse::<Severity>().unwrap(), Severity::Fatal);
        assert_eq!(
            "LOUD".parse::<Severity>(),
            Err(UnknownSeverity("LOUD".to_string()))
        );
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Ordered verbosity classification applied to monitors and processors.
///
/// `Debug < Info < Essential`: a processor configured at `Info` receives
/// `Info` and `Essential` monitors but not `Debug` ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MonitoringLevel {
    Debug,
    #[default]
    Info,
    Essential,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown monitoring level: {0:?}")]
pub struct LevelParseError(pub String);

impl MonitoringLevel {
    pub const ALL: [MonitoringLevel; 3] = [
        MonitoringLevel::Debug,
        MonitoringLevel::Info,
        MonitoringLevel::Essential,
    ];

    /// Whether `s` names one of the levels (case-insensitive)
    pub fn is_valid_level_str(s: &str) -> bool {
        s.parse::<MonitoringLevel>().is_ok()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MonitoringLevel::Debug => "DEBUG",
            MonitoringLevel::Info => "INFO",
            MonitoringLevel::Essential => "ESSENTIAL",
        }
    }

    /// True when a monitor at this level passes a `threshold` filter
    pub fn passes(&self, threshold: MonitoringLevel) -> bool {
        *self >= threshold
    }
}

impl fmt::Display for MonitoringLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MonitoringLevel {
    type Err = LevelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MonitoringLevel::ALL
            .iter()
            .copied()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| LevelParseError(s.to_string()))
    }
}

impl TryFrom<String> for MonitoringLevel {
    type Error = LevelParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonitoringLevel> for String {
    fn from(level: MonitoringLevel) -> Self {
        level.as_str().to_string()
    }
}

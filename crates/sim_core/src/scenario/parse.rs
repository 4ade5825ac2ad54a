//! Scenario file format.
//!
//! One event per line, whitespace separated; blank lines and lines starting
//! with `#` are skipped:
//!
//! ```text
//! <timestamp> DriverRequest <driver_id> <row,col> <speed>
//! <timestamp> RiderRequest  <rider_id>  <origin row,col> <dest row,col> <patience>
//! ```

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::spatial::Location;

/// One initial event read from a scenario file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScenarioRecord {
    DriverRequest {
        timestamp: u64,
        id: String,
        location: Location,
        speed: u32,
    },
    RiderRequest {
        timestamp: u64,
        id: String,
        origin: Location,
        destination: Location,
        patience: u64,
    },
}

impl ScenarioRecord {
    pub fn timestamp(&self) -> u64 {
        match self {
            ScenarioRecord::DriverRequest { timestamp, .. }
            | ScenarioRecord::RiderRequest { timestamp, .. } => *timestamp,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            ScenarioRecord::DriverRequest { id, .. } | ScenarioRecord::RiderRequest { id, .. } => {
                id.as_str()
            }
        }
    }
}

impl fmt::Display for ScenarioRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioRecord::DriverRequest {
                timestamp,
                id,
                location,
                speed,
            } => write!(f, "{timestamp} DriverRequest {id} {location} {speed}"),
            ScenarioRecord::RiderRequest {
                timestamp,
                id,
                origin,
                destination,
                patience,
            } => write!(
                f,
                "{timestamp} RiderRequest {id} {origin} {destination} {patience}"
            ),
        }
    }
}

/// Why a scenario line was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
    #[error("unknown event kind `{0}`")]
    UnknownEventKind(String),
    #[error("{kind} expects {expected} fields, found {found}")]
    FieldCount {
        kind: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("invalid {field} `{value}`: expected a non-negative integer")]
    InvalidNumber { field: &'static str, value: String },
    #[error("invalid {field} `{value}`: expected `<row>,<col>`")]
    InvalidLocation { field: &'static str, value: String },
    #[error("driver speed must be positive")]
    ZeroSpeed,
    #[error("duplicate id `{0}`")]
    DuplicateId(String),
}

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: {source}")]
    Line {
        line: usize,
        #[source]
        source: LineError,
    },
}

impl ScenarioError {
    /// 1-based line number of the offending line, for parse errors.
    pub fn line(&self) -> Option<usize> {
        match self {
            ScenarioError::Line { line, .. } => Some(*line),
            ScenarioError::Io { .. } => None,
        }
    }
}

/// Reads and parses the scenario at `path`.
pub fn load_scenario(path: impl AsRef<Path>) -> Result<Vec<ScenarioRecord>, ScenarioError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| ScenarioError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_scenario(&text)
}

/// Parses scenario text into records, in file order. Fails on the first bad line.
pub fn parse_scenario(text: &str) -> Result<Vec<ScenarioRecord>, ScenarioError> {
    let mut records = Vec::new();
    let mut drivers = HashSet::new();
    let mut riders = HashSet::new();

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let at_line = |source| ScenarioError::Line {
            line: index + 1,
            source,
        };
        let record = parse_line(line).map_err(at_line)?;
        let ids = match record {
            ScenarioRecord::DriverRequest { .. } => &mut drivers,
            ScenarioRecord::RiderRequest { .. } => &mut riders,
        };
        if !ids.insert(record.id().to_string()) {
            return Err(at_line(LineError::DuplicateId(record.id().to_string())));
        }
        records.push(record);
    }

    Ok(records)
}

fn parse_line(line: &str) -> Result<ScenarioRecord, LineError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let kind = tokens.get(1).copied().unwrap_or_default();
    match kind {
        "DriverRequest" => {
            expect_fields("DriverRequest", &tokens, 5)?;
            let speed = parse_number::<u32>("speed", tokens[4])?;
            if speed == 0 {
                return Err(LineError::ZeroSpeed);
            }
            Ok(ScenarioRecord::DriverRequest {
                timestamp: parse_number("timestamp", tokens[0])?,
                id: tokens[2].to_string(),
                location: parse_location("location", tokens[3])?,
                speed,
            })
        }
        "RiderRequest" => {
            expect_fields("RiderRequest", &tokens, 6)?;
            Ok(ScenarioRecord::RiderRequest {
                timestamp: parse_number("timestamp", tokens[0])?,
                id: tokens[2].to_string(),
                origin: parse_location("origin", tokens[3])?,
                destination: parse_location("destination", tokens[4])?,
                patience: parse_number("patience", tokens[5])?,
            })
        }
        other => Err(LineError::UnknownEventKind(other.to_string())),
    }
}

fn expect_fields(kind: &'static str, tokens: &[&str], expected: usize) -> Result<(), LineError> {
    if tokens.len() == expected {
        Ok(())
    } else {
        Err(LineError::FieldCount {
            kind,
            expected,
            found: tokens.len(),
        })
    }
}

fn parse_number<T: std::str::FromStr>(field: &'static str, value: &str) -> Result<T, LineError> {
    let invalid = || LineError::InvalidNumber {
        field,
        value: value.to_string(),
    };
    if value.starts_with('+') {
        return Err(invalid());
    }
    value.parse().map_err(|_| invalid())
}

fn parse_location(field: &'static str, value: &str) -> Result<Location, LineError> {
    value.parse().map_err(|_| LineError::InvalidLocation {
        field,
        value: value.to_string(),
    })
}

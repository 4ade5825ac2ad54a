//! Spatial operations: integer grid locations and Manhattan distance.
//!
//! Locations are `(row, column)` pairs on an unbounded integer grid. The textual
//! form used by scenario files is `"<row>,<col>"`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Location {
    pub row: i32,
    pub column: i32,
}

impl Location {
    pub const fn new(row: i32, column: i32) -> Self {
        Self { row, column }
    }

    pub fn distance_to(&self, other: Location) -> u64 {
        manhattan_distance(*self, other)
    }
}

/// |Δrow| + |Δcolumn|, widened so opposite corners of the `i32` grid still fit.
pub fn manhattan_distance(origin: Location, destination: Location) -> u64 {
    u64::from(origin.row.abs_diff(destination.row))
        + u64::from(origin.column.abs_diff(destination.column))
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.column)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid location `{input}`: expected `<row>,<col>`")]
pub struct ParseLocationError {
    pub input: String,
}

impl FromStr for Location {
    type Err = ParseLocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseLocationError {
            input: s.to_string(),
        };
        let (row, column) = s.split_once(',').ok_or_else(err)?;
        // `str::parse` accepts a leading '+'; the file format does not.
        if row.starts_with('+') || column.starts_with('+') {
            return Err(err());
        }
        let row = row.parse::<i32>().map_err(|_| err())?;
        let column = column.parse::<i32>().map_err(|_| err())?;
        Ok(Location::new(row, column))
    }
}

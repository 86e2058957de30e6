//! Coordinate triple parsed from `x_y_z` path segments

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use super::ValidationError;

const SEPARATOR: char = '_';

/// A reported activation point in integer space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coordinate {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl Coordinate {
    pub fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }

    /// Parse `"x_y_z"`. Exactly three signed integers are accepted.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidFormat {
            field: "coordinates",
            expected: "x_y_z",
        };

        let parts: Vec<&str> = s.split(SEPARATOR).collect();
        let [x, y, z] = parts[..] else {
            return Err(invalid());
        };

        let axis = |part: &str| part.trim().parse::<i64>().map_err(|_| invalid());
        Ok(Self::new(axis(x)?, axis(y)?, axis(z)?))
    }

    /// Axis values as `double precision` for comparison against
    /// `ST_X/ST_Y/ST_Z`. Magnitudes beyond 2^53 round to the nearest double.
    pub fn as_f64(&self) -> (f64, f64, f64) {
        (self.x as f64, self.y as f64, self.z as f64)
    }
}

impl FromStr for Coordinate {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.x, self.y, self.z)
    }
}

// Serialized as `[x, y, z]`
impl Serialize for Coordinate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [self.x, self.y, self.z].serialize(serializer)
    }
}

//! Signal entries — the externally produced trade intents consumed by the simulator.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a signal: enter (+1) or exit (−1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Direction {
    Enter,
    Exit,
}

impl Direction {
    pub fn as_i8(self) -> i8 {
        match self {
            Direction::Enter => 1,
            Direction::Exit => -1,
        }
    }
}

impl From<Direction> for i8 {
    fn from(direction: Direction) -> Self {
        direction.as_i8()
    }
}

impl TryFrom<i8> for Direction {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Direction::Enter),
            -1 => Ok(Direction::Exit),
            other => Err(format!("signal direction must be +1 or -1, got {other}")),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i8())
    }
}

/// A single (date, instrument, direction) triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalEntry {
    pub date: NaiveDate,
    pub instrument: String,
    pub direction: Direction,
}

impl SignalEntry {
    pub fn enter(date: NaiveDate, instrument: impl Into<String>) -> Self {
        Self {
            date,
            instrument: instrument.into(),
            direction: Direction::Enter,
        }
    }

    pub fn exit(date: NaiveDate, instrument: impl Into<String>) -> Self {
        Self {
            date,
            instrument: instrument.into(),
            direction: Direction::Exit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_serializes_as_signed_integer() {
        let entry = SignalEntry::enter(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), "AAA");
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"direction\":1"));

        let exit: Direction = serde_json::from_str("-1").unwrap();
        assert_eq!(exit, Direction::Exit);
    }

    #[test]
    fn direction_rejects_zero() {
        assert!(Direction::try_from(0).is_err());
        assert!(serde_json::from_str::<Direction>("0").is_err());
    }
}

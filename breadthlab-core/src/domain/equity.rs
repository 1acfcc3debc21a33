use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Mark-to-market total at the close of one simulated date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub equity: f64,
}

//! Scoring module - points per row elimination
//!
//! Points are bucketed by the exact number of rows removed by one lock:
//! there is no per-row increment, and counts outside 1..=4 score nothing.

use crate::types::ROW_SCORES;

/// Points for eliminating `rows` rows in a single lock
pub fn row_score(rows: usize) -> u32 {
    ROW_SCORES.get(rows).copied().unwrap_or(0)
}

//! Blocked date domain entity

use chrono::NaiveDate;

/// A manually blocked calendar day.
///
/// Authored outside the booking flow (maintenance, owner use). When
/// `machine_id` is `None` every unit is unavailable that day; otherwise
/// exactly one named unit is taken out of the pool.
#[derive(Debug, Clone)]
pub struct BlockedDate {
    pub date: NaiveDate,
    pub machine_id: Option<String>,
}

impl BlockedDate {
    /// Whether this row blocks the whole pool for its date.
    pub fn blocks_all_units(&self) -> bool {
        self.machine_id.is_none()
    }
}

//! Blocked date repository interface

use async_trait::async_trait;
use chrono::NaiveDate;

use super::model::BlockedDate;
use crate::domain::DomainResult;

#[async_trait]
pub trait BlockedDateRepository: Send + Sync {
    /// Find all blocked-date rows with date in `[start, end]` (inclusive)
    async fn find_in_range(&self, start: NaiveDate, end: NaiveDate)
        -> DomainResult<Vec<BlockedDate>>;
}

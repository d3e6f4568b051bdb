//! SeaORM implementation of BlockedDateRepository

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use crate::domain::blocked_date::{BlockedDate, BlockedDateRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::blocked_date;

pub struct SeaOrmBlockedDateRepository {
    db: DatabaseConnection,
}

impl SeaOrmBlockedDateRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BlockedDateRepository for SeaOrmBlockedDateRepository {
    async fn find_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DomainResult<Vec<BlockedDate>> {
        let models = blocked_date::Entity::find()
            .filter(blocked_date::Column::Date.gte(start))
            .filter(blocked_date::Column::Date.lte(end))
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Storage(format!("Database error: {}", e)))?;

        Ok(models
            .into_iter()
            .map(|m| BlockedDate {
                date: m.date,
                machine_id: m.machine_id,
            })
            .collect())
    }
}

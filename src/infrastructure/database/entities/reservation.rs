//! Reservation entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reservations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub product_id: String,
    pub start_date: Date,
    pub end_date: Date,

    /// Reservation status: pending, confirmed, in_progress, cancelled, completed
    pub status: String,

    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,

    /// pickup or delivery
    pub fulfillment: String,

    #[sea_orm(nullable)]
    pub delivery_address: Option<String>,

    #[sea_orm(nullable)]
    pub notes: Option<String>,

    pub total_amount_cents: i64,
    pub deposit_amount_cents: i64,

    #[sea_orm(nullable)]
    pub checkout_session_id: Option<String>,

    #[sea_orm(nullable)]
    pub payment_intent_id: Option<String>,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

//! Processed payment webhook events.

use chrono::NaiveDateTime;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter,
};

/// Record of webhook events already handled.
pub struct StripeEventRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> StripeEventRepository<'a, C> {
    /// Creates a new instance of [`StripeEventRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Whether the event was already processed.
    pub async fn exists(&self, event_id: &str) -> Result<bool, DbErr> {
        let count = entity::prelude::StripeEvent::find()
            .filter(entity::stripe_event::Column::EventId.eq(event_id))
            .count(self.db)
            .await?;

        Ok(count > 0)
    }

    /// Records the event as processed.
    pub async fn record(
        &self,
        event_id: &str,
        event_type: &str,
        processed_at: NaiveDateTime,
    ) -> Result<entity::stripe_event::Model, DbErr> {
        let event = entity::stripe_event::ActiveModel {
            event_id: ActiveValue::Set(event_id.to_string()),
            event_type: ActiveValue::Set(event_type.to_string()),
            processed_at: ActiveValue::Set(processed_at),
            ..Default::default()
        };

        event.insert(self.db).await
    }

    /// Deletes events processed before `cutoff`, returning how many were removed.
    pub async fn delete_processed_before(&self, cutoff: NaiveDateTime) -> Result<u64, DbErr> {
        let result = entity::prelude::StripeEvent::delete_many()
            .filter(entity::stripe_event::Column::ProcessedAt.lt(cutoff))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }
}

use std::sync::Arc;

use chrono::Utc;

use crate::db::{Database, DbError};
use crate::error::{ApiError, ApiResult};

use super::model::Subscription;

#[derive(Debug, Clone)]
pub struct SubscriptionService {
    db: Arc<Database>,
}

impl SubscriptionService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn find_one_by_id(&self, id: i64) -> ApiResult<Subscription> {
        self.db
            .read(|t| t.subscriptions.get(id).cloned())
            .ok_or(ApiError::NotFound)
    }

    pub fn create(&self, subscriber_id: i64, author_id: i64) -> ApiResult<Subscription> {
        if subscriber_id == author_id {
            return Err(ApiError::Validation("cannot subscribe to yourself".into()));
        }

        let subscription = self.db.transaction(|t| {
            if !t.users.contains(author_id) || !t.users.contains(subscriber_id) {
                return Err(DbError::RecordNotFound);
            }
            let exists = t
                .subscriptions
                .newest_first()
                .any(|s| s.subscriber_id == subscriber_id && s.author_id == author_id);
            if exists {
                return Err(DbError::UniqueViolation("subscription"));
            }
            let subscription = t.subscriptions.insert_with(|id| Subscription {
                id,
                subscriber_id,
                author_id,
                created_at: Utc::now(),
            });
            Ok(subscription.clone())
        })?;

        tracing::info!(subscription_id = subscription.id, subscriber_id, author_id, "Subscription created");
        Ok(subscription)
    }

    pub fn delete(&self, id: i64) -> ApiResult<Subscription> {
        Ok(self.db.transaction(|t| t.subscriptions.remove(id))?)
    }
}

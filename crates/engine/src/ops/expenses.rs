use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, prelude::*};

use crate::{EngineError, ExpenseId, Observation, ResultEngine, UserId, expenses, users};

use super::{Engine, normalize_optional_text};

impl Engine {
    /// Record an expense of `amount_minor` (> 0) for `user_id`.
    pub async fn record_expense(
        &self,
        user_id: UserId,
        amount_minor: i64,
        category: Option<&str>,
        note: Option<&str>,
        occurred_at: DateTime<Utc>,
    ) -> ResultEngine<ExpenseId> {
        if amount_minor <= 0 {
            return Err(EngineError::InvalidAmount(format!(
                "expense amount must be > 0, got {amount_minor}"
            )));
        }

        let owner = self
            .store(
                "record_expense",
                users::Entity::find_by_id(user_id.get()).one(&self.database),
            )
            .await?;
        if owner.is_none() {
            return Err(EngineError::KeyNotFound(format!("user {user_id}")));
        }

        let model = expenses::ActiveModel {
            id: ActiveValue::NotSet,
            user_id: ActiveValue::Set(user_id.get()),
            amount_minor: ActiveValue::Set(amount_minor),
            category: ActiveValue::Set(normalize_optional_text(category)),
            note: ActiveValue::Set(normalize_optional_text(note)),
            occurred_at: ActiveValue::Set(occurred_at),
        };
        let inserted = self
            .store(
                "record_expense",
                expenses::Entity::insert(model).exec(&self.database),
            )
            .await?;

        tracing::debug!("recorded expense {} for user {user_id}", inserted.last_insert_id);
        ExpenseId::new(inserted.last_insert_id)
    }

    /// Every expense of `user_id` as an observation tagged with its month,
    /// oldest first.
    pub async fn expense_observations(&self, user_id: UserId) -> ResultEngine<Vec<Observation>> {
        let models = self
            .store(
                "expense_observations",
                expenses::Entity::find()
                    .filter(expenses::Column::UserId.eq(user_id.get()))
                    .order_by_asc(expenses::Column::OccurredAt)
                    .order_by_asc(expenses::Column::Id)
                    .all(&self.database),
            )
            .await?;

        Ok(models.iter().map(Observation::from).collect())
    }
}

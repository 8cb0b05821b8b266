use sea_orm::{QueryFilter, QuerySelect, prelude::*};

use crate::{ExpenseId, Receipt, ResultEngine, UserId, expenses, receipts};

use super::Engine;

impl Engine {
    /// Returns the receipt attached to `expense_id`, if `user_id` owns that
    /// expense.
    ///
    /// - `Ok(Some(_))`: the stored filename, MIME type and bytes.
    /// - `Ok(None)`: no such receipt for this user. An expense owned by
    ///   another user is reported the same way.
    /// - `Err(_)`: the store failed or timed out, see
    ///   [`EngineError::is_retryable`](crate::EngineError::is_retryable).
    pub async fn receipt_by_expense(
        &self,
        user_id: UserId,
        expense_id: ExpenseId,
    ) -> ResultEngine<Option<Receipt>> {
        let query = receipts::Entity::find()
            .select_only()
            .column(receipts::Column::Filename)
            .column(receipts::Column::MimeType)
            .column(receipts::Column::Bytes)
            .inner_join(expenses::Entity)
            .filter(receipts::Column::ExpenseId.eq(expense_id.get()))
            .filter(expenses::Column::UserId.eq(user_id.get()))
            .into_model::<Receipt>()
            .one(&self.database);

        let receipt = self.store("receipt_by_expense", query).await?;
        if receipt.is_none() {
            tracing::debug!("no receipt for expense {expense_id} of user {user_id}");
        }
        Ok(receipt)
    }

    /// Same as [`Engine::receipt_by_expense`] with ids given as numeric
    /// strings. Non-numeric ids fail with `InvalidIdentifier` before any
    /// query runs.
    pub async fn receipt_by_expense_raw(
        &self,
        user_id: &str,
        expense_id: &str,
    ) -> ResultEngine<Option<Receipt>> {
        let user_id: UserId = user_id.parse()?;
        let expense_id: ExpenseId = expense_id.parse()?;
        self.receipt_by_expense(user_id, expense_id).await
    }
}

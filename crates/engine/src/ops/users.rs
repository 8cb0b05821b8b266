use sea_orm::{ActiveValue, QueryFilter, prelude::*};

use crate::{EngineError, ResultEngine, UserId, users};

use super::Engine;

impl Engine {
    /// Create a user and return its id.
    pub async fn create_user(&self, username: &str, password: &str) -> ResultEngine<UserId> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(EngineError::InvalidIdentifier(
                "username and password must not be empty".to_string(),
            ));
        }

        let existing = self
            .store(
                "create_user",
                users::Entity::find()
                    .filter(users::Column::Username.eq(username))
                    .one(&self.database),
            )
            .await?;
        if existing.is_some() {
            return Err(EngineError::ExistingKey(username.to_string()));
        }

        let model = users::ActiveModel {
            id: ActiveValue::NotSet,
            username: ActiveValue::Set(username.to_string()),
            password: ActiveValue::Set(password.to_string()),
        };
        let inserted = self
            .store(
                "create_user",
                users::Entity::insert(model).exec(&self.database),
            )
            .await?;

        tracing::info!("created user {username}");
        UserId::new(inserted.last_insert_id)
    }

    /// Resolve a username to its id.
    pub async fn user_id(&self, username: &str) -> ResultEngine<UserId> {
        let user = self
            .store(
                "user_id",
                users::Entity::find()
                    .filter(users::Column::Username.eq(username))
                    .one(&self.database),
            )
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(username.to_string()))?;
        UserId::new(user.id)
    }
}

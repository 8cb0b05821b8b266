use std::{future::Future, time::Duration};

use sea_orm::{DatabaseConnection, DbErr};

use crate::{EngineError, ResultEngine};

mod expenses;
mod receipts;
mod users;

/// Default bound on a single store round-trip.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    store_timeout: Duration,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Bound applied to every store round-trip.
    pub fn store_timeout(&self) -> Duration {
        self.store_timeout
    }

    /// Run one store round-trip under the configured timeout.
    ///
    /// Query failures and timeouts are logged and propagated; they are never
    /// turned into an empty result.
    async fn store<T, F>(&self, operation: &str, query: F) -> ResultEngine<T>
    where
        F: Future<Output = Result<T, DbErr>>,
    {
        match tokio::time::timeout(self.store_timeout, query).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => {
                tracing::error!("{operation}: store query failed: {err}");
                Err(EngineError::Database(err))
            }
            Err(_) => {
                tracing::warn!(
                    "{operation}: store did not answer within {:?}",
                    self.store_timeout
                );
                Err(EngineError::StoreTimeout(self.store_timeout))
            }
        }
    }
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// The builder for `Engine`
pub struct EngineBuilder {
    database: DatabaseConnection,
    store_timeout: Duration,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            database: DatabaseConnection::default(),
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Override the bound on a single store round-trip.
    pub fn store_timeout(mut self, timeout: Duration) -> EngineBuilder {
        self.store_timeout = timeout;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        if self.store_timeout.is_zero() {
            return Err(EngineError::InvalidConfig(
                "store timeout must be > 0".to_string(),
            ));
        }
        Ok(Engine {
            database: self.database,
            store_timeout: self.store_timeout,
        })
    }
}

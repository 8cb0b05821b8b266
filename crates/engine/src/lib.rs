//! Expense metrics and receipt lookup.
//!
//! - [`metrics`]: pure functions turning monetary observations into totals,
//!   evolutions, sold ratios and period labels.
//! - [`Engine`]: store-backed operations, most notably
//!   [`Engine::receipt_by_expense`], scoped to the owning user.
pub use error::EngineError;
pub use ids::{ExpenseId, UserId};
pub use metrics::{Observation, PeriodKey, PeriodSummary};
pub use ops::{DEFAULT_STORE_TIMEOUT, Engine, EngineBuilder};
pub use receipts::Receipt;

pub mod metrics;

mod error;
mod expenses;
mod ids;
mod ops;
mod receipts;
mod users;

type ResultEngine<T> = Result<T, EngineError>;

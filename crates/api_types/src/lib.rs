use serde::{Deserialize, Serialize};

pub mod stats {
    use super::*;

    /// Query string of `GET /stats`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct PeriodQuery {
        /// Calendar month, `YYYY-MM`.
        pub period: String,
    }

    /// Totals of one month compared with the month before.
    ///
    /// Amounts are integer cents. `evolution` is `null` when the previous
    /// month has no expenses.
    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    pub struct PeriodSummary {
        pub period: String,
        pub label: String,
        pub total_cents: i64,
        pub previous_total_cents: i64,
        pub evolution: Option<f64>,
        pub sold_ratio: f64,
    }

    #[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct MonthlyTotal {
        pub period: String,
        pub label: String,
        pub total_cents: i64,
    }
}

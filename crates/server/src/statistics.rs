//! Statistics API endpoints

use api_types::stats::{MonthlyTotal, PeriodQuery, PeriodSummary};
use axum::{
    Extension, Json,
    extract::{Query, State},
};
use engine::{PeriodKey, metrics};

use crate::{ServerError, server::ServerState, user};

/// Handle requests for the summary of one month
pub async fn get_stats(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<PeriodSummary>, ServerError> {
    let period: PeriodKey = query.period.parse()?;
    let observations = state.engine.expense_observations(user.user_id()?).await?;
    let summary = metrics::period_summary(&observations, period);

    Ok(Json(PeriodSummary {
        period: summary.period.to_string(),
        label: summary.label,
        total_cents: summary.total_minor,
        previous_total_cents: summary.previous_total_minor,
        evolution: summary.evolution,
        sold_ratio: summary.sold_ratio,
    }))
}

/// Handle requests for per-month totals, oldest first
pub async fn monthly(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<MonthlyTotal>>, ServerError> {
    let observations = state.engine.expense_observations(user.user_id()?).await?;

    let totals = metrics::monthly_totals(&observations)
        .into_iter()
        .map(|(period, total_cents)| MonthlyTotal {
            period: period.to_string(),
            label: period.label(),
            total_cents,
        })
        .collect();

    Ok(Json(totals))
}

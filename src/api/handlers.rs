use axum::{
    Json,
    extract::{Query, State},
};
use std::sync::Arc;
use std::time::Instant;

use crate::data_models::{TrendRequest, TrendsResponse};
use crate::normalizer::{NormalizeOutcome, normalize};
use crate::upstream::{UpstreamOutcome, fetch_outcome};

use super::AppState;
use super::error::ApiError;
use super::models::TrendsQuery;

/// Answers 200 for every request that passes validation; when the provider
/// fails or has nothing, the body is synthesized instead.
#[tracing::instrument(
    name = "trends",
    skip_all,
    fields(
        request_id = %nanoid::nanoid!(10),
        keywords = tracing::field::Empty,
        timeframe = tracing::field::Empty,
    )
)]
pub async fn trends_handler(
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<TrendsResponse>, ApiError> {
    let start = Instant::now();
    let request = TrendsQuery::from_pairs(pairs)
        .into_request()
        .inspect_err(|e| {
            tracing::info!(error = ?e, "rejected trends request");
        })?;

    let span = tracing::Span::current();
    span.record("keywords", request.keywords.len());
    span.record("timeframe", request.timeframe.as_str());

    let outcome = fetch_outcome(
        state.source.as_ref(),
        &request,
        state.config.upstream_timeout,
    )
    .await;

    let response = match outcome {
        UpstreamOutcome::Success(raw) => match normalize(&request.keywords, &raw) {
            NormalizeOutcome::Results(results) => {
                tracing::info!(
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "served upstream related queries"
                );
                results
            }
            NormalizeOutcome::AllEmpty => {
                tracing::warn!("upstream tables empty for every keyword, using synthetic data");
                synthesize(&state, &request)
            }
        },
        UpstreamOutcome::Empty => {
            tracing::warn!("upstream returned no data, using synthetic data");
            synthesize(&state, &request)
        }
        UpstreamOutcome::Failure(e) => {
            tracing::warn!(error = %e, "upstream call failed, using synthetic data");
            synthesize(&state, &request)
        }
    };

    Ok(Json(response))
}

fn synthesize(state: &AppState, request: &TrendRequest) -> TrendsResponse {
    let mut rng = state.config.fallback_rng();
    state.generator.generate(&request.keywords, &mut rng)
}

pub async fn health_handler() -> &'static str {
    "ok"
}

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use fauna_ledger::{ChangeRow, LedgerError};
use fauna_reports::{
    EndangeredReport, Growth, MunicipalityTotal, SettlementMatrix, SpeciesTotal,
};
use fauna_store::WildlifeStore;
use fauna_types::{MunicipalityId, PopulationChange, Role, SettlementId, SpeciesId};

use crate::error::{domain_error_code, ServerResult};
use crate::state::AppState;

/// Health check handler.
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Info handler.
pub async fn info() -> Json<serde_json::Value> {
    Json(json!({
        "name": "fauna-server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// A volunteer's proposed population change. The settlement is never taken
/// from the request: submissions always target the caller's assigned
/// settlement.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubmitChangeRequest {
    pub species_id: SpeciesId,
    pub year: i32,
    pub delta: i64,
}

#[derive(Serialize)]
struct SubmitChangeResponse {
    change: PopulationChange,
}

/// POST /v1/changes — record a yearly population delta.
///
/// Domain-rule violations come back as 422 with the submitted input echoed
/// so the client can redisplay the form; they are recovered here, never
/// propagated as faults.
pub async fn submit_change(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<SubmitChangeRequest>,
) -> ServerResult<Response> {
    let identity = state.authenticate(&headers).await?;
    identity.require_role(Role::Volunteer)?;
    let settlement = identity.require_settlement()?;

    match state.ledger.submit_change(
        settlement,
        req.species_id,
        req.year,
        req.delta,
        identity.user_id,
    ) {
        Ok(change) => Ok((
            StatusCode::CREATED,
            Json(SubmitChangeResponse { change }),
        )
            .into_response()),
        Err(
            err @ (LedgerError::MissingBaseline
            | LedgerError::DuplicateEntry
            | LedgerError::NegativePopulation { .. }
            | LedgerError::InvalidYear(_)),
        ) => Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "error": domain_error_code(&err),
                "reason": err.to_string(),
                "input": req,
            })),
        )
            .into_response()),
        Err(other) => Err(other.into()),
    }
}

#[derive(Serialize)]
struct HistoryResponse {
    settlement_id: SettlementId,
    settlement_name: Option<String>,
    items: Vec<ChangeRow>,
}

/// GET /v1/changes/mine — the caller's settlement history, newest year
/// first, ties broken by species name.
pub async fn my_history(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ServerResult<Response> {
    let identity = state.authenticate(&headers).await?;
    identity.require_role(Role::Volunteer)?;
    let settlement = identity.require_settlement()?;

    let settlement_name = state
        .ledger
        .store()
        .settlement(settlement)?
        .map(|s| s.name);
    let items = state.ledger.changes_for_settlement(settlement)?;
    Ok(Json(HistoryResponse {
        settlement_id: settlement,
        settlement_name,
        items,
    })
    .into_response())
}

#[derive(Deserialize)]
pub struct YearQuery {
    pub year: Option<i32>,
}

#[derive(Deserialize)]
pub struct MunicipalityTotalQuery {
    pub year: Option<i32>,
    pub municipality_id: Option<MunicipalityId>,
    pub species_id: Option<SpeciesId>,
}

#[derive(Deserialize)]
pub struct SpeciesTotalQuery {
    pub year: Option<i32>,
    pub species_id: Option<SpeciesId>,
}

#[derive(Deserialize)]
pub struct GrowthQuery {
    pub year: Option<i32>,
    pub settlement_id: Option<SettlementId>,
    pub species_id: Option<SpeciesId>,
}

impl AppState {
    /// Missing year parameters default to the current report year.
    fn report_year(&self, year: Option<i32>) -> i32 {
        year.unwrap_or_else(|| self.reports.years().last())
    }

    async fn require_employee(&self, headers: &HeaderMap) -> ServerResult<()> {
        self.authenticate(headers).await?.require_role(Role::Employee)
    }
}

/// GET /v1/reports/matrix
pub async fn settlement_matrix(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<YearQuery>,
) -> ServerResult<Json<SettlementMatrix>> {
    state.require_employee(&headers).await?;
    let year = state.report_year(query.year);
    Ok(Json(state.reports.settlement_matrix(year)?))
}

/// GET /v1/reports/municipality-total
pub async fn municipality_total(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<MunicipalityTotalQuery>,
) -> ServerResult<Json<MunicipalityTotal>> {
    state.require_employee(&headers).await?;
    let year = state.report_year(query.year);
    Ok(Json(state.reports.municipality_total(
        year,
        query.municipality_id,
        query.species_id,
    )?))
}

/// GET /v1/reports/species-total
pub async fn species_total(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<SpeciesTotalQuery>,
) -> ServerResult<Json<SpeciesTotal>> {
    state.require_employee(&headers).await?;
    let year = state.report_year(query.year);
    Ok(Json(state.reports.species_total(year, query.species_id)?))
}

/// GET /v1/reports/endangered
pub async fn endangered_species(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<YearQuery>,
) -> ServerResult<Json<EndangeredReport>> {
    state.require_employee(&headers).await?;
    let year = state.report_year(query.year);
    Ok(Json(state.reports.endangered_species(year)?))
}

/// GET /v1/reports/growth
pub async fn growth(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<GrowthQuery>,
) -> ServerResult<Json<Growth>> {
    state.require_employee(&headers).await?;
    let year = state.report_year(query.year);
    Ok(Json(state.reports.growth(
        year,
        query.settlement_id,
        query.species_id,
    )?))
}

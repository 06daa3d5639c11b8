use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::calc::{resize_rows, DistributeError, Tier};
use crate::data::csv_io::{export_csv, CsvError};
use crate::data::input::{amount_from_value, coerce_amount, deserialize_count};
use crate::data::roster::{rows_from_inputs, EmployeeRow, RowInput};
use crate::data::store::{StateStore, StoreError};
use crate::format::{format_achievement, format_amount, format_rate, Locale};
use crate::session::{RowEdit, Session, SessionInput, Summary};

/// Shared by every request on one server.
#[derive(Debug)]
pub struct ApiContext {
    pub store: Mutex<StateStore>,
    pub locale: Locale,
}

impl ApiContext {
    pub fn new(store: StateStore, locale: Locale) -> Self {
        Self {
            store: Mutex::new(store),
            locale,
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Parse(#[from] serde_json::Error),
    #[error("{0}")]
    Distribute(#[from] DistributeError),
    #[error("{0}")]
    Store(#[from] StoreError),
    #[error("{0}")]
    Csv(#[from] CsvError),
    #[error("no row with id '{0}'")]
    RowNotFound(String),
    #[error("state store lock poisoned")]
    Poisoned,
}

pub fn health_payload() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&serde_json::json!({
        "status": "ok",
        "service": "commission-api",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Reads one query parameter from a request path.
fn query_param<'a>(path: &'a str, name: &str) -> Option<&'a str> {
    let query = path.split('?').nth(1)?;
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key.trim() == name).then_some(value.trim())
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct TierResponse {
    pub achievement_percent: f64,
    pub tier: Tier,
    pub label: &'static str,
    pub rate: f64,
    pub scales_with_personal_achievement: bool,
}

impl TierResponse {
    pub fn for_percent(achievement_percent: f64) -> Self {
        let tier = Tier::for_achievement(achievement_percent / 100.0);
        Self {
            achievement_percent,
            tier,
            label: tier.label(),
            rate: tier.rate(),
            scales_with_personal_achievement: tier.scales_with_personal_achievement(),
        }
    }
}

pub fn tier_payload(path: &str) -> Result<String, serde_json::Error> {
    let percent = query_param(path, "achievement").map(coerce_amount).unwrap_or(0.0);
    serde_json::to_string_pretty(&TierResponse::for_percent(percent))
}

/// Figures pre-rendered for display in the configured locale.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryDisplay {
    pub outlet_rate: String,
    pub suggested_per_employee: String,
    pub total_sales: String,
    pub total_targets: String,
    pub outlet_diff: String,
    pub avg_achievement: String,
    pub avg_rate: String,
    pub total_commission: String,
}

impl SummaryDisplay {
    pub fn render(summary: &Summary, locale: Locale) -> Self {
        let totals = &summary.totals;
        Self {
            outlet_rate: format_rate(summary.outlet_rate),
            suggested_per_employee: format_amount(summary.suggested_per_employee, locale),
            total_sales: format_amount(totals.total_sales, locale),
            total_targets: format_amount(totals.total_targets, locale),
            outlet_diff: format_amount(summary.outlet_diff, locale),
            avg_achievement: format_achievement(totals.avg_achievement),
            avg_rate: format_rate(totals.avg_rate),
            total_commission: format_amount(totals.total_commission, locale),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CalculateResponse {
    pub status: &'static str,
    pub summary: Summary,
    pub display: SummaryDisplay,
}

pub fn calculate_payload(body: &str, locale: Locale) -> Result<String, ApiError> {
    let input: SessionInput = serde_json::from_str(body)?;
    let session = input.into_session();
    Ok(serde_json::to_string_pretty(&calculate_response(&session, locale))?)
}

fn calculate_response(session: &Session, locale: Locale) -> CalculateResponse {
    let summary = session.summary();
    let display = SummaryDisplay::render(&summary, locale);
    CalculateResponse {
        status: "ok",
        summary,
        display,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DistributeResponse {
    pub status: &'static str,
    pub per_employee_target: f64,
    pub rows: Vec<EmployeeRow>,
    pub summary: Summary,
}

pub fn distribute_payload(body: &str) -> Result<String, ApiError> {
    let input: SessionInput = serde_json::from_str(body)?;
    let mut session = input.into_session();
    let per_employee_target = session.distribute_to_count()?;
    let summary = session.summary();
    Ok(serde_json::to_string_pretty(&DistributeResponse {
        status: "ok",
        per_employee_target,
        rows: session.rows,
        summary,
    })?)
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResizeRequest {
    #[serde(default)]
    pub rows: Vec<RowInput>,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub count: usize,
}

pub fn resize_payload(body: &str) -> Result<String, ApiError> {
    let request: ResizeRequest = serde_json::from_str(body)?;
    let rows = resize_rows(&rows_from_inputs(request.rows), request.count);
    Ok(serde_json::to_string_pretty(&serde_json::json!({
        "status": "ok",
        "rows": rows,
    }))?)
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportRequest {
    #[serde(default)]
    pub rows: Vec<RowInput>,
}

/// Returns CSV text, not JSON.
pub fn export_payload(body: &str) -> Result<String, ApiError> {
    let request: ExportRequest = serde_json::from_str(body)?;
    Ok(export_csv(&rows_from_inputs(request.rows))?)
}

/// Rows after an edit, with the recomputed summary.
#[derive(Debug, Clone, Serialize)]
pub struct RowsResponse {
    pub status: &'static str,
    pub rows: Vec<EmployeeRow>,
    pub summary: Summary,
}

fn rows_response(session: Session) -> Result<String, ApiError> {
    let summary = session.summary();
    Ok(serde_json::to_string_pretty(&RowsResponse {
        status: "ok",
        rows: session.rows,
        summary,
    })?)
}

pub fn row_add_payload(body: &str) -> Result<String, ApiError> {
    let input: SessionInput = serde_json::from_str(body)?;
    let mut session = input.into_session();
    session.add_employee();
    rows_response(session)
}

#[derive(Debug, Clone, Deserialize)]
pub struct RowRemoveRequest {
    pub id: String,
    #[serde(flatten)]
    pub session: SessionInput,
}

pub fn row_remove_payload(body: &str) -> Result<String, ApiError> {
    let request: RowRemoveRequest = serde_json::from_str(body)?;
    let mut session = request.session.into_session();
    if !session.remove_employee(&request.id) {
        return Err(ApiError::RowNotFound(request.id));
    }
    rows_response(session)
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowField {
    Name,
    Sales,
    Target,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RowUpdateRequest {
    pub id: String,
    pub field: RowField,
    #[serde(default)]
    pub value: serde_json::Value,
    #[serde(flatten)]
    pub session: SessionInput,
}

impl RowUpdateRequest {
    fn edit(&self) -> RowEdit {
        match self.field {
            RowField::Name => RowEdit::Name(match &self.value {
                serde_json::Value::String(name) => name.clone(),
                serde_json::Value::Null => String::new(),
                other => other.to_string(),
            }),
            RowField::Sales => RowEdit::Sales(amount_from_value(&self.value)),
            RowField::Target => RowEdit::Target(amount_from_value(&self.value)),
        }
    }
}

pub fn row_update_payload(body: &str) -> Result<String, ApiError> {
    let request: RowUpdateRequest = serde_json::from_str(body)?;
    let edit = request.edit();
    let mut session = request.session.into_session();
    if !session.update_row(&request.id, edit) {
        return Err(ApiError::RowNotFound(request.id));
    }
    rows_response(session)
}

#[derive(Debug, Clone, Serialize)]
pub struct StateResponse {
    pub status: &'static str,
    pub persistence_enabled: bool,
    pub session: Session,
}

pub fn state_get_payload(ctx: &ApiContext) -> Result<String, ApiError> {
    let store = ctx.store.lock().map_err(|_| ApiError::Poisoned)?;
    let session = store.load()?;
    Ok(serde_json::to_string_pretty(&StateResponse {
        status: "ok",
        persistence_enabled: store.persistence_enabled(),
        session,
    })?)
}

pub fn state_put_payload(ctx: &ApiContext, body: &str) -> Result<String, ApiError> {
    let input: SessionInput = serde_json::from_str(body)?;
    let session = input.into_session();
    let store = ctx.store.lock().map_err(|_| ApiError::Poisoned)?;
    store.save(&session)?;
    info!(rows = session.rows.len(), persisted = store.persistence_enabled(), "state updated");
    Ok(serde_json::to_string_pretty(&StateResponse {
        status: "ok",
        persistence_enabled: store.persistence_enabled(),
        session,
    })?)
}

pub fn state_delete_payload(ctx: &ApiContext) -> Result<String, ApiError> {
    let store = ctx.store.lock().map_err(|_| ApiError::Poisoned)?;
    let removed = store.clear()?;
    Ok(serde_json::to_string_pretty(&serde_json::json!({
        "status": "ok",
        "removed": removed,
    }))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_param_finds_named_value() {
        assert_eq!(query_param("/api/tier?achievement=95", "achievement"), Some("95"));
        assert_eq!(query_param("/api/tier?x=1&achievement=80.5", "achievement"), Some("80.5"));
        assert_eq!(query_param("/api/tier", "achievement"), None);
    }

    #[test]
    fn tier_response_reports_boundary_inclusive_tier() {
        let response = TierResponse::for_percent(90.0);
        assert_eq!(response.tier, Tier::OnePercent);
        assert_eq!(response.rate, 0.01);
        assert!(!response.scales_with_personal_achievement);
    }
}

//! Routes for the derived-analytics endpoints. Every endpoint takes the
//! same optional filters; `type` selects the aggregation routine where an
//! endpoint supports more than one.

use axum::{
    Router,
    extract::{Query, State},
    response::Json as ResponseJson,
    routing::get,
};
use serde::Deserialize;
use serde_json::Value;
use services::services::analytics::{AnalysisFilter, AnalysisType};
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError};

#[derive(Debug, Default, Deserialize)]
pub struct AnalyticsQuery {
    #[serde(rename = "type")]
    pub analysis_type: Option<String>,
    pub product_id: Option<String>,
    pub district_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub start_year: Option<String>,
    pub end_year: Option<String>,
}

impl AnalyticsQuery {
    fn analysis(&self, default: AnalysisType) -> Result<AnalysisType, ApiError> {
        match self.analysis_type.as_deref() {
            None | Some("") => Ok(default),
            Some(raw) => Ok(AnalysisType::parse(raw)?),
        }
    }

    fn filter(&self) -> AnalysisFilter {
        AnalysisFilter {
            product_id: self.product_id.clone(),
            district_id: self.district_id.clone(),
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
            start_year: self.start_year.clone(),
            end_year: self.end_year.clone(),
        }
    }
}

pub async fn demand_supply(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<Value>>>, ApiError> {
    let analysis = query.analysis(AnalysisType::Overview)?;
    let rows = state
        .analytics()
        .demand_supply(analysis, &query.filter())
        .await?;
    Ok(ResponseJson(ApiResponse::success(rows)))
}

pub async fn weather_impact(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<Value>>>, ApiError> {
    let analysis = query.analysis(AnalysisType::Correlation)?;
    let rows = state
        .analytics()
        .weather_impact(analysis, &query.filter())
        .await?;
    Ok(ResponseJson(ApiResponse::success(rows)))
}

pub async fn nutrition_analysis(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<Value>>>, ApiError> {
    let rows = state.analytics().nutrition(&query.filter()).await?;
    Ok(ResponseJson(ApiResponse::success(rows)))
}

pub async fn supply_demand(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<Value>>>, ApiError> {
    let rows = state.analytics().supply_demand(&query.filter()).await?;
    Ok(ResponseJson(ApiResponse::success(rows)))
}

pub fn router() -> Router<AppState> {
    Router::new().nest(
        "/analytics",
        Router::new()
            .route("/demand-supply", get(demand_supply))
            .route("/weather-impact", get(weather_impact))
            .route("/nutrition", get(nutrition_analysis))
            .route("/supply-demand", get(supply_demand)),
    )
}

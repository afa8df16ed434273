use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::get,
};
use db::models::consumption::{Consumption, ConsumptionWithNames, CreateConsumption};
use tracing::warn;
use utils::response::ApiResponse;

use crate::{
    AppState,
    error::ApiError,
    routes::{ensure_product_exists, ensure_stakeholder_exists},
};

pub async fn list_consumption(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<ConsumptionWithNames>>>, ApiError> {
    let records = Consumption::find_all(&state.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(records)))
}

pub async fn get_consumption(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ResponseJson<ApiResponse<Consumption>>, ApiError> {
    let record = Consumption::find_by_id(&state.db().pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("consumption record {id} not found")))?;
    Ok(ResponseJson(ApiResponse::success(record)))
}

pub async fn create_consumption(
    State(state): State<AppState>,
    axum::Json(payload): axum::Json<CreateConsumption>,
) -> Result<ResponseJson<ApiResponse<Consumption>>, ApiError> {
    let pool = &state.db().pool;
    ensure_stakeholder_exists(pool, "stakeholder_id", payload.stakeholder_id).await?;
    ensure_product_exists(pool, payload.product_id).await?;
    let record = Consumption::create(pool, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(record)))
}

pub async fn update_consumption(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    axum::Json(payload): axum::Json<CreateConsumption>,
) -> Result<ResponseJson<ApiResponse<Option<Consumption>>>, ApiError> {
    let pool = &state.db().pool;
    ensure_stakeholder_exists(pool, "stakeholder_id", payload.stakeholder_id).await?;
    ensure_product_exists(pool, payload.product_id).await?;
    let record = Consumption::update(pool, id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(record)))
}

pub async fn delete_consumption(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let rows = Consumption::delete(&state.db().pool, id).await?;
    if rows == 0 {
        warn!(id, "delete of absent consumption record");
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router() -> Router<AppState> {
    Router::new().nest(
        "/consumption",
        Router::new()
            .route("/", get(list_consumption).post(create_consumption))
            .route(
                "/{id}",
                get(get_consumption)
                    .put(update_consumption)
                    .delete(delete_consumption),
            ),
    )
}

use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::get,
};
use db::models::production::{CreateProduction, Production, ProductionWithNames};
use tracing::warn;
use utils::response::ApiResponse;

use crate::{
    AppState,
    error::ApiError,
    routes::{ensure_district_exists, ensure_product_exists},
};

pub async fn list_production(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<ProductionWithNames>>>, ApiError> {
    let records = Production::find_all(&state.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(records)))
}

pub async fn get_production(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ResponseJson<ApiResponse<Production>>, ApiError> {
    let record = Production::find_by_id(&state.db().pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("production record {id} not found")))?;
    Ok(ResponseJson(ApiResponse::success(record)))
}

pub async fn create_production(
    State(state): State<AppState>,
    axum::Json(payload): axum::Json<CreateProduction>,
) -> Result<ResponseJson<ApiResponse<Production>>, ApiError> {
    let pool = &state.db().pool;
    ensure_product_exists(pool, payload.product_id).await?;
    ensure_district_exists(pool, payload.district_id).await?;
    let record = Production::create(pool, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(record)))
}

pub async fn update_production(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    axum::Json(payload): axum::Json<CreateProduction>,
) -> Result<ResponseJson<ApiResponse<Option<Production>>>, ApiError> {
    let pool = &state.db().pool;
    ensure_product_exists(pool, payload.product_id).await?;
    ensure_district_exists(pool, payload.district_id).await?;
    let record = Production::update(pool, id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(record)))
}

pub async fn delete_production(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let rows = Production::delete(&state.db().pool, id).await?;
    if rows == 0 {
        warn!(id, "delete of absent production record");
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router() -> Router<AppState> {
    Router::new().nest(
        "/production",
        Router::new()
            .route("/", get(list_production).post(create_production))
            .route(
                "/{id}",
                get(get_production)
                    .put(update_production)
                    .delete(delete_production),
            ),
    )
}

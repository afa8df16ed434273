use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::get,
};
use db::models::price::{CreatePrice, Price, PriceWithNames};
use tracing::warn;
use utils::response::ApiResponse;

use crate::{
    AppState,
    error::ApiError,
    routes::{ensure_district_exists, ensure_product_exists},
};

pub async fn list_prices(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<PriceWithNames>>>, ApiError> {
    let records = Price::find_all(&state.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(records)))
}

pub async fn get_price(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ResponseJson<ApiResponse<Price>>, ApiError> {
    let record = Price::find_by_id(&state.db().pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("price record {id} not found")))?;
    Ok(ResponseJson(ApiResponse::success(record)))
}

pub async fn create_price(
    State(state): State<AppState>,
    axum::Json(payload): axum::Json<CreatePrice>,
) -> Result<ResponseJson<ApiResponse<Price>>, ApiError> {
    let pool = &state.db().pool;
    ensure_product_exists(pool, payload.product_id).await?;
    ensure_district_exists(pool, payload.district_id).await?;
    let record = Price::create(pool, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(record)))
}

pub async fn update_price(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    axum::Json(payload): axum::Json<CreatePrice>,
) -> Result<ResponseJson<ApiResponse<Option<Price>>>, ApiError> {
    let pool = &state.db().pool;
    ensure_product_exists(pool, payload.product_id).await?;
    ensure_district_exists(pool, payload.district_id).await?;
    let record = Price::update(pool, id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(record)))
}

pub async fn delete_price(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let rows = Price::delete(&state.db().pool, id).await?;
    if rows == 0 {
        warn!(id, "delete of absent price record");
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router() -> Router<AppState> {
    Router::new().nest(
        "/prices",
        Router::new()
            .route("/", get(list_prices).post(create_price))
            .route(
                "/{id}",
                get(get_price).put(update_price).delete(delete_price),
            ),
    )
}

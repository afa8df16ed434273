use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::get,
};
use db::models::nutrition::{CreateNutritionTarget, NutritionTarget, NutritionTargetWithNames};
use tracing::warn;
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError, routes::ensure_product_exists};

pub async fn list_targets(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<NutritionTargetWithNames>>>, ApiError> {
    let targets = NutritionTarget::find_all(&state.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(targets)))
}

pub async fn get_target(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ResponseJson<ApiResponse<NutritionTarget>>, ApiError> {
    let target = NutritionTarget::find_by_id(&state.db().pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("nutrition target {id} not found")))?;
    Ok(ResponseJson(ApiResponse::success(target)))
}

fn validate_month(payload: &CreateNutritionTarget) -> Result<(), ApiError> {
    if !(1..=12).contains(&payload.month) {
        return Err(ApiError::BadRequest(format!(
            "month {} is out of range 1-12",
            payload.month
        )));
    }
    Ok(())
}

pub async fn create_target(
    State(state): State<AppState>,
    axum::Json(payload): axum::Json<CreateNutritionTarget>,
) -> Result<ResponseJson<ApiResponse<NutritionTarget>>, ApiError> {
    validate_month(&payload)?;
    ensure_product_exists(&state.db().pool, payload.product_id).await?;
    let target = NutritionTarget::create(&state.db().pool, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(target)))
}

pub async fn update_target(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    axum::Json(payload): axum::Json<CreateNutritionTarget>,
) -> Result<ResponseJson<ApiResponse<Option<NutritionTarget>>>, ApiError> {
    validate_month(&payload)?;
    ensure_product_exists(&state.db().pool, payload.product_id).await?;
    let target = NutritionTarget::update(&state.db().pool, id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(target)))
}

pub async fn delete_target(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let rows = NutritionTarget::delete(&state.db().pool, id).await?;
    if rows == 0 {
        warn!(id, "delete of absent nutrition target");
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router() -> Router<AppState> {
    Router::new().nest(
        "/nutrition-targets",
        Router::new()
            .route("/", get(list_targets).post(create_target))
            .route(
                "/{id}",
                get(get_target).put(update_target).delete(delete_target),
            ),
    )
}

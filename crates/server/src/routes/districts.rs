use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::get,
};
use db::models::district::{CreateDistrict, District};
use tracing::warn;
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError};

pub async fn list_districts(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<District>>>, ApiError> {
    let districts = District::find_all(&state.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(districts)))
}

pub async fn get_district(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ResponseJson<ApiResponse<District>>, ApiError> {
    let district = District::find_by_id(&state.db().pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("district {id} not found")))?;
    Ok(ResponseJson(ApiResponse::success(district)))
}

pub async fn create_district(
    State(state): State<AppState>,
    axum::Json(payload): axum::Json<CreateDistrict>,
) -> Result<ResponseJson<ApiResponse<District>>, ApiError> {
    let district = District::create(&state.db().pool, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(district)))
}

pub async fn update_district(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    axum::Json(payload): axum::Json<CreateDistrict>,
) -> Result<ResponseJson<ApiResponse<Option<District>>>, ApiError> {
    let district = District::update(&state.db().pool, id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(district)))
}

/// Deleting an id that is already gone still succeeds.
pub async fn delete_district(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let rows = District::delete(&state.db().pool, id).await?;
    if rows == 0 {
        warn!(id, "delete of absent district");
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router() -> Router<AppState> {
    Router::new().nest(
        "/districts",
        Router::new()
            .route("/", get(list_districts).post(create_district))
            .route(
                "/{id}",
                get(get_district).put(update_district).delete(delete_district),
            ),
    )
}

use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::get,
};
use db::models::stakeholder::{
    CreateStakeholder, Stakeholder, StakeholderType, StakeholderWithNames,
};
use tracing::warn;
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError, routes::ensure_district_exists};

pub async fn list_stakeholders(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<StakeholderWithNames>>>, ApiError> {
    let stakeholders = Stakeholder::find_all(&state.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(stakeholders)))
}

pub async fn list_stakeholder_types(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<StakeholderType>>>, ApiError> {
    let types = StakeholderType::find_all(&state.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(types)))
}

pub async fn get_stakeholder(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ResponseJson<ApiResponse<Stakeholder>>, ApiError> {
    let stakeholder = Stakeholder::find_by_id(&state.db().pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("stakeholder {id} not found")))?;
    Ok(ResponseJson(ApiResponse::success(stakeholder)))
}

async fn validate(state: &AppState, payload: &CreateStakeholder) -> Result<(), ApiError> {
    let pool = &state.db().pool;
    if !StakeholderType::exists(pool, payload.stakeholder_type_id).await? {
        return Err(ApiError::BadRequest(format!(
            "stakeholder_type_id {} is not a known stakeholder type",
            payload.stakeholder_type_id
        )));
    }
    ensure_district_exists(pool, payload.district_id).await
}

pub async fn create_stakeholder(
    State(state): State<AppState>,
    axum::Json(payload): axum::Json<CreateStakeholder>,
) -> Result<ResponseJson<ApiResponse<Stakeholder>>, ApiError> {
    validate(&state, &payload).await?;
    let stakeholder = Stakeholder::create(&state.db().pool, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(stakeholder)))
}

pub async fn update_stakeholder(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    axum::Json(payload): axum::Json<CreateStakeholder>,
) -> Result<ResponseJson<ApiResponse<Option<Stakeholder>>>, ApiError> {
    validate(&state, &payload).await?;
    let stakeholder = Stakeholder::update(&state.db().pool, id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(stakeholder)))
}

pub async fn delete_stakeholder(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let rows = Stakeholder::delete(&state.db().pool, id).await?;
    if rows == 0 {
        warn!(id, "delete of absent stakeholder");
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .nest(
            "/stakeholders",
            Router::new()
                .route("/", get(list_stakeholders).post(create_stakeholder))
                .route(
                    "/{id}",
                    get(get_stakeholder)
                        .put(update_stakeholder)
                        .delete(delete_stakeholder),
                ),
        )
        .route("/stakeholder-types", get(list_stakeholder_types))
}

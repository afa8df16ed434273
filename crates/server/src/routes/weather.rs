use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::get,
};
use db::models::weather::{CreateWeather, Weather, WeatherWithNames};
use tracing::warn;
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError, routes::ensure_district_exists};

pub async fn list_weather(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<WeatherWithNames>>>, ApiError> {
    let records = Weather::find_all(&state.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(records)))
}

pub async fn get_weather(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ResponseJson<ApiResponse<Weather>>, ApiError> {
    let record = Weather::find_by_id(&state.db().pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("weather observation {id} not found")))?;
    Ok(ResponseJson(ApiResponse::success(record)))
}

pub async fn create_weather(
    State(state): State<AppState>,
    axum::Json(payload): axum::Json<CreateWeather>,
) -> Result<ResponseJson<ApiResponse<Weather>>, ApiError> {
    let pool = &state.db().pool;
    ensure_district_exists(pool, payload.district_id).await?;
    let record = Weather::create(pool, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(record)))
}

pub async fn update_weather(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    axum::Json(payload): axum::Json<CreateWeather>,
) -> Result<ResponseJson<ApiResponse<Option<Weather>>>, ApiError> {
    let pool = &state.db().pool;
    ensure_district_exists(pool, payload.district_id).await?;
    let record = Weather::update(pool, id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(record)))
}

pub async fn delete_weather(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let rows = Weather::delete(&state.db().pool, id).await?;
    if rows == 0 {
        warn!(id, "delete of absent weather observation");
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router() -> Router<AppState> {
    Router::new().nest(
        "/weather",
        Router::new()
            .route("/", get(list_weather).post(create_weather))
            .route(
                "/{id}",
                get(get_weather).put(update_weather).delete(delete_weather),
            ),
    )
}

use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::get,
};
use db::models::product::{CreateProduct, Product};
use tracing::warn;
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError};

pub async fn list_products(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<Product>>>, ApiError> {
    let products = Product::find_all(&state.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(products)))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ResponseJson<ApiResponse<Product>>, ApiError> {
    let product = Product::find_by_id(&state.db().pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("product {id} not found")))?;
    Ok(ResponseJson(ApiResponse::success(product)))
}

pub async fn create_product(
    State(state): State<AppState>,
    axum::Json(payload): axum::Json<CreateProduct>,
) -> Result<ResponseJson<ApiResponse<Product>>, ApiError> {
    let product = Product::create(&state.db().pool, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(product)))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    axum::Json(payload): axum::Json<CreateProduct>,
) -> Result<ResponseJson<ApiResponse<Option<Product>>>, ApiError> {
    let product = Product::update(&state.db().pool, id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(product)))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let rows = Product::delete(&state.db().pool, id).await?;
    if rows == 0 {
        warn!(id, "delete of absent product");
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router() -> Router<AppState> {
    Router::new().nest(
        "/products",
        Router::new()
            .route("/", get(list_products).post(create_product))
            .route(
                "/{id}",
                get(get_product).put(update_product).delete(delete_product),
            ),
    )
}

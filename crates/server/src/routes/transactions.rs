use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::get,
};
use db::models::transaction::{CreateTransaction, Transaction, TransactionWithNames};
use tracing::warn;
use utils::response::ApiResponse;

use crate::{
    AppState,
    error::ApiError,
    routes::{ensure_product_exists, ensure_stakeholder_exists},
};

pub async fn list_transactions(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<TransactionWithNames>>>, ApiError> {
    let records = Transaction::find_all(&state.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(records)))
}

pub async fn get_transaction(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ResponseJson<ApiResponse<Transaction>>, ApiError> {
    let record = Transaction::find_by_id(&state.db().pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("transaction {id} not found")))?;
    Ok(ResponseJson(ApiResponse::success(record)))
}

async fn validate(state: &AppState, payload: &CreateTransaction) -> Result<(), ApiError> {
    let pool = &state.db().pool;
    ensure_stakeholder_exists(pool, "buyer_id", payload.buyer_id).await?;
    ensure_stakeholder_exists(pool, "seller_id", payload.seller_id).await?;
    ensure_product_exists(pool, payload.product_id).await
}

pub async fn create_transaction(
    State(state): State<AppState>,
    axum::Json(payload): axum::Json<CreateTransaction>,
) -> Result<ResponseJson<ApiResponse<Transaction>>, ApiError> {
    validate(&state, &payload).await?;
    let record = Transaction::create(&state.db().pool, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(record)))
}

pub async fn update_transaction(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    axum::Json(payload): axum::Json<CreateTransaction>,
) -> Result<ResponseJson<ApiResponse<Option<Transaction>>>, ApiError> {
    validate(&state, &payload).await?;
    let record = Transaction::update(&state.db().pool, id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(record)))
}

pub async fn delete_transaction(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let rows = Transaction::delete(&state.db().pool, id).await?;
    if rows == 0 {
        warn!(id, "delete of absent transaction");
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router() -> Router<AppState> {
    Router::new().nest(
        "/transactions",
        Router::new()
            .route("/", get(list_transactions).post(create_transaction))
            .route(
                "/{id}",
                get(get_transaction)
                    .put(update_transaction)
                    .delete(delete_transaction),
            ),
    )
}

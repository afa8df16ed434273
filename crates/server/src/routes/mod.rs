pub mod analytics;
pub mod consumption;
pub mod districts;
pub mod health;
pub mod nutrition;
pub mod prices;
pub mod production;
pub mod products;
pub mod stakeholders;
pub mod transactions;
pub mod weather;

use axum::Router;
use db::models::{district::District, product::Product, stakeholder::Stakeholder};
use sqlx::SqlitePool;

use crate::{AppState, error::ApiError};

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(districts::router())
        .merge(products::router())
        .merge(stakeholders::router())
        .merge(production::router())
        .merge(prices::router())
        .merge(consumption::router())
        .merge(transactions::router())
        .merge(weather::router())
        .merge(nutrition::router())
        .merge(analytics::router())
}

// Referential checks run before any fact-row write so the caller gets a
// guidance message instead of a bare constraint failure.

pub(crate) async fn ensure_product_exists(pool: &SqlitePool, id: i64) -> Result<(), ApiError> {
    if Product::exists(pool, id).await? {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!(
            "product_id {id} does not exist; create the product first"
        )))
    }
}

pub(crate) async fn ensure_district_exists(pool: &SqlitePool, id: i64) -> Result<(), ApiError> {
    if District::exists(pool, id).await? {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!(
            "district_id {id} does not exist; create the district first"
        )))
    }
}

pub(crate) async fn ensure_stakeholder_exists(
    pool: &SqlitePool,
    field: &str,
    id: i64,
) -> Result<(), ApiError> {
    if Stakeholder::exists(pool, id).await? {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!(
            "{field} {id} does not refer to an existing stakeholder"
        )))
    }
}

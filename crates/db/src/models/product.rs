use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;

/// A crop or good tracked through the supply chain.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub product_type: String,
    pub variety: Option<String>,
    pub sowing_time: Option<String>,
    pub harvest_time: Option<String>,
    /// Seed needed per unit area, in the unit the acreage column uses.
    pub seed_requirement: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateProduct {
    pub name: String,
    #[serde(rename = "type")]
    pub product_type: String,
    pub variety: Option<String>,
    pub sowing_time: Option<String>,
    pub harvest_time: Option<String>,
    pub seed_requirement: Option<f64>,
}

const COLUMNS: &str = "id, name, type, variety, sowing_time, harvest_time, seed_requirement";

impl Product {
    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(&format!("SELECT {COLUMNS} FROM products ORDER BY name"))
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(&format!("SELECT {COLUMNS} FROM products WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn exists(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE id = $1")
            .bind(id)
            .fetch_one(pool)
            .await?;
        Ok(count > 0)
    }

    pub async fn create(pool: &SqlitePool, data: &CreateProduct) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(&format!(
            "INSERT INTO products (name, type, variety, sowing_time, harvest_time, seed_requirement)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        ))
        .bind(&data.name)
        .bind(&data.product_type)
        .bind(&data.variety)
        .bind(&data.sowing_time)
        .bind(&data.harvest_time)
        .bind(data.seed_requirement)
        .fetch_one(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        data: &CreateProduct,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(&format!(
            "UPDATE products
             SET name = $2, type = $3, variety = $4, sowing_time = $5, harvest_time = $6, seed_requirement = $7
             WHERE id = $1
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(&data.name)
        .bind(&data.product_type)
        .bind(&data.variety)
        .bind(&data.sowing_time)
        .bind(&data.harvest_time)
        .bind(data.seed_requirement)
        .fetch_optional(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

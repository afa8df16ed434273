use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;

/// One observed production event: a quantity harvested from some acreage.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Production {
    pub id: i64,
    pub product_id: i64,
    pub district_id: i64,
    pub date: NaiveDate,
    pub acreage: f64,
    pub quantity: f64,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct ProductionWithNames {
    #[sqlx(flatten)]
    #[serde(flatten)]
    #[ts(flatten)]
    pub production: Production,
    pub product_name: String,
    pub district_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateProduction {
    pub product_id: i64,
    pub district_id: i64,
    pub date: NaiveDate,
    pub acreage: f64,
    pub quantity: f64,
}

const COLUMNS: &str = "pr.id, pr.product_id, pr.district_id, pr.date, pr.acreage, pr.quantity";

impl Production {
    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<ProductionWithNames>, sqlx::Error> {
        sqlx::query_as::<_, ProductionWithNames>(&format!(
            "SELECT {COLUMNS}, p.name AS product_name, d.name AS district_name
             FROM production pr
             JOIN products p ON p.id = pr.product_id
             JOIN districts d ON d.id = pr.district_id
             ORDER BY pr.date DESC, pr.id DESC"
        ))
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT id, product_id, district_id, date, acreage, quantity
             FROM production WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn create(pool: &SqlitePool, data: &CreateProduction) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO production (product_id, district_id, date, acreage, quantity)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, product_id, district_id, date, acreage, quantity",
        )
        .bind(data.product_id)
        .bind(data.district_id)
        .bind(data.date)
        .bind(data.acreage)
        .bind(data.quantity)
        .fetch_one(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        data: &CreateProduction,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "UPDATE production
             SET product_id = $2, district_id = $3, date = $4, acreage = $5, quantity = $6
             WHERE id = $1
             RETURNING id, product_id, district_id, date, acreage, quantity",
        )
        .bind(id)
        .bind(data.product_id)
        .bind(data.district_id)
        .bind(data.date)
        .bind(data.acreage)
        .bind(data.quantity)
        .fetch_optional(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM production WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Price {
    pub id: i64,
    pub product_id: i64,
    pub district_id: i64,
    pub date: NaiveDate,
    pub price_per_unit: f64,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct PriceWithNames {
    #[sqlx(flatten)]
    #[serde(flatten)]
    #[ts(flatten)]
    pub price: Price,
    pub product_name: String,
    pub district_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreatePrice {
    pub product_id: i64,
    pub district_id: i64,
    pub date: NaiveDate,
    pub price_per_unit: f64,
}

const COLUMNS: &str = "pc.id, pc.product_id, pc.district_id, pc.date, pc.price_per_unit";

impl Price {
    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<PriceWithNames>, sqlx::Error> {
        sqlx::query_as::<_, PriceWithNames>(&format!(
            "SELECT {COLUMNS}, p.name AS product_name, d.name AS district_name
             FROM prices pc
             JOIN products p ON p.id = pc.product_id
             JOIN districts d ON d.id = pc.district_id
             ORDER BY pc.date DESC, pc.id DESC"
        ))
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT id, product_id, district_id, date, price_per_unit FROM prices WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn create(pool: &SqlitePool, data: &CreatePrice) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO prices (product_id, district_id, date, price_per_unit)
             VALUES ($1, $2, $3, $4)
             RETURNING id, product_id, district_id, date, price_per_unit",
        )
        .bind(data.product_id)
        .bind(data.district_id)
        .bind(data.date)
        .bind(data.price_per_unit)
        .fetch_one(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        data: &CreatePrice,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "UPDATE prices
             SET product_id = $2, district_id = $3, date = $4, price_per_unit = $5
             WHERE id = $1
             RETURNING id, product_id, district_id, date, price_per_unit",
        )
        .bind(id)
        .bind(data.product_id)
        .bind(data.district_id)
        .bind(data.date)
        .bind(data.price_per_unit)
        .fetch_optional(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM prices WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Consumption {
    pub id: i64,
    pub stakeholder_id: i64,
    pub product_id: i64,
    pub date: NaiveDate,
    pub quantity: f64,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct ConsumptionWithNames {
    #[sqlx(flatten)]
    #[serde(flatten)]
    #[ts(flatten)]
    pub consumption: Consumption,
    pub stakeholder_name: String,
    pub product_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateConsumption {
    pub stakeholder_id: i64,
    pub product_id: i64,
    pub date: NaiveDate,
    pub quantity: f64,
}

const COLUMNS: &str = "c.id, c.stakeholder_id, c.product_id, c.date, c.quantity";

impl Consumption {
    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<ConsumptionWithNames>, sqlx::Error> {
        sqlx::query_as::<_, ConsumptionWithNames>(&format!(
            "SELECT {COLUMNS}, s.name AS stakeholder_name, p.name AS product_name
             FROM consumption c
             JOIN stakeholders s ON s.id = c.stakeholder_id
             JOIN products p ON p.id = c.product_id
             ORDER BY c.date DESC, c.id DESC"
        ))
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT id, stakeholder_id, product_id, date, quantity FROM consumption WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn create(pool: &SqlitePool, data: &CreateConsumption) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO consumption (stakeholder_id, product_id, date, quantity)
             VALUES ($1, $2, $3, $4)
             RETURNING id, stakeholder_id, product_id, date, quantity",
        )
        .bind(data.stakeholder_id)
        .bind(data.product_id)
        .bind(data.date)
        .bind(data.quantity)
        .fetch_one(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        data: &CreateConsumption,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "UPDATE consumption
             SET stakeholder_id = $2, product_id = $3, date = $4, quantity = $5
             WHERE id = $1
             RETURNING id, stakeholder_id, product_id, date, quantity",
        )
        .bind(id)
        .bind(data.stakeholder_id)
        .bind(data.product_id)
        .bind(data.date)
        .bind(data.quantity)
        .fetch_optional(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM consumption WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

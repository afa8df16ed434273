use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;

/// A trade between two stakeholders. `total_amount` is stored, not derived,
/// so historical rows keep the price actually settled at.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Transaction {
    pub id: i64,
    pub buyer_id: i64,
    pub seller_id: i64,
    pub product_id: i64,
    pub quantity: f64,
    pub price_per_unit: f64,
    pub total_amount: f64,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct TransactionWithNames {
    #[sqlx(flatten)]
    #[serde(flatten)]
    #[ts(flatten)]
    pub transaction: Transaction,
    pub buyer_name: String,
    pub seller_name: String,
    pub product_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateTransaction {
    pub buyer_id: i64,
    pub seller_id: i64,
    pub product_id: i64,
    pub quantity: f64,
    pub price_per_unit: f64,
    /// Defaults to quantity * price_per_unit when omitted.
    pub total_amount: Option<f64>,
    pub date: NaiveDate,
}

const COLUMNS: &str =
    "t.id, t.buyer_id, t.seller_id, t.product_id, t.quantity, t.price_per_unit, t.total_amount, t.date";

impl Transaction {
    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<TransactionWithNames>, sqlx::Error> {
        sqlx::query_as::<_, TransactionWithNames>(&format!(
            "SELECT {COLUMNS},
                    b.name AS buyer_name, sl.name AS seller_name, p.name AS product_name
             FROM transactions t
             JOIN stakeholders b ON b.id = t.buyer_id
             JOIN stakeholders sl ON sl.id = t.seller_id
             JOIN products p ON p.id = t.product_id
             ORDER BY t.date DESC, t.id DESC"
        ))
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT id, buyer_id, seller_id, product_id, quantity, price_per_unit, total_amount, date
             FROM transactions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn create(pool: &SqlitePool, data: &CreateTransaction) -> Result<Self, sqlx::Error> {
        let total_amount = data
            .total_amount
            .unwrap_or(data.quantity * data.price_per_unit);
        sqlx::query_as::<_, Self>(
            "INSERT INTO transactions (buyer_id, seller_id, product_id, quantity, price_per_unit, total_amount, date)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id, buyer_id, seller_id, product_id, quantity, price_per_unit, total_amount, date",
        )
        .bind(data.buyer_id)
        .bind(data.seller_id)
        .bind(data.product_id)
        .bind(data.quantity)
        .bind(data.price_per_unit)
        .bind(total_amount)
        .bind(data.date)
        .fetch_one(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        data: &CreateTransaction,
    ) -> Result<Option<Self>, sqlx::Error> {
        let total_amount = data
            .total_amount
            .unwrap_or(data.quantity * data.price_per_unit);
        sqlx::query_as::<_, Self>(
            "UPDATE transactions
             SET buyer_id = $2, seller_id = $3, product_id = $4, quantity = $5,
                 price_per_unit = $6, total_amount = $7, date = $8
             WHERE id = $1
             RETURNING id, buyer_id, seller_id, product_id, quantity, price_per_unit, total_amount, date",
        )
        .bind(id)
        .bind(data.buyer_id)
        .bind(data.seller_id)
        .bind(data.product_id)
        .bind(data.quantity)
        .bind(data.price_per_unit)
        .bind(total_amount)
        .bind(data.date)
        .fetch_optional(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;

/// Per-capita requirement for a product in a given month/year.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct NutritionTarget {
    pub id: i64,
    pub product_id: i64,
    pub month: i64,
    pub year: i64,
    pub required_per_capita: f64,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct NutritionTargetWithNames {
    #[sqlx(flatten)]
    #[serde(flatten)]
    #[ts(flatten)]
    pub target: NutritionTarget,
    pub product_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateNutritionTarget {
    pub product_id: i64,
    pub month: i64,
    pub year: i64,
    pub required_per_capita: f64,
}

impl NutritionTarget {
    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<NutritionTargetWithNames>, sqlx::Error> {
        sqlx::query_as::<_, NutritionTargetWithNames>(
            "SELECT nt.id, nt.product_id, nt.month, nt.year, nt.required_per_capita,
                    p.name AS product_name
             FROM nutrition_targets nt
             JOIN products p ON p.id = nt.product_id
             ORDER BY nt.year DESC, nt.month DESC, p.name",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT id, product_id, month, year, required_per_capita
             FROM nutrition_targets WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn create(
        pool: &SqlitePool,
        data: &CreateNutritionTarget,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO nutrition_targets (product_id, month, year, required_per_capita)
             VALUES ($1, $2, $3, $4)
             RETURNING id, product_id, month, year, required_per_capita",
        )
        .bind(data.product_id)
        .bind(data.month)
        .bind(data.year)
        .bind(data.required_per_capita)
        .fetch_one(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        data: &CreateNutritionTarget,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "UPDATE nutrition_targets
             SET product_id = $2, month = $3, year = $4, required_per_capita = $5
             WHERE id = $1
             RETURNING id, product_id, month, year, required_per_capita",
        )
        .bind(id)
        .bind(data.product_id)
        .bind(data.month)
        .bind(data.year)
        .bind(data.required_per_capita)
        .fetch_optional(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM nutrition_targets WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;

/// One of the four fixed roles seeded by the initial migration.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct StakeholderType {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Stakeholder {
    pub id: i64,
    pub name: String,
    pub stakeholder_type_id: i64,
    pub district_id: i64,
    pub contact_info: Option<String>,
}

/// Stakeholder row with dimension names joined in, as the dashboard tables expect.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct StakeholderWithNames {
    #[sqlx(flatten)]
    #[serde(flatten)]
    #[ts(flatten)]
    pub stakeholder: Stakeholder,
    pub type_name: String,
    pub district_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateStakeholder {
    pub name: String,
    pub stakeholder_type_id: i64,
    pub district_id: i64,
    pub contact_info: Option<String>,
}

const COLUMNS: &str = "s.id, s.name, s.stakeholder_type_id, s.district_id, s.contact_info";

impl StakeholderType {
    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT id, name FROM stakeholder_types ORDER BY id")
            .fetch_all(pool)
            .await
    }

    pub async fn exists(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stakeholder_types WHERE id = $1")
            .bind(id)
            .fetch_one(pool)
            .await?;
        Ok(count > 0)
    }
}

impl Stakeholder {
    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<StakeholderWithNames>, sqlx::Error> {
        sqlx::query_as::<_, StakeholderWithNames>(&format!(
            "SELECT {COLUMNS}, st.name AS type_name, d.name AS district_name
             FROM stakeholders s
             JOIN stakeholder_types st ON st.id = s.stakeholder_type_id
             JOIN districts d ON d.id = s.district_id
             ORDER BY s.name"
        ))
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT id, name, stakeholder_type_id, district_id, contact_info
             FROM stakeholders WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn exists(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stakeholders WHERE id = $1")
            .bind(id)
            .fetch_one(pool)
            .await?;
        Ok(count > 0)
    }

    pub async fn create(pool: &SqlitePool, data: &CreateStakeholder) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO stakeholders (name, stakeholder_type_id, district_id, contact_info)
             VALUES ($1, $2, $3, $4)
             RETURNING id, name, stakeholder_type_id, district_id, contact_info",
        )
        .bind(&data.name)
        .bind(data.stakeholder_type_id)
        .bind(data.district_id)
        .bind(&data.contact_info)
        .fetch_one(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        data: &CreateStakeholder,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "UPDATE stakeholders
             SET name = $2, stakeholder_type_id = $3, district_id = $4, contact_info = $5
             WHERE id = $1
             RETURNING id, name, stakeholder_type_id, district_id, contact_info",
        )
        .bind(id)
        .bind(&data.name)
        .bind(data.stakeholder_type_id)
        .bind(data.district_id)
        .bind(&data.contact_info)
        .fetch_optional(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM stakeholders WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

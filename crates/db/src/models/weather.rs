use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;

/// Daily observation per district. Rainfall in mm, temperature in °C.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Weather {
    pub id: i64,
    pub district_id: i64,
    pub date: NaiveDate,
    pub rainfall: f64,
    pub temperature: f64,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct WeatherWithNames {
    #[sqlx(flatten)]
    #[serde(flatten)]
    #[ts(flatten)]
    pub weather: Weather,
    pub district_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateWeather {
    pub district_id: i64,
    pub date: NaiveDate,
    pub rainfall: f64,
    pub temperature: f64,
}

impl Weather {
    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<WeatherWithNames>, sqlx::Error> {
        sqlx::query_as::<_, WeatherWithNames>(
            "SELECT w.id, w.district_id, w.date, w.rainfall, w.temperature,
                    d.name AS district_name
             FROM weather w
             JOIN districts d ON d.id = w.district_id
             ORDER BY w.date DESC, w.id DESC",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT id, district_id, date, rainfall, temperature FROM weather WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn create(pool: &SqlitePool, data: &CreateWeather) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO weather (district_id, date, rainfall, temperature)
             VALUES ($1, $2, $3, $4)
             RETURNING id, district_id, date, rainfall, temperature",
        )
        .bind(data.district_id)
        .bind(data.date)
        .bind(data.rainfall)
        .bind(data.temperature)
        .fetch_one(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        data: &CreateWeather,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "UPDATE weather
             SET district_id = $2, date = $3, rainfall = $4, temperature = $5
             WHERE id = $1
             RETURNING id, district_id, date, rainfall, temperature",
        )
        .bind(id)
        .bind(data.district_id)
        .bind(data.date)
        .bind(data.rainfall)
        .bind(data.temperature)
        .fetch_optional(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM weather WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

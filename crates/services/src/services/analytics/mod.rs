//! The analytical query layer: one engine executing declarative query
//! plans, dispatched by analysis type.

pub mod filter;
pub mod plans;
pub mod rows;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::SqlitePool;
use strum_macros::{Display, EnumString};
use thiserror::Error;
use tracing::debug;
use ts_rs::TS;

pub use filter::AnalysisFilter;

use plans::QueryPlan;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Invalid analysis type: {0}")]
    InvalidAnalysisType(String),
}

/// Discriminator selecting which aggregation routine runs.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, TS, EnumString, Display, Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AnalysisType {
    #[default]
    Overview,
    SurplusDeficit,
    PriceTrend,
    ConsumptionPattern,
    StakeholderComparison,
    Correlation,
    RegionalComparison,
    Seasonal,
}

impl AnalysisType {
    /// Strict parse; an unknown discriminator is a client error, never a
    /// silent default.
    pub fn parse(raw: &str) -> Result<Self, AnalyticsError> {
        raw.parse()
            .map_err(|_| AnalyticsError::InvalidAnalysisType(raw.to_string()))
    }
}

/// Read-only aggregation over the fact tables. Every call runs exactly one
/// statement on a pooled connection.
#[derive(Clone)]
pub struct AnalyticsService {
    pool: SqlitePool,
}

impl AnalyticsService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// The demand-supply endpoint's router: all eight analysis types.
    pub async fn demand_supply(
        &self,
        analysis: AnalysisType,
        filter: &AnalysisFilter,
    ) -> Result<Vec<Value>, AnalyticsError> {
        let plan = match analysis {
            AnalysisType::Overview => plans::overview(),
            AnalysisType::SurplusDeficit => plans::surplus_deficit(),
            AnalysisType::PriceTrend => plans::price_trend(),
            AnalysisType::ConsumptionPattern => plans::consumption_pattern(),
            AnalysisType::StakeholderComparison => plans::stakeholder_comparison(),
            AnalysisType::Correlation => plans::correlation(),
            AnalysisType::RegionalComparison => plans::regional_comparison(),
            AnalysisType::Seasonal => plans::seasonal(),
        };
        self.run(&plan, filter).await
    }

    /// Weather-impact endpoint: correlation (default) or seasonal views.
    pub async fn weather_impact(
        &self,
        analysis: AnalysisType,
        filter: &AnalysisFilter,
    ) -> Result<Vec<Value>, AnalyticsError> {
        let plan = match analysis {
            AnalysisType::Correlation => plans::correlation(),
            AnalysisType::Seasonal => plans::seasonal(),
            other => return Err(AnalyticsError::InvalidAnalysisType(other.to_string())),
        };
        self.run(&plan, filter).await
    }

    /// Consumption against per-capita nutrition targets.
    pub async fn nutrition(&self, filter: &AnalysisFilter) -> Result<Vec<Value>, AnalyticsError> {
        self.run(&plans::nutrition(), filter).await
    }

    /// Supply vs. demand totals per product.
    pub async fn supply_demand(
        &self,
        filter: &AnalysisFilter,
    ) -> Result<Vec<Value>, AnalyticsError> {
        self.run(&plans::supply_demand(), filter).await
    }

    async fn run(
        &self,
        plan: &QueryPlan,
        filter: &AnalysisFilter,
    ) -> Result<Vec<Value>, AnalyticsError> {
        let (sql, params) = plan.compile(filter);
        debug!(%sql, ?params, "running analysis query");

        let mut query = sqlx::query(&sql);
        for param in &params {
            query = param.bind_to(query);
        }
        let raw_rows = query.fetch_all(&self.pool).await?;

        let mut result = Vec::with_capacity(raw_rows.len());
        for raw in &raw_rows {
            let mut object = rows::row_to_object(raw)?;
            for field in plan.zero_fill {
                rows::coerce_number(&mut object, field);
            }
            if let Some(post) = plan.post {
                post(&mut object);
            }
            result.push(Value::Object(object));
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_discriminators() {
        assert_eq!(AnalysisType::parse("overview").unwrap(), AnalysisType::Overview);
        assert_eq!(
            AnalysisType::parse("surplus_deficit").unwrap(),
            AnalysisType::SurplusDeficit
        );
        assert_eq!(
            AnalysisType::parse("correlation").unwrap(),
            AnalysisType::Correlation
        );
    }

    #[test]
    fn unknown_discriminator_is_an_error_naming_the_value() {
        let err = AnalysisType::parse("unknown_value").unwrap_err();
        assert_eq!(err.to_string(), "Invalid analysis type: unknown_value");
    }
}

//! Structured WHERE-clause builder for the analytical queries.
//!
//! Filters arrive as raw query-string values. Compiling against a
//! [`FilterColumns`] mapping yields a predicate fragment and the bound
//! parameters in the exact order the fragment references them.

use std::fmt::Write;

use serde::Deserialize;
use sqlx::{Sqlite, query::Query, sqlite::SqliteArguments};
use ts_rs::TS;

/// Sentinel value the dashboard sends for "no filter".
const BYPASS: &str = "all";

/// The optional filters every analysis endpoint accepts. Values are kept
/// raw; malformed literals are bound as-is and left for the store to
/// reject or mismatch.
#[derive(Debug, Clone, Default, Deserialize, TS)]
pub struct AnalysisFilter {
    pub product_id: Option<String>,
    pub district_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub start_year: Option<String>,
    pub end_year: Option<String>,
}

/// Maps each filter onto the column (or expression) it constrains in a
/// particular query. `None` means the query has no such dimension and the
/// filter is skipped for it.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterColumns {
    pub product_id: Option<&'static str>,
    pub district_id: Option<&'static str>,
    pub date: Option<&'static str>,
    /// Expression yielding an integer year, e.g. `nt.year` or
    /// `CAST(strftime('%Y', pr.date) AS INTEGER)`.
    pub year: Option<&'static str>,
}

/// A value bound positionally onto a query.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Int(i64),
    Text(String),
}

impl SqlParam {
    /// Integer when the raw value parses as one, otherwise passed through
    /// as text.
    fn from_raw(raw: &str) -> Self {
        raw.parse::<i64>()
            .map(SqlParam::Int)
            .unwrap_or_else(|_| SqlParam::Text(raw.to_string()))
    }

    pub fn bind_to<'q>(
        &'q self,
        query: Query<'q, Sqlite, SqliteArguments<'q>>,
    ) -> Query<'q, Sqlite, SqliteArguments<'q>> {
        match self {
            SqlParam::Int(value) => query.bind(*value),
            SqlParam::Text(value) => query.bind(value.as_str()),
        }
    }
}

/// A predicate fragment plus its parameters, positionally consistent.
#[derive(Debug, Clone, PartialEq)]
pub struct WhereClause {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

/// Absent, empty and `"all"` all mean "no filter".
fn effective(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case(BYPASS))
}

impl AnalysisFilter {
    /// Compile the set filters into a predicate against `columns`. Never
    /// fails; with nothing to constrain the clause is a plain `1=1`.
    pub fn compile(&self, columns: &FilterColumns) -> WhereClause {
        let mut sql = String::from("1=1");
        let mut params = Vec::new();

        if let (Some(col), Some(value)) = (columns.product_id, effective(&self.product_id)) {
            let _ = write!(sql, " AND {col} = ?");
            params.push(SqlParam::from_raw(value));
        }
        if let (Some(col), Some(value)) = (columns.district_id, effective(&self.district_id)) {
            let _ = write!(sql, " AND {col} = ?");
            params.push(SqlParam::from_raw(value));
        }
        if let Some(col) = columns.date {
            if let Some(value) = effective(&self.start_date) {
                let _ = write!(sql, " AND {col} >= ?");
                params.push(SqlParam::Text(value.to_string()));
            }
            if let Some(value) = effective(&self.end_date) {
                let _ = write!(sql, " AND {col} <= ?");
                params.push(SqlParam::Text(value.to_string()));
            }
        }
        // Year range applies on top of any date range, not instead of it.
        if let Some(expr) = columns.year {
            if let Some(value) = effective(&self.start_year) {
                let _ = write!(sql, " AND {expr} >= ?");
                params.push(SqlParam::from_raw(value));
            }
            if let Some(value) = effective(&self.end_year) {
                let _ = write!(sql, " AND {expr} <= ?");
                params.push(SqlParam::from_raw(value));
            }
        }

        WhereClause { sql, params }
    }
}

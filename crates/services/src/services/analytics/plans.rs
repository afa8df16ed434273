//! One query plan per analysis type. Each plan declares its SQL shape,
//! where the shared filters plug in, which aggregate columns must come
//! back as zero-defaulted numbers, and any derived fields added after the
//! query runs. The execution path is shared; only these declarations vary.

use serde_json::{Map, Number, Value};

use super::{
    filter::{AnalysisFilter, FilterColumns, SqlParam},
    rows,
};

/// Marker replaced by a compiled [`WhereClause`](super::filter::WhereClause)
/// fragment. A template may carry several, one per fact table it touches;
/// `filters` maps onto them in order.
pub const FILTER: &str = "{filter}";

pub struct QueryPlan {
    pub sql: &'static str,
    pub filters: &'static [FilterColumns],
    /// Aggregate columns coerced to numbers with a zero default.
    pub zero_fill: &'static [&'static str],
    pub post: Option<fn(&mut Map<String, Value>)>,
}

impl QueryPlan {
    /// Substitute every filter marker, accumulating bound parameters in
    /// marker order so positions stay consistent.
    pub fn compile(&self, filter: &AnalysisFilter) -> (String, Vec<SqlParam>) {
        let mut parts = self.sql.split(FILTER);
        let mut sql = String::from(parts.next().unwrap_or_default());
        let mut params = Vec::new();
        for (rest, columns) in parts.zip(self.filters) {
            let clause = filter.compile(columns);
            sql.push_str(&clause.sql);
            params.extend(clause.params);
            sql.push_str(rest);
        }
        (sql, params)
    }
}

const PRODUCTION: FilterColumns = FilterColumns {
    product_id: Some("pr.product_id"),
    district_id: Some("pr.district_id"),
    date: Some("pr.date"),
    year: Some("CAST(strftime('%Y', pr.date) AS INTEGER)"),
};

/// Consumption joined through stakeholders for its district dimension.
const CONSUMPTION: FilterColumns = FilterColumns {
    product_id: Some("c.product_id"),
    district_id: Some("s.district_id"),
    date: Some("c.date"),
    year: Some("CAST(strftime('%Y', c.date) AS INTEGER)"),
};

const PRICES: FilterColumns = FilterColumns {
    product_id: Some("pc.product_id"),
    district_id: Some("pc.district_id"),
    date: Some("pc.date"),
    year: Some("CAST(strftime('%Y', pc.date) AS INTEGER)"),
};

const WEATHER: FilterColumns = FilterColumns {
    product_id: None,
    district_id: Some("w.district_id"),
    date: Some("w.date"),
    year: Some("CAST(strftime('%Y', w.date) AS INTEGER)"),
};

fn surplus_post(object: &mut Map<String, Value>) {
    let status = rows::surplus_status(rows::number(object, "surplus_deficit"));
    object.insert("status".into(), Value::String(status.into()));
}

/// Total supply vs. consumption per product and district, with average
/// price and a surplus/deficit bucket.
pub fn overview() -> QueryPlan {
    QueryPlan {
        sql: "SELECT
                p.id AS product_id, p.name AS product_name,
                d.id AS district_id, d.name AS district_name,
                COALESCE(sup.total_supply, 0) AS total_supply,
                COALESCE(con.total_consumption, 0) AS total_consumption,
                COALESCE(sup.total_supply, 0) - COALESCE(con.total_consumption, 0) AS surplus_deficit,
                COALESCE(px.avg_price, 0) AS avg_price
              FROM (SELECT pr.product_id, pr.district_id, SUM(pr.quantity) AS total_supply
                      FROM production pr WHERE {filter}
                     GROUP BY pr.product_id, pr.district_id) sup
              JOIN products p ON p.id = sup.product_id
              JOIN districts d ON d.id = sup.district_id
              LEFT JOIN (SELECT c.product_id, s.district_id, SUM(c.quantity) AS total_consumption
                           FROM consumption c
                           JOIN stakeholders s ON s.id = c.stakeholder_id
                          WHERE {filter}
                          GROUP BY c.product_id, s.district_id) con
                ON con.product_id = sup.product_id AND con.district_id = sup.district_id
              LEFT JOIN (SELECT pc.product_id, pc.district_id, AVG(pc.price_per_unit) AS avg_price
                           FROM prices pc WHERE {filter}
                          GROUP BY pc.product_id, pc.district_id) px
                ON px.product_id = sup.product_id AND px.district_id = sup.district_id
              ORDER BY p.name, d.name",
        filters: &[PRODUCTION, CONSUMPTION, PRICES],
        zero_fill: &["total_supply", "total_consumption", "surplus_deficit", "avg_price"],
        post: Some(surplus_post),
    }
}

/// Monthly surplus/deficit per product and district.
pub fn surplus_deficit() -> QueryPlan {
    QueryPlan {
        sql: "SELECT
                p.id AS product_id, p.name AS product_name,
                d.id AS district_id, d.name AS district_name,
                sup.period AS period,
                COALESCE(sup.total_supply, 0) AS total_supply,
                COALESCE(con.total_consumption, 0) AS total_consumption,
                COALESCE(sup.total_supply, 0) - COALESCE(con.total_consumption, 0) AS surplus_deficit
              FROM (SELECT pr.product_id, pr.district_id,
                           strftime('%Y-%m', pr.date) AS period,
                           SUM(pr.quantity) AS total_supply
                      FROM production pr WHERE {filter}
                     GROUP BY pr.product_id, pr.district_id, period) sup
              JOIN products p ON p.id = sup.product_id
              JOIN districts d ON d.id = sup.district_id
              LEFT JOIN (SELECT c.product_id, s.district_id,
                                strftime('%Y-%m', c.date) AS period,
                                SUM(c.quantity) AS total_consumption
                           FROM consumption c
                           JOIN stakeholders s ON s.id = c.stakeholder_id
                          WHERE {filter}
                          GROUP BY c.product_id, s.district_id, period) con
                ON con.product_id = sup.product_id
               AND con.district_id = sup.district_id
               AND con.period = sup.period
              ORDER BY p.name, d.name, sup.period",
        filters: &[PRODUCTION, CONSUMPTION],
        zero_fill: &["total_supply", "total_consumption", "surplus_deficit"],
        post: Some(surplus_post),
    }
}

fn price_trend_post(object: &mut Map<String, Value>) {
    let id = rows::synthesize_id(object, &["product_id", "district_id", "period"]);
    object.insert("id".into(), Value::String(id));

    // No prior period in the partition means no change figure at all.
    let change = match (object.get("prev_price"), object.get("avg_price")) {
        (Some(Value::Number(prev)), Some(Value::Number(current))) => {
            let prev = prev.as_f64().unwrap_or(0.0);
            let current = current.as_f64().unwrap_or(0.0);
            if prev == 0.0 {
                Value::Null
            } else {
                Number::from_f64(((current - prev) / prev * 100.0 * 100.0).round() / 100.0)
                    .map(Value::Number)
                    .unwrap_or(Value::Null)
            }
        }
        _ => Value::Null,
    };
    object.insert("price_change_pct".into(), change);
}

/// Monthly average price per product and district, with percent change
/// against the immediately preceding period in the same partition.
pub fn price_trend() -> QueryPlan {
    QueryPlan {
        sql: "SELECT
                p.id AS product_id, p.name AS product_name,
                d.id AS district_id, d.name AS district_name,
                strftime('%Y-%m', pc.date) AS period,
                COALESCE(AVG(pc.price_per_unit), 0) AS avg_price,
                LAG(AVG(pc.price_per_unit)) OVER (
                    PARTITION BY p.id, d.id
                    ORDER BY strftime('%Y-%m', pc.date)
                ) AS prev_price
              FROM prices pc
              JOIN products p ON p.id = pc.product_id
              JOIN districts d ON d.id = pc.district_id
              WHERE {filter}
              GROUP BY p.id, d.id, period
              ORDER BY p.name, d.name, period",
        filters: &[PRICES],
        zero_fill: &["avg_price"],
        post: Some(price_trend_post),
    }
}

/// Monthly consumption per product and stakeholder role.
pub fn consumption_pattern() -> QueryPlan {
    QueryPlan {
        sql: "SELECT
                p.id AS product_id, p.name AS product_name,
                st.id AS stakeholder_type_id, st.name AS stakeholder_type,
                strftime('%Y-%m', c.date) AS period,
                COALESCE(SUM(c.quantity), 0) AS total_consumed,
                COUNT(DISTINCT c.stakeholder_id) AS consumer_count
              FROM consumption c
              JOIN stakeholders s ON s.id = c.stakeholder_id
              JOIN stakeholder_types st ON st.id = s.stakeholder_type_id
              JOIN products p ON p.id = c.product_id
              WHERE {filter}
              GROUP BY p.id, st.id, period
              ORDER BY p.name, st.name, period",
        filters: &[CONSUMPTION],
        zero_fill: &["total_consumed", "consumer_count"],
        post: None,
    }
}

/// Participation and traded volume per stakeholder role. A stakeholder
/// counts into a transaction as either buyer or seller.
pub fn stakeholder_comparison() -> QueryPlan {
    QueryPlan {
        sql: "SELECT
                st.id AS stakeholder_type_id, st.name AS stakeholder_type,
                COUNT(DISTINCT s.id) AS stakeholder_count,
                COUNT(t.id) AS transaction_count,
                COALESCE(SUM(t.quantity), 0) AS traded_quantity,
                COALESCE(SUM(t.total_amount), 0) AS traded_value
              FROM stakeholder_types st
              LEFT JOIN stakeholders s ON s.stakeholder_type_id = st.id
              LEFT JOIN transactions t ON (t.buyer_id = s.id OR t.seller_id = s.id)
              WHERE {filter}
              GROUP BY st.id
              ORDER BY st.name",
        filters: &[FilterColumns {
            product_id: Some("t.product_id"),
            district_id: Some("s.district_id"),
            date: Some("t.date"),
            year: Some("CAST(strftime('%Y', t.date) AS INTEGER)"),
        }],
        zero_fill: &[
            "stakeholder_count",
            "transaction_count",
            "traded_quantity",
            "traded_value",
        ],
        post: None,
    }
}

fn correlation_post(object: &mut Map<String, Value>) {
    let rainfall = rows::rainfall_bucket(rows::number(object, "avg_rainfall"));
    let temperature = rows::temperature_bucket(rows::number(object, "avg_temperature"));
    object.insert("rainfall_level".into(), Value::String(rainfall.into()));
    object.insert("temperature_level".into(), Value::String(temperature.into()));
}

/// Monthly weather per district against production and price.
pub fn correlation() -> QueryPlan {
    QueryPlan {
        sql: "SELECT
                d.id AS district_id, d.name AS district_name,
                wx.period AS period,
                COALESCE(wx.avg_rainfall, 0) AS avg_rainfall,
                COALESCE(wx.avg_temperature, 0) AS avg_temperature,
                COALESCE(sup.total_production, 0) AS total_production,
                COALESCE(px.avg_price, 0) AS avg_price
              FROM (SELECT w.district_id, strftime('%Y-%m', w.date) AS period,
                           AVG(w.rainfall) AS avg_rainfall,
                           AVG(w.temperature) AS avg_temperature
                      FROM weather w WHERE {filter}
                     GROUP BY w.district_id, period) wx
              JOIN districts d ON d.id = wx.district_id
              LEFT JOIN (SELECT pr.district_id, strftime('%Y-%m', pr.date) AS period,
                                SUM(pr.quantity) AS total_production
                           FROM production pr WHERE {filter}
                          GROUP BY pr.district_id, period) sup
                ON sup.district_id = wx.district_id AND sup.period = wx.period
              LEFT JOIN (SELECT pc.district_id, strftime('%Y-%m', pc.date) AS period,
                                AVG(pc.price_per_unit) AS avg_price
                           FROM prices pc WHERE {filter}
                          GROUP BY pc.district_id, period) px
                ON px.district_id = wx.district_id AND px.period = wx.period
              ORDER BY d.name, wx.period",
        filters: &[WEATHER, PRODUCTION, PRICES],
        zero_fill: &["avg_rainfall", "avg_temperature", "total_production", "avg_price"],
        post: Some(correlation_post),
    }
}

/// Production totals, acreage and yield per district and product, ranked
/// across districts within each product. Ties break on district name.
pub fn regional_comparison() -> QueryPlan {
    QueryPlan {
        sql: "SELECT
                d.id AS district_id, d.name AS district_name,
                p.id AS product_id, p.name AS product_name,
                COALESCE(SUM(pr.quantity), 0) AS total_production,
                COALESCE(SUM(pr.acreage), 0) AS total_acreage,
                CASE WHEN SUM(pr.acreage) > 0
                     THEN ROUND(SUM(pr.quantity) / SUM(pr.acreage), 2)
                     ELSE 0 END AS yield_per_acre,
                RANK() OVER (
                    PARTITION BY p.id
                    ORDER BY SUM(pr.quantity) DESC, d.name ASC
                ) AS production_rank
              FROM production pr
              JOIN districts d ON d.id = pr.district_id
              JOIN products p ON p.id = pr.product_id
              WHERE {filter}
              GROUP BY d.id, p.id
              ORDER BY p.name, production_rank, d.name",
        filters: &[PRODUCTION],
        zero_fill: &["total_production", "total_acreage", "yield_per_acre"],
        post: None,
    }
}

/// Quarterly production, consumption and price per product, aggregated
/// across years to expose seasonality.
pub fn seasonal() -> QueryPlan {
    QueryPlan {
        sql: "SELECT
                p.id AS product_id, p.name AS product_name,
                sup.quarter AS quarter,
                COALESCE(sup.total_production, 0) AS total_production,
                COALESCE(con.total_consumption, 0) AS total_consumption,
                COALESCE(px.avg_price, 0) AS avg_price
              FROM (SELECT pr.product_id,
                           'Q' || ((CAST(strftime('%m', pr.date) AS INTEGER) + 2) / 3) AS quarter,
                           SUM(pr.quantity) AS total_production
                      FROM production pr WHERE {filter}
                     GROUP BY pr.product_id, quarter) sup
              JOIN products p ON p.id = sup.product_id
              LEFT JOIN (SELECT c.product_id,
                                'Q' || ((CAST(strftime('%m', c.date) AS INTEGER) + 2) / 3) AS quarter,
                                SUM(c.quantity) AS total_consumption
                           FROM consumption c
                           JOIN stakeholders s ON s.id = c.stakeholder_id
                          WHERE {filter}
                          GROUP BY c.product_id, quarter) con
                ON con.product_id = sup.product_id AND con.quarter = sup.quarter
              LEFT JOIN (SELECT pc.product_id,
                                'Q' || ((CAST(strftime('%m', pc.date) AS INTEGER) + 2) / 3) AS quarter,
                                AVG(pc.price_per_unit) AS avg_price
                           FROM prices pc WHERE {filter}
                          GROUP BY pc.product_id, quarter) px
                ON px.product_id = sup.product_id AND px.quarter = sup.quarter
              ORDER BY p.name, sup.quarter",
        filters: &[PRODUCTION, CONSUMPTION, PRICES],
        zero_fill: &["total_production", "total_consumption", "avg_price"],
        post: None,
    }
}

fn nutrition_post(object: &mut Map<String, Value>) {
    let status = if rows::number(object, "nutrition_gap") >= 0.0 {
        "Met"
    } else {
        "Below Target"
    };
    object.insert("status".into(), Value::String(status.into()));
}

/// Actual consumption against the per-capita nutrition target for each
/// product, month and year a target exists for.
pub fn nutrition() -> QueryPlan {
    QueryPlan {
        sql: "SELECT
                p.id AS product_id, p.name AS product_name,
                nt.year AS year, nt.month AS month,
                COALESCE(nt.required_per_capita, 0) AS required_per_capita,
                COALESCE(con.total_consumed, 0) AS total_consumed,
                COALESCE(con.total_consumed, 0) - COALESCE(nt.required_per_capita, 0) AS nutrition_gap
              FROM nutrition_targets nt
              JOIN products p ON p.id = nt.product_id
              LEFT JOIN (SELECT c.product_id,
                                CAST(strftime('%Y', c.date) AS INTEGER) AS year,
                                CAST(strftime('%m', c.date) AS INTEGER) AS month,
                                SUM(c.quantity) AS total_consumed
                           FROM consumption c
                           JOIN stakeholders s ON s.id = c.stakeholder_id
                          WHERE {filter}
                          GROUP BY c.product_id, year, month) con
                ON con.product_id = nt.product_id
               AND con.year = nt.year
               AND con.month = nt.month
              WHERE {filter}
              ORDER BY p.name, nt.year, nt.month",
        filters: &[
            CONSUMPTION,
            FilterColumns {
                product_id: Some("nt.product_id"),
                district_id: None,
                date: None,
                year: Some("nt.year"),
            },
        ],
        zero_fill: &["required_per_capita", "total_consumed", "nutrition_gap"],
        post: Some(nutrition_post),
    }
}

fn supply_demand_post(object: &mut Map<String, Value>) {
    let supply = rows::number(object, "total_supply");
    let demand = rows::number(object, "total_demand");
    let ratio = if demand > 0.0 {
        Number::from_f64((supply / demand * 100.0).round() / 100.0)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    } else {
        Value::Null
    };
    object.insert("supply_demand_ratio".into(), ratio);
    let status = rows::surplus_status(rows::number(object, "surplus_deficit"));
    object.insert("status".into(), Value::String(status.into()));
}

/// Total supply against total demand per product. Products with no fact
/// rows still appear with zeros.
pub fn supply_demand() -> QueryPlan {
    QueryPlan {
        sql: "SELECT
                p.id AS product_id, p.name AS product_name,
                COALESCE(sup.total_supply, 0) AS total_supply,
                COALESCE(con.total_demand, 0) AS total_demand,
                COALESCE(sup.total_supply, 0) - COALESCE(con.total_demand, 0) AS surplus_deficit
              FROM products p
              LEFT JOIN (SELECT pr.product_id, SUM(pr.quantity) AS total_supply
                           FROM production pr WHERE {filter}
                          GROUP BY pr.product_id) sup
                ON sup.product_id = p.id
              LEFT JOIN (SELECT c.product_id, SUM(c.quantity) AS total_demand
                           FROM consumption c
                           JOIN stakeholders s ON s.id = c.stakeholder_id
                          WHERE {filter}
                          GROUP BY c.product_id) con
                ON con.product_id = p.id
              WHERE {filter}
              ORDER BY p.name",
        filters: &[
            PRODUCTION,
            CONSUMPTION,
            FilterColumns {
                product_id: Some("p.id"),
                district_id: None,
                date: None,
                year: None,
            },
        ],
        zero_fill: &["total_supply", "total_demand", "surplus_deficit"],
        post: Some(supply_demand_post),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_plan_has_one_filter_set_per_marker() {
        for plan in [
            overview(),
            surplus_deficit(),
            price_trend(),
            consumption_pattern(),
            stakeholder_comparison(),
            correlation(),
            regional_comparison(),
            seasonal(),
            nutrition(),
            supply_demand(),
        ] {
            let markers = plan.sql.matches(FILTER).count();
            assert_eq!(markers, plan.filters.len(), "marker/filter mismatch:\n{}", plan.sql);
        }
    }

    #[test]
    fn compile_repeats_params_per_fact_table() {
        let filter = AnalysisFilter {
            product_id: Some("1".into()),
            ..AnalysisFilter::default()
        };
        let (sql, params) = overview().compile(&filter);
        assert!(!sql.contains(FILTER));
        // Production, consumption and prices each constrain their own
        // product column.
        assert_eq!(params, vec![SqlParam::Int(1); 3]);
        assert!(sql.contains("pr.product_id = ?"));
        assert!(sql.contains("c.product_id = ?"));
        assert!(sql.contains("pc.product_id = ?"));
    }

    #[test]
    fn unfiltered_compile_binds_nothing() {
        let (sql, params) = overview().compile(&AnalysisFilter::default());
        assert!(params.is_empty());
        assert!(sql.contains("WHERE 1=1"));
    }

    #[test]
    fn district_filter_skips_plans_without_that_dimension() {
        let filter = AnalysisFilter {
            district_id: Some("4".into()),
            ..AnalysisFilter::default()
        };
        let (_, params) = supply_demand().compile(&filter);
        // Only production and consumption carry a district column here.
        assert_eq!(params.len(), 2);
    }
}

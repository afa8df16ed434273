//! End-to-end checks of the analytical layer against a seeded in-memory
//! database.

use chrono::NaiveDate;
use db::{
    DBService,
    models::{
        consumption::{Consumption, CreateConsumption},
        district::{CreateDistrict, District},
        nutrition::{CreateNutritionTarget, NutritionTarget},
        price::{CreatePrice, Price},
        product::{CreateProduct, Product},
        production::{CreateProduction, Production},
        stakeholder::{CreateStakeholder, Stakeholder},
        weather::{CreateWeather, Weather},
    },
};
use services::services::analytics::{AnalysisFilter, AnalysisType, AnalyticsError, AnalyticsService};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn num(row: &serde_json::Value, field: &str) -> f64 {
    row[field].as_f64().unwrap_or_else(|| panic!("{field} not numeric in {row}"))
}

/// Two districts, three products, production/consumption/prices/weather
/// spread over 2022-2023. Product 1 in district 2 is balanced exactly
/// (supply == consumption) to pin the zero boundary.
async fn seeded() -> (DBService, AnalyticsService) {
    let db = DBService::new_in_memory().await.unwrap();
    let pool = &db.pool;

    let dhaka = District::create(pool, &CreateDistrict { name: "Dhaka".into() })
        .await
        .unwrap();
    let khulna = District::create(pool, &CreateDistrict { name: "Khulna".into() })
        .await
        .unwrap();

    let mut products = Vec::new();
    for name in ["Rice", "Wheat", "Maize"] {
        products.push(
            Product::create(
                pool,
                &CreateProduct {
                    name: name.into(),
                    product_type: "crop".into(),
                    variety: None,
                    sowing_time: None,
                    harvest_time: None,
                    seed_requirement: None,
                },
            )
            .await
            .unwrap(),
        );
    }
    let (rice, wheat) = (&products[0], &products[1]);

    // stakeholder_type ids are seeded by the migration: 1 farmer, 4 consumer
    let consumer_d1 = Stakeholder::create(
        pool,
        &CreateStakeholder {
            name: "Bob".into(),
            stakeholder_type_id: 4,
            district_id: dhaka.id,
            contact_info: None,
        },
    )
    .await
    .unwrap();
    let consumer_d2 = Stakeholder::create(
        pool,
        &CreateStakeholder {
            name: "Carol".into(),
            stakeholder_type_id: 4,
            district_id: khulna.id,
            contact_info: None,
        },
    )
    .await
    .unwrap();

    let production = [
        (rice.id, dhaka.id, date(2023, 3, 10), 10.0, 100.0),
        (rice.id, dhaka.id, date(2023, 4, 10), 5.0, 50.0),
        (rice.id, dhaka.id, date(2022, 3, 10), 7.0, 70.0),
        (rice.id, khulna.id, date(2023, 3, 12), 3.0, 30.0),
        (wheat.id, dhaka.id, date(2023, 5, 1), 2.0, 20.0),
        (wheat.id, khulna.id, date(2023, 5, 2), 2.0, 20.0),
    ];
    for (product_id, district_id, day, acreage, quantity) in production {
        Production::create(
            pool,
            &CreateProduction {
                product_id,
                district_id,
                date: day,
                acreage,
                quantity,
            },
        )
        .await
        .unwrap();
    }

    let consumption = [
        (consumer_d1.id, rice.id, date(2023, 3, 15), 40.0),
        (consumer_d1.id, rice.id, date(2023, 4, 15), 20.0),
        (consumer_d2.id, rice.id, date(2023, 3, 20), 30.0),
    ];
    for (stakeholder_id, product_id, day, quantity) in consumption {
        Consumption::create(
            pool,
            &CreateConsumption {
                stakeholder_id,
                product_id,
                date: day,
                quantity,
            },
        )
        .await
        .unwrap();
    }

    for (day, price) in [(date(2023, 3, 1), 10.0), (date(2023, 4, 1), 12.0)] {
        Price::create(
            pool,
            &CreatePrice {
                product_id: rice.id,
                district_id: dhaka.id,
                date: day,
                price_per_unit: price,
            },
        )
        .await
        .unwrap();
    }

    for (district_id, rainfall, temperature) in [(dhaka.id, 25.0, 30.0), (khulna.id, 5.0, 36.0)] {
        Weather::create(
            pool,
            &CreateWeather {
                district_id,
                date: date(2023, 3, 5),
                rainfall,
                temperature,
            },
        )
        .await
        .unwrap();
    }

    NutritionTarget::create(
        pool,
        &CreateNutritionTarget {
            product_id: rice.id,
            month: 3,
            year: 2023,
            required_per_capita: 50.0,
        },
    )
    .await
    .unwrap();

    let analytics = AnalyticsService::new(db.pool.clone());
    (db, analytics)
}

#[tokio::test]
async fn overview_for_product_and_year_matches_underlying_facts() {
    let (_db, analytics) = seeded().await;
    let filter = AnalysisFilter {
        product_id: Some("1".into()),
        start_year: Some("2023".into()),
        end_year: Some("2023".into()),
        ..AnalysisFilter::default()
    };
    let rows = analytics
        .demand_supply(AnalysisType::Overview, &filter)
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);

    let dhaka = &rows[0];
    assert_eq!(dhaka["product_id"], 1);
    assert_eq!(dhaka["district_name"], "Dhaka");
    assert_eq!(num(dhaka, "total_supply"), 150.0);
    assert_eq!(num(dhaka, "total_consumption"), 60.0);
    assert_eq!(num(dhaka, "surplus_deficit"), 90.0);
    assert_eq!(dhaka["status"], "Surplus");

    // Exactly balanced; the zero boundary classifies as deficit.
    let khulna = &rows[1];
    assert_eq!(num(khulna, "total_supply"), 30.0);
    assert_eq!(num(khulna, "total_consumption"), 30.0);
    assert_eq!(num(khulna, "surplus_deficit"), 0.0);
    assert_eq!(khulna["status"], "Deficit");
}

#[tokio::test]
async fn all_sentinel_yields_same_rows_as_no_filter() {
    let (_db, analytics) = seeded().await;
    let unfiltered = analytics
        .demand_supply(AnalysisType::Overview, &AnalysisFilter::default())
        .await
        .unwrap();
    let bypassed = analytics
        .demand_supply(
            AnalysisType::Overview,
            &AnalysisFilter {
                product_id: Some("all".into()),
                district_id: Some("all".into()),
                ..AnalysisFilter::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(unfiltered, bypassed);

    let filtered = analytics
        .demand_supply(
            AnalysisType::Overview,
            &AnalysisFilter {
                district_id: Some("1".into()),
                ..AnalysisFilter::default()
            },
        )
        .await
        .unwrap();
    assert!(filtered.len() < unfiltered.len());
    for row in &filtered {
        assert_eq!(row["district_id"], 1);
    }
}

#[tokio::test]
async fn price_trend_first_period_has_null_change() {
    let (_db, analytics) = seeded().await;
    let rows = analytics
        .demand_supply(AnalysisType::PriceTrend, &AnalysisFilter::default())
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);

    let first = &rows[0];
    assert_eq!(first["period"], "2023-03");
    assert!(first["price_change_pct"].is_null());
    assert_eq!(first["id"], "1-1-2023-03");

    let second = &rows[1];
    assert_eq!(second["period"], "2023-04");
    assert_eq!(num(second, "avg_price"), 12.0);
    assert_eq!(num(second, "price_change_pct"), 20.0);
}

#[tokio::test]
async fn supply_demand_zero_fills_products_without_facts() {
    let (_db, analytics) = seeded().await;
    let rows = analytics
        .supply_demand(&AnalysisFilter::default())
        .await
        .unwrap();
    assert_eq!(rows.len(), 3);

    // Maize has no production or consumption at all.
    let maize = rows
        .iter()
        .find(|row| row["product_name"] == "Maize")
        .unwrap();
    assert_eq!(num(maize, "total_supply"), 0.0);
    assert_eq!(num(maize, "total_demand"), 0.0);
    assert_eq!(num(maize, "surplus_deficit"), 0.0);
    assert!(maize["supply_demand_ratio"].is_null());
    assert_eq!(maize["status"], "Deficit");

    // Wheat is produced but never consumed.
    let wheat = rows
        .iter()
        .find(|row| row["product_name"] == "Wheat")
        .unwrap();
    assert_eq!(num(wheat, "total_supply"), 40.0);
    assert_eq!(num(wheat, "total_demand"), 0.0);
    assert_eq!(wheat["status"], "Surplus");
}

#[tokio::test]
async fn regional_rank_breaks_ties_by_district_name() {
    let (_db, analytics) = seeded().await;
    let rows = analytics
        .demand_supply(AnalysisType::RegionalComparison, &AnalysisFilter::default())
        .await
        .unwrap();

    // Wheat: 20 produced in each district; Dhaka sorts first.
    let wheat: Vec<_> = rows
        .iter()
        .filter(|row| row["product_name"] == "Wheat")
        .collect();
    assert_eq!(wheat.len(), 2);
    assert_eq!(wheat[0]["district_name"], "Dhaka");
    assert_eq!(wheat[0]["production_rank"], 1);
    assert_eq!(wheat[1]["district_name"], "Khulna");
    assert_eq!(wheat[1]["production_rank"], 2);
}

#[tokio::test]
async fn correlation_buckets_weather_with_fixed_thresholds() {
    let (_db, analytics) = seeded().await;
    let rows = analytics
        .weather_impact(AnalysisType::Correlation, &AnalysisFilter::default())
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);

    let dhaka = &rows[0];
    assert_eq!(dhaka["district_name"], "Dhaka");
    assert_eq!(dhaka["rainfall_level"], "High Rainfall");
    assert_eq!(dhaka["temperature_level"], "Normal Temperature");
    assert_eq!(num(dhaka, "total_production"), 100.0);

    let khulna = &rows[1];
    assert_eq!(khulna["rainfall_level"], "Normal Rainfall");
    assert_eq!(khulna["temperature_level"], "High Temperature");
}

#[tokio::test]
async fn weather_impact_rejects_foreign_analysis_types() {
    let (_db, analytics) = seeded().await;
    let err = analytics
        .weather_impact(AnalysisType::Overview, &AnalysisFilter::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AnalyticsError::InvalidAnalysisType(_)));
}

#[tokio::test]
async fn nutrition_reports_gap_against_target() {
    let (_db, analytics) = seeded().await;
    let rows = analytics.nutrition(&AnalysisFilter::default()).await.unwrap();
    assert_eq!(rows.len(), 1);

    let row = &rows[0];
    assert_eq!(row["product_name"], "Rice");
    assert_eq!(row["year"], 2023);
    assert_eq!(row["month"], 3);
    // March consumption across both districts: 40 + 30.
    assert_eq!(num(row, "total_consumed"), 70.0);
    assert_eq!(num(row, "nutrition_gap"), 20.0);
    assert_eq!(row["status"], "Met");
}

#[tokio::test]
async fn consumption_pattern_counts_distinct_consumers() {
    let (_db, analytics) = seeded().await;
    let rows = analytics
        .demand_supply(AnalysisType::ConsumptionPattern, &AnalysisFilter::default())
        .await
        .unwrap();

    let march: Vec<_> = rows
        .iter()
        .filter(|row| row["period"] == "2023-03")
        .collect();
    assert_eq!(march.len(), 1);
    assert_eq!(march[0]["stakeholder_type"], "consumer");
    assert_eq!(num(march[0], "total_consumed"), 70.0);
    assert_eq!(num(march[0], "consumer_count"), 2.0);
}

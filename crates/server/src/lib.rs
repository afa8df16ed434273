pub mod error;
pub mod routes;

use axum::Router;
use db::DBService;
use services::services::analytics::AnalyticsService;
use tower_http::cors::CorsLayer;

#[derive(Clone)]
pub struct AppState {
    db: DBService,
    analytics: AnalyticsService,
}

impl AppState {
    pub fn new(db: DBService) -> Self {
        let analytics = AnalyticsService::new(db.pool.clone());
        Self { db, analytics }
    }

    pub fn db(&self) -> &DBService {
        &self.db
    }

    pub fn analytics(&self) -> &AnalyticsService {
        &self.analytics
    }
}

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", routes::router())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

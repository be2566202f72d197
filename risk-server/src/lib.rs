//! Malaria Risk Server
//!
//! HTTP shell around the scoring core: a prediction endpoint for external
//! callers and a session-based API for the interactive dashboard.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  MALARIA RISK SERVER                     │
//! ├──────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌───────────┐  ┌──────────────────────┐  │
//! │  │ /predict  │  │ /models   │  │ /dashboard           │  │
//! │  │ (raw map) │  │ (cache)   │  │ (sessions, one-hot)  │  │
//! │  └─────┬─────┘  └─────┬─────┘  └──────────┬───────────┘  │
//! │        └──────────────┼───────────────────┘              │
//! │                       ▼                                  │
//! │          ┌──────────────────────────┐                    │
//! │          │ malaria-risk-core        │                    │
//! │          │ assembler → model → tier │                    │
//! │          └──────────────────────────┘                    │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};

use malaria_risk_core::dashboard::{Dashboard, FormSchema};
use malaria_risk_core::model::{ModelCache, ModelRegistry};
use malaria_risk_core::{ConfigError, ScoringConfig, ScoringError, SessionStore};

pub use config::Config;
pub use error::{AppError, AppResult};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub scoring: Arc<ScoringConfig>,
    /// Models served by `/predict`
    pub models: Arc<ModelCache>,
    /// Single-entry cache for the dashboard model
    pub dashboard_models: Arc<ModelCache>,
    pub dashboard: Arc<Dashboard>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    /// Load static configuration, check artifacts and warm the default models
    pub fn initialize(config: Config) -> Result<Self, ConfigError> {
        let scoring = ScoringConfig::load(&config.paths())?;

        let registry =
            ModelRegistry::from_dir(&config.model_dir, &config.model_names, &config.default_model)?;
        registry.check_artifacts_exist()?;
        let models = ModelCache::new(registry, scoring.columns.clone());
        models.get(None).map_err(startup_error)?;

        let schema = FormSchema::standard();
        let dashboard_columns = match &scoring.dashboard_columns {
            Some(columns) => columns.clone(),
            None => schema.column_spec()?,
        };
        let dashboard_registry = ModelRegistry::from_dir(
            &config.dashboard_model_dir,
            std::slice::from_ref(&config.dashboard_model),
            &config.dashboard_model,
        )?;
        dashboard_registry.check_artifacts_exist()?;
        let dashboard_models = ModelCache::new(dashboard_registry, dashboard_columns.clone());
        dashboard_models.get(None).map_err(startup_error)?;

        tracing::info!(
            "Serving models {:?} (default '{}'), dashboard model '{}'",
            models.registry().names().collect::<Vec<_>>(),
            models.registry().default_model(),
            config.dashboard_model
        );

        Ok(Self {
            config,
            scoring: Arc::new(scoring),
            models: Arc::new(models),
            dashboard_models: Arc::new(dashboard_models),
            dashboard: Arc::new(Dashboard::new(schema, dashboard_columns)),
            sessions: Arc::new(SessionStore::new()),
        })
    }
}

fn startup_error(err: ScoringError) -> ConfigError {
    match err {
        ScoringError::Configuration(e) => e,
        other => ConfigError::Invalid(other.to_string()),
    }
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    // Prediction API
    let prediction_routes = Router::new()
        .route("/health", get(handlers::health::check))
        .route("/predict", post(handlers::predict::predict))
        .route("/predict/batch", post(handlers::predict::predict_batch));

    // Model cache management
    let model_routes = Router::new()
        .route("/models", get(handlers::models::list))
        .route("/models/:name/reload", post(handlers::models::reload))
        .route("/models/cache", delete(handlers::models::clear_cache));

    // Dashboard
    let dashboard_routes = Router::new()
        .route("/dashboard/form", get(handlers::dashboard::form))
        .route("/dashboard/model/reload", post(handlers::dashboard::reload_model))
        .route("/dashboard/sessions", post(handlers::dashboard::create_session))
        .route("/dashboard/sessions/:id", delete(handlers::dashboard::end_session))
        .route("/dashboard/sessions/:id/predict", post(handlers::dashboard::predict))
        .route("/dashboard/sessions/:id/history", get(handlers::dashboard::history))
        .route("/dashboard/sessions/:id/export.csv", get(handlers::dashboard::export_csv))
        .route("/dashboard/feature-importance", get(handlers::dashboard::feature_importance))
        .route("/dashboard/regional-risk", get(handlers::dashboard::regional_risk));

    // Combine all routes
    Router::new()
        .merge(prediction_routes)
        .merge(model_routes)
        .merge(dashboard_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}

use std::sync::Arc;

use actix_web::web;

use crate::{
    cache::build_cache,
    db::sqlite::{create_pool, run_migrations},
    errors::StartupError,
    settings::AppConfig,
    templates::Renderer,
    AppState,
};

/// A fully initialized application, ready to be handed to an entry point.
pub struct Application {
    pub state: web::Data<AppState>,
}

impl Application {
    /// Opens the database, applies migrations and loads templates and the
    /// cache. Any failure aborts startup.
    pub async fn build(config: AppConfig) -> Result<Self, StartupError> {
        let config = Arc::new(config);

        let pool = create_pool(&config.database).await?;
        run_migrations(&pool).await?;

        let cache = build_cache(&config.cache)?;
        let renderer = Renderer::new()?;

        tracing::info!(
            environment = %config.env,
            debug = config.is_debug(),
            cache = ?config.cache.backend,
            "Application initialized"
        );

        let state = AppState::new(config, pool, renderer, cache);
        Ok(Application { state: web::Data::new(state) })
    }

    pub fn config(&self) -> &AppConfig {
        &self.state.config
    }
}

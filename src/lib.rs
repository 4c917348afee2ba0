use std::sync::Arc;

use sqlx::SqlitePool;

mod domain;
mod interfaces;
mod infrastructure;
pub mod commands;
pub mod constants;
pub mod errors;
pub mod graceful_shutdown;
pub mod settings;
pub mod shared_repos;
pub mod startup;
pub mod telemetry;

pub use domain::{entities, password, use_cases};
pub use interfaces::{dispatcher, entry, handlers, middlewares, repositories, routes};
pub use infrastructure::{auth, cache, db, templates, utils};

use auth::jwt::JwtService;
use cache::SharedCache;
use repositories::sqlx_repo::{
    SqlxAdminUserRepo, SqlxContactMessageRepo, SqlxProjectRepo, SqlxSiteConfigRepo, SqlxSkillRepo,
    SqlxStudentRepo,
};
use settings::AppConfig;
use shared_repos::SharedRepositories;
use templates::Renderer;
use use_cases::{
    auth::AuthHandler, contact::ContactMessageHandler, projects::ProjectHandler, roster::StudentHandler,
    site_config::SiteConfigHandler, skills::SkillHandler,
};

pub type AppAuthHandler = AuthHandler<SqlxAdminUserRepo, JwtService>;
pub type AppContactHandler = ContactMessageHandler<SqlxContactMessageRepo>;
pub type AppSkillHandler = SkillHandler<SqlxSkillRepo>;
pub type AppProjectHandler = ProjectHandler<SqlxProjectRepo, SqlxSkillRepo>;
pub type AppSiteHandler = SiteConfigHandler<SqlxSiteConfigRepo>;
pub type AppStudentHandler = StudentHandler<SqlxStudentRepo>;

/// Everything a request needs, built once at startup and shared read-only.
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub pool: SqlitePool,
    pub renderer: Renderer,
    pub cache: SharedCache,
    pub auth_handler: AppAuthHandler,
    pub contact_handler: AppContactHandler,
    pub skill_handler: AppSkillHandler,
    pub project_handler: AppProjectHandler,
    pub site_handler: AppSiteHandler,
    pub student_handler: AppStudentHandler,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, pool: SqlitePool, renderer: Renderer, cache: SharedCache) -> Self {
        let repos = SharedRepositories::new(pool.clone());
        let jwt_service = JwtService::new(&config);

        AppState {
            auth_handler: AuthHandler::new(repos.admin_repo, jwt_service, config.security.fast_password_hashing),
            contact_handler: ContactMessageHandler::new(repos.contact_repo),
            skill_handler: SkillHandler::new(repos.skill_repo.clone()),
            project_handler: ProjectHandler::new(repos.project_repo, repos.skill_repo),
            site_handler: SiteConfigHandler::new(repos.site_repo),
            student_handler: StudentHandler::new(repos.student_repo),
            config,
            pool,
            renderer,
            cache,
        }
    }

    /// Drops cached pages after content changes.
    pub async fn invalidate_pages(&self) {
        self.cache.clear().await;
        tracing::debug!("Page cache cleared");
    }
}

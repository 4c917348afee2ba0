use actix_web::web;

use crate::handlers::site;

mod admin;
mod json_error;

pub use admin::ADMIN_ROUTE_TABLE;

/// Admin API first; every other path goes to the page dispatcher.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(json_error::config_routes);
    cfg.configure(admin::config_routes);
    cfg.default_service(web::to(site::dispatch));
}

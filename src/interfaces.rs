pub mod dispatcher;
pub mod entry;
pub mod handlers;
pub mod middlewares;
pub mod repositories;
pub mod routes;

pub mod auth;
pub mod cache;
pub mod db;
pub mod templates;
pub mod utils;

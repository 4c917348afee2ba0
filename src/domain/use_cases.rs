pub mod auth;
pub mod contact;
pub mod extractors;
pub mod projects;
pub mod roster;
pub mod site_config;
pub mod skills;

pub mod admin_user;
pub mod contact_message;
pub mod project;
pub mod site_config;
pub mod skill;
pub mod sqlx_repo;
pub mod student;
pub mod token;

pub mod assets;
pub mod auth;
pub mod contact_messages;
pub mod pages;
pub mod projects;
pub mod site;
pub mod site_config;
pub mod skills;
pub mod students;
pub mod system;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::fields::validate_blank_or_url;
use super::skill::Skill;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Project {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub short_description: String,
    pub image_url: String,
    pub github_url: String,
    pub demo_url: String,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub display_order: i64,
    #[sqlx(skip)]
    pub technologies: Vec<Skill>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ProjectInput {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(min = 1, message = "Description cannot be empty"))]
    pub description: String,

    #[validate(length(min = 1, max = 300, message = "Short description must be 1-300 characters"))]
    pub short_description: String,

    #[validate(custom(function = "validate_blank_or_url"))]
    #[serde(default)]
    pub image_url: String,

    #[validate(custom(function = "validate_blank_or_url"))]
    #[serde(default)]
    pub github_url: String,

    #[validate(custom(function = "validate_blank_or_url"))]
    #[serde(default)]
    pub demo_url: String,

    #[serde(default)]
    pub is_featured: bool,

    #[serde(default)]
    pub display_order: i64,

    #[serde(default)]
    pub technology_ids: Vec<i64>,
}

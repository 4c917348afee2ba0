use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::fields::{validate_blank_or_email, validate_blank_or_url};

pub const DEFAULT_SITE_TITLE: &str = "My Portfolio";

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SiteConfiguration {
    pub id: i64,
    pub site_title: String,
    pub site_subtitle: String,
    pub about_text: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub github_url: String,
    pub linkedin_url: String,
    pub facebook_url: String,
    pub twitter_url: String,
    pub resume_url: String,
    pub profile_image_url: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct SiteConfigurationInput {
    #[validate(length(min = 1, max = 100, message = "Site title must be 1-100 characters"))]
    pub site_title: String,

    #[validate(length(max = 200, message = "Subtitle must be at most 200 characters"))]
    pub site_subtitle: String,

    pub about_text: String,

    #[validate(custom(function = "validate_blank_or_email"))]
    pub contact_email: String,

    #[validate(length(max = 20, message = "Phone must be at most 20 characters"))]
    pub contact_phone: String,

    #[validate(custom(function = "validate_blank_or_url"))]
    pub github_url: String,

    #[validate(custom(function = "validate_blank_or_url"))]
    pub linkedin_url: String,

    #[validate(custom(function = "validate_blank_or_url"))]
    pub facebook_url: String,

    #[validate(custom(function = "validate_blank_or_url"))]
    pub twitter_url: String,

    #[validate(custom(function = "validate_blank_or_url"))]
    pub resume_url: String,

    #[validate(custom(function = "validate_blank_or_url"))]
    pub profile_image_url: String,
}

impl SiteConfigurationInput {
    /// Blank titles fall back to the stock title.
    pub fn normalized(mut self) -> Self {
        if self.site_title.trim().is_empty() {
            self.site_title = DEFAULT_SITE_TITLE.to_string();
        }
        self
    }
}

impl SiteConfiguration {
    /// What pages show before an admin has saved a configuration.
    pub fn unsaved() -> Self {
        SiteConfiguration {
            id: 0,
            site_title: DEFAULT_SITE_TITLE.to_string(),
            site_subtitle: String::new(),
            about_text: String::new(),
            contact_email: String::new(),
            contact_phone: String::new(),
            github_url: String::new(),
            linkedin_url: String::new(),
            facebook_url: String::new(),
            twitter_url: String::new(),
            resume_url: String::new(),
            profile_image_url: String::new(),
            updated_at: Utc::now(),
        }
    }
}

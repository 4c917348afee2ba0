use async_trait::async_trait;
use chrono::Utc;

use crate::{
    entities::site_config::{SiteConfiguration, SiteConfigurationInput},
    errors::AppError,
    repositories::sqlx_repo::SqlxSiteConfigRepo,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SiteConfigRepository: Send + Sync {
    async fn get_site_configuration(&self) -> Result<Option<SiteConfiguration>, AppError>;
    async fn get_site_configuration_by_id(&self, id: i64) -> Result<Option<SiteConfiguration>, AppError>;
    async fn count_site_configurations(&self) -> Result<i64, AppError>;
    async fn create_site_configuration(&self, input: &SiteConfigurationInput) -> Result<i64, AppError>;
    async fn update_site_configuration(&self, id: i64, input: &SiteConfigurationInput) -> Result<(), AppError>;
}

impl SqlxSiteConfigRepo {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        SqlxSiteConfigRepo { pool }
    }
}

#[async_trait]
impl SiteConfigRepository for SqlxSiteConfigRepo {
    async fn get_site_configuration(&self) -> Result<Option<SiteConfiguration>, AppError> {
        sqlx::query_as::<_, SiteConfiguration>("SELECT * FROM site_configuration ORDER BY id LIMIT 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn get_site_configuration_by_id(&self, id: i64) -> Result<Option<SiteConfiguration>, AppError> {
        sqlx::query_as::<_, SiteConfiguration>("SELECT * FROM site_configuration WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn count_site_configurations(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM site_configuration")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn create_site_configuration(&self, input: &SiteConfigurationInput) -> Result<i64, AppError> {
        let result = sqlx::query(
            r#"INSERT INTO site_configuration (
                site_title, site_subtitle, about_text, contact_email, contact_phone,
                github_url, linkedin_url, facebook_url, twitter_url, resume_url,
                profile_image_url, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&input.site_title)
        .bind(&input.site_subtitle)
        .bind(&input.about_text)
        .bind(&input.contact_email)
        .bind(&input.contact_phone)
        .bind(&input.github_url)
        .bind(&input.linkedin_url)
        .bind(&input.facebook_url)
        .bind(&input.twitter_url)
        .bind(&input.resume_url)
        .bind(&input.profile_image_url)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    async fn update_site_configuration(&self, id: i64, input: &SiteConfigurationInput) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"UPDATE site_configuration
            SET site_title = ?, site_subtitle = ?, about_text = ?, contact_email = ?, contact_phone = ?,
                github_url = ?, linkedin_url = ?, facebook_url = ?, twitter_url = ?, resume_url = ?,
                profile_image_url = ?, updated_at = ?
            WHERE id = ?"#,
        )
        .bind(&input.site_title)
        .bind(&input.site_subtitle)
        .bind(&input.about_text)
        .bind(&input.contact_email)
        .bind(&input.contact_phone)
        .bind(&input.github_url)
        .bind(&input.linkedin_url)
        .bind(&input.facebook_url)
        .bind(&input.twitter_url)
        .bind(&input.resume_url)
        .bind(&input.profile_image_url)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Site configuration not found".to_string()));
        }
        Ok(())
    }
}

use validator::Validate;

use crate::{
    entities::site_config::{SiteConfiguration, SiteConfigurationInput},
    errors::AppError,
    repositories::site_config::SiteConfigRepository,
};

pub const SINGLETON_VIOLATION: &str =
    "Site configuration already exists; edit the existing configuration instead";

pub struct SiteConfigHandler<R>
where
    R: SiteConfigRepository,
{
    pub site_repo: R,
}

impl<R> SiteConfigHandler<R>
where
    R: SiteConfigRepository,
{
    pub fn new(site_repo: R) -> Self {
        SiteConfigHandler { site_repo }
    }

    pub async fn current(&self) -> Result<Option<SiteConfiguration>, AppError> {
        self.site_repo.get_site_configuration().await
    }

    /// The stored configuration, or the stock defaults when none was saved yet.
    pub async fn current_or_default(&self) -> Result<SiteConfiguration, AppError> {
        Ok(self.current().await?.unwrap_or_else(SiteConfiguration::unsaved))
    }

    /// At most one configuration may exist. The check and the insert are not
    /// atomic; two concurrent first saves can both succeed.
    pub async fn create(&self, input: SiteConfigurationInput) -> Result<SiteConfiguration, AppError> {
        let input = input.normalized();
        input.validate()?;

        if self.site_repo.count_site_configurations().await? > 0 {
            return Err(AppError::InvalidInput(SINGLETON_VIOLATION.to_string()));
        }

        let id = self.site_repo.create_site_configuration(&input).await?;
        self.get(id).await
    }

    pub async fn update(&self, id: i64, input: SiteConfigurationInput) -> Result<SiteConfiguration, AppError> {
        let input = input.normalized();
        input.validate()?;

        self.site_repo.update_site_configuration(id, &input).await?;
        self.get(id).await
    }

    async fn get(&self, id: i64) -> Result<SiteConfiguration, AppError> {
        self.site_repo
            .get_site_configuration_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Site configuration not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::site_config::MockSiteConfigRepository;

    #[tokio::test]
    async fn second_configuration_is_rejected() {
        let mut repo = MockSiteConfigRepository::new();
        repo.expect_count_site_configurations().returning(|| Ok(1));
        repo.expect_create_site_configuration().never();

        let handler = SiteConfigHandler::new(repo);
        let err = handler.create(SiteConfigurationInput::default()).await.unwrap_err();

        assert!(matches!(err, AppError::InvalidInput(ref msg) if msg == SINGLETON_VIOLATION));
    }

    #[tokio::test]
    async fn first_configuration_is_created_with_default_title() {
        let mut repo = MockSiteConfigRepository::new();
        repo.expect_count_site_configurations().returning(|| Ok(0));
        repo.expect_create_site_configuration()
            .withf(|input| input.site_title == "My Portfolio")
            .returning(|_| Ok(1));
        repo.expect_get_site_configuration_by_id().returning(|_| {
            let mut config = SiteConfiguration::unsaved();
            config.id = 1;
            Ok(Some(config))
        });

        let handler = SiteConfigHandler::new(repo);
        let created = handler.create(SiteConfigurationInput::default()).await.unwrap();

        assert_eq!(created.id, 1);
        assert_eq!(created.site_title, "My Portfolio");
    }

    #[tokio::test]
    async fn missing_configuration_falls_back_to_defaults() {
        let mut repo = MockSiteConfigRepository::new();
        repo.expect_get_site_configuration().returning(|| Ok(None));

        let handler = SiteConfigHandler::new(repo);
        let config = handler.current_or_default().await.unwrap();

        assert_eq!(config.id, 0);
        assert_eq!(config.site_title, "My Portfolio");
    }
}

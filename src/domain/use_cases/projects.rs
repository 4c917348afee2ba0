use std::collections::BTreeSet;

use validator::Validate;

use crate::{
    entities::project::{Project, ProjectInput},
    errors::{AppError, FieldError},
    repositories::{project::ProjectRepository, skill::SkillRepository},
};

pub struct ProjectHandler<P, S>
where
    P: ProjectRepository,
    S: SkillRepository,
{
    pub project_repo: P,
    pub skill_repo: S,
}

impl<P, S> ProjectHandler<P, S>
where
    P: ProjectRepository,
    S: SkillRepository,
{
    pub fn new(project_repo: P, skill_repo: S) -> Self {
        ProjectHandler { project_repo, skill_repo }
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>, AppError> {
        self.project_repo.list_projects().await
    }

    pub async fn featured_projects(&self) -> Result<Vec<Project>, AppError> {
        self.project_repo.list_featured_projects().await
    }

    pub async fn get_project(&self, id: i64) -> Result<Project, AppError> {
        self.project_repo
            .get_project_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Project not found".to_string()))
    }

    pub async fn create_project(&self, mut input: ProjectInput) -> Result<Project, AppError> {
        input.validate()?;
        self.check_technologies(&mut input).await?;

        let id = self.project_repo.create_project(&input).await?;
        self.get_project(id).await
    }

    /// Creates the project unless one with the same title exists. Returns whether it was created.
    pub async fn ensure_project(&self, input: ProjectInput) -> Result<(Project, bool), AppError> {
        if let Some(existing) = self.project_repo.find_project_by_title(&input.title).await? {
            return Ok((existing, false));
        }
        Ok((self.create_project(input).await?, true))
    }

    pub async fn update_project(&self, id: i64, mut input: ProjectInput) -> Result<Project, AppError> {
        input.validate()?;
        self.check_technologies(&mut input).await?;

        self.project_repo.update_project(id, &input).await?;
        self.get_project(id).await
    }

    pub async fn delete_project(&self, id: i64) -> Result<(), AppError> {
        self.project_repo.delete_project(id).await
    }

    /// Deduplicates the technology ids and rejects ids with no matching skill.
    async fn check_technologies(&self, input: &mut ProjectInput) -> Result<(), AppError> {
        let ids: Vec<i64> = input.technology_ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();
        let found = self.skill_repo.get_skills_by_ids(&ids).await?;

        let missing: Vec<String> = ids
            .iter()
            .filter(|id| !found.iter().any(|skill| skill.id == **id))
            .map(|id| id.to_string())
            .collect();

        if !missing.is_empty() {
            return Err(AppError::ValidationError(vec![FieldError {
                field: "technology_ids".to_string(),
                message: format!("Unknown skill ids: {}", missing.join(", ")),
            }]));
        }

        input.technology_ids = ids;
        Ok(())
    }
}

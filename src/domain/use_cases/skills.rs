use validator::Validate;

use crate::{
    entities::skill::{Skill, SkillInput},
    errors::AppError,
    repositories::skill::SkillRepository,
};

pub struct SkillHandler<R>
where
    R: SkillRepository,
{
    pub skill_repo: R,
}

impl<R> SkillHandler<R>
where
    R: SkillRepository,
{
    pub fn new(skill_repo: R) -> Self {
        SkillHandler { skill_repo }
    }

    pub async fn list_skills(&self) -> Result<Vec<Skill>, AppError> {
        self.skill_repo.list_skills().await
    }

    pub async fn featured_skills(&self) -> Result<Vec<Skill>, AppError> {
        self.skill_repo.list_featured_skills().await
    }

    pub async fn get_skill(&self, id: i64) -> Result<Skill, AppError> {
        self.skill_repo
            .get_skill_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Skill not found".to_string()))
    }

    pub async fn create_skill(&self, input: SkillInput) -> Result<Skill, AppError> {
        input.validate()?;

        let id = self.skill_repo.create_skill(&input).await?;
        self.get_skill(id).await
    }

    /// Creates the skill unless one with the same name exists. Returns whether it was created.
    pub async fn ensure_skill(&self, input: SkillInput) -> Result<(Skill, bool), AppError> {
        if let Some(existing) = self.skill_repo.find_skill_by_name(&input.name).await? {
            return Ok((existing, false));
        }
        Ok((self.create_skill(input).await?, true))
    }

    pub async fn update_skill(&self, id: i64, input: SkillInput) -> Result<Skill, AppError> {
        input.validate()?;

        self.skill_repo.update_skill(id, &input).await?;
        self.get_skill(id).await
    }

    /// Projects that used the skill keep existing; only the link goes away.
    pub async fn delete_skill(&self, id: i64) -> Result<(), AppError> {
        self.skill_repo.delete_skill(id).await
    }
}

use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite};

use crate::{
    entities::skill::{Skill, SkillInput},
    errors::AppError,
    repositories::sqlx_repo::SqlxSkillRepo,
};

const SKILL_ORDER: &str = "ORDER BY category, is_featured DESC, display_order, name";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SkillRepository: Send + Sync {
    async fn list_skills(&self) -> Result<Vec<Skill>, AppError>;
    async fn list_featured_skills(&self) -> Result<Vec<Skill>, AppError>;
    async fn get_skills_by_ids(&self, ids: &[i64]) -> Result<Vec<Skill>, AppError>;
    async fn get_skill_by_id(&self, id: i64) -> Result<Option<Skill>, AppError>;
    async fn find_skill_by_name(&self, name: &str) -> Result<Option<Skill>, AppError>;
    async fn create_skill(&self, input: &SkillInput) -> Result<i64, AppError>;
    async fn update_skill(&self, id: i64, input: &SkillInput) -> Result<(), AppError>;
    async fn delete_skill(&self, id: i64) -> Result<(), AppError>;
}

impl SqlxSkillRepo {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        SqlxSkillRepo { pool }
    }
}

fn not_found() -> AppError {
    AppError::NotFound("Skill not found".to_string())
}

#[async_trait]
impl SkillRepository for SqlxSkillRepo {
    async fn list_skills(&self) -> Result<Vec<Skill>, AppError> {
        sqlx::query_as::<_, Skill>(&format!("SELECT * FROM skills {SKILL_ORDER}"))
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn list_featured_skills(&self) -> Result<Vec<Skill>, AppError> {
        sqlx::query_as::<_, Skill>(&format!("SELECT * FROM skills WHERE is_featured = 1 {SKILL_ORDER}"))
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn get_skills_by_ids(&self, ids: &[i64]) -> Result<Vec<Skill>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT * FROM skills WHERE id IN (");
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(") ");
        builder.push(SKILL_ORDER);

        builder
            .build_query_as::<Skill>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn get_skill_by_id(&self, id: i64) -> Result<Option<Skill>, AppError> {
        sqlx::query_as::<_, Skill>("SELECT * FROM skills WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn find_skill_by_name(&self, name: &str) -> Result<Option<Skill>, AppError> {
        sqlx::query_as::<_, Skill>("SELECT * FROM skills WHERE name = ? ORDER BY id LIMIT 1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn create_skill(&self, input: &SkillInput) -> Result<i64, AppError> {
        let result = sqlx::query(
            r#"INSERT INTO skills (name, proficiency, category, icon, is_featured, display_order)
            VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&input.name)
        .bind(input.proficiency)
        .bind(input.category.as_str())
        .bind(&input.icon)
        .bind(input.is_featured)
        .bind(input.display_order)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    async fn update_skill(&self, id: i64, input: &SkillInput) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"UPDATE skills
            SET name = ?, proficiency = ?, category = ?, icon = ?, is_featured = ?, display_order = ?
            WHERE id = ?"#,
        )
        .bind(&input.name)
        .bind(input.proficiency)
        .bind(input.category.as_str())
        .bind(&input.icon)
        .bind(input.is_featured)
        .bind(input.display_order)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(not_found());
        }
        Ok(())
    }

    async fn delete_skill(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM skills WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found());
        }
        Ok(())
    }
}

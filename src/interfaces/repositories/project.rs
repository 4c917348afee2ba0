use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::{
    entities::{
        project::{Project, ProjectInput},
        skill::Skill,
    },
    errors::AppError,
    repositories::sqlx_repo::SqlxProjectRepo,
};

const PROJECT_ORDER: &str = "ORDER BY is_featured DESC, display_order, created_at DESC, id DESC";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn list_projects(&self) -> Result<Vec<Project>, AppError>;
    async fn list_featured_projects(&self) -> Result<Vec<Project>, AppError>;
    async fn get_project_by_id(&self, id: i64) -> Result<Option<Project>, AppError>;
    async fn find_project_by_title(&self, title: &str) -> Result<Option<Project>, AppError>;
    async fn create_project(&self, input: &ProjectInput) -> Result<i64, AppError>;
    async fn update_project(&self, id: i64, input: &ProjectInput) -> Result<(), AppError>;
    async fn delete_project(&self, id: i64) -> Result<(), AppError>;
}

impl SqlxProjectRepo {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        SqlxProjectRepo { pool }
    }

    async fn attach_technologies(&self, mut projects: Vec<Project>) -> Result<Vec<Project>, AppError> {
        if projects.is_empty() {
            return Ok(projects);
        }

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT pt.project_id, s.* FROM project_technologies pt \
             JOIN skills s ON s.id = pt.skill_id WHERE pt.project_id IN (",
        );
        let mut separated = builder.separated(", ");
        for project in &projects {
            separated.push_bind(project.id);
        }
        separated.push_unseparated(") ");
        builder.push("ORDER BY s.category, s.display_order, s.name");

        let rows = builder
            .build_query_as::<TechnologyRow>()
            .fetch_all(&self.pool)
            .await?;

        let mut by_project: HashMap<i64, Vec<Skill>> = HashMap::new();
        for row in rows {
            by_project.entry(row.project_id).or_default().push(row.skill);
        }

        for project in &mut projects {
            project.technologies = by_project.remove(&project.id).unwrap_or_default();
        }
        Ok(projects)
    }
}

#[derive(sqlx::FromRow)]
struct TechnologyRow {
    project_id: i64,
    #[sqlx(flatten)]
    skill: Skill,
}

async fn link_technologies(
    conn: &mut SqliteConnection,
    project_id: i64,
    technology_ids: &[i64],
) -> Result<(), AppError> {
    for skill_id in technology_ids {
        sqlx::query("INSERT OR IGNORE INTO project_technologies (project_id, skill_id) VALUES (?, ?)")
            .bind(project_id)
            .bind(skill_id)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

fn not_found() -> AppError {
    AppError::NotFound("Project not found".to_string())
}

#[async_trait]
impl ProjectRepository for SqlxProjectRepo {
    async fn list_projects(&self) -> Result<Vec<Project>, AppError> {
        let projects = sqlx::query_as::<_, Project>(&format!("SELECT * FROM projects {PROJECT_ORDER}"))
            .fetch_all(&self.pool)
            .await?;

        self.attach_technologies(projects).await
    }

    async fn list_featured_projects(&self) -> Result<Vec<Project>, AppError> {
        let projects = sqlx::query_as::<_, Project>(&format!(
            "SELECT * FROM projects WHERE is_featured = 1 {PROJECT_ORDER}"
        ))
        .fetch_all(&self.pool)
        .await?;

        self.attach_technologies(projects).await
    }

    async fn get_project_by_id(&self, id: i64) -> Result<Option<Project>, AppError> {
        let project = sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match project {
            Some(project) => Ok(self.attach_technologies(vec![project]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_project_by_title(&self, title: &str) -> Result<Option<Project>, AppError> {
        let project = sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE title = ? ORDER BY id LIMIT 1")
            .bind(title)
            .fetch_optional(&self.pool)
            .await?;

        match project {
            Some(project) => Ok(self.attach_technologies(vec![project]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn create_project(&self, input: &ProjectInput) -> Result<i64, AppError> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"INSERT INTO projects (
                title, description, short_description, image_url, github_url, demo_url,
                is_featured, created_at, updated_at, display_order
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.short_description)
        .bind(&input.image_url)
        .bind(&input.github_url)
        .bind(&input.demo_url)
        .bind(input.is_featured)
        .bind(now)
        .bind(now)
        .bind(input.display_order)
        .execute(&mut *tx)
        .await?;

        let id = result.last_insert_rowid();
        link_technologies(&mut *tx, id, &input.technology_ids).await?;
        tx.commit().await?;

        Ok(id)
    }

    async fn update_project(&self, id: i64, input: &ProjectInput) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"UPDATE projects
            SET title = ?, description = ?, short_description = ?, image_url = ?, github_url = ?,
                demo_url = ?, is_featured = ?, display_order = ?, updated_at = ?
            WHERE id = ?"#,
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.short_description)
        .bind(&input.image_url)
        .bind(&input.github_url)
        .bind(&input.demo_url)
        .bind(input.is_featured)
        .bind(input.display_order)
        .bind(Utc::now())
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(not_found());
        }

        sqlx::query("DELETE FROM project_technologies WHERE project_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        link_technologies(&mut *tx, id, &input.technology_ids).await?;
        tx.commit().await?;

        Ok(())
    }

    async fn delete_project(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found());
        }
        Ok(())
    }
}

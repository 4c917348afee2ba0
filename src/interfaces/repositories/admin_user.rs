use async_trait::async_trait;
use sqlx::error::ErrorKind;

use crate::{
    entities::admin_user::{AdminUser, AdminUserInsert},
    errors::AppError,
    repositories::sqlx_repo::SqlxAdminUserRepo,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminUserRepository: Send + Sync {
    async fn check_connection(&self) -> Result<(), AppError>;
    async fn count_admins(&self) -> Result<i64, AppError>;
    async fn get_admin_by_email(&self, email: &str) -> Result<Option<AdminUser>, AppError>;
    async fn get_admin_by_id(&self, id: i64) -> Result<Option<AdminUser>, AppError>;
    async fn create_admin(&self, admin: &AdminUserInsert) -> Result<i64, AppError>;
}

impl SqlxAdminUserRepo {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        SqlxAdminUserRepo { pool }
    }
}

#[async_trait]
impl AdminUserRepository for SqlxAdminUserRepo {
    async fn check_connection(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(AppError::from)
    }

    async fn count_admins(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM admin_users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn get_admin_by_email(&self, email: &str) -> Result<Option<AdminUser>, AppError> {
        sqlx::query_as::<_, AdminUser>("SELECT * FROM admin_users WHERE email = ?")
            .bind(email.trim().to_lowercase())
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn get_admin_by_id(&self, id: i64) -> Result<Option<AdminUser>, AppError> {
        sqlx::query_as::<_, AdminUser>("SELECT * FROM admin_users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn create_admin(&self, admin: &AdminUserInsert) -> Result<i64, AppError> {
        let result = sqlx::query(
            r#"INSERT INTO admin_users (email, password_hash, is_superuser, created_at)
            VALUES (?, ?, ?, ?)"#,
        )
        .bind(&admin.email)
        .bind(&admin.password_hash)
        .bind(admin.is_superuser)
        .bind(admin.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if matches!(db_err.kind(), ErrorKind::UniqueViolation) => {
                AppError::Conflict("An admin with this email already exists".to_string())
            }
            _ => AppError::from(e),
        })?;

        Ok(result.last_insert_rowid())
    }
}

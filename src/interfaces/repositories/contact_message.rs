use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    entities::contact_message::{ContactMessage, ContactMessageInput},
    errors::AppError,
    repositories::sqlx_repo::SqlxContactMessageRepo,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactMessageRepository: Send + Sync {
    async fn list_contact_messages(&self) -> Result<Vec<ContactMessage>, AppError>;
    async fn count_contact_messages(&self) -> Result<i64, AppError>;
    async fn count_unread_messages(&self) -> Result<i64, AppError>;
    async fn get_contact_message_by_id(&self, id: i64) -> Result<Option<ContactMessage>, AppError>;
    async fn create_contact_message(&self, input: &ContactMessageInput) -> Result<i64, AppError>;
    async fn update_contact_message(&self, id: i64, input: &ContactMessageInput) -> Result<(), AppError>;
    async fn delete_contact_message(&self, id: i64) -> Result<(), AppError>;
    async fn mark_read(&self, id: i64) -> Result<(), AppError>;
    /// Sets `replied_at` only if it is still empty. Returns whether a row changed.
    async fn mark_replied(&self, id: i64, at: DateTime<Utc>) -> Result<bool, AppError>;
}

impl SqlxContactMessageRepo {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        SqlxContactMessageRepo { pool }
    }
}

fn not_found() -> AppError {
    AppError::NotFound("Contact message not found".to_string())
}

#[async_trait]
impl ContactMessageRepository for SqlxContactMessageRepo {
    async fn list_contact_messages(&self) -> Result<Vec<ContactMessage>, AppError> {
        sqlx::query_as::<_, ContactMessage>(
            "SELECT * FROM contact_messages ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn count_contact_messages(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM contact_messages")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn count_unread_messages(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM contact_messages WHERE is_read = 0")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn get_contact_message_by_id(&self, id: i64) -> Result<Option<ContactMessage>, AppError> {
        sqlx::query_as::<_, ContactMessage>("SELECT * FROM contact_messages WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn create_contact_message(&self, input: &ContactMessageInput) -> Result<i64, AppError> {
        let result = sqlx::query(
            r#"INSERT INTO contact_messages (name, email, subject, message, created_at, is_read)
            VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.subject)
        .bind(&input.message)
        .bind(Utc::now())
        .bind(input.is_read)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    async fn update_contact_message(&self, id: i64, input: &ContactMessageInput) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"UPDATE contact_messages
            SET name = ?, email = ?, subject = ?, message = ?, is_read = ?
            WHERE id = ?"#,
        )
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.subject)
        .bind(&input.message)
        .bind(input.is_read)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(not_found());
        }
        Ok(())
    }

    async fn delete_contact_message(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM contact_messages WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found());
        }
        Ok(())
    }

    async fn mark_read(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE contact_messages SET is_read = 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found());
        }
        Ok(())
    }

    async fn mark_replied(&self, id: i64, at: DateTime<Utc>) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE contact_messages SET replied_at = ?, is_read = 1 WHERE id = ? AND replied_at IS NULL",
        )
        .bind(at)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}

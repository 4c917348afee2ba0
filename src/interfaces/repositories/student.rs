use async_trait::async_trait;
use sqlx::error::ErrorKind;

use crate::{
    entities::student::{NewStudent, Student, StudentUpdate},
    errors::AppError,
    repositories::sqlx_repo::SqlxStudentRepo,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudentRepository: Send + Sync {
    async fn list_students(&self) -> Result<Vec<Student>, AppError>;
    async fn get_student_by_id(&self, student_id: i64) -> Result<Option<Student>, AppError>;
    async fn create_student(&self, student: &NewStudent) -> Result<i64, AppError>;
    async fn update_student(&self, student_id: i64, update: &StudentUpdate) -> Result<(), AppError>;
    async fn delete_student(&self, student_id: i64) -> Result<(), AppError>;
}

impl SqlxStudentRepo {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        SqlxStudentRepo { pool }
    }
}

fn not_found() -> AppError {
    AppError::NotFound("Student not found".to_string())
}

#[async_trait]
impl StudentRepository for SqlxStudentRepo {
    async fn list_students(&self) -> Result<Vec<Student>, AppError> {
        sqlx::query_as::<_, Student>("SELECT * FROM students ORDER BY student_id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn get_student_by_id(&self, student_id: i64) -> Result<Option<Student>, AppError> {
        sqlx::query_as::<_, Student>("SELECT * FROM students WHERE student_id = ?")
            .bind(student_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn create_student(&self, student: &NewStudent) -> Result<i64, AppError> {
        sqlx::query("INSERT INTO students (student_id, name_prefix, first_name, last_name) VALUES (?, ?, ?, ?)")
            .bind(student.student_id)
            .bind(student.name_prefix.as_str())
            .bind(&student.first_name)
            .bind(&student.last_name)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db_err)
                    if matches!(db_err.kind(), ErrorKind::UniqueViolation) =>
                {
                    AppError::Conflict(format!("Student {} already exists", student.student_id))
                }
                _ => AppError::from(e),
            })?;

        Ok(student.student_id)
    }

    async fn update_student(&self, student_id: i64, update: &StudentUpdate) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE students SET name_prefix = ?, first_name = ?, last_name = ? WHERE student_id = ?",
        )
        .bind(update.name_prefix.as_str())
        .bind(&update.first_name)
        .bind(&update.last_name)
        .bind(student_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(not_found());
        }
        Ok(())
    }

    async fn delete_student(&self, student_id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM students WHERE student_id = ?")
            .bind(student_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found());
        }
        Ok(())
    }
}

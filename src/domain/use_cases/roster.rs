use validator::Validate;

use crate::{
    entities::student::{NewStudent, Student, StudentListResponse, StudentUpdate},
    errors::AppError,
    repositories::student::StudentRepository,
};

pub struct StudentHandler<R>
where
    R: StudentRepository,
{
    pub student_repo: R,
}

impl<R> StudentHandler<R>
where
    R: StudentRepository,
{
    pub fn new(student_repo: R) -> Self {
        StudentHandler { student_repo }
    }

    /// All students, ascending by student id.
    pub async fn list_students(&self) -> Result<StudentListResponse, AppError> {
        let students = self.student_repo.list_students().await?;
        let total_students = students.len();

        Ok(StudentListResponse { students, total_students })
    }

    pub async fn get_student(&self, student_id: i64) -> Result<Student, AppError> {
        self.student_repo
            .get_student_by_id(student_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Student not found".to_string()))
    }

    pub async fn create_student(&self, input: NewStudent) -> Result<Student, AppError> {
        input.validate()?;

        let student_id = self.student_repo.create_student(&input).await?;
        self.get_student(student_id).await
    }

    pub async fn update_student(&self, student_id: i64, input: StudentUpdate) -> Result<Student, AppError> {
        input.validate()?;

        self.student_repo.update_student(student_id, &input).await?;
        self.get_student(student_id).await
    }

    pub async fn delete_student(&self, student_id: i64) -> Result<(), AppError> {
        self.student_repo.delete_student(student_id).await
    }
}

use sqlx::SqlitePool;

use crate::repositories::sqlx_repo::{
    SqlxAdminUserRepo, SqlxContactMessageRepo, SqlxProjectRepo, SqlxSiteConfigRepo, SqlxSkillRepo,
    SqlxStudentRepo,
};

#[derive(Clone)]
pub struct SharedRepositories {
    pub admin_repo: SqlxAdminUserRepo,
    pub contact_repo: SqlxContactMessageRepo,
    pub skill_repo: SqlxSkillRepo,
    pub project_repo: SqlxProjectRepo,
    pub site_repo: SqlxSiteConfigRepo,
    pub student_repo: SqlxStudentRepo,
}

impl SharedRepositories {
    pub fn new(pool: SqlitePool) -> Self {
        SharedRepositories {
            admin_repo: SqlxAdminUserRepo::new(pool.clone()),
            contact_repo: SqlxContactMessageRepo::new(pool.clone()),
            skill_repo: SqlxSkillRepo::new(pool.clone()),
            project_repo: SqlxProjectRepo::new(pool.clone()),
            site_repo: SqlxSiteConfigRepo::new(pool.clone()),
            student_repo: SqlxStudentRepo::new(pool),
        }
    }
}

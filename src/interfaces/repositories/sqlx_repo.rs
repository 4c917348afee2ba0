use sqlx::SqlitePool;

#[derive(Clone)]
pub struct SqlxAdminUserRepo {
    pub pool: SqlitePool,
}

#[derive(Clone)]
pub struct SqlxContactMessageRepo {
    pub pool: SqlitePool,
}

#[derive(Clone)]
pub struct SqlxSkillRepo {
    pub pool: SqlitePool,
}

#[derive(Clone)]
pub struct SqlxProjectRepo {
    pub pool: SqlitePool,
}

#[derive(Clone)]
pub struct SqlxSiteConfigRepo {
    pub pool: SqlitePool,
}

#[derive(Clone)]
pub struct SqlxStudentRepo {
    pub pool: SqlitePool,
}

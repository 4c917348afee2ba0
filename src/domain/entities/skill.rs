use std::fmt;

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::fields::UnknownVariant;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillCategory {
    Frontend,
    Backend,
    Database,
    Devops,
    Design,
    #[default]
    Other,
}

impl SkillCategory {
    pub const ALL: [SkillCategory; 6] = [
        SkillCategory::Frontend,
        SkillCategory::Backend,
        SkillCategory::Database,
        SkillCategory::Devops,
        SkillCategory::Design,
        SkillCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SkillCategory::Frontend => "frontend",
            SkillCategory::Backend => "backend",
            SkillCategory::Database => "database",
            SkillCategory::Devops => "devops",
            SkillCategory::Design => "design",
            SkillCategory::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SkillCategory::Frontend => "Frontend Development",
            SkillCategory::Backend => "Backend Development",
            SkillCategory::Database => "Database",
            SkillCategory::Devops => "DevOps",
            SkillCategory::Design => "Design",
            SkillCategory::Other => "Other",
        }
    }
}

impl fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for SkillCategory {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        SkillCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == value)
            .ok_or(UnknownVariant { kind: "skill category", value })
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Skill {
    pub id: i64,
    pub name: String,
    pub proficiency: i64,
    #[sqlx(try_from = "String")]
    pub category: SkillCategory,
    pub icon: String,
    pub is_featured: bool,
    pub display_order: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SkillInput {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(range(min = 0, max = 100, message = "Proficiency must be between 0 and 100"))]
    #[serde(default)]
    pub proficiency: i64,

    #[serde(default)]
    pub category: SkillCategory,

    #[validate(length(max = 50, message = "Icon class must be at most 50 characters"))]
    #[serde(default)]
    pub icon: String,

    #[serde(default)]
    pub is_featured: bool,

    #[serde(default)]
    pub display_order: i64,
}

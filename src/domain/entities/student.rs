use std::fmt;

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::fields::UnknownVariant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamePrefix {
    Mr,
    Mrs,
    Miss,
    Ms,
}

impl NamePrefix {
    pub const ALL: [NamePrefix; 4] = [NamePrefix::Mr, NamePrefix::Mrs, NamePrefix::Miss, NamePrefix::Ms];

    pub fn as_str(&self) -> &'static str {
        match self {
            NamePrefix::Mr => "mr",
            NamePrefix::Mrs => "mrs",
            NamePrefix::Miss => "miss",
            NamePrefix::Ms => "ms",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            NamePrefix::Mr => "Mr.",
            NamePrefix::Mrs => "Mrs.",
            NamePrefix::Miss => "Miss",
            NamePrefix::Ms => "Ms.",
        }
    }
}

impl fmt::Display for NamePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl TryFrom<String> for NamePrefix {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        NamePrefix::ALL
            .into_iter()
            .find(|p| p.as_str() == value)
            .ok_or(UnknownVariant { kind: "name prefix", value })
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Student {
    pub student_id: i64,
    #[sqlx(try_from = "String")]
    pub name_prefix: NamePrefix,
    pub first_name: String,
    pub last_name: String,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {} {}", self.name_prefix.title(), self.first_name, self.last_name)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewStudent {
    #[validate(range(min = 1, message = "Student ID must be a positive number"))]
    pub student_id: i64,

    pub name_prefix: NamePrefix,

    #[validate(length(min = 1, max = 100, message = "First name must be 1-100 characters"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100, message = "Last name must be 1-100 characters"))]
    pub last_name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct StudentUpdate {
    pub name_prefix: NamePrefix,

    #[validate(length(min = 1, max = 100, message = "First name must be 1-100 characters"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100, message = "Last name must be 1-100 characters"))]
    pub last_name: String,
}

#[derive(Debug, Serialize)]
pub struct StudentListResponse {
    pub students: Vec<Student>,
    pub total_students: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_name_uses_prefix_title() {
        let student = Student {
            student_id: 7,
            name_prefix: NamePrefix::Ms,
            first_name: "Mali".into(),
            last_name: "Suayngam".into(),
        };
        assert_eq!(student.full_name(), "Ms. Mali Suayngam");
    }

    #[test]
    fn unknown_prefix_is_rejected_at_both_edges() {
        assert!(NamePrefix::try_from("dr".to_string()).is_err());
        assert!(serde_json::from_str::<NamePrefix>(r#""dr""#).is_err());
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ContactMessage {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub is_read: bool,
    pub replied_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ContactMessageInput {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, max = 200, message = "Subject must be 1-200 characters"))]
    pub subject: String,

    #[validate(length(min = 1, message = "Message cannot be empty"))]
    pub message: String,

    #[serde(default)]
    pub is_read: bool,
}

#[derive(Debug, Serialize)]
pub struct ContactMessageListResponse {
    pub messages: Vec<ContactMessage>,
    pub total: i64,
    pub unread: i64,
}

/// What the public contact form posted. Absent fields stay `None`.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct ContactSubmission {
    pub name: Option<String>,
    pub lastname: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

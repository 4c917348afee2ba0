use chrono::Utc;
use validator::Validate;

use crate::{
    entities::contact_message::{ContactMessage, ContactMessageInput, ContactMessageListResponse},
    errors::AppError,
    repositories::contact_message::ContactMessageRepository,
};

pub struct ContactMessageHandler<R>
where
    R: ContactMessageRepository,
{
    pub contact_repo: R,
}

impl<R> ContactMessageHandler<R>
where
    R: ContactMessageRepository,
{
    pub fn new(contact_repo: R) -> Self {
        ContactMessageHandler { contact_repo }
    }

    pub async fn list_contact_messages(&self) -> Result<ContactMessageListResponse, AppError> {
        let messages = self.contact_repo.list_contact_messages().await?;
        let total = self.contact_repo.count_contact_messages().await?;
        let unread = self.contact_repo.count_unread_messages().await?;

        Ok(ContactMessageListResponse { messages, total, unread })
    }

    pub async fn get_contact_message(&self, id: i64) -> Result<ContactMessage, AppError> {
        self.contact_repo
            .get_contact_message_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Contact message not found".to_string()))
    }

    pub async fn create_contact_message(&self, input: ContactMessageInput) -> Result<ContactMessage, AppError> {
        input.validate()?;

        let id = self.contact_repo.create_contact_message(&input).await?;
        self.get_contact_message(id).await
    }

    pub async fn update_contact_message(&self, id: i64, input: ContactMessageInput) -> Result<ContactMessage, AppError> {
        input.validate()?;

        self.contact_repo.update_contact_message(id, &input).await?;
        self.get_contact_message(id).await
    }

    pub async fn delete_contact_message(&self, id: i64) -> Result<(), AppError> {
        self.contact_repo.delete_contact_message(id).await
    }

    pub async fn mark_read(&self, id: i64) -> Result<ContactMessage, AppError> {
        self.contact_repo.mark_read(id).await?;
        self.get_contact_message(id).await
    }

    /// Records the reply time. A message can only be replied to once.
    pub async fn mark_replied(&self, id: i64) -> Result<ContactMessage, AppError> {
        let message = self.get_contact_message(id).await?;
        if message.replied_at.is_some() {
            return Err(AppError::Conflict("Contact message has already been replied to".to_string()));
        }

        if !self.contact_repo.mark_replied(id, Utc::now()).await? {
            return Err(AppError::Conflict("Contact message has already been replied to".to_string()));
        }

        tracing::info!(message_id = id, "Contact message marked as replied");
        self.get_contact_message(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::contact_message::MockContactMessageRepository;
    use chrono::Utc;

    fn message(replied: bool) -> ContactMessage {
        ContactMessage {
            id: 3,
            name: "Somchai".into(),
            email: "somchai@example.com".into(),
            subject: "Hello".into(),
            message: "Nice portfolio".into(),
            created_at: Utc::now(),
            is_read: replied,
            replied_at: replied.then(Utc::now),
        }
    }

    #[tokio::test]
    async fn already_replied_message_conflicts() {
        let mut repo = MockContactMessageRepository::new();
        repo.expect_get_contact_message_by_id().returning(|_| Ok(Some(message(true))));
        repo.expect_mark_replied().never();

        let handler = ContactMessageHandler::new(repo);
        assert!(matches!(handler.mark_replied(3).await, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn lost_reply_race_conflicts() {
        let mut repo = MockContactMessageRepository::new();
        repo.expect_get_contact_message_by_id().returning(|_| Ok(Some(message(false))));
        repo.expect_mark_replied().returning(|_, _| Ok(false));

        let handler = ContactMessageHandler::new(repo);
        assert!(matches!(handler.mark_replied(3).await, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn replying_to_missing_message_is_not_found() {
        let mut repo = MockContactMessageRepository::new();
        repo.expect_get_contact_message_by_id().returning(|_| Ok(None));

        let handler = ContactMessageHandler::new(repo);
        assert!(matches!(handler.mark_replied(99).await, Err(AppError::NotFound(_))));
    }
}

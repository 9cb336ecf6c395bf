use async_trait::async_trait;

use crate::domain::errors::DomainError;
use crate::domain::models::contact_message::ContactMessage;

/// Outbound transactional email
#[async_trait]
pub trait EmailRepository: Send + Sync {
    /// Send a contact message through the configured template
    async fn send(&self, message: &ContactMessage) -> Result<(), DomainError>;
}

use std::sync::Arc;

use crate::domain::errors::DomainError;
use crate::domain::models::contact_message::ContactMessage;
use crate::domain::repositories::email_repository::EmailRepository;
use crate::infrastructure::logging::logger;

/// Service behind the contact form
pub struct ContactService {
    email_repository: Arc<dyn EmailRepository>,
}

impl ContactService {
    pub fn new(email_repository: Arc<dyn EmailRepository>) -> Self {
        Self { email_repository }
    }

    /// Validate and send one message. Nothing is retried.
    pub async fn send(&self, message: &ContactMessage) -> Result<(), DomainError> {
        message.validate()?;

        let message = ContactMessage {
            from_name: message.from_name.trim().to_string(),
            from_email: message.from_email.trim().to_string(),
            message: message.message.trim().to_string(),
        };

        logger::debug(&format!("Sending contact message from {}", message.from_email));
        self.email_repository.send(&message).await.map_err(|error| match error {
            DomainError::DeliveryError(_) => error,
            other => DomainError::DeliveryError(other.to_string()),
        })?;

        logger::info("Contact message sent");
        Ok(())
    }
}

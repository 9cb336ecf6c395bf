use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::errors::DomainError;
use crate::domain::models::contact_message::ContactMessage;
use crate::domain::repositories::email_repository::EmailRepository;

/// Keeps contact messages in memory instead of sending them
#[derive(Default)]
pub struct MemoryEmailRepository {
    sent: Mutex<Vec<ContactMessage>>,
}

impl MemoryEmailRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<ContactMessage> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl EmailRepository for MemoryEmailRepository {
    async fn send(&self, message: &ContactMessage) -> Result<(), DomainError> {
        tracing::info!("Recording contact message from {}", message.from_email);
        self.sent
            .lock()
            .map_err(|_| DomainError::DeliveryError("Mailbox lock poisoned".to_string()))?
            .push(message.clone());
        Ok(())
    }
}

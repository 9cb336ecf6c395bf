use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Message sent from the contact form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub from_name: String,
    pub from_email: String,
    pub message: String,
}

impl ContactMessage {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.from_name.trim().is_empty() {
            return Err(DomainError::ValidationError("Name is required".to_string()));
        }

        let email = self.from_email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(DomainError::ValidationError(
                "A valid email address is required".to_string(),
            ));
        }

        if self.message.trim().is_empty() {
            return Err(DomainError::ValidationError("Message is required".to_string()));
        }

        Ok(())
    }
}

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::domain::errors::DomainError;
use crate::domain::models::contact_message::ContactMessage;
use crate::domain::repositories::email_repository::EmailRepository;
use crate::infrastructure::config::EmailConfig;
use crate::infrastructure::http_client::build_http_client;

#[derive(Debug, Serialize)]
struct TemplateParams<'a> {
    from_name: &'a str,
    from_email: &'a str,
    message: &'a str,
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: TemplateParams<'a>,
}

/// Sends contact messages through an EmailJS template
pub struct EmailJsRepository {
    client: Client,
    config: EmailConfig,
}

impl EmailJsRepository {
    pub fn new(config: EmailConfig) -> Result<Self, DomainError> {
        let client = build_http_client(Client::builder()).map_err(|error| {
            DomainError::InternalError(format!("Failed to build HTTP client: {error}"))
        })?;

        Ok(Self { client, config })
    }

    fn request_body<'a>(&'a self, message: &'a ContactMessage) -> SendRequest<'a> {
        SendRequest {
            service_id: &self.config.service_id,
            template_id: &self.config.template_id,
            user_id: &self.config.public_key,
            template_params: TemplateParams {
                from_name: &message.from_name,
                from_email: &message.from_email,
                message: &message.message,
            },
        }
    }
}

#[async_trait]
impl EmailRepository for EmailJsRepository {
    async fn send(&self, message: &ContactMessage) -> Result<(), DomainError> {
        tracing::debug!("Sending contact message from {}", message.from_email);

        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&self.request_body(message))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to reach email service: {}", e);
                DomainError::DeliveryError(format!("Failed to reach email service: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Email service failed with status {}: {}", status.as_u16(), body);
            return Err(DomainError::DeliveryError(format!(
                "Email service failed with status {}: {}",
                status.as_u16(),
                body.trim()
            )));
        }

        tracing::info!("Contact message sent");
        Ok(())
    }
}

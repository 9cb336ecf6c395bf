use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::errors::DomainError;
use crate::domain::repositories::content_repository::{ContentRepository, ContentTable, OrderBy};

use super::{SupabaseClient, describe_error_response};

/// Content store backed by the project's PostgREST endpoint
pub struct SupabaseContentRepository {
    client: Arc<SupabaseClient>,
}

impl SupabaseContentRepository {
    pub fn new(client: Arc<SupabaseClient>) -> Self {
        Self { client }
    }

    fn table_url(&self, table: ContentTable) -> String {
        self.client.endpoint(&format!("/rest/v1/{}", table.as_str()))
    }
}

fn order_param(order: &OrderBy) -> String {
    format!(
        "{}.{}",
        order.column,
        if order.ascending { "asc" } else { "desc" }
    )
}

#[async_trait]
impl ContentRepository for SupabaseContentRepository {
    async fn select_all(&self, table: ContentTable, order: &OrderBy) -> Result<Vec<Value>, DomainError> {
        tracing::debug!("Selecting all rows from {}", table.as_str());

        let request = self
            .client
            .http()
            .get(self.table_url(table))
            .query(&[("select", "*".to_string()), ("order", order_param(order))]);

        let response = self.client.authorize(request).send().await.map_err(|e| {
            tracing::error!("Failed to query {}: {}", table.as_str(), e);
            DomainError::InternalError(format!("Failed to query {}: {}", table.as_str(), e))
        })?;

        if !response.status().is_success() {
            let message = describe_error_response("Content store", response).await;
            tracing::error!("Select from {} failed: {}", table.as_str(), message);
            return Err(DomainError::InternalError(message));
        }

        response.json::<Vec<Value>>().await.map_err(|e| {
            DomainError::InternalError(format!("Invalid rows from {}: {}", table.as_str(), e))
        })
    }

    async fn insert_one(&self, table: ContentTable, row: Value) -> Result<Value, DomainError> {
        tracing::debug!("Inserting one row into {}", table.as_str());

        let request = self
            .client
            .http()
            .post(self.table_url(table))
            .header("Prefer", "return=representation")
            .json(&row);

        let response = self.client.authorize(request).send().await.map_err(|e| {
            tracing::error!("Failed to insert into {}: {}", table.as_str(), e);
            DomainError::PersistError(format!("Failed to insert into {}: {}", table.as_str(), e))
        })?;

        if !response.status().is_success() {
            let message = describe_error_response("Content store", response).await;
            tracing::error!("Insert into {} failed: {}", table.as_str(), message);
            return Err(DomainError::PersistError(message));
        }

        let mut rows = response.json::<Vec<Value>>().await.map_err(|e| {
            DomainError::PersistError(format!("Invalid insert response from {}: {}", table.as_str(), e))
        })?;

        if rows.is_empty() {
            return Err(DomainError::PersistError(format!(
                "Insert into {} returned no row",
                table.as_str()
            )));
        }

        Ok(rows.swap_remove(0))
    }
}

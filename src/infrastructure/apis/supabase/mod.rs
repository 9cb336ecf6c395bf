use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;
use url::Url;

use crate::domain::errors::DomainError;
use crate::infrastructure::http_client::build_http_client;

mod rest;
mod storage;

pub use rest::SupabaseContentRepository;
pub use storage::SupabaseObjectStorageRepository;

const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Connection to a Supabase project: REST (PostgREST) and Storage endpoints
/// share the project URL and anon key
pub struct SupabaseClient {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseClient {
    pub fn new(base_url: &str, anon_key: &str) -> Result<Self, DomainError> {
        Url::parse(base_url).map_err(|error| {
            DomainError::InternalError(format!("Invalid Supabase URL '{}': {}", base_url, error))
        })?;

        let client = build_http_client(Client::builder()).map_err(|error| {
            DomainError::InternalError(format!("Failed to build HTTP client: {error}"))
        })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
        })
    }

    pub(crate) fn http(&self) -> &Client {
        &self.client
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
    }
}

/// Percent-encode each `/`-separated segment of an object path
pub(crate) fn encode_object_path(path: &str) -> String {
    path.trim_start_matches('/')
        .split('/')
        .map(|segment| utf8_percent_encode(segment, PATH_SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

/// Upstream failure description: status plus the most specific message in the body
pub(crate) async fn describe_error_response(service: &str, response: reqwest::Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = extract_error_message(&body, status.canonical_reason().unwrap_or("request failed"));

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        format!("{service} rejected the credentials ({}): {message}", status.as_u16())
    } else {
        format!("{service} failed with status {}: {message}", status.as_u16())
    }
}

fn extract_error_message(body: &str, default_message: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return default_message.to_string();
    }

    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for key in ["message", "error_description", "error"] {
            if let Some(message) = value
                .get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|value| !value.is_empty())
            {
                return message.to_string();
            }
        }
    }

    body.to_string()
}

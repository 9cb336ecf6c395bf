use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

pub const ENV_BIND: &str = "ARTVENTURE_BIND";
pub const ENV_SUPABASE_URL: &str = "ARTVENTURE_SUPABASE_URL";
pub const ENV_SUPABASE_ANON_KEY: &str = "ARTVENTURE_SUPABASE_ANON_KEY";
pub const ENV_EMAILJS_PUBLIC_KEY: &str = "ARTVENTURE_EMAILJS_PUBLIC_KEY";

/// Which implementation backs the content store, object storage and email
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Supabase,
    #[default]
    Memory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    /// Request body limit, multipart uploads included
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
            max_body_bytes: 64 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub dir: PathBuf,
    /// Default filter directive, overridden by `RUST_LOG`
    pub level: String,
    /// Also write a daily rolling file under `dir`
    pub file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("logs"),
            level: "info".to_string(),
            file: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
    pub bucket: String,
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: String::new(),
            bucket: "testimonials-assets".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    pub endpoint: String,
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.emailjs.com/api/v1.0/email/send".to_string(),
            service_id: String::new(),
            template_id: String::new(),
            public_key: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub cache_control_seconds: u32,
    pub avatar_folder: String,
    pub drawing_folder: String,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            cache_control_seconds: 3600,
            avatar_folder: "avatars".to_string(),
            drawing_folder: "drawings".to_string(),
        }
    }
}

/// Site configuration, read from YAML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub backend: BackendKind,
    pub supabase: SupabaseConfig,
    pub email: EmailConfig,
    pub uploads: UploadConfig,
}

impl SiteConfig {
    /// Load the config file (defaults when it does not exist), then apply
    /// environment overrides and validate
    pub fn load(path: &Path) -> Result<Self, DomainError> {
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path).map_err(|error| {
                DomainError::InternalError(format!("Failed to read config {:?}: {}", path, error))
            })?;
            Self::from_yaml(&raw)?
        } else {
            tracing::warn!("Config file {:?} not found, using defaults", path);
            Self::default()
        };

        let env: HashMap<String, String> = std::env::vars().collect();
        config.apply_overrides(&env);
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, DomainError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(raw)
            .map_err(|error| DomainError::ValidationError(format!("Invalid config: {}", error)))
    }

    pub fn apply_overrides(&mut self, env: &HashMap<String, String>) {
        let get = |key: &str| env.get(key).filter(|value| !value.trim().is_empty()).cloned();

        if let Some(bind) = get(ENV_BIND) {
            self.server.bind = bind;
        }
        if let Some(url) = get(ENV_SUPABASE_URL) {
            self.supabase.url = url;
        }
        if let Some(key) = get(ENV_SUPABASE_ANON_KEY) {
            self.supabase.anon_key = key;
        }
        if let Some(key) = get(ENV_EMAILJS_PUBLIC_KEY) {
            self.email.public_key = key;
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.backend == BackendKind::Supabase {
            if self.supabase.url.trim().is_empty() || self.supabase.anon_key.trim().is_empty() {
                return Err(DomainError::ValidationError(
                    "The supabase backend needs both supabase.url and supabase.anon_key".to_string(),
                ));
            }

            url::Url::parse(&self.supabase.url).map_err(|error| {
                DomainError::ValidationError(format!(
                    "Invalid supabase.url '{}': {}",
                    self.supabase.url, error
                ))
            })?;
        }

        if self.supabase.bucket.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "supabase.bucket must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn upload_cache_control(&self) -> String {
        self.uploads.cache_control_seconds.to_string()
    }
}

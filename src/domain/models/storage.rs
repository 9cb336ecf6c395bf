use serde::{Deserialize, Serialize};

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Options sent with every object upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadOptions {
    /// Cache lifetime in seconds, as sent in the `cache-control` header
    pub cache_control: String,
    /// Whether an existing object at the same path may be replaced
    pub upsert: bool,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            cache_control: "3600".to_string(),
            upsert: false,
        }
    }
}

/// Object written to storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredObject {
    pub path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeMode {
    Cover,
    Contain,
    Fill,
}

impl ResizeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResizeMode::Cover => "cover",
            ResizeMode::Contain => "contain",
            ResizeMode::Fill => "fill",
        }
    }
}

/// Server-side image transformation applied when building a public URL
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageTransform {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub resize: Option<ResizeMode>,
    pub quality: Option<u8>,
}

impl ImageTransform {
    /// Query parameters of the transform, in a stable order
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(width) = self.width {
            pairs.push(("width", width.to_string()));
        }
        if let Some(height) = self.height {
            pairs.push(("height", height.to_string()));
        }
        if let Some(resize) = self.resize {
            pairs.push(("resize", resize.as_str().to_string()));
        }
        if let Some(quality) = self.quality {
            pairs.push(("quality", quality.to_string()));
        }
        pairs
    }
}

/// Replace every character outside `[A-Za-z0-9.-]` with `_`
pub fn sanitize_file_name(file_name: &str) -> String {
    file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Collision-resistant object path: `{folder}/{millis}-{suffix}-{sanitized name}`
pub fn object_path(folder: &str, file_name: &str, timestamp_millis: i64, suffix: &str) -> String {
    format!(
        "{}/{}-{}-{}",
        folder.trim_matches('/'),
        timestamp_millis,
        suffix,
        sanitize_file_name(file_name)
    )
}

/// Random lower-case base-36 token
pub fn random_suffix() -> String {
    let mut value = rand::random::<u64>();
    let mut digits = Vec::with_capacity(13);
    loop {
        digits.push(BASE36[(value % 36) as usize]);
        value /= 36;
        if value == 0 {
            break;
        }
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}

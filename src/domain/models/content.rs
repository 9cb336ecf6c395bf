use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const DEFAULT_HEADLINE: &str = "Get In Touch";
pub const DEFAULT_SUBHEADLINE: &str = "Have a question, a project idea, or just want to say hello? Drop us a line, we'd love to hear from you.";
pub const DEFAULT_EMAIL: &str = "hello@artventure.com";
pub const DEFAULT_PHONE: &str = "+1 (234) 567-890";
pub const DEFAULT_ADDRESS: &str = "123 Art Street, Creativity City, 12345";

/// Studio artwork shown in the about section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artwork {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub src: String,
    #[serde(default)]
    pub medium: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub year: Option<String>,
}

/// Class listed in the classes section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassOffering {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub duration: Option<String>,
    /// Name of the icon the page renders for the class
    #[serde(default)]
    pub icon: Option<String>,
}

// Columns that some tables store as numbers and others as text
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(text),
        Some(other) => Some(other.to_string()),
    })
}

/// Row of the `contact_info` table; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfoRow {
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub subheadline: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// Contact details with site defaults filled in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub headline: String,
    pub subheadline: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl Default for ContactInfo {
    fn default() -> Self {
        ContactInfoRow::default().into()
    }
}

impl From<ContactInfoRow> for ContactInfo {
    fn from(row: ContactInfoRow) -> Self {
        fn or_default(value: Option<String>, fallback: &str) -> String {
            value
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| fallback.to_string())
        }

        Self {
            headline: or_default(row.headline, DEFAULT_HEADLINE),
            subheadline: or_default(row.subheadline, DEFAULT_SUBHEADLINE),
            email: or_default(row.email, DEFAULT_EMAIL),
            phone: or_default(row.phone, DEFAULT_PHONE),
            address: or_default(row.address, DEFAULT_ADDRESS),
        }
    }
}

use crate::domain::errors::DomainError;
use async_trait::async_trait;
use serde_json::Value;

/// Collections of the content store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentTable {
    Artworks,
    Classes,
    ContactInfo,
    Testimonials,
}

impl ContentTable {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentTable::Artworks => "artworks",
            ContentTable::Classes => "classes",
            ContentTable::ContactInfo => "contact_info",
            ContentTable::Testimonials => "testimonials",
        }
    }
}

/// Ordering of a select
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub ascending: bool,
}

impl OrderBy {
    pub fn ascending(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: true,
        }
    }

    pub fn descending(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: false,
        }
    }
}

/// Table-like structured content store
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Select every row of a table in the given order
    async fn select_all(&self, table: ContentTable, order: &OrderBy) -> Result<Vec<Value>, DomainError>;

    /// Insert one row and return it as stored (with server-assigned columns)
    async fn insert_one(&self, table: ContentTable, row: Value) -> Result<Value, DomainError>;
}

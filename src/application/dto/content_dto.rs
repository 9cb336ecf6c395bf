use serde::Serialize;

use crate::domain::models::content::{Artwork, ClassOffering, ContactInfo};

/// One read-only section of the page. `load_error` is set when the content
/// could not be fetched and `content` holds the fallback.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelDto<T> {
    pub content: T,
    pub load_error: Option<String>,
}

impl<T> PanelDto<T> {
    pub fn loaded(content: T) -> Self {
        Self {
            content,
            load_error: None,
        }
    }

    pub fn failed(fallback: T, error: impl ToString) -> Self {
        Self {
            content: fallback,
            load_error: Some(error.to_string()),
        }
    }
}

/// Every read-only panel of the landing page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LandingPageDto {
    pub artworks: PanelDto<Vec<Artwork>>,
    pub classes: PanelDto<Vec<ClassOffering>>,
    pub contact_info: PanelDto<ContactInfo>,
}

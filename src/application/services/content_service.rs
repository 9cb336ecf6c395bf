use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::application::dto::content_dto::{LandingPageDto, PanelDto};
use crate::domain::errors::DomainError;
use crate::domain::models::content::{Artwork, ClassOffering, ContactInfo, ContactInfoRow};
use crate::domain::repositories::content_repository::{ContentRepository, ContentTable, OrderBy};
use crate::infrastructure::logging::logger;

/// Read-only panels of the landing page
pub struct ContentService {
    content_repository: Arc<dyn ContentRepository>,
}

impl ContentService {
    /// Create a new ContentService
    pub fn new(content_repository: Arc<dyn ContentRepository>) -> Self {
        Self { content_repository }
    }

    /// Studio artworks, by id
    pub async fn artworks(&self) -> PanelDto<Vec<Artwork>> {
        match self.select::<Artwork>(ContentTable::Artworks).await {
            Ok(artworks) => PanelDto::loaded(artworks),
            Err(error) => {
                logger::warn(&format!("Failed to load artworks: {}", error));
                PanelDto::failed(Vec::new(), error)
            }
        }
    }

    /// Classes on offer, by id
    pub async fn classes(&self) -> PanelDto<Vec<ClassOffering>> {
        match self.select::<ClassOffering>(ContentTable::Classes).await {
            Ok(classes) => PanelDto::loaded(classes),
            Err(error) => {
                logger::warn(&format!("Failed to load classes: {}", error));
                PanelDto::failed(Vec::new(), error)
            }
        }
    }

    /// First contact info row with site defaults for anything missing
    pub async fn contact_info(&self) -> PanelDto<ContactInfo> {
        match self.select::<ContactInfoRow>(ContentTable::ContactInfo).await {
            Ok(rows) => PanelDto::loaded(rows.into_iter().next().unwrap_or_default().into()),
            Err(error) => {
                logger::warn(&format!("Failed to load contact info: {}", error));
                PanelDto::failed(ContactInfo::default(), error)
            }
        }
    }

    /// All panels, fetched concurrently
    pub async fn landing_page(&self) -> LandingPageDto {
        let (artworks, classes, contact_info) =
            futures_util::join!(self.artworks(), self.classes(), self.contact_info());

        LandingPageDto {
            artworks,
            classes,
            contact_info,
        }
    }

    async fn select<T: DeserializeOwned>(&self, table: ContentTable) -> Result<Vec<T>, DomainError> {
        let rows = self
            .content_repository
            .select_all(table, &OrderBy::ascending("id"))
            .await?;

        let total = rows.len();
        let items: Vec<T> = rows
            .into_iter()
            .filter_map(|row| serde_json::from_value(row).ok())
            .collect();

        if items.len() < total {
            logger::warn(&format!(
                "Skipped {} malformed row(s) in {}",
                total - items.len(),
                table.as_str()
            ));
        }

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::content::DEFAULT_EMAIL;
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::collections::HashMap;

    // Mock repository for testing
    struct MockContentRepository {
        tables: HashMap<&'static str, Vec<Value>>,
        failing: Option<ContentTable>,
        orders: std::sync::Mutex<Vec<OrderBy>>,
    }

    impl MockContentRepository {
        fn new(tables: HashMap<&'static str, Vec<Value>>) -> Self {
            Self {
                tables,
                failing: None,
                orders: std::sync::Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ContentRepository for MockContentRepository {
        async fn select_all(&self, table: ContentTable, order: &OrderBy) -> Result<Vec<Value>, DomainError> {
            self.orders.lock().unwrap().push(order.clone());
            if self.failing == Some(table) {
                return Err(DomainError::InternalError("relation does not exist".to_string()));
            }
            Ok(self.tables.get(table.as_str()).cloned().unwrap_or_default())
        }

        async fn insert_one(&self, _table: ContentTable, _row: Value) -> Result<Value, DomainError> {
            Err(DomainError::InternalError("read only".to_string()))
        }
    }

    #[tokio::test]
    async fn panels_load_rows_by_id() {
        let repository = Arc::new(MockContentRepository::new(HashMap::from([
            (
                "artworks",
                vec![
                    json!({"id": 1, "title": "Harbour", "src": "h.jpg", "year": 2020}),
                    json!({"title": "missing id"}),
                ],
            ),
            ("classes", vec![json!({"id": 7, "title": "Watercolor", "description": "Wet on wet"})]),
            ("contact_info", vec![json!({"id": 1, "phone": "555-0100"})]),
        ])));
        let service = ContentService::new(repository.clone());

        let page = service.landing_page().await;

        assert_eq!(page.artworks.content.len(), 1);
        assert_eq!(page.artworks.content[0].year.as_deref(), Some("2020"));
        assert_eq!(page.classes.content[0].title, "Watercolor");
        assert_eq!(page.contact_info.content.phone, "555-0100");
        assert_eq!(page.contact_info.content.email, DEFAULT_EMAIL);
        assert!(page.contact_info.load_error.is_none());
        assert!(
            repository
                .orders
                .lock()
                .unwrap()
                .iter()
                .all(|order| *order == OrderBy::ascending("id"))
        );
    }

    #[tokio::test]
    async fn failed_panel_falls_back_and_keeps_the_error() {
        let mut repository = MockContentRepository::new(HashMap::new());
        repository.failing = Some(ContentTable::ContactInfo);
        let service = ContentService::new(Arc::new(repository));

        let contact = service.contact_info().await;
        assert_eq!(contact.content, ContactInfo::default());
        assert!(contact.load_error.unwrap().contains("relation does not exist"));

        let artworks = service.artworks().await;
        assert!(artworks.content.is_empty());
        assert!(artworks.load_error.is_none());
    }
}

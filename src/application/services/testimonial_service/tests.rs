use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use super::*;
use crate::domain::models::crop::{CropRegion, CroppedFile};
use crate::domain::models::drawing::DrawingFile;
use crate::domain::models::selected_file::SelectedFile;
use crate::domain::models::storage::{ImageTransform, StoredObject};
use crate::domain::models::testimonial::OTHER_COURSE;

#[derive(Debug, Clone, PartialEq)]
enum StorageCall {
    Upload(String),
    PublicUrl(String),
}

/// Object storage that records every call and can fail or stall selected uploads
#[derive(Default)]
struct RecordingStorage {
    calls: Mutex<Vec<StorageCall>>,
    objects: Mutex<HashMap<String, (Bytes, String)>>,
    /// 1-based upload number that fails
    fail_upload: Option<usize>,
    /// Delay per upload number, 1-based
    delays: HashMap<usize, Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl RecordingStorage {
    fn calls(&self) -> Vec<StorageCall> {
        self.calls.lock().unwrap().clone()
    }

    fn upload_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, StorageCall::Upload(_)))
            .count()
    }

    fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStorageRepository for RecordingStorage {
    async fn upload(
        &self,
        path: &str,
        bytes: Bytes,
        content_type: &str,
        options: &UploadOptions,
    ) -> Result<StoredObject, DomainError> {
        assert!(!options.upsert);
        let number = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(StorageCall::Upload(path.to_string()));
            calls
                .iter()
                .filter(|call| matches!(call, StorageCall::Upload(_)))
                .count()
        };

        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);

        if let Some(delay) = self.delays.get(&number) {
            tokio::time::sleep(*delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail_upload == Some(number) {
            return Err(DomainError::UploadError("storage unavailable".to_string()));
        }

        self.objects
            .lock()
            .unwrap()
            .insert(path.to_string(), (bytes, content_type.to_string()));
        Ok(StoredObject {
            path: path.to_string(),
        })
    }

    fn get_public_url(&self, path: &str, _transform: Option<&ImageTransform>) -> Result<String, DomainError> {
        self.calls
            .lock()
            .unwrap()
            .push(StorageCall::PublicUrl(path.to_string()));
        Ok(format!("https://cdn.test/{}", path))
    }
}

/// Content store that records inserts and serves canned rows
#[derive(Default)]
struct RecordingContent {
    rows: Vec<Value>,
    inserts: Mutex<Vec<(ContentTable, Value)>>,
    selects: Mutex<Vec<(ContentTable, OrderBy)>>,
    fail_insert: bool,
}

#[async_trait]
impl ContentRepository for RecordingContent {
    async fn select_all(&self, table: ContentTable, order: &OrderBy) -> Result<Vec<Value>, DomainError> {
        self.selects.lock().unwrap().push((table, order.clone()));
        Ok(self.rows.clone())
    }

    async fn insert_one(&self, table: ContentTable, row: Value) -> Result<Value, DomainError> {
        self.inserts.lock().unwrap().push((table, row.clone()));
        if self.fail_insert {
            return Err(DomainError::InternalError("connection reset".to_string()));
        }

        let mut row = row;
        row["id"] = json!(42);
        row["created_at"] = json!("2024-05-01T10:00:00Z");
        Ok(row)
    }
}

fn service(content: &Arc<RecordingContent>, storage: &Arc<RecordingStorage>) -> TestimonialService {
    TestimonialService::new(content.clone(), storage.clone(), UploadSettings::default())
}

fn cropped(name: &str, index: usize) -> DrawingFile {
    CroppedFile::new(name, vec![index as u8; 4], CropRegion::new(0, 0, 2, 2), index).into()
}

fn draft_with_drawings(names: &[&str]) -> TestimonialDraft {
    TestimonialDraft {
        name: " Mia Chen ".to_string(),
        quote: "Loved every class".to_string(),
        drawing_files: names
            .iter()
            .enumerate()
            .map(|(index, name)| cropped(name, index))
            .collect(),
        drawing_titles: names.iter().map(|name| format!("Title {}", name)).collect(),
        ..TestimonialDraft::default()
    }
}

#[tokio::test]
async fn invalid_titles_make_no_network_calls() {
    let content = Arc::new(RecordingContent::default());
    let storage = Arc::new(RecordingStorage::default());
    let service = service(&content, &storage);

    let mut mismatched = draft_with_drawings(&["a.jpg", "b.jpg"]);
    mismatched.drawing_titles.pop();
    let mut blank = draft_with_drawings(&["a.jpg", "b.jpg"]);
    blank.drawing_titles[1] = "   ".to_string();
    let mut other_without_course = draft_with_drawings(&[]);
    other_without_course.course = OTHER_COURSE.to_string();

    for draft in [mismatched, blank, other_without_course] {
        assert!(matches!(
            service.submit(&draft).await,
            Err(DomainError::ValidationError(_))
        ));
    }

    assert!(storage.calls().is_empty());
    assert!(content.inserts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn drawing_urls_follow_selection_order_despite_latency() {
    let content = Arc::new(RecordingContent::default());
    // Upload 2 is drawing A, upload 3 is drawing B; A is much slower
    let storage = Arc::new(RecordingStorage {
        delays: HashMap::from([(2, Duration::from_millis(60)), (3, Duration::from_millis(1))]),
        ..RecordingStorage::default()
    });
    let service = service(&content, &storage);

    let mut draft = draft_with_drawings(&["A.jpg", "B.jpg"]);
    draft.profile_image = Some(SelectedFile::new("me.png", None, vec![1, 2, 3]));

    let persisted = service.submit(&draft).await.unwrap();

    assert_eq!(persisted.id, 42);
    assert_eq!(persisted.name, "Mia Chen");
    assert_eq!(persisted.course, "Watercolor");
    assert_eq!(persisted.drawing_urls.len(), 2);
    assert!(persisted.drawing_urls[0].contains("-A.jpg"));
    assert!(persisted.drawing_urls[1].contains("-B.jpg"));
    assert_eq!(persisted.drawing_titles, vec!["Title A.jpg", "Title B.jpg"]);

    let avatar_url = persisted.avatar_url.unwrap();
    assert!(avatar_url.starts_with("https://cdn.test/avatars/"));
    assert!(persisted.drawing_urls[0].starts_with("https://cdn.test/drawings/"));

    let uploads: Vec<String> = storage
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            StorageCall::Upload(path) => Some(path),
            StorageCall::PublicUrl(_) => None,
        })
        .collect();
    assert_eq!(uploads.len(), 3);
    assert!(uploads[0].ends_with("-me.png"));

    let objects = storage.objects.lock().unwrap();
    assert_eq!(objects[&uploads[1]].1, "image/jpeg");

    let inserts = content.inserts.lock().unwrap();
    assert_eq!(inserts.len(), 1);
    assert_eq!(inserts[0].0, ContentTable::Testimonials);
}

#[tokio::test]
async fn uploads_run_one_at_a_time() {
    let content = Arc::new(RecordingContent::default());
    let storage = Arc::new(RecordingStorage {
        delays: HashMap::from([
            (1, Duration::from_millis(20)),
            (2, Duration::from_millis(20)),
            (3, Duration::from_millis(20)),
        ]),
        ..RecordingStorage::default()
    });
    let service = service(&content, &storage);

    let draft = draft_with_drawings(&["one.jpg", "two.jpg", "three.jpg"]);
    service.submit(&draft).await.unwrap();

    assert_eq!(storage.max_in_flight(), 1);

    let calls = storage.calls();
    assert_eq!(calls.len(), 6);
    for pair in calls.chunks(2) {
        match pair {
            [StorageCall::Upload(uploaded), StorageCall::PublicUrl(resolved)] => {
                assert_eq!(uploaded, resolved);
            }
            other => panic!("expected upload then public url, got {:?}", other),
        }
    }
}

#[tokio::test]
async fn failed_upload_aborts_before_persisting_and_keeps_earlier_objects() {
    let content = Arc::new(RecordingContent::default());
    let storage = Arc::new(RecordingStorage {
        fail_upload: Some(2),
        ..RecordingStorage::default()
    });
    let service = service(&content, &storage);

    let draft = draft_with_drawings(&["one.jpg", "two.jpg", "three.jpg"]);
    let result = service.submit(&draft).await;

    assert!(matches!(result, Err(DomainError::UploadError(_))));
    assert_eq!(storage.upload_count(), 2);
    assert!(content.inserts.lock().unwrap().is_empty());

    let objects = storage.objects.lock().unwrap();
    assert_eq!(objects.len(), 1);
    assert!(objects.keys().all(|path| path.ends_with("-one.jpg")));
}

#[tokio::test]
async fn insert_failure_becomes_persist_error() {
    let content = Arc::new(RecordingContent {
        fail_insert: true,
        ..RecordingContent::default()
    });
    let storage = Arc::new(RecordingStorage::default());
    let service = service(&content, &storage);

    let result = service.submit(&draft_with_drawings(&["a.jpg"])).await;

    assert!(matches!(result, Err(DomainError::PersistError(_))));
    assert_eq!(storage.objects.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn other_course_persists_the_custom_text() {
    let content = Arc::new(RecordingContent::default());
    let storage = Arc::new(RecordingStorage::default());
    let service = service(&content, &storage);

    let mut draft = draft_with_drawings(&[]);
    draft.course = OTHER_COURSE.to_string();
    draft.custom_course = " Charcoal ".to_string();
    draft.stars = 4;

    let persisted = service.submit(&draft).await.unwrap();
    assert_eq!(persisted.course, "Charcoal");
    assert_eq!(persisted.stars, 4);
    assert!(persisted.avatar_url.is_none());
    assert!(persisted.drawing_urls.is_empty());
    assert!(storage.calls().is_empty());
}

#[tokio::test]
async fn get_all_orders_newest_first_and_skips_bad_rows() {
    let content = Arc::new(RecordingContent {
        rows: vec![
            json!({
                "id": 2, "name": "Leo", "quote": "Great", "course": "Oil Pastel", "stars": 5,
                "avatar_url": null, "drawing_urls": ["u1", "u2"], "drawing_titles": ["Sun"],
                "created_at": "2024-05-02T00:00:00Z"
            }),
            json!({ "id": "broken" }),
        ],
        ..RecordingContent::default()
    });
    let storage = Arc::new(RecordingStorage::default());
    let service = service(&content, &storage);

    let testimonials = service.get_all().await.unwrap();
    assert_eq!(testimonials.len(), 1);
    assert_eq!(
        content.selects.lock().unwrap()[0],
        (ContentTable::Testimonials, OrderBy::descending("created_at"))
    );

    let gallery = service.gallery().await.unwrap();
    assert_eq!(gallery.len(), 2);
    assert_eq!(gallery[0].title, "Sun");
    assert_eq!(gallery[1].title, "Drawing 2");
    assert_eq!(gallery[1].student_name, "Leo");
}

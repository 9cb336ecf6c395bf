use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};

use crate::domain::errors::DomainError;
use crate::domain::repositories::content_repository::{ContentRepository, ContentTable, OrderBy};

#[derive(Default)]
struct TableData {
    rows: Vec<Value>,
    next_id: i64,
}

/// In-process content store: rows live in memory, ids and `created_at` are
/// assigned on insert the way the hosted store does
#[derive(Default)]
pub struct MemoryContentRepository {
    tables: Mutex<HashMap<ContentTable, TableData>>,
}

impl MemoryContentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert rows as-is, bypassing id assignment for rows that carry one
    pub fn seed(&self, table: ContentTable, rows: Vec<Value>) -> Result<(), DomainError> {
        let mut tables = self.lock()?;
        let data = tables.entry(table).or_default();
        for row in rows {
            if let Some(id) = row.get("id").and_then(Value::as_i64) {
                data.next_id = data.next_id.max(id);
            }
            data.rows.push(row);
        }
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<ContentTable, TableData>>, DomainError> {
        self.tables
            .lock()
            .map_err(|_| DomainError::InternalError("Content store lock poisoned".to_string()))
    }
}

fn compare_values(left: Option<&Value>, right: Option<&Value>) -> Ordering {
    match (left, right) {
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), _) => Ordering::Less,
        (_, None | Some(Value::Null)) => Ordering::Greater,
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(a), Some(b)) => a.to_string().cmp(&b.to_string()),
    }
}

#[async_trait]
impl ContentRepository for MemoryContentRepository {
    async fn select_all(&self, table: ContentTable, order: &OrderBy) -> Result<Vec<Value>, DomainError> {
        let tables = self.lock()?;
        let mut rows = tables
            .get(&table)
            .map(|data| data.rows.clone())
            .unwrap_or_default();

        rows.sort_by(|a, b| {
            let ordering = compare_values(a.get(&order.column), b.get(&order.column));
            if order.ascending {
                ordering
            } else {
                ordering.reverse()
            }
        });

        tracing::debug!("Selected {} rows from {}", rows.len(), table.as_str());
        Ok(rows)
    }

    async fn insert_one(&self, table: ContentTable, row: Value) -> Result<Value, DomainError> {
        let Value::Object(fields) = row else {
            return Err(DomainError::PersistError(format!(
                "Rows of {} must be JSON objects",
                table.as_str()
            )));
        };

        let mut tables = self.lock()?;
        let data = tables.entry(table).or_default();
        data.next_id += 1;

        let mut stored = Map::new();
        stored.insert("id".to_string(), Value::from(data.next_id));
        stored.insert(
            "created_at".to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );
        stored.extend(fields);

        let stored = Value::Object(stored);
        data.rows.push(stored.clone());
        tracing::debug!("Inserted row {} into {}", data.next_id, table.as_str());
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn insert_assigns_id_and_timestamp() {
        let repository = MemoryContentRepository::new();
        let first = repository
            .insert_one(ContentTable::Testimonials, json!({"name": "A"}))
            .await
            .unwrap();
        let second = repository
            .insert_one(ContentTable::Testimonials, json!({"name": "B"}))
            .await
            .unwrap();

        assert_eq!(first["id"], 1);
        assert_eq!(second["id"], 2);
        assert!(first["created_at"].as_str().is_some());
        assert_eq!(second["name"], "B");
    }

    #[tokio::test]
    async fn select_orders_by_column() {
        let repository = MemoryContentRepository::new();
        repository
            .seed(
                ContentTable::Classes,
                vec![json!({"id": 3}), json!({"id": 1}), json!({"id": 2})],
            )
            .unwrap();

        let ascending = repository
            .select_all(ContentTable::Classes, &OrderBy::ascending("id"))
            .await
            .unwrap();
        let ids: Vec<i64> = ascending.iter().filter_map(|row| row["id"].as_i64()).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        let descending = repository
            .select_all(ContentTable::Classes, &OrderBy::descending("id"))
            .await
            .unwrap();
        assert_eq!(descending[0]["id"], 3);

        let inserted = repository
            .insert_one(ContentTable::Classes, json!({"title": "Ink"}))
            .await
            .unwrap();
        assert_eq!(inserted["id"], 4);
    }

    #[tokio::test]
    async fn rejects_non_object_rows() {
        let repository = MemoryContentRepository::new();
        assert!(matches!(
            repository.insert_one(ContentTable::Artworks, json!([1, 2])).await,
            Err(DomainError::PersistError(_))
        ));
    }
}

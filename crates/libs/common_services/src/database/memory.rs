use crate::database::{
    DbError, Direction, Document, DocumentPath, DocumentStore, Fields, ListQuery, Write,
};
use async_trait::async_trait;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

type Collections = HashMap<String, BTreeMap<String, Fields>>;

/// Process-local [`DocumentStore`]. Mirrors the Firestore semantics the services rely on:
/// ordered listing skips documents without the order field, array transforms require the
/// document to exist, and commits are all-or-nothing.
#[derive(Clone, Default)]
pub struct MemoryDocumentStore {
    collections: Arc<RwLock<Collections>>,
}

impl MemoryDocumentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn apply(collections: &mut Collections, write: Write) -> Result<(), DbError> {
    match write {
        Write::Set { path, fields } => {
            collections
                .entry(path.collection().to_owned())
                .or_default()
                .insert(path.id().to_owned(), fields);
        }
        Write::Merge { path, fields } => {
            let doc = collections
                .entry(path.collection().to_owned())
                .or_default()
                .entry(path.id().to_owned())
                .or_default();
            doc.extend(fields);
        }
        Write::Update { path, fields } => {
            existing_mut(collections, &path)?.extend(fields);
        }
        Write::Delete { path } => {
            if let Some(docs) = collections.get_mut(path.collection()) {
                docs.remove(path.id());
            }
        }
        Write::ArrayUnion { path, field, value } => {
            let doc = existing_mut(collections, &path)?;
            let array = array_field(doc, &field);
            if !array.contains(&value) {
                array.push(value);
            }
        }
        Write::ArrayRemove { path, field, value } => {
            let doc = existing_mut(collections, &path)?;
            array_field(doc, &field).retain(|v| v != &value);
        }
    }
    Ok(())
}

fn existing_mut<'a>(
    collections: &'a mut Collections,
    path: &DocumentPath,
) -> Result<&'a mut Fields, DbError> {
    collections
        .get_mut(path.collection())
        .and_then(|docs| docs.get_mut(path.id()))
        .ok_or_else(|| DbError::NotFound(path.to_string()))
}

/// Non-array values are replaced by an empty array, as Firestore does for array transforms.
fn array_field<'a>(doc: &'a mut Fields, field: &str) -> &'a mut Vec<Value> {
    let slot = doc
        .entry(field.to_owned())
        .or_insert_with(|| Value::Array(vec![]));
    if !slot.is_array() {
        *slot = Value::Array(vec![]);
    }
    match slot {
        Value::Array(values) => values,
        _ => unreachable!("slot was just made an array"),
    }
}

const fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Orders values the way Firestore orders mixed-type fields.
pub(crate) fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            match (x.as_i64(), y.as_i64()) {
                (Some(x), Some(y)) => x.cmp(&y),
                _ => {
                    let x = x.as_f64().unwrap_or(f64::NAN);
                    let y = y.as_f64().unwrap_or(f64::NAN);
                    x.partial_cmp(&y).unwrap_or(Ordering::Equal)
                }
            }
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Array(x), Value::Array(y)) => x
            .iter()
            .zip(y)
            .map(|(a, b)| compare_values(a, b))
            .find(|o| o.is_ne())
            .unwrap_or_else(|| x.len().cmp(&y.len())),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>, DbError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(path.collection())
            .and_then(|docs| docs.get(path.id()))
            .map(|fields| Document {
                id: path.id().to_owned(),
                fields: fields.clone(),
            }))
    }

    async fn set(&self, path: &DocumentPath, fields: Fields) -> Result<(), DbError> {
        self.commit(vec![Write::Set {
            path: path.clone(),
            fields,
        }])
        .await
    }

    async fn merge(&self, path: &DocumentPath, fields: Fields) -> Result<(), DbError> {
        self.commit(vec![Write::Merge {
            path: path.clone(),
            fields,
        }])
        .await
    }

    async fn delete(&self, path: &DocumentPath) -> Result<(), DbError> {
        self.commit(vec![Write::Delete { path: path.clone() }]).await
    }

    async fn list(&self, collection: &str, query: &ListQuery) -> Result<Vec<Document>, DbError> {
        let collections = self.collections.read().await;
        let Some(docs) = collections.get(collection) else {
            return Ok(vec![]);
        };

        let mut documents: Vec<Document> = docs
            .iter()
            .filter(|(_, fields)| {
                query
                    .order_by
                    .as_ref()
                    .is_none_or(|field| fields.contains_key(field))
            })
            .map(|(id, fields)| Document {
                id: id.clone(),
                fields: fields.clone(),
            })
            .collect();

        if let Some(field) = &query.order_by {
            documents.sort_by(|a, b| {
                let ordering = compare_values(&a.fields[field], &b.fields[field]);
                match query.direction {
                    Direction::Ascending => ordering,
                    Direction::Descending => ordering.reverse(),
                }
            });
        }
        if let Some(limit) = query.limit {
            documents.truncate(limit);
        }
        Ok(documents)
    }

    async fn commit(&self, writes: Vec<Write>) -> Result<(), DbError> {
        let mut collections = self.collections.write().await;
        let mut staged = collections.clone();
        for write in writes {
            apply(&mut staged, write)?;
        }
        *collections = staged;
        Ok(())
    }
}

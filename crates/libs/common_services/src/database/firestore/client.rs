use super::credentials::{AccessTokenSource, ServiceAccountKey};
use super::value::{decode_fields, encode_fields, encode_value, field_path};
use crate::database::{
    DbError, Direction, Document, DocumentPath, DocumentStore, Fields, ListQuery, Write,
};
use app_state::FirebaseSettings;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, info, instrument};

const FIRESTORE_URL: &str = "https://firestore.googleapis.com/v1";

#[derive(Debug, Deserialize)]
struct WireDocument {
    name: String,
    #[serde(default)]
    fields: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RunQueryRow {
    document: Option<WireDocument>,
}

impl TryFrom<WireDocument> for Document {
    type Error = DbError;

    fn try_from(wire: WireDocument) -> Result<Self, Self::Error> {
        let id = wire
            .name
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_owned();
        let fields = match wire.fields {
            Some(fields) => decode_fields(&fields).map_err(|e| match e {
                DbError::Malformed { message, .. } => DbError::Malformed {
                    path: wire.name.clone(),
                    message,
                },
                other => other,
            })?,
            None => Fields::new(),
        };
        Ok(Self { id, fields })
    }
}

/// [`DocumentStore`] backed by a Firestore database (or the local emulator).
#[derive(Clone)]
pub struct FirestoreClient {
    http_client: Client,
    base_url: String,
    /// `projects/{project}/databases/(default)`
    database: String,
    tokens: Arc<AccessTokenSource>,
}

impl FirestoreClient {
    #[must_use]
    pub fn new(
        http_client: Client,
        base_url: impl Into<String>,
        project_id: &str,
        tokens: AccessTokenSource,
    ) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
            database: format!("projects/{project_id}/databases/(default)"),
            tokens: Arc::new(tokens),
        }
    }

    /// Builds a client from settings, preferring the emulator, then inline credentials,
    /// then the credentials file.
    pub async fn from_settings(
        http_client: Client,
        settings: &FirebaseSettings,
    ) -> Result<Self, DbError> {
        if let Some(host) = &settings.emulator_host {
            info!("Using Firestore emulator at {host}");
            return Ok(Self::new(
                http_client,
                format!("http://{host}/v1"),
                &settings.project_id,
                AccessTokenSource::Emulator,
            ));
        }

        let key = match (&settings.credentials_json, &settings.credentials_path) {
            (Some(json), _) => ServiceAccountKey::from_json(json)?,
            (None, Some(path)) => ServiceAccountKey::from_file(path).await?,
            (None, None) => {
                return Err(DbError::Credentials(
                    "no service account configured (firebase.credentials_json or credentials_path)"
                        .to_owned(),
                ));
            }
        };
        info!("Using Firestore project {} as {}", settings.project_id, key.client_email);
        let tokens = AccessTokenSource::service_account(http_client.clone(), key);
        Ok(Self::new(http_client, FIRESTORE_URL, &settings.project_id, tokens))
    }

    fn document_name(&self, path: &DocumentPath) -> String {
        format!("{}/documents/{path}", self.database)
    }

    fn url(&self, resource: &str) -> String {
        format!("{}/{resource}", self.base_url)
    }

    async fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder, DbError> {
        Ok(request.bearer_auth(self.tokens.token().await?))
    }

    fn encode_write(&self, write: &Write) -> Value {
        let name = self.document_name(write.path());
        match write {
            Write::Set { fields, .. } => json!({
                "update": { "name": name, "fields": encode_fields(fields) },
            }),
            Write::Merge { fields, .. } => json!({
                "update": { "name": name, "fields": encode_fields(fields) },
                "updateMask": { "fieldPaths": update_mask(fields) },
            }),
            Write::Update { fields, .. } => json!({
                "update": { "name": name, "fields": encode_fields(fields) },
                "updateMask": { "fieldPaths": update_mask(fields) },
                "currentDocument": { "exists": true },
            }),
            Write::Delete { .. } => json!({ "delete": name }),
            Write::ArrayUnion { field, value, .. } => {
                array_transform(&name, field, "appendMissingElements", value)
            }
            Write::ArrayRemove { field, value, .. } => {
                array_transform(&name, field, "removeAllFromArray", value)
            }
        }
    }
}

fn update_mask(fields: &Fields) -> Vec<String> {
    fields.keys().map(|k| field_path(k)).collect()
}

/// A transform-only write: nothing but `field` changes and the document must exist.
fn array_transform(name: &str, field: &str, kind: &str, value: &Value) -> Value {
    let mut transform = json!({ "fieldPath": field_path(field) });
    transform[kind] = json!({ "values": [encode_value(value)] });
    json!({
        "update": { "name": name, "fields": {} },
        "updateMask": { "fieldPaths": [] },
        "updateTransforms": [transform],
        "currentDocument": { "exists": true },
    })
}

/// Turns non-2xx responses into errors, with 404 as [`DbError::NotFound`].
async fn check(response: Response, context: &str) -> Result<Response, DbError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    if status == StatusCode::NOT_FOUND {
        return Err(DbError::NotFound(context.to_owned()));
    }
    Err(DbError::Upstream {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl DocumentStore for FirestoreClient {
    #[instrument(skip(self), fields(path = %path))]
    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>, DbError> {
        let request = self
            .authorized(self.http_client.get(self.url(&self.document_name(path))))
            .await?;
        let response = request.send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let wire: WireDocument = check(response, &path.to_string()).await?.json().await?;
        Ok(Some(wire.try_into()?))
    }

    #[instrument(skip(self, fields), fields(path = %path))]
    async fn set(&self, path: &DocumentPath, fields: Fields) -> Result<(), DbError> {
        let request = self
            .authorized(self.http_client.patch(self.url(&self.document_name(path))))
            .await?
            .json(&json!({ "fields": encode_fields(&fields) }));
        check(request.send().await?, &path.to_string()).await?;
        Ok(())
    }

    #[instrument(skip(self, fields), fields(path = %path))]
    async fn merge(&self, path: &DocumentPath, fields: Fields) -> Result<(), DbError> {
        let mask: Vec<(&str, String)> = update_mask(&fields)
            .into_iter()
            .map(|f| ("updateMask.fieldPaths", f))
            .collect();
        let request = self
            .authorized(self.http_client.patch(self.url(&self.document_name(path))))
            .await?
            .query(&mask)
            .json(&json!({ "fields": encode_fields(&fields) }));
        check(request.send().await?, &path.to_string()).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(path = %path))]
    async fn delete(&self, path: &DocumentPath) -> Result<(), DbError> {
        let request = self
            .authorized(self.http_client.delete(self.url(&self.document_name(path))))
            .await?;
        let response = request.send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        check(response, &path.to_string()).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list(&self, collection: &str, query: &ListQuery) -> Result<Vec<Document>, DbError> {
        let (parent, collection_id) = match collection.rsplit_once('/') {
            Some((parent, id)) => (format!("{}/documents/{parent}", self.database), id),
            None => (format!("{}/documents", self.database), collection),
        };

        let mut structured_query = json!({ "from": [{ "collectionId": collection_id }] });
        if let Some(field) = &query.order_by {
            let direction = match query.direction {
                Direction::Ascending => "ASCENDING",
                Direction::Descending => "DESCENDING",
            };
            structured_query["orderBy"] =
                json!([{ "field": { "fieldPath": field_path(field) }, "direction": direction }]);
        }
        if let Some(limit) = query.limit {
            structured_query["limit"] = json!(limit);
        }

        let request = self
            .authorized(
                self.http_client
                    .post(self.url(&format!("{parent}:runQuery"))),
            )
            .await?
            .json(&json!({ "structuredQuery": structured_query }));
        let rows: Vec<RunQueryRow> = check(request.send().await?, collection)
            .await?
            .json()
            .await?;

        let documents = rows
            .into_iter()
            .filter_map(|row| row.document)
            .map(Document::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        debug!("Listed {} documents from {collection}", documents.len());
        Ok(documents)
    }

    #[instrument(skip(self, writes), fields(writes = writes.len()))]
    async fn commit(&self, writes: Vec<Write>) -> Result<(), DbError> {
        if writes.is_empty() {
            return Ok(());
        }
        let context = writes
            .iter()
            .map(|w| w.path().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let body = json!({
            "writes": writes.iter().map(|w| self.encode_write(w)).collect::<Vec<_>>(),
        });
        let request = self
            .authorized(
                self.http_client
                    .post(self.url(&format!("{}/documents:commit", self.database))),
            )
            .await?
            .json(&body);
        check(request.send().await?, &context).await?;
        Ok(())
    }
}

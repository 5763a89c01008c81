use crate::database::app_user::{AppUser, UserRole};
use crate::database::{DbError, DocumentPath, DocumentStore, Fields};
use serde_json::Value;
use tracing::debug;

pub struct UserStore;

impl UserStore {
    pub const COLLECTION: &'static str = "users";

    #[must_use]
    pub fn path(uid: &str) -> DocumentPath {
        DocumentPath::new(Self::COLLECTION, uid)
    }

    /// The user's record. The role falls back to visitor when missing or unrecognised.
    pub async fn find_by_id(
        store: &dyn DocumentStore,
        uid: &str,
    ) -> Result<Option<AppUser>, DbError> {
        let Some(doc) = store.get(&Self::path(uid)).await? else {
            return Ok(None);
        };
        let text = |key: &str| doc.fields.get(key).and_then(Value::as_str).map(ToOwned::to_owned);
        Ok(Some(AppUser {
            role: role_of(&doc.fields),
            username: text("username"),
            email: text("email"),
        }))
    }

    /// Resolves the authorization role for a subject. Users without a record are visitors.
    pub async fn find_role(store: &dyn DocumentStore, uid: &str) -> Result<UserRole, DbError> {
        let role = Self::find_by_id(store, uid)
            .await?
            .map(|user| user.role)
            .unwrap_or_default();
        debug!("Resolved role {role} for {uid}");
        Ok(role)
    }

    /// Merge-writes the role, creating the user record if needed.
    pub async fn set_role(
        store: &dyn DocumentStore,
        uid: &str,
        role: UserRole,
    ) -> Result<(), DbError> {
        let mut fields = Fields::new();
        fields.insert("role".to_owned(), Value::from(role.as_str()));
        store.merge(&Self::path(uid), fields).await
    }
}

fn role_of(fields: &Fields) -> UserRole {
    fields
        .get("role")
        .and_then(Value::as_str)
        .and_then(|role| role.parse().ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryDocumentStore;
    use serde_json::json;

    #[tokio::test]
    async fn unknown_users_are_visitors() -> Result<(), DbError> {
        let store = MemoryDocumentStore::new();
        assert_eq!(UserStore::find_role(&store, "nobody").await?, UserRole::Visitor);
        Ok(())
    }

    #[tokio::test]
    async fn missing_or_malformed_role_is_visitor() -> Result<(), DbError> {
        // ARRANGE
        let store = MemoryDocumentStore::new();
        let as_fields = |v: Value| match v {
            Value::Object(map) => map,
            _ => Fields::new(),
        };
        store
            .set(&UserStore::path("no-role"), as_fields(json!({ "username": "ana" })))
            .await?;
        store
            .set(&UserStore::path("bad-role"), as_fields(json!({ "role": 7 })))
            .await?;
        store
            .set(&UserStore::path("weird-role"), as_fields(json!({ "role": "superuser" })))
            .await?;

        // ACT & ASSERT
        for uid in ["no-role", "bad-role", "weird-role"] {
            assert_eq!(UserStore::find_role(&store, uid).await?, UserRole::Visitor);
        }
        let user = UserStore::find_by_id(&store, "no-role").await?.expect("record exists");
        assert_eq!(user.username.as_deref(), Some("ana"));
        Ok(())
    }

    #[tokio::test]
    async fn set_role_keeps_other_fields() -> Result<(), DbError> {
        let store = MemoryDocumentStore::new();
        let mut fields = Fields::new();
        fields.insert("username".into(), json!("ben"));
        store.set(&UserStore::path("u1"), fields).await?;

        UserStore::set_role(&store, "u1", UserRole::Editor).await?;

        let user = UserStore::find_by_id(&store, "u1").await?.expect("record exists");
        assert_eq!(user.role, UserRole::Editor);
        assert_eq!(user.username.as_deref(), Some("ben"));
        Ok(())
    }
}

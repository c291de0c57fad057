/*
 * Responsibility
 * - Entity 型ごとの CRUD (GetByID / Get / GetByQuery / GetOneByQuery / Create / Update / Delete)
 * - id と timestamp の採番、soft delete、部分更新 (patch) をここで一元化
 * - RecordStore の JSON record <-> Entity の変換
 */
use std::marker::PhantomData;
use std::sync::Arc;

use chrono::Utc;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::repos::entities::Entity;
use crate::repos::error::RepoError;
use crate::repos::store::{Filter, Page, RecordStore};

/// Fields a caller-supplied patch may never overwrite.
const PROTECTED_FIELDS: &[&str] = &["id", "created_at", "updated_at", "deleted_at"];

pub struct Repo<E> {
    store: Arc<dyn RecordStore>,
    _entity: PhantomData<E>,
}

impl<E: Entity> Repo<E> {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    pub async fn get(&self, id: Uuid) -> Result<E, RepoError> {
        self.find_one(Filter::by_id(id)).await
    }

    pub async fn list(&self, page: Option<Page>) -> Result<Vec<E>, RepoError> {
        self.find(Filter::new(), page).await
    }

    pub async fn find(&self, filter: Filter, page: Option<Page>) -> Result<Vec<E>, RepoError> {
        let records = self.store.select(&E::table(), &filter, page).await?;

        records
            .into_iter()
            .map(|record| serde_json::from_value(record).map_err(RepoError::from))
            .collect()
    }

    pub async fn find_optional(&self, filter: Filter) -> Result<Option<E>, RepoError> {
        let mut found = self.find(filter, Some(Page::first())).await?;
        Ok(found.pop())
    }

    pub async fn find_one(&self, filter: Filter) -> Result<E, RepoError> {
        self.find_optional(filter)
            .await?
            .ok_or(RepoError::NotFound(E::SCOPE))
    }

    /// Inserts `entity`, assigning an id when it has none and stamping both timestamps.
    pub async fn create(&self, entity: &E) -> Result<E, RepoError> {
        let mut record = serde_json::to_value(entity)?;
        let now = serde_json::to_value(Utc::now())?;

        if let Value::Object(fields) = &mut record {
            let has_id = fields
                .get("id")
                .and_then(Value::as_str)
                .and_then(|raw| Uuid::parse_str(raw).ok())
                .is_some_and(|id| !id.is_nil());
            if !has_id {
                fields.insert("id".into(), Value::String(Uuid::new_v4().to_string()));
            }
            fields.insert("created_at".into(), now.clone());
            fields.insert("updated_at".into(), now);
        }

        let stored = self.store.insert(&E::table(), record).await?;
        Ok(serde_json::from_value(stored)?)
    }

    /// Full replace of the stored row with `entity`.
    pub async fn update(&self, entity: &E) -> Result<E, RepoError> {
        let mut record = serde_json::to_value(entity)?;
        if let Value::Object(fields) = &mut record {
            fields.insert("updated_at".into(), serde_json::to_value(Utc::now())?);
        }

        let stored = self
            .store
            .update(&E::table(), entity.id(), record)
            .await?
            .ok_or(RepoError::NotFound(E::SCOPE))?;

        Ok(serde_json::from_value(stored)?)
    }

    /// Merges top-level `changes` onto the live record `id` and stores the result.
    pub async fn patch(&self, id: Uuid, changes: Map<String, Value>) -> Result<E, RepoError> {
        let current = self.get(id).await?;
        let mut record = serde_json::to_value(&current)?;

        if let Value::Object(fields) = &mut record {
            for (key, value) in changes {
                if PROTECTED_FIELDS.contains(&key.as_str()) {
                    continue;
                }
                fields.insert(key, value);
            }
        }

        let merged: E = serde_json::from_value(record).map_err(RepoError::Invalid)?;
        self.update(&merged).await
    }

    /// Soft delete for entities with `deleted_at`, hard delete otherwise.
    pub async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        if E::SOFT_DELETE {
            return self.retire(id, None).await;
        }

        if self.store.delete(&E::table(), id).await? {
            Ok(())
        } else {
            Err(RepoError::NotFound(E::SCOPE))
        }
    }

    /// Stamps `deleted_at` on the live record `id`, replacing `meta` when given.
    pub async fn retire(&self, id: Uuid, meta: Option<Value>) -> Result<(), RepoError> {
        let current = self.get(id).await?;
        let mut record = serde_json::to_value(&current)?;

        if let Value::Object(fields) = &mut record {
            fields.insert("deleted_at".into(), serde_json::to_value(Utc::now())?);
            if let Some(meta) = meta {
                fields.insert("meta".into(), meta);
            }
        }

        let retired: E = serde_json::from_value(record)?;
        self.update(&retired).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::entities::{Account, RolePermission, User};
    use crate::repos::memory::MemoryStore;

    fn repo<E: Entity>(store: &Arc<MemoryStore>) -> Repo<E> {
        Repo::new(store.clone())
    }

    #[tokio::test]
    async fn create_assigns_id_and_timestamps() {
        let store = Arc::new(MemoryStore::default());
        let accounts = repo::<Account>(&store);

        let created = accounts
            .create(&Account {
                name: "Kitchen".into(),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(!created.id.is_nil());
        assert_eq!(created.created_at, created.updated_at);
        assert_eq!(accounts.get(created.id).await.unwrap().name, "Kitchen");
    }

    #[tokio::test]
    async fn patch_keeps_identity_fields() {
        let store = Arc::new(MemoryStore::default());
        let accounts = repo::<Account>(&store);
        let created = accounts
            .create(&Account {
                name: "Old".into(),
                ..Default::default()
            })
            .await
            .unwrap();

        let mut changes = Map::new();
        changes.insert("id".into(), Value::String(Uuid::new_v4().to_string()));
        changes.insert("name".into(), Value::String("New".into()));
        let patched = accounts.patch(created.id, changes).await.unwrap();

        assert_eq!(patched.id, created.id);
        assert_eq!(patched.name, "New");
        assert_eq!(patched.created_at, created.created_at);
    }

    #[tokio::test]
    async fn patch_with_mistyped_field_is_invalid() {
        let store = Arc::new(MemoryStore::default());
        let users = repo::<User>(&store);
        let created = users.create(&User::default()).await.unwrap();

        let mut changes = Map::new();
        changes.insert("owner".into(), Value::String("yes".into()));

        assert!(matches!(
            users.patch(created.id, changes).await,
            Err(RepoError::Invalid(_))
        ));
    }

    #[tokio::test]
    async fn patch_cannot_soft_delete() {
        let store = Arc::new(MemoryStore::default());
        let users = repo::<User>(&store);
        let created = users.create(&User::default()).await.unwrap();

        let mut changes = Map::new();
        changes.insert("deleted_at".into(), serde_json::to_value(Utc::now()).unwrap());
        users.patch(created.id, changes).await.unwrap();

        assert!(users.get(created.id).await.is_ok());
    }

    #[tokio::test]
    async fn retire_records_the_cause() {
        let store = Arc::new(MemoryStore::default());
        let users = repo::<User>(&store);
        let created = users.create(&User::default()).await.unwrap();

        users
            .retire(created.id, Some(serde_json::json!({ "delete_cause": "moved" })))
            .await
            .unwrap();

        assert!(users.get(created.id).await.is_err());
        let row = &store.rows("users")[0];
        assert_eq!(row["meta"]["delete_cause"], "moved");
        assert!(row["deleted_at"].is_string());
    }

    #[tokio::test]
    async fn soft_deleted_rows_disappear_from_reads() {
        let store = Arc::new(MemoryStore::default());
        let accounts = repo::<Account>(&store);
        let created = accounts.create(&Account::default()).await.unwrap();

        accounts.delete(created.id).await.unwrap();

        assert!(matches!(
            accounts.get(created.id).await,
            Err(RepoError::NotFound("account"))
        ));
        assert!(accounts.list(None).await.unwrap().is_empty());
        assert!(matches!(
            accounts.delete(created.id).await,
            Err(RepoError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn join_rows_are_removed_outright() {
        let store = Arc::new(MemoryStore::default());
        let links = repo::<RolePermission>(&store);
        let link = links
            .create(&RolePermission {
                role_id: Uuid::new_v4(),
                permission_id: Uuid::new_v4(),
                ..Default::default()
            })
            .await
            .unwrap();

        links.delete(link.id).await.unwrap();

        assert!(store.rows("role_permissions").is_empty());
    }

    #[tokio::test]
    async fn find_filters_on_columns_and_pages() {
        let store = Arc::new(MemoryStore::default());
        let users = repo::<User>(&store);
        let account_id = Uuid::new_v4();
        for n in 0..3 {
            users
                .create(&User {
                    account_id: Some(account_id),
                    first_name: format!("member-{n}"),
                    ..Default::default()
                })
                .await
                .unwrap();
        }
        users.create(&User::default()).await.unwrap();

        let members = users
            .find(Filter::new().eq("account_id", account_id), None)
            .await
            .unwrap();
        assert_eq!(members.len(), 3);

        let second_page = users
            .find(
                Filter::new().eq("account_id", account_id),
                Some(Page::new(2, 2)),
            )
            .await
            .unwrap();
        assert_eq!(second_page.len(), 1);
    }
}

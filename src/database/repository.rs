use serde_json::{Map, Value};

use crate::database::entity::EntitySchema;
use crate::database::manager::DatabaseError;
use crate::database::patch::apply_patch;
use crate::database::query_builder::QueryBuilder;
use crate::database::record::{EntityId, Record, RecordError};
use crate::database::store::RowStore;

/// CRUD over one allow-listed entity, generic over the row store
pub struct Repository<'s, S: RowStore + ?Sized> {
    entity: &'static EntitySchema,
    store: &'s S,
}

impl<'s, S: RowStore + ?Sized> Repository<'s, S> {
    pub fn new(entity: &'static EntitySchema, store: &'s S) -> Self {
        Self { entity, store }
    }

    /// Resolve an entity by its route name
    pub fn for_name(name: &str, store: &'s S) -> Result<Self, RecordError> {
        EntitySchema::lookup(name)
            .map(|entity| Self::new(entity, store))
            .ok_or_else(|| RecordError::UnknownEntity(name.to_string()))
    }

    fn builder(&self) -> QueryBuilder {
        QueryBuilder::new(self.entity)
    }

    pub async fn select_all(&self) -> Result<Vec<Record>, RecordError> {
        Ok(self.store.fetch_all(&self.builder().select_all()).await?)
    }

    pub async fn select_404(&self, id: EntityId) -> Result<Record, RecordError> {
        self.store
            .fetch_optional(&self.builder().select_by_id(id))
            .await?
            .ok_or(RecordError::NotFound { entity: self.entity.name, id })
    }

    pub async fn create(&self, fields: &Map<String, Value>) -> Result<Record, RecordError> {
        let stmt = self.builder().insert(fields)?;
        self.store
            .fetch_optional(&stmt)
            .await?
            .ok_or_else(|| {
                RecordError::Storage(DatabaseError::QueryError(format!(
                    "INSERT into {} returned no row",
                    self.entity.table
                )))
            })
    }

    pub async fn patch(&self, id: EntityId, fields: &Map<String, Value>) -> Result<Record, RecordError> {
        apply_patch(self.store, self.entity, id, fields).await
    }

    pub async fn delete(&self, id: EntityId) -> Result<Record, RecordError> {
        self.store
            .fetch_optional(&self.builder().delete_by_id(id))
            .await?
            .ok_or(RecordError::NotFound { entity: self.entity.name, id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::patch::tests::RecordingStore;
    use serde_json::json;

    #[test]
    fn unknown_entity_is_rejected() {
        let store = RecordingStore::default();
        assert!(matches!(
            Repository::for_name("users", &store),
            Err(RecordError::UnknownEntity(name)) if name == "users"
        ));
    }

    #[tokio::test]
    async fn create_returns_inserted_row() {
        let store = RecordingStore::returning(json!({ "id": 1, "member_name": "Priya", "report_date": "2024-05-02" }));
        let repo = Repository::for_name("team_report", &store).unwrap();

        let fields = json!({ "member_name": "Priya", "report_date": "2024-05-02" });
        let row = repo.create(fields.as_object().unwrap()).await.unwrap();

        assert_eq!(row["id"], json!(1));
        assert_eq!(store.issued(), 1);
    }

    #[tokio::test]
    async fn create_without_required_fields_issues_no_sql() {
        let store = RecordingStore::default();
        let repo = Repository::for_name("team_report", &store).unwrap();

        let fields = json!({ "activity": "Kickoff call" });
        let err = repo.create(fields.as_object().unwrap()).await.unwrap_err();

        assert!(matches!(err, RecordError::Validation { .. }));
        assert_eq!(store.issued(), 0);
    }

    #[tokio::test]
    async fn get_and_delete_missing_rows_are_not_found() {
        let store = RecordingStore::default();
        let repo = Repository::for_name("CTS", &store).unwrap();
        let id = EntityId::new(42).unwrap();

        assert!(matches!(repo.select_404(id).await, Err(RecordError::NotFound { .. })));
        assert!(matches!(repo.delete(id).await, Err(RecordError::NotFound { .. })));
        assert_eq!(store.issued(), 2);
    }

    #[tokio::test]
    async fn select_all_passes_rows_through() {
        let store = RecordingStore {
            rows: vec![
                json!({ "id": 1 }).as_object().cloned().unwrap(),
                json!({ "id": 2 }).as_object().cloned().unwrap(),
            ],
            ..RecordingStore::default()
        };
        let repo = Repository::for_name("Alchemy_Routing", &store).unwrap();

        let rows = repo.select_all().await.unwrap();
        assert_eq!(rows.len(), 2);
    }
}

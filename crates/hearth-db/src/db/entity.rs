use async_trait::async_trait;
use hearth_core::{AppError, EntityType};
use sqlx::{PgPool, Postgres};

/// Existence check for the entities that own permanent images.
#[async_trait]
pub trait EntityLookup: Send + Sync {
    /// Whether a row with `entity_id` exists in the table backing `entity_type`.
    async fn exists(&self, entity_type: EntityType, entity_id: &str) -> Result<bool, AppError>;
}

/// `SELECT id ... LIMIT 1` against the entity type's table.
///
/// The table name comes from the fixed entity mapping, never from input.
/// Ids are compared as text so non-UUID input cannot fail the cast.
pub(crate) fn exists_query(entity_type: EntityType) -> String {
    format!(
        "SELECT id::text FROM {} WHERE id::text = $1 LIMIT 1",
        entity_type.table_name()
    )
}

/// Repository for entity lookups against the platform database
#[derive(Clone)]
pub struct EntityRepository {
    pool: PgPool,
}

impl EntityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntityLookup for EntityRepository {
    #[tracing::instrument(
        skip(self),
        fields(db.table = entity_type.table_name(), db.operation = "select")
    )]
    async fn exists(&self, entity_type: EntityType, entity_id: &str) -> Result<bool, AppError> {
        let query = exists_query(entity_type);
        let row = sqlx::query_scalar::<Postgres, String>(&query)
            .bind(entity_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.is_some())
    }
}

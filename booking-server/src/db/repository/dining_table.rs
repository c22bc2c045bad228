//! Dining Table Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{DiningTable, DiningTableCreate};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "dining_table";

#[derive(Clone)]
pub struct DiningTableRepository {
    base: BaseRepository,
}

impl DiningTableRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all active tables for a tenant
    pub async fn find_active(&self, tenant_id: &str) -> RepoResult<Vec<DiningTable>> {
        let tables: Vec<DiningTable> = self
            .base
            .db()
            .query(
                "SELECT * FROM dining_table WHERE tenant_id = $tenant_id AND is_active = true ORDER BY name",
            )
            .bind(("tenant_id", tenant_id.to_string()))
            .await?
            .take(0)?;
        Ok(tables)
    }

    /// Find a tenant's table by id
    ///
    /// Tenant scoping is enforced here: a table belonging to another tenant
    /// resolves to `None`, never to a cross-tenant read.
    pub async fn find_by_id(&self, tenant_id: &str, id: &str) -> RepoResult<Option<DiningTable>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid table ID: {}", id)))?;
        let table: Option<DiningTable> = self.base.db().select(thing).await?;
        Ok(table.filter(|t| t.tenant_id == tenant_id))
    }

    /// Create a table (tenant configuration path; the booking engine itself
    /// only reads)
    pub async fn create(&self, data: DiningTableCreate) -> RepoResult<DiningTable> {
        if data.capacity < 1 {
            return Err(RepoError::Validation(format!(
                "Table capacity must be >= 1, got {}",
                data.capacity
            )));
        }

        let table = DiningTable {
            id: None,
            tenant_id: data.tenant_id,
            name: data.name,
            capacity: data.capacity,
            section: data.section,
            is_active: true,
            out_of_service: false,
        };

        let created: Option<DiningTable> = self.base.db().create(TABLE).content(table).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create dining table".to_string()))
    }

    /// Flag or unflag a table as out of service (maintenance)
    pub async fn set_out_of_service(
        &self,
        tenant_id: &str,
        id: &str,
        out_of_service: bool,
    ) -> RepoResult<DiningTable> {
        let existing = self
            .find_by_id(tenant_id, id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Table {} not found", id)))?;
        let thing = existing
            .id
            .clone()
            .ok_or_else(|| RepoError::Database("Stored table row has no id".to_string()))?;

        let updated: Option<DiningTable> = self
            .base
            .db()
            .query("UPDATE $thing SET out_of_service = $flag RETURN AFTER")
            .bind(("thing", thing))
            .bind(("flag", out_of_service))
            .await?
            .take(0)?;
        updated.ok_or_else(|| RepoError::Database("Failed to update dining table".to_string()))
    }
}

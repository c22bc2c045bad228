//! Database Module
//!
//! Handles the embedded SurrealDB instance and schema definition.

pub mod models;
pub mod repository;

use shared::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

/// Database service owning the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open the persistent database (RocksDB backend) and apply the schema
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        let service = Self { db };
        service.select_namespace().await?;
        service.define_schema().await?;

        tracing::info!("Database ready (SurrealDB RocksDB at {db_path})");
        Ok(service)
    }

    /// Open an in-memory database (tests, ephemeral dev runs)
    pub async fn memory() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open memory database: {e}")))?;

        let service = Self { db };
        service.select_namespace().await?;
        service.define_schema().await?;
        Ok(service)
    }

    async fn select_namespace(&self) -> Result<(), AppError> {
        self.db
            .use_ns("heron")
            .use_db("booking")
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))
    }

    /// Define tables and indexes
    ///
    /// The unique indexes are load-bearing:
    /// - `idempotency_tenant_key` makes the idempotency ledger the single
    ///   arbiter for a (tenant, key) pair
    /// - `booking_idem` guarantees one booking per (tenant, key)
    ///
    /// The table/window race itself is closed by the per-table write lock
    /// plus the overlap predicate inside the confirm/reschedule
    /// transactions; no index quantizes the window.
    async fn define_schema(&self) -> Result<(), AppError> {
        const SCHEMA: &str = "
            DEFINE TABLE IF NOT EXISTS dining_table SCHEMALESS;
            DEFINE TABLE IF NOT EXISTS booking SCHEMALESS;
            DEFINE TABLE IF NOT EXISTS idempotency SCHEMALESS;

            DEFINE INDEX IF NOT EXISTS table_tenant ON dining_table FIELDS tenant_id;
            DEFINE INDEX IF NOT EXISTS booking_tenant_start ON booking FIELDS tenant_id, start;
            DEFINE INDEX IF NOT EXISTS idempotency_tenant_key ON idempotency FIELDS tenant_id, key UNIQUE;
            DEFINE INDEX IF NOT EXISTS booking_idem ON booking FIELDS tenant_id, idempotency_key UNIQUE;
        ";

        self.db
            .query(SCHEMA)
            .await
            .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?;
        tracing::info!("Database schema defined");
        Ok(())
    }
}

//! Hold Manager
//!
//! Holds are advisory and process-local: a DashMap entry with a TTL.
//! They let a UI claim a slot while guest details are collected and
//! carry the idempotency key through to confirmation. They are never
//! durable, never block the confirm path on their own, and expire
//! passively: every read re-checks `expires_at`; no background reaper.

use dashmap::DashMap;
use uuid::Uuid;

/// Ephemeral reservation hold
#[derive(Debug, Clone)]
pub struct Hold {
    pub id: String,
    pub tenant_id: String,
    /// Table record id as "dining_table:xyz"
    pub table_id: String,
    pub party_size: i32,
    /// Unix millis
    pub start: i64,
    /// Unix millis, exclusive
    pub end: i64,
    pub idempotency_key: String,
    pub created_at: i64,
    pub expires_at: i64,
}

/// In-memory hold store with passive TTL expiry
pub struct HoldManager {
    holds: DashMap<String, Hold>,
    ttl_ms: i64,
}

impl HoldManager {
    pub fn new(ttl_minutes: i64) -> Self {
        Self {
            holds: DashMap::new(),
            ttl_ms: ttl_minutes * 60 * 1000,
        }
    }

    /// Issue a hold for a table/window/party tuple
    ///
    /// Opportunistically prunes expired entries so the map stays bounded
    /// without a sweeper task.
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        &self,
        tenant_id: &str,
        table_id: &str,
        party_size: i32,
        start: i64,
        end: i64,
        idempotency_key: &str,
        now_ms: i64,
    ) -> Hold {
        self.prune_expired(now_ms);

        let hold = Hold {
            id: Uuid::new_v4().to_string(),
            tenant_id: tenant_id.to_string(),
            table_id: table_id.to_string(),
            party_size,
            start,
            end,
            idempotency_key: idempotency_key.to_string(),
            created_at: now_ms,
            expires_at: now_ms + self.ttl_ms,
        };
        self.holds.insert(hold.id.clone(), hold.clone());
        hold
    }

    /// Fetch a live hold; expired or cross-tenant lookups resolve to None
    pub fn get_valid(&self, tenant_id: &str, hold_id: &str, now_ms: i64) -> Option<Hold> {
        let hold = self.holds.get(hold_id)?;
        if hold.tenant_id != tenant_id || hold.expires_at <= now_ms {
            return None;
        }
        Some(hold.clone())
    }

    /// Drop a hold once consumed by a successful confirm
    pub fn remove(&self, tenant_id: &str, hold_id: &str) {
        // 仅允许持有租户删除
        self.holds
            .remove_if(hold_id, |_, hold| hold.tenant_id == tenant_id);
    }

    /// Drop every hold whose TTL has passed
    pub fn prune_expired(&self, now_ms: i64) {
        self.holds.retain(|_, hold| hold.expires_at > now_ms);
    }

    pub fn len(&self) -> usize {
        self.holds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holds.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000_000;

    fn manager() -> HoldManager {
        HoldManager::new(5)
    }

    #[test]
    fn test_created_hold_is_retrievable() {
        let mgr = manager();
        let hold = mgr.create("t1", "dining_table:a", 4, NOW + 60_000, NOW + 120_000, "K1", NOW);
        let fetched = mgr.get_valid("t1", &hold.id, NOW + 1).unwrap();
        assert_eq!(fetched.idempotency_key, "K1");
        assert_eq!(fetched.expires_at, NOW + 5 * 60 * 1000);
    }

    #[test]
    fn test_expired_hold_is_absent() {
        let mgr = manager();
        let hold = mgr.create("t1", "dining_table:a", 4, NOW, NOW + 60_000, "K1", NOW);
        assert!(mgr.get_valid("t1", &hold.id, NOW + 5 * 60 * 1000).is_none());
    }

    #[test]
    fn test_cross_tenant_lookup_is_absent() {
        let mgr = manager();
        let hold = mgr.create("t1", "dining_table:a", 4, NOW, NOW + 60_000, "K1", NOW);
        assert!(mgr.get_valid("t2", &hold.id, NOW + 1).is_none());
    }

    #[test]
    fn test_create_prunes_expired_entries() {
        let mgr = manager();
        mgr.create("t1", "dining_table:a", 2, NOW, NOW + 60_000, "K1", NOW);
        mgr.create("t1", "dining_table:b", 2, NOW, NOW + 60_000, "K2", NOW);
        assert_eq!(mgr.len(), 2);

        // A later create sweeps the expired ones out
        mgr.create("t1", "dining_table:c", 2, NOW, NOW + 60_000, "K3", NOW + 10 * 60 * 1000);
        assert_eq!(mgr.len(), 1);
    }

    #[test]
    fn test_remove_is_tenant_scoped() {
        let mgr = manager();
        let hold = mgr.create("t1", "dining_table:a", 4, NOW, NOW + 60_000, "K1", NOW);
        mgr.remove("t2", &hold.id);
        assert!(mgr.get_valid("t1", &hold.id, NOW + 1).is_some());
        mgr.remove("t1", &hold.id);
        assert!(mgr.get_valid("t1", &hold.id, NOW + 1).is_none());
    }
}

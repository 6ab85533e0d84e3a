use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::sync::RwLock;

use rolesync_core::TenantId;

/// Tenant-isolated key/value store abstraction.
pub trait TenantStore<K, V>: Send + Sync {
    fn get(&self, tenant_id: TenantId, key: &K) -> Option<V>;
    fn upsert(&self, tenant_id: TenantId, key: K, value: V);
    /// Insert only when `key` is absent; returns whether the value was stored.
    fn insert_if_absent(&self, tenant_id: TenantId, key: K, value: V) -> bool;
    /// Mutate an existing value in place; returns false when `key` is absent.
    fn modify(&self, tenant_id: TenantId, key: &K, f: &mut dyn FnMut(&mut V)) -> bool;
    fn list(&self, tenant_id: TenantId) -> Vec<V>;
    /// Drop every record of a tenant.
    fn clear_tenant(&self, tenant_id: TenantId);
}

impl<K, V, S> TenantStore<K, V> for Arc<S>
where
    S: TenantStore<K, V> + ?Sized,
{
    fn get(&self, tenant_id: TenantId, key: &K) -> Option<V> {
        (**self).get(tenant_id, key)
    }

    fn upsert(&self, tenant_id: TenantId, key: K, value: V) {
        (**self).upsert(tenant_id, key, value)
    }

    fn insert_if_absent(&self, tenant_id: TenantId, key: K, value: V) -> bool {
        (**self).insert_if_absent(tenant_id, key, value)
    }

    fn modify(&self, tenant_id: TenantId, key: &K, f: &mut dyn FnMut(&mut V)) -> bool {
        (**self).modify(tenant_id, key, f)
    }

    fn list(&self, tenant_id: TenantId) -> Vec<V> {
        (**self).list(tenant_id)
    }

    fn clear_tenant(&self, tenant_id: TenantId) {
        (**self).clear_tenant(tenant_id)
    }
}

/// In-memory tenant-isolated store for tests/dev.
///
/// Listing preserves insertion order per tenant.
#[derive(Debug)]
pub struct InMemoryTenantStore<K, V> {
    inner: RwLock<Vec<((TenantId, K), V)>>,
    positions: RwLock<HashMap<(TenantId, K), usize>>,
}

impl<K, V> InMemoryTenantStore<K, V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Vec::new()),
            positions: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> Default for InMemoryTenantStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> TenantStore<K, V> for InMemoryTenantStore<K, V>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn get(&self, tenant_id: TenantId, key: &K) -> Option<V> {
        let positions = self.positions.read().ok()?;
        let pos = *positions.get(&(tenant_id, key.clone()))?;
        let entries = self.inner.read().ok()?;
        entries.get(pos).map(|(_, v)| v.clone())
    }

    fn upsert(&self, tenant_id: TenantId, key: K, value: V) {
        if !self.insert_if_absent(tenant_id, key.clone(), value.clone()) {
            self.modify(tenant_id, &key, &mut |v: &mut V| *v = value.clone());
        }
    }

    fn insert_if_absent(&self, tenant_id: TenantId, key: K, value: V) -> bool {
        let (Ok(mut positions), Ok(mut entries)) = (self.positions.write(), self.inner.write())
        else {
            return false;
        };

        let slot = (tenant_id, key);
        if positions.contains_key(&slot) {
            return false;
        }
        positions.insert(slot.clone(), entries.len());
        entries.push((slot, value));
        true
    }

    fn modify(&self, tenant_id: TenantId, key: &K, f: &mut dyn FnMut(&mut V)) -> bool {
        let (Ok(positions), Ok(mut entries)) = (self.positions.read(), self.inner.write()) else {
            return false;
        };

        match positions.get(&(tenant_id, key.clone())) {
            Some(&pos) => {
                f(&mut entries[pos].1);
                true
            }
            None => false,
        }
    }

    fn list(&self, tenant_id: TenantId) -> Vec<V> {
        let entries = match self.inner.read() {
            Ok(e) => e,
            Err(_) => return vec![],
        };

        entries
            .iter()
            .filter_map(|((t, _k), v)| if *t == tenant_id { Some(v.clone()) } else { None })
            .collect()
    }

    fn clear_tenant(&self, tenant_id: TenantId) {
        let (Ok(mut positions), Ok(mut entries)) = (self.positions.write(), self.inner.write())
        else {
            return;
        };

        entries.retain(|((t, _k), _v)| *t != tenant_id);
        positions.clear();
        for (pos, (slot, _)) in entries.iter().enumerate() {
            positions.insert(slot.clone(), pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_if_absent_keeps_the_first_value() {
        let store: InMemoryTenantStore<String, u32> = InMemoryTenantStore::new();
        let tenant = TenantId::new();

        assert!(store.insert_if_absent(tenant, "admin".to_string(), 1));
        assert!(!store.insert_if_absent(tenant, "admin".to_string(), 2));
        assert_eq!(store.get(tenant, &"admin".to_string()), Some(1));
    }

    #[test]
    fn tenants_are_isolated() {
        let store: InMemoryTenantStore<String, u32> = InMemoryTenantStore::new();
        let (a, b) = (TenantId::new(), TenantId::new());

        store.upsert(a, "admin".to_string(), 1);
        assert!(store.insert_if_absent(b, "admin".to_string(), 2));

        assert_eq!(store.get(a, &"admin".to_string()), Some(1));
        assert_eq!(store.get(b, &"admin".to_string()), Some(2));
    }

    #[test]
    fn modify_reports_missing_keys() {
        let store: InMemoryTenantStore<String, u32> = InMemoryTenantStore::new();
        let tenant = TenantId::new();

        assert!(!store.modify(tenant, &"ghost".to_string(), &mut |v: &mut u32| *v += 1));

        store.upsert(tenant, "suzy".to_string(), 1);
        assert!(store.modify(tenant, &"suzy".to_string(), &mut |v: &mut u32| *v += 1));
        assert_eq!(store.get(tenant, &"suzy".to_string()), Some(2));
    }

    #[test]
    fn list_follows_insertion_order_and_clear_drops_one_tenant() {
        let store: InMemoryTenantStore<String, u32> = InMemoryTenantStore::new();
        let (a, b) = (TenantId::new(), TenantId::new());

        store.upsert(a, "z".to_string(), 1);
        store.upsert(b, "y".to_string(), 2);
        store.upsert(a, "x".to_string(), 3);
        store.upsert(a, "z".to_string(), 4);
        assert_eq!(store.list(a), vec![4, 3]);

        store.clear_tenant(a);
        assert!(store.list(a).is_empty());
        assert_eq!(store.get(b, &"y".to_string()), Some(2));
    }
}

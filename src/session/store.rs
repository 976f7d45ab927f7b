use super::types::BrandContext;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Process-lifetime mapping from session id to brand context. The store
/// exclusively owns its records: every read and write goes through a clone,
/// so callers never hold a reference into the internal map. No eviction and
/// no TTL; records live until `remove` or `clear`.
pub struct BrandContextStore {
    records: RwLock<HashMap<String, BrandContext>>,
}

impl BrandContextStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, BrandContext>> {
        self.records.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, BrandContext>> {
        self.records.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store (or replace) the context for a session.
    pub fn set(&self, session_id: &str, context: BrandContext) {
        self.write().insert(session_id.to_string(), context);
    }

    /// A copy of the stored context, if any.
    pub fn get(&self, session_id: &str) -> Option<BrandContext> {
        self.read().get(session_id).cloned()
    }

    /// Merge `partial` over the stored context, creating the record when
    /// absent. Returns a copy of the merged result.
    pub fn update(&self, session_id: &str, partial: &BrandContext) -> BrandContext {
        let mut records = self.write();
        let entry = records.entry(session_id.to_string()).or_default();
        entry.merge(partial);
        entry.clone()
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.read().contains_key(session_id)
    }

    /// Remove a session's record; true iff one existed.
    pub fn remove(&self, session_id: &str) -> bool {
        self.write().remove(session_id).is_some()
    }

    pub fn clear(&self) {
        self.write().clear();
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn techcorp() -> BrandContext {
        BrandContext {
            brand_name: Some("TechCorp".into()),
            ..BrandContext::default()
        }
    }

    #[test]
    fn set_then_get_round_trips() {
        let store = BrandContextStore::new();
        store.set("s1", techcorp());
        assert_eq!(store.get("s1"), Some(techcorp()));
        assert!(store.get("missing").is_none());
    }

    #[test]
    fn get_returns_a_copy_not_an_alias() {
        let store = BrandContextStore::new();
        store.set("s1", techcorp());

        let mut copy = store.get("s1").unwrap();
        copy.brand_name = Some("Mutated".into());

        assert_eq!(
            store.get("s1").unwrap().brand_name.as_deref(),
            Some("TechCorp")
        );
    }

    #[test]
    fn update_creates_when_absent() {
        let store = BrandContextStore::new();
        let merged = store.update("fresh", &techcorp());
        assert_eq!(merged.brand_name.as_deref(), Some("TechCorp"));
        assert!(store.contains("fresh"));
    }

    #[test]
    fn update_merges_field_by_field() {
        let store = BrandContextStore::new();
        store.set("s1", techcorp());
        let merged = store.update(
            "s1",
            &BrandContext {
                brand_voice: Some("casual".into()),
                ..BrandContext::default()
            },
        );

        assert_eq!(merged.brand_name.as_deref(), Some("TechCorp"));
        assert_eq!(merged.brand_voice.as_deref(), Some("casual"));
        assert_eq!(store.get("s1").unwrap(), merged);
    }

    #[test]
    fn remove_reports_whether_a_record_existed() {
        let store = BrandContextStore::new();
        store.set("s1", techcorp());
        assert!(store.remove("s1"));
        assert!(!store.remove("s1"));
    }

    #[test]
    fn clear_wipes_all_sessions() {
        let store = BrandContextStore::new();
        store.set("a", techcorp());
        store.set("b", BrandContext::default());
        assert_eq!(store.len(), 2);

        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn set_replaces_the_whole_record() {
        let store = BrandContextStore::new();
        store.set(
            "s1",
            BrandContext {
                brand_name: Some("Old".into()),
                brand_voice: Some("formal".into()),
                ..BrandContext::default()
            },
        );
        store.set("s1", techcorp());

        let stored = store.get("s1").unwrap();
        assert_eq!(stored.brand_name.as_deref(), Some("TechCorp"));
        assert!(stored.brand_voice.is_none());
    }
}

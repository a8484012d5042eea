use std::collections::BTreeMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::store::{ResourceId, ResourceRef, ResourceStore, StoreError};

/// An activity hosted by one principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    /// Store-assigned identifier
    pub id: u64,
    /// Short title
    pub title: String,
    /// Free-form description
    pub description: String,
    /// Category label
    pub category: String,
    /// City the activity takes place in
    pub city: String,
    /// Venue within the city
    pub venue: String,
    /// Principal id of the host
    pub host_id: String,
}

/// Caller-supplied activity fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityInput {
    /// Short title
    pub title: String,
    /// Free-form description
    pub description: String,
    /// Category label
    pub category: String,
    /// City the activity takes place in
    pub city: String,
    /// Venue within the city
    pub venue: String,
}

impl ActivityInput {
    fn into_activity(self, id: u64, host_id: String) -> Activity {
        Activity {
            id,
            title: self.title,
            description: self.description,
            category: self.category,
            city: self.city,
            venue: self.venue,
            host_id,
        }
    }
}

/// In-memory activity storage, safe to share across threads.
///
/// Identifiers are assigned from 1 upward and never reused.
#[derive(Debug, Default)]
pub struct ActivityStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    last_id: u64,
    activities: BTreeMap<u64, Activity>,
}

impl ActivityStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a new activity hosted by `host_id` and returns it.
    pub fn insert(&self, host_id: impl Into<String>, input: ActivityInput) -> Activity {
        let mut inner = self.inner.write();
        inner.last_id += 1;
        let activity = input.into_activity(inner.last_id, host_id.into());
        inner.activities.insert(activity.id, activity.clone());
        activity
    }

    /// Returns the activity with `id`, if present.
    pub fn get(&self, id: u64) -> Option<Activity> {
        self.inner.read().activities.get(&id).cloned()
    }

    /// Replaces the editable fields of an activity; the host is unchanged.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no activity has that id.
    pub fn update(&self, id: u64, input: ActivityInput) -> Result<Activity, StoreError> {
        let mut inner = self.inner.write();
        let slot = inner
            .activities
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(id.into()))?;
        let host_id = std::mem::take(&mut slot.host_id);
        *slot = input.into_activity(id, host_id);
        Ok(slot.clone())
    }

    /// Removes an activity and returns it.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no activity has that id.
    pub fn remove(&self, id: u64) -> Result<Activity, StoreError> {
        self.inner
            .write()
            .activities
            .remove(&id)
            .ok_or_else(|| StoreError::NotFound(id.into()))
    }

    /// Returns every activity ordered by id.
    pub fn list(&self) -> Vec<Activity> {
        self.inner.read().activities.values().cloned().collect()
    }

    /// Returns the number of stored activities.
    pub fn len(&self) -> usize {
        self.inner.read().activities.len()
    }

    /// Returns `true` if the store holds no activities.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResourceStore for ActivityStore {
    fn find(&self, id: &ResourceId) -> Result<ResourceRef, StoreError> {
        let activity = id
            .as_str()
            .parse::<u64>()
            .ok()
            .and_then(|key| self.get(key))
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        Ok(ResourceRef::new(activity.id, activity.host_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(title: &str) -> ActivityInput {
        ActivityInput {
            title: title.to_string(),
            description: "Morning loop".to_string(),
            category: "sport".to_string(),
            city: "Leeds".to_string(),
            venue: "Roundhay Park".to_string(),
        }
    }

    #[test]
    fn ids_are_assigned_in_order() {
        let store = ActivityStore::new();
        let first = store.insert("u1", input("Run"));
        let second = store.insert("u2", input("Swim"));

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn ids_are_not_reused_after_removal() {
        let store = ActivityStore::new();
        let first = store.insert("u1", input("Run"));
        store.remove(first.id).unwrap();

        let next = store.insert("u1", input("Run again"));
        assert_eq!(next.id, 2);
        assert!(!store.is_empty());
    }

    #[test]
    fn update_keeps_host() {
        let store = ActivityStore::new();
        let created = store.insert("u1", input("Run"));

        let updated = store.update(created.id, input("Long run")).unwrap();

        assert_eq!(updated.title, "Long run");
        assert_eq!(updated.host_id, "u1");
        assert_eq!(store.get(created.id), Some(updated));
    }

    #[test]
    fn update_and_remove_report_missing_ids() {
        let store = ActivityStore::new();

        assert!(matches!(store.update(9, input("x")), Err(StoreError::NotFound(id)) if id.as_str() == "9"));
        assert!(matches!(store.remove(9), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn list_is_ordered_by_id() {
        let store = ActivityStore::new();
        store.insert("u1", input("a"));
        store.insert("u2", input("b"));
        store.insert("u1", input("c"));

        let ids: Vec<u64> = store.list().iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn find_reports_host_as_owner() {
        let store = ActivityStore::new();
        let created = store.insert("u1", input("Run"));

        let resource = store.find(&created.id.into()).unwrap();
        assert_eq!(resource, ResourceRef::new(created.id, "u1"));
    }

    #[test]
    fn find_treats_malformed_ids_as_missing() {
        let store = ActivityStore::new();
        store.insert("u1", input("Run"));

        assert!(matches!(store.find(&"abc".into()), Err(StoreError::NotFound(_))));
        assert!(matches!(store.find(&ResourceId::from(42u64)), Err(StoreError::NotFound(_))));
    }
}

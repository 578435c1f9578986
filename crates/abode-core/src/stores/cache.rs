//! In-memory list shared by the stores.

use parking_lot::RwLock;

use crate::models::{Listing, ListingId};

/// Latest fetched list of one listing kind.
///
/// `None` means "not fetched yet", distinct from a fetched empty list.
#[derive(Debug)]
pub struct ListCache<T> {
    items: RwLock<Option<Vec<T>>>,
}

impl<T> Default for ListCache<T> {
    fn default() -> Self {
        Self {
            items: RwLock::new(None),
        }
    }
}

impl<T: Listing> ListCache<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a focus event should trigger a fetch (unset or empty).
    #[must_use]
    pub fn needs_load(&self) -> bool {
        self.items.read().as_ref().map_or(true, Vec::is_empty)
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.items.read().is_some()
    }

    #[must_use]
    pub fn snapshot(&self) -> Option<Vec<T>> {
        self.items.read().clone()
    }

    /// Apply `select` to the list, or `None` when it has not been fetched.
    pub fn select<R>(&self, select: impl FnOnce(&[T]) -> R) -> Option<R> {
        self.items.read().as_deref().map(select)
    }

    #[must_use]
    pub fn find(&self, id: &ListingId) -> Option<T> {
        self.items
            .read()
            .as_ref()?
            .iter()
            .find(|item| item.id() == id)
            .cloned()
    }

    pub fn replace_all(&self, items: Vec<T>) {
        *self.items.write() = Some(items);
    }

    /// Append a page; initializes the list when unset.
    pub fn extend(&self, items: Vec<T>) {
        self.items.write().get_or_insert_with(Vec::new).extend(items);
    }

    /// Put a created record first; returns whether the list was loaded.
    ///
    /// An unset list stays unset so the next focus still fetches the feed.
    pub fn prepend(&self, item: T) -> bool {
        let mut guard = self.items.write();
        let Some(items) = guard.as_mut() else {
            return false;
        };
        items.insert(0, item);
        true
    }

    /// Swap the record with the same id; returns whether one was found.
    pub fn replace(&self, item: T) -> bool {
        let mut guard = self.items.write();
        let Some(items) = guard.as_mut() else {
            return false;
        };
        match items.iter_mut().find(|existing| existing.id() == item.id()) {
            Some(existing) => {
                *existing = item;
                true
            }
            None => false,
        }
    }

    /// Drop the record with `id`; returns whether one was removed.
    pub fn remove(&self, id: &ListingId) -> bool {
        let mut guard = self.items.write();
        let Some(items) = guard.as_mut() else {
            return false;
        };
        let before = items.len();
        items.retain(|item| item.id() != id);
        items.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gym;

    fn gym(id: &str, name: &str) -> Gym {
        serde_json::from_value(serde_json::json!({ "_id": id, "name": name })).unwrap()
    }

    #[test]
    fn unset_and_empty_both_need_load() {
        let cache = ListCache::<Gym>::new();
        assert!(cache.needs_load());
        assert!(!cache.is_loaded());
        assert_eq!(cache.select(<[Gym]>::len), None);

        cache.replace_all(Vec::new());
        assert!(cache.needs_load());
        assert!(cache.is_loaded());
        assert_eq!(cache.select(<[Gym]>::len), Some(0));
    }

    #[test]
    fn prepend_replace_remove() {
        let cache = ListCache::new();
        cache.replace_all(vec![gym("g1", "One")]);
        assert!(cache.prepend(gym("g2", "Two")));

        let ids = cache
            .snapshot()
            .unwrap()
            .iter()
            .map(|item| item.id.to_string())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["g2", "g1"]);

        assert!(cache.replace(gym("g1", "Uno")));
        assert!(!cache.replace(gym("g9", "Missing")));
        assert_eq!(cache.find(&"g1".parse().unwrap()).unwrap().name, "Uno");

        assert!(cache.remove(&"g2".parse().unwrap()));
        assert!(!cache.remove(&"g2".parse().unwrap()));
        assert_eq!(cache.snapshot().unwrap().len(), 1);
    }

    #[test]
    fn prepend_keeps_unset_list_unset() {
        let cache = ListCache::new();
        assert!(!cache.prepend(gym("g1", "Mine")));
        assert!(cache.needs_load());
        assert_eq!(cache.snapshot(), None);
    }
}

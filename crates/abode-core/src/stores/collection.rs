//! Fetch-and-mutate plumbing shared by the listing stores.

use std::future::Future;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::{Mutex, MutexGuard};

use crate::api::{endpoints, ApiClient, AuthRequirement, ListPayload, RecordPayload};
use crate::error::Result;
use crate::models::{Listing, ListingId};
use crate::scope::Scope;
use crate::stores::cache::ListCache;

/// Routes of one listing kind.
#[derive(Debug, Clone, Copy)]
pub struct CollectionEndpoints {
    pub list: &'static str,
    pub create: &'static str,
    pub update: &'static str,
    pub delete: &'static str,
}

impl CollectionEndpoints {
    pub const PROPERTIES_AVAILABLE: Self = Self {
        list: endpoints::PROPERTIES_AVAILABLE,
        create: endpoints::PROPERTY_CREATE,
        update: endpoints::PROPERTY_UPDATE,
        delete: endpoints::PROPERTY_DELETE,
    };

    pub const PROPERTIES_MINE: Self = Self {
        list: endpoints::PROPERTIES_MINE,
        ..Self::PROPERTIES_AVAILABLE
    };

    pub const GYMS: Self = Self {
        list: endpoints::GYMS,
        create: endpoints::GYM_CREATE,
        update: endpoints::GYM_UPDATE,
        delete: endpoints::GYM_DELETE,
    };

    pub const PARKINGS: Self = Self {
        list: endpoints::PARKINGS,
        create: endpoints::PARKING_CREATE,
        update: endpoints::PARKING_UPDATE,
        delete: endpoints::PARKING_DELETE,
    };

    /// Blog routes; the list route is paginated and driven by the blog store.
    pub const BLOGS: Self = Self {
        list: endpoints::BLOGS,
        create: endpoints::BLOG_CREATE,
        update: endpoints::BLOG_UPDATE,
        delete: endpoints::BLOG_DELETE,
    };
}

/// A cached list of one listing kind backed by its CRUD routes.
///
/// The cache only changes after the backend answered successfully and the
/// owning scope is still open.
pub struct RemoteCollection<T> {
    api: ApiClient,
    scope: Scope,
    cache: ListCache<T>,
    endpoints: CollectionEndpoints,
    label: &'static str,
    load_lock: Mutex<()>,
}

impl<T> RemoteCollection<T>
where
    T: Listing + Serialize + DeserializeOwned,
{
    pub fn new(
        api: ApiClient,
        scope: Scope,
        endpoints: CollectionEndpoints,
        label: &'static str,
    ) -> Self {
        Self {
            api,
            scope,
            cache: ListCache::new(),
            endpoints,
            label,
            load_lock: Mutex::new(()),
        }
    }

    pub const fn cache(&self) -> &ListCache<T> {
        &self.cache
    }

    pub const fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Hold off loads while a mutation lands in the cache.
    ///
    /// A fetch that started before the mutation would otherwise overwrite it.
    pub(crate) async fn lock_loads(&self) -> MutexGuard<'_, ()> {
        self.load_lock.lock().await
    }

    /// Fetch only when the list is unset or empty.
    ///
    /// Concurrent callers wait for the first fetch instead of issuing their own.
    pub async fn ensure_loaded_with<F, Fut>(&self, enrich: F) -> Result<()>
    where
        F: FnOnce(Vec<T>) -> Fut,
        Fut: Future<Output = Vec<T>>,
    {
        let _guard = self.load_lock.lock().await;
        if !self.cache.needs_load() {
            return Ok(());
        }
        self.load(enrich).await
    }

    /// Refetch unconditionally.
    pub async fn refresh_with<F, Fut>(&self, enrich: F) -> Result<()>
    where
        F: FnOnce(Vec<T>) -> Fut,
        Fut: Future<Output = Vec<T>>,
    {
        let _guard = self.load_lock.lock().await;
        self.load(enrich).await
    }

    async fn load<F, Fut>(&self, enrich: F) -> Result<()>
    where
        F: FnOnce(Vec<T>) -> Fut,
        Fut: Future<Output = Vec<T>>,
    {
        let items = self.fetch().await?;
        let items = self.scope.run(async { Ok(enrich(items).await) }).await?;
        tracing::info!(count = items.len(), "Loaded {}", self.label);
        self.cache.replace_all(items);
        Ok(())
    }

    /// GET the list route without touching the cache.
    pub async fn fetch(&self) -> Result<Vec<T>> {
        let payload: ListPayload<T> = self
            .scope
            .run(self.api.get(self.endpoints.list, AuthRequirement::Optional))
            .await
            .inspect_err(|error| tracing::error!("Failed to fetch {}: {}", self.label, error))?;

        let mut items = payload.into_vec();
        items.iter_mut().for_each(Listing::after_fetch);
        Ok(items)
    }

    /// Create a record and put the server's copy first in the list.
    ///
    /// Before the first fetch the list stays unset, so the next
    /// `ensure_loaded` still brings in the whole feed.
    pub async fn create<B: Serialize + ?Sized>(&self, body: &B) -> Result<T> {
        let _loads = self.lock_loads().await;
        let created = self.create_remote(body).await?;
        self.cache.prepend(created.clone());
        Ok(created)
    }

    /// Update a record and swap in the server's copy.
    pub async fn update<B: Serialize + ?Sized>(&self, id: &ListingId, body: &B) -> Result<T> {
        let _loads = self.lock_loads().await;
        let updated = self.update_remote(id, body).await?;
        self.cache.replace(updated.clone());
        Ok(updated)
    }

    pub async fn delete(&self, id: &ListingId) -> Result<()> {
        let _loads = self.lock_loads().await;
        self.delete_remote(id).await?;
        self.cache.remove(id);
        Ok(())
    }

    pub(crate) async fn create_remote<B: Serialize + ?Sized>(&self, body: &B) -> Result<T> {
        let payload: RecordPayload<T> = self
            .scope
            .run(self.api.post(self.endpoints.create, body))
            .await
            .inspect_err(|error| tracing::error!("Failed to create {}: {}", self.label, error))?;

        let mut created = payload.into_inner();
        created.after_fetch();
        tracing::info!("Created {} {}", self.label, created.id());
        Ok(created)
    }

    pub(crate) async fn update_remote<B: Serialize + ?Sized>(
        &self,
        id: &ListingId,
        body: &B,
    ) -> Result<T> {
        let path = endpoints::with_id(self.endpoints.update, id.as_str());
        let payload: RecordPayload<T> = self
            .scope
            .run(self.api.put(&path, body))
            .await
            .inspect_err(|error| {
                tracing::error!("Failed to update {} {}: {}", self.label, id, error);
            })?;

        let mut updated = payload.into_inner();
        updated.after_fetch();
        tracing::info!("Updated {} {}", self.label, id);
        Ok(updated)
    }

    pub(crate) async fn delete_remote(&self, id: &ListingId) -> Result<()> {
        let path = endpoints::with_id(self.endpoints.delete, id.as_str());
        self.scope
            .run(self.api.delete(&path))
            .await
            .inspect_err(|error| {
                tracing::error!("Failed to delete {} {}: {}", self.label, id, error);
            })?;
        tracing::info!("Deleted {} {}", self.label, id);
        Ok(())
    }
}

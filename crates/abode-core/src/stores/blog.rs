//! Paginated blog feed.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use serde::Serialize;

use crate::api::{ApiClient, AuthRequirement};
use crate::error::Result;
use crate::filters;
use crate::models::{BlogPage, BlogPost, Listing, ListingId};
use crate::scope::Scope;
use crate::stores::collection::{CollectionEndpoints, RemoteCollection};

/// Outcome of [`BlogStore::load_more_posts`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMore {
    /// A page was fetched and this many posts were appended.
    Loaded(usize),
    /// Another page load is in flight; no request was made.
    Busy,
    /// The server reported no further pages; no request was made.
    Exhausted,
}

#[derive(Debug, Clone, Copy)]
struct Pagination {
    next_page: u32,
    has_more: bool,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            next_page: 1,
            has_more: true,
        }
    }
}

/// Clears the in-flight flag on every exit path.
struct LoadingGuard<'a>(&'a AtomicBool);

impl<'a> LoadingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct BlogStore {
    api: ApiClient,
    posts: RemoteCollection<BlogPost>,
    page_size: u32,
    pagination: Mutex<Pagination>,
    loading: AtomicBool,
}

impl BlogStore {
    pub fn new(api: ApiClient, page_size: u32) -> Self {
        Self {
            posts: RemoteCollection::new(
                api.clone(),
                Scope::new(),
                CollectionEndpoints::BLOGS,
                "blog posts",
            ),
            api,
            page_size: page_size.max(1),
            pagination: Mutex::new(Pagination::default()),
            loading: AtomicBool::new(false),
        }
    }

    /// Fetch the next page and append it.
    pub async fn load_more_posts(&self) -> Result<LoadMore> {
        let Some(_loading) = LoadingGuard::acquire(&self.loading) else {
            tracing::debug!("Blog page load already in flight");
            return Ok(LoadMore::Busy);
        };

        let pagination = *self.pagination.lock();
        if !pagination.has_more {
            return Ok(LoadMore::Exhausted);
        }

        let page = self.fetch_page(pagination.next_page).await?;
        let count = page.posts.len();
        self.posts.cache().extend(page.posts);
        *self.pagination.lock() = Pagination {
            next_page: pagination.next_page + 1,
            has_more: page.has_next_page,
        };
        tracing::info!(
            page = pagination.next_page,
            count,
            has_more = page.has_next_page,
            "Loaded blog page"
        );
        Ok(LoadMore::Loaded(count))
    }

    /// Drop every loaded page and fetch the first one again.
    pub async fn refresh(&self) -> Result<LoadMore> {
        let Some(_loading) = LoadingGuard::acquire(&self.loading) else {
            return Ok(LoadMore::Busy);
        };

        let page = self.fetch_page(1).await?;
        let count = page.posts.len();
        self.posts.cache().replace_all(page.posts);
        *self.pagination.lock() = Pagination {
            next_page: 2,
            has_more: page.has_next_page,
        };
        Ok(LoadMore::Loaded(count))
    }

    async fn fetch_page(&self, page: u32) -> Result<BlogPage> {
        let query = [
            ("page", page.to_string()),
            ("limit", self.page_size.to_string()),
        ];
        let mut blog_page: BlogPage = self
            .posts
            .scope()
            .run(self.api.get_with_query(
                CollectionEndpoints::BLOGS.list,
                &query,
                AuthRequirement::Optional,
            ))
            .await
            .inspect_err(|error| tracing::error!("Failed to fetch blog page {}: {}", page, error))?;
        blog_page.posts.iter_mut().for_each(Listing::after_fetch);
        Ok(blog_page)
    }

    /// Every loaded post in page order; `None` before the first page.
    #[must_use]
    pub fn posts(&self) -> Option<Vec<BlogPost>> {
        self.posts.cache().snapshot()
    }

    #[must_use]
    pub fn post(&self, id: &ListingId) -> Option<BlogPost> {
        self.posts.cache().find(id)
    }

    #[must_use]
    pub fn has_more(&self) -> bool {
        self.pagination.lock().has_more
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn by_category(&self, category: &str) -> Option<Vec<BlogPost>> {
        self.posts
            .cache()
            .select(|posts| filters::posts_by_category(posts, category))
    }

    pub async fn add<B: Serialize + ?Sized>(&self, body: &B) -> Result<BlogPost> {
        self.posts.create(body).await
    }

    pub async fn update<B: Serialize + ?Sized>(
        &self,
        id: &ListingId,
        body: &B,
    ) -> Result<BlogPost> {
        self.posts.update(id, body).await
    }

    pub async fn delete(&self, id: &ListingId) -> Result<()> {
        self.posts.delete(id).await
    }

    pub fn close(&self) {
        self.posts.scope().cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;
    use reqwest::Method;

    use super::*;
    use crate::api::endpoints;
    use crate::error::Error;
    use crate::test_support::{api_client, ScriptedTransport};

    fn page(ids: &[&str], has_next_page: bool) -> serde_json::Value {
        let posts = ids
            .iter()
            .map(|id| {
                serde_json::json!({ "_id": id, "title": format!("Post {id}"), "category": "Tips" })
            })
            .collect::<Vec<_>>();
        serde_json::json!({ "blogs": posts, "hasNextPage": has_next_page })
    }

    fn store(transport: &Arc<ScriptedTransport>) -> BlogStore {
        BlogStore::new(api_client(transport, None), 2)
    }

    fn post_ids(store: &BlogStore) -> Vec<String> {
        store
            .posts()
            .unwrap_or_default()
            .into_iter()
            .map(|post| post.id.to_string())
            .collect()
    }

    #[tokio::test]
    async fn second_call_while_loading_makes_no_request() {
        let transport = ScriptedTransport::new();
        transport.respond(Method::GET, endpoints::BLOGS, 200, page(&["b1", "b2"], true));
        let gate = transport.gate(endpoints::BLOGS);
        let store = store(&transport);

        let (first, ()) = tokio::join!(store.load_more_posts(), async {
            tokio::task::yield_now().await;
            assert!(store.is_loading());
            assert_eq!(store.load_more_posts().await.unwrap(), LoadMore::Busy);
            assert_eq!(transport.count(&Method::GET, endpoints::BLOGS), 1);
            gate.add_permits(1);
        });

        assert_eq!(first.unwrap(), LoadMore::Loaded(2));
        assert!(!store.is_loading());
        assert_eq!(transport.count(&Method::GET, endpoints::BLOGS), 1);
    }

    #[tokio::test]
    async fn stops_after_last_page() {
        let transport = ScriptedTransport::new();
        transport.respond(Method::GET, endpoints::BLOGS, 200, page(&["b1", "b2"], true));
        transport.respond(Method::GET, endpoints::BLOGS, 200, page(&["b3"], false));
        let store = store(&transport);

        assert_eq!(store.load_more_posts().await.unwrap(), LoadMore::Loaded(2));
        assert_eq!(store.load_more_posts().await.unwrap(), LoadMore::Loaded(1));
        assert_eq!(store.load_more_posts().await.unwrap(), LoadMore::Exhausted);
        assert_eq!(store.load_more_posts().await.unwrap(), LoadMore::Exhausted);

        assert_eq!(transport.count(&Method::GET, endpoints::BLOGS), 2);
        assert_eq!(post_ids(&store), vec!["b1", "b2", "b3"]);

        let pages = transport
            .requests()
            .into_iter()
            .map(|request| request.query)
            .collect::<Vec<_>>();
        assert_eq!(
            pages,
            vec![
                vec![
                    ("page".to_string(), "1".to_string()),
                    ("limit".to_string(), "2".to_string())
                ],
                vec![
                    ("page".to_string(), "2".to_string()),
                    ("limit".to_string(), "2".to_string())
                ],
            ]
        );
    }

    #[tokio::test]
    async fn failed_page_releases_loading_flag() {
        let transport = ScriptedTransport::new();
        transport.respond(
            Method::GET,
            endpoints::BLOGS,
            500,
            serde_json::json!({ "message": "boom" }),
        );
        transport.respond(Method::GET, endpoints::BLOGS, 200, page(&["b1"], false));
        let store = store(&transport);

        let error = store.load_more_posts().await.unwrap_err();
        assert_eq!(error.status(), Some(500));
        assert!(!store.is_loading());
        assert!(store.has_more());
        assert_eq!(store.posts(), None);

        assert_eq!(store.load_more_posts().await.unwrap(), LoadMore::Loaded(1));
        let retried = transport.requests().pop().unwrap();
        assert_eq!(retried.query[0], ("page".to_string(), "1".to_string()));
    }

    #[tokio::test]
    async fn closed_store_releases_loading_flag() {
        let transport = ScriptedTransport::new();
        transport.respond(Method::GET, endpoints::BLOGS, 200, page(&["b1"], true));
        let gate = transport.gate(endpoints::BLOGS);
        let store = store(&transport);

        let (result, ()) = tokio::join!(store.load_more_posts(), async {
            tokio::task::yield_now().await;
            store.close();
            gate.add_permits(1);
        });

        assert!(matches!(result, Err(Error::Cancelled)));
        assert!(!store.is_loading());
        assert_eq!(store.posts(), None);
    }

    #[tokio::test]
    async fn refresh_restarts_from_first_page() {
        let transport = ScriptedTransport::new();
        transport.respond(Method::GET, endpoints::BLOGS, 200, page(&["b1", "b2"], false));
        let store = store(&transport);

        store.load_more_posts().await.unwrap();
        assert_eq!(store.load_more_posts().await.unwrap(), LoadMore::Exhausted);

        assert_eq!(store.refresh().await.unwrap(), LoadMore::Loaded(2));
        assert_eq!(post_ids(&store), vec!["b1", "b2"]);
        assert_eq!(store.by_category("Tips").map(|posts| posts.len()), Some(2));
        assert_eq!(store.by_category("tips"), Some(Vec::new()));
    }

    #[tokio::test]
    async fn create_requires_token_and_prepends() {
        let transport = ScriptedTransport::new();
        transport.respond(Method::GET, endpoints::BLOGS, 200, page(&["b1"], false));
        transport.respond(
            Method::POST,
            endpoints::BLOG_CREATE,
            201,
            serde_json::json!({ "blog": { "_id": "b9", "title": "Fresh" } }),
        );

        let anonymous = store(&transport);
        let error = anonymous
            .add(&serde_json::json!({ "title": "Fresh" }))
            .await
            .unwrap_err();
        assert!(matches!(error, Error::NotAuthenticated));

        let signed_in = BlogStore::new(api_client(&transport, Some("tok")), 2);
        signed_in.load_more_posts().await.unwrap();
        let created = signed_in
            .add(&serde_json::json!({ "title": "Fresh" }))
            .await
            .unwrap();
        assert_eq!(created.title, "Fresh");
        assert_eq!(post_ids(&signed_in), vec!["b9", "b1"]);
    }
}

use axum::extract::{Path, State};
use axum::Json;

use crate::api::envelope::{Envelope, TagList, TaggedPages};
use crate::api::pages::log_list_failure;
use crate::app::AppState;
use crate::error::AppError;
use crate::storage::pages::{load_pages, PageStore};
use crate::tags::{has_any_tag, has_specific_tag, TagMode};

/// Every tag on every page, in page-then-position order, duplicates kept.
///
/// The result is built fresh on each call; pages without any tag contribute
/// nothing.
pub async fn collect_tags(
    store: &dyn PageStore,
    mode: TagMode,
    concurrency: usize,
) -> Result<Vec<String>, AppError> {
    let pages = load_pages(store, concurrency).await?;

    Ok(pages
        .iter()
        .filter(|page| has_any_tag(&page.body))
        .flat_map(|page| mode.extract(&page.body))
        .collect())
}

/// Slugs of the pages that contain `#<tag>`, in listing order.
pub async fn pages_with_tag(
    store: &dyn PageStore,
    tag: &str,
    concurrency: usize,
) -> Result<Vec<String>, AppError> {
    let pages = load_pages(store, concurrency).await?;

    Ok(pages
        .into_iter()
        .filter(|page| has_specific_tag(&page.body, tag))
        .map(|page| page.slug.into_string())
        .collect())
}

/// Axum handler for `GET /api/tags/all`.
pub async fn list_tags_handler(
    State(state): State<AppState>,
) -> Result<Json<Envelope<TagList>>, AppError> {
    let tags = collect_tags(
        state.page_store.as_ref(),
        state.tag_mode,
        state.read_concurrency,
    )
    .await
    .inspect_err(log_list_failure)?;

    Ok(Envelope::ok(TagList { tags }))
}

/// Axum handler for `GET /api/tags/{tag}`.
pub async fn pages_by_tag_handler(
    State(state): State<AppState>,
    Path(tag): Path<String>,
) -> Result<Json<Envelope<TaggedPages>>, AppError> {
    let pages = pages_with_tag(state.page_store.as_ref(), &tag, state.read_concurrency)
        .await
        .inspect_err(log_list_failure)?;

    Ok(Envelope::ok(TaggedPages { tag, pages }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::slug::Slug;
    use async_trait::async_trait;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    // -- Mock implementation --

    struct MockStore {
        pages: Mutex<BTreeMap<String, String>>,
        unreadable: Vec<String>,
        list_fails: bool,
        in_flight: AtomicUsize,
        peak_in_flight: AtomicUsize,
    }

    impl MockStore {
        fn new(pages: &[(&str, &str)]) -> Self {
            Self {
                pages: Mutex::new(
                    pages
                        .iter()
                        .map(|(slug, body)| (slug.to_string(), body.to_string()))
                        .collect(),
                ),
                unreadable: vec![],
                list_fails: false,
                in_flight: AtomicUsize::new(0),
                peak_in_flight: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl PageStore for MockStore {
        async fn read_page(&self, slug: &Slug) -> Result<String, AppError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(5)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.unreadable.iter().any(|s| s == slug.as_str()) {
                return Err(AppError::PageNotFound(slug.to_string()));
            }
            self.pages
                .lock()
                .unwrap()
                .get(slug.as_str())
                .cloned()
                .ok_or_else(|| AppError::PageNotFound(slug.to_string()))
        }

        async fn write_page(&self, slug: &Slug, content: &str) -> Result<(), AppError> {
            self.pages
                .lock()
                .unwrap()
                .insert(slug.to_string(), content.to_string());
            Ok(())
        }

        async fn list_slugs(&self) -> Result<Vec<Slug>, AppError> {
            if self.list_fails {
                return Err(AppError::DirectoryRead("mock".into()));
            }
            Ok(self
                .pages
                .lock()
                .unwrap()
                .keys()
                .map(|k| Slug::parse(k).unwrap())
                .collect())
        }
    }

    #[tokio::test]
    async fn test_collect_tags_across_pages_with_duplicates() {
        let store = MockStore::new(&[
            ("a", "intro #rust\n#web stuff"),
            ("b", "no tags at all"),
            ("c", "#rust again"),
        ]);

        let tags = collect_tags(&store, TagMode::Strict, 4).await.unwrap();
        assert_eq!(tags, vec!["rust", "web", "rust"]);
    }

    #[tokio::test]
    async fn test_collect_tags_compat_mode() {
        let store = MockStore::new(&[("a", "hello #foo world\n#bar baz"), ("b", "plain")]);

        let tags = collect_tags(&store, TagMode::Compat, 4).await.unwrap();
        assert_eq!(tags, vec!["hello", "foo", "world", "bar", "baz"]);
    }

    #[tokio::test]
    async fn test_collect_tags_is_fresh_per_call() {
        let store = MockStore::new(&[("a", "#one")]);

        let first = collect_tags(&store, TagMode::Strict, 1).await.unwrap();
        let second = collect_tags(&store, TagMode::Strict, 1).await.unwrap();
        assert_eq!(first, vec!["one"]);
        assert_eq!(second, vec!["one"]);
    }

    #[tokio::test]
    async fn test_collect_tags_skips_unreadable_pages() {
        let mut store = MockStore::new(&[("a", "#keep"), ("b", "#lost")]);
        store.unreadable = vec!["b".into()];

        let tags = collect_tags(&store, TagMode::Strict, 2).await.unwrap();
        assert_eq!(tags, vec!["keep"]);
    }

    #[tokio::test]
    async fn test_pages_with_tag() {
        let store = MockStore::new(&[
            ("A", "about #cooking"),
            ("B", "nothing tagged, mentions cooking"),
            ("C", "#cooking and #baking"),
        ]);

        let pages = pages_with_tag(&store, "cooking", 4).await.unwrap();
        assert_eq!(pages, vec!["A", "C"]);
    }

    #[tokio::test]
    async fn test_pages_with_tag_ignores_untagged_pages() {
        let store = MockStore::new(&[("a", "just text"), ("b", "#other")]);

        let pages = pages_with_tag(&store, "", 4).await.unwrap();
        assert_eq!(pages, vec!["b"]);
    }

    #[tokio::test]
    async fn test_scan_propagates_directory_failure() {
        let mut store = MockStore::new(&[]);
        store.list_fails = true;

        let err = pages_with_tag(&store, "x", 4).await.unwrap_err();
        assert!(matches!(err, AppError::DirectoryRead(_)));
        let err = collect_tags(&store, TagMode::Strict, 4).await.unwrap_err();
        assert!(matches!(err, AppError::DirectoryRead(_)));
    }

    #[tokio::test]
    async fn test_scan_respects_concurrency_limit() {
        let pages: Vec<(String, String)> = (0..20)
            .map(|i| (format!("page-{i:02}"), format!("#tag{i}")))
            .collect();
        let refs: Vec<(&str, &str)> = pages.iter().map(|(s, b)| (s.as_str(), b.as_str())).collect();
        let store = MockStore::new(&refs);

        let tags = collect_tags(&store, TagMode::Strict, 3).await.unwrap();

        assert_eq!(tags.len(), 20);
        assert_eq!(tags[0], "tag0");
        assert_eq!(tags[19], "tag19");
        let peak = store.peak_in_flight.load(Ordering::SeqCst);
        assert!(peak <= 3, "peak concurrency {peak} exceeded limit");
        assert!(peak > 1, "reads were not overlapped");
    }
}

use std::io::Write;
use std::path::PathBuf;

use async_trait::async_trait;
use futures::StreamExt;

use crate::error::AppError;
use crate::models::page::Page;
use crate::models::slug::Slug;

/// Trait for page storage operations.
///
/// Abstracted as a trait so tests can use an in-memory store.
#[async_trait]
pub trait PageStore: Send + Sync {
    /// Read the full body of a page.
    ///
    /// Every failure, including a missing file, is reported as `PageNotFound`.
    async fn read_page(&self, slug: &Slug) -> Result<String, AppError>;

    /// Create or overwrite a page.
    async fn write_page(&self, slug: &Slug, content: &str) -> Result<(), AppError>;

    /// List the slugs of all pages, sorted.
    async fn list_slugs(&self) -> Result<Vec<Slug>, AppError>;
}

/// Filesystem implementation of PageStore: one `<slug>.md` file per page
/// inside a flat data directory.
pub struct FsPageStore {
    data_dir: PathBuf,
}

impl FsPageStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn resolve_path(&self, slug: &Slug) -> PathBuf {
        self.data_dir.join(slug.file_name())
    }
}

#[async_trait]
impl PageStore for FsPageStore {
    async fn read_page(&self, slug: &Slug) -> Result<String, AppError> {
        let path = self.resolve_path(slug);
        tokio::fs::read_to_string(&path).await.map_err(|e| {
            tracing::debug!("Failed to read page '{}' at {}: {e}", slug, path.display());
            AppError::PageNotFound(slug.to_string())
        })
    }

    async fn write_page(&self, slug: &Slug, content: &str) -> Result<(), AppError> {
        tokio::fs::create_dir_all(&self.data_dir)
            .await
            .map_err(|e| {
                AppError::WriteFailed(format!(
                    "Failed to create data directory {}: {e}",
                    self.data_dir.display()
                ))
            })?;

        // Each write gets its own hidden temp file, renamed over the page once
        // complete. Readers only ever see the old or the new page.
        let data_dir = self.data_dir.clone();
        let target = self.resolve_path(slug);
        let content = content.to_owned();
        let result = tokio::task::spawn_blocking(move || -> std::io::Result<()> {
            let mut temp = tempfile::Builder::new()
                .prefix(".")
                .suffix(".tmp")
                .tempfile_in(&data_dir)?;
            temp.write_all(content.as_bytes())?;
            temp.persist(&target).map_err(|e| e.error)?;
            Ok(())
        })
        .await;

        match result {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(AppError::WriteFailed(format!(
                "Failed to write page '{slug}': {e}"
            ))),
            Err(e) => Err(AppError::WriteFailed(format!(
                "Write task for page '{slug}' did not complete: {e}"
            ))),
        }
    }

    async fn list_slugs(&self) -> Result<Vec<Slug>, AppError> {
        let dir_err = |e: std::io::Error| {
            AppError::DirectoryRead(format!("{}: {e}", self.data_dir.display()))
        };

        let mut entries = tokio::fs::read_dir(&self.data_dir).await.map_err(dir_err)?;
        let mut slugs = Vec::new();

        while let Some(entry) = entries.next_entry().await.map_err(dir_err)? {
            // Follows symlinks, matching what `read_page` can open.
            let is_file = tokio::fs::metadata(entry.path())
                .await
                .map(|m| m.is_file())
                .unwrap_or(false);
            if !is_file {
                continue;
            }

            let name = entry.file_name();
            match name.to_str().and_then(Slug::from_file_name) {
                Some(slug) => slugs.push(slug),
                None => tracing::debug!("Skipping non-page entry {:?}", name),
            }
        }

        slugs.sort();
        Ok(slugs)
    }
}

/// Read every page in the store, at most `concurrency` at a time.
///
/// Results keep the order of `list_slugs`. Pages that disappear or cannot be
/// decoded between listing and reading are skipped.
pub async fn load_pages(store: &dyn PageStore, concurrency: usize) -> Result<Vec<Page>, AppError> {
    let slugs = store.list_slugs().await?;

    let results: Vec<_> = futures::stream::iter(slugs)
        .map(|slug| async move {
            let body = store.read_page(&slug).await;
            (slug, body)
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let pages = results
        .into_iter()
        .filter_map(|(slug, body)| match body {
            Ok(body) => Some(Page { slug, body }),
            Err(e) => {
                tracing::warn!("Skipping unreadable page '{}': {e}", slug);
                None
            }
        })
        .collect();

    Ok(pages)
}

use std::path::{Path, PathBuf};

use axum::Router;
use tempfile::TempDir;

use tagwiki::app::{build_router, AppState};
use tagwiki::config::AppConfig;
use tagwiki::tags::TagMode;

/// Holds a temporary data directory and the Axum router wired to it.
///
/// The directory is removed when this struct is dropped.
pub struct TestEnv {
    root: TempDir,
    pub data_dir: PathBuf,
    pub router: Router,
}

impl TestEnv {
    /// Build a router over an empty data directory with default settings.
    pub fn start() -> Self {
        Self::with_config(|config| config)
    }

    /// Build a router whose config has been adjusted by `configure`.
    pub fn with_config(configure: impl FnOnce(AppConfig) -> AppConfig) -> Self {
        let root = tempfile::tempdir().expect("Failed to create temp dir");
        let data_dir = root.path().join("data");
        std::fs::create_dir_all(&data_dir).expect("Failed to create data dir");

        let config = configure(AppConfig::new(&data_dir));
        let router = build_router(AppState::from_config(&config), &config);

        Self {
            root,
            data_dir,
            router,
        }
    }

    pub fn with_tag_mode(tag_mode: TagMode) -> Self {
        Self::with_config(|config| config.with_tag_mode(tag_mode))
    }

    /// Root of the temporary directory (parent of `data_dir`).
    pub fn root(&self) -> &Path {
        self.root.path()
    }

    /// Build an `axum_test::TestServer` from this environment's router.
    pub fn server(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .expect_success_by_default()
            .build(self.router.clone())
    }

    /// Helper: place a page file directly in the data directory.
    pub fn seed(&self, slug: &str, content: &str) {
        std::fs::write(self.data_dir.join(format!("{slug}.md")), content)
            .expect("Failed to seed page");
    }

    /// Helper: place an arbitrary file in the data directory.
    pub fn seed_file(&self, name: &str, content: &[u8]) {
        std::fs::write(self.data_dir.join(name), content).expect("Failed to seed file");
    }

    /// Helper: read a page file straight from disk.
    pub fn read_back(&self, slug: &str) -> Option<String> {
        std::fs::read_to_string(self.data_dir.join(format!("{slug}.md"))).ok()
    }

    /// Remove the data directory so every listing fails.
    pub fn remove_data_dir(&self) {
        std::fs::remove_dir_all(&self.data_dir).expect("Failed to remove data dir");
    }
}

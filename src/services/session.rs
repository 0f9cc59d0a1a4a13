use std::{path::Path, time::Duration};

use async_trait::async_trait;

/// A handle to something on the current page.
#[async_trait]
pub trait Element: Send + Sync + Sized {
    /// Looks up the first descendant matching `selector`; `None` when nothing matches.
    async fn find(&self, selector: &str) -> anyhow::Result<Option<Self>>;
    async fn text(&self) -> anyhow::Result<String>;
    async fn attr(&self, name: &str) -> anyhow::Result<Option<String>>;
    async fn outer_html(&self) -> anyhow::Result<String>;
    async fn click(&self) -> anyhow::Result<()>;
}

/// The browser operations a listing walk needs. Every wait is a single bounded
/// wait; implementations must not retry on their own.
#[async_trait]
pub trait Session: Send + Sync + Sized {
    type Element: Element;

    async fn goto(&self, url: &str) -> anyhow::Result<()>;
    async fn page_source(&self) -> anyhow::Result<String>;
    async fn screenshot(&self, path: &Path) -> anyhow::Result<()>;
    async fn wait_visible(&self, selector: &str, timeout: Duration) -> anyhow::Result<()>;
    async fn wait_clickable(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> anyhow::Result<Self::Element>;
    async fn find_all(&self, selector: &str) -> anyhow::Result<Vec<Self::Element>>;
    async fn find(&self, selector: &str) -> anyhow::Result<Option<Self::Element>>;
    async fn quit(self) -> anyhow::Result<()>;
}

use std::path::{Path, PathBuf};

use anyhow::Context;

use super::Session;

/// Where in a walk things went wrong; names the saved artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureSite {
    RegionSelection,
    InitialLoad,
    NoProducts,
    NextPage,
}

impl FailureSite {
    pub fn stem(&self) -> &'static str {
        match self {
            FailureSite::RegionSelection => "region_selection_error",
            FailureSite::InitialLoad => "initial_load_error",
            FailureSite::NoProducts => "no_products",
            FailureSite::NextPage => "next_page_error",
        }
    }
}

/// Saves the page source and a screenshot of the current page.
#[derive(Debug, Clone)]
pub struct DebugDump {
    dir: PathBuf,
}

impl DebugDump {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DebugDump { dir: dir.into() }
    }

    pub fn html_path(&self, site: FailureSite) -> PathBuf {
        self.dir.join(format!("{}.html", site.stem()))
    }

    pub fn screenshot_path(&self, site: FailureSite) -> PathBuf {
        self.dir.join(format!("{}.png", site.stem()))
    }

    /// Best effort: a failure here is logged and never surfaces to the walk.
    pub async fn capture<S: Session>(&self, session: &S, site: FailureSite) {
        if let Err(e) = self.try_capture(session, site).await {
            log::error!(
                "Failed to save debug data for {}. Error: {:?}",
                site.stem(),
                e
            );
        }
    }

    async fn try_capture<S: Session>(&self, session: &S, site: FailureSite) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;

        let html_path = self.html_path(site);
        let source = session.page_source().await?;
        write_file(&html_path, source.as_bytes())?;

        let screenshot_path = self.screenshot_path(site);
        session.screenshot(&screenshot_path).await?;

        log::info!(
            "Saved debug data: {}, {}",
            html_path.display(),
            screenshot_path.display()
        );
        Ok(())
    }
}

fn write_file(path: &Path, contents: &[u8]) -> anyhow::Result<()> {
    std::fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}

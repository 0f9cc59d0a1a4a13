use anyhow::anyhow;

use crate::{
    configuration::{ListingSettings, Settings, TimeoutSettings},
    domain::product::{Field, Record},
};

use super::{DebugDump, Element, FailureSite, Pacer, Session};

/// Why a walk stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkEnd {
    /// The next control was absent or disabled.
    LastPage,
    /// A loaded page had no item containers.
    NoContainers,
    /// The next page never showed its items after clicking next.
    NavigationFailed,
    PageLimit,
    InitialLoadFailed,
    RegionUnresolved,
}

#[derive(Debug)]
pub struct Traversal {
    pub records: Vec<Record>,
    pub pages: u32,
    pub end: WalkEnd,
}

/// Walks a paginated listing in one pass, collecting one record per item
/// container. Owns the browser session and quits it when the walk ends.
pub struct ListingWalker<S: Session> {
    session: S,
    listing: ListingSettings,
    timeouts: TimeoutSettings,
    page_load: Pacer,
    region_settle: Pacer,
    between_pages: Pacer,
    debug_dump: DebugDump,
}

enum Read<'a> {
    Text,
    Attr(&'a str),
}

impl<S: Session> ListingWalker<S> {
    pub fn new(session: S, settings: &Settings) -> Self {
        ListingWalker {
            session,
            listing: settings.listing.clone(),
            timeouts: settings.timeouts,
            page_load: settings.pacing.page_load.into(),
            region_settle: settings.pacing.region_settle.into(),
            between_pages: settings.pacing.between_pages.into(),
            debug_dump: DebugDump::new(&settings.output.debug_dir),
        }
    }

    pub async fn walk(self, start_url: &str) -> Vec<Record> {
        self.traverse(start_url).await.records
    }

    pub async fn traverse(self, start_url: &str) -> Traversal {
        let mut records = vec![];
        let mut pages = 0;
        let end = self.run(start_url, &mut records, &mut pages).await;

        log::info!(
            "Walk ended ({:?}) after {} pages with {} products",
            end,
            pages,
            records.len()
        );

        if let Err(e) = self.session.quit().await {
            log::error!("Failed to close WebDriver. Error: {:?}", e);
        } else {
            log::info!("WebDriver closed");
        }

        Traversal {
            records,
            pages,
            end,
        }
    }

    async fn run(&self, start_url: &str, records: &mut Vec<Record>, pages: &mut u32) -> WalkEnd {
        log::info!("Navigating to URL: {}", start_url);
        if let Err(e) = self.session.goto(start_url).await {
            log::error!("Failed to load the listing. Error: {:?}", e);
            self.debug_dump
                .capture(&self.session, FailureSite::InitialLoad)
                .await;
            return WalkEnd::InitialLoadFailed;
        }
        self.page_load.pause().await;

        if let Err(e) = self.resolve_region().await {
            log::error!("Failed to select the region. Error: {:?}", e);
            self.debug_dump
                .capture(&self.session, FailureSite::RegionSelection)
                .await;
            return WalkEnd::RegionUnresolved;
        }

        if let Err(e) = self
            .session
            .wait_visible(&self.listing.selectors.item, self.timeouts.load())
            .await
        {
            log::error!("Elements not found after loading. Error: {:?}", e);
            self.debug_dump
                .capture(&self.session, FailureSite::InitialLoad)
                .await;
            return WalkEnd::InitialLoadFailed;
        }

        loop {
            let page_number = *pages + 1;
            log::info!("Scraping page {}", page_number);

            let containers = match self.session.find_all(&self.listing.selectors.item).await {
                Ok(containers) => containers,
                Err(e) => {
                    log::error!("Failed to enumerate products. Error: {:?}", e);
                    vec![]
                }
            };

            if containers.is_empty() {
                log::error!("No products found on page {}", page_number);
                self.debug_dump
                    .capture(&self.session, FailureSite::NoProducts)
                    .await;
                return WalkEnd::NoContainers;
            }

            for container in containers.iter() {
                records.push(self.extract_record(container).await);
            }
            *pages = page_number;
            log::info!(
                "Extracted {} products from page {}",
                containers.len(),
                page_number
            );

            if self.listing.max_pages.is_some_and(|max| *pages >= max) {
                log::info!("Reached the page limit of {}", *pages);
                return WalkEnd::PageLimit;
            }

            match self.next_page().await {
                Ok(true) => {}
                Ok(false) => {
                    log::info!("No more pages to scrape");
                    return WalkEnd::LastPage;
                }
                Err(e) => {
                    log::info!("Pagination ended or an error occurred: {:?}", e);
                    self.debug_dump
                        .capture(&self.session, FailureSite::NextPage)
                        .await;
                    return WalkEnd::NavigationFailed;
                }
            }
        }
    }

    async fn resolve_region(&self) -> anyhow::Result<()> {
        let source = self.session.page_source().await?;
        if !source.contains(&self.listing.region.interstitial_marker) {
            return Ok(());
        }

        log::info!(
            "International region selection detected. Selecting {}",
            self.listing.region.selector
        );
        let control = self
            .session
            .wait_clickable(&self.listing.region.selector, self.timeouts.region())
            .await?;
        control.click().await?;
        log::info!("Region selected successfully");

        self.region_settle.pause().await;
        Ok(())
    }

    /// Moves to the next page. `Ok(false)` when there is nowhere to go.
    async fn next_page(&self) -> anyhow::Result<bool> {
        let Some(next) = self
            .session
            .find(&self.listing.selectors.next_page)
            .await?
        else {
            return Ok(false);
        };

        // No class at all means its state can't be read; treat it as the end.
        let Some(class) = next.attr("class").await? else {
            log::info!("Next control has no class attribute");
            return Ok(false);
        };
        if class.contains(&self.listing.disabled_marker) {
            return Ok(false);
        }

        self.between_pages.pause().await;
        next.click().await?;
        log::info!("Navigating to the next page");

        self.session
            .wait_visible(&self.listing.selectors.item, self.timeouts.load())
            .await?;
        Ok(true)
    }

    async fn extract_record(&self, container: &S::Element) -> Record {
        let selectors = &self.listing.selectors;

        let name = match lookup(container, &selectors.name, Read::Text).await {
            Ok(name) => Field::Found(name),
            Err(e) => {
                log::warn!("Failed to extract product name. Error: {:?}", e);
                if let Ok(html) = container.outer_html().await {
                    log::debug!("Container HTML: {}", html);
                }
                Field::Missing
            }
        };

        Record {
            name,
            price: settle(
                lookup(container, &selectors.price, Read::Text).await,
                "price",
            ),
            image: settle(
                lookup(container, &selectors.image, Read::Attr("src")).await,
                "image",
            ),
        }
    }
}

async fn lookup<E: Element>(container: &E, selector: &str, read: Read<'_>) -> anyhow::Result<String> {
    let element = container
        .find(selector)
        .await?
        .ok_or_else(|| anyhow!("no element matches {}", selector))?;

    match read {
        Read::Text => element.text().await,
        Read::Attr(name) => element
            .attr(name)
            .await?
            .ok_or_else(|| anyhow!("{} has no {} attribute", selector, name)),
    }
}

fn settle(value: anyhow::Result<String>, what: &str) -> Field {
    match value {
        Ok(value) => Field::Found(value),
        Err(e) => {
            log::warn!("Failed to extract product {}. Error: {:?}", what, e);
            Field::Missing
        }
    }
}

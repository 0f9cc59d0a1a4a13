//! In-memory listing used to drive the walker in tests.

use std::{
    path::Path,
    sync::{Arc, Mutex},
    time::Duration,
};

use anyhow::anyhow;
use async_trait::async_trait;

use super::{Element, Session};

pub const ITEM: &str = "li.sku-item";
pub const NAME: &str = "h4.sku-title a";
pub const PRICE: &str = "div.priceView-customer-price span";
pub const IMAGE: &str = "img.product-image";
pub const NEXT: &str = "button[aria-label='Next page']";
pub const REGION: &str = "a.us-link";
pub const INTERSTITIAL: &str = "Choose a country";

#[derive(Debug, Clone, Default)]
pub struct FakeItem {
    pub name: Option<String>,
    pub price: Option<String>,
    pub image: Option<String>,
    /// Every lookup inside this container errors instead of coming back empty.
    pub broken: bool,
}

impl FakeItem {
    pub fn complete(n: usize) -> Self {
        FakeItem {
            name: Some(format!("Product {}", n)),
            price: Some(format!("${}.99", n)),
            image: Some(format!("https://img.example/{}.jpg", n)),
            broken: false,
        }
    }

    pub fn without_price(n: usize) -> Self {
        FakeItem {
            price: None,
            ..FakeItem::complete(n)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextControl {
    Absent,
    Enabled,
    Disabled,
    /// Present and enabled, but clicking it errors.
    Unclickable,
    /// Present with no class attribute at all.
    Classless,
}

#[derive(Debug, Clone)]
pub struct FakePage {
    pub items: Vec<FakeItem>,
    pub next: NextControl,
    /// Whether the item marker ever becomes visible on this page.
    pub loads: bool,
}

impl Default for FakePage {
    fn default() -> Self {
        FakePage {
            items: vec![],
            next: NextControl::Absent,
            loads: true,
        }
    }
}

impl FakePage {
    pub fn with_items(items: Vec<FakeItem>, next: NextControl) -> Self {
        FakePage {
            items,
            next,
            loads: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interstitial {
    None,
    Resolvable,
    Unresolvable,
}

#[derive(Debug, Clone)]
pub struct FakeListing {
    pub pages: Vec<FakePage>,
    pub interstitial: Interstitial,
    /// Clicking "next" on the last page wraps back to the first.
    pub cycle: bool,
    pub goto_fails: bool,
}

impl FakeListing {
    pub fn new(pages: Vec<FakePage>) -> Self {
        FakeListing {
            pages,
            interstitial: Interstitial::None,
            cycle: false,
            goto_fails: false,
        }
    }
}

#[derive(Debug, Default)]
pub struct FakeState {
    pub visited: Vec<String>,
    pub page: usize,
    pub region_pending: bool,
    pub region_clicks: usize,
    pub next_clicks: usize,
    pub marker_waits: usize,
    pub quits: usize,
}

pub struct FakeSession {
    listing: Arc<FakeListing>,
    state: Arc<Mutex<FakeState>>,
}

impl FakeSession {
    pub fn new(listing: FakeListing) -> Self {
        let state = FakeState {
            region_pending: listing.interstitial != Interstitial::None,
            ..FakeState::default()
        };
        FakeSession {
            listing: Arc::new(listing),
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Shared view of the session state that outlives the session itself.
    pub fn probe(&self) -> Arc<Mutex<FakeState>> {
        self.state.clone()
    }

    fn current_page(&self) -> Option<&FakePage> {
        let state = self.state.lock().unwrap();
        if state.region_pending {
            return None;
        }
        self.listing.pages.get(state.page)
    }
}

pub enum FakeElement {
    Item(FakeItem),
    Text(String),
    Image(Option<String>),
    Next {
        control: NextControl,
        listing: Arc<FakeListing>,
        state: Arc<Mutex<FakeState>>,
    },
    Region(Arc<Mutex<FakeState>>),
}

#[async_trait]
impl Element for FakeElement {
    async fn find(&self, selector: &str) -> anyhow::Result<Option<Self>> {
        let FakeElement::Item(item) = self else {
            return Ok(None);
        };
        if item.broken {
            return Err(anyhow!("stale element reference"));
        }
        Ok(match selector {
            NAME => item.name.clone().map(FakeElement::Text),
            PRICE => item.price.clone().map(FakeElement::Text),
            IMAGE => item
                .image
                .as_ref()
                .map(|src| FakeElement::Image(Some(src.clone()))),
            _ => None,
        })
    }

    async fn text(&self) -> anyhow::Result<String> {
        match self {
            FakeElement::Text(text) => Ok(text.clone()),
            _ => Ok(String::new()),
        }
    }

    async fn attr(&self, name: &str) -> anyhow::Result<Option<String>> {
        Ok(match (self, name) {
            (FakeElement::Image(src), "src") => src.clone(),
            (FakeElement::Next { control, .. }, "class") => match control {
                NextControl::Disabled => Some("sku-list-page-next disabled".to_string()),
                NextControl::Classless => None,
                _ => Some("sku-list-page-next".to_string()),
            },
            _ => None,
        })
    }

    async fn outer_html(&self) -> anyhow::Result<String> {
        Ok(match self {
            FakeElement::Item(item) => format!("<li class=\"sku-item\">{:?}</li>", item),
            _ => "<span></span>".to_string(),
        })
    }

    async fn click(&self) -> anyhow::Result<()> {
        match self {
            FakeElement::Next {
                control: NextControl::Enabled,
                listing,
                state,
            } => {
                let mut state = state.lock().unwrap();
                state.next_clicks += 1;
                state.page += 1;
                if listing.cycle && state.page >= listing.pages.len() {
                    state.page = 0;
                }
                Ok(())
            }
            FakeElement::Region(state) => {
                let mut state = state.lock().unwrap();
                state.region_clicks += 1;
                state.region_pending = false;
                Ok(())
            }
            _ => Err(anyhow!("element not interactable")),
        }
    }
}

#[async_trait]
impl Session for FakeSession {
    type Element = FakeElement;

    async fn goto(&self, url: &str) -> anyhow::Result<()> {
        self.state.lock().unwrap().visited.push(url.to_string());
        if self.listing.goto_fails {
            return Err(anyhow!("net::ERR_NAME_NOT_RESOLVED at {}", url));
        }
        Ok(())
    }

    async fn page_source(&self) -> anyhow::Result<String> {
        let state = self.state.lock().unwrap();
        if state.region_pending {
            return Ok(format!("<html><h1>{}</h1></html>", INTERSTITIAL));
        }
        Ok(format!("<html><body>listing page {}</body></html>", state.page + 1))
    }

    async fn screenshot(&self, path: &Path) -> anyhow::Result<()> {
        std::fs::write(path, b"\x89PNG")?;
        Ok(())
    }

    async fn wait_visible(&self, selector: &str, timeout: Duration) -> anyhow::Result<()> {
        self.state.lock().unwrap().marker_waits += 1;
        match self.current_page() {
            Some(page) if selector == ITEM && page.loads => Ok(()),
            _ => Err(anyhow!("{} not visible after {:?}", selector, timeout)),
        }
    }

    async fn wait_clickable(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> anyhow::Result<FakeElement> {
        let state = self.state.lock().unwrap();
        if selector == REGION
            && state.region_pending
            && self.listing.interstitial == Interstitial::Resolvable
        {
            return Ok(FakeElement::Region(self.state.clone()));
        }
        Err(anyhow!("{} not clickable after {:?}", selector, timeout))
    }

    async fn find_all(&self, selector: &str) -> anyhow::Result<Vec<FakeElement>> {
        match self.current_page() {
            Some(page) if selector == ITEM => Ok(page
                .items
                .iter()
                .cloned()
                .map(FakeElement::Item)
                .collect()),
            _ => Ok(vec![]),
        }
    }

    async fn find(&self, selector: &str) -> anyhow::Result<Option<FakeElement>> {
        let Some(page) = self.current_page() else {
            return Ok(None);
        };
        if selector != NEXT {
            return Ok(None);
        }
        Ok(match page.next {
            NextControl::Absent => None,
            control => Some(FakeElement::Next {
                control,
                listing: self.listing.clone(),
                state: self.state.clone(),
            }),
        })
    }

    async fn quit(self) -> anyhow::Result<()> {
        self.state.lock().unwrap().quits += 1;
        Ok(())
    }
}

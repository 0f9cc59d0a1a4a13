use std::{path::Path, time::Duration};

use anyhow::Context;
use async_trait::async_trait;
use thirtyfour::{
    prelude::*, CapabilitiesHelper, ChromeCapabilities, ChromiumLikeCapabilities, Proxy,
};

use crate::configuration::BrowserSettings;

use super::{Element, Session};

const CHROME_ARGS: [&str; 3] = [
    "--no-sandbox",
    "--disable-dev-shm-usage",
    "--disable-blink-features=AutomationControlled",
];

pub struct Droid {
    pub driver: WebDriver,
    poll_interval: Duration,
}

impl Droid {
    pub async fn new(settings: &BrowserSettings) -> anyhow::Result<Self> {
        log::info!("Initializing WebDriver at {}", settings.webdriver_url);
        let caps = chrome_capabilities(settings)?;

        let driver = WebDriver::new(settings.webdriver_url.as_str(), caps)
            .await
            .with_context(|| format!("Failed to connect to {}", settings.webdriver_url))?;
        driver.maximize_window().await?;

        Ok(Droid {
            driver,
            poll_interval: settings.poll_interval(),
        })
    }
}

fn chrome_capabilities(settings: &BrowserSettings) -> anyhow::Result<ChromeCapabilities> {
    let mut caps = DesiredCapabilities::chrome();

    for arg in CHROME_ARGS {
        caps.add_arg(arg)?;
    }
    caps.add_arg(&format!("--user-agent={}", settings.user_agent))?;

    if settings.headless {
        caps.set_headless()?;
    }

    if let Some(proxy) = &settings.proxy {
        caps.set_proxy(Proxy::Manual {
            ftp_proxy: None,
            http_proxy: Some(proxy.clone()),
            ssl_proxy: Some(proxy.clone()),
            socks_proxy: None,
            socks_version: None,
            socks_username: None,
            socks_password: None,
            no_proxy: None,
        })?;
    }

    Ok(caps)
}

#[async_trait]
impl Element for WebElement {
    async fn find(&self, selector: &str) -> anyhow::Result<Option<Self>> {
        Ok(self.query(By::Css(selector)).nowait().first_opt().await?)
    }

    async fn text(&self) -> anyhow::Result<String> {
        Ok(WebElement::text(self).await?)
    }

    async fn attr(&self, name: &str) -> anyhow::Result<Option<String>> {
        Ok(WebElement::attr(self, name).await?)
    }

    async fn outer_html(&self) -> anyhow::Result<String> {
        Ok(WebElement::outer_html(self).await?)
    }

    async fn click(&self) -> anyhow::Result<()> {
        Ok(WebElement::click(self).await?)
    }
}

#[async_trait]
impl Session for Droid {
    type Element = WebElement;

    async fn goto(&self, url: &str) -> anyhow::Result<()> {
        self.driver
            .goto(url)
            .await
            .with_context(|| format!("Failed to navigate to {}", url))
    }

    async fn page_source(&self) -> anyhow::Result<String> {
        Ok(self.driver.source().await?)
    }

    async fn screenshot(&self, path: &Path) -> anyhow::Result<()> {
        self.driver
            .screenshot(path)
            .await
            .with_context(|| format!("Failed to save screenshot to {}", path.display()))
    }

    async fn wait_visible(&self, selector: &str, timeout: Duration) -> anyhow::Result<()> {
        self.driver
            .query(By::Css(selector))
            .wait(timeout, self.poll_interval)
            .and_displayed()
            .first()
            .await
            .with_context(|| format!("{} not visible after {:?}", selector, timeout))?;
        Ok(())
    }

    async fn wait_clickable(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> anyhow::Result<WebElement> {
        self.driver
            .query(By::Css(selector))
            .wait(timeout, self.poll_interval)
            .and_clickable()
            .first()
            .await
            .with_context(|| format!("{} not clickable after {:?}", selector, timeout))
    }

    async fn find_all(&self, selector: &str) -> anyhow::Result<Vec<WebElement>> {
        Ok(self.driver.find_all(By::Css(selector)).await?)
    }

    async fn find(&self, selector: &str) -> anyhow::Result<Option<WebElement>> {
        Ok(self
            .driver
            .query(By::Css(selector))
            .nowait()
            .first_opt()
            .await?)
    }

    async fn quit(self) -> anyhow::Result<()> {
        Ok(self.driver.quit().await?)
    }
}

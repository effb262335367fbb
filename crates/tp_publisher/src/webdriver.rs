use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use fantoccini::actions::{InputSource, KeyAction, KeyActions};
use fantoccini::error::CmdError;
use fantoccini::key::Key;
use fantoccini::wd::TimeoutConfiguration;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{json, Map, Value};
use tokio::time::{sleep, Instant};
use tp_core::{AppConfig, Error, Result};
use tracing::info;

use crate::browser::Browser;

const IMPLICIT_WAIT: Duration = Duration::from_secs(3);
const POLL_INTERVAL: Duration = Duration::from_millis(250);

const CHROME_ARGS: [&str; 8] = [
    "--start-maximized",
    "--no-sandbox",
    "--disable-dev-shm-usage",
    "--disable-extensions",
    "--disable-gpu",
    "--disable-infobars",
    "--disable-notifications",
    "--new-window",
];

/// Puts `arguments[0]` on the clipboard from inside the page.
const COPY_SCRIPT: &str = r#"
const area = document.createElement('textarea');
area.value = arguments[0];
document.body.appendChild(area);
area.select();
document.execCommand('copy');
area.remove();
"#;

/// Chrome arguments for a session that reuses the profile in `profile_dir`.
pub fn chrome_args(profile_dir: &Path) -> Vec<String> {
    CHROME_ARGS
        .iter()
        .map(|arg| arg.to_string())
        .chain(std::iter::once(format!("--user-data-dir={}", profile_dir.display())))
        .collect()
}

/// Modifier of the paste shortcut on this host.
pub fn paste_modifier() -> Key {
    if cfg!(target_os = "macos") {
        Key::Meta
    } else {
        Key::Control
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

fn driver_error(selector: &str, err: CmdError) -> Error {
    Error::Browser(format!("{}: {}", selector, err))
}

/// A Chrome session driven over the WebDriver protocol.
pub struct WebDriverBrowser {
    client: Client,
    closed: bool,
}

impl WebDriverBrowser {
    /// Starts a Chrome session on the configured WebDriver endpoint.
    pub async fn connect(config: &AppConfig) -> Result<Self> {
        let profile_dir = absolute(&config.profile_dir)?;

        let mut capabilities = Map::new();
        capabilities.insert(
            "goog:chromeOptions".to_string(),
            json!({ "args": chrome_args(&profile_dir) }),
        );

        let mut builder = ClientBuilder::native();
        builder.capabilities(capabilities);
        let client = builder
            .connect(&config.webdriver_url)
            .await
            .map_err(|e| Error::DriverInit(format!("{}: {}", config.webdriver_url, e)))?;

        client
            .update_timeouts(TimeoutConfiguration::new(None, None, Some(IMPLICIT_WAIT)))
            .await
            .map_err(|e| Error::DriverInit(e.to_string()))?;

        info!("🌐 Chrome WebDriver session started ({})", config.webdriver_url);
        Ok(Self {
            client,
            closed: false,
        })
    }
}

#[async_trait]
impl Browser for WebDriverBrowser {
    async fn goto(&mut self, url: &str) -> Result<()> {
        self.client.goto(url).await.map_err(|e| driver_error(url, e))
    }

    async fn is_present(&mut self, selector: &str) -> Result<bool> {
        match self.client.find(Locator::Css(selector)).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_no_such_element() => Ok(false),
            Err(e) => Err(driver_error(selector, e)),
        }
    }

    async fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<()> {
        match self
            .client
            .wait()
            .at_most(timeout)
            .every(POLL_INTERVAL)
            .for_element(Locator::Css(selector))
            .await
        {
            Ok(_) => Ok(()),
            Err(CmdError::WaitTimeout) => Err(Error::WaitTimeout(selector.to_string())),
            Err(e) => Err(driver_error(selector, e)),
        }
    }

    async fn wait_for_visible(&mut self, selector: &str, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Ok(elements) = self.client.find_all(Locator::Css(selector)).await {
                for element in elements {
                    if element.is_displayed().await.unwrap_or(false) {
                        return Ok(());
                    }
                }
            }
            if Instant::now() >= deadline {
                return Err(Error::WaitTimeout(selector.to_string()));
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    async fn click(&mut self, selector: &str) -> Result<()> {
        let element = self
            .client
            .find(Locator::Css(selector))
            .await
            .map_err(|e| driver_error(selector, e))?;
        element.click().await.map_err(|e| driver_error(selector, e))
    }

    async fn fill(&mut self, selector: &str, text: &str) -> Result<()> {
        let element = self
            .client
            .find(Locator::Css(selector))
            .await
            .map_err(|e| driver_error(selector, e))?;
        element.click().await.map_err(|e| driver_error(selector, e))?;
        element.clear().await.map_err(|e| driver_error(selector, e))?;
        element
            .send_keys(text)
            .await
            .map_err(|e| driver_error(selector, e))
    }

    async fn texts(&mut self, selector: &str) -> Result<Vec<String>> {
        let elements = self
            .client
            .find_all(Locator::Css(selector))
            .await
            .map_err(|e| driver_error(selector, e))?;
        let mut texts = Vec::with_capacity(elements.len());
        for element in elements {
            texts.push(element.text().await.map_err(|e| driver_error(selector, e))?);
        }
        Ok(texts)
    }

    async fn click_nth(&mut self, selector: &str, index: usize) -> Result<()> {
        let elements = self
            .client
            .find_all(Locator::Css(selector))
            .await
            .map_err(|e| driver_error(selector, e))?;
        let element = elements
            .get(index)
            .ok_or_else(|| Error::Browser(format!("{}: no element at index {}", selector, index)))?;
        element.click().await.map_err(|e| driver_error(selector, e))
    }

    async fn type_entry(&mut self, text: &str) -> Result<()> {
        let element = self
            .client
            .active_element()
            .await
            .map_err(|e| driver_error("active element", e))?;
        element
            .send_keys(&format!("{}{}", text, char::from(Key::Enter)))
            .await
            .map_err(|e| driver_error("active element", e))
    }

    async fn paste(&mut self, selector: &str, text: &str) -> Result<()> {
        self.client
            .execute(COPY_SCRIPT, vec![Value::String(text.to_string())])
            .await
            .map_err(|e| driver_error("clipboard", e))?;
        self.click(selector).await?;

        let modifier: char = paste_modifier().into();
        let shortcut = KeyActions::new("paste".to_string())
            .then(KeyAction::Down { value: modifier })
            .then(KeyAction::Down { value: 'v' })
            .then(KeyAction::Up { value: 'v' })
            .then(KeyAction::Up { value: modifier });
        self.client
            .perform_actions(shortcut)
            .await
            .map_err(|e| driver_error(selector, e))?;
        self.client
            .release_actions()
            .await
            .map_err(|e| driver_error(selector, e))
    }

    async fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.client
            .clone()
            .close()
            .await
            .map_err(|e| Error::Browser(format!("closing session: {}", e)))?;
        info!("🌐 Browser session closed");
        Ok(())
    }
}

use std::time::Duration;

use async_trait::async_trait;
use tp_core::Result;

/// The browser operations the publisher needs. Elements are addressed by CSS selector.
///
/// Waits are bounded polls; a wait that runs out returns `Error::WaitTimeout`.
#[async_trait]
pub trait Browser: Send {
    async fn goto(&mut self, url: &str) -> Result<()>;

    /// Whether a matching element exists right now (subject to the driver's implicit wait).
    async fn is_present(&mut self, selector: &str) -> Result<bool>;

    async fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<()>;

    async fn wait_for_visible(&mut self, selector: &str, timeout: Duration) -> Result<()>;

    async fn click(&mut self, selector: &str) -> Result<()>;

    /// Clears the field and types `text` into it.
    async fn fill(&mut self, selector: &str, text: &str) -> Result<()>;

    /// Visible text of every matching element, in document order.
    async fn texts(&mut self, selector: &str) -> Result<Vec<String>>;

    async fn click_nth(&mut self, selector: &str, index: usize) -> Result<()>;

    /// Types `text` into the focused element and commits it with Enter.
    async fn type_entry(&mut self, text: &str) -> Result<()>;

    /// Pastes `text` into the element through the clipboard and the host's paste shortcut.
    async fn paste(&mut self, selector: &str, text: &str) -> Result<()>;

    /// Ends the session. Safe to call once at shutdown.
    async fn close(&mut self) -> Result<()>;

    async fn wait_and_click(&mut self, selector: &str, timeout: Duration) -> Result<()> {
        self.wait_for_visible(selector, timeout).await?;
        self.click(selector).await
    }
}

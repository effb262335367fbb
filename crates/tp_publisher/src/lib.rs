pub mod browser;
pub mod publisher;
pub mod report;
pub mod tistory;
pub mod webdriver;

pub use browser::Browser;
pub use publisher::{Publisher, SessionState, Timeouts};
pub use report::{PublishReport, Step, StepOutcome};
pub use webdriver::WebDriverBrowser;

pub mod prelude {
    pub use super::browser::Browser;
    pub use super::publisher::{Publisher, SessionState};
    pub use super::webdriver::WebDriverBrowser;
    pub use tp_core::{Error, Result};
}

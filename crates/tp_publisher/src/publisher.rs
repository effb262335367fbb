use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tp_core::logging::Logger;
use tp_core::{AppConfig, ArticleDraft, ArticleGenerator, Error, RecordStore, Result, VideoRecord};

use crate::browser::Browser;
use crate::report::{PublishReport, Step};
use crate::tistory;

/// Most tags entered per post.
pub const MAX_TAGS: usize = 5;

/// Bounds for every wait and pause in the login and publish flows.
#[derive(Debug, Clone, Copy)]
pub struct Timeouts {
    pub element: Duration,
    pub editor: Duration,
    pub category: Duration,
    pub login: Duration,
    pub save: Duration,
    pub pause: Duration,
    pub tag_pause: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            element: Duration::from_secs(10),
            editor: Duration::from_secs(6),
            category: Duration::from_secs(5),
            login: Duration::from_secs(60),
            save: Duration::from_secs(30),
            pause: Duration::from_secs(1),
            tag_pause: Duration::from_millis(300),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Authenticated,
    /// Login could not be confirmed; publishing is attempted anyway.
    Unverified,
}

/// Tags to enter: blanks dropped, the rest trimmed, at most `MAX_TAGS`.
pub fn select_tags(tags: &[String]) -> Vec<&str> {
    tags.iter()
        .map(|tag| tag.trim())
        .filter(|tag| !tag.is_empty())
        .take(MAX_TAGS)
        .collect()
}

/// Writes a generated article into the Tistory editor and saves it.
pub struct Publisher {
    generator: Arc<dyn ArticleGenerator>,
    store: Arc<dyn RecordStore>,
    blog_url: String,
    category: String,
    credentials: Option<(String, String)>,
    timeouts: Timeouts,
    log: Logger,
}

impl Publisher {
    pub fn new(config: &AppConfig, generator: Arc<dyn ArticleGenerator>, store: Arc<dyn RecordStore>) -> Self {
        Self {
            generator,
            store,
            blog_url: config.blog_url(),
            category: config.category.clone(),
            credentials: config
                .kakao_credentials()
                .map(|(id, pw)| (id.to_string(), pw.to_string())),
            timeouts: Timeouts::default(),
            log: Logger::new().with_prefix("📝"),
        }
    }

    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Signs in through the Kakao hand-off unless the profile already has a session.
    ///
    /// Never fails: when the login cannot be confirmed the session is `Unverified`
    /// and the caller goes on, since the editor step will fail on its own if needed.
    pub async fn login(&self, browser: &mut dyn Browser) -> SessionState {
        let log = self.log.with_prefix("[login]");
        match self.try_login(browser, &log).await {
            Ok(()) => SessionState::Authenticated,
            Err(e) => {
                let e = match e {
                    Error::LoginTimeout(_) | Error::ConfigMissing(_) => e,
                    other => Error::ui_step("login", other),
                };
                log.warn(&format!("{}; continuing without a confirmed session", e));
                SessionState::Unverified
            }
        }
    }

    async fn try_login(&self, browser: &mut dyn Browser, log: &Logger) -> Result<()> {
        browser.goto(tistory::HOME_URL).await?;
        if browser.is_present(tistory::PROFILE_LINK).await? {
            log.info("Already logged in");
            return Ok(());
        }

        let (id, pw) = self
            .credentials
            .as_ref()
            .ok_or_else(|| Error::ConfigMissing("Kakao login credentials".to_string()))?;
        let t = &self.timeouts;

        browser.goto(tistory::LOGIN_URL).await?;
        browser.click(tistory::KAKAO_LOGIN_LINK).await?;
        browser.wait_for(tistory::KAKAO_ID_INPUT, t.element).await?;
        browser.fill(tistory::KAKAO_ID_INPUT, id).await?;
        browser.wait_for(tistory::KAKAO_PASSWORD_INPUT, t.element).await?;
        browser.fill(tistory::KAKAO_PASSWORD_INPUT, pw).await?;
        browser.wait_and_click(tistory::KAKAO_SUBMIT, t.element).await?;

        log.info(&format!("Waiting up to {}s for the login to complete", t.login.as_secs()));
        browser
            .wait_for(tistory::PROFILE_LINK, t.login)
            .await
            .map_err(|e| match e {
                Error::WaitTimeout(_) => Error::LoginTimeout(t.login.as_secs()),
                other => other,
            })?;
        log.info("Login complete");
        Ok(())
    }

    /// Publishes the record at `record_path`; true only when the save was confirmed.
    pub async fn publish(&self, browser: &mut dyn Browser, record_path: &Path) -> bool {
        let report = self.publish_report(browser, record_path).await;
        if report.succeeded() {
            self.log.info("✅ Post saved");
        } else {
            for failure in report.failures().filter(|o| o.step.is_fatal()) {
                self.log.error(&format!(
                    "{} failed: {}",
                    failure.step,
                    failure.error.as_deref().unwrap_or("unknown error")
                ));
            }
        }
        report.succeeded()
    }

    /// Runs every step, stopping at the first fatal failure.
    pub async fn publish_report(&self, browser: &mut dyn Browser, record_path: &Path) -> PublishReport {
        let mut report = PublishReport::default();

        let loaded = self.store.read_record(record_path).await;
        let Some(record) = self.track(&mut report, Step::LoadRecord, loaded) else {
            return report;
        };
        let drafted = self.draft(&record).await;
        let Some(draft) = self.track(&mut report, Step::Generate, drafted) else {
            return report;
        };

        let opened = self.open_editor(browser).await;
        let Some(()) = self.track(&mut report, Step::OpenEditor, opened) else {
            return report;
        };
        let titled = self.fill_title(browser, &draft.title).await;
        let Some(()) = self.track(&mut report, Step::Title, titled) else {
            return report;
        };
        let filled = self.fill_body(browser, &draft.body_markup).await;
        let Some(()) = self.track(&mut report, Step::Body, filled) else {
            return report;
        };

        let categorized = self.select_category(browser).await;
        self.track(&mut report, Step::Category, categorized);
        let tagged = self.enter_tags(browser, &record.tags).await;
        self.track(&mut report, Step::Tags, tagged);

        let saved = self.save(browser).await;
        self.track(&mut report, Step::Save, saved);
        report
    }

    fn track<T>(&self, report: &mut PublishReport, step: Step, result: Result<T>) -> Option<T> {
        let log = self.log.with_prefix(format!("[{}]", step));
        match &result {
            Ok(_) => log.debug("ok"),
            Err(e) if step.is_fatal() => log.error(&e.to_string()),
            Err(e) => log.warn(&format!("{} (continuing)", e)),
        }
        report.record(step, result)
    }

    async fn draft(&self, record: &VideoRecord) -> Result<ArticleDraft> {
        self.log.info(&format!("🧠 Generating article with {}", self.generator.name()));
        let markup = self.generator.generate_article(record).await?;
        let draft = tp_inference::convert(&markup, &record.title);
        self.log.info(&format!("Title: {}", draft.title));
        Ok(draft)
    }

    async fn open_editor(&self, browser: &mut dyn Browser) -> Result<()> {
        browser.goto(&tistory::write_url(&self.blog_url)).await?;
        browser.wait_for(tistory::EDITOR, self.timeouts.editor).await
    }

    async fn fill_title(&self, browser: &mut dyn Browser, title: &str) -> Result<()> {
        browser.fill(tistory::TITLE_INPUT, title).await
    }

    async fn fill_body(&self, browser: &mut dyn Browser, html: &str) -> Result<()> {
        browser.click(tistory::HTML_MODE_BUTTON).await?;
        sleep(self.timeouts.pause).await;
        browser.paste(tistory::HTML_EDITOR, html).await?;
        sleep(self.timeouts.pause).await;
        Ok(())
    }

    async fn select_category(&self, browser: &mut dyn Browser) -> Result<()> {
        let log = self.log.with_prefix("[category]");
        browser
            .wait_and_click(tistory::CATEGORY_BUTTON, self.timeouts.category)
            .await?;
        browser
            .wait_for(tistory::CATEGORY_ITEMS, self.timeouts.category)
            .await?;

        let names = browser.texts(tistory::CATEGORY_ITEMS).await?;
        match names.iter().position(|name| name.contains(&self.category)) {
            Some(index) => {
                browser.click_nth(tistory::CATEGORY_ITEMS, index).await?;
                log.info(&format!("Category set to '{}'", self.category));
            }
            None => log.info(&format!(
                "Category '{}' not found; keeping the default category",
                self.category
            )),
        }
        Ok(())
    }

    /// Returns how many tags were entered.
    async fn enter_tags(&self, browser: &mut dyn Browser, tags: &[String]) -> Result<usize> {
        let tags = select_tags(tags);
        if tags.is_empty() {
            return Ok(0);
        }

        browser.click(tistory::TAG_INPUT).await?;
        for tag in &tags {
            browser.type_entry(tag).await?;
            sleep(self.timeouts.tag_pause).await;
        }
        Ok(tags.len())
    }

    async fn save(&self, browser: &mut dyn Browser) -> Result<()> {
        let t = &self.timeouts;
        browser.click(tistory::SAVE_BUTTON).await?;
        browser.wait_and_click(tistory::CONFIRM_BUTTON, t.element).await?;
        browser
            .wait_for_visible(tistory::COMPLETE_LAYER, t.save)
            .await
            .map_err(|e| match e {
                Error::WaitTimeout(_) => Error::SaveTimeout(t.save.as_secs()),
                other => other,
            })
    }
}

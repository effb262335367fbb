use std::io::Write;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use clap::Parser;
use futures::FutureExt;
use tokio::io::{AsyncBufRead, BufReader};
use tp_core::config::{
    DEFAULT_BLOG, DEFAULT_CATEGORY, DEFAULT_GEMINI_MODEL, DEFAULT_PROFILE_DIR, DEFAULT_RECORDS_DIR,
    DEFAULT_WEBDRIVER_URL,
};
use tp_core::logging::init_logging;
use tp_core::{AppConfig, Error, RecordStore, Result};
use tp_fetcher::MetadataFetcher;
use tp_publisher::{Browser, Publisher, SessionState, WebDriverBrowser};
use tp_storage::JsonRecordStore;
use tracing::{error, info, warn};

mod menu;

use menu::{run_menu, Pipeline};

/// Turns YouTube videos into Tistory posts written by Gemini.
///
/// Every flag falls back to its environment variable, then to `.env`.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[arg(long, env = "YOUTUBE_API_KEY", hide_env_values = true)]
    youtube_api_key: Option<String>,
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    gemini_api_key: Option<String>,
    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_GEMINI_MODEL)]
    gemini_model: String,
    #[arg(long, env = "KAKAO_ID")]
    kakao_id: Option<String>,
    #[arg(long, env = "KAKAO_PW", hide_env_values = true)]
    kakao_pw: Option<String>,
    /// Blog account id, as in https://<blog>.tistory.com
    #[arg(long, env = "TISTORY_BLOG", default_value = DEFAULT_BLOG)]
    blog: String,
    #[arg(long, env = "TISTORY_CATEGORY", default_value = DEFAULT_CATEGORY)]
    category: String,
    /// Where fetched video records are written
    #[arg(long, env = "TUBEPOST_RECORDS_DIR", default_value = DEFAULT_RECORDS_DIR)]
    records_dir: PathBuf,
    #[arg(long, env = "WEBDRIVER_URL", default_value = DEFAULT_WEBDRIVER_URL)]
    webdriver_url: String,
    /// Chrome profile kept between runs so the login survives
    #[arg(long, env = "TUBEPOST_PROFILE_DIR", default_value = DEFAULT_PROFILE_DIR)]
    profile_dir: PathBuf,
}

impl From<Cli> for AppConfig {
    fn from(cli: Cli) -> Self {
        AppConfig {
            youtube_api_key: cli.youtube_api_key,
            gemini_api_key: cli.gemini_api_key,
            gemini_model: cli.gemini_model,
            kakao_id: cli.kakao_id,
            kakao_pw: cli.kakao_pw,
            blog: cli.blog,
            category: cli.category,
            records_dir: cli.records_dir,
            webdriver_url: cli.webdriver_url,
            profile_dir: cli.profile_dir,
        }
    }
}

/// One browser session shared by every post made from the menu.
struct Session<B> {
    fetcher: MetadataFetcher,
    publisher: Publisher,
    browser: B,
}

#[async_trait]
impl<B: Browser> Pipeline for Session<B> {
    async fn fetch(&mut self, query: &str) -> Result<PathBuf> {
        self.fetcher.fetch(query).await
    }

    async fn publish(&mut self, record_path: &Path) -> bool {
        self.publisher.publish(&mut self.browser, record_path).await
    }
}

impl<B: Browser> Session<B> {
    /// Logs in, runs the menu and closes the browser however the menu ends.
    async fn run<R, W>(&mut self, input: R, out: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        if self.publisher.login(&mut self.browser).await == SessionState::Unverified {
            warn!("⚠️ Login not confirmed; posts may fail at the editor");
        }

        let outcome = AssertUnwindSafe(run_menu(input, out, &mut *self))
            .catch_unwind()
            .await;

        if let Err(e) = self.browser.close().await {
            warn!("⚠️ {}", e);
        }

        match outcome {
            Ok(result) => result,
            Err(_) => Err(Error::Browser("menu loop panicked".to_string())),
        }
    }
}

async fn run(config: AppConfig) -> anyhow::Result<()> {
    config.validate()?;

    let store: Arc<dyn RecordStore> = Arc::new(JsonRecordStore::new(config.records_dir.clone()));
    let fetcher = MetadataFetcher::from_config(&config, store.clone());
    let generator = tp_inference::create_model(&config).context("setting up the article generator")?;
    let publisher = Publisher::new(&config, generator, store);

    info!("🌐 Starting browser session...");
    let browser = WebDriverBrowser::connect(&config)
        .await
        .context("starting the browser session")?;
    let mut session = Session {
        fetcher,
        publisher,
        browser,
    };

    let stdin = BufReader::new(tokio::io::stdin());
    session.run(stdin, &mut std::io::stdout()).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    init_logging();
    let config: AppConfig = Cli::parse().into();

    println!("🎬 YouTube to Tistory auto-poster");
    if let Err(e) = run(config).await {
        error!("{:#}", e);
        println!("❌ {:#}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::time::Duration;
    use tp_core::{ArticleGenerator, VideoRecord};
    use tp_publisher::tistory;

    /// Signed-in browser that can blow up when it reaches the editor.
    #[derive(Default)]
    struct FakeBrowser {
        panic_in_editor: bool,
        closed: usize,
    }

    #[async_trait]
    impl Browser for FakeBrowser {
        async fn goto(&mut self, url: &str) -> Result<()> {
            if self.panic_in_editor && url.ends_with("/manage/write/") {
                panic!("editor crashed");
            }
            Ok(())
        }

        async fn is_present(&mut self, selector: &str) -> Result<bool> {
            Ok(selector == tistory::PROFILE_LINK)
        }

        async fn wait_for(&mut self, selector: &str, _timeout: Duration) -> Result<()> {
            Err(Error::WaitTimeout(selector.to_string()))
        }

        async fn wait_for_visible(&mut self, selector: &str, _timeout: Duration) -> Result<()> {
            Err(Error::WaitTimeout(selector.to_string()))
        }

        async fn click(&mut self, _selector: &str) -> Result<()> {
            Ok(())
        }

        async fn fill(&mut self, _selector: &str, _text: &str) -> Result<()> {
            Ok(())
        }

        async fn texts(&mut self, _selector: &str) -> Result<Vec<String>> {
            Ok(Vec::new())
        }

        async fn click_nth(&mut self, _selector: &str, _index: usize) -> Result<()> {
            Ok(())
        }

        async fn type_entry(&mut self, _text: &str) -> Result<()> {
            Ok(())
        }

        async fn paste(&mut self, _selector: &str, _text: &str) -> Result<()> {
            Ok(())
        }

        async fn close(&mut self) -> Result<()> {
            self.closed += 1;
            Ok(())
        }
    }

    #[derive(Debug)]
    struct FixedArticle;

    #[async_trait]
    impl ArticleGenerator for FixedArticle {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn generate_article(&self, _record: &VideoRecord) -> Result<String> {
            Ok("# 제목\n\n본문".to_string())
        }
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn session(browser: FakeBrowser, dir: &tempfile::TempDir) -> Session<FakeBrowser> {
        let store: Arc<dyn RecordStore> = Arc::new(JsonRecordStore::new(dir.path()));
        Session {
            fetcher: MetadataFetcher::new(None, store.clone()),
            publisher: Publisher::new(&AppConfig::default(), Arc::new(FixedArticle), store),
            browser,
        }
    }

    #[tokio::test]
    async fn test_browser_closed_on_exit_choice() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(FakeBrowser::default(), &dir);
        let mut out = Vec::new();

        session.run("3\n".as_bytes(), &mut out).await.unwrap();
        assert_eq!(session.browser.closed, 1);
    }

    #[tokio::test]
    async fn test_browser_closed_when_menu_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(FakeBrowser::default(), &dir);

        let result = session.run("3\n".as_bytes(), &mut BrokenPipe).await;
        assert!(matches!(result, Err(Error::Io(_))));
        assert_eq!(session.browser.closed, 1);
    }

    #[tokio::test]
    async fn test_browser_closed_after_panic() {
        let dir = tempfile::tempdir().unwrap();
        let browser = FakeBrowser {
            panic_in_editor: true,
            ..FakeBrowser::default()
        };
        let mut session = session(browser, &dir);
        let mut out = Vec::new();

        let result = session
            .run("1\nhttps://youtu.be/abc123XYZ\n3\n".as_bytes(), &mut out)
            .await;
        assert!(matches!(result, Err(Error::Browser(_))));
        assert_eq!(session.browser.closed, 1);
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "tubepost",
            "--blog",
            "devnotes",
            "--category",
            "Rust",
            "--records-dir",
            "/tmp/records",
        ])
        .unwrap();
        let config = AppConfig::from(cli);
        assert_eq!(config.blog_url(), "https://devnotes.tistory.com");
        assert_eq!(config.category, "Rust");
        assert_eq!(config.records_dir, PathBuf::from("/tmp/records"));
    }
}

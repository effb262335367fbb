use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tp_core::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    PostByUrl,
    PostBySearch,
    Exit,
}

impl FromStr for MenuChoice {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(MenuChoice::PostByUrl),
            "2" => Ok(MenuChoice::PostBySearch),
            "3" => Ok(MenuChoice::Exit),
            other => Err(format!("Invalid choice: '{}'", other)),
        }
    }
}

/// The two stages a menu choice runs.
#[async_trait]
pub trait Pipeline: Send {
    async fn fetch(&mut self, query: &str) -> Result<PathBuf>;

    async fn publish(&mut self, record_path: &Path) -> bool;
}

const MENU: &str = "\n1. Post from a YouTube URL\n2. Post from a search term\n3. Exit";

/// Runs the menu until the user exits or input ends.
pub async fn run_menu<R, W, P>(input: R, out: &mut W, pipeline: &mut P) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
    P: Pipeline + ?Sized,
{
    let mut lines = input.lines();
    loop {
        writeln!(out, "{}", MENU)?;
        write!(out, "Choose (1-3): ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            return Ok(());
        };
        let choice = match line.parse::<MenuChoice>() {
            Ok(choice) => choice,
            Err(e) => {
                writeln!(out, "❌ {}", e)?;
                continue;
            }
        };

        let ask = match choice {
            MenuChoice::Exit => {
                writeln!(out, "👋 Bye")?;
                return Ok(());
            }
            MenuChoice::PostByUrl => "YouTube URL: ",
            MenuChoice::PostBySearch => "Search term: ",
        };
        write!(out, "{}", ask)?;
        out.flush()?;

        let Some(query) = lines.next_line().await? else {
            writeln!(out)?;
            return Ok(());
        };
        post(query.trim(), out, pipeline).await?;
    }
}

async fn post<W, P>(query: &str, out: &mut W, pipeline: &mut P) -> Result<()>
where
    W: Write,
    P: Pipeline + ?Sized,
{
    writeln!(out, "🔎 Fetching video metadata...")?;
    let record_path = match pipeline.fetch(query).await {
        Ok(path) => path,
        Err(e) => {
            writeln!(out, "❌ Could not fetch video metadata: {}", e)?;
            return Ok(());
        }
    };
    writeln!(out, "💾 Saved {}", record_path.display())?;

    writeln!(out, "📝 Generating and publishing the post...")?;
    if pipeline.publish(&record_path).await {
        writeln!(out, "✅ Post published")?;
    } else {
        writeln!(out, "❌ Post was not published; see the log for the failed step")?;
    }
    Ok(())
}

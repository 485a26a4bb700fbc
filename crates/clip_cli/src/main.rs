//! Thin command-line caller for the clipharvest engine: resolves share
//! links and harvests profile feeds, printing JSON to stdout. All decision
//! logic lives in `clip_engine`/`clip_core`.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

use clip_engine::{ChromiumDriver, DriverSession, EngineSettings, FeedHarvester, LinkResolver};

#[derive(Parser)]
#[command(
    name = "clipharvest",
    version,
    about = "Resolve short-video share links and harvest profile feeds through a real browser"
)]
struct Cli {
    /// Run the browser with a visible window.
    #[arg(long)]
    headed: bool,

    /// Persistent browser profile directory (keeps a manual login alive).
    #[arg(long, value_name = "DIR")]
    user_data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a share link to its direct, watermark-free media URL.
    Resolve {
        /// The shared/short link to resolve.
        url: String,
    },
    /// Harvest every video published on a profile page.
    Harvest {
        /// The profile page URL.
        profile_url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    scrape_logging::initialize_terminal();
    let cli = Cli::parse();

    let mut settings = EngineSettings::default();
    settings.browser.headless = !cli.headed;
    settings.browser.user_data_dir = cli.user_data_dir.clone();

    let driver = Arc::new(ChromiumDriver::launch(&settings.browser).await?);
    let session = DriverSession::new(driver);

    let outcome = match &cli.command {
        Command::Resolve { url } => LinkResolver::new(settings.clone())
            .resolve(session.driver(), url)
            .await
            .map(|video_url| serde_json::json!({ "video_url": video_url }))
            .map_err(anyhow::Error::new),
        Command::Harvest { profile_url } => FeedHarvester::new(settings.clone())
            .harvest(session.driver(), profile_url)
            .await
            .map(|videos| serde_json::json!({ "videos": videos }))
            .map_err(anyhow::Error::new),
    };

    // Release the browser before reporting either way; a close failure
    // must not mask the command's outcome.
    if let Err(err) = session.close().await {
        scrape_logging::scrape_warn!("closing the browser failed: {err}");
    }

    let payload = outcome?;
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

//! # APOD Explorer CLI (`apod`)
//!
//! Browses the Astronomy Picture of the Day feed in 9-day windows and keeps
//! a local favorites list.
//!
//! ## Usage
//!
//! ```bash
//! apod --config ./config/apod.toml <command>
//! ```
//!
//! | Command | Description |
//! |---------|-------------|
//! | `apod window` | Print the normalized date window |
//! | `apod fetch` | Fetch and list entries for a window |
//! | `apod fav ...` | List, add, remove, toggle, clear or export favorites |
//! | `apod embed <url>` | Resolve a video URL to its embed player |
//! | `apod share <date>` | Print a share link and download target |
//! | `apod version` | Print the core version |

mod config;

use anyhow::{Context, Result};
use apod_core::db::open_db;
use apod_core::{
    detect_video, download_target, init_logging, parse_calendar_date, share_link, ApodEntry,
    DateRangeNormalizer, Explorer, FavoriteItem, FavoritesStore, FeedSource, HttpFeedSource,
    PersistStatus, QueryOutcome, SharePlatform, SqliteSlotRepository, SystemClock,
};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// APOD Explorer: browse NASA's Astronomy Picture of the Day and keep
/// favorites.
#[derive(Parser)]
#[command(name = "apod", version, about = "Browse NASA's Astronomy Picture of the Day")]
struct Cli {
    /// Path to configuration file (TOML). A missing file means defaults.
    #[arg(long, global = true, default_value = "./config/apod.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the 9-day window the given dates normalize to.
    Window {
        #[command(flatten)]
        range: RangeArgs,
    },

    /// Fetch the feed and list entries in the normalized window.
    Fetch {
        #[command(flatten)]
        range: RangeArgs,

        /// Print entries as JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Manage favorites.
    Fav {
        #[command(subcommand)]
        action: FavAction,
    },

    /// Resolve a video URL to its embeddable player URL.
    Embed { url: String },

    /// Print a share link for the entry published on DATE.
    Share {
        date: String,

        #[arg(long, value_enum, default_value_t = PlatformArg::Copy)]
        platform: PlatformArg,

        /// Page being shared. Defaults to the entry's media URL.
        #[arg(long)]
        page_url: Option<String>,

        /// Also print the download file name and source URL.
        #[arg(long)]
        download: bool,
    },

    /// Print the core library version.
    Version,
}

#[derive(clap::Args)]
struct RangeArgs {
    /// Window start (YYYY-MM-DD). Takes precedence over --end.
    #[arg(long)]
    start: Option<String>,

    /// Window end (YYYY-MM-DD).
    #[arg(long)]
    end: Option<String>,
}

impl RangeArgs {
    /// Blank or malformed dates count as not supplied.
    fn dates(&self) -> (Option<NaiveDate>, Option<NaiveDate>) {
        (
            self.start.as_deref().and_then(parse_calendar_date),
            self.end.as_deref().and_then(parse_calendar_date),
        )
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum PlatformArg {
    Twitter,
    Facebook,
    Copy,
}

impl From<PlatformArg> for SharePlatform {
    fn from(value: PlatformArg) -> Self {
        match value {
            PlatformArg::Twitter => SharePlatform::Twitter,
            PlatformArg::Facebook => SharePlatform::Facebook,
            PlatformArg::Copy => SharePlatform::Copy,
        }
    }
}

#[derive(Subcommand)]
enum FavAction {
    /// List favorites, most recent first.
    List,
    /// Favorite the entry published on DATE.
    Add { date: String },
    /// Remove the favorite with ID.
    Remove { id: String },
    /// Favorite DATE, or unfavorite it when already present.
    Toggle { date: String },
    /// Remove every favorite.
    Clear,
    /// Write the favorites JSON snapshot to a file or stdout.
    Export {
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Window { range } => {
            let cfg = bootstrap(&cli.config)?;
            let normalizer = normalizer(&cfg)?;
            let (start, end) = range.dates();
            let window = normalizer.normalize(start, end);
            println!(
                "{} {} ({} days)",
                window.start_iso(),
                window.end_iso(),
                window.day_count()
            );
        }
        Commands::Fetch { range, json } => {
            let cfg = bootstrap(&cli.config)?;
            let explorer = Explorer::new(normalizer(&cfg)?, feed_source(&cfg)?);
            let (start, end) = range.dates();
            let pending = explorer.begin_query(start, end);
            if !json {
                println!("{}", pending.status_line());
            }
            let outcome = explorer.run(pending).context("Failed to fetch APOD data")?;
            print_outcome(&outcome, json)?;
        }
        Commands::Fav { action } => {
            let cfg = bootstrap(&cli.config)?;
            run_fav(&cfg, action)?;
        }
        Commands::Embed { url } => match detect_video(&url) {
            Some(embed) => println!("{}\t{}", embed.provider, embed.embed_url),
            None => println!("No embeddable player; open {url} directly."),
        },
        Commands::Share {
            date,
            platform,
            page_url,
            download,
        } => {
            let cfg = bootstrap(&cli.config)?;
            let entry = entry_for_date(&cfg, parse_date_arg(&date)?)?;
            let page_url = page_url.unwrap_or_else(|| entry.url.clone());
            println!("{}", share_link(platform.into(), &entry, &page_url));
            if download {
                match download_target(&entry) {
                    Some((file_name, url)) => println!("{file_name}\t{url}"),
                    None => println!("Only images can be downloaded."),
                }
            }
        }
        Commands::Version => println!("apod_core {}", apod_core::core_version()),
    }

    Ok(())
}

fn bootstrap(path: &Path) -> Result<config::Config> {
    let cfg = config::load_config(path)?;
    start_logging(&cfg);
    info!(
        "event=config_load module=cli status=ok file_present={}",
        path.exists()
    );
    Ok(cfg)
}

fn normalizer(cfg: &config::Config) -> Result<DateRangeNormalizer<SystemClock>> {
    Ok(DateRangeNormalizer::with_clock(
        cfg.normalizer_config()?,
        SystemClock,
    ))
}

/// Logging failures are reported but never stop the command.
fn start_logging(cfg: &config::Config) {
    let dir = match config::absolutize(&cfg.logging.dir) {
        Ok(dir) => dir,
        Err(err) => {
            eprintln!("warning: logging disabled: {err:#}");
            return;
        }
    };
    if let Err(err) = init_logging(cfg.log_level(), &dir.to_string_lossy()) {
        eprintln!("warning: logging disabled: {err}");
    }
}

fn feed_source(cfg: &config::Config) -> Result<HttpFeedSource> {
    HttpFeedSource::with_timeout(
        cfg.feed.url.clone(),
        Duration::from_secs(cfg.feed.timeout_secs),
    )
    .context("Failed to build feed client")
}

fn print_outcome(outcome: &QueryOutcome, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome.entries())?);
        return Ok(());
    }

    println!("{}", outcome.status_line());
    for entry in outcome.entries() {
        let marker = if entry.is_video() { "video" } else { "image" };
        println!("{}  [{marker}]  {}", entry.date, entry.display_title());
        println!("    {}", entry.url);
    }
    Ok(())
}

fn run_fav(cfg: &config::Config, action: FavAction) -> Result<()> {
    let db_path = config::absolutize(&cfg.storage.db_path)?;
    let conn = open_db(&db_path)
        .with_context(|| format!("Failed to open database: {}", db_path.display()))?;
    let mut store = FavoritesStore::new(SqliteSlotRepository::new(&conn));

    match action {
        FavAction::List => {
            if store.is_empty() {
                println!("No favorites yet.");
            }
            for item in store.items() {
                println!("{}  {}", item.id, item.title);
            }
        }
        FavAction::Add { date } => {
            let date = parse_date_arg(&date)?;
            if store.is_favorite(&date.to_string()) {
                println!("{date} is already a favorite.");
                return Ok(());
            }
            let mutation = store.add(favorite_for_date(cfg, date)?);
            if mutation.applied {
                println!("Added {date} to favorites.");
            } else {
                println!("{date} is already a favorite.");
            }
            warn_on_failure(&mutation.persist);
        }
        FavAction::Remove { id } => {
            let mutation = store.remove(&id);
            if mutation.applied {
                println!("Removed {id} from favorites.");
            } else {
                println!("{id} is not a favorite.");
            }
            warn_on_failure(&mutation.persist);
        }
        FavAction::Toggle { date } => {
            let date = parse_date_arg(&date)?;
            let id = date.to_string();
            let item = match store.get(&id) {
                Some(existing) => existing.clone(),
                None => favorite_for_date(cfg, date)?,
            };
            let outcome = store.toggle(item);
            if outcome.is_favorite {
                println!("Added {id} to favorites.");
            } else {
                println!("Removed {id} from favorites.");
            }
            warn_on_failure(&outcome.persist);
        }
        FavAction::Clear => {
            let dropped = store.len();
            let persist = store.clear();
            println!("Cleared {dropped} favorite(s).");
            warn_on_failure(&persist);
        }
        FavAction::Export { output } => {
            let snapshot = store
                .export_snapshot()
                .context("Failed to encode favorites")?;
            match output {
                Some(path) => {
                    std::fs::write(&path, snapshot)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!("Exported {} favorite(s) to {}.", store.len(), path.display());
                }
                None => println!("{snapshot}"),
            }
        }
    }

    Ok(())
}

fn parse_date_arg(raw: &str) -> Result<NaiveDate> {
    parse_calendar_date(raw).with_context(|| format!("'{raw}' is not a YYYY-MM-DD date"))
}

/// Feed entry published on `date`.
fn entry_for_date(cfg: &config::Config, date: NaiveDate) -> Result<ApodEntry> {
    let entries = feed_source(cfg)?
        .fetch_all()
        .context("Failed to fetch APOD data")?;
    find_entry(&entries, date)
        .cloned()
        .with_context(|| format!("No APOD entry published on {date}"))
}

fn favorite_for_date(cfg: &config::Config, date: NaiveDate) -> Result<FavoriteItem> {
    Ok(FavoriteItem::from_entry(&entry_for_date(cfg, date)?))
}

fn find_entry(entries: &[ApodEntry], date: NaiveDate) -> Option<&ApodEntry> {
    entries
        .iter()
        .find(|entry| entry.calendar_date() == Some(date))
}

fn warn_on_failure(persist: &PersistStatus) {
    if let PersistStatus::Failed(reason) = persist {
        eprintln!("warning: favorites were updated but not saved: {reason}");
    }
}

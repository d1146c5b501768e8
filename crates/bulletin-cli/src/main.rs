mod app;
mod browse;
mod display;
mod pipeline;

use std::path::PathBuf;

use anyhow::bail;
use bulletin_core::{
    Action, AppState, ChipId, DetailTicket, DetailView, ListModel, MinistryFilter,
    ministry_options,
};
use bulletin_store::{Theme, load_theme, save_theme};
use bulletin_sync::{AgentHandle, CacheStorage, Lifecycle};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use url::Url;

use crate::app::Settings;
use crate::display::{TerminalSurface, render_detail, render_list};
use crate::pipeline::RenderPipeline;

#[derive(Parser)]
#[command(name = "bulletin", version, about = "Offline-tolerant government bulletin reader")]
struct Cli {
    /// Site that publishes /data/index.json
    #[arg(long, global = true, env = "BULLETIN_ORIGIN")]
    origin: Option<Url>,

    /// Where preferences and the response cache live
    #[arg(long, global = true, env = "BULLETIN_STATE_DIR")]
    state_dir: Option<PathBuf>,

    /// Cache generation name; changing it retires older caches
    #[arg(long, global = true, env = "BULLETIN_CACHE_GENERATION")]
    generation: Option<String>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the filtered bulletin list
    List {
        /// Exact ministry name
        #[arg(long)]
        ministry: Option<String>,
        /// Topic chip id (see `bulletin chips`)
        #[arg(long)]
        chip: Option<ChipId>,
        /// Case-insensitive search over title, summary and ministry
        #[arg(long, short)]
        query: Option<String>,
        /// Only bookmarked bulletins
        #[arg(long)]
        bookmarks: bool,
        /// Number of pages to show
        #[arg(long, default_value_t = 1)]
        pages: usize,
    },
    /// Show one bulletin with its full text
    Show { prid: String },
    /// Toggle the bookmark on a bulletin
    Bookmark { prid: String },
    /// List ministry names for filtering
    Ministries,
    /// List topic chips
    Chips,
    /// Show or set the colour theme preference
    Theme { value: Option<Theme> },
    /// Interactive browser
    Browse,
    /// Manage the response cache
    Cache {
        #[command(subcommand)]
        action: CacheCommand,
    },
}

#[derive(Subcommand)]
enum CacheCommand {
    /// Precache the shell into the current generation
    Install,
    /// Install if needed, then purge older generations
    Activate,
    /// Show stored generations
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = Settings::new(cli.origin, cli.state_dir, cli.generation);
    tracing::debug!(state_dir = %settings.state_dir.display(), generation = %settings.generation, "settings");

    match cli.command {
        Command::List {
            ministry,
            chip,
            query,
            bookmarks,
            pages,
        } => cmd_list(&settings, ministry, chip, query, bookmarks, pages).await,
        Command::Show { prid } => cmd_show(&settings, &prid).await,
        Command::Bookmark { prid } => cmd_bookmark(&settings, &prid),
        Command::Ministries => cmd_ministries(&settings).await,
        Command::Chips => {
            for chip in ChipId::ALL {
                println!("{:<16} {}", chip.id(), chip.label());
            }
            Ok(())
        }
        Command::Theme { value } => cmd_theme(&settings, value),
        Command::Browse => cmd_browse(&settings).await,
        Command::Cache { action } => cmd_cache(&settings, action).await,
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load the index through the agent into a fresh state.
async fn load_state(settings: &Settings) -> anyhow::Result<AppState> {
    let (handle, feed) = settings.feed()?;
    let bookmarks = settings.bookmarks().load()?;
    let action = match feed.load_index().await {
        Ok(doc) => Action::Loaded(doc),
        Err(e) => {
            tracing::warn!(error = %e, "index load failed");
            Action::LoadFailed(e.diagnostic())
        }
    };
    let state = AppState::new(bookmarks).apply(action);
    finish_lifecycle(&handle).await;
    Ok(state)
}

async fn finish_lifecycle(handle: &AgentHandle) {
    if handle.ready().await == Lifecycle::Failed {
        tracing::warn!("cache generation could not be installed; responses are not stored offline");
    }
}

async fn cmd_list(
    settings: &Settings,
    ministry: Option<String>,
    chip: Option<ChipId>,
    query: Option<String>,
    bookmarks: bool,
    pages: usize,
) -> anyhow::Result<()> {
    let mut state = load_state(settings).await?;
    if let Some(m) = ministry {
        state = state.apply(Action::SetMinistry(MinistryFilter::from_value(&m)));
    }
    if chip.is_some() {
        state = state.apply(Action::SetChip(chip));
    }
    if let Some(q) = query {
        state = state.apply(Action::SetQuery(q));
    }
    if bookmarks {
        state = state.apply(Action::SetBookmarksOnly(true));
    }
    for _ in 1..pages {
        state = state.apply(Action::LoadMore);
    }

    let list = ListModel::from_state(&state);
    print!("{}", render_list(&list));
    if let Some(diag) = list.diagnostic {
        bail!("could not load {}", diag.resource);
    }
    Ok(())
}

async fn cmd_show(settings: &Settings, prid: &str) -> anyhow::Result<()> {
    let (handle, feed) = settings.feed()?;
    let bookmarks = settings.bookmarks().load()?;
    let doc = feed.load_index().await?;
    let Some(item) = doc.items.into_iter().find(|i| i.prid == prid) else {
        bail!("no bulletin with id `{prid}`");
    };
    let bookmarked = bookmarks.contains(&item.prid);
    let mut view = DetailView::open(DetailTicket(1), item, bookmarked);
    let outcome = feed.load_detail(prid).await;
    view.settle(outcome.text());
    print!("{}", render_detail(&view));
    finish_lifecycle(&handle).await;
    Ok(())
}

fn cmd_bookmark(settings: &Settings, prid: &str) -> anyhow::Result<()> {
    let mut store = settings.bookmarks();
    let (now, set) = store.toggle(prid)?;
    let verb = if now { "bookmarked" } else { "removed bookmark from" };
    println!("{verb} {prid} ({} bookmarked)", set.len());
    Ok(())
}

async fn cmd_ministries(settings: &Settings) -> anyhow::Result<()> {
    let state = load_state(settings).await?;
    for name in ministry_options(state.items()) {
        println!("{name}");
    }
    Ok(())
}

fn cmd_theme(settings: &Settings, value: Option<Theme>) -> anyhow::Result<()> {
    let mut prefs = settings.prefs();
    match value {
        Some(theme) => {
            save_theme(&mut prefs, theme)?;
            println!("theme set to {theme}");
        }
        None => match load_theme(&prefs)? {
            Some(theme) => println!("{theme}"),
            None => println!("(not set)"),
        },
    }
    Ok(())
}

async fn cmd_browse(settings: &Settings) -> anyhow::Result<()> {
    let (handle, feed) = settings.feed()?;
    let pipeline = RenderPipeline::new(TerminalSurface::new(), settings.bookmarks(), feed)?;
    browse::run(pipeline).await?;
    finish_lifecycle(&handle).await;
    Ok(())
}

async fn cmd_cache(settings: &Settings, action: CacheCommand) -> anyhow::Result<()> {
    let agent = settings.agent()?;
    match action {
        CacheCommand::Install => {
            let entries = agent.install().await?;
            println!("installed {entries} entries into {}", settings.generation);
        }
        CacheCommand::Activate => {
            let before = agent.storage().generations().await?;
            let state = agent.bring_up().await;
            if state == Lifecycle::Failed {
                bail!("cache generation {} could not be installed", settings.generation);
            }
            let after = agent.storage().generations().await?;
            for name in before.iter().filter(|n| !after.contains(n)) {
                println!("purged {name}");
            }
            println!("{} is {state:?}", settings.generation);
        }
        CacheCommand::Status => {
            let generations = agent.storage().generations().await?;
            if generations.is_empty() {
                println!("no cache generations in {}", settings.cache_dir().display());
            }
            for name in generations {
                let marker = if name == settings.generation { "*" } else { " " };
                println!("{marker} {name}");
            }
            println!(
                "{:<14} {}",
                "installed",
                agent.is_installed().await.unwrap_or(false)
            );
        }
    }
    Ok(())
}

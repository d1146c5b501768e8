//! Interactive line-oriented browser.
//!
//! Each input line maps to one [`Command`]. Detail fetches run alongside
//! input, so typing `close` before a slow fetch lands just drops the result.

use std::pin::Pin;

use bulletin_core::{Action, ChipId, DetailTicket, MinistryFilter, ministry_options};
use bulletin_store::KeyValueStore;
use bulletin_sync::{DetailOutcome, Fetcher};
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::display::TerminalSurface;
use crate::pipeline::RenderPipeline;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ministry(MinistryFilter),
    Chip(Option<ChipId>),
    Search(String),
    Bookmarks(bool),
    /// `bookmarks` with no argument flips the current setting.
    ToggleBookmarksOnly,
    More,
    OpenPosition(usize),
    OpenPrid(String),
    Star,
    Close,
    Ministries,
    Chips,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  ministry|m <name|all>   filter by ministry
  chip|c <id|all>         filter by topic
  search|q [text]         search title, summary and ministry
  bookmarks|b [on|off]    show only bookmarked bulletins
  more|n                  show the next page
  open|o <n|id>           open row n, or a bulletin by id
  star|s                  toggle the bookmark on the open bulletin
  close|x                 back to the list
  ministries              list ministry names
  chips                   list topic ids
  help                    this text
  quit                    leave";

pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((w, r)) => (w, r.trim()),
        None => (line, ""),
    };
    let cmd = match word.to_ascii_lowercase().as_str() {
        "ministry" | "m" => {
            if rest.is_empty() {
                return Err("usage: ministry <name|all>".into());
            }
            if rest.eq_ignore_ascii_case("all") {
                Command::Ministry(MinistryFilter::All)
            } else {
                Command::Ministry(MinistryFilter::from_value(rest))
            }
        }
        "chip" | "c" => match rest {
            "" => return Err("usage: chip <id|all>".into()),
            r if r.eq_ignore_ascii_case("all") => Command::Chip(None),
            r => Command::Chip(Some(r.parse::<ChipId>().map_err(|e| e.to_string())?)),
        },
        "search" | "q" => Command::Search(rest.to_string()),
        "bookmarks" | "b" => match rest.to_ascii_lowercase().as_str() {
            "" => Command::ToggleBookmarksOnly,
            "on" => Command::Bookmarks(true),
            "off" => Command::Bookmarks(false),
            other => return Err(format!("expected on or off, got `{other}`")),
        },
        "more" | "n" => Command::More,
        "open" | "o" => match rest {
            "" => return Err("usage: open <n|id>".into()),
            r => match r.parse::<usize>() {
                Ok(n) if n > 0 => Command::OpenPosition(n),
                _ => Command::OpenPrid(r.to_string()),
            },
        },
        "star" | "s" => Command::Star,
        "close" | "x" => Command::Close,
        "ministries" => Command::Ministries,
        "chips" => Command::Chips,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        "" => return Err(String::new()),
        other => return Err(format!("unknown command `{other}`; type `help`")),
    };
    Ok(cmd)
}

type DetailFuture = Pin<Box<dyn Future<Output = (DetailTicket, DetailOutcome)> + Send>>;

/// Run the browser until `quit` or end of input.
pub async fn run<K, F>(mut pipeline: RenderPipeline<TerminalSurface, K, F>) -> anyhow::Result<()>
where
    K: KeyValueStore + 'static,
    F: Fetcher + Clone + 'static,
{
    pipeline.start().await;
    println!("type `help` for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut pending: FuturesUnordered<DetailFuture> = FuturesUnordered::new();

    loop {
        tokio::select! {
            Some((ticket, outcome)) = pending.next(), if !pending.is_empty() => {
                pipeline.settle(ticket, &outcome);
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let cmd = match parse_command(&line) {
                    Ok(cmd) => cmd,
                    Err(msg) => {
                        if !msg.is_empty() {
                            eprintln!("{msg}");
                        }
                        continue;
                    }
                };
                debug!(?cmd, "command");
                if cmd == Command::Quit {
                    break;
                }
                if let Some(fetch) = execute(&mut pipeline, cmd)? {
                    pending.push(fetch);
                }
            }
        }
    }
    Ok(())
}

fn execute<K, F>(
    pipeline: &mut RenderPipeline<TerminalSurface, K, F>,
    cmd: Command,
) -> anyhow::Result<Option<DetailFuture>>
where
    K: KeyValueStore + 'static,
    F: Fetcher + Clone + 'static,
{
    let action = match cmd {
        Command::Ministry(m) => Action::SetMinistry(m),
        Command::Chip(c) => Action::SetChip(c),
        Command::Search(q) => Action::SetQuery(q),
        Command::Bookmarks(on) => Action::SetBookmarksOnly(on),
        Command::ToggleBookmarksOnly => {
            Action::SetBookmarksOnly(!pipeline.state().filter().bookmarks_only)
        }
        Command::More => {
            if !pipeline.state().has_more() {
                println!("no more bulletins");
                return Ok(None);
            }
            Action::LoadMore
        }
        Command::OpenPosition(n) => {
            // Numeric ids are common, so fall back to an id lookup.
            let Some(p) = pipeline
                .open_position(n)
                .or_else(|| pipeline.open(&n.to_string()))
            else {
                eprintln!("no row {n} on screen");
                return Ok(None);
            };
            return Ok(Some(Box::pin(pipeline.fetch_detail(p))));
        }
        Command::OpenPrid(prid) => {
            let Some(p) = pipeline.open(&prid) else {
                eprintln!("no bulletin with id `{prid}`");
                return Ok(None);
            };
            return Ok(Some(Box::pin(pipeline.fetch_detail(p))));
        }
        Command::Star => {
            if pipeline.toggle_bookmark()?.is_none() {
                eprintln!("open a bulletin first");
            }
            return Ok(None);
        }
        Command::Close => {
            pipeline.close();
            return Ok(None);
        }
        Command::Ministries => {
            for name in ministry_options(pipeline.state().items()) {
                println!("  {name}");
            }
            return Ok(None);
        }
        Command::Chips => {
            for chip in ChipId::ALL {
                println!("  {:<16} {}", chip.id(), chip.label());
            }
            return Ok(None);
        }
        Command::Help => {
            println!("{HELP}");
            return Ok(None);
        }
        Command::Quit => return Ok(None),
    };
    pipeline.dispatch(action);
    Ok(None)
}

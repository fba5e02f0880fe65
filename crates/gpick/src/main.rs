//! gpick - pick commits that are on one branch but not another

mod branches;
mod color;
mod config;
mod logging;
mod output;
mod picker;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use gpick_core::{candidates_between, now_unix, LineFormatter, Repo};
use picker::{Picker, PickerExit};
use ratatui::prelude::*;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "gpick")]
#[command(author, version, about = "Pick commits that exist on one branch but not another")]
#[command(override_usage = "gpick <FROM> <TO> or just <TO>")]
struct Args {
    /// Branch to pick from, or the branch to pick to when given alone
    first: Option<String>,

    /// Branch to pick to
    second: Option<String>,

    /// Run as if started in this directory
    #[arg(short = 'C', value_name = "PATH")]
    path: Option<PathBuf>,

    /// Number of commit id characters to show
    #[arg(long, value_name = "N")]
    short_len: Option<usize>,

    /// Print the candidates instead of opening the picker
    #[arg(long)]
    plain: bool,

    /// Print the candidates as JSON
    #[arg(long, conflicts_with = "plain")]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_logging().context("Failed to set up logging")?;
    let config = config::Config::load();

    let cwd = match &args.path {
        Some(path) => path.clone(),
        None => std::env::current_dir().context("Failed to read current directory")?,
    };
    let repo = Repo::discover(&cwd).context("Not in a git repository")?;

    let branches = repo.branches().context("Failed to list branches")?;
    let pair = branches::resolve_branches(
        args.first.as_deref(),
        args.second.as_deref(),
        &branches,
        || {
            repo.current_branch().unwrap_or_else(|err| {
                tracing::debug!(%err, "no current branch");
                None
            })
        },
    )?;
    tracing::info!(from = %pair.from, to = %pair.to, "picking commits");

    let short_len = args.short_len.unwrap_or(config.ui.short_id_len);
    let candidates = candidates_between(&repo, &pair.from, &pair.to, short_len)
        .with_context(|| format!("Failed to compare '{}' with '{}'", pair.from, pair.to))?;

    let formatter = LineFormatter::new(config.line_style(), config.time_formatter());
    let now = now_unix();

    if args.json {
        return output::write_json(&mut io::stdout().lock(), &candidates);
    }

    if args.plain || !io::stdout().is_terminal() {
        return output::write_plain(&mut io::stdout().lock(), &candidates, &formatter, now);
    }

    if candidates.is_empty() {
        println!("No commits to pick from {} to {}.", pair.from, pair.to);
        return Ok(());
    }

    let title = format!("gpick {} {}", pair.from, pair.to);
    let mut picker = Picker::new(
        title.clone(),
        candidates,
        formatter,
        config.theme.resolve(),
        now,
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, SetTitle(&title))?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_picker(&mut terminal, &mut picker);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    match result? {
        PickerExit::Pick(commits) => output::write_picked(&mut io::stdout().lock(), &commits),
        PickerExit::Quit => Ok(()),
    }
}

fn run_picker<B: Backend>(terminal: &mut Terminal<B>, picker: &mut Picker) -> Result<PickerExit>
where
    B::Error: Send + Sync + 'static,
{
    let tick_rate = Duration::from_millis(250);

    loop {
        terminal.draw(|f| picker.draw(f))?;

        if event::poll(tick_rate)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if let Some(exit) = picker.handle_key(key) {
                        return Ok(exit);
                    }
                }
                Event::Mouse(me) => picker.handle_mouse(me),
                _ => {}
            }
        }
    }
}

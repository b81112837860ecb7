use std::io::Stdout;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

mod app;
mod backend;
mod config;
mod demo;
mod event;
mod logging;
mod orchestrator;
mod project;
mod queue;
mod transcript;

/// Terminal chat shell for a task-running agent.
#[derive(Debug, Parser)]
#[command(name = "agentshell", version)]
struct Cli {
    /// Play a scripted session instead of bridging to a backend.
    #[arg(long)]
    demo: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Err(err) = logging::init() {
        eprintln!("agentshell: logging disabled: {err:#}");
    }
    let config = config::Config::from_env();

    let mut terminal = setup_terminal()?;
    let result = app::run_app(&mut terminal, &config, cli.demo);
    restore_terminal(&mut terminal)?;
    result
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().context("enable raw mode")?;
    crossterm::execute!(
        std::io::stdout(),
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )
    .context("enter alternate screen")?;
    let terminal =
        Terminal::new(CrosstermBackend::new(std::io::stdout())).context("create terminal")?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    crossterm::execute!(
        std::io::stdout(),
        DisableBracketedPaste,
        DisableMouseCapture,
        LeaveAlternateScreen
    )
    .ok();
    disable_raw_mode().context("disable raw mode")?;
    terminal.show_cursor().context("show cursor")?;
    Ok(())
}

use std::{
    fs::{self, OpenOptions},
    io::{self, stdin},
    sync::{Arc, Mutex},
};

use anyhow::Context;
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    cursor::Show,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use termo::{
    app::{App, Flow},
    app_dirs::AppDirs,
    client::HttpTermoClient,
    config::{Config, ConfigStore, FileConfigStore},
    evaluator::DuplicateRule,
    runtime::{spawn_terminal_reader, Runner},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// guess the word of the day in six tries
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Termo: guess the daily Portuguese word in the terminal. The word comes from a remote service and wins can be registered on its result board."
)]
pub struct Cli {
    /// base URL of the service serving /palavra and /resultado
    #[clap(short = 'a', long, env = "TERMO_API_BASE")]
    api_base: Option<String>,

    /// number of guesses before the game is lost
    #[clap(short = 'm', long)]
    max_attempts: Option<usize>,

    /// score repeated letters the standard way: a letter is marked present only as many times as it occurs
    #[clap(long)]
    standard_duplicates: bool,

    /// persist the effective settings to the config file
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Overlay command line values onto the stored configuration
    fn apply(&self, mut config: Config) -> Config {
        if let Some(api_base) = &self.api_base {
            config.api_base = api_base.clone();
        }
        if let Some(max_attempts) = self.max_attempts {
            config.max_attempts = max_attempts;
        }
        if self.standard_duplicates {
            config.duplicate_rule = DuplicateRule::Standard;
        }
        config
    }
}

fn init_logging() -> anyhow::Result<()> {
    let Some(path) = AppDirs::log_path() else {
        return Ok(());
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    init_logging()?;

    let store = FileConfigStore::new();
    let config = cli.apply(store.load());
    if cli.save_config {
        store
            .save(&config)
            .with_context(|| format!("saving config to {}", store.path().display()))?;
    }
    info!(api_base = %config.api_base, max_attempts = config.max_attempts, rule = %config.duplicate_rule, "starting");

    let api = HttpTermoClient::new(config.api_base.clone(), config.request_timeout())?;

    let mut runner = Runner::new();
    let mut app = App::new(config.session_config(), Arc::new(api), runner.sender());

    enable_raw_mode()?;
    let result = run(&mut app, &mut runner).await;
    let restored = restore_terminal();

    info!("bye");
    result.and(restored)
}

/// Runs with raw mode on; the caller restores the terminal on every path.
async fn run(app: &mut App, runner: &mut Runner) -> anyhow::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    spawn_terminal_reader(runner.sender());
    app.fetch_word();
    start_tui(&mut terminal, app, runner).await
}

fn restore_terminal() -> anyhow::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, Show)?;
    Ok(())
}

async fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &mut Runner,
) -> anyhow::Result<()> {
    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    while let Some(event) = runner.step().await {
        if app.handle_event(event) == Flow::Quit {
            break;
        }
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;
    }

    Ok(())
}

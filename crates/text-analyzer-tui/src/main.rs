use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use ratatui::Terminal;
use ratatui::crossterm::event;
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::CrosstermBackend;
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;

use text_analyzer_core::{Config, FailurePolicy, ImportController, TextRazorAnalyzer};

mod action;
mod app;
mod input;
mod theme;
mod tui_event;
mod view;

use app::App;

/// Text Analyzer TUI - import text files and browse their analysis.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Text files to import on startup (analyzed one at a time)
    files: Vec<PathBuf>,

    /// API key (overrides TEXT_RAZOR_API_KEY and the config file)
    #[arg(long)]
    api_key: Option<String>,

    /// Color theme: dark (default) or light
    #[arg(long)]
    theme: Option<String>,

    /// Keep failed imports in the list instead of discarding them
    #[arg(long)]
    record_failures: bool,
}

/// Send logs to a daily rolling file; the terminal belongs to the UI.
fn init_logging() -> Option<WorkerGuard> {
    let dir = dirs::data_local_dir()?.join("text-analyzer").join("logs");
    std::fs::create_dir_all(&dir).ok()?;
    let appender = tracing_appender::rolling::daily(dir, "text-analyzer-tui.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Some(guard)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    let _log_guard = init_logging();

    for path in &args.files {
        if !path.exists() {
            anyhow::bail!("File not found: {}", path.display());
        }
    }

    let mut config = Config::load(args.api_key);
    if args.record_failures {
        config.failure_policy = FailurePolicy::Record;
    }
    tracing::info!(?config, "starting");

    let theme_name = args
        .theme
        .or_else(|| config.theme.clone())
        .unwrap_or_else(|| "dark".to_string());
    let theme = theme::Theme::from_name(&theme_name);

    let analyzer = Arc::new(TextRazorAnalyzer::from_config(&config)?);
    let controller = ImportController::new(analyzer, config.api_key.clone())
        .with_policy(config.failure_policy)
        .with_notice_ttl(config.notice_ttl);

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    // Install panic hook that restores terminal before printing panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    // Drain any stray input events (e.g. Enter keypress from launching the command)
    while event::poll(Duration::from_millis(50)).unwrap_or(false) {
        let _ = event::read();
    }

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<tui_event::BackendEvent>();
    let mut app = App::new(controller, theme);
    app.event_tx = Some(event_tx);
    app.pending_paths = args.files.into_iter().collect();

    let tick_rate = Duration::from_millis(100);
    let result = run_loop(&mut terminal, &mut app, &mut event_rx, tick_rate).await;

    app.shutdown();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    event_rx: &mut mpsc::UnboundedReceiver<tui_event::BackendEvent>,
    tick_rate: Duration,
) -> anyhow::Result<()> {
    loop {
        terminal.draw(|f| app.view(f))?;

        tokio::select! {
            maybe_event = event_rx.recv() => {
                if let Some(backend_event) = maybe_event {
                    app.handle_backend_event(backend_event);
                    while let Ok(evt) = event_rx.try_recv() {
                        app.handle_backend_event(evt);
                    }
                }
            }
            _ = async {
                if event::poll(tick_rate).unwrap_or(false)
                    && let Ok(evt) = event::read()
                {
                    app.update(input::map_event(&evt));
                }
            } => {}
            _ = tokio::signal::ctrl_c() => {
                app.should_quit = true;
            }
        }

        app.update(action::Action::Tick);

        if app.should_quit {
            return Ok(());
        }
    }
}

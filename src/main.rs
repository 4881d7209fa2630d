mod app;
mod config;
mod members;
mod table;
mod theme;
mod ui;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::{App, Popup};
use config::AppConfig;
use table::{PageSize, SortDirection, SortField};

#[derive(Parser, Debug)]
#[command(name = "roster")]
#[command(author = "Sean Fournier")]
#[command(version = "0.1.0")]
#[command(about = "A terminal admin table for searching, sorting and editing member lists")]
struct Args {
    /// URL to fetch the member list from (overrides the config file)
    #[arg(long)]
    source: Option<String>,

    /// Use this config file instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print one page of the processed table as JSON and exit
    #[arg(long)]
    dump: bool,

    /// Filter by name (with --dump)
    #[arg(long, default_value = "")]
    search: String,

    /// Sort column: name, email or role (with --dump)
    #[arg(long)]
    sort: Option<SortField>,

    /// Sort descending (with --dump)
    #[arg(long)]
    desc: bool,

    /// Zero-based page index (with --dump)
    #[arg(long, default_value_t = 0)]
    page: usize,

    /// Rows per page, or "all" (with --dump)
    #[arg(long)]
    page_size: Option<PageSize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (stderr, so it stays off the table and the JSON dump)
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(ref source) = args.source {
        config.source_url = source.clone();
    }

    // Handle CLI-only commands
    if args.dump {
        return dump_page(&config, &args).await;
    }

    // Run TUI
    run_tui(&config).await
}

async fn dump_page(config: &AppConfig, args: &Args) -> Result<()> {
    let members = members::fetch::load_members(&config.source_url).await;

    let mut query = config.initial_query();
    query.filter = args.search.clone();
    query.page = args.page;
    if let Some(field) = args.sort {
        query.sort_field = field;
    }
    if args.desc {
        query.direction = SortDirection::Descending;
    }
    if let Some(size) = args.page_size {
        query.page_size = size;
    }

    let page = table::process(&members, &query);

    let output = serde_json::json!({
        "total": page.total,
        "page": query.page,
        "page_size": query.page_size.to_string(),
        "rows": page.rows,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn run_tui(config: &AppConfig) -> Result<()> {
    // Fetch before touching the terminal so a slow source doesn't leave a blank screen
    let mut app = App::new(config).await;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') if app.popup == Popup::None && !app.captures_text() => {
                            return Ok(())
                        }
                        KeyCode::Char('c') if key.modifiers.contains(event::KeyModifiers::CONTROL) => {
                            return Ok(())
                        }
                        _ => app.handle_key(key),
                    }
                }
            }
        }

        // Expire status messages
        app.tick();
    }
}

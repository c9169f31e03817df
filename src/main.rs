use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use gianhang::app::App;
use gianhang::products::GridConfig;
use gianhang::storage::{FileStore, Store};
use gianhang::theme::{Theme, ThemeOverrides};
use gianhang::tui::{EventHandler, Tui};
use gianhang::{catalog, handler, tui, ui};

#[derive(Parser)]
#[command(name = "gianhang")]
#[command(about = "Product grid with compare tray and a floating chat assistant", version)]
struct Cli {
    /// JSON file with the products to show (array of products)
    #[arg(long)]
    products: Option<PathBuf>,
    /// Grid heading
    #[arg(long)]
    title: Option<String>,
    /// Smaller line under the heading; pass an empty string to hide it
    #[arg(long)]
    subtitle: Option<String>,
    /// Currency code used when formatting prices
    #[arg(long)]
    currency: Option<String>,
    /// JSON file with theme color overrides (brand, cardBg, text, …)
    #[arg(long)]
    theme: Option<PathBuf>,
    /// Directory for persisted widget state (default: the user config dir)
    #[arg(long)]
    state_dir: Option<PathBuf>,
    /// Append log output to this file (level via RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_deref())?;

    let mut config = GridConfig::default();
    if let Some(path) = &cli.products {
        config.items = catalog::load_products(path)?;
    }
    if let Some(title) = cli.title {
        config.title = title;
    }
    if let Some(subtitle) = cli.subtitle {
        config.subtitle = subtitle;
    }
    if let Some(currency) = cli.currency {
        config.currency = currency;
    }
    if let Some(path) = &cli.theme {
        config.theme = Theme::with_overrides(&ThemeOverrides::load(path)?);
    }

    let store: Arc<dyn Store> = match cli.state_dir {
        Some(dir) => Arc::new(FileStore::at(dir)),
        None => Arc::new(FileStore::open_default()?),
    };

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = EventHandler::new();
    let mut app = App::new(config, store, events.sender());
    tracing::info!(products = app.grid.products.len(), "starting storefront");

    let result = run(&mut terminal, &mut app, &mut events).await;

    // Reply timers must not outlive the terminal session
    app.chat.cancel_pending();
    tui::restore()?;
    result
}

async fn run(terminal: &mut Tui, app: &mut App, events: &mut EventHandler) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;
        match events.next().await {
            Some(event) => handler::handle_event(app, event),
            None => break,
        }
    }
    Ok(())
}

fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

use anyhow::{Context, Result};
use clap::Parser;
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use tapmenu::host::memory::{MemoryElement, MemoryHost, MemoryNotebook, MemoryToolbar};
use tapmenu::util::validate_index_url;
use tapmenu::{Config, MenuSession};

/// Tooltip and snippet previews are cut to this many columns.
const OUTLINE_WIDTH: usize = 60;

/// Get the default config path (~/.config/tapmenu/config.toml)
fn default_config_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("tapmenu")
        .join("config.toml"))
}

#[derive(Parser, Debug)]
#[command(
    name = "tapmenu",
    about = "Preview the TAP Help notebook menu with its release install entries"
)]
struct Args {
    /// Config file (defaults to ~/.config/tapmenu/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the package index URL
    #[arg(long, value_name = "URL")]
    index_url: Option<String>,

    /// Skip the release fetch and render the menu without releases
    #[arg(long)]
    offline: bool,

    /// Click the element with this id or label and print the notebook cells
    #[arg(long, value_name = "ID")]
    click: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => default_config_path()?,
    };
    let mut config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config '{}'", config_path.display()))?;

    if let Some(url) = &args.index_url {
        validate_index_url(url).with_context(|| format!("Invalid --index-url '{}'", url))?;
        config.index.url = url.clone();
    }
    if args.offline {
        config.index.enabled = false;
    }

    // Handlers are Rc-based, so everything stays on one thread
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(run(config, args.click.as_deref()))
}

async fn run(config: Config, click: Option<&str>) -> Result<()> {
    let client = reqwest::Client::builder()
        .user_agent(concat!("tapmenu/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")?;

    let session = MenuSession::new(config, client).context("Invalid menu configuration")?;

    let host = MemoryHost::notebook_menu_bar();
    let mut toolbar = MemoryToolbar::default();
    let notebook = Rc::new(RefCell::new(MemoryNotebook::default()));

    let report = session
        .initialize(&host, &mut toolbar, Rc::clone(&notebook))
        .await;

    let states: Vec<String> = report.transitions.iter().map(|s| s.to_string()).collect();
    println!("States: {}", states.join(" -> "));
    if let Some(e) = &report.feed_error {
        println!("Release fetch failed: {}", e);
    }

    let Some(menu) = toolbar.menus.last() else {
        let reason = report
            .render_error
            .as_ref()
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no menu attached".to_string());
        anyhow::bail!("TAP Help menu was not rendered: {}", reason);
    };

    println!("Snippet entries: {}", report.wired);
    println!();
    print!("{}", menu.outline(OUTLINE_WIDTH));

    if let Some(target) = click {
        let element = find_target(menu, target)
            .with_context(|| format!("No menu element with id or label '{}'", target))?;
        if !element.click() {
            anyhow::bail!("'{}' has no click action", target);
        }

        println!();
        let notebook = notebook.borrow();
        for (i, cell) in notebook.cells.iter().enumerate() {
            let marker = if i == notebook.selected { ">" } else { " " };
            println!("{} [{}]", marker, i);
            for line in cell.lines() {
                println!("    {}", line);
            }
        }
    }

    Ok(())
}

fn find_target<'a>(menu: &'a MemoryElement, target: &str) -> Option<&'a MemoryElement> {
    menu.find_by_id(target)
        .or_else(|| menu.find_by_label(target))
}

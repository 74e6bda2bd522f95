use std::sync::{Arc, Mutex};

use anyhow::Result;
use clap::Parser;
use shared::domain::Suggestion;
use suggest_core::{load_settings, FormBinding, SuggestionController, SuggestionView};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

#[derive(Parser, Debug)]
struct Args {
    /// Suggestion endpoint, overrides suggest.toml / SUGGEST_URL.
    #[arg(long)]
    suggest_url: Option<String>,
    /// Normalization endpoint, overrides suggest.toml / NORMALIZE_URL.
    #[arg(long)]
    normalize_url: Option<String>,
    #[arg(long)]
    debounce_ms: Option<u64>,
}

/// Prints the suggestion list as numbered rows and keeps the last render
/// so a row can be selected by index.
#[derive(Default)]
struct TerminalView {
    current: Mutex<Vec<Suggestion>>,
}

impl TerminalView {
    fn item(&self, index: usize) -> Option<Suggestion> {
        self.lock().get(index).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Suggestion>> {
        self.current.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SuggestionView for TerminalView {
    fn show(&self, suggestions: &[Suggestion]) {
        for (i, suggestion) in suggestions.iter().enumerate() {
            println!("  [{}] {}", i + 1, suggestion.label());
        }
        *self.lock() = suggestions.to_vec();
    }

    fn clear(&self) {
        self.lock().clear();
    }
}

struct PrintingForm;

impl FormBinding for PrintingForm {
    fn set_field(&self, name: &str, value: &str) {
        println!("  {name} = {value}");
    }

    fn clear_field(&self, name: &str) {
        debug!(field = name, "field cleared");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(url) = args.suggest_url {
        settings.suggest_url = url;
    }
    if let Some(url) = args.normalize_url {
        settings.normalize_url = url;
    }
    if let Some(ms) = args.debounce_ms {
        settings.debounce_ms = ms;
    }
    let debounce_ms = settings.debounce_ms;

    let view = Arc::new(TerminalView::default());
    let controller = SuggestionController::new(
        settings,
        view.clone() as Arc<dyn SuggestionView>,
        Arc::new(PrintingForm),
    )?;

    let mut events = controller.subscribe_events();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            if let suggest_core::ControllerEvent::LookupFailed { reason } = event {
                warn!("lookup failed: {reason}");
            }
        }
    });

    println!("Type a query (3+ chars), '!<n>' to select row n, blank line to dismiss, Ctrl-D to quit.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        if line.is_empty() {
            controller.dismiss().await;
            continue;
        }
        if let Some(index) = line.strip_prefix('!').and_then(|n| n.parse::<usize>().ok()) {
            match index.checked_sub(1).and_then(|i| view.item(i)) {
                Some(suggestion) => controller.select(&suggestion).await,
                None => println!("no such row: {index}"),
            }
            continue;
        }
        controller.handle_input(&line).await;
        // Give the debounced lookup time to land before the next prompt.
        tokio::time::sleep(std::time::Duration::from_millis(debounce_ms + 200)).await;
    }

    Ok(())
}

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use periscope_client::HttpAgentBackend;
use periscope_core::command::COMMANDS;
use periscope_core::message::{Message, MessageKind};
use periscope_core::view::View;
use periscope_engine::{DEFAULT_POLL_INTERVAL, MemoryBlobStore, SyncEngine};
use periscope_infrastructure::PrefsService;

const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";

/// How often the console re-renders engine state between polls.
const RENDER_INTERVAL: Duration = Duration::from_millis(300);

#[derive(Parser)]
#[command(name = "periscope")]
#[command(about = "Periscope - console mirror of a remote agent backend", long_about = None)]
struct Cli {
    /// Backend base URL (falls back to PERISCOPE_BACKEND_URL, then localhost)
    #[arg(long)]
    backend_url: Option<String>,

    /// Poll interval in milliseconds
    #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL.as_millis() as u64)]
    interval_ms: u64,
}

impl Cli {
    fn resolve_backend_url(&self) -> String {
        self.backend_url
            .clone()
            .or_else(|| std::env::var("PERISCOPE_BACKEND_URL").ok())
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string())
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let backend_url = cli.resolve_backend_url();

    // ===== Engine Assembly =====
    let backend = Arc::new(HttpAgentBackend::new(&backend_url));
    let blobs = Arc::new(MemoryBlobStore::new());
    let prefs = Arc::new(PrefsService::new()?);
    let engine = Arc::new(
        SyncEngine::new(backend, blobs, prefs)
            .with_poll_interval(Duration::from_millis(cli.interval_ms)),
    );

    println!("{}", "=== Periscope ===".bright_magenta().bold());
    println!("{}", format!("Mirroring {}", backend_url).bright_black());
    println!(
        "{}",
        "Type a query to submit it, or /help for commands.".bright_black()
    );
    println!();

    engine.start();
    let renderer = tokio::spawn(render_loop(Arc::clone(&engine)));

    // ===== Input Loop =====
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }

        if line.starts_with('/') {
            if !handle_command(&engine, &line).await {
                break;
            }
        } else {
            // Submissions run in the background; the renderer picks up the
            // mirrored messages as they land.
            engine.set_input(line).await;
            let submitter = Arc::clone(&engine);
            tokio::spawn(async move { submitter.submit().await });
        }
    }

    renderer.abort();
    engine.stop().await;
    println!("{}", "Goodbye!".bright_green());

    Ok(())
}

/// Dispatches a slash command. Returns `false` when the console should exit.
async fn handle_command(engine: &Arc<SyncEngine>, line: &str) -> bool {
    let mut parts = line.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or("");
    let arg = parts.next().map(str::trim).unwrap_or("");

    match name {
        "/quit" | "/exit" => return false,
        "/help" => print_help(),
        "/status" => print_status(engine).await,
        "/stop" => {
            let engine = Arc::clone(engine);
            tokio::spawn(async move { engine.request_stop().await });
        }
        "/clear" => run_palette(engine, "clear").await,
        "/export" => match engine.export_transcript().await {
            Ok(path) => println!("{}", format!("Exported to {}", path.display()).green()),
            Err(e) => eprintln!("{}", format!("Export failed: {}", e).red()),
        },
        "/theme" => {
            if arg.is_empty() {
                println!("{}", "Usage: /theme <light|dark|hacker>".yellow());
            } else {
                run_palette(engine, &format!("theme-{}", arg)).await;
            }
        }
        "/layout" => {
            if arg.is_empty() {
                println!("{}", "Usage: /layout <chat|code|balanced>".yellow());
            } else {
                run_palette(engine, &format!("layout-{}", arg)).await;
            }
        }
        "/view" => match arg.parse::<View>() {
            Ok(view) => {
                engine.set_view(view).await;
                println!("{}", format!("Active view: {}", view).bright_black());
            }
            Err(_) => println!("{}", "Usage: /view <blocks|screenshot>".yellow()),
        },
        "/screenshot" => match engine.screenshot_bytes().await {
            Some(bytes) => {
                let path = if arg.is_empty() {
                    "periscope-screen.png"
                } else {
                    arg
                };
                match std::fs::write(path, &bytes) {
                    Ok(()) => {
                        println!(
                            "{}",
                            format!("Saved {} bytes to {}", bytes.len(), path).green()
                        );
                    }
                    Err(e) => eprintln!("{}", format!("Write failed: {}", e).red()),
                }
            }
            None => println!(
                "{}",
                "No screenshot captured yet (switch with /view screenshot)".yellow()
            ),
        },
        "/cmd" => {
            if arg.is_empty() {
                println!("{}", "Usage: /cmd <id> (see /help for ids)".yellow());
            } else {
                run_palette(engine, arg).await;
            }
        }
        _ => println!("{}", "Unknown command (try /help)".bright_black()),
    }

    true
}

async fn run_palette(engine: &SyncEngine, id: &str) {
    if let Err(e) = engine.run_command(id).await {
        eprintln!("{}", format!("Command failed: {}", e).red());
    }
}

fn print_help() {
    println!("{}", "Console commands:".bold());
    println!("  /stop                 Ask the backend to interrupt the running query");
    println!("  /clear                Clear the mirrored conversation");
    println!("  /export               Write the conversation to a markdown file");
    println!("  /theme <light|dark|hacker>");
    println!("  /layout <chat|code|balanced>");
    println!("  /view <blocks|screenshot>");
    println!("  /screenshot [path]    Save the latest captured screenshot");
    println!("  /cmd <id>             Run a palette command by id");
    println!("  /status               Show connection and view state");
    println!("  /quit                 Exit");
    println!();
    println!("{}", "Palette ids:".bold());
    for command in COMMANDS {
        println!("  {} {:<16} {}", command.icon, command.id, command.label);
    }
}

async fn print_status(engine: &SyncEngine) {
    let state = engine.snapshot().await;
    let connection = if state.connection.is_online {
        format!(
            "online ({} ms)",
            state.connection.latency_ms.unwrap_or_default()
        )
        .green()
    } else {
        "offline".yellow()
    };
    println!("  backend:  {}", connection);
    println!("  view:     {} (split {}%)", state.view, state.split_position);
    println!("  theme:    {}", state.theme);
    println!("  messages: {}", state.messages.len());
    if state.submitting {
        println!("  {}", "a query is in flight".bright_black());
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Re-renders engine state on a fixed cadence, printing only what changed
/// since the previous pass.
async fn render_loop(engine: Arc<SyncEngine>) {
    let mut printed = 0usize;
    let mut online: Option<bool> = None;
    let mut status: Option<String> = None;
    let mut error: Option<String> = None;
    let mut ticker = tokio::time::interval(RENDER_INTERVAL);

    loop {
        ticker.tick().await;
        let state = engine.snapshot().await;

        // A shrinking log means the conversation was cleared.
        if state.messages.len() < printed {
            printed = 0;
        }
        for message in &state.messages[printed..] {
            print_message(message);
        }
        printed = state.messages.len();

        if online != Some(state.connection.is_online) {
            if state.connection.is_online {
                let latency = state.connection.latency_ms.unwrap_or_default();
                println!("{}", format!("· backend online ({} ms)", latency).bright_black());
            } else {
                println!("{}", "· backend offline".yellow());
            }
            online = Some(state.connection.is_online);
        }

        if state.status != status {
            if let Some(line) = &state.status {
                println!("{}", format!("· {}", line).bright_black());
            }
            status = state.status.clone();
        }

        if state.error != error {
            if let Some(line) = &state.error {
                eprintln!("{}", line.red());
            }
            error = state.error.clone();
        }
    }
}

fn print_message(message: &Message) {
    match message.kind {
        MessageKind::User => {
            println!("{}", format!("> {}", message.content).green());
        }
        MessageKind::Agent => {
            let author = message.agent_name.as_deref().unwrap_or("Agent");
            println!("{}", format!("[{}]", author).bright_magenta());
            if let Some(reasoning) = &message.reasoning {
                for line in reasoning.lines() {
                    println!("{}", format!("  {}", line).bright_black());
                }
            }
            for line in message.content.lines() {
                println!("{}", line.bright_blue());
            }
            println!();
        }
        MessageKind::Error => {
            println!("{}", message.content.red());
        }
    }
}

//! banter - terminal chat client for a completions endpoint

mod config;
mod ui;

use banter_api::{CompletionOutcome, client::BASE_URL_ENV_VAR};
use banter_chat::{ChatSession, ERROR_MARKER, Role};
use banter_tui::Theme;
use clap::Parser;
use std::fs::{self, OpenOptions};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// banter - chat with a completions endpoint from the terminal
#[derive(Parser, Debug)]
#[command(name = "banter")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Base URL of the completions API (default: http://127.0.0.1:5009/api)
    #[arg(long)]
    base_url: Option<String>,

    /// Run in non-interactive mode with a single prompt
    #[arg(short = 'c', long)]
    command: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Disable TUI mode (use simple stdin/stdout)
    #[arg(long)]
    no_tui: bool,

    /// Initialize config file
    #[arg(long)]
    init_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize config and exit
    if args.init_config {
        match config::Config::init() {
            Ok(path) => {
                println!("Config file at: {}", path.display());
                println!("\nExample config:\n{}", config::example_config());
            }
            Err(e) => {
                eprintln!("Error creating config: {}", e);
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    // Load config file
    let cfg = config::Config::load();

    let use_tui = args.command.is_none() && !args.no_tui && cfg.tui.unwrap_or(true);

    // Setup tracing
    if args.verbose {
        init_tracing(use_tui)?;
    }

    // Merge config with CLI args (CLI takes precedence, then environment)
    let env_base_url = std::env::var(BASE_URL_ENV_VAR).ok();
    let base_url = config::resolve_base_url(
        args.base_url.as_deref(),
        env_base_url.as_deref(),
        cfg.base_url.as_deref(),
    );

    let mut session = match ChatSession::connect(&base_url) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(greeting) = cfg.greeting {
        session = session.with_greeting(greeting);
    }
    tracing::info!("Using completions endpoint under {}", base_url);

    // Non-interactive mode
    if let Some(command) = args.command {
        return run_command(&mut session, &command).await;
    }

    // TUI mode
    if use_tui {
        let theme = match cfg.theme.as_deref() {
            Some(name) => Theme::by_name(name).unwrap_or_else(|| {
                eprintln!("Warning: Unknown theme '{}', using dark", name);
                Theme::dark()
            }),
            None => Theme::default(),
        };
        return ui::run_tui(session, theme).await;
    }

    // Interactive mode (simple stdin/stdout)
    run_interactive(&mut session).await
}

/// Install the `--verbose` subscriber; TUI mode logs to a file instead of the screen
fn init_tracing(to_file: bool) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("banter=debug"));

    if to_file {
        let path = config::Config::log_path();
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

/// Line printed for a settled turn
fn outcome_line(outcome: &CompletionOutcome) -> String {
    match outcome {
        CompletionOutcome::Success { response, .. } => {
            format!("{}: {}", Role::Assistant.label(), response)
        }
        CompletionOutcome::Failure { error } => format!("{}{}", ERROR_MARKER, error),
    }
}

async fn run_command(session: &mut ChatSession, command: &str) -> anyhow::Result<()> {
    let Some(outcome) = session.submit(command).await else {
        eprintln!("Error: Prompt is empty");
        std::process::exit(1);
    };

    if outcome.is_success() {
        println!("{}", outcome_line(&outcome));
        Ok(())
    } else {
        eprintln!("{}", outcome_line(&outcome));
        std::process::exit(1);
    }
}

async fn run_interactive(session: &mut ChatSession) -> anyhow::Result<()> {
    use std::io::{self, Write};

    // Show minimal startup info (only if TTY)
    if std::io::IsTerminal::is_terminal(&std::io::stderr()) {
        if let Some(greeting) = session.conversation().messages().first() {
            eprintln!("{}: {}", greeting.role.label(), greeting.content);
        }
        eprintln!();
    }

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            // EOF
            break;
        }

        let prompt = input.trim_end_matches(['\n', '\r']);
        if prompt.trim().is_empty() {
            continue;
        }

        if let Some(outcome) = session.submit(prompt).await {
            println!("{}", outcome_line(&outcome));
        }
        println!();
    }

    Ok(())
}

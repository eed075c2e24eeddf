//! TrendSignal AI terminal dashboard
//!
//! # Usage
//!
//! ```bash
//! export GEMINI_API_KEY="..."
//!
//! # One scan, rendered once
//! cargo run --bin trendsignal -- scan RELIANCE
//!
//! # Interactive dashboard with chat
//! cargo run --bin trendsignal
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tracing::{error, info};
use trendsignal::render::{self, HELP};
use trendsignal::{AppConfig, ChatAssistant, CompletionSettings, Dashboard, Session};
use trendsignal_llm::providers::{GeminiConfig, GeminiProvider};
use trendsignal_utils::{LogFormat, init_tracing};

#[derive(Parser)]
#[command(name = "trendsignal")]
#[command(about = "Technical indicators, headline sentiment and an AI strategist report for one stock", long_about = None)]
#[command(version)]
struct Cli {
    /// Emit logs as JSON (also TRENDSIGNAL_LOG_FORMAT=json)
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan one ticker and print the dashboard
    Scan {
        /// Ticker symbol; bare symbols get the configured exchange suffix
        ticker: String,
    },
    /// Interactive dashboard with chat (default)
    Interactive,
}

/// One line of REPL input
#[derive(Debug, PartialEq, Eq)]
enum ReplCommand<'a> {
    Scan(&'a str),
    Reset,
    Help,
    Exit,
    Ask(&'a str),
    Unknown(&'a str),
}

fn parse_line(line: &str) -> Option<ReplCommand<'_>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let Some(command) = line.strip_prefix('/') else {
        return Some(ReplCommand::Ask(line));
    };
    let (name, arg) = command
        .split_once(char::is_whitespace)
        .map_or((command, ""), |(name, arg)| (name, arg.trim()));
    Some(match name.to_lowercase().as_str() {
        "scan" | "s" if !arg.is_empty() => ReplCommand::Scan(arg),
        "reset" => ReplCommand::Reset,
        "help" | "h" | "?" => ReplCommand::Help,
        "exit" | "quit" | "q" => ReplCommand::Exit,
        _ => ReplCommand::Unknown(line),
    })
}

struct App {
    dashboard: Dashboard,
    chat: ChatAssistant,
}

impl App {
    fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let mut gemini = GeminiConfig::new(config.gemini_api_key.clone())
            .with_timeout(config.request_timeout.as_secs());
        if let Some(base) = &config.gemini_api_base {
            gemini = gemini.with_api_base(base.clone());
        }
        let provider = Arc::new(GeminiProvider::with_config(gemini)?);

        Ok(Self {
            dashboard: Dashboard::from_config(config, provider.clone())?,
            chat: ChatAssistant::new(provider, CompletionSettings::from_config(config)),
        })
    }

    async fn scan(&self, session: &mut Session, ticker: &str) {
        match self.dashboard.scan(session, ticker).await {
            Ok(report) => println!("{}", render::render_report(&report)),
            Err(e) => {
                error!(error = %e, kind = e.kind(), "Scan failed");
                println!("{}", render::render_error(ticker.trim(), &e));
            }
        }
    }

    async fn ask(&self, session: &mut Session, question: &str) {
        match self.chat.reply(session, question).await {
            Ok(answer) => println!("{}", render::render_answer(&answer)),
            Err(e) => println!("{}", render::render_error("", &e)),
        }
    }

    async fn run_interactive(&self) -> anyhow::Result<()> {
        let mut session = Session::new();
        info!(session_id = %session.id, "Interactive session started");
        println!("TrendSignal AI\n{HELP}\n");

        let stdin = io::stdin();
        let mut stdout = io::stdout();

        loop {
            let prompt = session
                .current_ticker()
                .map_or_else(|| "trendsignal> ".to_string(), |t| format!("trendsignal [{t}]> "));
            print!("{prompt}");
            stdout.flush()?;

            let mut input = String::new();
            match stdin.lock().read_line(&mut input) {
                Ok(0) => {
                    println!("\nGoodbye!");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    eprintln!("Error reading input: {e}");
                    continue;
                }
            }

            match parse_line(&input) {
                None => {}
                Some(ReplCommand::Scan(ticker)) => self.scan(&mut session, ticker).await,
                Some(ReplCommand::Reset) => {
                    session.reset_chat();
                    println!("Chat history cleared.");
                }
                Some(ReplCommand::Help) => println!("{HELP}"),
                Some(ReplCommand::Exit) => {
                    println!("Goodbye!");
                    break;
                }
                Some(ReplCommand::Ask(question)) => self.ask(&mut session, question).await,
                Some(ReplCommand::Unknown(line)) => {
                    println!("Unknown command: {line}\n{HELP}");
                }
            }
        }

        Ok(())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    trendsignal_utils::load_dotenv();

    let format = if cli.json_logs {
        LogFormat::Json
    } else {
        LogFormat::parse(std::env::var("TRENDSIGNAL_LOG_FORMAT").ok().as_deref())
    };
    init_tracing(format);

    // Missing credentials stop the process before any UI
    let config = AppConfig::from_env().context("failed to load configuration")?;
    info!(?config, "Configuration loaded");

    let app = App::new(&config)?;

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Scan { ticker } => {
            let mut session = Session::new();
            let report = app.dashboard.scan(&mut session, &ticker).await;
            match report {
                Ok(report) => println!("{}", render::render_report(&report)),
                Err(e) => {
                    println!("{}", render::render_error(ticker.trim(), &e));
                    std::process::exit(1);
                }
            }
        }
        Commands::Interactive => app.run_interactive().await?,
    }

    Ok(())
}

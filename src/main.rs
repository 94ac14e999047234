use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::Duration;
use tracing::debug;

use toxiguard::config::{parse_bool, Config};
use toxiguard::output::terminal;
use toxiguard::predictor::http::HttpPredictor;
use toxiguard::session::coordinator::{CoordinatorSettings, RequestCoordinator};
use toxiguard::session::state::{Outcome, Phase, Step};
use toxiguard::text::frequency::frequency;
use toxiguard::text::highlight::highlight;
use toxiguard::text::metrics::TextMetrics;

/// ToxiGuard: real-time toxicity analysis for typed text.
///
/// Sends text to a prediction service and shows whether it reads as toxic,
/// with highlighted abusive words, a score trend and a history of analyses.
#[derive(Parser)]
#[command(name = "toxiguard", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a single text right away
    Analyze {
        /// The text to analyze
        text: String,
    },

    /// Interactive session: every stdin line replaces the current text
    Watch {
        /// Debounce delay in milliseconds (overrides TOXIGUARD_DEBOUNCE_MS)
        #[arg(long)]
        debounce_ms: Option<u64>,

        /// Start with real-time analysis off (use :analyze instead)
        #[arg(long)]
        no_realtime: bool,
    },

    /// Local word statistics and highlighting, no network
    Stats {
        /// The text to inspect
        text: String,

        /// Words to highlight as abusive (repeatable)
        #[arg(long = "abusive", short = 'a')]
        abusive: Vec<String>,

        /// How many words to list (default: 15)
        #[arg(long, default_value = "15")]
        top: usize,
    },

    /// Check that the prediction service is reachable
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("toxiguard=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze { text } => {
            let config = Config::load()?;
            let predictor = HttpPredictor::new(&config.backend_url, config.timeout())?;
            let settings = CoordinatorSettings {
                realtime: false,
                ..config.coordinator_settings()
            };
            let mut coordinator = RequestCoordinator::new(Arc::new(predictor), settings);

            coordinator.set_text(text.clone());
            if coordinator.analyze_now().is_none() {
                anyhow::bail!("Nothing to analyze: the text is empty");
            }

            let spinner = ProgressBar::new_spinner();
            spinner.set_style(ProgressStyle::default_spinner().template("  {spinner} {msg}")?);
            spinner.set_message(format!("Analyzing via {}", config.backend_url));
            spinner.enable_steady_tick(Duration::from_millis(100));

            let outcome = loop {
                match coordinator.step().await {
                    Some(Step::Resolved(resolution)) => break resolution.outcome,
                    Some(Step::Dispatched(_)) => continue,
                    None => anyhow::bail!("Analysis session closed unexpectedly"),
                }
            };
            spinner.finish_and_clear();

            match outcome {
                Outcome::Applied => {
                    if let Some(result) = coordinator.state().current() {
                        terminal::display_result(&text, result);
                    }
                }
                Outcome::Failed(detail) => anyhow::bail!("Analysis failed: {detail}"),
                Outcome::Stale => anyhow::bail!("Analysis was superseded"),
            }
        }

        Commands::Watch {
            debounce_ms,
            no_realtime,
        } => {
            let config = Config::load()?;
            let predictor = HttpPredictor::new(&config.backend_url, config.timeout())?;
            let mut settings = config.coordinator_settings();
            if let Some(ms) = debounce_ms {
                settings.debounce = Duration::from_millis(ms);
            }
            if no_realtime {
                settings.realtime = false;
            }

            println!(
                "Watching stdin ({} ms debounce, real-time {}). Type :help for commands.",
                settings.debounce.as_millis(),
                if settings.realtime { "on" } else { "off" }
            );
            let mut coordinator = RequestCoordinator::new(Arc::new(predictor), settings);
            run_watch(&mut coordinator).await?;
            coordinator.dispose();
        }

        Commands::Stats {
            text,
            abusive,
            top,
        } => {
            let spans = highlight(&text, &abusive);
            let metrics = TextMetrics::compute(&text, None);
            let freq = frequency(&text);

            println!("{}", terminal::render_spans(&spans));
            println!(
                "\n  Words: {}  |  Distinct: {}  |  Highlighted: {}",
                metrics.total_words,
                freq.len(),
                spans.iter().filter(|s| s.abusive).count()
            );
            terminal::display_word_frequency(&freq, &abusive, top);

            let content = freq.top_content_words(top);
            if !content.is_empty() {
                let listed: Vec<String> = content
                    .iter()
                    .map(|(w, c)| format!("{w} ({c})"))
                    .collect();
                println!("\n  Content words: {}", listed.join(", ").dimmed());
            }
        }

        Commands::Health => {
            let config = Config::load()?;
            let predictor = HttpPredictor::new(&config.backend_url, config.timeout())?;
            let status = predictor.health().await?;
            println!("{} {}: {}", "OK".green().bold(), predictor.base_url(), status);
        }
    }

    Ok(())
}

#[derive(PartialEq)]
enum Flow {
    Continue,
    Quit,
}

/// Drive the coordinator from stdin until :quit or EOF, then let any
/// outstanding request finish.
async fn run_watch(coordinator: &mut RequestCoordinator) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    Some(line) => {
                        if handle_line(coordinator, &line) == Flow::Quit {
                            return Ok(());
                        }
                    }
                    None => break,
                }
            }
            Some(step) = coordinator.step() => report_step(coordinator, step),
        }
    }

    while coordinator.phase() != Phase::Idle {
        match coordinator.step().await {
            Some(step) => report_step(coordinator, step),
            None => break,
        }
    }
    Ok(())
}

fn handle_line(coordinator: &mut RequestCoordinator, line: &str) -> Flow {
    // "::text" is literal text starting with a colon
    if let Some(text) = line.strip_prefix("::") {
        coordinator.set_text(format!(":{text}"));
        terminal::display_status(coordinator.state());
        return Flow::Continue;
    }

    let Some(command) = line.strip_prefix(':') else {
        coordinator.set_text(line);
        terminal::display_status(coordinator.state());
        return Flow::Continue;
    };

    let mut parts = command.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("quit" | "q"), _) => return Flow::Quit,
        (Some("analyze" | "a"), _) => {
            if coordinator.analyze_now().is_none() {
                println!("Nothing to analyze.");
            }
        }
        (Some("history"), _) => terminal::display_history(coordinator.state().history().entries()),
        (Some("trend"), _) => terminal::display_trend(&coordinator.state().trend().to_vec()),
        (Some("words"), _) => {
            let abusive = coordinator
                .state()
                .current()
                .map(|r| r.abusive_words.clone())
                .unwrap_or_default();
            terminal::display_word_frequency(&frequency(coordinator.text()), &abusive, 15);
        }
        (Some("replay"), Some(index)) => match index.parse::<usize>() {
            Ok(index) => match coordinator.replay(index) {
                Some(id) => println!("Replaying entry {index} as request {id}"),
                None => println!("No history entry {index}."),
            },
            Err(_) => println!("Usage: :replay <index>"),
        },
        (Some("realtime"), Some(value)) => match parse_bool(value) {
            Ok(on) => {
                coordinator.set_realtime(on);
                println!("Real-time {}", if on { "on" } else { "off" });
            }
            Err(_) => println!("Usage: :realtime on|off"),
        },
        _ => print_help(),
    }
    Flow::Continue
}

fn report_step(coordinator: &RequestCoordinator, step: Step) {
    match step {
        Step::Dispatched(request) => {
            println!("{}", format!("Analyzing (request {})...", request.id).dimmed());
        }
        Step::Resolved(resolution) => match resolution.outcome {
            Outcome::Applied => {
                if let Some(result) = coordinator.state().current() {
                    terminal::display_result(&resolution.request.text, result);
                }
            }
            Outcome::Stale => debug!(request_id = %resolution.request.id, "Stale response dropped"),
            Outcome::Failed(_) => terminal::display_status(coordinator.state()),
        },
    }
}

fn print_help() {
    println!("Commands:");
    println!("  <text>            replace the current text");
    println!("  ::<text>          text that starts with a colon");
    println!("  :analyze          analyze now and record in history");
    println!("  :history          list manual analyses");
    println!("  :replay <index>   load a history entry's text again");
    println!("  :realtime on|off  toggle real-time analysis");
    println!("  :trend            show the toxicity trend");
    println!("  :words            show word frequency for the current text");
    println!("  :quit             exit");
}

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::sync::Arc;

use booker_probe::report::{self, ReportFormat, TestResults};
use booker_probe::runner::{ConsoleEventListener, EventEmitter, Orchestrator};
use booker_probe::server::{ProbeServer, ServerConfig};
use booker_probe::utils::config::{Config, DEFAULT_BASE_URL};
use booker_probe::{client::HttpTransport, Scenario, Verification};

#[derive(Parser)]
#[command(name = "booker-probe")]
#[command(author = "NL Team")]
#[command(version = "0.1.0")]
#[command(about = "Diagnostic harness for booking-management HTTP APIs", long_about = None)]
struct Cli {
    /// Base address of the booking API
    #[arg(long, global = true, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Per-request timeout in milliseconds
    #[arg(long, global = true, default_value = "30000")]
    timeout_ms: u64,

    /// Also check response bodies against the fixed payloads
    #[arg(long, global = true, default_value = "false")]
    strict: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every scenario in suite order
    Run {
        /// Output format (text, json, junit)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Run a single scenario and print its outcome as JSON
    Scenario {
        /// Scenario slug (see `list`)
        name: String,
    },

    /// List available scenarios
    List,

    /// Expose scenarios as HTTP endpoints under /api/tests
    Serve {
        /// Server port
        #[arg(long, default_value = "8080")]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = Config {
        base_url: cli.base_url.clone(),
        timeout_ms: cli.timeout_ms,
        verification: if cli.strict {
            Verification::Strict
        } else {
            Verification::Lenient
        },
        ..Config::default()
    };

    match cli.command {
        Commands::Run { format } => {
            let format: ReportFormat = format.parse()?;

            println!(
                "{} Probing booking API at: {}",
                "▶".green().bold(),
                config.base_url.cyan()
            );
            if config.verification == Verification::Strict {
                println!("  Verification: {}", "Strict".yellow());
            }

            let (emitter, receiver) = EventEmitter::new();
            let listener = if format == ReportFormat::Text {
                Some(tokio::spawn(ConsoleEventListener::listen(receiver)))
            } else {
                drop(receiver);
                None
            };

            let transport = HttpTransport::new(&config.base_url, config.timeout())?;
            let orchestrator = Orchestrator::with_events(&config, Box::new(transport), emitter).await;
            let outcomes = orchestrator.run_all().await;

            // Closing the channel ends the listener
            drop(orchestrator);
            if let Some(handle) = listener {
                let _ = handle.await;
            }

            let results = TestResults::new(&config.base_url, outcomes);
            println!("{}", report::render(&results, format)?);

            if !results.summary.all_passed() {
                std::process::exit(1);
            }
        }

        Commands::Scenario { name } => {
            let scenario: Scenario = name.parse().map_err(anyhow::Error::msg)?;
            let orchestrator = Orchestrator::connect(&config).await?;
            let outcome = orchestrator.run(scenario).await;
            println!("{}", serde_json::to_string_pretty(&outcome)?);

            if !outcome.is_passed() {
                std::process::exit(1);
            }
        }

        Commands::List => {
            for scenario in Scenario::ALL {
                println!(
                    "  {:<22} {} (expects {})",
                    scenario.slug().cyan(),
                    scenario.display_name(),
                    scenario.expected_status()
                );
            }
        }

        Commands::Serve { port } => {
            let orchestrator = Arc::new(Orchestrator::connect(&config).await?);
            println!("\n{} Test endpoints started!", "🔍".to_string().blue());
            println!("   Open: http://localhost:{}/api/tests", port);
            println!("   Target: {}", config.base_url.cyan());
            println!("\n   Press Ctrl+C to stop.\n");

            ProbeServer::new(ServerConfig { port }, orchestrator)
                .start()
                .await?;
        }
    }

    Ok(())
}

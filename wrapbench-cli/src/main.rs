//! wrapbench: safety-wrapper decision engine around a black-box LLM.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use clap::Subcommand;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use wrapbench_cli::CONFIG_PATH_ENV;
use wrapbench_cli::PromptSet;
use wrapbench_cli::Settings;
use wrapbench_persist::load_prompt_list;
use wrapbench_persist::render_table;
use wrapbench_provider::HttpModelClient;
use wrapbench_runtime::Orchestrator;
use wrapbench_runtime::WrapperKind;

#[derive(Parser, Debug)]
#[command(name = "wrapbench")]
#[command(about = "Safety wrappers around a black-box LLM completion endpoint")]
struct Cli {
    /// Settings file (YAML). Defaults to config/config.yaml when present.
    #[arg(long, global = true, env = CONFIG_PATH_ENV)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP API (default).
    Serve {
        /// Override `server.host`.
        #[arg(long)]
        host: Option<String>,
        /// Override `server.port`.
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run risky and benign prompt sets through wrappers, writing traces.
    Batch {
        #[arg(long, default_value = "data/risky_prompts.json")]
        risky: PathBuf,
        #[arg(long, default_value = "data/benign_prompts.json")]
        benign: PathBuf,
        /// Comma-separated wrapper ids; all wrappers when omitted.
        #[arg(long, value_delimiter = ',')]
        wrappers: Vec<WrapperKind>,
    },
    /// Print per-wrapper metrics computed from the trace log.
    Analyze {
        #[arg(long, default_value = "data/risky_prompts.json")]
        risky: PathBuf,
    },
}

fn build_orchestrator(settings: &Settings) -> anyhow::Result<Arc<Orchestrator>> {
    let client = HttpModelClient::from_env(settings.provider_config())
        .context("configuring model client")?;
    let orchestrator = Orchestrator::new(
        Arc::new(client),
        Arc::new(settings.trace_logger()),
        settings.wrappers.clone(),
    )
    .with_call_timeout(Duration::from_secs(settings.openrouter.timeout_secs.max(1)));
    Ok(Arc::new(orchestrator))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Some(err) = wrapbench_cli::settings::dotenv_problem(dotenvy::dotenv()) {
        tracing::warn!(error = %err, "ignoring malformed .env");
    }

    let cli = Cli::parse();
    let mut settings = Settings::load_or_default(cli.config.as_deref())?;

    match cli.command.unwrap_or(Command::Serve {
        host: None,
        port: None,
    }) {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                settings.server.host = host;
            }
            if let Some(port) = port {
                settings.server.port = port;
            }
            let addr = settings.bind_addr()?;
            let orchestrator = build_orchestrator(&settings)?;
            tracing::info!(
                model = orchestrator.model_name(),
                default_wrapper = %settings.wrappers.default,
                traces = %settings.logging.trace_path().display(),
                "starting server"
            );
            wrapbench_cli::serve(addr, orchestrator).await
        }
        Command::Batch {
            risky,
            benign,
            wrappers,
        } => {
            let risky = load_prompt_list(&risky)
                .with_context(|| format!("loading {}", risky.display()))?;
            let benign = load_prompt_list(&benign)
                .with_context(|| format!("loading {}", benign.display()))?;
            let kinds = if wrappers.is_empty() {
                WrapperKind::ALL.to_vec()
            } else {
                wrappers
            };
            let orchestrator = build_orchestrator(&settings)?;
            let sets = [
                PromptSet {
                    label: "risky",
                    prompts: &risky,
                },
                PromptSet {
                    label: "benign",
                    prompts: &benign,
                },
            ];
            // Unlocked handle: each line takes the lock only while it is written.
            let mut stdout = std::io::stdout();
            wrapbench_cli::run_batch(&orchestrator, &sets, &kinds, &mut stdout).await?;
            Ok(())
        }
        Command::Analyze { risky } => {
            let trace_path = settings.logging.trace_path();
            let metrics = wrapbench_cli::analyze(&trace_path, &risky)?;
            if metrics.is_empty() {
                println!("No traces found in {}", trace_path.display());
            } else {
                print!("{}", render_table(&metrics));
            }
            Ok(())
        }
    }
}

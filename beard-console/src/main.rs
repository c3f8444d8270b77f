//! Beard Console (beard-console) - Main entry point
//!
//! Command-line front end for the Beard analysis services: submits
//! clustering, phonetic block and coreness requests and prints the
//! rendered results.

use std::path::PathBuf;

use anyhow::{Context, Result};
use beard_common::config::ConfigResolver;
use beard_common::{ConsoleEvent, EventBus, Workflow};
use beard_console::render::{
    render_clustering, render_clustering_text, render_phonetic_block, render_prediction,
};
use beard_console::services::BeardClient;
use beard_console::{samples, Console, ConsoleResult, SubmitOutcome};
use clap::{Parser, Subcommand, ValueEnum};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

/// Command-line arguments for beard-console
#[derive(Parser, Debug)]
#[command(name = "beard-console")]
#[command(about = "Operator console for the Beard analysis services")]
#[command(version)]
struct Args {
    /// Base URL of the Beard server
    #[arg(short, long, env = "BEARD_SERVER_URL")]
    server: Option<String>,

    /// TOML config file (default: ~/.config/beard/console.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format for results
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Cluster signatures into authors
    Cluster {
        /// JSON file with the publication records
        #[arg(long)]
        records: Option<PathBuf>,
        /// JSON file with the signatures
        #[arg(long)]
        signatures: Option<PathBuf>,
        /// Use the sample records and signatures
        #[arg(long, conflicts_with_all = ["records", "signatures"])]
        sample: bool,
    },
    /// Compute the phonetic block of a full name
    Phonetic {
        /// Full name, e.g. "John Smith"
        name: Option<String>,
        /// Use the sample name
        #[arg(long, conflicts_with = "name")]
        sample: bool,
    },
    /// Predict the coreness of a publication
    Predict {
        #[arg(long)]
        title: Option<String>,
        #[arg(long = "abstract")]
        abstract_text: Option<String>,
        /// Categories separated by ", " (e.g. "astro-ph, hep-ph")
        #[arg(long)]
        categories: Option<String>,
        /// Use the sample publication
        #[arg(long, conflicts_with_all = ["title", "abstract_text", "categories"])]
        sample: bool,
    },
    /// Print the sample input of a workflow
    Sample {
        #[arg(value_enum)]
        workflow: WorkflowArg,
    },
    /// Check that the Beard server is reachable
    Ping,
    /// List the methods a Beard service publishes
    Methods {
        #[arg(value_enum)]
        workflow: WorkflowArg,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutputFormat {
    Text,
    Html,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum WorkflowArg {
    Clustering,
    PhoneticBlock,
    Prediction,
}

impl From<WorkflowArg> for Workflow {
    fn from(arg: WorkflowArg) -> Self {
        match arg {
            WorkflowArg::Clustering => Workflow::Clustering,
            WorkflowArg::PhoneticBlock => Workflow::PhoneticBlock,
            WorkflowArg::Prediction => Workflow::Prediction,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = ConfigResolver::new()
        .with_cli_server_url(args.server.clone())
        .with_config_file(args.config.clone())
        .resolve()
        .context("Failed to resolve console configuration")?;

    // Initialize tracing (RUST_LOG wins over the configured level)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "beard_console={level},beard_common={level}",
                    level = config.log_level
                )
                .into()
            }),
        )
        .with_writer(std::io::stderr)
        .init();

    info!(
        "Starting Beard Console v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    info!("Beard server: {}", config.server_url);

    let client = BeardClient::from_config(&config).context("Failed to create HTTP client")?;

    match args.command {
        Command::Sample { workflow } => print_sample(workflow.into()),
        Command::Ping => {
            let reply = client.ping().await.context("Beard server is not reachable")?;
            println!("{}", reply);
            Ok(())
        }
        Command::Methods { workflow } => {
            let methods = client
                .available_methods(workflow.into())
                .await
                .context("Failed to list service methods")?;
            println!("{}", serde_json::to_string_pretty(&methods)?);
            Ok(())
        }
        Command::Cluster {
            records,
            signatures,
            sample,
        } => {
            let console = start_console(client);
            if sample {
                console.orchestrator.load_sample_clusters().await?;
            } else {
                let view = console.view();
                view.set_clustering_records(read_optional(records.as_ref())?)
                    .await;
                view.set_clustering_signatures(read_optional(signatures.as_ref())?)
                    .await;
            }
            let outcome = console.orchestrator.submit_clusters().await;
            report(&console, Workflow::Clustering, outcome, args.format).await
        }
        Command::Phonetic { name, sample } => {
            let console = start_console(client);
            if sample {
                console.orchestrator.load_sample_phonetic_block().await;
            } else {
                console.view().set_full_name(name).await;
            }
            let outcome = console.orchestrator.submit_phonetic_block().await;
            report(&console, Workflow::PhoneticBlock, outcome, args.format).await
        }
        Command::Predict {
            title,
            abstract_text,
            categories,
            sample,
        } => {
            let console = start_console(client);
            if sample {
                console.orchestrator.load_sample_publication().await;
            } else {
                let view = console.view();
                view.set_publication_title(title).await;
                view.set_publication_abstract(abstract_text).await;
                view.set_publication_category(categories).await;
            }
            let outcome = console.orchestrator.submit_predictor().await;
            report(&console, Workflow::Prediction, outcome, args.format).await
        }
    }
}

fn start_console(client: BeardClient) -> Console {
    let events = EventBus::new(100);
    spawn_event_logger(&events);
    Console::new(client, events)
}

/// Print the rendered workflow and turn its outcome into the exit status
async fn report(
    console: &Console,
    workflow: Workflow,
    outcome: ConsoleResult<SubmitOutcome>,
    format: OutputFormat,
) -> Result<()> {
    println!("{}", render(console, workflow, format).await);

    match outcome {
        Ok(SubmitOutcome::Skipped) => {
            warn!(workflow = %workflow, "Required input missing, nothing submitted");
            Ok(())
        }
        Ok(SubmitOutcome::Completed { submission, stale }) => {
            debug!(workflow = %workflow, submission, stale, "Submission applied");
            Ok(())
        }
        Err(e) => Err(anyhow::Error::new(e).context(format!("{} request failed", workflow))),
    }
}

async fn render(console: &Console, workflow: Workflow, format: OutputFormat) -> String {
    let view = console.view();
    match (workflow, format) {
        (Workflow::Clustering, OutputFormat::Html) => render_clustering(&view.clustering().await),
        (Workflow::Clustering, OutputFormat::Text) => {
            render_clustering_text(&view.clustering().await)
        }
        (Workflow::PhoneticBlock, OutputFormat::Html) => {
            render_phonetic_block(&view.phonetic_block().await).to_html()
        }
        (Workflow::PhoneticBlock, OutputFormat::Text) => {
            render_phonetic_block(&view.phonetic_block().await).to_string()
        }
        (Workflow::Prediction, OutputFormat::Html) => {
            render_prediction(&view.prediction().await).to_html()
        }
        (Workflow::Prediction, OutputFormat::Text) => {
            render_prediction(&view.prediction().await).to_string()
        }
    }
}

fn print_sample(workflow: Workflow) -> Result<()> {
    match workflow {
        Workflow::Clustering => {
            println!("# records");
            println!("{}", samples::sample_records_text()?);
            println!("# signatures");
            println!("{}", samples::sample_signatures_text()?);
        }
        Workflow::PhoneticBlock => println!("{}", samples::SAMPLE_FULL_NAME),
        Workflow::Prediction => {
            println!("title: {}", samples::SAMPLE_PUBLICATION_TITLE);
            println!("categories: {}", samples::SAMPLE_PUBLICATION_CATEGORY);
            println!("abstract: {}", samples::SAMPLE_PUBLICATION_ABSTRACT);
        }
    }
    Ok(())
}

/// Read an input file if one was given
fn read_optional(path: Option<&PathBuf>) -> Result<Option<String>> {
    path.map(|p| {
        std::fs::read_to_string(p).with_context(|| format!("Failed to read {}", p.display()))
    })
    .transpose()
}

/// Mirror console events to the debug log
fn spawn_event_logger(events: &EventBus) {
    let mut rx = events.subscribe();
    debug!(
        capacity = events.capacity(),
        subscribers = events.subscriber_count(),
        "Event logger attached"
    );
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => log_event(&event),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Event logger lagged behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });
}

fn log_event(event: &ConsoleEvent) {
    debug!(event_type = event.event_type(), ?event, "Console event");
}

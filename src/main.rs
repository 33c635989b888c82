mod changes;
mod config;
mod dispatch;
mod filter;
mod github;
mod pipeline;
mod report;
mod server;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, info_span, warn};
use tracing_subscriber::EnvFilter;

use crate::dispatch::Dispatcher;
use crate::github::{GitHubClient, WebhookEvent};
use crate::pipeline::Pipeline;

/// docsync — GitHub App webhook listener that forwards documentable file
/// changes to a documentation-generation server.
#[derive(Parser, Debug)]
#[command(name = "docsync", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Listen for GitHub webhook deliveries
    Serve {
        /// Port to listen on (overrides PORT and .docsync.toml)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Run a saved webhook payload through the pipeline once
    Replay {
        /// Event name as sent in X-GitHub-Event (push, pull_request, issues)
        event: String,

        /// Path to the JSON payload
        payload: PathBuf,

        /// Print the documentation payload instead of sending it
        #[arg(long)]
        dry_run: bool,

        /// Write the dry-run payload to this file instead of stdout
        #[arg(short, long, requires = "dry_run")]
        output: Option<PathBuf>,
    },

    /// Show whether each path would be documented
    Check {
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(std::env::var("LOG_LEVEL").as_deref().unwrap_or("info")))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Check { paths } => {
            let verdicts: Vec<_> = paths
                .into_iter()
                .map(|path| {
                    let verdict = filter::explain(&path);
                    (path, verdict)
                })
                .collect();
            report::print_verdicts(&verdicts);
        }

        Command::Serve { port } => {
            info!("loading configuration");
            let mut config = config::Config::load()?;
            if let Some(port) = port {
                config.server.port = port;
            }
            if config.docs.server_url.is_none() {
                warn!("DOCS_SERVER_URL is not configured; documentation updates will fail");
            }

            let pipeline = build_pipeline(&config);
            server::serve(config.server.socket_addr(), Arc::new(pipeline)).await?;
        }

        Command::Replay {
            event,
            payload,
            dry_run,
            output,
        } => {
            let _span = info_span!("replay", event = %event, payload = %payload.display()).entered();

            info!("loading configuration");
            let config = config::Config::load()?;

            let body = std::fs::read(&payload)?;
            let event = WebhookEvent::parse(&event, &body)?
                .ok_or_else(|| format!("unsupported event type: {event}"))?;
            let pipeline = build_pipeline(&config);

            if dry_run {
                match pipeline.prepare(&event).await? {
                    Some(request) => match dispatch::build_payload(&request) {
                        Some(payload) => report::write_json(&payload, output.as_deref())?,
                        None => info!("no documentable files in this event"),
                    },
                    None => info!("event carries no changes to document"),
                }
            } else {
                let outcome = pipeline.handle(&event).await?;
                report::print_outcome(&outcome);
            }
        }
    }

    Ok(())
}

fn build_pipeline(config: &config::Config) -> Pipeline {
    let github = GitHubClient::new(&config.github);
    let dispatcher = Dispatcher::new(config.docs.clone());
    Pipeline::new(Arc::new(github), dispatcher)
}

//! Pricing console CLI
//!
//! Operator front end for the hierarchical pricing configuration.
//!
//! # Architecture Overview
//!
//! ```text
//!   pricing-console <command>
//!          │
//!          ▼
//!   ┌──────────────┐    ┌───────────────┐    ┌──────────────────────┐
//!   │    config    │───▶│ HttpPricingApi│───▶│  pricing backend     │
//!   │  (TOML+CLI)  │    │ bearer, retry │    │  /vehicle-select-flow│
//!   └──────────────┘    └───────┬───────┘    │  /comprehensive-...  │
//!                               │            └──────────────────────┘
//!                               ▼
//!                       ┌───────────────┐    ┌───────────────┐
//!                       │ ConfigSession │───▶│   editors     │
//!                       │ cascade/draft │    │ field lists   │
//!                       └───────┬───────┘    └───────────────┘
//!                               │
//!                               ▼
//!                     stdout (data), stderr (logs, notifications)
//! ```

use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use pricing_console::api::{credentials_for, HttpPricingApi};
use pricing_console::config::{resolve_config, ConsoleConfig, Overrides};
use pricing_console::observability::{logging, metrics};
use pricing_console::pricing::flow::{FlowEntry, FlowNode, FlowTree};
use pricing_console::pricing::{
    ConfigSession, FetchOutcome, Level, NotificationLog, SelectOption, SessionError,
};

#[derive(Parser)]
#[command(name = "pricing-console")]
#[command(about = "Inspect and edit ride pricing configuration", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override `api.base_url`
    #[arg(short, long, global = true)]
    url: Option<String>,

    /// Override the bearer token
    #[arg(short, long, global = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the service → category → sub-service tree
    Flow,
    /// List the choices at the next selection level
    Options {
        #[arg(long)]
        service: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
    /// Print the configuration subtree for a selection
    Show(Selection),
    /// Print the editor fields and their current values
    Fields(Selection),
    /// Record `path=value` edits and save them in one update
    Set {
        #[command(flatten)]
        selection: Selection,
        /// Edits such as `baseFare=12` or `nightCharges.enabled=true`
        #[arg(required = true)]
        edits: Vec<String>,
    },
}

#[derive(Args)]
struct Selection {
    /// Service key as listed by `flow`
    #[arg(long)]
    service: String,
    #[arg(long)]
    category: Option<String>,
    /// Sub-service or vehicle type
    #[arg(long)]
    sub: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let overrides = Overrides {
        base_url: cli.url,
        token: cli.token,
    };
    let config = resolve_config(cli.config.as_deref(), overrides)?;

    logging::init_logging(&config.observability);
    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr);
    }

    let notifications = NotificationLog::new();
    let result = run(cli.command, &config, &notifications).await;
    print_notifications(&notifications);
    result
}

async fn run(
    command: Commands,
    config: &ConsoleConfig,
    notifications: &NotificationLog,
) -> Result<(), Box<dyn std::error::Error>> {
    let api = HttpPricingApi::new(
        &config.api,
        &config.timeouts,
        config.retries.clone(),
        credentials_for(&config.api),
    )?;
    tracing::info!(base_url = %api.base_url(), "Connecting to pricing backend");

    let mut session = ConfigSession::open(Arc::new(api), Arc::new(notifications.clone()))
        .await?
        .with_editor_overrides(config.editors.overrides.clone());

    match command {
        Commands::Flow => print_flow(session.cascade().flow()),
        Commands::Options { service, category } => {
            let options = match (service, category) {
                (None, _) => session.cascade().service_options(),
                (Some(service), None) => {
                    session.select_service(service);
                    session.cascade().category_options()
                }
                (Some(service), Some(category)) => {
                    session.select_service(service);
                    session.select_category(category);
                    session.cascade().sub_options()
                }
            };
            print_options(&options);
        }
        Commands::Show(selection) => {
            load(&mut session, &selection).await?;
            if let Some(data) = session.config_data() {
                println!("{}", serde_json::to_string_pretty(data)?);
            }
        }
        Commands::Fields(selection) => {
            load(&mut session, &selection).await?;
            for field in session.fields() {
                let value = field
                    .value
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_else(|| "-".to_string());
                let marker = if field.edited { "*" } else { " " };
                println!("{marker} {:<45} {:<12} {}", field.path.as_str(), value, field.label);
            }
        }
        Commands::Set { selection, edits } => {
            load(&mut session, &selection).await?;
            for edit in &edits {
                let (path, raw) = edit
                    .split_once('=')
                    .ok_or_else(|| format!("expected path=value, got '{edit}'"))?;
                session.record_edit(path.trim(), raw.trim())?;
            }
            let report = session.save().await?;
            println!("{}", serde_json::to_string_pretty(&report.body)?);
        }
    }

    Ok(())
}

async fn load(session: &mut ConfigSession, selection: &Selection) -> Result<(), SessionError> {
    session.select_service(selection.service.clone());
    if let Some(category) = &selection.category {
        session.select_category(category.clone());
    }
    if let Some(sub) = &selection.sub {
        session.select_sub(sub.clone());
    }
    match session.refresh().await? {
        FetchOutcome::Failed(e) => Err(SessionError::FetchFailed(e)),
        _ => Ok(()),
    }
}

fn print_flow(flow: &FlowTree) {
    for service in flow.services() {
        println!("{}  ({})", service.key, service.label());
        for category in service.categories.iter().flatten() {
            println!("  {}  ({})", category.key, category.label());
            print_entries(category, "    ");
        }
        print_entries(service, "  ");
    }
}

fn print_entries(node: &FlowNode, indent: &str) {
    let entries = node.sub_services.iter().chain(node.vehicles.iter()).flatten();
    for option in entries.map(FlowEntry::option) {
        println!("{indent}{}  ({})", option.key, option.label);
    }
}

fn print_options(options: &[SelectOption]) {
    for option in options {
        println!("{:<30} {}", option.key, option.label);
    }
}

fn print_notifications(log: &NotificationLog) {
    for notification in log.drain() {
        match notification.level {
            Level::Success => eprintln!("ok: {}", notification.message),
            Level::Error => eprintln!("error: {}", notification.message),
        }
    }
}

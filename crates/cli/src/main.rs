mod config_commands;

use std::{path::PathBuf, sync::Arc, time::Duration};

use {
    anyhow::Context,
    clap::{Parser, Subcommand},
    tracing::{info, warn},
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

use {
    bilingo_auto_reply::{EventDispatcher, RetractionTracker, get_reply},
    bilingo_channels::ChannelOutbound,
    bilingo_config::{BilingoConfig, Secrets, Severity},
    bilingo_gateway::AppState,
    bilingo_line::{LineAccountConfig, LineOutbound},
    bilingo_providers::{CompletionProvider, GeminiProvider},
};

#[derive(Parser)]
#[command(name = "bilingo", about = "Bilingo: English/Chinese translation bot for LINE")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Address to bind to (overrides config value).
    #[arg(long, global = true)]
    bind: Option<String>,
    /// Port to listen on (overrides config value).
    #[arg(long, global = true, env = "PORT")]
    port: Option<u16>,
    /// Config file (overrides discovery of ./bilingo.toml and friends).
    #[arg(long, global = true, env = "BILINGO_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the webhook server (default when no subcommand is provided).
    Gateway,
    /// Run one message through the pipeline and print the reply.
    Translate {
        #[arg(short, long)]
        message: String,
    },
    /// Load config and secrets, report problems, print a redacted summary.
    CheckConfig,
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

/// `--config` if given, otherwise the discovered file or defaults. CLI
/// overrides are applied on top.
fn load_config(cli: &Cli) -> anyhow::Result<BilingoConfig> {
    let mut config = match &cli.config {
        Some(path) => bilingo_config::load_config(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => bilingo_config::discover_and_load().context("failed to load config")?,
    };
    if let Some(bind) = &cli.bind {
        config.server.bind.clone_from(bind);
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    Ok(config)
}

fn build_provider(config: &BilingoConfig, secrets: &Secrets) -> anyhow::Result<GeminiProvider> {
    GeminiProvider::new(
        secrets.gemini_api_key.clone(),
        &config.gemini.model,
        &config.gemini.base_url,
        Duration::from_secs(config.gemini.timeout_secs),
    )
}

fn build_dispatcher(config: &BilingoConfig, secrets: &Secrets) -> anyhow::Result<EventDispatcher> {
    let provider = build_provider(config, secrets)?;
    let outbound = LineOutbound::new(
        LineAccountConfig::new(secrets.line_channel_access_token.clone())
            .with_api_base_url(&config.line.api_base_url)
            .with_timeout(Duration::from_secs(config.line.timeout_secs)),
    )
    .context("failed to build LINE client")?;
    let tracker = RetractionTracker::new(config.tracker.retention_secs, config.tracker.max_entries);

    Ok(EventDispatcher::new(
        Arc::new(provider) as Arc<dyn CompletionProvider>,
        Arc::new(outbound) as Arc<dyn ChannelOutbound>,
        Arc::new(tracker),
    ))
}

async fn run_gateway(config: BilingoConfig, secrets: Secrets) -> anyhow::Result<()> {
    let validation = bilingo_config::validate(&config);
    for d in &validation.diagnostics {
        match d.severity {
            Severity::Error | Severity::Warning => {
                warn!(path = d.path, severity = %d.severity, "{}", d.message);
            },
            Severity::Info => info!(path = d.path, "{}", d.message),
        }
    }
    if validation.has_errors() {
        anyhow::bail!(
            "invalid configuration ({} error(s)); run `bilingo check-config` for details",
            validation.count(Severity::Error)
        );
    }

    let dispatcher = build_dispatcher(&config, &secrets)?;
    info!(
        model = %config.gemini.model,
        retention_secs = config.tracker.retention_secs,
        max_entries = config.tracker.max_entries,
        "reply pipeline ready"
    );

    let state = AppState::new(Arc::new(dispatcher));
    #[cfg(feature = "metrics")]
    let state = {
        let handle = bilingo_metrics::init_metrics(config.metrics.enabled)
            .context("failed to initialize metrics")?;
        state.with_metrics(handle.filter(|_| config.metrics.prometheus_endpoint))
    };

    bilingo_gateway::start_server(
        &config.server.bind,
        config.server.port,
        &config.server.webhook_path,
        state,
    )
    .await
}

async fn run_translate(
    config: &BilingoConfig,
    secrets: &Secrets,
    message: &str,
) -> anyhow::Result<()> {
    let provider = build_provider(config, secrets)?;
    match get_reply(&provider, message).await {
        Some(reply) => {
            info!(route = %reply.route, fallback = reply.failure.is_some(), "translated");
            println!("{}", reply.text);
        },
        None => eprintln!("Nothing to translate."),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "bilingo starting");

    let config = load_config(&cli)?;

    match cli.command {
        None | Some(Commands::Gateway) => {
            let secrets = Secrets::from_env().context("missing required secret")?;
            run_gateway(config, secrets).await
        },
        Some(Commands::Translate { message }) => {
            let secrets = Secrets::from_env().context("missing required secret")?;
            run_translate(&config, &secrets, &message).await
        },
        Some(Commands::CheckConfig) => config_commands::check(&config, cli.config.as_deref()),
    }
}

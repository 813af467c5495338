use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use prwatch::github::{self, GithubClient};
use prwatch::server;
use prwatch::util::config::AppConfig;

const DEFAULT_FILTER: &str = "prwatch=info,tower_http=info";

#[derive(Parser, Debug)]
#[command(name = "prwatch", version, about = "Pull request status dashboard")]
struct Cli {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on (overrides config and PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable debug logging, also to a daily log file
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_env(|name| std::env::var(name).ok())?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    let _guard = setup_logging(&config, cli.debug)?;

    if let Err(e) = config.validate() {
        eprintln!(
            "Configuration error: {e}\n\n\
             Set OWNER, REPO and LOGIN in the environment (or a .env file), or add them to\n\
             ~/.config/prwatch/config.toml:\n\n\
             [github]\n\
             owner = \"my-org\"\n\
             repo = \"my-repo\"\n\
             login = \"my-username\""
        );
        std::process::exit(1);
    }

    let token = match github::auth::resolve_token(config.github.token.as_deref()) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Authentication error: {e}");
            std::process::exit(1);
        }
    };

    let client = GithubClient::new(&token, &config.github.api_url, config.github.timeout())?;

    info!(
        mode = %config.mode,
        repo = %config.github.repo_ref().full_name(),
        login = %config.github.login,
        "prwatch starting"
    );

    server::serve(config, client).await
}

fn setup_logging(
    config: &AppConfig,
    debug: bool,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if debug {
            EnvFilter::new("prwatch=debug,tower_http=debug")
        } else {
            EnvFilter::new(DEFAULT_FILTER)
        }
    });

    let (file_layer, guard) = if debug {
        let log_dir = config.log_dir();
        std::fs::create_dir_all(&log_dir)?;

        let file_appender = tracing_appender::rolling::daily(&log_dir, "prwatch.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        let layer = fmt::layer().with_writer(non_blocking).with_ansi(false);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    Ok(guard)
}

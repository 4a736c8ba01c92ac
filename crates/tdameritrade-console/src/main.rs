/*
[INPUT]:  CLI arguments, YAML configuration file
[OUTPUT]: One logged pass over the brokerage API, exit code
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, startup flow, or shutdown handling
*/

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tdameritrade_adapter::{OptionsMonitor, TdAmeritradeClient};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use tdameritrade_console::config::default_config_path;
use tdameritrade_console::reload::spawn_options_reload;
use tdameritrade_console::{ConsoleConfig, ConsoleHost};

#[derive(Parser, Debug)]
#[command(name = "tdameritrade-console", version, about = "TD Ameritrade API console harness")]
struct Cli {
    #[arg(long = "config", value_name = "PATH")]
    config_path: Option<PathBuf>,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    log_level: String,
    /// Override the configured price history symbol
    #[arg(long = "symbol", value_name = "SYMBOL")]
    symbol: Option<String>,
    /// Seconds between config file checks; 0 disables live reload
    #[arg(long = "reload-interval-secs", value_name = "SECS", default_value_t = 5)]
    reload_interval_secs: u64,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Cli::parse();
    if let Err(err) = init_tracing(&args.log_level) {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %format!("{err:#}"), "unhandled error");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Cli) -> Result<()> {
    let config_path = match args.config_path {
        Some(path) => path,
        None => default_config_path().context("no config directory; pass --config")?,
    };
    debug!(config_path = %config_path.display(), "starting tdameritrade-console");

    let mut config = ConsoleConfig::from_file(&config_path).context("load config")?;
    if let Some(symbol) = args.symbol {
        config.console.symbol = symbol;
    }
    info!(settings = ?config.console, "configuration loaded");
    if !config.options.has_token() {
        warn!("configuration has no access_token; authorized calls will fail");
    }

    let monitor = OptionsMonitor::new(config.options.clone());
    let client = TdAmeritradeClient::from_monitor(monitor.clone()).context("build client")?;

    let shutdown = CancellationToken::new();
    let reload = (args.reload_interval_secs > 0).then(|| {
        spawn_options_reload(
            config_path.clone(),
            monitor.clone(),
            Duration::from_secs(args.reload_interval_secs),
            shutdown.clone(),
        )
    });
    setup_signal_handler(shutdown.clone());

    let host = ConsoleHost::new(&client, &client, &client, config.console);
    let result = host.run_once(&shutdown).await;

    shutdown.cancel();
    if let Some(handle) = reload {
        handle.await.context("join reload task")?;
    }

    let summary = result?;
    info!(?summary, "pass complete");
    Ok(())
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}

fn setup_signal_handler(shutdown: CancellationToken) {
    tokio::spawn(async move {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                if let Err(err) = result {
                    warn!(error = %err, "failed to install SIGINT handler");
                    return;
                }
                info!("received SIGINT");
                shutdown.cancel();
            }
            _ = shutdown.cancelled() => {}
        }
    });
}

mod http;
mod store;

use roller_proto::config::Config;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let data_dir = roller_proto::platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let log_path = data_dir.join("daemon.log");

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,roller_daemon=debug")),
        )
        .with_ansi(false)
        .init();

    eprintln!("roller-daemon log: {}", log_path.display());
    info!("Log file: {:?}", log_path);

    let config = Config::load()?;
    info!("Config loaded from: {:?}", Config::config_path());

    if !config.http.enabled {
        anyhow::bail!("http.enabled is false in config — the daemon has nothing to serve");
    }

    let log = store::RollLog::load(config.daemon.rolls_file.clone());

    http::serve(config.http.bind_address.clone(), config.http.port, log).await
}

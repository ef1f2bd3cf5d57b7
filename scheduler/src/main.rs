use ifsched::{build_plugins, config::Config, scheduler::Scheduler};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env();
    tracing::debug!(?config, "Loaded config");

    // no fallback table, a bad metrics dir must stop the scheduler
    let plugins = match build_plugins(&config) {
        Ok(plugins) => plugins,
        Err(err) => {
            tracing::error!(error=%err, dir=%config.metrics_dir, "Failed to load interference metrics");
            std::process::exit(1);
        }
    };

    Scheduler::run(&config, plugins).await;
}

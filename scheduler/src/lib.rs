//! Interference-aware scheduler
//!
//! Scores candidate nodes by the measured interference of the tasks already
//! running on them and binds pending pods to the least contended node.

pub mod config;
pub mod interference;
pub mod scheduler;

use config::Config;
use interference::{InterferencePlugin, LoadError};

/// Builds one plugin per configured resource kind. Any load failure aborts.
pub fn build_plugins(config: &Config) -> Result<Vec<InterferencePlugin>, LoadError> {
    config
        .resources
        .iter()
        .map(|resource| -> Result<InterferencePlugin, LoadError> {
            let plugin =
                InterferencePlugin::from_dir(&config.metrics_dir, resource, config.task_label.clone())?;
            tracing::info!(plugin = plugin.name(), dir=%config.metrics_dir, "Plugin ready");
            Ok(plugin)
        })
        .collect()
}

#[cfg(test)]
mod test_setup {
    use std::sync::Once;
    static INIT: Once = Once::new();

    #[ctor::ctor]
    fn init_tracing() {
        INIT.call_once(|| {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
                .with_test_writer()
                .init();
        });
    }
}

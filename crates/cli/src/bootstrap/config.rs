use pdns_cof_domain::{CliOverrides, Config};
use tracing::info;

pub fn load_config(
    config_path: Option<&str>,
    cli_overrides: CliOverrides,
) -> anyhow::Result<Config> {
    let config = Config::load(config_path, cli_overrides)?;
    config.validate()?;
    Ok(config)
}

/// Called once logging is up, so the effective settings end up in the log.
pub fn log_config(config_path: Option<&str>, config: &Config) {
    info!(
        config_file = config_path.unwrap_or("default"),
        store = %config.store.url(),
        web = %config.server.listen_address(),
        queue = %config.queue.url(),
        counter_policy = config.ingest.counter_policy.as_str(),
        max_set_size = config.query.max_set_size,
        "Configuration loaded"
    );
}

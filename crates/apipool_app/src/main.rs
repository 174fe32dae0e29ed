mod config;
mod logging;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use apipool_engine::Pool;
use engine_logging::{engine_error, engine_info, FileAuditLog};

/// Environment variable naming an alternative config file.
const CONFIG_ENV: &str = "APIPOOL_CONFIG";

fn main() -> anyhow::Result<()> {
    let config_path = std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(config::DEFAULT_CONFIG_FILE));
    let (config, found) = config::load_or_default(&config_path)?;
    logging::initialize(config.diagnostics);
    if !found {
        config::warn_defaulted(&config_path);
    }

    let audit = FileAuditLog::open(&config.log_file)
        .with_context(|| format!("opening audit log {:?}", config.log_file))?;
    engine_info!("Audit trail at {:?}", audit.path());

    let mut pool = Pool::with_settings(Arc::new(audit), config.fetch_settings());
    for url in &config.endpoints {
        // Rejections are already in the audit trail; keep going with the rest.
        let _ = pool.add_endpoint(url);
    }

    match pool.run() {
        Ok(results) => {
            engine_info!(
                "Fetched {} endpoints ({} failed)",
                results.len(),
                results.failures()
            );
            Ok(())
        }
        Err(err) => {
            engine_error!("Run aborted: {}", err);
            Err(err.into())
        }
    }
}

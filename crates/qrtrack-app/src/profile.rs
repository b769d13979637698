use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context;
use qrtrack_config::Config;

const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Load config from `path`, else `./config.json`, else defaults plus env overrides
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => load_config_file(path),
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            load_config_file(Path::new(DEFAULT_CONFIG_FILE))
        }
        None => {
            tracing::info!("No config file, using defaults");
            Ok(Config::new())
        }
    }
}

fn load_config_file(path: &Path) -> anyhow::Result<Config> {
    tracing::info!("Loading config from {}", path.display());
    let file =
        File::open(path).with_context(|| format!("Failed to open config {}", path.display()))?;
    let reader = BufReader::new(file);
    let config: Config = serde_json::from_reader(reader)
        .with_context(|| format!("Failed to parse config {}", path.display()))?;
    Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
}

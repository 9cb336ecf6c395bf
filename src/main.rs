use std::path::PathBuf;

use artventure_lib::infrastructure::config::SiteConfig;

const CONFIG_ENV: &str = "ARTVENTURE_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "artventure.yaml";

#[tokio::main]
async fn main() {
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(CONFIG_ENV).ok())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let config = match SiteConfig::load(&config_path) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("Failed to load config {:?}: {}", config_path, error);
            std::process::exit(1);
        }
    };

    if let Err(error) = artventure_lib::run(config).await {
        eprintln!("{}", error);
        std::process::exit(1);
    }
}

use crate::config::{CONFIG_FILE_NAME, RankConfig};
use crate::error::RankError;
use anyhow::Result;
use colored::Colorize;

pub fn handle_init(remote: Option<String>) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let config_path = cwd.join(CONFIG_FILE_NAME);

    if config_path.exists() {
        return Err(RankError::AlreadyInitialized(config_path.display().to_string()).into());
    }

    let mut config = RankConfig::default();
    if let Some(url) = remote {
        config.remote.url = url;
    }

    let data_path = config.data_path(&cwd);
    std::fs::create_dir_all(config.local_storage_path(&cwd))?;
    config.save(&config_path)?;

    println!(
        "{} valuerank project in {}",
        "Initialized".green(),
        cwd.display()
    );
    println!("  Config: {}", config_path.display());
    println!("  Data:   {}", data_path.display());
    match config.remote.url() {
        Some(url) => println!("  Remote: {}", url),
        None => println!(
            "  Remote: {}",
            config.document_store_path(&cwd).display()
        ),
    }

    Ok(())
}

use bubble_core::{Config, Mode, Paths};

pub async fn path() -> anyhow::Result<()> {
    let paths = Paths::new();
    println!("{}", paths.config_file().display());
    Ok(())
}

/// Show the current configuration as pretty-printed JSON, with the key masked.
pub async fn show() -> anyhow::Result<()> {
    let paths = Paths::new();
    let mut config = Config::load_or_default(&paths)?;
    for provider in config.providers.values_mut() {
        if !provider.api_key.is_empty() {
            provider.api_key = mask(&provider.api_key);
        }
    }

    println!("File: {}", paths.config_file().display());
    println!();
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

pub async fn set_key(key: &str) -> anyhow::Result<()> {
    let paths = Paths::new();
    let mut config = Config::load_or_default(&paths)?;
    config.set_api_key(key);
    paths.ensure_dirs()?;
    config.save(&paths.config_file())?;

    if key.trim().is_empty() {
        println!("API key cleared; suggestions run in local mode.");
    } else {
        println!("API key saved to {}", paths.config_file().display());
    }
    Ok(())
}

pub async fn set_mode(mode: &str) -> anyhow::Result<()> {
    let mode: Mode = mode.parse()?;
    let paths = Paths::new();
    let mut config = Config::load_or_default(&paths)?;
    config.companion.mode = mode;
    paths.ensure_dirs()?;
    config.save(&paths.config_file())?;
    println!("Default mode set to {}", mode);
    Ok(())
}

fn mask(key: &str) -> String {
    let visible: String = key.chars().take(4).collect();
    format!("{}…", visible)
}

use bubble_core::config::API_KEY_ENV;
use bubble_core::{Config, Paths};

pub async fn run() -> anyhow::Result<()> {
    let paths = Paths::new();

    println!("bubble status");
    println!("=============");
    println!();

    let config_path = paths.config_file();
    let config_exists = config_path.exists();
    println!(
        "Config:    {} {}",
        config_path.display(),
        if config_exists { "✓" } else { "✗ (using defaults)" }
    );

    let config = Config::load_or_default(&paths)?;

    println!("Model:     {}", config.companion.model);
    println!("Mode:      {}", config.companion.mode);
    println!("Source:    {}", config.companion.source_label);
    println!();

    let env_key = std::env::var(API_KEY_ENV)
        .map(|k| !k.trim().is_empty())
        .unwrap_or(false);
    match config.api_key() {
        Some(_) if env_key => println!("Intelligence layer: ✓ enabled (from {})", API_KEY_ENV),
        Some(_) => println!("Intelligence layer: ✓ enabled (from config)"),
        None => {
            println!("Intelligence layer: ✗ local mode");
            println!();
            println!("Set {} or run `bubble config set-key <key>` to enable AI suggestions.", API_KEY_ENV);
        }
    }

    Ok(())
}

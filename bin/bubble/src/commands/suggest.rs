use bubble_companion::classify_kind;
use bubble_core::{CapturedItem, Config, Paths};

use super::{build_engine, print_suggestions};

pub async fn run(text: &str, source: Option<String>) -> anyhow::Result<()> {
    if text.trim().is_empty() {
        anyhow::bail!("nothing to suggest for: text is blank");
    }

    let paths = Paths::new();
    let config = Config::load_or_default(&paths)?;
    let engine = build_engine(&config)?;

    let suggestions = match source {
        Some(app) => {
            let item = CapturedItem::new(text, classify_kind(text)).with_source(app);
            engine.suggest_for(&item).await
        }
        None => engine.suggest(text).await,
    };

    println!("Suggestions:");
    print_suggestions(&suggestions);
    Ok(())
}

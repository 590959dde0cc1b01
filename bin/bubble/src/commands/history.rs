use bubble_companion::{demo_items, HistoryLog};

use super::print_item;

pub async fn run(demo: bool) -> anyhow::Result<()> {
    let history = if demo {
        HistoryLog::with_items(demo_items())
    } else {
        HistoryLog::new()
    };

    if history.is_empty() {
        println!("History is empty. Captures are kept only for the length of a `bubble watch` session.");
        return Ok(());
    }

    println!("History ({} items, newest first):", history.len());
    for item in history.all() {
        print_item(item);
    }
    Ok(())
}

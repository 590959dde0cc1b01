use bubble_companion::{capture_bus, demo_items, CaptureEvent, Companion, CompanionUpdate, HistoryLog};
use bubble_core::{Config, Mode, Paths};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

use super::{build_engine, print_item, print_suggestions};

/// What one stdin line asks for.
#[derive(Debug, PartialEq)]
enum Input {
    Event(CaptureEvent),
    Quit,
    Skip,
    Invalid(String),
}

fn parse_line(line: &str) -> Input {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Input::Skip;
    }
    if trimmed == "/quit" || trimmed == "/exit" {
        return Input::Quit;
    }
    if trimmed == "/pause" {
        return Input::Event(CaptureEvent::TogglePause);
    }
    if trimmed == "/mode" || trimmed.starts_with("/mode ") {
        return match trimmed["/mode".len()..].trim().parse::<Mode>() {
            Ok(mode) => Input::Event(CaptureEvent::SetMode(mode)),
            Err(e) => Input::Invalid(e.to_string()),
        };
    }
    // Copied text keeps its surrounding whitespace.
    Input::Event(CaptureEvent::copied(line.trim_end_matches(['\r', '\n'])))
}

pub async fn run(mode: Option<String>, demo: bool) -> anyhow::Result<()> {
    let paths = Paths::new();
    let mut config = Config::load_or_default(&paths)?;
    if let Some(mode) = mode {
        config.companion.mode = mode.parse()?;
    }

    let engine = build_engine(&config)?;
    let remote = engine.is_remote();
    let mut companion = Companion::new(&config, engine);
    if demo {
        companion = companion.with_history(HistoryLog::with_items(demo_items()));
    }

    println!("bubble watch: mode {}, {}", config.companion.mode, if remote { "AI suggestions on" } else { "local mode" });
    println!("Each line is a capture. Commands: /pause, /mode <observe|suggest|apply>, /quit");
    println!();

    let (front, bus) = capture_bus(config.companion.bus_capacity);
    let (capture_tx, mut update_rx) = (front.events, front.updates);

    let companion_handle = tokio::spawn(async move {
        companion.run_loop(bus, None).await;
        companion
    });

    // The run loop emits each batch right after its capture, so every batch
    // printed here belongs to the item above it.
    let printer_handle = tokio::spawn(async move {
        while let Some(update) = update_rx.recv().await {
            match update {
                CompanionUpdate::Captured(item) => print_item(&item),
                CompanionUpdate::Suggestions { suggestions, .. } => print_suggestions(&suggestions),
                CompanionUpdate::ModeChanged(mode) => println!("Mode: {}", mode),
                CompanionUpdate::PauseChanged(true) => println!("Paused"),
                CompanionUpdate::PauseChanged(false) => println!("Observing"),
            }
            println!();
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            Input::Event(event) => {
                if capture_tx.send(event).await.is_err() {
                    warn!("Companion stopped, ending watch");
                    break;
                }
            }
            Input::Quit => break,
            Input::Skip => {}
            Input::Invalid(msg) => eprintln!("{}", msg),
        }
    }
    drop(capture_tx);

    let companion = companion_handle.await?;
    printer_handle.await?;

    let history = companion.history();
    println!("Session history ({} items, newest first):", history.len());
    for item in history.all() {
        print_item(item);
    }
    Ok(())
}

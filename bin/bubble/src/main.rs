mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "bubble")]
#[command(about = "Clipboard companion that classifies copied text and suggests next actions", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a piece of text
    Classify {
        /// Text to classify
        text: String,
    },

    /// Ask for suggested actions for a piece of text
    Suggest {
        /// Copied text
        text: String,

        /// Application the text was copied from
        #[arg(short, long)]
        source: Option<String>,
    },

    /// Treat each stdin line as a clipboard capture
    Watch {
        /// Operating mode (observe, suggest, apply); defaults to the configured mode
        #[arg(short, long)]
        mode: Option<String>,

        /// Start with the demo history
        #[arg(long)]
        demo: bool,
    },

    /// Print the capture history
    History {
        /// Include the demo captures
        #[arg(long)]
        demo: bool,
    },

    /// List saved flows
    Flows,

    /// Show configuration and credential status
    Status,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the config file path
    Path,
    /// Show the current configuration
    Show,
    /// Store the Gemini API key in the config file
    SetKey {
        /// API key (an empty string clears it)
        key: String,
    },
    /// Set the default operating mode
    SetMode {
        /// observe, suggest or apply
        mode: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup tracing
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Classify { text } => {
            commands::classify::run(&text).await?;
        }
        Commands::Suggest { text, source } => {
            commands::suggest::run(&text, source).await?;
        }
        Commands::Watch { mode, demo } => {
            commands::watch::run(mode, demo).await?;
        }
        Commands::History { demo } => {
            commands::history::run(demo).await?;
        }
        Commands::Flows => {
            commands::flows::run().await?;
        }
        Commands::Status => {
            commands::status::run().await?;
        }
        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config_cmd::path().await?;
            }
            ConfigCommands::Show => {
                commands::config_cmd::show().await?;
            }
            ConfigCommands::SetKey { key } => {
                commands::config_cmd::set_key(&key).await?;
            }
            ConfigCommands::SetMode { mode } => {
                commands::config_cmd::set_mode(&mode).await?;
            }
        },
    }

    Ok(())
}

//! Verda CLI - chat with a sustainability assistant that knows your footprint.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use verda_footprint::ActivityInput;

mod commands;
mod metrics_server;

/// Verda - a sustainability chat assistant with a carbon-footprint core
#[derive(Parser)]
#[command(name = "verda")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Weekly activity flags shared by `chat` and `estimate`.
#[derive(Args, Debug, Clone, Copy)]
struct ActivityArgs {
    /// Car km/week
    #[arg(long, default_value_t = 50.0)]
    car_km: f64,

    /// Bus km/week
    #[arg(long, default_value_t = 20.0)]
    bus_km: f64,

    /// Train km/week
    #[arg(long, default_value_t = 20.0)]
    train_km: f64,

    /// Air km/week
    #[arg(long, default_value_t = 200.0)]
    air_km: f64,

    /// Meat meals/week
    #[arg(long, default_value_t = 7.0)]
    meat_meals: f64,

    /// Vegetarian meals/week
    #[arg(long, default_value_t = 7.0)]
    vegetarian_meals: f64,

    /// Vegan meals/week
    #[arg(long, default_value_t = 7.0)]
    vegan_meals: f64,
}

impl From<ActivityArgs> for ActivityInput {
    fn from(args: ActivityArgs) -> Self {
        Self {
            car_km: args.car_km,
            bus_km: args.bus_km,
            train_km: args.train_km,
            air_km: args.air_km,
            meat_meals: args.meat_meals,
            vegetarian_meals: args.vegetarian_meals,
            vegan_meals: args.vegan_meals,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the assistant
    Chat {
        #[command(flatten)]
        activity: ActivityArgs,

        /// Use the local model instead of the remote API
        #[arg(long)]
        local: bool,

        /// Port for the metrics endpoint
        #[arg(long, default_value_t = 8000)]
        metrics_port: u16,

        /// Disable the metrics endpoint
        #[arg(long)]
        no_metrics: bool,
    },

    /// Estimate the weekly footprint and exit
    Estimate {
        #[command(flatten)]
        activity: ActivityArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage local models
    Model {
        #[command(subcommand)]
        command: ModelCommands,
    },

    /// Run the local llama-server
    Serve {
        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,
    },
}

#[derive(Subcommand)]
enum ModelCommands {
    /// List installed models
    List,

    /// Download the default model
    Pull {
        /// Install from a local .gguf file instead of downloading
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose { "debug" } else { "warn" };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();

    match cli.command {
        Commands::Chat {
            activity,
            local,
            metrics_port,
            no_metrics,
        } => tokio::runtime::Runtime::new().unwrap().block_on(
            commands::chat::run(activity.into(), local, metrics_port, no_metrics),
        ),
        Commands::Estimate { activity, json } => commands::estimate::run(activity.into(), json),
        Commands::Model { command } => match command {
            ModelCommands::List => commands::model::list(),
            ModelCommands::Pull { file } => tokio::runtime::Runtime::new()
                .unwrap()
                .block_on(commands::model::pull(file.as_deref())),
        },
        Commands::Serve { port } => tokio::runtime::Runtime::new()
            .unwrap()
            .block_on(commands::serve::run(port)),
    }
}

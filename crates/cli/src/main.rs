//! Nebula CLI - a command-line storefront over the marketplace emulator.
//!
//! # Usage
//!
//! ```bash
//! export NEBULA_DATA_DIR=~/.nebula
//!
//! nebula signup -e ada@example.com -p hunter22 --name Ada --phone 555-0100
//! nebula sell --name Lamp --price 10 --image lamp.png
//! nebula products
//! nebula cart add prod_3f9a1c0b7d2e
//! nebula checkout
//! nebula chat send "how do I sell?"
//! ```
//!
//! Every invocation is a separate process, so state lives only in the data
//! directory. Without `NEBULA_DATA_DIR` nothing is kept between runs.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nebula_storefront::services::latency::LatencyProfile;
use nebula_storefront::{AppError, AppState, StorefrontConfig};

mod commands;

#[derive(Parser)]
#[command(name = "nebula")]
#[command(author, version, about = "Nebula marketplace command-line storefront")]
struct Cli {
    /// Directory for persisted state (overrides `NEBULA_DATA_DIR`)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Skip simulated network latency
    #[arg(long, global = true)]
    instant: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and sign into it
    Signup {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Sign into an existing account
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },
    /// Sign out
    Logout,
    /// Show the signed-in account
    Whoami,
    /// Show or update your profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// List every product
    Products,
    /// List a product for sale
    Sell {
        #[arg(long)]
        name: String,
        /// Price, e.g. 19.99
        #[arg(long)]
        price: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Image file to upload
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Place an order for everything in the cart
    Checkout,
    /// Show an order
    Order {
        /// Order ID, e.g. `order_3f9a1c0b7d2e`
        id: String,
    },
    /// Talk to the support bot
    Chat {
        #[command(subcommand)]
        action: ChatAction,
    },
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Show your profile
    Show,
    /// Update your name and/or phone
    Set {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart
    Show,
    /// Add one unit of a product
    Add { product_id: String },
    /// Remove a product
    Remove { product_id: String },
    /// Set a product's quantity (0 removes it)
    Set {
        product_id: String,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum ChatAction {
    /// Send a message
    Send { message: String },
    /// Show the transcript
    History,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[allow(clippy::print_stderr)]
#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e.user_message());
            std::process::exit(1);
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let sentry_guard = init_sentry(&config);

    // Logs go to stderr so command output on stdout stays clean
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "nebula_storefront=info,nebula_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if let Err(e) = run(cli, config).await {
        e.report();
        eprintln!("{}", e.user_message());
        // Flush pending Sentry events before exiting
        drop(sentry_guard);
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> Result<StorefrontConfig, AppError> {
    let mut config = StorefrontConfig::from_env()?;
    if let Some(dir) = &cli.data_dir {
        config.data_dir = Some(dir.clone());
    }
    if cli.instant {
        config.latency = LatencyProfile::instant();
    }
    Ok(config)
}

async fn run(cli: Cli, config: StorefrontConfig) -> Result<(), AppError> {
    let state = AppState::new(config)?;

    match cli.command {
        Commands::Signup {
            email,
            password,
            name,
            phone,
        } => commands::account::signup(&state, &email, password, name, phone).await?,
        Commands::Login { email, password } => {
            commands::account::login(&state, &email, password).await?;
        }
        Commands::Logout => commands::account::logout(&state).await?,
        Commands::Whoami => commands::account::whoami(&state),
        Commands::Profile { action } => match action {
            ProfileAction::Show => commands::account::profile_show(&state).await?,
            ProfileAction::Set { name, phone } => {
                commands::account::profile_set(&state, name, phone).await?;
            }
        },
        Commands::Products => commands::catalog::products(&state).await?,
        Commands::Sell {
            name,
            price,
            description,
            image,
        } => commands::catalog::sell(&state, name, &price, description, image.as_deref()).await?,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&state),
            CartAction::Add { product_id } => commands::cart::add(&state, &product_id).await?,
            CartAction::Remove { product_id } => commands::cart::remove(&state, &product_id),
            CartAction::Set {
                product_id,
                quantity,
            } => commands::cart::set(&state, &product_id, quantity),
            CartAction::Clear => commands::cart::clear(&state),
        },
        Commands::Checkout => commands::cart::checkout(&state).await?,
        Commands::Order { id } => commands::cart::order(&state, &id).await?,
        Commands::Chat { action } => match action {
            ChatAction::Send { message } => commands::chat::send(&state, &message).await?,
            ChatAction::History => commands::chat::history(&state).await?,
        },
    }
    Ok(())
}

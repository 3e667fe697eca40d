//! Freighter connector CLI
//!
//! Inspect and edit a file-backed wallet session, and print the network
//! tokens and passphrases the connector uses.

use clap::{Parser, Subcommand};
use freighter_connect::wallet::FileStore;
use freighter_connect::{
    ConnectorConfig, Error, NetworkType, Result, StoredWalletData, WalletStorage, WalletType,
};
use std::path::PathBuf;
use std::rc::Rc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "freighter-cli")]
#[command(about = "Freighter wallet session and network tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the session store file
    #[arg(short, long, global = true, default_value = "freighter-session.json")]
    store: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the passphrase of a network
    Passphrase {
        /// Network (mainnet, testnet)
        network: NetworkType,
    },

    /// Print the Freighter token of a network
    Token {
        /// Network (mainnet, testnet)
        network: NetworkType,
    },

    /// Manage the stored wallet session
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },

    /// Manage the stored network preference
    Network {
        #[command(subcommand)]
        action: NetworkAction,
    },

    /// Show current configuration
    Config,
}

#[derive(Subcommand)]
enum SessionAction {
    /// Print the stored session
    Show,
    /// Store a session
    Save {
        /// Stellar public key (G...)
        #[arg(long)]
        public_key: String,

        /// Network (mainnet, testnet)
        #[arg(short, long)]
        network: NetworkType,
    },
    /// Remove the stored session
    Clear,
}

#[derive(Subcommand)]
enum NetworkAction {
    /// Print the preferred network
    Show,
    /// Set the preferred network
    Set { network: NetworkType },
    /// Remove the preferred network
    Clear,
}

fn main() -> Result<()> {
    // Load .env file if present (ignore if not found)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    // Load config
    let config = match &cli.config {
        Some(path) => ConnectorConfig::from_file(path)?,
        None => ConnectorConfig::default(),
    }
    .with_env_overrides()?;

    let store = FileStore::new(&cli.store);
    tracing::debug!(path = %store.path().display(), "Using session store");
    let storage = WalletStorage::from_config(Some(Rc::new(store)), &config);

    match cli.command {
        Commands::Passphrase { network } => println!("{}", network.passphrase()),
        Commands::Token { network } => println!("{}", network.extension_token()),
        Commands::Session { action } => run_session(action, &storage)?,
        Commands::Network { action } => run_network(action, &storage, &config)?,
        Commands::Config => println!("{}", serde_json::to_string_pretty(&config)?),
    }

    Ok(())
}

fn run_session(action: SessionAction, storage: &WalletStorage) -> Result<()> {
    match action {
        SessionAction::Show => match storage.get_stored_wallet_data() {
            Some(data) => println!("{}", serde_json::to_string_pretty(&data)?),
            None => println!("No stored wallet session"),
        },
        SessionAction::Save {
            public_key,
            network,
        } => {
            validate_public_key(&public_key)?;
            let data = StoredWalletData {
                wallet_type: WalletType::Freighter,
                public_key,
                network,
            };
            storage.save_wallet_data(&data)?;
            tracing::info!(network = %network, "Stored wallet session");
        }
        SessionAction::Clear => {
            storage.clear_wallet_data()?;
            tracing::info!("Cleared wallet session");
        }
    }
    Ok(())
}

fn run_network(
    action: NetworkAction,
    storage: &WalletStorage,
    config: &ConnectorConfig,
) -> Result<()> {
    match action {
        NetworkAction::Show => match storage.get_stored_network() {
            Some(network) => println!("{}", network),
            None => println!("{} (default)", config.network),
        },
        NetworkAction::Set { network } => {
            storage.save_network_preference(network)?;
            tracing::info!(network = %network, "Stored network preference");
        }
        NetworkAction::Clear => storage.clear_network_preference()?,
    }
    Ok(())
}

/// Shape check only: 56 base32 characters starting with `G`
///
/// The strkey checksum is not verified; the wallet is the authority on keys.
fn validate_public_key(public_key: &str) -> Result<()> {
    let well_formed = public_key.len() == 56
        && public_key.starts_with('G')
        && public_key
            .bytes()
            .all(|b| b.is_ascii_uppercase() || (b'2'..=b'7').contains(&b));
    if well_formed {
        Ok(())
    } else {
        Err(Error::InvalidArgument(format!(
            "'{}' is not shaped like a Stellar public key (56 base32 characters starting with G)",
            public_key
        )))
    }
}

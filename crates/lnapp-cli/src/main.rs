mod console;

use std::sync::Arc;

use anyhow::{Result, bail};
use clap::Parser;
use lnapp_core::{BitcoinUnit, ChannelItem, Config};
use lnapp_rpc::{LndRestClient, NodeClient};
use lnapp_wallet::{ChannelOrchestrator, ChannelRepository, Store};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::console::{ConsoleNavigator, ConsoleNotifier};

#[derive(Parser, Debug)]
#[command(name = "lnapp")]
#[command(author, version, about = "Manage the channels of a Lightning node")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// LND REST endpoint (overrides the config file)
    #[arg(long, global = true)]
    rest_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// List open and pending channels
    Channels,
    /// List connected peers
    Peers,
    /// Connect to a node and open a channel to it
    Open {
        /// Remote node as pubkey@host
        pubkey_at_host: String,
        /// Funding amount in the configured unit
        amount: String,
    },
    /// Close a channel, forcing it if it is already closing
    Close {
        /// Channel point as funding_txid:output_index
        channel_point: String,
    },
    /// Show or set the unit amounts are entered in
    Unit {
        /// sat, bit or btc
        unit: Option<String>,
    },
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::new(filter))
        .init();
}

/// Wallet wired to the configured node.
struct Wallet {
    store: Store,
    orchestrator: ChannelOrchestrator,
    notifier: Arc<ConsoleNotifier>,
}

impl Wallet {
    fn connect(config: &Config) -> Result<Self> {
        let client: Arc<dyn NodeClient> = Arc::new(LndRestClient::from_config(config)?);
        let store = Store::with_settings(config.settings());
        let repository = ChannelRepository::new(client.clone(), store.clone());
        let notifier = Arc::new(ConsoleNotifier::default());
        let orchestrator = ChannelOrchestrator::new(
            client,
            repository,
            Arc::new(ConsoleNavigator),
            notifier.clone(),
        );

        Ok(Self {
            store,
            orchestrator,
            notifier,
        })
    }

    /// Find a channel by channel point among open and pending channels.
    fn find_channel(&self, channel_point: &str) -> Option<ChannelItem> {
        self.store.read(|state| {
            state
                .channels
                .iter()
                .find(|c| c.channel_point == channel_point)
                .cloned()
                .map(ChannelItem::Open)
                .or_else(|| {
                    state
                        .pending_channels
                        .iter()
                        .find(|c| c.channel_point == channel_point)
                        .cloned()
                        .map(ChannelItem::Pending)
                })
        })
    }

    /// Fail if a workflow reported an error to the user.
    fn finish(&self) -> Result<()> {
        let failures = self.notifier.displayed();
        if failures > 0 {
            bail!("{failures} operation(s) failed");
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let mut config = Config::load()?;
    if let Some(rest_url) = cli.rest_url {
        config.rest_url = rest_url;
    }

    match cli.command.unwrap_or(Commands::Channels) {
        Commands::Channels => {
            let wallet = Wallet::connect(&config)?;
            wallet.orchestrator.init().await;
            console::print_channels(&wallet.store.snapshot());
            wallet.finish()?;
        }
        Commands::Peers => {
            let wallet = Wallet::connect(&config)?;
            wallet.orchestrator.repository().refresh_peers().await?;
            console::print_peers(&wallet.store.snapshot());
        }
        Commands::Open {
            pubkey_at_host,
            amount,
        } => {
            let wallet = Wallet::connect(&config)?;
            let orchestrator = &wallet.orchestrator;
            orchestrator.init_create();
            orchestrator.set_pubkey_at_host(pubkey_at_host);
            orchestrator.set_amount(amount);
            tracing::info!("Opening channel, waiting for the node to report progress");
            orchestrator.connect_and_open().await;
            console::print_channels(&wallet.store.snapshot());
            wallet.finish()?;
        }
        Commands::Close { channel_point } => {
            let wallet = Wallet::connect(&config)?;
            wallet.orchestrator.repository().refresh_all().await;
            let Some(item) = wallet.find_channel(&channel_point) else {
                bail!("no channel with channel point {channel_point}");
            };
            wallet.orchestrator.select(item).await;
            wallet.orchestrator.close_selected_channel().await;
            console::print_channels(&wallet.store.snapshot());
            wallet.finish()?;
        }
        Commands::Unit { unit: Some(unit) } => {
            config.unit = unit.parse::<BitcoinUnit>()?;
            config.save()?;
            println!("Unit set to {}", config.unit);
        }
        Commands::Unit { unit: None } => println!("{}", config.unit),
    }

    Ok(())
}

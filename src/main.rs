//! dhtcli: send BEP-5 queries to Mainline DHT nodes from the command line.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dhtcli::constants::{DEFAULT_BOOTSTRAP_NODE, DEFAULT_QUERY_TIMEOUT, DEFAULT_TABLE_SIZE};
use dhtcli::dht::{resolve, QueryProcessor, Transport};
use dhtcli::render::Pretty;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "dhtcli", version)]
#[command(about = "Query BitTorrent Mainline DHT nodes")]
struct Args {
    /// Bootstrap node for iterative lookups
    #[arg(short, long, global = true, default_value = DEFAULT_BOOTSTRAP_NODE)]
    bootstrap: String,

    /// Seconds to wait for each reply
    #[arg(long, global = true, default_value_t = DEFAULT_QUERY_TIMEOUT.as_secs(),
          value_parser = clap::value_parser!(u64).range(1..))]
    timeout: u64,

    /// Log every query sent
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ping a node
    Ping {
        /// host:port of the node
        node: String,
    },

    /// Ask a single node for the nodes closest to a target id
    #[command(name = "find_node")]
    FindNode {
        node: String,
        /// 40 hex characters
        target: String,
    },

    /// Ask a single node for peers of a torrent
    #[command(name = "get_peers")]
    GetPeers {
        node: String,
        /// 40 hex characters
        info_hash: String,
    },

    /// Announce that we are downloading a torrent
    #[command(name = "announce_peer")]
    AnnouncePeer {
        node: String,
        info_hash: String,

        /// Token from an earlier get_peers reply; fetched first when omitted
        #[arg(long)]
        token: Option<String>,

        /// Port we accept peers on; 0 lets the node use our source port
        #[arg(long, default_value_t = 0)]
        port: u16,
    },

    /// Iteratively search for a node starting from the bootstrap node
    Lookup {
        /// 40 hex characters
        target: String,

        /// Candidates kept while searching
        #[arg(short = 'k', long, default_value_t = DEFAULT_TABLE_SIZE)]
        table_size: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let directive = if args.verbose { "dhtcli=debug" } else { "dhtcli=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let transport = Transport::new()?.timeout(Duration::from_secs(args.timeout));
    debug!("Using node id {}", transport.id());

    let reply = match args.command {
        Command::Ping { node } => transport.ping(resolve(&node).await?).await?,
        Command::FindNode { node, target } => {
            transport.find_node(resolve(&node).await?, &target).await?
        }
        Command::GetPeers { node, info_hash } => {
            transport.get_peers(resolve(&node).await?, &info_hash).await?
        }
        Command::AnnouncePeer {
            node,
            info_hash,
            token,
            port,
        } => {
            let addr = resolve(&node).await?;
            let token = match token {
                Some(token) => token,
                None => {
                    let peers = transport.get_peers(addr, &info_hash).await?;
                    let token = peers
                        .token()
                        .map(hex::encode)
                        .with_context(|| format!("{node} returned no announce token"))?;
                    info!("Fetched announce token 0x{} from {}", token, node);
                    token
                }
            };
            transport.announce_peer(addr, &info_hash, &token, port).await?
        }
        Command::Lookup { target, table_size } => {
            let bootstrap = resolve(&args.bootstrap)
                .await
                .with_context(|| format!("resolving bootstrap node {}", args.bootstrap))?;
            let mut processor = QueryProcessor::with_transport(transport, bootstrap, table_size)
                .await
                .context("seeding routing table")?;
            processor.find_node(&target).await?
        }
    };

    print!("{}", Pretty(&reply));
    Ok(())
}

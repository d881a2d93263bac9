use clap::Parser;

/// Runs the RPC suite against a live or local network.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Network to run against: astar, shiden or shibuya.
    #[arg(short, long, env = "NETWORK")]
    pub network: Option<String>,
    /// Address of a node speaking the line-delimited JSON protocol of
    /// `dev-node`; substrate JSON-RPC endpoints are not supported.
    #[arg(short, long, env = "RPC_ENDPOINT", default_value = "127.0.0.1:9944")]
    pub endpoint: String,
    /// Seconds to wait for a submitted extrinsic to be finalized.
    #[arg(long, env = "FINALITY_TIMEOUT", default_value_t = 60)]
    pub finality_timeout: u64,
}

/// Starts a local instant-seal node serving the RPC surface.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct NodeArgs {
    /// Network whose chain metadata the node reports.
    #[arg(short, long, env = "NETWORK")]
    pub network: Option<String>,
    #[arg(short, long, default_value_t = 9944)]
    /// Port to listen on for incoming connections.
    pub port: u16,
}

use clap::Parser;

use rpc_tests::args::NodeArgs;
use rpc_tests::config::parse_network;
use rpc_tests::logging::init_tracing;
use rpc_tests::node::start::start_node;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args = NodeArgs::parse();
    let network = parse_network(args.network.as_deref())?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(start_node(network, args.port))?;
    Ok(())
}

use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use rpc_tests::config::Network;
use rpc_tests::node;

pub struct TestServer {
    handle: JoinHandle<()>,
    pub addr: SocketAddr,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort()
    }
}

pub async fn start_node(network: Network) -> TestServer {
    let listener = TcpListener::bind(("127.0.0.1", 0))
        .await
        .expect("Failed to bind random port");
    let addr = listener.local_addr().expect("Failed to get local address");
    let handle = tokio::spawn(async move {
        node::start::serve_node(listener, network)
            .await
            .expect("Could not start server");
    });
    TestServer { handle, addr }
}

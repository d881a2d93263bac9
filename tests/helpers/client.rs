use std::net::SocketAddr;
use std::time::Duration;

use rpc_tests::extrinsic::Call;
use rpc_tests::keyring::Keypair;
use rpc_tests::network::client::TcpClient;
use rpc_tests::primitives::{AccountId, Balance};
use rpc_tests::rpc::RpcApi;
use rpc_tests::tx::{TxOutcome, send_transaction};

pub async fn connect(addr: SocketAddr) -> RpcApi<TcpClient> {
    let client = TcpClient::connect(addr)
        .await
        .expect("Failed to connect to node");
    RpcApi::new(client)
        .await
        .expect("Failed to fetch genesis hash")
        .with_finality_timeout(Duration::from_secs(5))
}

pub async fn free_balance(api: &RpcApi<TcpClient>, account: &AccountId) -> Balance {
    api.account(account)
        .await
        .expect("Failed to fetch account")
        .data
        .free
}

pub async fn submit(api: &RpcApi<TcpClient>, call: Call, signer: &Keypair) -> TxOutcome {
    send_transaction(api, call, signer)
        .await
        .expect("Failed to send transaction")
}

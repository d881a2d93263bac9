pub mod helpers;

use helpers::{client, server};
use rpc_tests::config::Network;
use rpc_tests::keyring::DevAccount;
use rpc_tests::node::runtime::ENDOWMENT;
use rpc_tests::primitives::{Address, DispatchError, H160};
use rpc_tests::tx::{TxOutcome, balances};

#[tokio::test]
async fn transfer_moves_exact_amount() {
    let server = server::start_node(Network::Astar).await;
    let api = client::connect(server.addr).await;
    let charlie = DevAccount::Charlie.account_id();

    let before = client::free_balance(&api, &charlie).await;
    let call = balances::transfer(Address::Id(charlie.clone()), 100);
    let outcome = client::submit(&api, call, &DevAccount::Alice.pair()).await;
    let after = client::free_balance(&api, &charlie).await;

    assert!(outcome.is_finalized());
    assert_eq!(after - before, 100);
}

#[tokio::test]
async fn repeated_transfers_use_fresh_nonces() {
    let server = server::start_node(Network::Shiden).await;
    let api = client::connect(server.addr).await;
    let bob = DevAccount::Bob.pair();
    let dave = DevAccount::Dave.account_id();

    for round in 1..=2 {
        let before = client::free_balance(&api, &dave).await;
        let call = balances::transfer(Address::Id(dave.clone()), 200);
        let outcome = client::submit(&api, call, &bob).await;
        let after = client::free_balance(&api, &dave).await;

        assert!(outcome.is_finalized(), "round {round}: {outcome}");
        assert_eq!(after - before, 200);
    }
    let nonce = api.system_account_next_index(bob.account_id()).await.unwrap();
    assert_eq!(nonce, 2);
}

#[tokio::test]
async fn each_extrinsic_is_sealed_in_its_own_block() {
    let server = server::start_node(Network::Astar).await;
    let api = client::connect(server.addr).await;
    let call = balances::transfer(Address::Id(DevAccount::Dave.account_id()), 1);

    let outcome = client::submit(&api, call, &DevAccount::Alice.pair()).await;

    let TxOutcome::Finalized { block_hash } = outcome else {
        panic!("unexpected outcome {outcome}");
    };
    assert_eq!(api.chain_get_block_hash(Some(1)).await.unwrap(), Some(block_hash));
    assert_eq!(api.chain_get_finalized_head().await.unwrap(), block_hash);
}

#[tokio::test]
async fn report_insufficient_balance() {
    let server = server::start_node(Network::Astar).await;
    let api = client::connect(server.addr).await;
    let dave = DevAccount::Dave.account_id();
    let before = client::free_balance(&api, &dave).await;

    let call = balances::transfer(Address::Id(dave.clone()), u128::MAX);
    let outcome = client::submit(&api, call, &DevAccount::Bob.pair()).await;

    assert!(matches!(
        outcome,
        TxOutcome::DispatchFailed { error, .. }
            if error == DispatchError::new("Balances", "InsufficientBalance")
    ));
    assert_eq!(client::free_balance(&api, &dave).await, before);
}

#[tokio::test]
async fn cannot_transfer_to_evm_address() {
    let server = server::start_node(Network::Astar).await;
    let api = client::connect(server.addr).await;

    let call = balances::transfer(Address::Evm(H160::from_low_u64(7)), 1);
    let outcome = client::submit(&api, call, &DevAccount::Alice.pair()).await;

    assert!(matches!(outcome, TxOutcome::DispatchFailed { .. }));
}

#[tokio::test]
async fn balances_above_u64_range_are_reported_exactly() {
    let server = server::start_node(Network::Astar).await;
    let api = client::connect(server.addr).await;
    let charlie = DevAccount::Charlie.account_id();

    assert!(ENDOWMENT > u64::MAX as u128);
    assert_eq!(client::free_balance(&api, &charlie).await, ENDOWMENT);

    let amount = u64::MAX as u128 + 1;
    let call = balances::transfer(Address::Id(charlie.clone()), amount);
    let outcome = client::submit(&api, call, &DevAccount::Alice.pair()).await;

    assert!(outcome.is_finalized());
    assert_eq!(client::free_balance(&api, &charlie).await, ENDOWMENT + amount);
}

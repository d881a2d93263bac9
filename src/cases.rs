use crate::context::TestContext;
use crate::keyring::{ALICE, CHARLIE, DAVE, Keypair};
use crate::network::client::Client;
use crate::node::NODE_NAME;
use crate::primitives::{AccountId, Address, Balance, H160};
use crate::suite::{CaseError, CaseFuture, TestCase, expect_eq, expect_finalized, expect_some};
use crate::tx::{self, send_transaction};
use futures::FutureExt;

pub const CONTRACT: H160 = H160([0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1]);
pub const ALICE_TO_CHARLIE: Balance = 100;
pub const BOB_TO_DAVE: Balance = 200;

/// The RPC suite in the order its cases depend on.
pub fn rpc_suite<C>() -> Vec<TestCase<C>>
where
    C: Client + Send + Sync,
{
    vec![
        TestCase::new("should fetch chain from rpc node", fetch_chain::<C>),
        TestCase::new("should fetch chain name from rpc node", fetch_name::<C>),
        TestCase::new(
            "should be able to register contract on H160 address 0x01 using Alice account",
            register_contract::<C>,
        ),
        TestCase::new(
            "should be able to transfer tokens from alice to charlie",
            transfer_alice_to_charlie::<C>,
        ),
        TestCase::new(
            "should be able to transfer tokens from bob to dave",
            transfer_bob_to_dave::<C>,
        ),
    ]
}

/// Only the balance transfer cases, which can be repeated on one chain.
pub fn transfer_cases<C>() -> Vec<TestCase<C>>
where
    C: Client + Send + Sync,
{
    rpc_suite().into_iter().skip(3).collect()
}

pub fn fetch_chain<C>(context: &TestContext<C>) -> CaseFuture<'_>
where
    C: Client + Send + Sync,
{
    async move {
        let chain = context.api.system_chain().await?;
        expect_eq("chain", chain, context.network.chain_name())
    }
    .boxed()
}

pub fn fetch_name<C>(context: &TestContext<C>) -> CaseFuture<'_>
where
    C: Client + Send + Sync,
{
    async move {
        let name = context.api.system_name().await?;
        expect_eq("name", name.as_str(), NODE_NAME)
    }
    .boxed()
}

pub fn register_contract<C>(context: &TestContext<C>) -> CaseFuture<'_>
where
    C: Client + Send + Sync,
{
    async move {
        let contract = Address::Evm(CONTRACT);
        let call = tx::dapps_staking::register(contract.clone());
        let outcome = send_transaction(&context.api, call, &context.alice).await?;

        let dapp_info = context.api.registered_dapp(&contract).await?;

        expect_finalized(&outcome)?;
        let dapp_info = expect_some("registered dapp", dapp_info)?;
        expect_eq("developer", dapp_info.developer.0.as_str(), ALICE)?;
        expect_eq("state", dapp_info.state.to_string().as_str(), "Registered")
    }
    .boxed()
}

pub fn transfer_alice_to_charlie<C>(context: &TestContext<C>) -> CaseFuture<'_>
where
    C: Client + Send + Sync,
{
    transfer_and_check(context, &context.alice, CHARLIE, ALICE_TO_CHARLIE).boxed()
}

pub fn transfer_bob_to_dave<C>(context: &TestContext<C>) -> CaseFuture<'_>
where
    C: Client + Send + Sync,
{
    transfer_and_check(context, &context.bob, DAVE, BOB_TO_DAVE).boxed()
}

async fn transfer_and_check<C>(
    context: &TestContext<C>,
    signer: &Keypair,
    dest: &str,
    amount: Balance,
) -> Result<(), CaseError>
where
    C: Client + Send + Sync,
{
    let dest = AccountId::new(dest);
    let original_balance = context.api.account(&dest).await?;
    let call = tx::balances::transfer(Address::Id(dest.clone()), amount);
    let outcome = send_transaction(&context.api, call, signer).await?;
    let new_balance = context.api.account(&dest).await?;

    expect_finalized(&outcome)?;
    let delta = new_balance.data.free as i128 - original_balance.data.free as i128;
    expect_eq("free balance delta", delta, amount as i128)
}

use crate::extrinsic::{BalancesCall, Call, DappsStakingCall, SignatureError, SignedExtrinsic};
use crate::keyring::DevAccount;
use crate::primitives::{
    AccountId, AccountInfo, Address, Balance, BlockHash, BlockNumber, DAppInfo, DAppState,
    DispatchError, Nonce,
};
use std::collections::HashMap;

/// One token at 18 decimals.
pub const UNIT: Balance = 1_000_000_000_000_000_000;
pub const ENDOWMENT: Balance = 1_000_000 * UNIT;
pub const REGISTER_DEPOSIT: Balance = 1_000 * UNIT;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum InvalidTransaction {
    #[error("Transaction has a bad signature: {0}")]
    BadProof(#[from] SignatureError),
    #[error("Unknown signer {0}")]
    UnknownSigner(AccountId),
    #[error("Public key does not belong to {0}")]
    KeyMismatch(AccountId),
    #[error("Transaction is outdated")]
    Stale,
    #[error("Transaction will be valid in the future")]
    Future,
}

pub struct GenesisConfig {
    pub endowed: Vec<(AccountId, [u8; 32], Balance)>,
}

impl GenesisConfig {
    /// Endows every dev account and binds it to its dev key.
    pub fn dev() -> Self {
        let endowed = DevAccount::ALL
            .iter()
            .map(|account| {
                let pair = account.pair();
                (account.account_id(), pair.public_key(), ENDOWMENT)
            })
            .collect();
        Self { endowed }
    }
}

pub struct Runtime {
    genesis_hash: BlockHash,
    accounts: HashMap<AccountId, AccountInfo>,
    keys: HashMap<AccountId, [u8; 32]>,
    registered_dapps: HashMap<Address, DAppInfo>,
}

impl Runtime {
    pub fn new(genesis: &GenesisConfig, genesis_hash: BlockHash) -> Self {
        let mut accounts = HashMap::new();
        let mut keys = HashMap::new();
        for (account, public_key, balance) in &genesis.endowed {
            let mut info = AccountInfo::default();
            info.data.free = *balance;
            accounts.insert(account.clone(), info);
            keys.insert(account.clone(), *public_key);
        }
        Self {
            genesis_hash,
            accounts,
            keys,
            registered_dapps: HashMap::new(),
        }
    }

    pub fn account(&self, account: &AccountId) -> AccountInfo {
        self.accounts.get(account).cloned().unwrap_or_default()
    }

    pub fn account_next_index(&self, account: &AccountId) -> Nonce {
        self.account(account).nonce
    }

    pub fn registered_dapp(&self, contract: &Address) -> Option<DAppInfo> {
        self.registered_dapps.get(contract).cloned()
    }

    pub fn validate(&self, extrinsic: &SignedExtrinsic) -> Result<(), InvalidTransaction> {
        let key = self
            .keys
            .get(&extrinsic.signer)
            .ok_or_else(|| InvalidTransaction::UnknownSigner(extrinsic.signer.clone()))?;
        if extrinsic.public_key != key {
            return Err(InvalidTransaction::KeyMismatch(extrinsic.signer.clone()));
        }
        extrinsic.verify(&self.genesis_hash)?;

        let expected = self.account_next_index(&extrinsic.signer);
        match extrinsic.nonce {
            nonce if nonce < expected => Err(InvalidTransaction::Stale),
            nonce if nonce > expected => Err(InvalidTransaction::Future),
            _ => Ok(()),
        }
    }

    /// Applies a validated extrinsic. The signer's nonce is consumed even
    /// when dispatch fails.
    pub fn apply(
        &mut self,
        extrinsic: &SignedExtrinsic,
        block_number: BlockNumber,
    ) -> Result<(), DispatchError> {
        let origin = &extrinsic.signer;
        self.accounts.entry(origin.clone()).or_default().nonce += 1;

        let result = match &extrinsic.call {
            Call::Balances(BalancesCall::Transfer { dest, value }) => {
                self.transfer(origin, dest, *value)
            }
            Call::DappsStaking(DappsStakingCall::Register { contract }) => {
                self.register(origin, contract)
            }
            Call::DappsStaking(DappsStakingCall::Unregister { contract }) => {
                self.unregister(origin, contract, block_number)
            }
        };
        if let Err(e) = &result {
            tracing::debug!(%origin, "Dispatch failed: {}", e);
        }
        result
    }

    fn transfer(
        &mut self,
        from: &AccountId,
        dest: &Address,
        value: Balance,
    ) -> Result<(), DispatchError> {
        let Address::Id(dest) = dest else {
            return Err(DispatchError::new("System", "CannotLookup"));
        };
        let sender = self.accounts.entry(from.clone()).or_default();
        sender.data.free = sender
            .data
            .free
            .checked_sub(value)
            .ok_or_else(|| DispatchError::new("Balances", "InsufficientBalance"))?;
        self.accounts.entry(dest.clone()).or_default().data.free += value;
        tracing::debug!(%from, %dest, value, "Transferred");
        Ok(())
    }

    fn register(&mut self, developer: &AccountId, contract: &Address) -> Result<(), DispatchError> {
        if self.registered_dapps.contains_key(contract) {
            return Err(DispatchError::new("DappsStaking", "AlreadyRegisteredContract"));
        }
        if self
            .registered_dapps
            .values()
            .any(|dapp| &dapp.developer == developer)
        {
            return Err(DispatchError::new("DappsStaking", "AlreadyUsedDeveloperAccount"));
        }

        let account = self.accounts.entry(developer.clone()).or_default();
        account.data.free = account
            .data
            .free
            .checked_sub(REGISTER_DEPOSIT)
            .ok_or_else(|| DispatchError::new("Balances", "InsufficientBalance"))?;
        account.data.reserved += REGISTER_DEPOSIT;

        let dapp = DAppInfo {
            developer: developer.clone(),
            state: DAppState::Registered,
        };
        self.registered_dapps.insert(contract.clone(), dapp);
        tracing::debug!(%developer, %contract, "Registered dapp");
        Ok(())
    }

    fn unregister(
        &mut self,
        origin: &AccountId,
        contract: &Address,
        block_number: BlockNumber,
    ) -> Result<(), DispatchError> {
        let dapp = self
            .registered_dapps
            .get_mut(contract)
            .filter(|dapp| dapp.state == DAppState::Registered)
            .ok_or_else(|| DispatchError::new("DappsStaking", "NotOperatedContract"))?;
        if &dapp.developer != origin {
            return Err(DispatchError::new("DappsStaking", "NotOwnedContract"));
        }
        dapp.state = DAppState::Unregistered(block_number);

        let account = self.accounts.entry(origin.clone()).or_default();
        account.data.reserved = account.data.reserved.saturating_sub(REGISTER_DEPOSIT);
        account.data.free += REGISTER_DEPOSIT;
        tracing::debug!(%origin, %contract, block_number, "Unregistered dapp");
        Ok(())
    }
}

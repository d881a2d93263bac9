use crate::keyring::Keypair;
use crate::primitives::{AccountId, Address, Balance, BlockHash, Nonce};
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum DappsStakingCall {
    Register { contract: Address },
    Unregister { contract: Address },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum BalancesCall {
    Transfer {
        dest: Address,
        #[serde(with = "crate::primitives::balance_string")]
        value: Balance,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Call {
    DappsStaking(DappsStakingCall),
    Balances(BalancesCall),
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum SignatureError {
    #[error("Invalid public key bytes")]
    InvalidPublicKey,
    #[error("Invalid signature bytes")]
    InvalidSignature,
    #[error("Bad signature")]
    BadProof,
}

#[derive(Serialize)]
struct SigningPayload<'a> {
    call: &'a Call,
    nonce: Nonce,
    genesis_hash: &'a BlockHash,
}

fn signing_payload(call: &Call, nonce: Nonce, genesis_hash: &BlockHash) -> Vec<u8> {
    let payload = SigningPayload {
        call,
        nonce,
        genesis_hash,
    };
    // Plain structs of strings and integers always serialize.
    serde_json::to_vec(&payload).unwrap_or_default()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SignedExtrinsic {
    pub signer: AccountId,
    #[serde(with = "hex::serde")]
    pub public_key: Vec<u8>,
    pub nonce: Nonce,
    pub call: Call,
    #[serde(with = "hex::serde")]
    pub signature: Vec<u8>,
}

impl SignedExtrinsic {
    pub fn sign(call: Call, nonce: Nonce, genesis_hash: &BlockHash, signer: &Keypair) -> Self {
        let payload = signing_payload(&call, nonce, genesis_hash);
        let signature = signer.sign(&payload);
        Self {
            signer: signer.account_id().clone(),
            public_key: signer.public_key().to_vec(),
            nonce,
            call,
            signature: signature.to_bytes().to_vec(),
        }
    }

    /// Checks the signature against the carried public key for the given chain.
    pub fn verify(&self, genesis_hash: &BlockHash) -> Result<(), SignatureError> {
        let verifying_key = VerifyingKey::try_from(&self.public_key[..])
            .map_err(|_| SignatureError::InvalidPublicKey)?;
        let signature = Signature::try_from(&self.signature[..])
            .map_err(|_| SignatureError::InvalidSignature)?;
        let payload = signing_payload(&self.call, self.nonce, genesis_hash);
        verifying_key
            .verify(&payload, &signature)
            .map_err(|_| SignatureError::BadProof)
    }

    pub fn hash(&self) -> BlockHash {
        BlockHash::digest(serde_json::to_vec(self).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyring::DevAccount;
    use crate::keyring::test_utils::random_keypair;
    use crate::primitives::H160;

    fn transfer(value: Balance) -> Call {
        Call::Balances(BalancesCall::Transfer {
            dest: Address::Id(DevAccount::Charlie.account_id()),
            value,
        })
    }

    #[test]
    fn verify_signed_extrinsic() {
        let genesis = BlockHash::digest("genesis");
        let extrinsic = SignedExtrinsic::sign(transfer(100), 0, &genesis, &DevAccount::Alice.pair());
        assert_eq!(extrinsic.verify(&genesis), Ok(()));
    }

    #[test]
    fn reject_extrinsic_signed_for_other_chain() {
        let extrinsic = SignedExtrinsic::sign(
            transfer(100),
            0,
            &BlockHash::digest("astar"),
            &DevAccount::Alice.pair(),
        );
        assert_eq!(
            extrinsic.verify(&BlockHash::digest("shiden")),
            Err(SignatureError::BadProof)
        );
    }

    #[test]
    fn reject_tampered_call() {
        let genesis = BlockHash::digest("genesis");
        let mut extrinsic = SignedExtrinsic::sign(transfer(100), 0, &genesis, &random_keypair("x"));
        extrinsic.call = transfer(1_000_000);
        assert_eq!(extrinsic.verify(&genesis), Err(SignatureError::BadProof));
    }

    #[test]
    fn reject_malformed_signature() {
        let genesis = BlockHash::digest("genesis");
        let mut extrinsic = SignedExtrinsic::sign(transfer(1), 0, &genesis, &random_keypair("x"));
        extrinsic.signature = vec![];
        assert_eq!(
            extrinsic.verify(&genesis),
            Err(SignatureError::InvalidSignature)
        );
    }

    #[test]
    fn call_encoding_matches_pallet_layout() {
        let call = Call::DappsStaking(DappsStakingCall::Register {
            contract: Address::Evm(H160::from_low_u64(1)),
        });
        assert_eq!(
            serde_json::to_string(&call).unwrap(),
            r#"{"DappsStaking":{"Register":{"contract":{"Evm":"0x0000000000000000000000000000000000000001"}}}}"#
        );
    }
}

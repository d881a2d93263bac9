use crate::primitives::AccountId;
use ed25519_dalek::{Signature, Signer, SigningKey};
use sha2::{Digest, Sha256};

pub const ALICE: &str = "ajYMsCKsEAhEvHpeA4XqsfiA9v1CdzZPrCfS6pEfeGHW9j8";
pub const BOB: &str = "ZAP5o2BjWAo5uoKDE6b6Xkk4Ju7k6bDu24LNjgZbfM3iyiR";
pub const CHARLIE: &str = "ZD39yAE4W4RiXCyk1gv6CD2tSaVjQU5KoKfujyft4Xa2GAz";
pub const DAVE: &str = "X2mE9hCGX771c3zzV6tPa8U2cDz4U4zkqUdmBrQn83M3cm7";

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DevAccount {
    Alice,
    Bob,
    Charlie,
    Dave,
}

impl DevAccount {
    pub const ALL: [DevAccount; 4] = [
        DevAccount::Alice,
        DevAccount::Bob,
        DevAccount::Charlie,
        DevAccount::Dave,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DevAccount::Alice => "Alice",
            DevAccount::Bob => "Bob",
            DevAccount::Charlie => "Charlie",
            DevAccount::Dave => "Dave",
        }
    }

    pub fn address(&self) -> &'static str {
        match self {
            DevAccount::Alice => ALICE,
            DevAccount::Bob => BOB,
            DevAccount::Charlie => CHARLIE,
            DevAccount::Dave => DAVE,
        }
    }

    pub fn account_id(&self) -> AccountId {
        AccountId::new(self.address())
    }

    /// Keypair derived from the `//<Name>` dev seed phrase.
    pub fn pair(&self) -> Keypair {
        let seed: [u8; 32] = Sha256::digest(format!("//{}", self.name())).into();
        Keypair::new(self.account_id(), SigningKey::from_bytes(&seed))
    }
}

/// Signing key bound to the native address it signs for.
#[derive(Clone, Debug)]
pub struct Keypair {
    account_id: AccountId,
    signing_key: SigningKey,
}

impl Keypair {
    pub fn new(account_id: AccountId, signing_key: SigningKey) -> Self {
        Self {
            account_id,
            signing_key,
        }
    }

    pub fn account_id(&self) -> &AccountId {
        &self.account_id
    }

    pub fn public_key(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    pub fn sign(&self, payload: &[u8]) -> Signature {
        self.signing_key.sign(payload)
    }
}

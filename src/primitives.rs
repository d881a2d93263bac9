use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

pub type Balance = u128;
pub type BlockNumber = u64;
pub type Nonce = u64;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum HexError {
    #[error("Missing 0x prefix")]
    MissingPrefix,
    #[error("Invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

fn decode_prefixed<const N: usize>(value: &str) -> Result<[u8; N], HexError> {
    let digits = value.strip_prefix("0x").ok_or(HexError::MissingPrefix)?;
    let mut bytes = [0u8; N];
    hex::decode_to_slice(digits, &mut bytes)?;
    Ok(bytes)
}

/// Native chain address. Treated as an opaque string.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub String);

impl AccountId {
    pub fn new(address: &str) -> Self {
        Self(address.to_string())
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 20-byte Ethereum style address.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub struct H160(pub [u8; 20]);

impl H160 {
    pub fn from_low_u64(value: u64) -> Self {
        let mut bytes = [0u8; 20];
        bytes[12..].copy_from_slice(&value.to_be_bytes());
        Self(bytes)
    }
}

impl FromStr for H160 {
    type Err = HexError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        decode_prefixed(value).map(Self)
    }
}

impl fmt::Display for H160 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

#[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq)]
pub struct BlockHash(pub [u8; 32]);

impl BlockHash {
    pub fn digest(data: impl AsRef<[u8]>) -> Self {
        Self(Sha256::digest(data).into())
    }
}

impl FromStr for BlockHash {
    type Err = HexError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        decode_prefixed(value).map(Self)
    }
}

impl fmt::Display for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

macro_rules! impl_hex_serde {
    ($name:ident) => {
        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = String::deserialize(deserializer)?;
                value.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

impl_hex_serde!(H160);
impl_hex_serde!(BlockHash);

/// Balances travel as decimal strings; JSON numbers stop at `u64::MAX`.
pub mod balance_string {
    use super::Balance;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Balance, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Balance, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

/// Address kinds accepted at the API boundary: `{"Id": ..}` or `{"Evm": ..}`.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Address {
    Id(AccountId),
    Evm(H160),
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Id(account) => write!(f, "Id({account})"),
            Address::Evm(address) => write!(f, "Evm({address})"),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountData {
    #[serde(with = "balance_string")]
    pub free: Balance,
    #[serde(with = "balance_string")]
    pub reserved: Balance,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub nonce: Nonce,
    pub data: AccountData,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum DAppState {
    Registered,
    Unregistered(BlockNumber),
}

impl fmt::Display for DAppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DAppState::Registered => f.write_str("Registered"),
            DAppState::Unregistered(block) => write!(f, "Unregistered({block})"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DAppInfo {
    pub developer: AccountId,
    pub state: DAppState,
}

/// Module error raised while dispatching an included extrinsic.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[error("{pallet}::{error}")]
pub struct DispatchError {
    pub pallet: String,
    pub error: String,
}

impl DispatchError {
    pub fn new(pallet: &str, error: &str) -> Self {
        Self {
            pallet: pallet.to_string(),
            error: error.to_string(),
        }
    }
}

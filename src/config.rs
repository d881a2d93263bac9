use crate::args::Args;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Please set valid network in NETWORK env variable")]
    MissingNetwork,
    #[error(
        "Please set valid network in NETWORK env variable: `{0}` is not one of astar, shiden, shibuya"
    )]
    InvalidNetwork(String),
}

#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub enum Network {
    Astar,
    Shiden,
    Shibuya,
}

impl Network {
    pub const ALL: [Network; 3] = [Network::Astar, Network::Shiden, Network::Shibuya];

    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Astar => "astar",
            Network::Shiden => "shiden",
            Network::Shibuya => "shibuya",
        }
    }

    /// Human readable chain name reported by `system_chain`.
    pub fn chain_name(&self) -> String {
        format!("{} Testnet", capitalize(self.as_str()))
    }
}

impl FromStr for Network {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Network::ALL
            .into_iter()
            .find(|network| network.as_str() == value)
            .ok_or_else(|| ConfigError::InvalidNetwork(value.to_string()))
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn parse_network(value: Option<&str>) -> Result<Network, ConfigError> {
    match value {
        Some(value) => value.parse(),
        None => Err(ConfigError::MissingNetwork),
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub network: Network,
    pub endpoint: String,
    pub finality_timeout: Duration,
}

impl Config {
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let network = parse_network(args.network.as_deref())?;
        Ok(Self {
            network,
            endpoint: args.endpoint.clone(),
            finality_timeout: Duration::from_secs(args.finality_timeout),
        })
    }
}

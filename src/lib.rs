pub mod api;
pub mod args;
pub mod cases;
pub mod config;
pub mod context;
pub mod extrinsic;
pub mod keyring;
pub mod logging;
pub mod network;
pub mod node;
pub mod primitives;
pub mod rpc;
pub mod suite;
pub mod tx;

//! Off-chain client for Sunrise
//!
//! - [`core::CoreClient`] reads and administers the core registry
//! - [`beams`] holds one adapter per kind of underlying pool behind [`beams::BeamAdapter`]
//! - [`router::Router`] splits deposits across beams by allocation and picks withdrawal beams
//! - [`tickets::TicketClient`] follows delayed withdrawals to redemption
//!
//! The chain is reached only through the [`ledger::Ledger`] trait. [`rpc::RpcLedger`] is
//! the JSON-RPC implementation.

pub mod beams;
pub mod config;
pub mod core;
pub mod error;
pub mod ledger;
pub mod logging;
pub mod router;
pub mod rpc;
pub mod snapshot;
pub mod tickets;

pub use beams::{BeamAdapter, BeamCapability, CapabilitySet, LiquidityPoolBeam, StakePoolBeam};
pub use config::{ClientConfig, ConfigError, Network};
pub use crate::core::{CoreClient, CoreView};
pub use error::{ClientError, ClientResult, LedgerRejection, PreconditionError};
pub use ledger::{AccountFilter, Ledger, PendingTransaction, SharedLedger};
pub use router::{DepositReport, Leg, Router, RouterView};
pub use rpc::RpcLedger;
pub use snapshot::Snapshot;
pub use tickets::TicketClient;

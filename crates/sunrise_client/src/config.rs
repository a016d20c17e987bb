//! Environment-based configuration
//!
//! - `SUNRISE_NETWORK` - "mainnet", "devnet" or "localnet" (default: "devnet")
//! - `SUNRISE_RPC_URL` - RPC endpoint, defaults per network
//! - `SUNRISE_STATE` - core state address (required)
//! - `SUNRISE_COMMITMENT` - "processed", "confirmed" or "finalized" (default: "confirmed")
//! - `SUNRISE_TICKET_POLL_SECS` - interval between epoch polls while waiting on tickets
//! - `SUNRISE_LOG_LEVEL` - trace, debug, info, warn or error

use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use solana_sdk::{commitment_config::CommitmentLevel, pubkey::Pubkey};
use thiserror::Error;

const DEFAULT_TICKET_POLL_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Devnet,
    Localnet,
}

impl FromStr for Network {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mainnet" | "mainnet-beta" => Ok(Network::Mainnet),
            "devnet" => Ok(Network::Devnet),
            "localnet" | "localhost" => Ok(Network::Localnet),
            _ => Err(ConfigError::InvalidValue(
                "SUNRISE_NETWORK".to_string(),
                format!("unknown network: {}", s),
            )),
        }
    }
}

impl Network {
    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            Network::Mainnet => "https://api.mainnet-beta.solana.com",
            Network::Devnet => "https://api.devnet.solana.com",
            Network::Localnet => "http://127.0.0.1:8899",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    pub network: Network,
    pub rpc_url: String,
    pub state: Pubkey,
    pub commitment: CommitmentLevel,
    pub ticket_poll_secs: u64,
    pub log_level: String,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key-value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let network: Network = lookup("SUNRISE_NETWORK")
            .unwrap_or_else(|| "devnet".to_string())
            .parse()?;

        let rpc_url = lookup("SUNRISE_RPC_URL")
            .unwrap_or_else(|| network.default_rpc_url().to_string());

        let state = lookup("SUNRISE_STATE")
            .ok_or_else(|| ConfigError::MissingEnvVar("SUNRISE_STATE".to_string()))?;
        let state = Pubkey::from_str(&state)
            .map_err(|e| ConfigError::InvalidValue("SUNRISE_STATE".to_string(), e.to_string()))?;

        let commitment = match lookup("SUNRISE_COMMITMENT") {
            Some(value) => CommitmentLevel::from_str(&value).map_err(|e| {
                ConfigError::InvalidValue("SUNRISE_COMMITMENT".to_string(), e.to_string())
            })?,
            None => CommitmentLevel::Confirmed,
        };

        let ticket_poll_secs = match lookup("SUNRISE_TICKET_POLL_SECS") {
            Some(value) => value.parse().map_err(|_| {
                ConfigError::InvalidValue("SUNRISE_TICKET_POLL_SECS".to_string(), value.clone())
            })?,
            None => DEFAULT_TICKET_POLL_SECS,
        };
        if ticket_poll_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "SUNRISE_TICKET_POLL_SECS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let log_level = lookup("SUNRISE_LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        Ok(Self {
            network,
            rpc_url,
            state,
            commitment,
            ticket_poll_secs,
            log_level,
        })
    }

    pub fn ticket_poll_interval(&self) -> Duration {
        Duration::from_secs(self.ticket_poll_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn applies_network_defaults() {
        let state = Pubkey::new_unique().to_string();
        let config = ClientConfig::from_lookup(lookup(&[("SUNRISE_STATE", &state)])).unwrap();

        assert_eq!(config.network, Network::Devnet);
        assert_eq!(config.rpc_url, "https://api.devnet.solana.com");
        assert_eq!(config.commitment, CommitmentLevel::Confirmed);
        assert_eq!(config.ticket_poll_interval(), Duration::from_secs(30));
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn reads_overrides() {
        let state = Pubkey::new_unique();
        let config = ClientConfig::from_lookup(lookup(&[
            ("SUNRISE_NETWORK", "localnet"),
            ("SUNRISE_RPC_URL", "http://validator:8899"),
            ("SUNRISE_STATE", &state.to_string()),
            ("SUNRISE_COMMITMENT", "finalized"),
            ("SUNRISE_TICKET_POLL_SECS", "5"),
            ("SUNRISE_LOG_LEVEL", "debug"),
        ]))
        .unwrap();

        assert_eq!(config.network, Network::Localnet);
        assert_eq!(config.rpc_url, "http://validator:8899");
        assert_eq!(config.state, state);
        assert_eq!(config.commitment, CommitmentLevel::Finalized);
        assert_eq!(config.ticket_poll_secs, 5);
    }

    #[test]
    fn state_is_required() {
        assert_eq!(
            ClientConfig::from_lookup(lookup(&[])),
            Err(ConfigError::MissingEnvVar("SUNRISE_STATE".to_string()))
        );
    }

    #[test]
    fn rejects_bad_values() {
        let state = Pubkey::new_unique().to_string();
        assert!(ClientConfig::from_lookup(lookup(&[
            ("SUNRISE_STATE", &state),
            ("SUNRISE_NETWORK", "moon"),
        ]))
        .is_err());
        assert!(ClientConfig::from_lookup(lookup(&[
            ("SUNRISE_STATE", &state),
            ("SUNRISE_TICKET_POLL_SECS", "0"),
        ]))
        .is_err());
        assert!(ClientConfig::from_lookup(lookup(&[("SUNRISE_STATE", "not-a-key")])).is_err());
    }
}

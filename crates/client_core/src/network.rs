//! Chain environments the client can talk to.

use std::{fmt, fs, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};
use shared::protocol::ACTIONS_CONTRACT_TAG;
use thiserror::Error;

pub const NAMESPACE: &str = "untitled";
const PRESET: &str = "untitled";
const SLOT: &str = "untitled";
const SHORT_STRING_MAX_LEN: usize = 31;

const KATANA_DEFAULT_RPC_URL: &str = "http://localhost:5050";
const KATANA_DEFAULT_TORII_URL: &str = "http://localhost:8080";
const SEPOLIA_DEFAULT_RPC_URL: &str = "https://api.cartridge.gg/x/starknet/sepolia/rpc/v0_9";
const SEPOLIA_TORII_URL: &str = "https://api.cartridge.gg/x/untitled/torii";

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Network {0} not found")]
    UnknownNetwork(String),
    #[error("short string must be ASCII: {0:?}")]
    NonAsciiShortString(String),
    #[error("short string longer than 31 bytes: {0:?}")]
    ShortStringTooLong(String),
    #[error("failed to read manifest {path}: {source}")]
    ManifestRead {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse manifest {path}: {source}")]
    ManifestParse {
        path: String,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChainId {
    #[serde(rename = "KATANA")]
    Katana,
    #[serde(rename = "SN_SEPOLIA")]
    SnSepolia,
}

impl ChainId {
    pub fn as_str(self) -> &'static str {
        match self {
            ChainId::Katana => "KATANA",
            ChainId::SnSepolia => "SN_SEPOLIA",
        }
    }

    /// File name of the deployment manifest for this chain.
    pub fn manifest_file(self) -> &'static str {
        match self {
            ChainId::Katana => "manifest_dev.json",
            ChainId::SnSepolia => "manifest_sepolia.json",
        }
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChainId {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "KATANA" => Ok(ChainId::Katana),
            "SN_SEPOLIA" => Ok(ChainId::SnSepolia),
            _ => Err(NetworkError::UnknownNetwork(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestContract {
    pub tag: String,
    #[serde(default)]
    pub address: String,
}

/// The parts of a world deployment manifest the client reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub contracts: Vec<ManifestContract>,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self, NetworkError> {
        let raw = fs::read_to_string(path).map_err(|source| NetworkError::ManifestRead {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| NetworkError::ManifestParse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn contract_address(&self, tag: &str) -> Option<&str> {
        self.contracts
            .iter()
            .find(|contract| contract.tag == tag)
            .map(|contract| contract.address.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    pub target: String,
    pub method: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainEndpoint {
    pub rpc_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub chain_id: ChainId,
    pub namespace: String,
    pub manifest: Manifest,
    pub slot: Option<String>,
    pub preset: String,
    pub policies: Option<Vec<Policy>>,
    pub rpc_url: String,
    pub torii_url: String,
    pub chains: Vec<ChainEndpoint>,
}

/// Endpoints of a chain, before the manifest is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkDefinition {
    pub chain_id: ChainId,
    pub rpc_url: String,
    pub torii_url: String,
}

impl NetworkDefinition {
    pub fn from_env(chain_id: ChainId) -> Self {
        Self::with_env(chain_id, |key| std::env::var(key).ok())
    }

    pub fn with_env(chain_id: ChainId, env: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |key: &str, default: &str| {
            env(key)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        match chain_id {
            ChainId::Katana => Self {
                chain_id,
                rpc_url: lookup("KATANA_RPC_URL", KATANA_DEFAULT_RPC_URL),
                torii_url: lookup("KATANA_TORII_URL", KATANA_DEFAULT_TORII_URL),
            },
            ChainId::SnSepolia => Self {
                chain_id,
                rpc_url: lookup("SEPOLIA_RPC_URL", SEPOLIA_DEFAULT_RPC_URL),
                torii_url: SEPOLIA_TORII_URL.to_string(),
            },
        }
    }

    pub fn into_config(self, manifest: Manifest) -> NetworkConfig {
        // Only the hosted chain needs session policies for the wallet.
        let policies = (self.chain_id == ChainId::SnSepolia).then(|| {
            let target = manifest
                .contract_address(ACTIONS_CONTRACT_TAG)
                .unwrap_or_default()
                .to_string();
            ["spawn", "move"]
                .into_iter()
                .map(|method| Policy {
                    target: target.clone(),
                    method: method.to_string(),
                })
                .collect()
        });

        NetworkConfig {
            chain_id: self.chain_id,
            namespace: NAMESPACE.to_string(),
            manifest,
            slot: Some(SLOT.to_string()),
            preset: PRESET.to_string(),
            policies,
            chains: vec![ChainEndpoint {
                rpc_url: self.rpc_url.clone(),
            }],
            rpc_url: self.rpc_url,
            torii_url: self.torii_url,
        }
    }
}

/// Resolves a chain by name, reading endpoint overrides from the environment.
pub fn get_network_config(
    network: &str,
    manifest: Manifest,
) -> Result<NetworkConfig, NetworkError> {
    let chain_id = network.parse::<ChainId>()?;
    Ok(NetworkDefinition::from_env(chain_id).into_config(manifest))
}

/// Encodes an ASCII string of at most 31 bytes as a felt hex literal.
pub fn string_to_felt(value: &str) -> Result<String, NetworkError> {
    if value.is_empty() {
        return Ok("0x0".to_string());
    }
    if !value.is_ascii() {
        return Err(NetworkError::NonAsciiShortString(value.to_string()));
    }
    if value.len() > SHORT_STRING_MAX_LEN {
        return Err(NetworkError::ShortStringTooLong(value.to_string()));
    }
    let hex: String = value.bytes().map(|b| format!("{b:02x}")).collect();
    Ok(format!("0x{hex}"))
}

#[cfg(test)]
#[path = "tests/network_tests.rs"]
mod tests;

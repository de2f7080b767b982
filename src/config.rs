//! Widget configuration - passed from the embedding page or built in code

use serde::{Deserialize, Serialize};

pub const DEFAULT_STORAGE_KEY: &str = "sui-connect:last-wallet";
pub const DEFAULT_BRIDGE_KEY: &str = "suiConnect";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
    Devnet,
    Localnet,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Devnet => "devnet",
            Network::Localnet => "localnet",
        }
    }

    /// Wallet Standard chain identifier, e.g. `sui:mainnet`.
    pub fn chain(&self) -> &'static str {
        match self {
            Network::Mainnet => "sui:mainnet",
            Network::Testnet => "sui:testnet",
            Network::Devnet => "sui:devnet",
            Network::Localnet => "sui:localnet",
        }
    }

    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            Network::Mainnet => "https://fullnode.mainnet.sui.io:443",
            Network::Testnet => "https://fullnode.testnet.sui.io:443",
            Network::Devnet => "https://fullnode.devnet.sui.io:443",
            Network::Localnet => "http://127.0.0.1:9000",
        }
    }

    /// Accepts `mainnet` or `sui:mainnet` (any case).
    pub fn from_str(value: &str) -> Option<Self> {
        let value = value.trim().to_ascii_lowercase();
        match value.strip_prefix("sui:").unwrap_or(&value) {
            "mainnet" => Some(Network::Mainnet),
            "testnet" => Some(Network::Testnet),
            "devnet" => Some(Network::Devnet),
            "localnet" => Some(Network::Localnet),
            _ => None,
        }
    }
}

impl TryFrom<String> for Network {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Network::from_str(&value).ok_or_else(|| format!("unknown network '{}'", value))
    }
}

/// User-visible strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Labels {
    pub connect: String,
    pub connecting: String,
    pub disconnect: String,
    pub empty: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            connect: "Connect Wallet".into(),
            connecting: "Connecting...".into(),
            disconnect: "Disconnect".into(),
            empty: "No Sui wallets detected. Install a wallet extension and reload.".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WidgetConfig {
    pub network: Network,
    /// Key of the preferred-wallet record.
    pub storage_key: String,
    /// Property on `window` that holds the bridge object.
    pub bridge_key: String,
    /// Fullnode JSON-RPC endpoint; the network default when unset.
    pub rpc_url: Option<String>,
    pub poll_interval_ms: u64,
    pub wait_timeout_ms: u64,
    pub labels: Labels,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            network: Network::default(),
            storage_key: DEFAULT_STORAGE_KEY.into(),
            bridge_key: DEFAULT_BRIDGE_KEY.into(),
            rpc_url: None,
            poll_interval_ms: 1_000,
            wait_timeout_ms: 60_000,
            labels: Labels::default(),
        }
    }
}

impl WidgetConfig {
    pub fn new() -> Self { Self::default() }
    pub fn with_network(mut self, network: Network) -> Self { self.network = network; self }
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self { self.storage_key = key.into(); self }
    pub fn with_bridge_key(mut self, key: impl Into<String>) -> Self { self.bridge_key = key.into(); self }
    pub fn with_rpc_url(mut self, url: impl Into<String>) -> Self { self.rpc_url = Some(url.into()); self }
    pub fn with_labels(mut self, labels: Labels) -> Self { self.labels = labels; self }

    /// Canonical target chain for account selection and signing.
    pub fn chain(&self) -> &'static str {
        self.network.chain()
    }

    pub fn resolved_rpc_url(&self) -> String {
        self.rpc_url
            .clone()
            .unwrap_or_else(|| self.network.default_rpc_url().to_string())
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Defaults overridden by `SUI_CONNECT_NETWORK` and `SUI_CONNECT_RPC_URL`.
    #[cfg(feature = "native")]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(value) = std::env::var("SUI_CONNECT_NETWORK") {
            match Network::from_str(&value) {
                Some(network) => config.network = network,
                None => tracing::warn!(%value, "ignoring unknown SUI_CONNECT_NETWORK"),
            }
        }
        if let Ok(url) = std::env::var("SUI_CONNECT_RPC_URL") {
            if !url.trim().is_empty() {
                config.rpc_url = Some(url);
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_parsing() {
        assert_eq!(Network::from_str("TESTNET"), Some(Network::Testnet));
        assert_eq!(Network::from_str("sui:devnet"), Some(Network::Devnet));
        assert_eq!(Network::from_str("bitcoin"), None);
        assert_eq!(Network::Localnet.chain(), "sui:localnet");
    }

    #[test]
    fn defaults() {
        let config = WidgetConfig::new();
        assert_eq!(config.chain(), "sui:mainnet");
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(config.resolved_rpc_url(), "https://fullnode.mainnet.sui.io:443");
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = WidgetConfig::from_json(
            r#"{"network":"sui:testnet","rpcUrl":"http://localhost:9000","labels":{"connect":"Link"}}"#,
        )
        .unwrap();
        assert_eq!(config.network, Network::Testnet);
        assert_eq!(config.resolved_rpc_url(), "http://localhost:9000");
        assert_eq!(config.labels.connect, "Link");
        assert_eq!(config.labels.disconnect, "Disconnect");
        assert_eq!(config.poll_interval_ms, 1_000);
    }

    #[test]
    fn unknown_network_is_rejected() {
        assert!(WidgetConfig::from_json(r#"{"network":"solana"}"#).is_err());
    }

    #[test]
    fn builder() {
        let config = WidgetConfig::new()
            .with_network(Network::Devnet)
            .with_storage_key("k")
            .with_bridge_key("b")
            .with_rpc_url("http://x");
        assert_eq!(config.storage_key, "k");
        assert_eq!(config.bridge_key, "b");
        assert_eq!(config.resolved_rpc_url(), "http://x");
        assert_eq!(config.chain(), "sui:devnet");
    }
}

//! Wallet model: accounts, feature names, and the capability interface
//! every injected wallet is driven through.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::rc::Rc;

use super::error::WalletResult;
use super::subscription::Subscription;
use super::transaction::Transaction;

/// Wallet Standard feature names the widget understands.
pub mod features {
    pub const CONNECT: &str = "standard:connect";
    pub const DISCONNECT: &str = "standard:disconnect";
    pub const EVENTS: &str = "standard:events";

    pub const SIGN_TRANSACTION: &str = "sui:signTransaction";
    pub const SIGN_TRANSACTION_BLOCK: &str = "sui:signTransactionBlock";
    pub const SIGN_AND_EXECUTE_TRANSACTION: &str = "sui:signAndExecuteTransaction";
    pub const SIGN_AND_EXECUTE_TRANSACTION_BLOCK: &str = "sui:signAndExecuteTransactionBlock";

    /// Sign-only variants, newest first.
    pub const SIGN_ONLY: [&str; 2] = [SIGN_TRANSACTION, SIGN_TRANSACTION_BLOCK];
    /// Sign-and-execute variants, newest first.
    pub const SIGN_AND_EXECUTE: [&str; 2] =
        [SIGN_AND_EXECUTE_TRANSACTION, SIGN_AND_EXECUTE_TRANSACTION_BLOCK];
    pub const SIGNING: [&str; 4] = [
        SIGN_TRANSACTION,
        SIGN_TRANSACTION_BLOCK,
        SIGN_AND_EXECUTE_TRANSACTION,
        SIGN_AND_EXECUTE_TRANSACTION_BLOCK,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub address: String,
    #[serde(default)]
    pub chains: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Account {
    pub fn new(address: impl Into<String>, chains: Vec<String>) -> Self {
        Self { address: address.into(), chains, label: None }
    }

    pub fn supports_chain(&self, chain: &str) -> bool {
        self.chains.iter().any(|c| c == chain)
    }
}

/// Pick the account to use: the first one on `chain`, else the first one.
pub fn choose_account(accounts: &[Account], chain: &str) -> Option<Account> {
    accounts
        .iter()
        .find(|a| a.supports_chain(chain))
        .or_else(|| accounts.first())
        .cloned()
}

/// Payload of a wallet `change` event. `accounts` is `None` when the
/// event concerns something else (chains, features).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletChange {
    #[serde(default)]
    pub accounts: Option<Vec<Account>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignTransactionInput {
    pub transaction: Transaction,
    pub account: Account,
    pub chain: String,
}

/// Output of a sign-only feature: base64 transaction bytes and signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    pub bytes: String,
    pub signature: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutedTransaction {
    pub digest: String,
    #[serde(default)]
    pub bytes: Option<String>,
    #[serde(default)]
    pub signature: Option<String>,
}

pub type ChangeHandler = Rc<dyn Fn(WalletChange)>;

/// Capability surface of one injected wallet.
#[async_trait(?Send)]
pub trait WalletHandle {
    fn name(&self) -> String;

    /// Stable identifier; wallets without an id are known by name.
    fn id(&self) -> String {
        self.name()
    }

    fn icon(&self) -> Option<String> {
        None
    }

    fn features(&self) -> Vec<String>;

    fn has_feature(&self, feature: &str) -> bool {
        self.features().iter().any(|f| f == feature)
    }

    fn accounts(&self) -> Vec<Account>;

    async fn connect(&self, silent: bool) -> WalletResult<Vec<Account>>;

    async fn disconnect(&self) -> WalletResult<()>;

    async fn sign_transaction(
        &self,
        feature: &str,
        input: SignTransactionInput,
    ) -> WalletResult<SignedTransaction>;

    async fn sign_and_execute(
        &self,
        feature: &str,
        input: SignTransactionInput,
    ) -> WalletResult<ExecutedTransaction>;

    /// Listen for `change` events. `None` if the wallet has no events feature.
    fn on_change(&self, handler: ChangeHandler) -> Option<Subscription>;
}

pub type WalletRef = Rc<dyn WalletHandle>;

/// Display-facing snapshot of a wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletSummary {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl WalletSummary {
    pub fn of(wallet: &dyn WalletHandle) -> Self {
        Self { id: wallet.id(), name: wallet.name(), icon: wallet.icon() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(address: &str, chains: &[&str]) -> Account {
        Account::new(address, chains.iter().map(|c| c.to_string()).collect())
    }

    #[test]
    fn prefers_account_on_target_chain() {
        let accounts = vec![
            account("0x1", &["sui:testnet"]),
            account("0x2", &["sui:mainnet"]),
        ];
        assert_eq!(choose_account(&accounts, "sui:mainnet").unwrap().address, "0x2");
    }

    #[test]
    fn falls_back_to_first_account() {
        let accounts = vec![account("0x1", &["sui:testnet"]), account("0x2", &[])];
        assert_eq!(choose_account(&accounts, "sui:mainnet").unwrap().address, "0x1");
    }

    #[test]
    fn empty_accounts_choose_nothing() {
        assert!(choose_account(&[], "sui:mainnet").is_none());
    }

    #[test]
    fn change_without_accounts_deserializes() {
        let change: WalletChange = serde_json::from_str(r#"{"chains":["sui:mainnet"]}"#).unwrap();
        assert!(change.accounts.is_none());
    }
}

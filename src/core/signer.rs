//! Signer: turns the connected wallet/account into a sign-and-execute function
//!
//! Feature priority:
//! 1. `sui:signTransaction` / `sui:signTransactionBlock`, then submit through
//!    the execution client (waits for local execution).
//! 2. `sui:signAndExecuteTransaction` / `sui:signAndExecuteTransactionBlock`,
//!    then wait on the client for the finalized transaction.
//! 3. Otherwise the wallet is unsupported.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::rc::Rc;

use super::error::{WalletError, WalletResult};
use super::transaction::Transaction;
use super::wallet::{features, Account, SignTransactionInput, WalletHandle, WalletRef};

/// What the fullnode should include in transaction responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseOptions {
    pub show_effects: bool,
    pub show_object_changes: bool,
}

impl ResponseOptions {
    pub fn effects_and_changes() -> Self {
        Self { show_effects: true, show_object_changes: true }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    pub digest: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_changes: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TransactionResponse {
    pub fn new(digest: impl Into<String>) -> Self {
        Self { digest: digest.into(), effects: None, object_changes: None, extra: Map::new() }
    }
}

/// Blockchain client used to submit and observe transactions.
#[async_trait(?Send)]
pub trait ExecutionClient {
    async fn execute_transaction(
        &self,
        bytes: &str,
        signature: &str,
        options: ResponseOptions,
    ) -> WalletResult<TransactionResponse>;

    async fn wait_for_transaction(
        &self,
        digest: &str,
        options: ResponseOptions,
    ) -> WalletResult<TransactionResponse>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignRequest {
    pub transaction: Transaction,
    /// Defaults to the widget's network.
    pub chain: Option<String>,
}

impl SignRequest {
    pub fn new(transaction: Transaction) -> Self {
        Self { transaction, chain: None }
    }

    pub fn with_chain(mut self, chain: impl Into<String>) -> Self {
        self.chain = Some(chain.into());
        self
    }
}

#[derive(Clone)]
pub struct Signer {
    wallet: Option<WalletRef>,
    account: Option<Account>,
    client: Rc<dyn ExecutionClient>,
    default_chain: String,
}

impl Signer {
    pub fn new(
        wallet: Option<WalletRef>,
        account: Option<Account>,
        client: Rc<dyn ExecutionClient>,
        default_chain: impl Into<String>,
    ) -> Self {
        Self { wallet, account, client, default_chain: default_chain.into() }
    }

    pub fn account(&self) -> Option<&Account> {
        self.account.as_ref()
    }

    pub async fn sign_and_execute(&self, request: SignRequest) -> WalletResult<TransactionResponse> {
        let (wallet, account) = match (&self.wallet, &self.account) {
            (Some(wallet), Some(account)) => (wallet.clone(), account.clone()),
            _ => return Err(WalletError::NotConnected),
        };

        let SignRequest { mut transaction, chain } = request;
        transaction.set_sender_if_unset(&account.address);
        let input = SignTransactionInput {
            transaction,
            account,
            chain: chain.unwrap_or_else(|| self.default_chain.clone()),
        };
        let options = ResponseOptions::effects_and_changes();

        if let Some(feature) = first_supported(wallet.as_ref(), &features::SIGN_ONLY) {
            tracing::debug!(wallet = %wallet.name(), feature, "signing transaction");
            let signed = wallet.sign_transaction(feature, input).await?;
            return self
                .client
                .execute_transaction(&signed.bytes, &signed.signature, options)
                .await;
        }

        if let Some(feature) = first_supported(wallet.as_ref(), &features::SIGN_AND_EXECUTE) {
            tracing::debug!(wallet = %wallet.name(), feature, "signing and executing transaction");
            let executed = wallet.sign_and_execute(feature, input).await?;
            return self.client.wait_for_transaction(&executed.digest, options).await;
        }

        Err(WalletError::UnsupportedWallet { wallet: wallet.name() })
    }
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer")
            .field("wallet", &self.wallet.as_ref().map(|w| w.name()))
            .field("account", &self.account.as_ref().map(|a| &a.address))
            .field("default_chain", &self.default_chain)
            .finish()
    }
}

fn first_supported(wallet: &dyn WalletHandle, candidates: &[&'static str]) -> Option<&'static str> {
    let available = wallet.features();
    candidates.iter().copied().find(|c| available.iter().any(|f| f == c))
}

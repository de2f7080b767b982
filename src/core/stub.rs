//! Inert wallet used by unit tests that only need names and features.

use async_trait::async_trait;
use std::rc::Rc;

use super::error::{WalletError, WalletResult};
use super::subscription::Subscription;
use super::wallet::{
    Account, ChangeHandler, ExecutedTransaction, SignTransactionInput, SignedTransaction,
    WalletHandle, WalletRef,
};

pub(crate) struct StubWallet {
    name: String,
    features: Vec<String>,
}

pub(crate) fn stub_wallet(name: &str, features: &[&str]) -> WalletRef {
    Rc::new(StubWallet {
        name: name.to_string(),
        features: features.iter().map(|f| f.to_string()).collect(),
    })
}

#[async_trait(?Send)]
impl WalletHandle for StubWallet {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn features(&self) -> Vec<String> {
        self.features.clone()
    }

    fn accounts(&self) -> Vec<Account> {
        Vec::new()
    }

    async fn connect(&self, _silent: bool) -> WalletResult<Vec<Account>> {
        Ok(Vec::new())
    }

    async fn disconnect(&self) -> WalletResult<()> {
        Ok(())
    }

    async fn sign_transaction(
        &self,
        feature: &str,
        _input: SignTransactionInput,
    ) -> WalletResult<SignedTransaction> {
        Err(WalletError::capability(feature, "stub"))
    }

    async fn sign_and_execute(
        &self,
        feature: &str,
        _input: SignTransactionInput,
    ) -> WalletResult<ExecutedTransaction> {
        Err(WalletError::capability(feature, "stub"))
    }

    fn on_change(&self, _handler: ChangeHandler) -> Option<Subscription> {
        None
    }
}

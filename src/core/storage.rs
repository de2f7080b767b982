//! Preferred-wallet persistence (best effort)

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::error::WalletResult;

/// String key-value store (`localStorage` in the browser).
pub trait PreferenceStore {
    fn get(&self, key: &str) -> WalletResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> WalletResult<()>;
    fn remove(&self, key: &str) -> WalletResult<()>;
}

#[derive(Clone, Default)]
pub struct MemoryPreferences {
    values: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> WalletResult<Option<String>> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> WalletResult<()> {
        self.values.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> WalletResult<()> {
        self.values.borrow_mut().remove(key);
        Ok(())
    }
}

/// The single persisted record: id of the last connected wallet.
/// Storage failures are logged and read as "no preference".
#[derive(Clone)]
pub struct PreferredWallet {
    store: Rc<dyn PreferenceStore>,
    key: String,
}

impl PreferredWallet {
    pub fn new(store: Rc<dyn PreferenceStore>, key: impl Into<String>) -> Self {
        Self { store, key: key.into() }
    }

    pub fn load(&self) -> Option<String> {
        match self.store.get(&self.key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "could not read preferred wallet");
                None
            }
        }
    }

    pub fn save(&self, wallet_id: &str) {
        if let Err(e) = self.store.set(&self.key, wallet_id) {
            tracing::warn!(key = %self.key, error = %e, "could not persist preferred wallet");
        }
    }

    pub fn clear(&self) {
        if let Err(e) = self.store.remove(&self.key) {
            tracing::warn!(key = %self.key, error = %e, "could not clear preferred wallet");
        }
    }
}

//! LocalStorage: preferred-wallet persistence in `window.localStorage`

use web_sys::Storage;

use super::js_message;
use crate::core::error::{WalletError, WalletResult};
use crate::core::storage::PreferenceStore;

/// Storage may be missing or throw (private mode, disabled cookies); every
/// such failure surfaces as `WalletError::Storage`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    fn storage(&self) -> WalletResult<Storage> {
        let window = web_sys::window().ok_or_else(|| WalletError::Storage("no window".into()))?;
        window
            .local_storage()
            .map_err(|e| WalletError::Storage(js_message(&e)))?
            .ok_or_else(|| WalletError::Storage("localStorage unavailable".into()))
    }
}

impl PreferenceStore for LocalStorage {
    fn get(&self, key: &str) -> WalletResult<Option<String>> {
        self.storage()?
            .get_item(key)
            .map_err(|e| WalletError::Storage(js_message(&e)))
    }

    fn set(&self, key: &str, value: &str) -> WalletResult<()> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| WalletError::Storage(js_message(&e)))
    }

    fn remove(&self, key: &str) -> WalletResult<()> {
        self.storage()?
            .remove_item(key)
            .map_err(|e| WalletError::Storage(js_message(&e)))
    }
}

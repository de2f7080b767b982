//! Discovery: which registered wallets the widget offers

use super::registry::WalletRegistry;
use super::wallet::{features, WalletHandle, WalletRef};

/// `standard:connect` plus at least one signing feature.
pub fn is_connectable(wallet: &dyn WalletHandle) -> bool {
    let available = wallet.features();
    let has = |name: &str| available.iter().any(|f| f == name);
    has(features::CONNECT) && features::SIGNING.iter().any(|f| has(f))
}

/// Filter to connectable wallets and order them by display name.
pub fn connectable_wallets(wallets: Vec<WalletRef>) -> Vec<WalletRef> {
    let mut wallets: Vec<WalletRef> = wallets
        .into_iter()
        .filter(|w| is_connectable(w.as_ref()))
        .collect();
    wallets.sort_by_cached_key(|w| {
        let name = w.name();
        (name.to_lowercase(), name)
    });
    wallets
}

pub fn list_connectable_wallets(registry: &dyn WalletRegistry) -> Vec<WalletRef> {
    connectable_wallets(registry.get())
}

pub fn find_wallet(wallets: &[WalletRef], id: &str) -> Option<WalletRef> {
    wallets.iter().find(|w| w.id() == id).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::stub::stub_wallet as stub;

    fn names(wallets: &[WalletRef]) -> Vec<String> {
        wallets.iter().map(|w| w.name()).collect()
    }

    #[test]
    fn filters_by_capability() {
        let wallets = vec![
            stub("Connect Only", &[features::CONNECT]),
            stub("Sign Only", &[features::SIGN_TRANSACTION]),
            stub("Legacy", &[features::CONNECT, features::SIGN_AND_EXECUTE_TRANSACTION_BLOCK]),
            stub("Modern", &[features::CONNECT, features::SIGN_TRANSACTION]),
        ];
        assert_eq!(names(&connectable_wallets(wallets)), vec!["Legacy", "Modern"]);
    }

    #[test]
    fn sorts_by_name_ignoring_case() {
        let all = [features::CONNECT, features::SIGN_TRANSACTION];
        let wallets = vec![
            stub("suiet", &all),
            stub("Phantom", &all),
            stub("Slush", &all),
            stub("backpack", &all),
        ];
        assert_eq!(
            names(&connectable_wallets(wallets)),
            vec!["backpack", "Phantom", "Slush", "suiet"]
        );
    }

    #[test]
    fn finds_by_id() {
        let all = [features::CONNECT, features::SIGN_TRANSACTION];
        let wallets = vec![stub("A", &all), stub("B", &all)];
        assert_eq!(find_wallet(&wallets, "B").unwrap().name(), "B");
        assert!(find_wallet(&wallets, "C").is_none());
    }
}

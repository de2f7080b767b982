//! JsWallet: a Wallet Standard wallet object driven from Rust
//!
//! | Feature | Method | Output |
//! |---------|--------|--------|
//! | `standard:connect` | `connect({silent})` | `{accounts}` |
//! | `standard:disconnect` | `disconnect()` | - |
//! | `standard:events` | `on("change", cb)` | `off()` |
//! | `sui:signTransaction` | `signTransaction({transaction, account, chain})` | `{bytes, signature}` |
//! | `sui:signTransactionBlock` | `signTransactionBlock({transactionBlock, account, chain})` | `{transactionBlockBytes, signature}` |
//! | `sui:signAndExecuteTransaction` | `signAndExecuteTransaction({transaction, account, chain})` | `{digest, bytes, signature}` |
//! | `sui:signAndExecuteTransactionBlock` | `signAndExecuteTransactionBlock({transactionBlock, account, chain, options})` | `{digest}` |

use async_trait::async_trait;
use js_sys::{Array, Function, Object, Promise};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use super::{call_method, get, js_message, object};
use crate::core::error::{WalletError, WalletResult};
use crate::core::subscription::Subscription;
use crate::core::wallet::{
    features, Account, ChangeHandler, ExecutedTransaction, SignTransactionInput,
    SignedTransaction, WalletChange, WalletHandle,
};

pub struct JsWallet {
    wallet: JsValue,
}

impl JsWallet {
    pub fn new(wallet: JsValue) -> Self {
        Self { wallet }
    }

    fn feature(&self, name: &str) -> WalletResult<JsValue> {
        let feature = get(&get(&self.wallet, "features"), name);
        if feature.is_undefined() || feature.is_null() {
            return Err(WalletError::capability(name, "feature not available"));
        }
        Ok(feature)
    }

    async fn invoke(&self, feature: &str, method: &str, args: &[JsValue]) -> WalletResult<JsValue> {
        let target = self.feature(feature)?;
        call_method(&target, method, args)
            .await
            .map_err(|e| WalletError::capability(feature, js_message(&e)))
    }

    /// The wallet's own account object for `account`, which features expect
    /// to receive back. Falls back to a plain `{address, chains}`.
    fn js_account(&self, account: &Account) -> JsValue {
        let found = js_array(&get(&self.wallet, "accounts"))
            .iter()
            .find(|a| get(a, "address").as_string().as_deref() == Some(account.address.as_str()));
        match found {
            Some(js) => js,
            None => {
                let chains: Array = account.chains.iter().map(|c| JsValue::from_str(c)).collect();
                object(&[
                    ("address", JsValue::from_str(&account.address)),
                    ("chains", chains.into()),
                ])
                .into()
            }
        }
    }

    fn sign_input(&self, transaction_key: &str, input: &SignTransactionInput) -> Object {
        object(&[
            (transaction_key, js_transaction(input.transaction.to_json_string())),
            ("account", self.js_account(&input.account)),
            ("chain", JsValue::from_str(&input.chain)),
        ])
    }
}

/// `{toJSON(): Promise<string>, serialize(): string}` around serialized data.
fn js_transaction(json: String) -> JsValue {
    let for_to_json = json.clone();
    let to_json = Closure::wrap(Box::new(move || Promise::resolve(&JsValue::from_str(&for_to_json)))
        as Box<dyn Fn() -> Promise>);
    let serialize =
        Closure::wrap(Box::new(move || JsValue::from_str(&json)) as Box<dyn Fn() -> JsValue>);
    object(&[
        ("toJSON", to_json.into_js_value()),
        ("serialize", serialize.into_js_value()),
    ])
    .into()
}

fn js_array(value: &JsValue) -> Array {
    if Array::is_array(value) {
        value.clone().unchecked_into()
    } else {
        Array::new()
    }
}

fn parse_account(value: &JsValue) -> Option<Account> {
    let address = get(value, "address").as_string()?;
    let chains = js_array(&get(value, "chains"))
        .iter()
        .filter_map(|c| c.as_string())
        .collect();
    Some(Account { address, chains, label: get(value, "label").as_string() })
}

fn parse_accounts(value: &JsValue) -> Vec<Account> {
    js_array(value).iter().filter_map(|a| parse_account(&a)).collect()
}

fn required_string(value: &JsValue, key: &str, feature: &str) -> WalletResult<String> {
    get(value, key)
        .as_string()
        .ok_or_else(|| WalletError::capability(feature, format!("response has no '{}'", key)))
}

#[async_trait(?Send)]
impl WalletHandle for JsWallet {
    fn name(&self) -> String {
        get(&self.wallet, "name").as_string().unwrap_or_default()
    }

    fn id(&self) -> String {
        get(&self.wallet, "id")
            .as_string()
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| self.name())
    }

    fn icon(&self) -> Option<String> {
        get(&self.wallet, "icon").as_string()
    }

    fn features(&self) -> Vec<String> {
        match get(&self.wallet, "features").dyn_into::<Object>() {
            Ok(obj) => Object::keys(&obj).iter().filter_map(|k| k.as_string()).collect(),
            Err(_) => Vec::new(),
        }
    }

    fn accounts(&self) -> Vec<Account> {
        parse_accounts(&get(&self.wallet, "accounts"))
    }

    async fn connect(&self, silent: bool) -> WalletResult<Vec<Account>> {
        let input = object(&[("silent", JsValue::from_bool(silent))]);
        let output = self.invoke(features::CONNECT, "connect", &[input.into()]).await?;
        let accounts = get(&output, "accounts");
        if Array::is_array(&accounts) {
            Ok(parse_accounts(&accounts))
        } else {
            Ok(self.accounts())
        }
    }

    async fn disconnect(&self) -> WalletResult<()> {
        self.invoke(features::DISCONNECT, "disconnect", &[]).await?;
        Ok(())
    }

    async fn sign_transaction(
        &self,
        feature: &str,
        input: SignTransactionInput,
    ) -> WalletResult<SignedTransaction> {
        let (method, tx_key, bytes_key) = if feature == features::SIGN_TRANSACTION_BLOCK {
            ("signTransactionBlock", "transactionBlock", "transactionBlockBytes")
        } else {
            ("signTransaction", "transaction", "bytes")
        };
        let js_input = self.sign_input(tx_key, &input);
        let output = self.invoke(feature, method, &[js_input.into()]).await?;
        Ok(SignedTransaction {
            bytes: required_string(&output, bytes_key, feature)?,
            signature: required_string(&output, "signature", feature)?,
        })
    }

    async fn sign_and_execute(
        &self,
        feature: &str,
        input: SignTransactionInput,
    ) -> WalletResult<ExecutedTransaction> {
        let legacy = feature == features::SIGN_AND_EXECUTE_TRANSACTION_BLOCK;
        let js_input = if legacy {
            let js_input = self.sign_input("transactionBlock", &input);
            let options = object(&[
                ("showEffects", JsValue::TRUE),
                ("showObjectChanges", JsValue::TRUE),
            ]);
            let _ = js_sys::Reflect::set(&js_input, &JsValue::from_str("options"), &options);
            js_input
        } else {
            self.sign_input("transaction", &input)
        };
        let method = if legacy {
            "signAndExecuteTransactionBlock"
        } else {
            "signAndExecuteTransaction"
        };
        let output = self.invoke(feature, method, &[js_input.into()]).await?;
        Ok(ExecutedTransaction {
            digest: required_string(&output, "digest", feature)?,
            bytes: get(&output, "bytes").as_string(),
            signature: get(&output, "signature").as_string(),
        })
    }

    fn on_change(&self, handler: ChangeHandler) -> Option<Subscription> {
        let events = self.feature(features::EVENTS).ok()?;
        let on = get(&events, "on").dyn_into::<Function>().ok()?;

        let listener = Closure::wrap(Box::new(move |properties: JsValue| {
            let accounts = get(&properties, "accounts");
            let change = WalletChange {
                accounts: Array::is_array(&accounts).then(|| parse_accounts(&accounts)),
            };
            handler(change);
        }) as Box<dyn FnMut(JsValue)>)
        .into_js_value();

        let off = match on.call2(&events, &JsValue::from_str("change"), &listener) {
            Ok(off) => off,
            Err(e) => {
                tracing::warn!(wallet = %self.name(), error = %js_message(&e), "could not subscribe to wallet events");
                return None;
            }
        };
        Some(Subscription::new(move || {
            if let Some(off) = off.dyn_ref::<Function>() {
                let _ = off.call0(&JsValue::NULL);
            }
        }))
    }
}
